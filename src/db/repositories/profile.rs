use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::OnConflict,
};

use crate::entities::{
    prelude::*, profile_courses, profile_courses::CourseList, profile_interests, user_profiles,
};

/// Relationship sets owned by a user profile. Every add is idempotent and
/// every remove of an absent member is a no-op.
pub struct ProfileRepository {
    conn: DatabaseConnection,
}

impl ProfileRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn profile_id_for_user(&self, user_id: i32) -> Result<Option<i32>> {
        let profile = UserProfiles::find()
            .filter(user_profiles::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await
            .context("Failed to query user profile")?;

        Ok(profile.map(|p| p.id))
    }

    pub async fn add_course(&self, profile_id: i32, course_id: i32, list: CourseList) -> Result<()> {
        ProfileCourses::insert(profile_courses::ActiveModel {
            profile_id: Set(profile_id),
            course_id: Set(course_id),
            list: Set(list),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::columns([
                profile_courses::Column::ProfileId,
                profile_courses::Column::CourseId,
                profile_courses::Column::List,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(&self.conn)
        .await
        .context("Failed to add course to profile")?;

        Ok(())
    }

    pub async fn remove_course(
        &self,
        profile_id: i32,
        course_id: i32,
        list: CourseList,
    ) -> Result<()> {
        ProfileCourses::delete_many()
            .filter(profile_courses::Column::ProfileId.eq(profile_id))
            .filter(profile_courses::Column::CourseId.eq(course_id))
            .filter(profile_courses::Column::List.eq(list))
            .exec(&self.conn)
            .await
            .context("Failed to remove course from profile")?;

        Ok(())
    }

    /// Names of the courses in one list, in the order they were added.
    pub async fn course_names(&self, profile_id: i32, list: CourseList) -> Result<Vec<String>> {
        let rows = ProfileCourses::find()
            .filter(profile_courses::Column::ProfileId.eq(profile_id))
            .filter(profile_courses::Column::List.eq(list))
            .order_by_asc(profile_courses::Column::Id)
            .find_also_related(Courses)
            .all(&self.conn)
            .await
            .context("Failed to list profile courses")?;

        Ok(rows
            .into_iter()
            .filter_map(|(_, course)| course.map(|c| c.name))
            .collect())
    }

    pub async fn add_interest(&self, profile_id: i32, subject_id: i32) -> Result<()> {
        ProfileInterests::insert(profile_interests::ActiveModel {
            profile_id: Set(profile_id),
            subject_id: Set(subject_id),
        })
        .on_conflict(
            OnConflict::columns([
                profile_interests::Column::ProfileId,
                profile_interests::Column::SubjectId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(&self.conn)
        .await
        .context("Failed to add interest to profile")?;

        Ok(())
    }

    pub async fn interest_names(&self, profile_id: i32) -> Result<Vec<String>> {
        let rows = ProfileInterests::find()
            .filter(profile_interests::Column::ProfileId.eq(profile_id))
            .order_by_asc(profile_interests::Column::SubjectId)
            .find_also_related(Subjects)
            .all(&self.conn)
            .await
            .context("Failed to list profile interests")?;

        Ok(rows
            .into_iter()
            .filter_map(|(_, subject)| subject.map(|s| s.name))
            .collect())
    }
}
