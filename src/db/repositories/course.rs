use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, sea_query::OnConflict,
};

use crate::entities::{course_subjects, courses, prelude::*, providers};

/// Fields needed to create a course.
#[derive(Debug, Clone, Default)]
pub struct NewCourse {
    pub name: String,
    pub description: String,
    pub instructor: String,
    pub provider_id: Option<i32>,
    pub url: String,
}

/// A course joined with its provider, if any.
pub type CourseWithProvider = (courses::Model, Option<providers::Model>);

pub struct CourseRepository {
    conn: DatabaseConnection,
}

impl CourseRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_all(&self) -> Result<Vec<courses::Model>> {
        Courses::find()
            .order_by_asc(courses::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list courses")
    }

    /// Resolve a form value to a course: numeric keys match the id first,
    /// anything else (or an unmatched id) matches the name.
    pub async fn find_by_key(&self, key: &str) -> Result<Option<courses::Model>> {
        if let Ok(id) = key.trim().parse::<i32>() {
            let course = Courses::find_by_id(id)
                .one(&self.conn)
                .await
                .context("Failed to query course by ID")?;

            if course.is_some() {
                return Ok(course);
            }
        }

        Courses::find()
            .filter(courses::Column::Name.eq(key))
            .order_by_asc(courses::Column::Id)
            .one(&self.conn)
            .await
            .context("Failed to query course by name")
    }

    pub async fn get_with_provider(&self, id: i32) -> Result<Option<CourseWithProvider>> {
        Courses::find_by_id(id)
            .find_also_related(Providers)
            .one(&self.conn)
            .await
            .context("Failed to query course with provider")
    }

    /// Courses tagged with a subject, in storage order.
    pub async fn list_for_subject(&self, subject_id: i32) -> Result<Vec<CourseWithProvider>> {
        Courses::find()
            .join(JoinType::InnerJoin, courses::Relation::CourseSubjects.def())
            .filter(course_subjects::Column::SubjectId.eq(subject_id))
            .find_also_related(Providers)
            .order_by_asc(courses::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list courses for subject")
    }

    pub async fn create(&self, course: NewCourse) -> Result<courses::Model> {
        courses::ActiveModel {
            name: Set(course.name),
            description: Set(course.description),
            instructor: Set(course.instructor),
            provider_id: Set(course.provider_id),
            url: Set(course.url),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to create course")
    }

    /// Associate a course with a subject. Re-tagging is a no-op.
    pub async fn tag(&self, course_id: i32, subject_id: i32) -> Result<()> {
        CourseSubjects::insert(course_subjects::ActiveModel {
            course_id: Set(course_id),
            subject_id: Set(subject_id),
        })
        .on_conflict(
            OnConflict::columns([
                course_subjects::Column::CourseId,
                course_subjects::Column::SubjectId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(&self.conn)
        .await
        .context("Failed to tag course with subject")?;

        Ok(())
    }

    pub async fn create_provider(&self, name: &str) -> Result<providers::Model> {
        providers::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .with_context(|| format!("Failed to create provider '{name}'"))
    }
}
