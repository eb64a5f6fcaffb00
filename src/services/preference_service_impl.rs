//! `SeaORM` implementation of the `PreferenceService` trait.

use async_trait::async_trait;
use tracing::debug;

use crate::db::Store;
use crate::entities::profile_courses::CourseList;
use crate::services::preference_service::{PreferenceError, PreferenceService};

pub struct SeaOrmPreferenceService {
    store: Store,
}

impl SeaOrmPreferenceService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn profile_id(&self, user_id: i32) -> Result<i32, PreferenceError> {
        self.store
            .profile_id_for_user(user_id)
            .await?
            .ok_or(PreferenceError::ProfileNotFound(user_id))
    }

    async fn course_id(&self, key: &str) -> Result<i32, PreferenceError> {
        if key.trim().is_empty() {
            return Err(PreferenceError::CourseNotFound(key.to_string()));
        }

        self.store
            .find_course(key)
            .await?
            .map(|c| c.id)
            .ok_or_else(|| PreferenceError::CourseNotFound(key.to_string()))
    }

    async fn add_to_list(
        &self,
        user_id: i32,
        key: &str,
        list: CourseList,
    ) -> Result<(), PreferenceError> {
        let profile_id = self.profile_id(user_id).await?;
        let course_id = self.course_id(key).await?;

        self.store
            .add_profile_course(profile_id, course_id, list)
            .await?;

        debug!(user_id, course_id, ?list, "Course added to list");
        Ok(())
    }

    async fn names_in_list(
        &self,
        user_id: i32,
        list: CourseList,
    ) -> Result<Vec<String>, PreferenceError> {
        let profile_id = self.profile_id(user_id).await?;
        Ok(self.store.profile_course_names(profile_id, list).await?)
    }
}

#[async_trait]
impl PreferenceService for SeaOrmPreferenceService {
    async fn like_subject(&self, user_id: i32, subject: &str) -> Result<(), PreferenceError> {
        let profile_id = self.profile_id(user_id).await?;

        if subject.trim().is_empty() {
            return Err(PreferenceError::SubjectNotFound(subject.to_string()));
        }

        let subject_id = self
            .store
            .find_subject(subject)
            .await?
            .map(|s| s.id)
            .ok_or_else(|| PreferenceError::SubjectNotFound(subject.to_string()))?;

        self.store
            .add_profile_interest(profile_id, subject_id)
            .await?;

        debug!(user_id, subject_id, "Subject liked");
        Ok(())
    }

    async fn dislike_course(&self, user_id: i32, course: &str) -> Result<(), PreferenceError> {
        self.add_to_list(user_id, course, CourseList::Disliked).await
    }

    async fn complete_course(&self, user_id: i32, course: &str) -> Result<(), PreferenceError> {
        self.add_to_list(user_id, course, CourseList::Completed)
            .await
    }

    async fn add_course(&self, user_id: i32, course: &str) -> Result<(), PreferenceError> {
        self.add_to_list(user_id, course, CourseList::Enrolled).await
    }

    async fn drop_course(&self, user_id: i32, course: &str) -> Result<(), PreferenceError> {
        let profile_id = self.profile_id(user_id).await?;
        let course_id = self.course_id(course).await?;

        self.store
            .remove_profile_course(profile_id, course_id, CourseList::Enrolled)
            .await?;

        debug!(user_id, course_id, "Course dropped");
        Ok(())
    }

    async fn enrolled_courses(&self, user_id: i32) -> Result<Vec<String>, PreferenceError> {
        self.names_in_list(user_id, CourseList::Enrolled).await
    }

    async fn liked_subjects(&self, user_id: i32) -> Result<Vec<String>, PreferenceError> {
        let profile_id = self.profile_id(user_id).await?;
        Ok(self.store.profile_interest_names(profile_id).await?)
    }

    async fn disliked_courses(&self, user_id: i32) -> Result<Vec<String>, PreferenceError> {
        self.names_in_list(user_id, CourseList::Disliked).await
    }

    async fn completed_courses(&self, user_id: i32) -> Result<Vec<String>, PreferenceError> {
        self.names_in_list(user_id, CourseList::Completed).await
    }
}
