//! Domain service for a user's course and subject preferences.
//!
//! Each user profile owns four independent sets: enrolled courses, liked
//! subjects, disliked courses and completed courses. Adding an existing
//! member or removing a missing one changes nothing.

use thiserror::Error;

/// Errors specific to preference operations.
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("Subject not found: {0}")]
    SubjectNotFound(String),

    #[error("Course not found: {0}")]
    CourseNotFound(String),

    #[error("Profile not found for user {0}")]
    ProfileNotFound(i32),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PreferenceError {
    /// The referenced subject or course does not exist.
    #[must_use]
    pub const fn is_missing_target(&self) -> bool {
        matches!(self, Self::SubjectNotFound(_) | Self::CourseNotFound(_))
    }
}

impl From<sea_orm::DbErr> for PreferenceError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for PreferenceError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for preferences.
///
/// Keys are raw form values: a numeric key matches an id, anything else
/// matches a name.
#[async_trait::async_trait]
pub trait PreferenceService: Send + Sync {
    /// Adds a subject to the user's interests.
    ///
    /// # Errors
    ///
    /// Returns [`PreferenceError::SubjectNotFound`] if no subject matches.
    async fn like_subject(&self, user_id: i32, subject: &str) -> Result<(), PreferenceError>;

    /// Marks a course as disliked.
    async fn dislike_course(&self, user_id: i32, course: &str) -> Result<(), PreferenceError>;

    /// Marks a course as completed.
    async fn complete_course(&self, user_id: i32, course: &str) -> Result<(), PreferenceError>;

    /// Enrolls the user in a course.
    async fn add_course(&self, user_id: i32, course: &str) -> Result<(), PreferenceError>;

    /// Unenrolls the user from a course.
    async fn drop_course(&self, user_id: i32, course: &str) -> Result<(), PreferenceError>;

    async fn enrolled_courses(&self, user_id: i32) -> Result<Vec<String>, PreferenceError>;

    async fn liked_subjects(&self, user_id: i32) -> Result<Vec<String>, PreferenceError>;

    async fn disliked_courses(&self, user_id: i32) -> Result<Vec<String>, PreferenceError>;

    async fn completed_courses(&self, user_id: i32) -> Result<Vec<String>, PreferenceError>;
}
