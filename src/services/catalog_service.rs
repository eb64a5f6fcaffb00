//! Domain service for read-only catalog queries.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors specific to catalog reads.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Course not found: {0}")]
    CourseNotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Course name -> `[description, provider]`. Serialises as a JSON object
/// whose values are two-element arrays.
pub type SampleCourses = BTreeMap<String, (String, Option<String>)>;

/// Details shown for a single course.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CourseInfo {
    pub description: String,
    pub provider: Option<String>,
    pub instructor: String,
    pub name: String,
    pub url: String,
}

#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    /// All subject names in storage order.
    async fn list_subjects(&self) -> Result<Vec<String>, CatalogError>;

    /// All course names in storage order.
    async fn list_courses(&self) -> Result<Vec<String>, CatalogError>;

    /// Every course tagged with the subject. Unknown subjects yield an
    /// empty map.
    async fn sample_courses(&self, subject: &str) -> Result<SampleCourses, CatalogError>;

    /// # Errors
    ///
    /// Returns [`CatalogError::CourseNotFound`] if no course matches `course`.
    async fn course_info(&self, course: &str) -> Result<CourseInfo, CatalogError>;

    /// A handful of distinct course names picked at random.
    async fn random_courses(&self) -> Result<Vec<String>, CatalogError>;
}
