use axum::{
    Form, Json,
    extract::{State, rejection::FormRejection},
};
use serde::Deserialize;
use std::sync::Arc;

use super::preferences::form_value;
use super::{ApiError, AppState, CourseInfoResponse};
use crate::services::{CatalogError, SampleCourses};

#[derive(Deserialize)]
pub struct SampleCoursesForm {
    pub subject: Option<String>,
}

#[derive(Deserialize)]
pub struct CourseInfoForm {
    pub course_id: Option<String>,
}

/// GET /api/subjects/
pub async fn list_subjects(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.catalog_service().list_subjects().await?))
}

/// GET /api/courses/
pub async fn list_courses(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.catalog_service().list_courses().await?))
}

/// POST /api/sample_courses/
/// `{"<course>": ["<description>", "<provider>" | null], ...}` or `{}`
pub async fn sample_courses(
    State(state): State<Arc<AppState>>,
    form: Result<Form<SampleCoursesForm>, FormRejection>,
) -> Result<Json<SampleCourses>, ApiError> {
    let subject = form_value(form, |f| f.subject);
    if subject.is_empty() {
        return Ok(Json(SampleCourses::new()));
    }

    Ok(Json(state.catalog_service().sample_courses(&subject).await?))
}

/// POST /api/random_courses/
pub async fn random_courses(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.catalog_service().random_courses().await?))
}

/// POST /api/course_info/
pub async fn course_info(
    State(state): State<Arc<AppState>>,
    form: Result<Form<CourseInfoForm>, FormRejection>,
) -> Result<Json<CourseInfoResponse>, ApiError> {
    let key = form_value(form, |f| f.course_id);

    match state.catalog_service().course_info(&key).await {
        Ok(info) => Ok(Json(CourseInfoResponse {
            success: true,
            info: Some(info),
        })),
        Err(CatalogError::CourseNotFound(_)) => Ok(Json(CourseInfoResponse {
            success: false,
            info: None,
        })),
        Err(e) => Err(e.into()),
    }
}
