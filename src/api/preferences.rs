//! Handlers for the caller's relationship sets.
//!
//! Mutations answer `{"success": bool}`; an unknown subject or course is
//! `false`, never an error status.

use axum::{
    Extension, Form, Json,
    extract::{State, rejection::FormRejection},
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, AppState, SuccessResponse};
use crate::services::PreferenceError;

#[derive(Deserialize)]
pub struct LikeSubjectForm {
    pub liked_subject: Option<String>,
}

#[derive(Deserialize)]
pub struct DislikeCourseForm {
    pub disliked_course: Option<String>,
}

#[derive(Deserialize)]
pub struct CompleteCourseForm {
    pub completed_course: Option<String>,
}

#[derive(Deserialize)]
pub struct AddCourseForm {
    pub course_to_add: Option<String>,
}

#[derive(Deserialize)]
pub struct DropCourseForm {
    pub course_to_drop: Option<String>,
}

fn outcome(result: Result<(), PreferenceError>) -> Result<Json<SuccessResponse>, ApiError> {
    match result {
        Ok(()) => Ok(Json(SuccessResponse::new(true))),
        Err(e) if e.is_missing_target() => {
            tracing::debug!("Preference target missing: {e}");
            Ok(Json(SuccessResponse::new(false)))
        }
        Err(e) => Err(e.into()),
    }
}

/// A body that is missing or cannot be decoded reads as an empty key, which
/// resolves to nothing.
pub(super) fn form_value<T>(
    form: Result<Form<T>, FormRejection>,
    field: impl FnOnce(T) -> Option<String>,
) -> String {
    match form {
        Ok(Form(form)) => field(form).unwrap_or_default(),
        Err(rejection) => {
            tracing::debug!("Unreadable form body: {rejection}");
            String::new()
        }
    }
}

/// GET on a mutation endpoint changes nothing.
pub async fn not_a_post() -> Json<SuccessResponse> {
    Json(SuccessResponse::new(false))
}

/// POST /api/like_subject/
pub async fn like_subject(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    form: Result<Form<LikeSubjectForm>, FormRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let key = form_value(form, |f| f.liked_subject);
    outcome(state.preference_service().like_subject(user.id, &key).await)
}

/// POST /api/dislike_course/
pub async fn dislike_course(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    form: Result<Form<DislikeCourseForm>, FormRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let key = form_value(form, |f| f.disliked_course);
    outcome(state.preference_service().dislike_course(user.id, &key).await)
}

/// POST /api/complete_course/
pub async fn complete_course(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    form: Result<Form<CompleteCourseForm>, FormRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let key = form_value(form, |f| f.completed_course);
    outcome(state.preference_service().complete_course(user.id, &key).await)
}

/// POST /api/add_course/
pub async fn add_course(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    form: Result<Form<AddCourseForm>, FormRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let key = form_value(form, |f| f.course_to_add);
    outcome(state.preference_service().add_course(user.id, &key).await)
}

/// POST /api/drop_course/
pub async fn drop_course(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    form: Result<Form<DropCourseForm>, FormRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let key = form_value(form, |f| f.course_to_drop);
    outcome(state.preference_service().drop_course(user.id, &key).await)
}

/// GET /api/enrolled_courses/
pub async fn enrolled_courses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(
        state.preference_service().enrolled_courses(user.id).await?,
    ))
}

/// GET /api/liked_subjects/
pub async fn liked_subjects(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.preference_service().liked_subjects(user.id).await?))
}

/// GET /api/disliked_courses/
pub async fn disliked_courses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(
        state.preference_service().disliked_courses(user.id).await?,
    ))
}

/// GET /api/completed_courses/
pub async fn completed_courses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(
        state.preference_service().completed_courses(user.id).await?,
    ))
}
