use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::services::{AccountError, CatalogError, PreferenceError};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    DatabaseError(String),

    ValidationError(String),

    Conflict(String),

    InternalError(String),

    Unauthorized(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::InvalidEmail | AccountError::InvalidPassword(_) => {
                ApiError::ValidationError(err.to_string())
            }
            AccountError::EmailTaken => ApiError::Conflict(err.to_string()),
            AccountError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AccountError::UserNotFound => ApiError::Unauthorized("Not authenticated".to_string()),
            AccountError::Database(msg) => ApiError::DatabaseError(msg),
            AccountError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<PreferenceError> for ApiError {
    fn from(err: PreferenceError) -> Self {
        match err {
            PreferenceError::SubjectNotFound(_)
            | PreferenceError::CourseNotFound(_)
            | PreferenceError::ProfileNotFound(_) => ApiError::NotFound(err.to_string()),
            PreferenceError::Database(msg) => ApiError::DatabaseError(msg),
            PreferenceError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::CourseNotFound(_) => ApiError::NotFound(err.to_string()),
            CatalogError::Database(msg) => ApiError::DatabaseError(msg),
            CatalogError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }

    pub fn unauthorized() -> Self {
        ApiError::Unauthorized("Not authenticated".to_string())
    }
}
