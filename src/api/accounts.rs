use axum::{
    Extension, Form, Json,
    extract::State,
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::{CurrentUser, end_session, redirect_found};
use super::{ApiError, ApiResponse, AppState, MessageResponse};
use crate::constants::routes;
use crate::services::UserInfo;

#[derive(Deserialize)]
pub struct ChangePasswordForm {
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
}

#[derive(Deserialize)]
pub struct ChangeEmailForm {
    #[serde(default)]
    pub new_email: String,
}

/// POST /accounts/change_password/
/// The session stays valid; only the stored hash changes.
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<ChangePasswordForm>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .account_service()
        .change_password(user.id, &form.password, &form.password_confirm)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Password updated successfully",
    ))))
}

/// POST /accounts/change_email/
pub async fn change_email(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<ChangeEmailForm>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let updated = state
        .account_service()
        .change_email(user.id, &form.new_email)
        .await?;

    Ok(Json(ApiResponse::success(updated)))
}

/// GET /accounts/deactivate_account/
/// Deactivates the caller, ends the session and redirects home.
pub async fn deactivate_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    session: Session,
) -> Result<Response, ApiError> {
    state.account_service().deactivate(user.id).await?;
    end_session(&session).await;

    Ok(redirect_found(routes::HOME))
}
