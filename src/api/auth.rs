use axum::{
    Extension, Form, Json,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, AppState};
use crate::constants::{routes, session::USER_ID_KEY};
use crate::services::UserInfo;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    /// Derived username or email address.
    #[serde(default, alias = "email")]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// The authenticated caller, injected by [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i32,
    pub username: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Rejects requests without a session for an active user and hands the
/// user to the handler as an `Extension<CurrentUser>`.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(user_id) = session_user_id(&session).await? else {
        return Err(ApiError::unauthorized());
    };

    let Some(user) = state.account_service().get_user(user_id).await? else {
        // Deactivated or deleted since the session was created.
        end_session(&session).await;
        return Err(ApiError::unauthorized());
    };

    tracing::Span::current().record("user_id", user.id);
    request.extensions_mut().insert(CurrentUser {
        id: user.id,
        username: user.username,
    });

    Ok(next.run(request).await)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /accounts/signup/
/// Create an account and log it in
pub async fn signup(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<SignupForm>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let user = state
        .account_service()
        .register(&form.email, &form.password, &form.password_confirm)
        .await?;

    start_session(&session, user.id).await?;

    Ok(Json(ApiResponse::success(user)))
}

/// POST /accounts/login/
/// Authenticate with username or email and password
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    if form.username.trim().is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if form.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let user = state
        .account_service()
        .authenticate(&form.username, &form.password)
        .await?;

    start_session(&session, user.id).await?;

    Ok(Json(ApiResponse::success(user)))
}

/// GET|POST /accounts/logout/
pub async fn logout(session: Session) -> Response {
    end_session(&session).await;
    redirect_found(routes::HOME)
}

/// GET /accounts/me/
pub async fn current_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let info = state
        .account_service()
        .get_user(user.id)
        .await?
        .ok_or_else(ApiError::unauthorized)?;

    Ok(Json(ApiResponse::success(info)))
}

// ============================================================================
// Helpers
// ============================================================================

async fn session_user_id(session: &Session) -> Result<Option<i32>, ApiError> {
    session
        .get::<i32>(USER_ID_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))
}

async fn start_session(session: &Session, user_id: i32) -> Result<(), ApiError> {
    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to rotate session: {e}")))?;

    session
        .insert(USER_ID_KEY, user_id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))
}

pub(super) async fn end_session(session: &Session) {
    if let Err(e) = session.flush().await {
        tracing::warn!("Failed to flush session: {e}");
    }
}

/// `302 Found`; axum's `Redirect` only offers 303/307/308.
pub(super) fn redirect_found(location: &'static str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}
