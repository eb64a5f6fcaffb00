use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::state::SharedState;

mod accounts;
pub mod auth;
mod catalog;
mod error;
mod observability;
mod preferences;
mod types;

pub use auth::CurrentUser;
pub use error::ApiError;
pub use types::*;

use tokio::sync::RwLock;

use crate::services::{AccountService, CatalogService, PreferenceService};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn account_service(&self) -> &Arc<dyn AccountService> {
        &self.shared.account_service
    }

    #[must_use]
    pub fn preference_service(&self) -> &Arc<dyn PreferenceService> {
        &self.shared.preference_service
    }

    #[must_use]
    pub fn catalog_service(&self) -> &Arc<dyn CatalogService> {
        &self.shared.catalog_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let (cors_origins, secure_cookies, session_expiry_minutes) = {
        let config = state.config().read().await;
        (
            config.server.cors_allowed_origins.clone(),
            config.server.secure_cookies,
            config.server.session_expiry_minutes,
        )
    };

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            session_expiry_minutes,
        )));

    let api_router = Router::new()
        .route("/subjects/", get(catalog::list_subjects))
        .route("/courses/", get(catalog::list_courses))
        .route("/sample_courses/", post(catalog::sample_courses))
        .route("/random_courses/", post(catalog::random_courses))
        .merge(create_protected_api_router(state.clone()));

    let accounts_router = Router::new()
        .route("/signup/", post(auth::signup))
        .route("/login/", post(auth::login))
        .route("/logout/", get(auth::logout).post(auth::logout))
        .merge(create_protected_accounts_router(state.clone()));

    let cors_layer = if cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .nest("/accounts", accounts_router)
        .route("/health", get(observability::health))
        .merge(
            Router::new()
                .route("/metrics", get(observability::get_metrics))
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth::auth_middleware,
                )),
        )
        .route_layer(middleware::from_fn(observability::track_metrics))
        .layer(session_layer)
        .with_state(state)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

fn create_protected_api_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/enrolled_courses/", get(preferences::enrolled_courses))
        .route("/liked_subjects/", get(preferences::liked_subjects))
        .route("/disliked_courses/", get(preferences::disliked_courses))
        .route("/completed_courses/", get(preferences::completed_courses))
        .route(
            "/like_subject/",
            post(preferences::like_subject).get(preferences::not_a_post),
        )
        .route(
            "/dislike_course/",
            post(preferences::dislike_course).get(preferences::not_a_post),
        )
        .route(
            "/complete_course/",
            post(preferences::complete_course).get(preferences::not_a_post),
        )
        .route(
            "/add_course/",
            post(preferences::add_course).get(preferences::not_a_post),
        )
        .route(
            "/drop_course/",
            post(preferences::drop_course).get(preferences::not_a_post),
        )
        .route(
            "/course_info/",
            post(catalog::course_info).get(preferences::not_a_post),
        )
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}

fn create_protected_accounts_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/me/", get(auth::current_user))
        .route("/change_password/", post(accounts::change_password))
        .route("/change_email/", post(accounts::change_email))
        .route("/deactivate_account/", get(accounts::deactivate_account))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
