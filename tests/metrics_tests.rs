//! Runs in its own binary because it installs the global metrics recorder.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use courseowl::config::Config;
use courseowl::db::Store;
use courseowl::state::SharedState;
use http_body_util::BodyExt;
use metrics_exporter_prometheus::PrometheusBuilder;
use tower::ServiceExt;

#[tokio::test]
async fn test_request_metrics_use_route_templates() {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install recorder");

    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.server.secure_cookies = false;
    let store = Store::with_pool_options(&config.general.database_path, 1, 1)
        .await
        .unwrap();
    let shared = Arc::new(SharedState::with_store(config, store));
    let app = courseowl::api::router(courseowl::api::create_app_state(shared, Some(handle))).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/accounts/signup/")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(
                    "email=owl@example.com&password=hunter22hunter&password_confirm=hunter22hunter",
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    for uri in ["/api/subjects/", "/no/such/page"] {
        app.clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
    }

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let rendered = String::from_utf8(body.to_vec()).unwrap();

    assert!(rendered.contains("http_requests_total"), "{rendered}");
    assert!(rendered.contains(r#"path="/api/subjects/""#), "{rendered}");
    assert!(rendered.contains(r#"path="/accounts/signup/""#), "{rendered}");
    // Unmatched paths would give the label unbounded cardinality.
    assert!(!rendered.contains("/no/such/page"), "{rendered}");
}
