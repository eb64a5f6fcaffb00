use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use courseowl::config::Config;
use courseowl::db::{NewCourse, Store};
use courseowl::state::SharedState;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const EMAIL: &str = "owl@example.com";
const PASSWORD: &str = "hunter22hunter";

fn test_config() -> Config {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;
    config.server.secure_cookies = false;
    config.observability.metrics_enabled = false;
    config
}

/// Pottery has three courses, Woodworking has one.
async fn seed_catalog(store: &Store) {
    let pottery = store.create_subject("Pottery").await.unwrap();
    let woodworking = store.create_subject("Woodworking").await.unwrap();
    let provider = store.create_provider("Coursera").await.unwrap();

    let courses = [
        ("Intro to Clay", Some(provider.id), pottery.id),
        ("Glazing", None, pottery.id),
        ("Wheel Throwing", None, pottery.id),
        ("Joinery", Some(provider.id), woodworking.id),
    ];

    for (name, provider_id, subject_id) in courses {
        let course = store
            .create_course(NewCourse {
                name: name.to_string(),
                description: format!("All about {name}"),
                instructor: "Ada".to_string(),
                provider_id,
                url: format!("https://example.com/{}", name.replace(' ', "-")),
            })
            .await
            .unwrap();
        store.tag_course(course.id, subject_id).await.unwrap();
    }
}

async fn spawn_app() -> Router {
    let config = test_config();
    let store = Store::with_pool_options(&config.general.database_path, 1, 1)
        .await
        .expect("Failed to open database");
    seed_catalog(&store).await;

    let shared = Arc::new(SharedState::with_store(config, store));
    let state = courseowl::api::create_app_state(shared, None);
    courseowl::api::router(state).await
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, form: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(form.to_string())).unwrap()
}

async fn body_json(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn session_cookie(response: &Response) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("response should set a session cookie")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

async fn signup(app: &Router, email: &str) -> String {
    let form = format!("email={email}&password={PASSWORD}&password_confirm={PASSWORD}");
    let response = app
        .clone()
        .oneshot(post_form("/accounts/signup/", &form, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    session_cookie(&response)
}

async fn call(app: &Router, request: Request<Body>) -> Value {
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

#[tokio::test]
async fn test_catalog_listings_are_public() {
    let app = spawn_app().await;

    let subjects = call(&app, get("/api/subjects/", None)).await;
    assert_eq!(subjects, json!(["Pottery", "Woodworking"]));

    let courses = call(&app, get("/api/courses/", None)).await;
    assert_eq!(
        courses,
        json!(["Intro to Clay", "Glazing", "Wheel Throwing", "Joinery"])
    );
}

#[tokio::test]
async fn test_sample_courses() {
    let app = spawn_app().await;

    let sample = call(&app, post_form("/api/sample_courses/", "subject=Pottery", None)).await;
    let sample = sample.as_object().unwrap();
    assert_eq!(sample.len(), 3);
    assert_eq!(
        sample["Intro to Clay"],
        json!(["All about Intro to Clay", "Coursera"])
    );
    assert_eq!(sample["Glazing"], json!(["All about Glazing", null]));

    let unknown = call(&app, post_form("/api/sample_courses/", "subject=Alchemy", None)).await;
    assert_eq!(unknown, json!({}));

    let missing = call(&app, post_form("/api/sample_courses/", "", None)).await;
    assert_eq!(missing, json!({}));
}

#[tokio::test]
async fn test_random_courses_are_distinct_catalog_names() {
    let app = spawn_app().await;

    let picked = call(&app, post_form("/api/random_courses/", "", None)).await;
    let picked: Vec<String> = serde_json::from_value(picked).unwrap();

    // Five requested, four in the catalog.
    assert_eq!(picked.len(), 4);
    let mut unique = picked.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), picked.len());
}

#[tokio::test]
async fn test_protected_endpoints_require_session() {
    let app = spawn_app().await;

    for uri in [
        "/api/enrolled_courses/",
        "/api/liked_subjects/",
        "/api/disliked_courses/",
        "/api/completed_courses/",
        "/accounts/me/",
    ] {
        let response = app.clone().oneshot(get(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }

    let response = app
        .clone()
        .oneshot(post_form("/api/add_course/", "course_to_add=Glazing", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(get("/api/enrolled_courses/", Some("id=not-a-session")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_is_public() {
    let app = spawn_app().await;

    let health = call(&app, get("/health", None)).await;
    assert_eq!(health["success"], true);
    assert_eq!(health["data"]["status"], "ok");
}

#[tokio::test]
async fn test_signup_then_login() {
    let app = spawn_app().await;
    let cookie = signup(&app, EMAIL).await;

    let me = call(&app, get("/accounts/me/", Some(&cookie))).await;
    assert_eq!(me["data"]["email"], EMAIL);
    let username = me["data"]["username"].as_str().unwrap().to_string();
    assert_eq!(username.len(), 30);

    // Duplicate email
    let form = format!("email={EMAIL}&password={PASSWORD}&password_confirm={PASSWORD}");
    let response = app
        .clone()
        .oneshot(post_form("/accounts/signup/", &form, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Login by email and by derived username
    for login in [EMAIL, username.as_str()] {
        let form = format!("username={login}&password={PASSWORD}");
        let response = app
            .clone()
            .oneshot(post_form("/accounts/login/", &form, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = session_cookie(&response);
        let me = call(&app, get("/accounts/me/", Some(&cookie))).await;
        assert_eq!(me["data"]["email"], EMAIL);
        assert!(me["data"]["last_login"].is_string());
    }

    let form = format!("username={EMAIL}&password=wrong-password");
    let response = app
        .clone()
        .oneshot(post_form("/accounts/login/", &form, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signup_validation() {
    let app = spawn_app().await;

    let cases = [
        "email=not-an-email&password=hunter22hunter&password_confirm=hunter22hunter",
        "email=a@example.com&password=short&password_confirm=short",
        "email=a@example.com&password=hunter22hunter&password_confirm=hunter33hunter",
        "email=&password=hunter22hunter&password_confirm=hunter22hunter",
    ];

    for form in cases {
        let response = app
            .clone()
            .oneshot(post_form("/accounts/signup/", form, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{form}");
    }
}

#[tokio::test]
async fn test_preferences_flow() {
    let app = spawn_app().await;
    let cookie = signup(&app, EMAIL).await;
    let cookie = Some(cookie.as_str());

    assert_eq!(
        call(&app, get("/api/enrolled_courses/", cookie)).await,
        json!([])
    );

    let liked = call(
        &app,
        post_form("/api/like_subject/", "liked_subject=Pottery", cookie),
    )
    .await;
    assert_eq!(liked, json!({"success": true}));

    let liked = call(
        &app,
        post_form("/api/like_subject/", "liked_subject=Alchemy", cookie),
    )
    .await;
    assert_eq!(liked, json!({"success": false}));

    assert_eq!(
        call(&app, get("/api/liked_subjects/", cookie)).await,
        json!(["Pottery"])
    );

    let disliked = call(
        &app,
        post_form("/api/dislike_course/", "disliked_course=Joinery", cookie),
    )
    .await;
    assert_eq!(disliked, json!({"success": true}));
    assert_eq!(
        call(&app, get("/api/disliked_courses/", cookie)).await,
        json!(["Joinery"])
    );

    let completed = call(
        &app,
        post_form("/api/complete_course/", "completed_course=Glazing", cookie),
    )
    .await;
    assert_eq!(completed, json!({"success": true}));
    let completed = call(
        &app,
        post_form("/api/complete_course/", "completed_course=Nope", cookie),
    )
    .await;
    assert_eq!(completed, json!({"success": false}));
    assert_eq!(
        call(&app, get("/api/completed_courses/", cookie)).await,
        json!(["Glazing"])
    );

    for course in ["Wheel Throwing", "Intro to Clay", "Wheel Throwing"] {
        let added = call(
            &app,
            post_form(
                "/api/add_course/",
                &format!("course_to_add={}", course.replace(' ', "+")),
                cookie,
            ),
        )
        .await;
        assert_eq!(added, json!({"success": true}));
    }
    assert_eq!(
        call(&app, get("/api/enrolled_courses/", cookie)).await,
        json!(["Wheel Throwing", "Intro to Clay"])
    );

    let dropped = call(
        &app,
        post_form("/api/drop_course/", "course_to_drop=Wheel+Throwing", cookie),
    )
    .await;
    assert_eq!(dropped, json!({"success": true}));
    let dropped = call(&app, post_form("/api/drop_course/", "", cookie)).await;
    assert_eq!(dropped, json!({"success": false}));
    assert_eq!(
        call(&app, get("/api/enrolled_courses/", cookie)).await,
        json!(["Intro to Clay"])
    );

    // Lists stay separate
    assert_eq!(
        call(&app, get("/api/completed_courses/", cookie)).await,
        json!(["Glazing"])
    );
}

fn post_raw(uri: &str, content_type: Option<&str>, body: &str, cookie: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::COOKIE, cookie);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn test_unreadable_forms_report_failure() {
    let app = spawn_app().await;
    let cookie = signup(&app, EMAIL).await;

    for uri in [
        "/api/like_subject/",
        "/api/dislike_course/",
        "/api/complete_course/",
        "/api/add_course/",
        "/api/drop_course/",
        "/api/course_info/",
    ] {
        let response = call(&app, post_raw(uri, None, "", &cookie)).await;
        assert_eq!(response, json!({"success": false}), "{uri}");

        let response = call(&app, post_raw(uri, Some("application/json"), "{}", &cookie)).await;
        assert_eq!(response, json!({"success": false}), "{uri}");
    }

    let response = call(
        &app,
        post_form(
            "/api/like_subject/",
            "liked_subject=1&liked_subject=2",
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response, json!({"success": false}));
    assert_eq!(
        call(&app, get("/api/liked_subjects/", Some(&cookie))).await,
        json!([])
    );

    let response = call(&app, post_raw("/api/sample_courses/", None, "", &cookie)).await;
    assert_eq!(response, json!({}));
}

#[tokio::test]
async fn test_get_on_mutation_endpoint_changes_nothing() {
    let app = spawn_app().await;
    let cookie = signup(&app, EMAIL).await;
    let cookie = Some(cookie.as_str());

    let response = call(&app, get("/api/add_course/?course_to_add=Glazing", cookie)).await;
    assert_eq!(response, json!({"success": false}));

    assert_eq!(
        call(&app, get("/api/enrolled_courses/", cookie)).await,
        json!([])
    );
}

#[tokio::test]
async fn test_course_info() {
    let app = spawn_app().await;
    let cookie = signup(&app, EMAIL).await;
    let cookie = Some(cookie.as_str());

    let info = call(
        &app,
        post_form("/api/course_info/", "course_id=Intro+to+Clay", cookie),
    )
    .await;
    assert_eq!(info["success"], true);
    assert_eq!(info["info"]["name"], "Intro to Clay");
    assert_eq!(info["info"]["provider"], "Coursera");
    assert_eq!(info["info"]["instructor"], "Ada");
    assert_eq!(info["info"]["url"], "https://example.com/Intro-to-Clay");

    let info = call(&app, post_form("/api/course_info/", "course_id=2", cookie)).await;
    assert_eq!(info["info"]["name"], "Glazing");
    assert!(info["info"]["provider"].is_null());

    let info = call(&app, post_form("/api/course_info/", "course_id=Nope", cookie)).await;
    assert_eq!(info, json!({"success": false}));
}

#[tokio::test]
async fn test_change_password() {
    let app = spawn_app().await;
    let cookie = signup(&app, EMAIL).await;

    let response = app
        .clone()
        .oneshot(post_form(
            "/accounts/change_password/",
            "password=newpass123&password_confirm=newpass456",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // A rejected change keeps the old password.
    let form = "username=owl@example.com&password=newpass123";
    let response = app
        .clone()
        .oneshot(post_form("/accounts/login/", form, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let form = format!("username={EMAIL}&password={PASSWORD}");
    let response = app
        .clone()
        .oneshot(post_form("/accounts/login/", &form, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = call(
        &app,
        post_form(
            "/accounts/change_password/",
            "password=newpass123&password_confirm=newpass123",
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response["success"], true);

    let form = format!("username={EMAIL}&password={PASSWORD}");
    let response = app
        .clone()
        .oneshot(post_form("/accounts/login/", &form, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let form = format!("username={EMAIL}&password=newpass123");
    let response = app
        .clone()
        .oneshot(post_form("/accounts/login/", &form, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_change_email() {
    let app = spawn_app().await;
    let cookie = signup(&app, EMAIL).await;
    signup(&app, "taken@example.com").await;

    let cases = [
        ("new_email=", StatusCode::BAD_REQUEST),
        ("new_email=nope", StatusCode::BAD_REQUEST),
        ("new_email=taken@example.com", StatusCode::CONFLICT),
    ];
    for (form, status) in cases {
        let response = app
            .clone()
            .oneshot(post_form("/accounts/change_email/", form, Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), status, "{form}");

        let me = call(&app, get("/accounts/me/", Some(&cookie))).await;
        assert_eq!(me["data"]["email"], EMAIL, "{form}");
    }

    let updated = call(
        &app,
        post_form(
            "/accounts/change_email/",
            "new_email=fresh@example.com",
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(updated["data"]["email"], "fresh@example.com");

    let form = format!("username=fresh@example.com&password={PASSWORD}");
    let response = app
        .clone()
        .oneshot(post_form("/accounts/login/", &form, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_deactivate_account() {
    let app = spawn_app().await;
    let cookie = signup(&app, EMAIL).await;

    let response = app
        .clone()
        .oneshot(get("/accounts/deactivate_account/", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/");

    let response = app
        .clone()
        .oneshot(get("/accounts/me/", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let form = format!("username={EMAIL}&password={PASSWORD}");
    let response = app
        .clone()
        .oneshot(post_form("/accounts/login/", &form, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The address stays reserved
    let form = format!("email={EMAIL}&password={PASSWORD}&password_confirm={PASSWORD}");
    let response = app
        .clone()
        .oneshot(post_form("/accounts/signup/", &form, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = spawn_app().await;
    let cookie = signup(&app, EMAIL).await;

    let response = app
        .clone()
        .oneshot(get("/accounts/logout/", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);

    let response = app
        .clone()
        .oneshot(get("/api/enrolled_courses/", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_app_from_config_starts_empty() {
    let state = courseowl::api::create_app_state_from_config(test_config(), None)
        .await
        .expect("Failed to create app state");
    let app = courseowl::api::router(state).await;

    assert_eq!(call(&app, get("/api/subjects/", None)).await, json!([]));
    assert_eq!(
        call(&app, post_form("/api/random_courses/", "", None)).await,
        json!([])
    );
}
