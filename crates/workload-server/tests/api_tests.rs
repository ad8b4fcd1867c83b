//! Integration tests for the HTTP surface.
//!
//! Requests go through the full router via `oneshot`. TTL behaviour runs on a
//! paused tokio clock.

use axum::{
    body::Body,
    http::{header::AUTHORIZATION, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;
use workload_server::config::Settings;
use workload_server::{build_router, AppState};

fn create_test_app() -> Router {
    build_router(AppState::new(&Settings::default()))
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(request).await.unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed(method: &str, uri: &str, token: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn login(app: &Router, username: &str) -> String {
    let body = json!({ "username": username, "password": "x" }).to_string();
    let response = send(app, post_json("/login", &body)).await;
    assert_eq!(response.status(), StatusCode::OK, "login should succeed");
    body_json(response).await["token"]
        .as_str()
        .expect("token should be a string")
        .to_string()
}

async fn scrape_active(app: &Router) -> u64 {
    let response = send(
        app,
        Request::builder().uri("/metrics").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let text = String::from_utf8(body_bytes(response).await).unwrap();
    text.lines()
        .find_map(|l| l.strip_prefix("concurrent_connections "))
        .expect("gauge line present")
        .parse()
        .unwrap()
}

#[tokio::test]
async fn test_login_browse_metrics_scenario() {
    let app = create_test_app();

    let response = send(
        &app,
        post_json("/login", r#"{"username":"alice","password":"x"}"#),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let token = json["token"].as_str().unwrap().to_string();
    assert!(uuid::Uuid::parse_str(&token).is_ok(), "token should be a UUID");

    let response = send(&app, authed("GET", "/browse", &token, "")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"status": "success", "data": ["Product A", "Product B", "Product C"]})
    );

    let response = send(
        &app,
        Request::builder().uri("/metrics").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/plain; version=0.0.4"
    );
    let text = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(text.contains("concurrent_connections 1"));
    assert!(text.starts_with("# HELP concurrent_connections "));
    assert!(text.contains("# TYPE concurrent_connections gauge"));
}

#[tokio::test]
async fn test_login_requires_post() {
    let app = create_test_app();
    let response = send(
        &app,
        Request::builder().uri("/login").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_login_rejects_empty_username_regardless_of_password() {
    let app = create_test_app();
    for body in [
        r#"{"username":"","password":"secret"}"#,
        r#"{"username":"","password":""}"#,
        r#"{"password":"secret"}"#,
        r#"{}"#,
    ] {
        let response = send(&app, post_json("/login", body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);
    }
}

#[tokio::test]
async fn test_login_accepts_any_password() {
    let app = create_test_app();
    for body in [
        r#"{"username":"bob","password":""}"#,
        r#"{"username":"bob"}"#,
        r#"{"username":"bob","password":"hunter2"}"#,
    ] {
        let response = send(&app, post_json("/login", body)).await;
        assert_eq!(response.status(), StatusCode::OK, "body: {}", body);
    }
}

#[tokio::test]
async fn test_login_accepts_capitalized_keys() {
    let app = create_test_app();
    let response = send(
        &app,
        post_json("/login", r#"{"Username":"alice","Password":"x"}"#),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let token = body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = send(&app, authed("GET", "/browse", &token, "")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_rejects_malformed_body() {
    let app = create_test_app();
    let response = send(&app, post_json("/login", "{not json")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Invalid request body");
}

#[tokio::test]
async fn test_login_tokens_are_distinct() {
    let app = create_test_app();
    let mut seen = std::collections::HashSet::new();
    for i in 0..200 {
        assert!(seen.insert(login(&app, &format!("user-{}", i)).await));
    }
}

#[tokio::test]
async fn test_unknown_token_is_unauthorized() {
    let app = create_test_app();
    let never_issued = uuid::Uuid::new_v4().to_string();

    let response = send(&app, authed("GET", "/browse", &never_issued, "")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, authed("POST", "/submit", &never_issued, "{}")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        Request::builder().uri("/browse").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_submit_auth_precedes_body_parsing() {
    let app = create_test_app();
    let response = send(&app, post_json("/submit", "{{{ malformed")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_submit_get_is_method_not_allowed() {
    let app = create_test_app();
    let token = login(&app, "alice").await;

    let response = send(&app, authed("GET", "/submit", &token, "")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_submit_accepts_arbitrary_object() {
    let app = create_test_app();
    let token = login(&app, "alice").await;

    let payload = json!({"order": 42, "items": [{"sku": "A", "qty": 2}], "note": null});
    let response = send(&app, authed("POST", "/submit", &token, &payload.to_string())).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"status": "success", "message": "Data submitted successfully"})
    );
}

#[tokio::test]
async fn test_submit_rejects_malformed_body_when_authenticated() {
    let app = create_test_app();
    let token = login(&app, "alice").await;

    for body in ["", "not json", "[1, 2, 3]", "\"text\""] {
        let response = send(&app, authed("POST", "/submit", &token, body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {:?}", body);
    }
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let app = create_test_app();
    let token = login(&app, "alice").await;

    for method in ["GET", "POST", "DELETE"] {
        let response = send(&app, authed(method, "/unknown-path", &token, "")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(
            &app,
            Request::builder()
                .method(method)
                .uri("/unknown-path")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    let response = send(
        &app,
        Request::builder().uri("/login/extra").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Unsupported path");
}

#[tokio::test]
async fn test_metrics_counts_logins() {
    let app = create_test_app();
    assert_eq!(scrape_active(&app).await, 0);

    for i in 0..5 {
        login(&app, &format!("user-{}", i)).await;
    }
    assert_eq!(scrape_active(&app).await, 5);
    assert_eq!(scrape_active(&app).await, 5);
}

#[tokio::test(start_paused = true)]
async fn test_token_valid_until_ttl_boundary() {
    let app = create_test_app();
    let token = login(&app, "alice").await;

    tokio::time::advance(Duration::from_secs(119)).await;
    let response = send(&app, authed("GET", "/browse", &token, "")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = send(&app, authed("POST", "/submit", &token, "{}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    tokio::time::advance(Duration::from_secs(1)).await;
    let response = send(&app, authed("GET", "/browse", &token, "")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let response = send(&app, authed("POST", "/submit", &token, "{}")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test(start_paused = true)]
async fn test_metrics_sweep_after_expiry_is_idempotent() {
    let app = create_test_app();
    for i in 0..4 {
        login(&app, &format!("user-{}", i)).await;
    }
    assert_eq!(scrape_active(&app).await, 4);

    tokio::time::advance(Duration::from_secs(121)).await;
    assert_eq!(scrape_active(&app).await, 0);
    assert_eq!(scrape_active(&app).await, 0);
}

#[tokio::test]
async fn test_raw_token_without_prefix_is_accepted_by_default() {
    let app = create_test_app();
    let token = login(&app, "alice").await;

    let response = send(
        &app,
        Request::builder()
            .uri("/browse")
            .header(AUTHORIZATION, token)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_strict_bearer_prefix_rejects_raw_token() {
    let mut settings = Settings::default();
    settings.auth.require_bearer_prefix = true;
    let app = build_router(AppState::new(&settings));
    let token = login(&app, "alice").await;

    let response = send(
        &app,
        Request::builder()
            .uri("/browse")
            .header(AUTHORIZATION, token.clone())
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, authed("GET", "/browse", &token, "")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_endpoints_work_under_load() {
    let mut settings = Settings::default();
    settings.load.cpu_iterations = 50_000;
    settings.load.memory_mb = 1;
    let app = build_router(AppState::new(&settings));

    let token = login(&app, "alice").await;
    let response = send(&app, authed("GET", "/browse", &token, "")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = send(&app, authed("POST", "/submit", &token, r#"{"k":"v"}"#)).await;
    assert_eq!(response.status(), StatusCode::OK);
}
