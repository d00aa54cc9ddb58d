//! End-to-end tests for the IDOR lab endpoints.
//!
//! The router is driven in-process with `oneshot`; nothing binds a socket.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use seclab_core::fetch::RecordingFetcher;
use seclab_core::resolve::StaticResolver;
use seclab_core::web::{router, AppState};
use seclab_core::{DomainAllowlist, RecordStore, UrlValidator};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let validator = UrlValidator::new(DomainAllowlist::default(), Arc::new(StaticResolver::new()));
    let fetcher = Arc::new(RecordingFetcher::new(json!({})));
    router(AppState::new(RecordStore::seeded(), validator, fetcher))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn login(app: &Router, user_id: &str) -> String {
    let (status, body) = send(
        app,
        post_json("/api/lab1/fixed/login", &json!({ "userId": user_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn vulnerable_lookup_serves_any_record_without_credential() {
    let app = app();

    let (status, body) = send(&app, get("/api/lab1/vulnerable/users/2", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "2");
    assert_eq!(body["name"], "Taylor");
    assert_eq!(body["privateApiKey"], "sk_live_taylor_67890ghijkl");
}

#[tokio::test]
async fn vulnerable_lookup_unknown_id_is_404() {
    let app = app();

    let (status, body) = send(&app, get("/api/lab1/vulnerable/users/999", None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "User not found");
    assert_eq!(body["kind"], "NotFound");
}

#[tokio::test]
async fn login_returns_token_and_identity() {
    let app = app();

    let (status, body) = send(
        &app,
        post_json("/api/lab1/fixed/login", &json!({ "userId": "1" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["id"], "1");
    assert_eq!(body["name"], "Jordan");
    let token = body["token"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(token).is_ok());
}

#[tokio::test]
async fn login_accepts_identifier_alias() {
    let app = app();

    let (status, body) = send(
        &app,
        post_json("/api/lab1/fixed/login", &json!({ "identifier": "3" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Morgan");
}

#[tokio::test]
async fn login_unknown_user_is_404() {
    let app = app();

    let (status, body) = send(
        &app,
        post_json("/api/lab1/fixed/login", &json!({ "userId": "42" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn login_without_user_id_is_400() {
    let app = app();

    for payload in [json!({}), json!({ "userId": "" }), json!({ "userId": "  " })] {
        let (status, body) = send(&app, post_json("/api/lab1/fixed/login", &payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
        assert_eq!(body["kind"], "FieldRequired");
        assert_eq!(body["error"], "userId is required");
    }
}

#[tokio::test]
async fn login_with_malformed_body_is_400() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/lab1/fixed/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "FieldRequired");
}

#[tokio::test]
async fn fixed_lookup_without_credential_is_401() {
    let app = app();

    let (status, body) = send(&app, get("/api/lab1/fixed/users/1", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication required");
    assert_eq!(body["kind"], "Unauthenticated");
}

#[tokio::test]
async fn fixed_lookup_with_unknown_token_is_401() {
    let app = app();
    let forged = uuid::Uuid::new_v4().to_string();

    let (status, _) = send(&app, get("/api/lab1/fixed/users/1", Some(&forged))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn owner_reads_own_record_including_api_key() {
    let app = app();
    let token = login(&app, "1").await;

    let (status, body) = send(&app, get("/api/lab1/fixed/users/1", Some(&token))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "1");
    assert_eq!(body["walletAddress"], "JrdN1XyBfXJKUd5dNoYz9F4UdaZ1pEMVr9Jv5e7SSYp");
    assert_eq!(body["privateApiKey"], "sk_live_jordan_12345abcdef");
    assert!(body["transactions"].as_array().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn bearer_form_is_accepted() {
    let app = app();
    let token = login(&app, "2").await;
    let bearer = format!("Bearer {token}");

    let (status, body) = send(&app, get("/api/lab1/fixed/users/2", Some(&bearer))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Taylor");
}

#[tokio::test]
async fn idor_scenario_fixed_forbids_vulnerable_leaks() {
    let app = app();
    let token = login(&app, "1").await;

    let (own, _) = send(&app, get("/api/lab1/fixed/users/1", Some(&token))).await;
    assert_eq!(own, StatusCode::OK);

    let (other, body) = send(&app, get("/api/lab1/fixed/users/2", Some(&token))).await;
    assert_eq!(other, StatusCode::FORBIDDEN);
    assert_eq!(
        body["error"],
        "Access denied: You can only access your own data"
    );
    assert!(body.get("privateApiKey").is_none());

    let (leak, body) = send(&app, get("/api/lab1/vulnerable/users/2", None)).await;
    assert_eq!(leak, StatusCode::OK);
    assert_eq!(body["id"], "2");
}

#[tokio::test]
async fn fixed_lookup_of_unknown_id_is_forbidden_not_404() {
    let app = app();
    let token = login(&app, "1").await;

    let (status, _) = send(&app, get("/api/lab1/fixed/users/999", Some(&token))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn each_login_issues_a_fresh_token() {
    let app = app();

    let first = login(&app, "3").await;
    let second = login(&app, "3").await;
    assert_ne!(first, second);

    for token in [&first, &second] {
        let (status, _) = send(&app, get("/api/lab1/fixed/users/3", Some(token))).await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn health_and_unknown_routes_answer_json() {
    let app = app();

    let (status, body) = send(&app, get("/api/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "healthy" }));

    let (status, body) = send(&app, get("/api/nowhere", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "NotFound");

    let (status, body) = send(&app, get("/api/lab1/fixed/login", None)).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["success"], false);
    assert_eq!(body["kind"], "MethodNotAllowed");
    assert_eq!(body["error"], "Method GET not allowed for this endpoint");

    let (status, body) = send(
        &app,
        post_json("/api/lab1/vulnerable/users/1", &json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["kind"], "MethodNotAllowed");
}
