use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use stockportal::{
    config, routes,
    services::{auth_service, user_store::MemoryUserStore},
    AppState,
};
use tower::ServiceExt;

fn test_state() -> AppState {
    let mut settings = config::load();
    settings.itick_api_key = None;
    settings.jwt_secret = "test-secret".to_string();
    settings.bcrypt_cost = 4;

    AppState::new(settings, Arc::new(MemoryUserStore::new()))
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.unwrap();

    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn register(app: &Router, username: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        post_json(
            "/accounts/register",
            json!({ "username": username, "password": password, "email": format!("{username}@example.com") }),
        ),
    )
    .await
}

async fn login(app: &Router, username: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        post_json("/accounts/login", json!({ "username": username, "password": password })),
    )
    .await
}

#[tokio::test]
async fn register_login_and_identity_round_trip() {
    let app = routes::app(test_state());

    let (status, user) = register(&app, "trader_jane", "tickers-4-life").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["username"], "trader_jane");
    assert_eq!(user["email"], "trader_jane@example.com");

    let (status, pair) = login(&app, "trader_jane", "tickers-4-life").await;
    assert_eq!(status, StatusCode::OK);
    let access = pair["access"].as_str().unwrap();
    assert!(pair["refresh"].as_str().is_some());

    let (status, me) = send(&app, get_with_token("/accounts/user", access)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "trader_jane");
    assert_eq!(me["id"], user["id"]);
}

#[tokio::test]
async fn register_response_never_carries_the_password() {
    let app = routes::app(test_state());

    let (status, user) = register(&app, "alice", "correct-horse").await;
    assert_eq!(status, StatusCode::CREATED);

    let obj = user.as_object().unwrap();
    assert!(!obj.contains_key("password"));
    assert!(!obj.contains_key("password_hash"));
    assert!(!user.to_string().contains("correct-horse"));
}

#[tokio::test]
async fn register_without_email_is_allowed() {
    let app = routes::app(test_state());

    let (status, user) = send(
        &app,
        post_json("/accounts/register", json!({ "username": "noemail", "password": "s3cure-pass" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["email"], "");
}

#[tokio::test]
async fn register_duplicate_username_is_400() {
    let app = routes::app(test_state());

    let (status, _) = register(&app, "bob", "s3cure-pass").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = register(&app, "bob", "another-pass").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["username"], json!([auth_service::USERNAME_TAKEN]));
}

#[tokio::test]
async fn register_weak_password_reports_field_errors() {
    let app = routes::app(test_state());

    let (status, body) = send(
        &app,
        post_json(
            "/accounts/register",
            json!({ "username": "carol", "password": "1234", "email": "not-an-email" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let pw: Vec<&str> = body["password"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert!(pw.iter().any(|m| m.contains("at least 8 characters")));
    assert!(pw.iter().any(|m| m.contains("entirely numeric")));
    assert_eq!(body["email"], json!(["Enter a valid email address."]));
    assert!(body.get("username").is_none());
}

#[tokio::test]
async fn register_missing_fields_is_400() {
    let app = routes::app(test_state());

    let (status, body) = send(&app, post_json("/accounts/register", json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["username"], json!([auth_service::REQUIRED]));
    assert_eq!(body["password"], json!([auth_service::REQUIRED]));
}

#[tokio::test]
async fn malformed_json_is_400() {
    let app = routes::app(test_state());

    let req = Request::builder()
        .method("POST")
        .uri("/accounts/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn login_wrong_password_is_401() {
    let app = routes::app(test_state());
    register(&app, "dave", "s3cure-pass").await;

    let (status, body) = login(&app, "dave", "wrong-pass").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], auth_service::BAD_CREDENTIALS);
}

#[tokio::test]
async fn login_unknown_user_is_401() {
    let app = routes::app(test_state());

    let (status, body) = login(&app, "ghost", "s3cure-pass").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], auth_service::BAD_CREDENTIALS);
}

#[tokio::test]
async fn login_missing_fields_is_400() {
    let app = routes::app(test_state());

    let (status, body) = send(&app, post_json("/accounts/login", json!({ "username": "x" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["password"], json!([auth_service::REQUIRED]));
}

#[tokio::test]
async fn refresh_issues_a_working_access_token() {
    let app = routes::app(test_state());
    register(&app, "erin", "s3cure-pass").await;
    let (_, pair) = login(&app, "erin", "s3cure-pass").await;

    let (status, body) = send(
        &app,
        post_json("/accounts/token/refresh", json!({ "refresh": pair["refresh"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let access = body["access"].as_str().unwrap();

    let (status, me) = send(&app, get_with_token("/accounts/user", access)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "erin");
}

#[tokio::test]
async fn refresh_rejects_an_access_token() {
    let app = routes::app(test_state());
    register(&app, "frank", "s3cure-pass").await;
    let (_, pair) = login(&app, "frank", "s3cure-pass").await;

    let (status, body) = send(
        &app,
        post_json("/accounts/token/refresh", json!({ "refresh": pair["access"] })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], auth_service::BAD_TOKEN);
}

#[tokio::test]
async fn accounts_are_also_served_under_api_prefix() {
    let app = routes::app(test_state());

    let (status, _) = send(
        &app,
        post_json(
            "/api/accounts/register",
            json!({ "username": "grace", "password": "s3cure-pass" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, pair) = send(
        &app,
        post_json(
            "/api/accounts/login",
            json!({ "username": "grace", "password": "s3cure-pass" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(pair["access"].is_string());
}

#[tokio::test]
async fn account_routes_accept_trailing_slash() {
    let app = routes::app(test_state());

    let (status, _) = send(
        &app,
        post_json(
            "/accounts/register/",
            json!({ "username": "hank", "password": "s3cure-pass" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, pair) = send(
        &app,
        post_json("/accounts/login/", json!({ "username": "hank", "password": "s3cure-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let access = pair["access"].as_str().unwrap();

    let (status, body) = send(
        &app,
        post_json("/api/accounts/token/refresh/", json!({ "refresh": pair["refresh"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access"].is_string());

    let (status, me) = send(&app, get_with_token("/accounts/user/", access)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "hank");
}
