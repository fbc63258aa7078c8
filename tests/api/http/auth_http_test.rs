//! Login and bearer token HTTP tests

use super::{build_test_router, get, get_json, login, post_json};
use crate::api::{admin_token, create_test_jwt_manager, foreign_token, ADMIN_EMAIL, ADMIN_PASSWORD};
use axum::http::StatusCode;
use serde_json::{json, Value};

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_returns_plain_text_token() {
    let app = build_test_router().await;

    let response = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response
        .header("content-type")
        .unwrap()
        .starts_with("text/plain"));

    let token = response.text();
    let claims = create_test_jwt_manager().verify_access_token(&token).unwrap();
    assert_eq!(claims.sub, ADMIN_EMAIL);
    assert!(claims.authorities.contains(&"ROLE_ADMIN".to_string()));
}

#[tokio::test]
async fn test_login_token_opens_protected_routes() {
    let app = build_test_router().await;

    let token = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await.text();
    let (status, users): (_, Option<Vec<Value>>) =
        get_json(&app, "/api/users", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.unwrap().len(), 1);
}

#[tokio::test]
async fn test_login_wrong_password_returns_401() {
    let app = build_test_router().await;

    let response = login(&app, ADMIN_EMAIL, "wrong").await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    let body: Value = response.json().unwrap();
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn test_login_unknown_user_returns_401() {
    let app = build_test_router().await;

    let response = login(&app, "nobody@example.com", ADMIN_PASSWORD).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_as_created_user() {
    let app = build_test_router().await;
    let admin = admin_token();

    let (status, _): (_, Option<Value>) = post_json(
        &app,
        "/api/users",
        Some(&admin),
        &json!({ "email": "jack@example.com", "password": "secret", "firstName": "Jack" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let response = login(&app, "jack@example.com", "secret").await;
    assert_eq!(response.status, StatusCode::OK);

    let claims = create_test_jwt_manager()
        .verify_access_token(&response.text())
        .unwrap();
    assert_eq!(claims.sub, "jack@example.com");
    assert_eq!(claims.authorities, vec!["ROLE_USER".to_string()]);
}

// ============================================================================
// Bearer token handling
// ============================================================================

#[tokio::test]
async fn test_protected_route_without_token_returns_401() {
    let app = build_test_router().await;

    let response = get(&app, "/api/tasks", None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    let body: Value = response.json().unwrap();
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(body["error"], "Missing authorization token");
}

#[tokio::test]
async fn test_token_with_foreign_signature_returns_401() {
    let app = build_test_router().await;

    let response = get(&app, "/api/labels", Some(&foreign_token())).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    let body: Value = response.json().unwrap();
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
async fn test_garbage_token_returns_401() {
    let app = build_test_router().await;

    let response = get(&app, "/api/users", Some("not-a-jwt")).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
