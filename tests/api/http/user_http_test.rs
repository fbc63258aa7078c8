//! User API HTTP tests

use super::{build_test_router, delete, get, get_json, post_json, put_json};
use crate::api::{admin_token, user_token, ADMIN_EMAIL};
use axum::{http::StatusCode, Router};
use serde_json::{json, Value};

async fn create_user(app: &Router, email: &str) -> Value {
    let (status, body): (_, Option<Value>) = post_json(
        app,
        "/api/users",
        Some(&admin_token()),
        &json!({
            "email": email,
            "password": "secret",
            "firstName": "John",
            "lastName": "Smith"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body.unwrap()
}

// ============================================================================
// List / Get
// ============================================================================

#[tokio::test]
async fn test_list_users_returns_array_with_total_count() {
    let app = build_test_router().await;
    create_user(&app, "john@example.com").await;

    let response = get(&app, "/api/users", Some(&admin_token())).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.total_count(), Some(2));
    let users: Vec<Value> = response.json().unwrap();
    assert_eq!(users[0]["email"], ADMIN_EMAIL);
    assert_eq!(users[1]["email"], "john@example.com");
}

#[tokio::test]
async fn test_get_user_hides_password() {
    let app = build_test_router().await;
    let created = create_user(&app, "john@example.com").await;
    let id = created["id"].as_i64().unwrap();

    let (status, body): (_, Option<Value>) =
        get_json(&app, &format!("/api/users/{}", id), Some(&admin_token())).await;

    assert_eq!(status, StatusCode::OK);
    let user = body.unwrap();
    assert_eq!(user["firstName"], "John");
    assert_eq!(user["lastName"], "Smith");
    assert!(user.get("password").is_none());
    assert!(user.get("passwordHash").is_none());
    // yyyy-MM-dd
    assert_eq!(user["createdAt"].as_str().unwrap().len(), 10);
}

#[tokio::test]
async fn test_get_missing_user_returns_404() {
    let app = build_test_router().await;

    let (status, body): (_, Option<Value>) =
        get_json(&app, "/api/users/999", Some(&admin_token())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.unwrap()["error"], "not_found");
}

#[tokio::test]
async fn test_list_users_requires_auth() {
    let app = build_test_router().await;

    let response = get(&app, "/api/users", None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_user_returns_201() {
    let app = build_test_router().await;

    let user = create_user(&app, "john@example.com").await;

    assert_eq!(user["id"], 2);
    assert_eq!(user["email"], "john@example.com");
}

#[tokio::test]
async fn test_create_user_duplicate_email_returns_409() {
    let app = build_test_router().await;
    create_user(&app, "john@example.com").await;

    let (status, _): (_, Option<Value>) = post_json(
        &app,
        "/api/users",
        Some(&admin_token()),
        &json!({ "email": "john@example.com", "password": "secret" }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_user_invalid_email_returns_422() {
    let app = build_test_router().await;

    let (status, body): (_, Option<Value>) = post_json(
        &app,
        "/api/users",
        Some(&admin_token()),
        &json!({ "email": "not-an-email", "password": "secret" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body.unwrap()["error"], "validation");
}

#[tokio::test]
async fn test_create_user_short_password_returns_422() {
    let app = build_test_router().await;

    let (status, _): (_, Option<Value>) = post_json(
        &app,
        "/api/users",
        Some(&admin_token()),
        &json!({ "email": "john@example.com", "password": "ab" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_user_updates_own_account() {
    let app = build_test_router().await;
    let created = create_user(&app, "john@example.com").await;
    let id = created["id"].as_i64().unwrap();
    let token = user_token("john@example.com");

    let (status, body): (_, Option<Value>) = put_json(
        &app,
        &format!("/api/users/{}", id),
        Some(&token),
        &json!({ "firstName": "Johnny" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let user = body.unwrap();
    assert_eq!(user["firstName"], "Johnny");
    assert_eq!(user["lastName"], "Smith");
}

#[tokio::test]
async fn test_update_null_clears_last_name() {
    let app = build_test_router().await;
    let created = create_user(&app, "john@example.com").await;
    let id = created["id"].as_i64().unwrap();

    let (status, body): (_, Option<Value>) = put_json(
        &app,
        &format!("/api/users/{}", id),
        Some(&admin_token()),
        &json!({ "lastName": null }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.unwrap().get("lastName").is_none());
}

#[tokio::test]
async fn test_user_cannot_update_other_account() {
    let app = build_test_router().await;
    create_user(&app, "john@example.com").await;
    let other = create_user(&app, "jane@example.com").await;
    let token = user_token("john@example.com");

    let (status, body): (_, Option<Value>) = put_json(
        &app,
        &format!("/api/users/{}", other["id"]),
        Some(&token),
        &json!({ "firstName": "Hacked" }),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body.unwrap()["error"], "forbidden");
}

#[tokio::test]
async fn test_update_email_to_taken_returns_409() {
    let app = build_test_router().await;
    let created = create_user(&app, "john@example.com").await;

    let (status, _): (_, Option<Value>) = put_json(
        &app,
        &format!("/api/users/{}", created["id"]),
        Some(&admin_token()),
        &json!({ "email": ADMIN_EMAIL }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_user_deletes_own_account() {
    let app = build_test_router().await;
    let created = create_user(&app, "john@example.com").await;
    let path = format!("/api/users/{}", created["id"]);

    let status = delete(&app, &path, Some(&user_token("john@example.com"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let response = get(&app, &path, Some(&admin_token())).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_cannot_delete_other_account() {
    let app = build_test_router().await;
    let other = create_user(&app, "jane@example.com").await;

    let status = delete(
        &app,
        &format!("/api/users/{}", other["id"]),
        Some(&user_token("john@example.com")),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_assigned_user_returns_400() {
    let app = build_test_router().await;
    let created = create_user(&app, "john@example.com").await;
    let admin = admin_token();

    let (status, _): (_, Option<Value>) = post_json(
        &app,
        "/api/tasks",
        Some(&admin),
        &json!({ "title": "Assigned", "status": "draft", "assignee_id": created["id"] }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let status = delete(&app, &format!("/api/users/{}", created["id"]), Some(&admin)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
