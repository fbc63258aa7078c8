//! Task status API HTTP tests

use super::{build_test_router, delete, get, get_json, post_json, put_json};
use crate::api::admin_token;
use axum::http::StatusCode;
use serde_json::{json, Value};

// ============================================================================
// Public reads
// ============================================================================

#[tokio::test]
async fn test_list_statuses_is_public_and_seeded() {
    let app = build_test_router().await;

    let response = get(&app, "/api/task_statuses", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.total_count(), Some(5));
    let statuses: Vec<Value> = response.json().unwrap();
    let slugs: Vec<&str> = statuses
        .iter()
        .map(|s| s["slug"].as_str().unwrap())
        .collect();
    assert_eq!(
        slugs,
        vec!["draft", "to_review", "to_be_fixed", "to_publish", "published"]
    );
}

#[tokio::test]
async fn test_get_status_is_public() {
    let app = build_test_router().await;

    let (status, body): (_, Option<Value>) = get_json(&app, "/api/task_statuses/1", None).await;

    assert_eq!(status, StatusCode::OK);
    let task_status = body.unwrap();
    assert_eq!(task_status["name"], "Draft");
    assert_eq!(task_status["slug"], "draft");
}

#[tokio::test]
async fn test_get_missing_status_returns_404() {
    let app = build_test_router().await;

    let response = get(&app, "/api/task_statuses/999", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Writes
// ============================================================================

#[tokio::test]
async fn test_create_status_requires_auth() {
    let app = build_test_router().await;

    let (status, _): (_, Option<Value>) = post_json(
        &app,
        "/api/task_statuses",
        None,
        &json!({ "name": "Archived", "slug": "archived" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_status_returns_201() {
    let app = build_test_router().await;

    let (status, body): (_, Option<Value>) = post_json(
        &app,
        "/api/task_statuses",
        Some(&admin_token()),
        &json!({ "name": "Archived", "slug": "archived" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let created = body.unwrap();
    assert_eq!(created["id"], 6);
    assert_eq!(created["slug"], "archived");
}

#[tokio::test]
async fn test_create_status_duplicate_slug_returns_409() {
    let app = build_test_router().await;

    let (status, _): (_, Option<Value>) = post_json(
        &app,
        "/api/task_statuses",
        Some(&admin_token()),
        &json!({ "name": "Another draft", "slug": "draft" }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_status_blank_name_returns_422() {
    let app = build_test_router().await;

    let (status, _): (_, Option<Value>) = post_json(
        &app,
        "/api/task_statuses",
        Some(&admin_token()),
        &json!({ "name": "  ", "slug": "blank" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_update_status_partial() {
    let app = build_test_router().await;

    let (status, body): (_, Option<Value>) = put_json(
        &app,
        "/api/task_statuses/1",
        Some(&admin_token()),
        &json!({ "name": "Sketch" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let updated = body.unwrap();
    assert_eq!(updated["name"], "Sketch");
    assert_eq!(updated["slug"], "draft");
}

#[tokio::test]
async fn test_delete_unused_status_returns_204() {
    let app = build_test_router().await;
    let token = admin_token();

    let status = delete(&app, "/api/task_statuses/5", Some(&token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let response = get(&app, "/api/task_statuses", None).await;
    assert_eq!(response.total_count(), Some(4));
}

#[tokio::test]
async fn test_delete_status_in_use_returns_400() {
    let app = build_test_router().await;
    let token = admin_token();

    let (status, _): (_, Option<Value>) = post_json(
        &app,
        "/api/tasks",
        Some(&token),
        &json!({ "title": "Write docs", "status": "draft" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let status = delete(&app, "/api/task_statuses/1", Some(&token)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
