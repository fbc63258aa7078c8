//! Task API HTTP tests: CRUD, filtering and pagination

use super::{build_test_router, delete, get, get_json, post_json, put_json};
use crate::api::admin_token;
use axum::{http::StatusCode, Router};
use serde_json::{json, Value};

async fn create_task(app: &Router, body: Value) -> Value {
    let (status, created): (_, Option<Value>) =
        post_json(app, "/api/tasks", Some(&admin_token()), &body).await;
    assert_eq!(status, StatusCode::CREATED, "{:?}", created);
    created.unwrap()
}

/// Three tasks: admin-assigned draft feature, unassigned published bug, unlabelled draft
async fn seed_tasks(app: &Router) {
    create_task(
        app,
        json!({ "title": "Build login page", "status": "draft", "assignee_id": 1, "taskLabelIds": [1] }),
    )
    .await;
    create_task(
        app,
        json!({ "title": "Fix LOGIN redirect", "status": "published", "taskLabelIds": [2] }),
    )
    .await;
    create_task(app, json!({ "title": "Write release notes", "status": "draft" })).await;
}

fn titles(tasks: &[Value]) -> Vec<&str> {
    tasks.iter().map(|t| t["title"].as_str().unwrap()).collect()
}

// ============================================================================
// Create / Get
// ============================================================================

#[tokio::test]
async fn test_create_task_returns_dto() {
    let app = build_test_router().await;

    let task = create_task(
        &app,
        json!({
            "title": "Build login page",
            "content": "Form with email and password",
            "index": 3,
            "status": "to_review",
            "assignee_id": 1,
            "taskLabelIds": [2, 1, 2]
        }),
    )
    .await;

    assert_eq!(task["id"], 1);
    assert_eq!(task["title"], "Build login page");
    assert_eq!(task["content"], "Form with email and password");
    assert_eq!(task["index"], 3);
    assert_eq!(task["status"], "to_review");
    assert_eq!(task["assignee_id"], 1);
    assert_eq!(task["taskLabelIds"], json!([1, 2]));
    assert_eq!(task["createdAt"].as_str().unwrap().len(), 10);
}

#[tokio::test]
async fn test_create_task_unknown_status_returns_404() {
    let app = build_test_router().await;

    let (status, _): (_, Option<Value>) = post_json(
        &app,
        "/api/tasks",
        Some(&admin_token()),
        &json!({ "title": "Orphan", "status": "no_such_status" }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_task_unknown_label_returns_404() {
    let app = build_test_router().await;

    let (status, body): (_, Option<Value>) = post_json(
        &app,
        "/api/tasks",
        Some(&admin_token()),
        &json!({ "title": "Labelled", "status": "draft", "taskLabelIds": [1, 42] }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.unwrap()["message"].as_str().unwrap().contains("42"));
}

#[tokio::test]
async fn test_create_task_blank_title_returns_422() {
    let app = build_test_router().await;

    let (status, _): (_, Option<Value>) = post_json(
        &app,
        "/api/tasks",
        Some(&admin_token()),
        &json!({ "title": "", "status": "draft" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_task_malformed_json_returns_json_error() {
    let app = build_test_router().await;

    let (status, body): (_, Option<Value>) = post_json(
        &app,
        "/api/tasks",
        Some(&admin_token()),
        &json!({ "title": 12 }),
    )
    .await;

    assert!(status.is_client_error());
    assert!(body.unwrap().get("error").is_some());
}

#[tokio::test]
async fn test_get_missing_task_returns_404() {
    let app = build_test_router().await;

    let (status, _): (_, Option<Value>) =
        get_json(&app, "/api/tasks/404", Some(&admin_token())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Update / Delete
// ============================================================================

#[tokio::test]
async fn test_update_task_partial() {
    let app = build_test_router().await;
    let task = create_task(
        &app,
        json!({ "title": "Draft", "content": "old", "status": "draft", "assignee_id": 1 }),
    )
    .await;

    let (status, body): (_, Option<Value>) = put_json(
        &app,
        &format!("/api/tasks/{}", task["id"]),
        Some(&admin_token()),
        &json!({ "status": "published", "assignee_id": null, "taskLabelIds": [1] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let updated = body.unwrap();
    assert_eq!(updated["title"], "Draft");
    assert_eq!(updated["content"], "old");
    assert_eq!(updated["status"], "published");
    assert!(updated.get("assignee_id").is_none());
    assert_eq!(updated["taskLabelIds"], json!([1]));
}

#[tokio::test]
async fn test_update_task_unknown_assignee_returns_404() {
    let app = build_test_router().await;
    let task = create_task(&app, json!({ "title": "Draft", "status": "draft" })).await;

    let (status, _): (_, Option<Value>) = put_json(
        &app,
        &format!("/api/tasks/{}", task["id"]),
        Some(&admin_token()),
        &json!({ "assignee_id": 77 }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_task() {
    let app = build_test_router().await;
    let token = admin_token();
    let task = create_task(&app, json!({ "title": "Temporary", "status": "draft" })).await;
    let path = format!("/api/tasks/{}", task["id"]);

    assert_eq!(delete(&app, &path, Some(&token)).await, StatusCode::NO_CONTENT);
    assert_eq!(delete(&app, &path, Some(&token)).await, StatusCode::NOT_FOUND);
}

// ============================================================================
// Filtering
// ============================================================================

#[tokio::test]
async fn test_list_without_filters_returns_all() {
    let app = build_test_router().await;
    seed_tasks(&app).await;

    let response = get(&app, "/api/tasks", Some(&admin_token())).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.total_count(), Some(3));
    let tasks: Vec<Value> = response.json().unwrap();
    assert_eq!(tasks.len(), 3);
}

#[tokio::test]
async fn test_filter_title_is_case_insensitive() {
    let app = build_test_router().await;
    seed_tasks(&app).await;

    let response = get(&app, "/api/tasks?titleCont=login", Some(&admin_token())).await;

    let tasks: Vec<Value> = response.json().unwrap();
    assert_eq!(titles(&tasks), vec!["Build login page", "Fix LOGIN redirect"]);
    assert_eq!(response.total_count(), Some(2));
}

#[tokio::test]
async fn test_filters_combine() {
    let app = build_test_router().await;
    seed_tasks(&app).await;

    let response = get(
        &app,
        "/api/tasks?titleCont=login&assigneeId=1&status=draft&labelId=1",
        Some(&admin_token()),
    )
    .await;

    let tasks: Vec<Value> = response.json().unwrap();
    assert_eq!(titles(&tasks), vec!["Build login page"]);
}

#[tokio::test]
async fn test_filter_by_label() {
    let app = build_test_router().await;
    seed_tasks(&app).await;

    let response = get(&app, "/api/tasks?labelId=2", Some(&admin_token())).await;

    let tasks: Vec<Value> = response.json().unwrap();
    assert_eq!(titles(&tasks), vec!["Fix LOGIN redirect"]);
}

#[tokio::test]
async fn test_filter_by_status() {
    let app = build_test_router().await;
    seed_tasks(&app).await;

    let response = get(&app, "/api/tasks?status=draft", Some(&admin_token())).await;

    assert_eq!(response.total_count(), Some(2));
}

#[tokio::test]
async fn test_unknown_status_filter_returns_empty_page() {
    let app = build_test_router().await;
    seed_tasks(&app).await;

    let response = get(&app, "/api/tasks?status=archived", Some(&admin_token())).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.total_count(), Some(0));
    let tasks: Vec<Value> = response.json().unwrap();
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn test_empty_filter_values_are_ignored() {
    let app = build_test_router().await;
    seed_tasks(&app).await;

    let response = get(&app, "/api/tasks?titleCont=&status=", Some(&admin_token())).await;

    assert_eq!(response.total_count(), Some(3));
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn test_pagination_reports_total() {
    let app = build_test_router().await;
    for i in 0..5 {
        create_task(&app, json!({ "title": format!("Task {}", i), "status": "draft" })).await;
    }
    let token = admin_token();

    let response = get(&app, "/api/tasks?page=2&perPage=2", Some(&token)).await;
    let tasks: Vec<Value> = response.json().unwrap();
    assert_eq!(titles(&tasks), vec!["Task 2", "Task 3"]);
    assert_eq!(response.total_count(), Some(5));

    let response = get(&app, "/api/tasks?page=3&per_page=2", Some(&token)).await;
    let tasks: Vec<Value> = response.json().unwrap();
    assert_eq!(titles(&tasks), vec!["Task 4"]);
}

#[tokio::test]
async fn test_page_beyond_end_is_empty() {
    let app = build_test_router().await;
    seed_tasks(&app).await;

    let response = get(&app, "/api/tasks?page=9", Some(&admin_token())).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.total_count(), Some(3));
    let tasks: Vec<Value> = response.json().unwrap();
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn test_largest_page_is_empty() {
    let app = build_test_router().await;
    seed_tasks(&app).await;

    let response = get(
        &app,
        &format!("/api/tasks?page={}&perPage=100", i64::MAX),
        Some(&admin_token()),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.total_count(), Some(3));
    let tasks: Vec<Value> = response.json().unwrap();
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn test_page_zero_returns_400() {
    let app = build_test_router().await;

    let response = get(&app, "/api/tasks?page=0", Some(&admin_token())).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let body: Value = response.json().unwrap();
    assert_eq!(body["error"], "bad_request");
    assert_eq!(body["message"], "Invalid request");
}
