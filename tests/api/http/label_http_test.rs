//! Label API HTTP tests

use super::{build_test_router, delete, get, get_json, post_json, put_json};
use crate::api::admin_token;
use axum::http::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn test_list_labels_returns_defaults() {
    let app = build_test_router().await;

    let response = get(&app, "/api/labels", Some(&admin_token())).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.total_count(), Some(2));
    let labels: Vec<Value> = response.json().unwrap();
    assert_eq!(labels[0]["name"], "feature");
    assert_eq!(labels[1]["name"], "bug");
}

#[tokio::test]
async fn test_list_labels_requires_auth() {
    let app = build_test_router().await;

    let response = get(&app, "/api/labels", None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_and_get_label() {
    let app = build_test_router().await;
    let token = admin_token();

    let (status, body): (_, Option<Value>) =
        post_json(&app, "/api/labels", Some(&token), &json!({ "name": "urgent" })).await;
    assert_eq!(status, StatusCode::CREATED);
    let created = body.unwrap();

    let (status, body): (_, Option<Value>) =
        get_json(&app, &format!("/api/labels/{}", created["id"]), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["name"], "urgent");
}

#[tokio::test]
async fn test_create_label_too_short_returns_422() {
    let app = build_test_router().await;

    let (status, _): (_, Option<Value>) =
        post_json(&app, "/api/labels", Some(&admin_token()), &json!({ "name": "ab" })).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_label_duplicate_returns_409() {
    let app = build_test_router().await;

    let (status, _): (_, Option<Value>) =
        post_json(&app, "/api/labels", Some(&admin_token()), &json!({ "name": "bug" })).await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_rename_label() {
    let app = build_test_router().await;

    let (status, body): (_, Option<Value>) = put_json(
        &app,
        "/api/labels/2",
        Some(&admin_token()),
        &json!({ "name": "defect" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["name"], "defect");
}

#[tokio::test]
async fn test_delete_label_in_use_returns_400() {
    let app = build_test_router().await;
    let token = admin_token();

    let (status, _): (_, Option<Value>) = post_json(
        &app,
        "/api/tasks",
        Some(&token),
        &json!({ "title": "Crash on start", "status": "draft", "taskLabelIds": [2] }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    assert_eq!(
        delete(&app, "/api/labels/2", Some(&token)).await,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        delete(&app, "/api/labels/1", Some(&token)).await,
        StatusCode::NO_CONTENT
    );
}

#[tokio::test]
async fn test_delete_missing_label_returns_404() {
    let app = build_test_router().await;

    let status = delete(&app, "/api/labels/999", Some(&admin_token())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
