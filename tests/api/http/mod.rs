//! HTTP handler test infrastructure
//!
//! Every test builds the production router with `build_router()` over a
//! freshly seeded in-memory state and drives it with `oneshot` requests.

pub mod auth_http_test;
pub mod label_http_test;
pub mod task_http_test;
pub mod task_status_http_test;
pub mod user_http_test;

use crate::api::seeded_state;
use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde::{de::DeserializeOwned, Serialize};
use task_manager::server::build_router;
use tower::ServiceExt;

// ============================================================================
// Router
// ============================================================================

/// Router over a seeded in-memory store, metrics disabled
pub async fn build_test_router() -> Router {
    build_router(seeded_state().await, None)
}

// ============================================================================
// Request helpers
// ============================================================================

/// Raw response captured from the router
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_slice(&self.body).ok()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Parsed `X-Total-Count`
    pub fn total_count(&self) -> Option<i64> {
        self.header("x-total-count").and_then(|v| v.parse().ok())
    }
}

/// Send a request with an optional bearer token and JSON body
pub async fn send<B: Serialize>(
    app: &Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<&B>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn get(app: &Router, path: &str, token: Option<&str>) -> TestResponse {
    send::<()>(app, Method::GET, path, token, None).await
}

/// Make a GET request and parse the JSON response
pub async fn get_json<T: DeserializeOwned>(
    app: &Router,
    path: &str,
    token: Option<&str>,
) -> (StatusCode, Option<T>) {
    let response = get(app, path, token).await;
    (response.status, response.json())
}

/// Make a POST request with a JSON body and parse the JSON response
pub async fn post_json<B: Serialize, T: DeserializeOwned>(
    app: &Router,
    path: &str,
    token: Option<&str>,
    body: &B,
) -> (StatusCode, Option<T>) {
    let response = send(app, Method::POST, path, token, Some(body)).await;
    (response.status, response.json())
}

/// Make a PUT request with a JSON body and parse the JSON response
pub async fn put_json<B: Serialize, T: DeserializeOwned>(
    app: &Router,
    path: &str,
    token: Option<&str>,
    body: &B,
) -> (StatusCode, Option<T>) {
    let response = send(app, Method::PUT, path, token, Some(body)).await;
    (response.status, response.json())
}

/// Make a DELETE request and return the status
pub async fn delete(app: &Router, path: &str, token: Option<&str>) -> StatusCode {
    send::<()>(app, Method::DELETE, path, token, None).await.status
}

/// Log in through the API and return the raw token
pub async fn login(app: &Router, username: &str, password: &str) -> TestResponse {
    let body = serde_json::json!({ "username": username, "password": password });
    send(app, Method::POST, "/api/login", None, Some(&body)).await
}
