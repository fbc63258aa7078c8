//! REST API handlers and shared query/response helpers

pub mod auth;
pub mod health;
pub mod label;
pub mod metrics;
pub mod misc;
pub mod task;
pub mod task_status;
pub mod user;

use crate::domain::TaskFilter;
use axum::{response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Header carrying the total number of matching records on list responses
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Maximum allowed perPage value for pagination
pub(crate) const MAX_PER_PAGE: i64 = 100;

pub(crate) fn default_page() -> i64 {
    1
}

pub(crate) fn default_per_page() -> i64 {
    20
}

/// Reject page values less than 1
pub(crate) fn deserialize_page<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = i64::deserialize(deserializer)?;
    if value < 1 {
        return Err(serde::de::Error::custom(
            "page must be a positive integer (>= 1)",
        ));
    }
    Ok(value)
}

/// Reject perPage values less than 1, clamp to MAX_PER_PAGE
pub(crate) fn deserialize_per_page<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = i64::deserialize(deserializer)?;
    if value < 1 {
        return Err(serde::de::Error::custom(
            "perPage must be a positive integer (>= 1)",
        ));
    }
    Ok(value.min(MAX_PER_PAGE))
}

/// Query parameters of `GET /api/tasks`
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TaskListQuery {
    /// Case-insensitive substring of the title
    pub title_cont: Option<String>,
    pub assignee_id: Option<i64>,
    /// Status slug
    pub status: Option<String>,
    pub label_id: Option<i64>,
    #[serde(default = "default_page", deserialize_with = "deserialize_page")]
    pub page: i64,
    #[serde(
        default = "default_per_page",
        deserialize_with = "deserialize_per_page",
        alias = "per_page"
    )]
    pub per_page: i64,
}

impl TaskListQuery {
    pub fn filter(&self) -> TaskFilter {
        TaskFilter {
            title_cont: self.title_cont.clone().filter(|s| !s.is_empty()),
            assignee_id: self.assignee_id,
            status: self.status.clone().filter(|s| !s.is_empty()),
            label_id: self.label_id,
        }
    }
}

/// A JSON array response carrying `X-Total-Count`.
pub(crate) fn counted<T: Serialize>(total: i64, items: Vec<T>) -> impl IntoResponse {
    ([(TOTAL_COUNT_HEADER, total.to_string())], Json(items))
}

/// Collection endpoints that are not paginated report their own length.
pub(crate) fn counted_all<T: Serialize>(items: Vec<T>) -> impl IntoResponse {
    counted(items.len() as i64, items)
}
