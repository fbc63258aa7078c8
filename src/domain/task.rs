//! Task domain model

use super::common::{double_option, serialize_date, validate_not_blank};
use super::task_status::TaskStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Task entity as stored
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Task {
    pub id: i64,
    pub name: String,
    pub index: i32,
    pub description: Option<String>,
    pub task_status_id: i64,
    pub assignee_id: Option<i64>,
    pub label_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
}

/// Data needed to insert a task; references are already resolved.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub name: String,
    pub index: i32,
    pub description: Option<String>,
    pub task_status_id: i64,
    pub assignee_id: Option<i64>,
    pub label_ids: Vec<i64>,
}

/// Task as exposed over the API
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
    pub id: i64,
    pub index: i32,
    #[serde(serialize_with = "serialize_date")]
    #[schema(value_type = String, format = Date)]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "assignee_id", skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<i64>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Status slug
    pub status: String,
    pub task_label_ids: Vec<i64>,
}

impl TaskDto {
    pub fn from_task(task: Task, status: &TaskStatus) -> Self {
        let mut task_label_ids = task.label_ids;
        task_label_ids.sort_unstable();
        Self {
            id: task.id,
            index: task.index,
            created_at: task.created_at,
            assignee_id: task.assignee_id,
            title: task.name,
            content: task.description,
            status: status.slug.clone(),
            task_label_ids,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskInput {
    #[validate(length(max = 255), custom(function = "validate_not_blank"))]
    pub title: String,
    pub content: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub index: i32,
    #[serde(rename = "assignee_id")]
    pub assignee_id: Option<i64>,
    /// Status slug
    #[validate(custom(function = "validate_not_blank"))]
    pub status: String,
    #[serde(default, alias = "labelIds")]
    pub task_label_ids: Vec<i64>,
}

/// Partial task update. `content` and `assignee_id` accept `null` to clear.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskInput {
    #[validate(length(max = 255), custom(function = "validate_not_blank"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub content: Option<Option<String>>,
    #[validate(range(min = 0))]
    pub index: Option<i32>,
    #[serde(default, rename = "assignee_id", deserialize_with = "double_option")]
    #[schema(value_type = Option<i64>)]
    pub assignee_id: Option<Option<i64>>,
    #[validate(custom(function = "validate_not_blank"))]
    pub status: Option<String>,
    #[serde(default, alias = "labelIds")]
    pub task_label_ids: Option<Vec<i64>>,
}

pub const TASK_MISSING_REFERENCE: &str = "Task refers to a status, user or label that no longer exists";

/// Task list filter as received from the API
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub title_cont: Option<String>,
    pub assignee_id: Option<i64>,
    /// Status slug
    pub status: Option<String>,
    pub label_id: Option<i64>,
}

/// Task list filter with the status slug resolved to an id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskCriteria {
    pub title_cont: Option<String>,
    pub assignee_id: Option<i64>,
    pub status_id: Option<i64>,
    pub label_id: Option<i64>,
}

impl TaskCriteria {
    /// In-memory evaluation of the filter, mirroring the SQL in the Postgres repository.
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(needle) = &self.title_cont {
            if !task.name.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        if let Some(assignee_id) = self.assignee_id {
            if task.assignee_id != Some(assignee_id) {
                return false;
            }
        }
        if let Some(status_id) = self.status_id {
            if task.task_status_id != status_id {
                return false;
            }
        }
        if let Some(label_id) = self.label_id {
            if !task.label_ids.contains(&label_id) {
                return false;
            }
        }
        true
    }
}
