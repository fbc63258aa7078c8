//! Task status domain model

use super::common::{serialize_date, validate_not_blank};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Statuses created at startup when missing, as `(name, slug)`
pub const DEFAULT_TASK_STATUSES: [(&str, &str); 5] = [
    ("Draft", "draft"),
    ("To Review", "to_review"),
    ("To Be Fixed", "to_be_fixed"),
    ("To Publish", "to_publish"),
    ("Published", "published"),
];

pub const STATUS_IN_USE: &str = "You cannot delete this status because it is used by tasks";

/// Task status entity
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatus {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(serialize_with = "serialize_date")]
    #[schema(value_type = String, format = Date)]
    pub created_at: DateTime<Utc>,
}

/// Input for creating a task status
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTaskStatusInput {
    #[validate(length(max = 255), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(length(max = 255), custom(function = "validate_not_blank"))]
    pub slug: String,
}

/// Input for updating a task status
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTaskStatusInput {
    #[validate(length(max = 255), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[validate(length(max = 255), custom(function = "validate_not_blank"))]
    pub slug: Option<String>,
}
