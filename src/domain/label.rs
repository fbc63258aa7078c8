//! Label domain model

use super::common::serialize_date;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Labels created at startup when missing
pub const DEFAULT_LABELS: [&str; 2] = ["feature", "bug"];

pub const LABEL_IN_USE: &str = "You cannot delete this label because it is used by tasks";

/// Label entity
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub id: i64,
    pub name: String,
    #[serde(serialize_with = "serialize_date")]
    #[schema(value_type = String, format = Date)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateLabelInput {
    #[validate(length(min = 3, max = 1000))]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateLabelInput {
    #[validate(length(min = 3, max = 1000))]
    pub name: Option<String>,
}
