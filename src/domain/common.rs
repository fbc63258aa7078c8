//! Common helpers for domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};
use validator::ValidationError;

/// Serialize a timestamp as a calendar date (`yyyy-MM-dd`).
pub fn serialize_date<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&value.format("%Y-%m-%d"))
}

/// Deserialize a field that distinguishes "absent" from "explicit null".
///
/// Use together with `#[serde(default)]`:
/// absent -> `None`, `null` -> `Some(None)`, value -> `Some(Some(v))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Reject strings that are empty or whitespace only
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}
