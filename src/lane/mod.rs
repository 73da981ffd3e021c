pub mod activity;
pub mod albums;
pub mod legacy;
pub mod media;
pub mod music;
pub mod snapshot;
pub mod stats;
pub mod stories;
pub mod timeline;
pub mod types;

use crate::error::{LaneError, Result};

/// Fresh time-sortable record id.
pub(crate) fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

pub(crate) fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Trim `value` and reject it if nothing is left.
pub(crate) fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LaneError::invalid(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// Category from a payload, falling back to [`types::DEFAULT_CATEGORY`].
pub(crate) fn category_or_default(category: Option<&str>) -> String {
    match category.map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => types::DEFAULT_CATEGORY.to_string(),
    }
}
