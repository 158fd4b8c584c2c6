//! Learnings Validation
//!
//! Form-level checks on the serialized learnings value, run by the parent
//! before it allows a save.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LearningsError {
    #[error("Learnings are required")]
    Required,
    #[error("Learnings are not valid JSON")]
    InvalidJson,
    #[error("Learnings must be a list")]
    NotAList,
    #[error("Add at least one learning item")]
    Empty,
    #[error("Learning item {} has no text", .index + 1)]
    MissingText { index: usize },
}

/// Returns the item count when the value is savable.
pub fn validate_learnings(serialized: &str) -> Result<usize, LearningsError> {
    if serialized.is_empty() {
        return Err(LearningsError::Required);
    }
    let value: Value = serde_json::from_str(serialized).map_err(|_| LearningsError::InvalidJson)?;
    let items = value.as_array().ok_or(LearningsError::NotAList)?;
    if items.is_empty() {
        return Err(LearningsError::Empty);
    }
    let blank = items.iter().position(|item| {
        item.get("text")
            .and_then(Value::as_str)
            .map_or(true, |text| text.trim().is_empty())
    });
    match blank {
        Some(index) => Err(LearningsError::MissingText { index }),
        None => Ok(items.len()),
    }
}
