//! Serialized Value Codec
//!
//! Converts between the parent's JSON string and typed records.

use serde_json::Value;
use thiserror::Error;

use crate::config::ListConfig;
use crate::ids::IdSource;
use crate::record::ListRecord;

/// Why a serialized value could not be turned into a list
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid JSON: {0}")]
    Json(#[source] serde_json::Error),
    #[error("expected a JSON array, found {0}")]
    NotAList(&'static str),
    #[error("invalid list item: {0}")]
    Item(#[source] serde_json::Error),
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse a serialized list. An empty array is valid here; callers decide
/// what an empty list means.
pub fn parse_items<T: ListRecord>(serialized: &str) -> Result<Vec<T>, CodecError> {
    let value: Value = serde_json::from_str(serialized).map_err(CodecError::Json)?;
    if !value.is_array() {
        return Err(CodecError::NotAList(kind_of(&value)));
    }
    serde_json::from_value(value).map_err(CodecError::Item)
}

/// Compact JSON for the parent
pub fn serialize_items<T: ListRecord>(items: &[T]) -> String {
    // Records are plain data with string keys; this cannot fail.
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

/// Bring a stored course value into list form before it reaches the editor.
///
/// - empty: one blank item
/// - a JSON array: unchanged
/// - anything else (plain text from before learnings were a list): one item
///   holding the raw text
pub fn normalize_legacy<T: ListRecord>(
    raw: &str,
    ids: &mut impl IdSource,
    config: &ListConfig,
) -> String {
    if raw.is_empty() {
        return serialize_items(&[T::blank(ids.next_id(), config)]);
    }
    if matches!(serde_json::from_str::<Value>(raw), Ok(Value::Array(_))) {
        return raw.to_string();
    }
    log::debug!("[Codec] converting legacy plain-text value into a single item");
    serialize_items(&[T::with_text(ids.next_id(), raw, config)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::record::LearningItem;
    use serde_json::json;

    #[test]
    fn test_parse_rejects_non_arrays() {
        let err = parse_items::<LearningItem>(r#"{"id":"1"}"#).unwrap_err();
        assert!(matches!(err, CodecError::NotAList("an object")));

        let err = parse_items::<LearningItem>("not json").unwrap_err();
        assert!(matches!(err, CodecError::Json(_)));

        let err = parse_items::<LearningItem>(r#"[{"text":"no id"}]"#).unwrap_err();
        assert!(matches!(err, CodecError::Item(_)));
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse_items::<LearningItem>("[]").unwrap().is_empty());
    }

    #[test]
    fn test_serialize_preserves_order() {
        let raw = r#"[{"id":"b","text":"second","emoji":"📝"},{"id":"a","text":"first","emoji":"📝"}]"#;
        let items: Vec<LearningItem> = parse_items(raw).unwrap();
        let out: Value = serde_json::from_str(&serialize_items(&items)).unwrap();
        assert_eq!(out, serde_json::from_str::<Value>(raw).unwrap());
    }

    #[test]
    fn test_normalize_legacy_plain_text() {
        let mut ids = SequentialIds::starting_at(1);
        let out = normalize_legacy::<LearningItem>(
            "Understand ownership",
            &mut ids,
            &ListConfig::default(),
        );
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            value,
            json!([{ "id": "1", "text": "Understand ownership", "emoji": "📝" }])
        );
    }

    #[test]
    fn test_normalize_legacy_keeps_arrays_and_fills_empty() {
        let mut ids = SequentialIds::starting_at(1);
        let config = ListConfig::default();

        let array = r#"[{"id":"9","text":"kept"}]"#;
        assert_eq!(normalize_legacy::<LearningItem>(array, &mut ids, &config), array);
        assert_eq!(normalize_legacy::<LearningItem>("[]", &mut ids, &config), "[]");

        let empty: Vec<LearningItem> =
            parse_items(&normalize_legacy::<LearningItem>("", &mut ids, &config)).unwrap();
        assert_eq!(empty.len(), 1);
        assert_eq!(empty[0].text, "");
    }

    #[test]
    fn test_normalize_legacy_json_scalar_becomes_text() {
        let mut ids = SequentialIds::starting_at(1);
        let out = normalize_legacy::<LearningItem>("42", &mut ids, &ListConfig::default());
        let items: Vec<LearningItem> = parse_items(&out).unwrap();
        assert_eq!(items[0].text, "42");
    }
}
