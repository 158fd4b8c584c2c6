//! List Records
//!
//! The record contract the synchronizer works with, and the learning item
//! used by the course editor.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::config::ListConfig;

/// Emoji given to items that do not carry one.
pub const DEFAULT_EMOJI: &str = "📝";

/// Core trait for records held in a controlled list
pub trait ListRecord: Clone + PartialEq + Serialize + DeserializeOwned {
    /// Editable field selector
    type Field: Copy + std::fmt::Debug;

    /// Stable identifier, unique within a list
    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// Fresh record with the given id and no user content
    fn blank(id: String, config: &ListConfig) -> Self;

    /// Fresh record whose primary text is `text`
    fn with_text(id: String, text: &str, config: &ListConfig) -> Self;

    /// Writes `value` into `field`. Returns false when nothing changed.
    fn set_field(&mut self, field: Self::Field, value: &str) -> bool;
}

/// Editable fields of a [`LearningItem`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearningField {
    Text,
    Emoji,
    /// Empty value clears the link
    Link,
}

/// One "what you will learn" entry of a course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningItem {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_emoji")]
    pub emoji: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Keys this front-end does not know about, kept for the round-trip
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_emoji() -> String {
    DEFAULT_EMOJI.to_string()
}

/// Older records stored numeric ids.
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

impl ListRecord for LearningItem {
    type Field = LearningField;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn blank(id: String, config: &ListConfig) -> Self {
        Self {
            id,
            text: String::new(),
            emoji: config.default_emoji.clone(),
            link: None,
            extra: Map::new(),
        }
    }

    fn with_text(id: String, text: &str, config: &ListConfig) -> Self {
        Self {
            text: text.to_string(),
            ..Self::blank(id, config)
        }
    }

    fn set_field(&mut self, field: LearningField, value: &str) -> bool {
        match field {
            LearningField::Text => replace_if_changed(&mut self.text, value),
            LearningField::Emoji => replace_if_changed(&mut self.emoji, value),
            LearningField::Link => {
                let link = (!value.is_empty()).then(|| value.to_string());
                if self.link == link {
                    return false;
                }
                self.link = link;
                true
            }
        }
    }
}

fn replace_if_changed(slot: &mut String, value: &str) -> bool {
    if slot == value {
        return false;
    }
    value.clone_into(slot);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields_get_defaults() {
        let item: LearningItem = serde_json::from_value(json!({ "id": "7" })).unwrap();
        assert_eq!(item.text, "");
        assert_eq!(item.emoji, DEFAULT_EMOJI);
        assert_eq!(item.link, None);
    }

    #[test]
    fn test_numeric_id_is_accepted() {
        let item: LearningItem =
            serde_json::from_value(json!({ "id": 1712345678901u64, "text": "Old" })).unwrap();
        assert_eq!(item.id, "1712345678901");
    }

    #[test]
    fn test_unknown_keys_survive_round_trip() {
        let raw = json!({ "id": "1", "text": "Learn X", "emoji": "🎯", "weight": 3 });
        let item: LearningItem = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(item.extra.get("weight"), Some(&json!(3)));
        assert_eq!(serde_json::to_value(&item).unwrap(), raw);
    }

    #[test]
    fn test_set_field_reports_changes() {
        let mut item = LearningItem::blank("1".to_string(), &ListConfig::default());

        assert!(item.set_field(LearningField::Text, "Rust"));
        assert!(!item.set_field(LearningField::Text, "Rust"));

        assert!(item.set_field(LearningField::Link, "https://example.com"));
        assert_eq!(item.link.as_deref(), Some("https://example.com"));

        // Clearing the link drops the key from the serialized form
        assert!(item.set_field(LearningField::Link, ""));
        assert_eq!(item.link, None);
        assert!(!item.set_field(LearningField::Link, ""));
        assert!(serde_json::to_value(&item).unwrap().get("link").is_none());
    }
}
