//! List Configuration

use serde::{Deserialize, Serialize};

use crate::record::DEFAULT_EMOJI;

/// What to do when the parent pushes a value that is neither an echo of
/// our own emission nor accompanied by a new reset key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExternalChangePolicy {
    /// Ignore it. Local edits win until the reset key changes.
    #[default]
    KeepLocal,
    /// Ignore it and emit the local serialization again so the parent
    /// converges on what the user sees.
    Reassert,
    /// Replace local items with the external list if it parses.
    Adopt,
}

/// Tunables for a controlled list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Emoji for items created locally
    pub default_emoji: String,
    pub external_policy: ExternalChangePolicy,
    /// Above this many items the view switches to a scrolling container
    pub scroll_threshold: usize,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            default_emoji: DEFAULT_EMOJI.to_string(),
            external_policy: ExternalChangePolicy::KeepLocal,
            scroll_threshold: 5,
        }
    }
}

impl ListConfig {
    /// Parse a JSON config, falling back to defaults for missing keys.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = ListConfig::from_json(r#"{ "external_policy": "adopt" }"#).unwrap();
        assert_eq!(config.external_policy, ExternalChangePolicy::Adopt);
        assert_eq!(config.scroll_threshold, 5);
        assert_eq!(config.default_emoji, DEFAULT_EMOJI);
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        assert!(ListConfig::from_json(r#"{ "external_policy": "merge" }"#).is_err());
    }
}
