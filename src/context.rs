//! Editor Context
//!
//! Shared settings provided via Leptos Context API.

use controlled_list::ListConfig;
use leptos::prelude::*;

/// Editor-wide settings provided via context
#[derive(Clone, Copy)]
pub struct EditorContext {
    config: StoredValue<ListConfig>,
}

impl EditorContext {
    pub fn new(config: ListConfig) -> Self {
        Self {
            config: StoredValue::new(config),
        }
    }

    /// List configuration for new list components
    pub fn config(&self) -> ListConfig {
        self.config.get_value()
    }
}
