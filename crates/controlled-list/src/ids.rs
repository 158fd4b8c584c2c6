//! Identifier Sources
//!
//! Fresh ids for new list items.

use chrono::Utc;

/// Produces ids for new records. Each call must return a value never
/// returned before by the same source.
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

/// Millisecond timestamps, strictly increasing per source.
///
/// Two adds within the same millisecond get consecutive values instead of
/// colliding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClockIds {
    last: i64,
}

impl IdSource for ClockIds {
    fn next_id(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        self.last = now.max(self.last + 1);
        self.last.to_string()
    }
}

/// Counter starting at a fixed value. Deterministic, for hosts and tests
/// that need predictable ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = self.next;
        self.next += 1;
        id.to_string()
    }
}
