//! Controlled List Synchronizer
//!
//! Local, editable copy of a list whose canonical value is a JSON string
//! owned by a parent form.
//!
//! Every mutation returns the new serialized value for the parent and
//! remembers it among the recent emissions. When the parent hands a value back,
//! [`ControlledList::receive`] tells an echo of that emission apart from a
//! different record being loaded (signalled by a new reset key) and from
//! an unrelated external change.

use std::collections::{HashSet, VecDeque};

use crate::codec::{parse_items, serialize_items};
use crate::config::{ExternalChangePolicy, ListConfig};
use crate::ids::{ClockIds, IdSource};
use crate::record::ListRecord;

/// Emissions remembered for echo detection
const EMISSION_HISTORY: usize = 16;

/// Popover attached to one item. At most one is open at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Popover {
    Emoji(String),
    Link(String),
}

impl Popover {
    pub fn item_id(&self) -> &str {
        match self {
            Popover::Emoji(id) | Popover::Link(id) => id,
        }
    }
}

/// Outcome of [`ControlledList::receive`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// Reset key changed; local state was rebuilt from the value
    Reset,
    /// Value reflects local state already; nothing touched
    Echo,
    /// Divergent value ignored
    KeptLocal,
    /// Divergent value ignored; the local serialization must go back up
    Reasserted(String),
    /// Divergent value replaced local items
    Adopted,
}

impl Reconciliation {
    /// Value the parent must be sent, if any
    pub fn emission(&self) -> Option<&str> {
        match self {
            Reconciliation::Reasserted(value) => Some(value),
            _ => None,
        }
    }

    /// Whether the local items or transient state were replaced
    pub fn changed_state(&self) -> bool {
        matches!(self, Reconciliation::Reset | Reconciliation::Adopted)
    }
}

/// Result of [`ControlledList::add_item`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Added {
    pub id: String,
    pub serialized: String,
}

/// Editable list kept in step with a parent-owned serialized value
#[derive(Debug, Clone, PartialEq)]
pub struct ControlledList<T: ListRecord, I: IdSource = ClockIds> {
    items: Vec<T>,
    /// Recent values handed to the parent, oldest first
    emitted: VecDeque<String>,
    reset_key: Option<String>,
    focused: Option<String>,
    /// Focus the view should apply once the item is rendered
    focus_request: Option<String>,
    popover: Option<Popover>,
    ids: I,
    config: ListConfig,
}

impl<T: ListRecord> ControlledList<T, ClockIds> {
    pub fn new(initial_value: &str, reset_key: Option<String>, config: ListConfig) -> Self {
        Self::with_ids(initial_value, reset_key, config, ClockIds::default())
    }
}

impl<T: ListRecord, I: IdSource> ControlledList<T, I> {
    pub fn with_ids(
        initial_value: &str,
        reset_key: Option<String>,
        config: ListConfig,
        ids: I,
    ) -> Self {
        let mut list = Self {
            items: Vec::new(),
            emitted: VecDeque::new(),
            reset_key,
            focused: None,
            focus_request: None,
            popover: None,
            ids,
            config,
        };
        list.items = list.initialize(initial_value);
        list
    }

    // ========================
    // Reads
    // ========================

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn item(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current local state in parent format
    pub fn serialized(&self) -> String {
        serialize_items(&self.items)
    }

    pub fn last_emitted(&self) -> Option<&str> {
        self.emitted.back().map(String::as_str)
    }

    pub fn reset_key(&self) -> Option<&str> {
        self.reset_key.as_deref()
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn popover(&self) -> Option<&Popover> {
        self.popover.as_ref()
    }

    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    pub fn is_scrollable(&self) -> bool {
        self.items.len() > self.config.scroll_threshold
    }

    // ========================
    // Initialization
    // ========================

    /// Parse a serialized value into items. Never fails: unparseable,
    /// non-list or empty input yields one blank item.
    pub fn initialize(&mut self, serialized: &str) -> Vec<T> {
        if !serialized.is_empty() {
            match parse_items::<T>(serialized) {
                Ok(mut items) if !items.is_empty() => {
                    self.reassign_duplicate_ids(&mut items);
                    return items;
                }
                Ok(_) => {}
                Err(e) => log::warn!("[ControlledList] failed to parse list value: {}", e),
            }
        }
        vec![self.fresh_item()]
    }

    /// Rebuild local state from `serialized`, dropping focus and popovers.
    /// Emits nothing: the parent already holds this value.
    pub fn reset(&mut self, serialized: &str) {
        self.items = self.initialize(serialized);
        self.emitted.clear();
        self.focused = None;
        self.focus_request = None;
        self.popover = None;
    }

    /// Take in the parent's current value and reset key.
    pub fn receive(&mut self, value: &str, reset_key: Option<&str>) -> Reconciliation {
        if let Some(key) = reset_key {
            if self.reset_key.as_deref() != Some(key) {
                log::debug!(
                    "[ControlledList] reset key {:?} -> {:?}, reloading",
                    self.reset_key,
                    key
                );
                self.reset_key = Some(key.to_string());
                self.reset(value);
                return Reconciliation::Reset;
            }
        }

        if self.is_echo(value) {
            return Reconciliation::Echo;
        }

        match self.config.external_policy {
            ExternalChangePolicy::KeepLocal => {
                log::debug!("[ControlledList] ignoring external change, local edits win");
                Reconciliation::KeptLocal
            }
            ExternalChangePolicy::Reassert => {
                log::debug!("[ControlledList] external change, re-sending local value");
                Reconciliation::Reasserted(self.emit())
            }
            ExternalChangePolicy::Adopt => match parse_items::<T>(value) {
                Ok(mut items) if !items.is_empty() => {
                    log::debug!("[ControlledList] adopting external value");
                    self.reassign_duplicate_ids(&mut items);
                    self.items = items;
                    self.emitted.clear();
                    self.forget_missing_ids();
                    Reconciliation::Adopted
                }
                _ => Reconciliation::KeptLocal,
            },
        }
    }

    fn is_echo(&self, value: &str) -> bool {
        if self.last_emitted() == Some(value) {
            return true;
        }
        // Parent may still be catching up with an earlier emission.
        if self.emitted.iter().any(|earlier| earlier == value) {
            log::debug!("[ControlledList] stale echo of an earlier emission");
            return true;
        }
        // A parent that re-encodes our JSON still hands back the same list.
        matches!(parse_items::<T>(value), Ok(items) if items == self.items)
    }

    // ========================
    // Mutations
    // ========================

    /// Append a blank item and ask the view to focus it.
    pub fn add_item(&mut self) -> Added {
        let item = self.fresh_item();
        let id = item.id().to_string();
        self.items.push(item);
        self.focus_request = Some(id.clone());
        Added {
            id,
            serialized: self.emit(),
        }
    }

    /// Write `value` into `field` of item `id`. `None` when no such item or
    /// the value is unchanged.
    pub fn update_item_field(&mut self, id: &str, field: T::Field, value: &str) -> Option<String> {
        let item = self.items.iter_mut().find(|item| item.id() == id)?;
        if !item.set_field(field, value) {
            return None;
        }
        Some(self.emit())
    }

    /// Remove item `id`. Removing an absent id does nothing.
    pub fn remove_item(&mut self, id: &str) -> Option<String> {
        let index = self.position(id)?;
        self.items.remove(index);
        self.forget_missing_ids();
        Some(self.emit())
    }

    /// Move the item at `from` so it ends up at `to`.
    pub fn reorder(&mut self, from: usize, to: usize) -> Option<String> {
        let len = self.items.len();
        if from >= len || to >= len || from == to {
            return None;
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
        Some(self.emit())
    }

    fn emit(&mut self) -> String {
        let serialized = self.serialized();
        if self.emitted.len() == EMISSION_HISTORY {
            self.emitted.pop_front();
        }
        self.emitted.push_back(serialized.clone());
        serialized
    }

    fn fresh_item(&mut self) -> T {
        let mut id = self.ids.next_id();
        while self.position(&id).is_some() {
            id = self.ids.next_id();
        }
        T::blank(id, &self.config)
    }

    /// Later items sharing an id with an earlier one get a fresh id.
    fn reassign_duplicate_ids(&mut self, items: &mut [T]) {
        let mut seen = HashSet::new();
        for index in 0..items.len() {
            if seen.insert(items[index].id().to_string()) {
                continue;
            }
            let mut id = self.ids.next_id();
            while seen.contains(&id) || items.iter().any(|item| item.id() == id) {
                id = self.ids.next_id();
            }
            log::warn!(
                "[ControlledList] duplicate id {} reassigned to {}",
                items[index].id(),
                id
            );
            items[index].set_id(id.clone());
            seen.insert(id);
        }
    }

    fn forget_missing_ids(&mut self) {
        let gone = |id: &Option<String>| matches!(id, Some(id) if !self.items.iter().any(|i| i.id() == id));
        let drop_focus = gone(&self.focused);
        let drop_request = gone(&self.focus_request);
        let drop_popover = self
            .popover
            .as_ref()
            .is_some_and(|p| !self.items.iter().any(|i| i.id() == p.item_id()));
        if drop_focus {
            self.focused = None;
        }
        if drop_request {
            self.focus_request = None;
        }
        if drop_popover {
            self.popover = None;
        }
    }

    // ========================
    // Transient UI state (never emitted)
    // ========================

    pub fn focus(&mut self, id: &str) {
        if self.position(id).is_some() {
            self.focused = Some(id.to_string());
        }
    }

    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// Pending focus target, cleared once taken
    pub fn take_focus_request(&mut self) -> Option<String> {
        self.focus_request.take()
    }

    /// Open `popover`, or close it if it is already the open one.
    pub fn toggle_popover(&mut self, popover: Popover) {
        if self.popover.as_ref() == Some(&popover) {
            self.popover = None;
        } else if self.position(popover.item_id()).is_some() {
            self.focused = Some(popover.item_id().to_string());
            self.popover = Some(popover);
        }
    }

    pub fn close_popover(&mut self) {
        self.popover = None;
    }

    /// Set item `id`'s `field` from a popover choice, close the popover and
    /// send focus back to the item.
    pub fn choose_from_popover(&mut self, id: &str, field: T::Field, value: &str) -> Option<String> {
        let emitted = self.update_item_field(id, field, value);
        self.popover = None;
        if self.position(id).is_some() {
            self.focus_request = Some(id.to_string());
        }
        emitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::record::{LearningField, LearningItem};
    use serde_json::{json, Value};

    type List = ControlledList<LearningItem, SequentialIds>;

    fn make_list(value: &str, key: Option<&str>) -> List {
        ControlledList::with_ids(
            value,
            key.map(str::to_string),
            ListConfig::default(),
            SequentialIds::starting_at(100),
        )
    }

    fn three_items() -> List {
        make_list(
            &json!([
                { "id": "a", "text": "one", "emoji": "📝" },
                { "id": "b", "text": "two", "emoji": "📝" },
                { "id": "c", "text": "three", "emoji": "📝" },
            ])
            .to_string(),
            Some("course-A"),
        )
    }

    fn ids(list: &List) -> Vec<&str> {
        list.items().iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_initialize_round_trips_valid_input() {
        let raw = json!([
            { "id": "1", "text": "Learn X", "emoji": "📝" },
            { "id": "2", "text": "Learn Y", "emoji": "🚀", "link": "https://example.com" },
        ]);
        let list = make_list(&raw.to_string(), None);
        let out: Value = serde_json::from_str(&list.serialized()).unwrap();
        assert_eq!(out, raw);
    }

    #[test]
    fn test_initialize_degrades_to_one_blank_item() {
        for bad in ["", "not json", "{\"id\":\"1\"}", "42", "[]", "[1, 2]", "null"] {
            let list = make_list(bad, None);
            assert_eq!(list.len(), 1, "input {:?}", bad);
            assert_eq!(list.items()[0].text, "");
            assert_eq!(list.items()[0].id, "100");
            assert_eq!(list.last_emitted(), None);
        }
    }

    #[test]
    fn test_add_item_gets_unique_id_and_focus_request() {
        // The id source would hand out "100", which is already taken
        let mut list = make_list(r#"[{"id":"100","text":"taken"}]"#, None);
        let added = list.add_item();

        assert_eq!(added.id, "101");
        assert_eq!(list.len(), 2);
        assert_eq!(list.items()[1].text, "");
        assert_eq!(list.take_focus_request().as_deref(), Some("101"));
        assert_eq!(list.take_focus_request(), None);

        let reparsed: Vec<LearningItem> = parse_items(&added.serialized).unwrap();
        assert_eq!(reparsed.len(), 2);
        assert_eq!(list.last_emitted(), Some(added.serialized.as_str()));
    }

    #[test]
    fn test_update_item_field() {
        let mut list = three_items();

        let emitted = list.update_item_field("b", LearningField::Text, "TWO").unwrap();
        assert!(emitted.contains("\"TWO\""));
        assert_eq!(list.item("b").unwrap().text, "TWO");

        // Same value and unknown ids do not emit
        assert_eq!(list.update_item_field("b", LearningField::Text, "TWO"), None);
        assert_eq!(list.update_item_field("zzz", LearningField::Text, "x"), None);
    }

    #[test]
    fn test_remove_item_is_idempotent_and_clears_focus() {
        let mut list = three_items();
        list.focus("b");
        list.toggle_popover(Popover::Link("b".to_string()));

        assert!(list.remove_item("b").is_some());
        assert_eq!(ids(&list), vec!["a", "c"]);
        assert_eq!(list.focused(), None);
        assert_eq!(list.popover(), None);

        let snapshot = list.clone();
        assert_eq!(list.remove_item("b"), None);
        assert_eq!(list, snapshot);
    }

    #[test]
    fn test_remove_keeps_focus_on_other_item() {
        let mut list = three_items();
        list.focus("a");
        list.remove_item("c");
        assert_eq!(list.focused(), Some("a"));
    }

    #[test]
    fn test_reorder_moves_item_and_focus_follows_id() {
        let mut list = three_items();
        list.focus("a");

        let emitted = list.reorder(0, 2).unwrap();
        assert_eq!(ids(&list), vec!["b", "c", "a"]);
        assert_eq!(list.focused(), Some("a"));

        let reparsed: Vec<LearningItem> = parse_items(&emitted).unwrap();
        let mut before: Vec<_> = three_items().items().to_vec();
        let mut after = reparsed;
        before.sort_by(|x, y| x.id.cmp(&y.id));
        after.sort_by(|x, y| x.id.cmp(&y.id));
        assert_eq!(before, after);
    }

    #[test]
    fn test_reorder_out_of_range_is_noop() {
        let mut list = three_items();
        assert_eq!(list.reorder(1, 1), None);
        assert_eq!(list.reorder(3, 0), None);
        assert_eq!(list.reorder(0, 3), None);
        assert_eq!(ids(&list), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_echo_leaves_state_untouched() {
        let mut list = three_items();
        list.focus("b");
        let emitted = list.update_item_field("b", LearningField::Text, "typing").unwrap();
        let snapshot = list.clone();

        assert_eq!(list.receive(&emitted, Some("course-A")), Reconciliation::Echo);
        assert_eq!(list, snapshot);
        assert_eq!(list.focused(), Some("b"));
    }

    #[test]
    fn test_reencoded_echo_is_recognised() {
        let mut list = three_items();
        let emitted = list.update_item_field("a", LearningField::Text, "x").unwrap();
        let pretty =
            serde_json::to_string_pretty(&serde_json::from_str::<Value>(&emitted).unwrap()).unwrap();
        assert_eq!(list.receive(&pretty, Some("course-A")), Reconciliation::Echo);
    }

    #[test]
    fn test_reset_only_on_new_key() {
        let mut list = three_items();
        list.focus("a");

        // Same key, different value: default policy keeps local items
        let outcome = list.receive(r#"[{"id":"z","text":"other"}]"#, Some("course-A"));
        assert_eq!(outcome, Reconciliation::KeptLocal);
        assert_eq!(ids(&list), vec!["a", "b", "c"]);

        // Missing key never resets
        let outcome = list.receive(r#"[{"id":"z","text":"other"}]"#, None);
        assert_eq!(outcome, Reconciliation::KeptLocal);

        let outcome = list.receive(r#"[{"id":"z","text":"other"}]"#, Some("course-B"));
        assert_eq!(outcome, Reconciliation::Reset);
        assert_eq!(ids(&list), vec!["z"]);
        assert_eq!(list.focused(), None);
        assert_eq!(list.reset_key(), Some("course-B"));
        assert_eq!(list.last_emitted(), None);
    }

    #[test]
    fn test_reassert_policy_resends_local_value() {
        let mut list = three_items();
        list.config.external_policy = ExternalChangePolicy::Reassert;

        let outcome = list.receive("[]", Some("course-A"));
        assert_eq!(outcome.emission(), Some(list.serialized().as_str()));
        assert_eq!(ids(&list), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_adopt_policy_takes_valid_external_value() {
        let mut list = three_items();
        list.config.external_policy = ExternalChangePolicy::Adopt;
        list.focus("c");

        let outcome = list.receive(
            r#"[{"id":"c","text":"three"},{"id":"d","text":"four"}]"#,
            Some("course-A"),
        );
        assert_eq!(outcome, Reconciliation::Adopted);
        assert_eq!(ids(&list), vec!["c", "d"]);
        assert_eq!(list.focused(), Some("c"));

        // Garbage is never adopted
        assert_eq!(list.receive("oops", Some("course-A")), Reconciliation::KeptLocal);
        assert_eq!(ids(&list), vec!["c", "d"]);
    }

    #[test]
    fn test_popover_toggle_and_choice() {
        let mut list = three_items();

        list.toggle_popover(Popover::Emoji("a".to_string()));
        assert_eq!(list.popover(), Some(&Popover::Emoji("a".to_string())));

        // Opening another popover replaces the first
        list.toggle_popover(Popover::Link("a".to_string()));
        assert_eq!(list.popover(), Some(&Popover::Link("a".to_string())));
        list.toggle_popover(Popover::Link("a".to_string()));
        assert_eq!(list.popover(), None);

        list.toggle_popover(Popover::Emoji("b".to_string()));
        let emitted = list.choose_from_popover("b", LearningField::Emoji, "🚀");
        assert!(emitted.is_some());
        assert_eq!(list.item("b").unwrap().emoji, "🚀");
        assert_eq!(list.popover(), None);
        assert_eq!(list.take_focus_request().as_deref(), Some("b"));
    }

    #[test]
    fn test_transient_state_is_not_serialized() {
        let mut list = three_items();
        let before = list.serialized();
        list.focus("a");
        list.toggle_popover(Popover::Emoji("a".to_string()));
        assert_eq!(list.serialized(), before);
        assert_eq!(list.last_emitted(), None);
    }

    #[test]
    fn test_is_scrollable() {
        let mut list = make_list("", None);
        for _ in 0..4 {
            list.add_item();
        }
        assert_eq!(list.len(), 5);
        assert!(!list.is_scrollable());
        list.add_item();
        assert!(list.is_scrollable());
    }

    #[test]
    fn test_duplicate_ids_are_reassigned() {
        let mut list = make_list(r#"[{"id":"1","text":"a"},{"id":1,"text":"b"}]"#, Some("course-A"));
        assert_eq!(list.len(), 2);
        assert_eq!(list.items()[0].id, "1");
        assert_ne!(list.items()[1].id, "1");
        assert_eq!(list.items()[1].text, "b");

        assert!(list.remove_item("1").is_some());
        assert!(list.remove_item("1").is_none());
        assert_eq!(list.len(), 1);
        assert_eq!(list.items()[0].text, "b");
    }

    #[test]
    fn test_adopted_value_gets_unique_ids() {
        let mut list = three_items();
        list.config.external_policy = ExternalChangePolicy::Adopt;

        let outcome = list.receive(r#"[{"id":"x","text":"1"},{"id":"x","text":"2"}]"#, Some("course-A"));
        assert_eq!(outcome, Reconciliation::Adopted);
        assert_eq!(list.items()[0].id, "x");
        assert_ne!(list.items()[1].id, "x");
    }

    #[test]
    fn test_late_echo_does_not_undo_later_edit() {
        let mut list = three_items();
        list.config.external_policy = ExternalChangePolicy::Adopt;

        let first = list.update_item_field("a", LearningField::Text, "a").unwrap();
        let second = list.update_item_field("a", LearningField::Text, "ab").unwrap();

        assert_eq!(list.receive(&first, Some("course-A")), Reconciliation::Echo);
        assert_eq!(list.item("a").unwrap().text, "ab");
        assert_eq!(list.last_emitted(), Some(second.as_str()));
        assert_eq!(list.receive(&second, Some("course-A")), Reconciliation::Echo);
    }
}
