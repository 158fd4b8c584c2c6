//! Course Form Store
//!
//! The parent form's state. Owns the canonical learnings value the list
//! component edits.

use controlled_list::{normalize_legacy, ClockIds, LearningItem, ListConfig};
use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::Course;

#[derive(Clone, Debug, Default, Store)]
pub struct CourseFormState {
    /// Courses the user can switch between
    pub courses: Vec<Course>,
    /// Course being edited; its change is the list's reset key
    pub course_uuid: Option<String>,
    /// Serialized learnings for the course being edited
    pub learnings: String,
    /// Incremented on every save
    pub saved_version: u32,
}

impl CourseFormState {
    pub fn new(courses: Vec<Course>) -> Self {
        Self {
            courses,
            ..Default::default()
        }
    }
}

/// Type alias for the store
pub type CourseStore = Store<CourseFormState>;

/// Get the course store from context
pub fn use_course_store() -> CourseStore {
    expect_context::<CourseStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Load a course into the form
pub fn store_select_course(store: &CourseStore, course_uuid: &str, config: &ListConfig) {
    // Reloading the open course would drop edits the list still shows.
    if store.course_uuid().get_untracked().as_deref() == Some(course_uuid) {
        return;
    }
    let stored = store
        .courses()
        .read_untracked()
        .iter()
        .find(|c| c.course_uuid == course_uuid)
        .map(|c| c.learnings.clone());
    let Some(stored) = stored else {
        log::warn!("[Store] unknown course {}", course_uuid);
        return;
    };
    let learnings = normalize_legacy::<LearningItem>(&stored, &mut ClockIds::default(), config);
    // Value before key: the list only reloads once it sees the new key.
    store.learnings().set(learnings);
    store.course_uuid().set(Some(course_uuid.to_string()));
}

/// Write the form's learnings back into the current course
pub fn store_save_learnings(store: &CourseStore) {
    let Some(course_uuid) = store.course_uuid().get_untracked() else {
        return;
    };
    let learnings = store.learnings().get_untracked();
    if let Some(course) = store
        .courses()
        .write()
        .iter_mut()
        .find(|c| c.course_uuid == course_uuid)
    {
        course.learnings = learnings;
    }
    store.saved_version().update(|v| *v += 1);
    log::info!("[Store] saved learnings for {}", course_uuid);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(uuid: &str, learnings: &str) -> Course {
        Course {
            course_uuid: uuid.to_string(),
            name: uuid.to_string(),
            learnings: learnings.to_string(),
        }
    }

    fn make_store() -> CourseStore {
        Store::new(CourseFormState::new(vec![
            course("a", r#"[{"id":"1","text":"stored A"}]"#),
            course("b", r#"[{"id":"2","text":"stored B"}]"#),
        ]))
    }

    #[test]
    fn test_reselecting_open_course_keeps_edits() {
        let owner = Owner::new();
        owner.set();
        let store = make_store();
        let config = ListConfig::default();

        store_select_course(&store, "a", &config);
        assert_eq!(store.learnings().get_untracked(), r#"[{"id":"1","text":"stored A"}]"#);

        let edited = r#"[{"id":"1","text":"edited A"}]"#;
        store.learnings().set(edited.to_string());
        store_select_course(&store, "a", &config);
        assert_eq!(store.learnings().get_untracked(), edited);

        store_save_learnings(&store);
        let saved = store.courses().read_untracked()[0].learnings.clone();
        assert_eq!(saved, edited);
    }

    #[test]
    fn test_switching_course_loads_its_value() {
        let owner = Owner::new();
        owner.set();
        let store = make_store();
        let config = ListConfig::default();

        store_select_course(&store, "a", &config);
        store_select_course(&store, "b", &config);
        assert_eq!(store.course_uuid().get_untracked().as_deref(), Some("b"));
        assert_eq!(store.learnings().get_untracked(), r#"[{"id":"2","text":"stored B"}]"#);
    }
}
