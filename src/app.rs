//! Course Editor App
//!
//! Root component: provides the editor settings and the course store.

use controlled_list::ListConfig;
use leptos::prelude::*;
use reactive_stores::Store;

use crate::components::CourseForm;
use crate::context::EditorContext;
use crate::models::sample_courses;
use crate::store::{store_select_course, CourseFormState};

/// Editor settings; keys left out keep their defaults
const EDITOR_CONFIG: &str = r#"{ "external_policy": "keep_local", "scroll_threshold": 5 }"#;

fn editor_config() -> ListConfig {
    ListConfig::from_json(EDITOR_CONFIG).unwrap_or_else(|e| {
        log::warn!("[APP] bad editor config, using defaults: {}", e);
        ListConfig::default()
    })
}

#[component]
pub fn App() -> impl IntoView {
    let config = editor_config();
    provide_context(EditorContext::new(config.clone()));

    let courses = sample_courses();
    let first = courses.first().map(|c| c.course_uuid.clone());
    log::info!("[APP] loaded {} courses", courses.len());

    let store = Store::new(CourseFormState::new(courses));
    provide_context(store);

    if let Some(uuid) = first {
        store_select_course(&store, &uuid, &config);
    }

    view! {
        <main class="main-content">
            <h1>"Edit course"</h1>
            <CourseForm />
        </main>
    }
}
