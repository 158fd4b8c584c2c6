//! Course Tab Bar Component
//!
//! Tab bar for switching the course being edited.

use leptos::prelude::*;

use crate::store::{use_course_store, CourseFormStateStoreFields};

#[component]
pub fn CourseTabBar(
    /// Called with the picked course's uuid
    #[prop(into)] on_select: Callback<String>,
) -> impl IntoView {
    let store = use_course_store();

    view! {
        <div class="course-tab-bar">
            <For
                each=move || store.courses().get()
                key=|course| course.course_uuid.clone()
                children=move |course| {
                    let uuid = course.course_uuid.clone();
                    let is_active = {
                        let uuid = uuid.clone();
                        move || store.course_uuid().get().as_deref() == Some(uuid.as_str())
                    };
                    view! {
                        <button
                            type="button"
                            class=move || if is_active() { "course-tab active" } else { "course-tab" }
                            on:click=move |_| on_select.run(uuid.clone())
                        >
                            {course.name.clone()}
                        </button>
                    }
                }
            />
        </div>
    }
}
