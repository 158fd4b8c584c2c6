//! Course Form Component
//!
//! The parent form: picks a course, hosts the learnings editor and
//! validates what it produces.

use controlled_list::validate_learnings;
use leptos::prelude::*;

use crate::components::course_tab_bar::CourseTabBar;
use crate::components::learning_items_list::LearningItemsList;
use crate::context::EditorContext;
use crate::store::{store_save_learnings, store_select_course, use_course_store, CourseFormStateStoreFields};

#[component]
pub fn CourseForm() -> impl IntoView {
    let ctx = use_context::<EditorContext>().expect("EditorContext should be provided");
    let store = use_course_store();

    let learnings = Signal::derive(move || store.learnings().get());
    let course_uuid = Signal::derive(move || store.course_uuid().get());
    let validation = Memo::new(move |_| validate_learnings(&store.learnings().get()));
    let error = Signal::derive(move || validation.get().err().map(|e| e.to_string()));

    let on_select = Callback::new(move |uuid: String| {
        store_select_course(&store, &uuid, &ctx.config());
    });
    let on_change = Callback::new(move |value: String| store.learnings().set(value));

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if validation.get_untracked().is_ok() {
            store_save_learnings(&store);
        }
    };

    view! {
        <form class="course-form" on:submit=on_submit>
            <CourseTabBar on_select=on_select />

            <Show
                when=move || course_uuid.get().is_some()
                fallback=|| view! { <p class="course-form-hint">"Pick a course to edit."</p> }
            >
                <label class="field-label">"What students will learn"</label>
                <LearningItemsList
                    value=learnings
                    reset_key=course_uuid
                    on_change=on_change
                    error=error
                />
                <div class="course-form-actions">
                    <span class="item-count">
                        {move || match validation.get() {
                            Ok(count) => format!("{} items", count),
                            Err(_) => String::new(),
                        }}
                    </span>
                    <button type="submit" disabled=move || validation.get().is_err()>
                        "Save"
                    </button>
                    {move || (store.saved_version().get() > 0).then(|| view! {
                        <span class="saved-note">"Saved"</span>
                    })}
                </div>
            </Show>
        </form>
    }
}
