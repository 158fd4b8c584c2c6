//! UI Components
//!
//! Leptos components for the course editor.

mod course_form;
mod course_tab_bar;
mod delete_confirm_button;
mod emoji_picker;
mod learning_item_row;
mod learning_items_list;

pub use course_form::CourseForm;
