//! Learning Items List Component
//!
//! Editable list of "what you will learn" items bound to the course form's
//! serialized learnings value.
//!
//! The component keeps its own [`ControlledList`] and only reports
//! changes upward through `on_change`. Values coming back down are run
//! through `receive`, so our own echoes never re-render the rows and a
//! new `reset_key` (another course) reloads them.

use controlled_list::{ControlledList, LearningItem, Reconciliation};
use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

use leptos_dragdrop::*;

use crate::components::learning_item_row::{input_dom_id, LearningItemRow};
use crate::context::EditorContext;

pub type LearningList = ControlledList<LearningItem>;

/// Class shared by every text input inside the list; focus moving between
/// them is not a blur of the list.
pub const ITEM_INPUT_CLASS: &str = "learning-item-input";

const SCROLL_CONTAINER_ID: &str = "learning-items-scroll";

/// Apply a list mutation and send its emission to the parent
pub fn commit(
    list: RwSignal<LearningList>,
    on_change: Callback<String>,
    op: impl FnOnce(&mut LearningList) -> Option<String>,
) {
    let mut emitted = None;
    list.update(|l| emitted = op(l));
    if let Some(value) = emitted {
        on_change.run(value);
    }
}

/// Focus an element by DOM id
pub fn focus_element(dom_id: &str) {
    let element = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(dom_id))
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok());
    if let Some(element) = element {
        let _ = element.focus();
    }
}

/// Scroll an element into the visible part of its scroll container,
/// moving as little as possible.
pub fn reveal_element(dom_id: &str) {
    let element = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(dom_id));
    if let Some(element) = element {
        let options = web_sys::ScrollIntoViewOptions::new();
        options.set_block(web_sys::ScrollLogicalPosition::Nearest);
        element.scroll_into_view_with_scroll_into_view_options(&options);
    }
}

/// After the next render, move keyboard focus to the item the list asked
/// for (a new item, or the item whose popover just closed).
pub fn apply_focus_request(list: RwSignal<LearningList>) {
    Timeout::new(0, move || {
        let mut request = None;
        list.try_update(|l| {
            request = l.take_focus_request();
            if let Some(id) = &request {
                l.focus(id);
            }
        });
        if let Some(id) = request {
            let dom_id = input_dom_id(&id);
            focus_element(&dom_id);
            if list.try_with_untracked(|l| l.is_scrollable()).unwrap_or(false) {
                reveal_element(&dom_id);
            }
        }
    })
    .forget();
}

/// Blur the list unless focus landed on another of its inputs.
/// Checked after a short delay so the newly focused element is known.
pub fn schedule_blur_check(list: RwSignal<LearningList>) {
    Timeout::new(100, move || {
        let still_inside = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.active_element())
            .is_some_and(|el| el.class_name().split_whitespace().any(|c| c == ITEM_INPUT_CLASS));
        if !still_inside {
            list.try_update(|l| l.blur());
        }
    })
    .forget();
}

/// Learning items editor
#[component]
pub fn LearningItemsList(
    /// Parent's serialized learnings
    #[prop(into)] value: Signal<String>,
    /// Identity of the record being edited
    #[prop(into)] reset_key: Signal<Option<String>>,
    #[prop(into)] on_change: Callback<String>,
    /// Validation message from the parent form
    #[prop(into)] error: Signal<Option<String>>,
) -> impl IntoView {
    let ctx = use_context::<EditorContext>().expect("EditorContext should be provided");

    let list = RwSignal::new(LearningList::new(
        &value.get_untracked(),
        reset_key.get_untracked(),
        ctx.config(),
    ));

    // Parent value or reset key changed
    Effect::new(move |_| {
        let value = value.get();
        let key = reset_key.get();
        let mut outcome = None;
        list.maybe_update(|l| {
            let result = l.receive(&value, key.as_deref());
            let changed = result.changed_state();
            outcome = Some(result);
            changed
        });
        match outcome {
            Some(Reconciliation::Reset) => {
                log::debug!("[LearningItemsList] reloaded for {:?}", key);
            }
            Some(Reconciliation::Reasserted(local)) => on_change.run(local),
            _ => {}
        }
    });

    // Clicks outside popovers close them
    let outside_click = window_event_listener(leptos::ev::mousedown, move |ev| {
        let inside = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            .and_then(|el| el.closest(".item-popover, .emoji-btn, .link-btn").ok().flatten())
            .is_some();
        if !inside && list.with_untracked(|l| l.popover().is_some()) {
            list.update(|l| l.close_popover());
        }
    });
    on_cleanup(move || outside_click.remove());

    // Drag to reorder
    let dnd = create_dnd_signals();
    bind_global_mouseup(dnd, move |dragged, target| {
        commit(list, on_change, move |l| {
            let from = l.position(&dragged)?;
            let slot = match target {
                DropTarget::Before(id) => l.position(&id)?,
                DropTarget::End => l.len(),
            };
            let to = slot_destination(from, slot);
            log::debug!("[DND] move {} from {} to {}", dragged, from, to);
            l.reorder(from, to)
        });
    });

    let add_item = move |_| {
        let mut added = None;
        list.update(|l| added = Some(l.add_item()));
        if let Some(added) = added {
            on_change.run(added.serialized);
            apply_focus_request(list);
        }
    };

    let row_ids = move || {
        list.with(|l| l.items().iter().map(|item| item.id.clone()).collect::<Vec<_>>())
    };
    let is_empty = move || list.with(|l| l.is_empty());
    let container_class = move || {
        if list.with(|l| l.is_scrollable()) {
            "learning-items scrollable"
        } else {
            "learning-items"
        }
    };
    let is_end_target = move || dnd.drop_target_read.get() == Some(DropTarget::End);

    view! {
        <div class="learning-items-list">
            <Show when=is_empty>
                <div class="learning-items-empty">"No learning items yet. Add what students will learn."</div>
            </Show>

            <div id=SCROLL_CONTAINER_ID class=container_class>
                <For
                    each=row_ids
                    key=|id| id.clone()
                    children=move |id| view! {
                        <LearningItemRow item_id=id list=list on_change=on_change dnd=dnd />
                    }
                />
                <div
                    class=move || if is_end_target() { "drop-zone active" } else { "drop-zone" }
                    on:mouseenter=make_on_end_mouseenter(dnd)
                    on:mouseleave=make_on_mouseleave(dnd)
                />
            </div>

            <button type="button" class="add-learning-item" on:click=add_item>
                "+ Add item"
            </button>

            {move || error.get().map(|message| view! {
                <p class="field-error">{message}</p>
            })}
        </div>
    }
}
