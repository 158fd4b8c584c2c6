//! Learning Item Row Component
//!
//! One editable row: emoji, text, optional link, remove. Reads its item
//! from the shared list by id, so typing never rebuilds the input.

use controlled_list::{LearningField, LearningItem, Popover};
use gloo_timers::callback::Timeout;
use leptos::prelude::*;

use leptos_dragdrop::*;

use crate::components::delete_confirm_button::DeleteConfirmButton;
use crate::components::emoji_picker::EmojiPicker;
use crate::components::learning_items_list::{
    apply_focus_request, commit, focus_element, reveal_element, schedule_blur_check, LearningList,
    ITEM_INPUT_CLASS,
};

/// Longest link shown in the row badge before it is cut
const LINK_BADGE_CHARS: usize = 24;

pub fn input_dom_id(item_id: &str) -> String {
    format!("learning-item-input-{}", item_id)
}

fn link_input_dom_id(item_id: &str) -> String {
    format!("learning-item-link-{}", item_id)
}

/// Shorten `text` to `max` characters, marking the cut with an ellipsis
pub fn truncate_label(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Reactive read of one field of item `item_id`
fn item_field<R>(
    list: RwSignal<LearningList>,
    item_id: String,
    read: fn(&LearningItem) -> R,
) -> impl Fn() -> Option<R> + Clone + Send + Sync + 'static
where
    R: 'static,
{
    move || list.with(|l| l.item(&item_id).map(read))
}

#[component]
pub fn LearningItemRow(
    item_id: String,
    list: RwSignal<LearningList>,
    on_change: Callback<String>,
    dnd: DndSignals,
) -> impl IntoView {
    let text = item_field(list, item_id.clone(), |i| i.text.clone());
    let emoji = item_field(list, item_id.clone(), |i| i.emoji.clone());
    let link = item_field(list, item_id.clone(), |i| i.link.clone());

    let emoji_open = {
        let popover = Popover::Emoji(item_id.clone());
        move || list.with(|l| l.popover() == Some(&popover))
    };
    let link_open = {
        let popover = Popover::Link(item_id.clone());
        move || list.with(|l| l.popover() == Some(&popover))
    };

    let row_class = {
        let item_id = item_id.clone();
        move || {
            let mut c = String::from("learning-item-wrapper");
            if list.with(|l| l.focused() == Some(item_id.as_str())) { c.push_str(" focused"); }
            if dnd.dragging_id_read.get().as_deref() == Some(item_id.as_str()) { c.push_str(" dragging"); }
            if dnd.drop_target_read.get() == Some(DropTarget::Before(item_id.clone())) { c.push_str(" drop-before"); }
            c
        }
    };

    let on_text_input = {
        let item_id = item_id.clone();
        move |ev: web_sys::Event| {
            let value = event_target_value(&ev);
            commit(list, on_change, |l| l.update_item_field(&item_id, LearningField::Text, &value));
        }
    };

    let on_link_input = {
        let item_id = item_id.clone();
        move |ev: web_sys::Event| {
            let value = event_target_value(&ev);
            commit(list, on_change, |l| l.update_item_field(&item_id, LearningField::Link, &value));
        }
    };

    let on_focus = {
        let item_id = item_id.clone();
        move |_| {
            list.update(|l| l.focus(&item_id));
            if list.with_untracked(|l| l.is_scrollable()) {
                reveal_element(&input_dom_id(&item_id));
            }
        }
    };

    let toggle_emoji = {
        let item_id = item_id.clone();
        move |_| list.update(|l| l.toggle_popover(Popover::Emoji(item_id.clone())))
    };

    let toggle_link = {
        let item_id = item_id.clone();
        move |_| {
            list.update(|l| l.toggle_popover(Popover::Link(item_id.clone())));
            let link_input = link_input_dom_id(&item_id);
            Timeout::new(0, move || focus_element(&link_input)).forget();
        }
    };

    let on_emoji_select = {
        let item_id = item_id.clone();
        Callback::new(move |choice: String| {
            commit(list, on_change, |l| l.choose_from_popover(&item_id, LearningField::Emoji, &choice));
            apply_focus_request(list);
        })
    };

    let on_remove = {
        let item_id = item_id.clone();
        Callback::new(move |_: ()| {
            commit(list, on_change, |l| l.remove_item(&item_id));
        })
    };

    let text_input_id = input_dom_id(&item_id);
    let link_input_id = link_input_dom_id(&item_id);
    let current_emoji = Signal::derive({
        let emoji = emoji.clone();
        move || emoji().unwrap_or_default()
    });

    view! {
        <div
            class=row_class
            id=format!("learning-item-{}", item_id)
            on:mousedown=make_on_mousedown(dnd, item_id.clone())
            on:mouseenter=make_on_row_mouseenter(dnd, item_id.clone())
            on:mouseleave=make_on_mouseleave(dnd)
        >
            <div class="learning-item">
                <span class="drag-handle" title="Drag to reorder">"⋮⋮"</span>

                <button type="button" class="emoji-btn" on:click=toggle_emoji>
                    {move || emoji().unwrap_or_default()}
                </button>

                <input
                    type="text"
                    id=text_input_id
                    class=ITEM_INPUT_CLASS
                    placeholder="What will students learn?"
                    prop:value=move || text().unwrap_or_default()
                    on:input=on_text_input
                    on:focus=on_focus.clone()
                    on:blur=move |_| schedule_blur_check(list)
                />

                {
                    let link = link.clone();
                    move || link().flatten().map(|href| view! {
                        <span class="link-badge" title=href.clone()>
                            "🔗 " {truncate_label(&href, LINK_BADGE_CHARS)}
                        </span>
                    })
                }

                <button
                    type="button"
                    class="link-btn"
                    title={
                        let link = link.clone();
                        move || if link().flatten().is_some() { "Edit link" } else { "Add link" }
                    }
                    on:click=toggle_link
                >
                    "🔗"
                </button>

                <DeleteConfirmButton
                    button_class="remove-btn"
                    label="Remove item"
                    on_confirm=on_remove
                />
            </div>

            <Show when=emoji_open>
                <EmojiPicker current=current_emoji on_select=on_emoji_select />
            </Show>

            <Show when=link_open>
                <div class="item-popover link-popover">
                    <input
                        type="url"
                        id=link_input_id.clone()
                        class=ITEM_INPUT_CLASS
                        placeholder="https://"
                        prop:value={
                            let link = link.clone();
                            move || link().flatten().unwrap_or_default()
                        }
                        on:input=on_link_input.clone()
                        on:focus=on_focus.clone()
                        on:blur=move |_| schedule_blur_check(list)
                    />
                </div>
            </Show>
        </div>
    }
}
