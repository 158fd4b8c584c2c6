//! Emoji Picker Component

use leptos::prelude::*;

/// Emoji offered for learning items
pub const EMOJI_CHOICES: &[&str] = &[
    "📝", "🎯", "🚀", "💡", "📚", "🧠", "🛠️", "✅", "⭐", "🔍", "🧪", "🎓", "🦀", "📊", "🔒", "🌍",
];

/// Grid of preset emoji; clicking one reports it
#[component]
pub fn EmojiPicker(
    /// Emoji currently on the item, highlighted in the grid
    #[prop(into)] current: Signal<String>,
    #[prop(into)] on_select: Callback<String>,
) -> impl IntoView {
    view! {
        <div class="item-popover emoji-picker">
            {EMOJI_CHOICES.iter().map(|emoji| {
                let emoji = *emoji;
                let is_current = move || current.get() == emoji;
                view! {
                    <button
                        type="button"
                        class=move || if is_current() { "emoji-choice active" } else { "emoji-choice" }
                        on:click=move |_| on_select.run(emoji.to_string())
                    >
                        {emoji}
                    </button>
                }
            }).collect_view()}
        </div>
    }
}
