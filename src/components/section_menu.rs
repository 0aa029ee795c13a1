//! Navigation menu: one link per section, in document order.

use editor::consts::MENU_ID;
use leptos::prelude::*;

use crate::state::editor::EditorState;
use crate::util::selection::scroll_to_anchor;

/// Section links. Clicking one scrolls smoothly instead of jumping.
#[component]
pub fn SectionMenu() -> impl IntoView {
    let editor = expect_context::<RwSignal<EditorState>>();

    view! {
        <nav id=MENU_ID class="menu">
            <For
                each=move || editor.with(|s| s.editor.menu().to_vec())
                key=|entry| (entry.id, entry.label.clone())
                children=move |entry| {
                    let href = format!("#{}", entry.anchor);
                    let anchor = entry.anchor;
                    view! {
                        <a
                            class="menu-item"
                            href=href
                            on:click=move |ev| {
                                ev.prevent_default();
                                scroll_to_anchor(&anchor);
                            }
                        >
                            {entry.label}
                        </a>
                    }
                }
            />
        </nav>
    }
}
