//! Editor toolbar: structure, formatting, images and file exchange.
//!
//! Read-only members only see export. The hidden file inputs back the image
//! and import pickers.

use editor::format::FormatCommand;
use leptos::prelude::*;

use crate::pages::editor::{EditorActions, IMAGE_INPUT_ID, IMPORT_INPUT_ID};
use crate::state::editor::EditorState;

#[component]
pub fn EditorToolbar() -> impl IntoView {
    let editor = expect_context::<RwSignal<EditorState>>();
    let actions = expect_context::<EditorActions>();

    let editable = move || editor.get().editable;
    let uploading = move || editor.get().editor.is_uploading();

    view! {
        <div class="editor-toolbar">
            <Show when=editable>
                <button class="btn" on:click=move |_| actions.add_section()>
                    "Добавить раздел"
                </button>
                <button class="btn" on:click=move |_| actions.delete_active_section()>
                    "Удалить раздел"
                </button>
                <span class="editor-toolbar__divider"></span>
                {FormatCommand::ALL
                    .into_iter()
                    .map(|command| {
                        view! {
                            <button
                                class="btn editor-toolbar__format"
                                title=command.title()
                                on:mousedown=|ev| ev.prevent_default()
                                on:click=move |_| actions.format(command)
                            >
                                {command.label()}
                            </button>
                        }
                    })
                    .collect_view()}
                <span class="editor-toolbar__divider"></span>
                <button
                    class="btn"
                    on:mousedown=|ev| ev.prevent_default()
                    on:click=move |_| actions.start_image_insert()
                >
                    "Вставить изображение"
                </button>
                <button class="btn" on:click=move |_| actions.start_import()>
                    "Импорт"
                </button>
                <button class="btn" disabled=uploading on:click=move |_| actions.upload()>
                    "Сохранить на сервере"
                </button>
            </Show>
            <button class="btn" on:click=move |_| actions.export()>
                "Экспорт"
            </button>
            <input
                id=IMAGE_INPUT_ID
                type="file"
                accept="image/*"
                style="display: none"
                on:change=move |_| actions.image_chosen()
                on:cancel=move |_: leptos::ev::Event| actions.image_cancelled()
            />
            <input
                id=IMPORT_INPUT_ID
                type="file"
                accept=".html,text/html"
                style="display: none"
                on:change=move |_| actions.import_chosen()
            />
        </div>
    }
}
