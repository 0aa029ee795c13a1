//! Team knowledge-base page: the section editor for `/team/:id`.
//!
//! ARCHITECTURE
//! ============
//! The page resolves the route's team, decides whether the user may edit it
//! (admins only) and loads the sections embedded in the team page. Every user
//! operation funnels through [`EditorActions`], which `App` builds and
//! provides so its signals outlive any one visit to the page. Work still in
//! flight when those signals are gone stops quietly.
//!
//! Only the newest team open applies: leaving `/team/a` for `/team/b` while
//! `a` is still loading supersedes it, and `a`'s late result is dropped.
//!
//! TRADE-OFFS
//! ==========
//! Local persistence is debounced: content edits arrive on every keystroke,
//! and serializing the whole document each time is wasteful. Structural
//! changes go through the same debounce; the last write wins either way.
//!
//! Uploads run on a snapshot of the document so no signal is borrowed across
//! an await. The inlined sources are applied to the live document afterwards,
//! which leaves edits made during the upload intact.

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

use std::time::Duration;

use editor::consts::{EXPORT_FILE_NAME, SECTIONS_CONTAINER_ID};
use editor::format::FormatCommand;
use editor::image_block::ImageId;
use editor::{SectionId, SelectionTracker};
use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_navigate, use_params_map};

use crate::components::editor_toolbar::EditorToolbar;
use crate::components::section_block::SectionBlock;
use crate::components::section_menu::SectionMenu;
use crate::config::ClientConfig;
use crate::net::api::{HttpImageFetcher, HttpUploader, fetch_team_page};
use crate::net::types::team_page_sections;
use crate::pages::teams::{load_teams, log_out};
use crate::state::auth::AuthState;
use crate::state::editor::{EditorState, UPLOADING_STATUS, import_status, upload_status};
use crate::state::teams::TeamsState;
use crate::util::dom_image::DomImageResolver;
use crate::util::download::offer_download;
use crate::util::file_io::{file_name, read_image, read_text, take_picked_file};
use crate::util::selection::{exec_format, focus_selector, open_picker};
use crate::util::storage::LocalStorage;

/// Hidden file input used for image insert/replace.
pub const IMAGE_INPUT_ID: &str = "image-file-input";
/// Hidden file input used for import.
pub const IMPORT_INPUT_ID: &str = "import-file-input";

const PERSIST_DEBOUNCE: Duration = Duration::from_millis(300);
const EXPORT_TITLE: &str = "База знаний";

/// Every editing operation of the page. `Copy`, so event handlers can take it
/// freely.
#[derive(Clone, Copy)]
pub struct EditorActions {
    editor: RwSignal<EditorState>,
    tracker: RwSignal<SelectionTracker>,
    auth: RwSignal<AuthState>,
    config: StoredValue<ClientConfig>,
    persist_generation: RwSignal<u64>,
}

impl EditorActions {
    /// Bind the actions to the app's shared state. Call from the owner the
    /// signals belong to.
    pub fn new(
        editor: RwSignal<EditorState>,
        tracker: RwSignal<SelectionTracker>,
        auth: RwSignal<AuthState>,
        config: ClientConfig,
    ) -> Self {
        Self {
            editor,
            tracker,
            auth,
            config: StoredValue::new(config),
            persist_generation: RwSignal::new(0),
        }
    }

    /// Write the document to local storage once edits settle.
    pub fn schedule_persist(self) {
        let bumped = self.persist_generation.try_update_untracked(|g| {
            *g += 1;
            *g
        });
        let Some(generation) = bumped else {
            return;
        };
        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            gloo_timers::future::sleep(PERSIST_DEBOUNCE).await;
            if self.persist_generation.try_get_untracked() == Some(generation) {
                self.persist_now();
            }
        });
        #[cfg(not(feature = "csr"))]
        {
            let _ = (PERSIST_DEBOUNCE, generation);
            self.persist_now();
        }
    }

    fn persist_now(self) {
        self.editor.try_update(|s| s.persist_to(&mut LocalStorage));
    }

    /// Append a default section.
    pub fn add_section(self) {
        self.editor.update(|s| {
            s.editor.add_section(None);
        });
        self.schedule_persist();
    }

    /// Delete the section holding the caret.
    pub fn delete_active_section(self) {
        let Some(active) = self.tracker.get_untracked().active() else {
            return;
        };
        self.editor.update(|s| {
            if let Err(e) = s.editor.delete_section(active, &mut LocalStorage) {
                log::error!("failed to persist after delete: {e}");
            }
        });
        self.retain_tracked();
    }

    /// Title edited in place.
    pub fn set_title(self, id: SectionId, title: &str) {
        if self.editor.try_update(|s| s.editor.set_title(id, title)).unwrap_or(false) {
            self.schedule_persist();
        }
    }

    /// Content edited in place. The DOM already shows it, so nothing
    /// re-renders.
    pub fn sync_content(self, id: SectionId, content: &str) {
        let changed = self
            .editor
            .try_update_untracked(|s| s.editor.sync_content(id, content))
            .unwrap_or(false);
        if changed {
            self.schedule_persist();
        }
    }

    /// Apply an inline format to the current selection.
    pub fn format(self, command: FormatCommand) {
        if exec_format(command) {
            self.schedule_persist();
        }
    }

    /// Open the picker for an image at the caret's section.
    pub fn start_image_insert(self) {
        let active = self.tracker.get_untracked().active();
        if self.editor.try_update(|s| s.request_image(active)).unwrap_or(false) {
            open_picker(IMAGE_INPUT_ID);
        }
    }

    /// Open the picker to replace `image`.
    pub fn start_image_replace(self, image: ImageId) {
        if self.editor.try_update(|s| s.request_replace(image)).unwrap_or(false) {
            open_picker(IMAGE_INPUT_ID);
        }
    }

    /// The picker was dismissed without a file.
    pub fn image_cancelled(self) {
        self.editor.try_update(|s| s.image_picked(None));
    }

    /// A file was chosen in the image picker.
    pub fn image_chosen(self) {
        let file = take_picked_file(IMAGE_INPUT_ID);
        let name = file.as_ref().map(file_name);
        if !self.editor.try_update(|s| s.image_picked(name)).unwrap_or(false) {
            return;
        }
        let Some(file) = file else {
            return;
        };
        leptos::task::spawn_local(async move {
            match read_image(&file).await {
                Ok(image) => {
                    let focus = self.editor.try_update(|s| s.place_image(image.as_str())).flatten();
                    self.schedule_persist();
                    if let Some(selector) = focus {
                        // Let the re-rendered section reach the DOM first.
                        #[cfg(feature = "csr")]
                        gloo_timers::future::sleep(Duration::ZERO).await;
                        focus_selector(&selector);
                    }
                }
                Err(e) => {
                    self.editor.try_update(|s| s.image_failed(&e));
                }
            }
        });
    }

    /// Remove an inserted image and its controls.
    pub fn delete_image(self, image: ImageId) {
        if self.editor.try_update(|s| s.editor.delete_image_container(image)).unwrap_or(false) {
            self.schedule_persist();
        }
    }

    /// Inline every image and offer the page as `base.html`.
    pub fn export(self) {
        let exported = self
            .editor
            .try_update(|s| s.editor.export_to_file(&DomImageResolver, EXPORT_TITLE));
        match exported {
            Some(Ok(file)) => {
                if let Err(e) = offer_download(&file) {
                    log::error!("failed to offer {EXPORT_FILE_NAME}: {e}");
                    self.set_status(format!("Не удалось сохранить файл: {e}"));
                }
                self.schedule_persist();
            }
            Some(Err(e)) => {
                log::error!("export failed: {e}");
                self.set_status(format!("Экспорт не удался: {e}"));
            }
            None => {}
        }
    }

    /// Open the picker for a page to import.
    pub fn start_import(self) {
        open_picker(IMPORT_INPUT_ID);
    }

    /// A file was chosen in the import picker.
    pub fn import_chosen(self) {
        let Some(file) = take_picked_file(IMPORT_INPUT_ID) else {
            return;
        };
        leptos::task::spawn_local(async move {
            match read_text(&file).await {
                Ok(text) => {
                    let imported = self.editor.try_update(|s| {
                        let count = s.editor.import_from_file(&text);
                        s.status = Some(import_status(count));
                    });
                    if imported.is_none() {
                        return;
                    }
                    self.retain_tracked();
                    self.schedule_persist();
                }
                Err(e) => {
                    log::error!("import failed: {e}");
                    self.set_status(format!("Импорт не удался: {e}"));
                }
            }
        });
    }

    /// Inline every image and post the sections to the backend.
    pub fn upload(self) {
        let Some(team_id) = self.editor.with_untracked(|s| s.team_id.clone()) else {
            return;
        };
        let started = self.editor.try_update(|s| s.editor.begin_upload());
        match started {
            Some(Ok(())) => {}
            Some(Err(e)) => {
                self.set_status(upload_status::<()>(&Err(e)));
                return;
            }
            None => return,
        }
        self.set_status(UPLOADING_STATUS.to_owned());

        let snapshot = self.editor.with_untracked(|s| s.editor.clone());
        let session_id = self.auth.get_untracked().session_id();
        let uploader = HttpUploader { config: self.config.get_value() };
        leptos::task::spawn_local(async move {
            let result = snapshot
                .upload_content(&HttpImageFetcher, &uploader, &team_id, &session_id)
                .await;
            match &result {
                Ok(_) => log::info!("Content successfully uploaded"),
                Err(e) => log::error!("Failed to upload content: {e}"),
            }
            if self.editor.try_update(|s| s.finish_upload(&result)).is_some() {
                self.schedule_persist();
            }
        });
    }

    fn set_status(self, status: String) {
        self.editor.try_update(|s| s.status = Some(status));
    }

    fn retain_tracked(self) {
        self.tracker
            .try_update(|t| self.editor.try_with_untracked(|s| t.retain_in(s.editor.store())));
    }
}

/// Knowledge-base page for the team in the route. Redirects to `/login`
/// without a token.
#[component]
pub fn TeamEditorPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let teams = expect_context::<RwSignal<TeamsState>>();
    let editor = expect_context::<RwSignal<EditorState>>();
    let config = expect_context::<ClientConfig>();
    let actions = expect_context::<EditorActions>();
    let params = use_params_map();
    let navigate = use_navigate();

    let team_id = move || params.read().get("id");

    let navigate_login = navigate.clone();
    Effect::new(move || {
        if !auth.get().signed_in() {
            navigate_login("/login", NavigateOptions::default());
        }
    });

    // Admin rights come from the team list; fetch it if this page was the
    // entry point.
    let teams_config = config.clone();
    Effect::new(move || {
        let state = teams.get();
        if auth.get().signed_in() && !state.settled() && !state.loading {
            load_teams(teams_config.clone(), auth, teams);
        }
    });

    // The team that is open or being fetched.
    let wanted = Memo::new(move |_| editor.with(|s| s.pending_team.clone().or_else(|| s.team_id.clone())));

    Effect::new(move || {
        let Some(id) = team_id() else {
            return;
        };
        if !teams.with(TeamsState::settled) || wanted.get().as_deref() == Some(id.as_str()) {
            return;
        }
        let editable = teams.with_untracked(|t| t.can_edit(&id));
        if !editor.try_update(|s| s.begin_open(&id)).unwrap_or(false) {
            return;
        }
        let session_id = auth.get_untracked().session_id();
        let config = config.clone();
        leptos::task::spawn_local(async move {
            let sections = match fetch_team_page(&config, &id, &session_id).await {
                Ok(html) => team_page_sections(&html),
                Err(e) => {
                    log::error!("failed to load team {id}: {e}");
                    Vec::new()
                }
            };
            let opened = editor.try_update(|s| s.finish_open(&id, editable, sections, &LocalStorage));
            match opened.flatten() {
                Some(source) => {
                    log::debug!("opened team {id} from {source:?}");
                    actions.retain_tracked();
                }
                None => log::debug!("dropped superseded load of team {id}"),
            }
        });
    });

    let on_logout = move |_| log_out(auth, teams, editor, &navigate);

    let team_name = move || {
        let id = team_id().unwrap_or_default();
        teams.with(|t| t.team(&id).map(|team| team.name.clone())).unwrap_or(id)
    };

    view! {
        <div class="editor-page">
            <header class="editor-page__header toolbar">
                <a href="/" class="toolbar__back" title="К списку команд">
                    "←"
                </a>
                <span class="toolbar__title">{team_name}</span>
                <Show when=move || !editor.get().editable>
                    <span class="toolbar__badge">"только чтение"</span>
                </Show>
                <span class="toolbar__spacer"></span>
                <button class="btn" on:click=on_logout>
                    "Выйти"
                </button>
            </header>
            <EditorToolbar/>
            <Show when=move || editor.get().status.is_some()>
                <p class="editor-page__status">{move || editor.get().status.unwrap_or_default()}</p>
            </Show>
            <Show
                when=move || !editor.get().loading
                fallback=|| view! { <p class="editor-page__status">"Загрузка..."</p> }
            >
                <div class="editor-page__body">
                    <SectionMenu/>
                    <div id=SECTIONS_CONTAINER_ID class="sections">
                        <For
                            each=move || editor.with(EditorState::layout)
                            key=|key| *key
                            children=move |(id, _)| {
                                let section = editor.with_untracked(|s| {
                                    s.editor.views(s.editable).into_iter().find(|v| v.id == id)
                                });
                                section.map(|section| view! { <SectionBlock section=section/> })
                            }
                        />
                    </div>
                </div>
            </Show>
        </div>
    }
}
