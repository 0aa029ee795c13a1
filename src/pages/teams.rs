//! Team list: the authenticated landing route.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend answers `/base/teams` with a server-rendered page; the team
//! map and a fresh session id are pulled out of it. Picking a team opens its
//! knowledge base at `/team/{id}`.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::config::ClientConfig;
use crate::net::api::fetch_teams;
use crate::state::auth::AuthState;
use crate::state::editor::EditorState;
use crate::state::teams::TeamsState;
use crate::util::storage::{LocalStorage, clear_session, save_session};

/// Fetch the team list into `teams`, adopting the session id the page hands
/// out. Does nothing while a fetch is already running.
pub(crate) fn load_teams(config: ClientConfig, auth: RwSignal<AuthState>, teams: RwSignal<TeamsState>) {
    if teams.get_untracked().loading {
        return;
    }
    teams.update(|t| {
        t.loading = true;
        t.error = None;
    });
    let session = auth.get_untracked().session;
    leptos::task::spawn_local(async move {
        match fetch_teams(&config, &session).await {
            Ok(listing) => {
                auth.update(|a| a.refresh_session_id(listing.session_id.clone()));
                if let Err(e) = save_session(&mut LocalStorage, &auth.get_untracked().session) {
                    log::warn!("failed to store refreshed session: {e}");
                }
                teams.update(|t| {
                    t.listing = Some(listing);
                    t.loading = false;
                });
            }
            Err(e) => {
                log::error!("failed to load teams: {e}");
                teams.update(|t| {
                    t.error = Some(e.to_string());
                    t.loading = false;
                });
            }
        }
    });
}

/// Forget the session and every per-user state, then go to `/login`.
pub(crate) fn log_out(
    auth: RwSignal<AuthState>,
    teams: RwSignal<TeamsState>,
    editor: RwSignal<EditorState>,
    navigate: impl Fn(&str, NavigateOptions),
) {
    clear_session();
    auth.set(AuthState::default());
    teams.set(TeamsState::default());
    editor.set(EditorState::default());
    navigate("/login", NavigateOptions::default());
}

/// Team list page. Redirects to `/login` without a token.
#[component]
pub fn TeamsPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let teams = expect_context::<RwSignal<TeamsState>>();
    let editor = expect_context::<RwSignal<EditorState>>();
    let config = expect_context::<ClientConfig>();
    let navigate = use_navigate();

    let navigate_login = navigate.clone();
    Effect::new(move || {
        if !auth.get().signed_in() {
            navigate_login("/login", NavigateOptions::default());
        }
    });

    let requested = RwSignal::new(false);
    Effect::new(move || {
        if requested.get() || !auth.get().signed_in() {
            return;
        }
        requested.set(true);
        load_teams(config.clone(), auth, teams);
    });

    let on_logout = move |_| log_out(auth, teams, editor, &navigate);

    view! {
        <div class="teams-page">
            <header class="teams-page__header toolbar">
                <span class="toolbar__title">"Команды"</span>
                <span class="toolbar__spacer"></span>
                <button class="btn" on:click=on_logout>
                    "Выйти"
                </button>
            </header>
            <Show when=move || teams.get().loading>
                <p class="teams-page__status">"Загрузка..."</p>
            </Show>
            <Show when=move || teams.get().error.is_some()>
                <p class="teams-page__status teams-page__status--error">
                    "Не удалось загрузить команды"
                </p>
            </Show>
            <ul class="teams-list">
                <For
                    each=move || teams.get().teams().to_vec()
                    key=|team| team.id.clone()
                    children=move |team| {
                        let href = format!("/team/{}", team.id);
                        let is_admin = team.is_admin;
                        view! {
                            <li class="teams-list__item">
                                <a class="teams-list__open" href=href>
                                    {team.name}
                                </a>
                                <Show when=move || is_admin>
                                    <span class="teams-list__badge">"администратор"</span>
                                </Show>
                            </li>
                        }
                    }
                />
            </ul>
        </div>
    }
}
