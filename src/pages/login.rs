//! Login page: login + password sign-in against the backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! A successful sign-in stores the token and session id in local storage and
//! moves to the team list. Rejected credentials are shown under the form;
//! anything else is logged and summarized.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::config::ClientConfig;
use crate::net::api::sign_in;
use crate::net::error::ApiError;
use crate::state::auth::AuthState;
use crate::util::storage::{LocalStorage, save_session};

const MISSING_CREDENTIALS_MESSAGE: &str = "Введите логин и пароль";

/// Trimmed login and the password as typed. Both are required.
fn validate_credentials(login: &str, password: &str) -> Result<(String, String), &'static str> {
    let login = login.trim();
    if login.is_empty() || password.is_empty() {
        return Err(MISSING_CREDENTIALS_MESSAGE);
    }
    Ok((login.to_owned(), password.to_owned()))
}

/// Inline message for a failed sign-in. Only credential rejections are the
/// user's business; the rest is logged.
fn failure_message(err: &ApiError) -> &'static str {
    if !matches!(err, ApiError::Auth) {
        log::error!("sign-in failed: {err}");
    }
    err.sign_in_message()
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let config = expect_context::<ClientConfig>();
    let navigate = use_navigate();

    let login = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let (login_value, password_value) =
            match validate_credentials(&login.get_untracked(), &password.get_untracked()) {
                Ok(values) => values,
                Err(message) => {
                    info.set(message.to_owned());
                    return;
                }
            };
        busy.set(true);
        info.set(String::new());

        let config = config.clone();
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match sign_in(&config, &login_value, &password_value).await {
                Ok(session) => {
                    if let Err(e) = save_session(&mut LocalStorage, &session) {
                        log::error!("failed to store session: {e}");
                    }
                    auth.set(AuthState { session });
                    busy.set(false);
                    navigate("/", NavigateOptions::default());
                }
                Err(e) => {
                    info.set(failure_message(&e).to_owned());
                    busy.set(false);
                }
            }
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"База знаний"</h1>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        name="login"
                        placeholder="Логин"
                        autocomplete="username"
                        prop:value=move || login.get()
                        on:input=move |ev| login.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        name="password"
                        placeholder="Пароль"
                        autocomplete="current-password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Войти"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
            </div>
        </div>
    }
}
