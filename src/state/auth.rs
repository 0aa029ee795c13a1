//! Sign-in state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Seeded from local storage at startup, replaced on sign-in, cleared on
//! logout. Route guards read it to decide whether to redirect to `/login`.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use editor::store::KeyValueStore;

use crate::net::types::Session;
use crate::util::storage::load_session;

/// Current session, as far as the client knows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub session: Session,
}

impl AuthState {
    /// State restored from `store`.
    pub fn restore<S>(store: &S) -> Self
    where
        S: KeyValueStore + ?Sized,
    {
        Self { session: load_session(store) }
    }

    /// A bearer token is present. The backend is the judge of whether it is
    /// still valid.
    #[must_use]
    pub fn signed_in(&self) -> bool {
        self.session.token.is_some()
    }

    /// Session id for request headers; empty when unknown.
    #[must_use]
    pub fn session_id(&self) -> String {
        self.session.session_id.clone().unwrap_or_default()
    }

    /// Adopt a session id handed out by a later page.
    pub fn refresh_session_id(&mut self, session_id: Option<String>) {
        if session_id.is_some() {
            self.session.session_id = session_id;
        }
    }
}
