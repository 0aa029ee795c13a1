//! Browser `localStorage` access.
//!
//! SYSTEM CONTEXT
//! ==============
//! The section document (`"sections"`) goes through [`LocalStorage`], the
//! editor crate's `KeyValueStore` seam. Sign-in state lives in two more keys,
//! `"Token"` and `"sessionId"`, read and written by the session helpers here.
//! Outside the browser every read misses and every write reports
//! `StorageError::Unavailable`.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use editor::error::StorageError;
use editor::store::KeyValueStore;

use crate::net::types::Session;

/// Key of the bearer token returned by sign-in.
pub const TOKEN_KEY: &str = "Token";
/// Key of the backend session id.
pub const SESSION_ID_KEY: &str = "sessionId";

/// `window.localStorage` as a [`KeyValueStore`].
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

#[cfg(feature = "csr")]
fn storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        #[cfg(feature = "csr")]
        {
            storage()?.get_item(key).ok().flatten()
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
            None
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        #[cfg(feature = "csr")]
        {
            storage()
                .ok_or(StorageError::Unavailable)?
                .set_item(key, value)
                .map_err(|e| StorageError::Write(format!("{e:?}")))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (key, value);
            Err(StorageError::Unavailable)
        }
    }
}

/// Remove `key`; a missing store is ignored.
pub fn remove_item(key: &str) {
    #[cfg(feature = "csr")]
    {
        if let Some(storage) = storage() {
            let _ = storage.remove_item(key);
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = key;
    }
}

/// Read the stored sign-in state.
pub fn load_session<S>(store: &S) -> Session
where
    S: KeyValueStore + ?Sized,
{
    let non_empty = |key: &str| store.get_item(key).filter(|v| !v.is_empty());
    Session { token: non_empty(TOKEN_KEY), session_id: non_empty(SESSION_ID_KEY) }
}

/// Write whichever parts of `session` are known.
///
/// # Errors
///
/// Returns the first [`StorageError`] from the store.
pub fn save_session<S>(store: &mut S, session: &Session) -> Result<(), StorageError>
where
    S: KeyValueStore + ?Sized,
{
    if let Some(token) = &session.token {
        store.set_item(TOKEN_KEY, token)?;
    }
    if let Some(session_id) = &session.session_id {
        store.set_item(SESSION_ID_KEY, session_id)?;
    }
    Ok(())
}

/// Forget the sign-in state.
pub fn clear_session() {
    remove_item(TOKEN_KEY);
    remove_item(SESSION_ID_KEY);
}
