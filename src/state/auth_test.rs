use editor::store::MemoryStorage;

use super::*;
use crate::util::storage::{SESSION_ID_KEY, TOKEN_KEY};

#[test]
fn default_is_signed_out() {
    let state = AuthState::default();
    assert!(!state.signed_in());
    assert_eq!(state.session_id(), "");
}

#[test]
fn restore_reads_token_and_session() {
    let mut store = MemoryStorage::new();
    store.set_item(TOKEN_KEY, "tok").unwrap();
    store.set_item(SESSION_ID_KEY, "sid").unwrap();
    let state = AuthState::restore(&store);
    assert!(state.signed_in());
    assert_eq!(state.session_id(), "sid");
}

#[test]
fn refresh_keeps_old_id_when_page_has_none() {
    let mut state = AuthState { session: Session { token: None, session_id: Some("a".to_owned()) } };
    state.refresh_session_id(None);
    assert_eq!(state.session_id(), "a");
    state.refresh_session_id(Some("b".to_owned()));
    assert_eq!(state.session_id(), "b");
}
