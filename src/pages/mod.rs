//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration (redirects, fetches, status
//! messages) and delegates rendering details to `components`.

pub mod editor;
pub mod login;
pub mod teams;
