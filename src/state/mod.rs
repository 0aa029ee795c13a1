//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by concern (`auth`, `teams`, `editor`) so components can
//! depend on small focused models. Each lives in an `RwSignal` provided by
//! the root component.

pub mod auth;
pub mod editor;
pub mod teams;
