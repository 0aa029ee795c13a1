//! Browser glue shared across pages and components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate `web-sys` calls from page and component logic.
//! Each compiles to a no-op or an "unavailable" error without the `csr`
//! feature so the crate builds and tests natively.

pub mod dom_image;
pub mod download;
pub mod file_io;
pub mod selection;
pub mod storage;
