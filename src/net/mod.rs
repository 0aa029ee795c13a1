//! Networking modules for the knowledge-base backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` makes the REST calls and implements the editor's upload and image
//! fetch seams, `types` parses request/response bodies and server pages, and
//! `error` classifies failures.

pub mod api;
pub mod error;
pub mod types;
