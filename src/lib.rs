//! # knowledgebase
//!
//! Leptos + WASM client for team knowledge bases: an ordered list of titled,
//! rich-text sections with a navigation menu, inline images, HTML export and
//! import, and upload to the team's backend.
//!
//! The document model and every operation that does not need a live browser
//! live in the `editor` crate. This crate contains pages, components,
//! reactive state, the REST client, and the `web-sys` glue that implements
//! the `editor` seams (`KeyValueStore`, `ImageResolver`, `ImageFetcher`,
//! `Uploader`). Build with the `csr` feature for the browser; without it the
//! browser calls compile to no-ops so the crate tests natively.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: console logging, panic hook, and the mounted app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(app::App);
}
