//! # mess-client
//!
//! Leptos + WASM frontend for the shared-household meal and expense tracker.
//!
//! The crate is organized around the session core: `state` owns the session
//! reducer, the store and the persisted credential cache, `net` holds the REST
//! plumbing and the request authorizer, and `util::guard` decides which routes
//! may render. Pages and components are thin views over that core.
//!
//! Browser bindings are compiled only with the `csr` feature; host builds get
//! inert stubs so the core stays testable without a browser.

pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install console logging and mount the application.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(app::App);
}
