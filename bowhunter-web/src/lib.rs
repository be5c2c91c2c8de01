#![forbid(unsafe_code)]
//! Browser bridge for Bowhunter.
//!
//! Rendering lives in the page's own scripts; this crate only persists the
//! progression engine in `localStorage` and exposes it to JavaScript.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
pub mod bindings;
pub mod facade;
pub mod game;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
