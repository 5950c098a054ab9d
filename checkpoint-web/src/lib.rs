#![forbid(unsafe_code)]
//! Browser front for the Checkpoint core.
//!
//! The host page owns rendering and audio; this crate owns the `GameContext`,
//! feeds it from DOM events once per animation frame and hands snapshots and
//! sound cues back to JavaScript.
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod bridge;
#[cfg(target_arch = "wasm32")]
pub mod console;
#[cfg(target_arch = "wasm32")]
pub mod handle;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    console::init(log::LevelFilter::Info);
}
