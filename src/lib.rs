//! Heart Catch core crate.
//!
//! A small canvas mini-game for a Valentine's page: hearts fall, the player
//! steers a basket to catch them, and catching enough of them before too many
//! slip past triggers a win celebration. The simulation in [`game`] is plain
//! Rust so it can be tested natively; everything touching the DOM lives in
//! `web`.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod countdown;
pub mod effects;
pub mod error;
pub mod game;
pub mod logging;
pub mod rng;
pub mod runaway;
pub mod settings;
mod web;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init(web::page_test_mode());
}

// -----------------------------------------------------------------------------
// Entrypoints
// -----------------------------------------------------------------------------

/// Bind the mini-game to the `#game` canvas and start the animation loop.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    web::start_catch_game().map_err(Into::into)
}

/// Page extras: the dodging "No" button and the countdown, when present.
#[wasm_bindgen]
pub fn setup_page() -> Result<(), JsValue> {
    web::page::setup().map_err(Into::into)
}

/// Append `test=1` to a link when the current page runs in test mode.
#[wasm_bindgen]
pub fn with_test_param(url: &str) -> String {
    web::page::link_with_test_param(url)
}

#[wasm_bindgen]
pub fn format_countdown(ms: f64) -> String {
    countdown::format_countdown(ms)
}

#[wasm_bindgen]
pub fn is_valentines_day_today() -> bool {
    web::page::is_valentines_day_today()
}
