//! Gas Up core crate.
//!
//! A small arcade flyer: keep a propeller plane climbing through an endless,
//! procedurally generated canyon guarded by turrets. The simulation (terrain,
//! flight, entities, HUD, frame loop) is plain Rust over the [`surface::Surface`]
//! trait and runs headless in tests; `web` binds it to an SVG page and exposes
//! `start_game()` to JavaScript.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod entity;
pub mod error;
pub mod flight;
pub mod hud;
pub mod input;
pub mod lazy;
pub mod math;
pub mod storage;
pub mod surface;
pub mod terrain;
pub mod web;
pub mod world;

pub use config::{TerrainParams, Tuning};
pub use error::{GameError, Result};
pub use world::{Viewport, World};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn init_logging() {
    // A second game on the same page keeps the first logger.
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("logger already initialised");
    }
}

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    init_logging();
    web::start(rand::random(), Tuning::default())?;
    Ok(())
}

/// Start with gameplay overrides given as JSON; unknown fields are ignored,
/// missing ones keep their defaults.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_tuning(json: &str) -> Result<(), JsValue> {
    init_logging();
    let tuning = Tuning::from_json(json)?;
    web::start(rand::random(), tuning)?;
    Ok(())
}
