// Browser smoke tests; run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use gasup::error::GameError;
use gasup::storage::{ScoreStore, load_best};
use gasup::web::{LocalStorageStore, SvgSurface};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

// The best altitude survives a round trip through localStorage.
#[wasm_bindgen_test]
fn local_storage_round_trip() {
    let win = web_sys::window().unwrap();
    let mut store = LocalStorageStore::new(&win);
    store.save(12.0).unwrap();
    assert_eq!(load_best(&mut store), 12);
}

// A page without the game's layers is rejected up front.
#[wasm_bindgen_test]
fn missing_layers_are_reported() {
    let document = web_sys::window().unwrap().document().unwrap();
    match SvgSurface::new(document) {
        Err(GameError::MissingElement(id)) => assert_eq!(id, "#bg"),
        Err(other) => panic!("unexpected error {other}"),
        Ok(_) => panic!("surface built without layers"),
    }
}
