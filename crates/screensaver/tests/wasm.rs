//! WASM browser tests - run with `wasm-pack test --headless --chrome`

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use screensaver::browser::LocalStorage;
use screensaver::core::{ColorSequence, ParameterStore, StorageBackend};

#[wasm_bindgen_test]
fn test_local_storage_round_trip() {
    let backend = LocalStorage;
    backend.set_item("screensaver-test-key", "42").expect("write");
    assert_eq!(
        backend.get_item("screensaver-test-key").expect("read").as_deref(),
        Some("42")
    );
}

#[wasm_bindgen_test]
fn test_store_persists_colors_in_local_storage() {
    let store = ParameterStore::new(LocalStorage);
    let colors = ColorSequence::from_colors(["#010203", "#040506"]).expect("non-empty");
    store.set_color_sequence("wasm-test", &colors);

    let reopened = ParameterStore::new(LocalStorage);
    let loaded = reopened.get_color_sequence("wasm-test", &ColorSequence::single("#000"));
    assert_eq!(loaded, colors);
}
