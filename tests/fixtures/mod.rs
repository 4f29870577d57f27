//! Shared test fixtures for E2E CLI tests.
#![allow(dead_code)] // Some fixtures reserved for future tests

use chrono::{TimeZone, Utc};
use dasbob_keymap::models::{
    KeyDefinition, KeyOverride, Keymap, KeymapMetadata, Layer, Modifiers, SplitGeometry,
};
use dasbob_keymap::parser::save_keymap;
use std::path::PathBuf;
use tempfile::TempDir;

/// Creates deterministic test metadata.
pub fn test_metadata(name: &str) -> KeymapMetadata {
    KeymapMetadata {
        name: name.to_string(),
        description: "E2E test keymap".to_string(),
        author: "Test Suite".to_string(),
        created: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        modified: Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap(),
        tags: vec!["test".to_string(), "e2e".to_string()],
        version: "1.0".to_string(),
        keyboard: "dasbob".to_string(),
        layout_variant: "LAYOUT_split_3x5_3".to_string(),
    }
}

/// Creates a layer covering the full DasBob grid with a single keycode.
pub fn full_layer(number: u8, name: &str, keycode: &str) -> Layer {
    let mut layer = Layer::new(number, name).expect("valid layer name");
    for pos in SplitGeometry::DASBOB.positions() {
        layer.add_key(KeyDefinition::new(pos, keycode));
    }
    layer
}

/// Creates a basic valid keymap: a base layer, a transparent overlay with
/// layer references from the base, and two override rules.
pub fn test_keymap_basic() -> Keymap {
    let mut base = full_layer(0, "Base", "KC_A");
    base.keys[0].keycode = "MO(1)".to_string();
    base.keys[1].keycode = "LT(1, KC_ESC)".to_string();
    base.keys[2].keycode = "OSM(MOD_RSFT)".to_string();

    let overlay = full_layer(1, "Overlay", "KC_TRNS");

    Keymap {
        metadata: test_metadata("Test Keymap"),
        layers: vec![base, overlay],
        overrides: vec![
            KeyOverride::basic(Modifiers::RSFT, "KC_1", "KC_F1").expect("valid override"),
            KeyOverride::basic(Modifiers::RSFT, "KC_COMM", "KC_DOT").expect("valid override"),
        ],
    }
}

/// Creates a keymap containing an unknown keycode.
pub fn test_keymap_with_invalid_keycode() -> Keymap {
    let mut keymap = test_keymap_basic();
    keymap.layers[0].keys[5].keycode = "INVALID_KEYCODE_XYZ".to_string();
    keymap
}

/// Creates a keymap with a layer reference to a missing layer.
pub fn test_keymap_with_dangling_layer_ref() -> Keymap {
    let mut keymap = test_keymap_basic();
    keymap.layers[0].keys[5].keycode = "MO(7)".to_string();
    keymap
}

/// Creates a keymap that triggers a transparency-conflict warning:
/// the overlay has a real key under a hold-like reference.
pub fn test_keymap_with_transparency_conflict() -> Keymap {
    let mut keymap = test_keymap_basic();
    // Base holds MO(1) at position index 0; shadow it on the overlay
    let position = keymap.layers[0].keys[0].position;
    keymap.layers[1]
        .get_key_mut(position)
        .expect("overlay covers the grid")
        .keycode = "KC_B".to_string();
    keymap
}

/// Writes a keymap to a temp directory and returns the file path.
///
/// The TempDir must be kept alive for the duration of the test.
pub fn create_temp_keymap_file(keymap: &Keymap) -> (PathBuf, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("keymap.md");
    save_keymap(keymap, &path).expect("Failed to write keymap file");
    (path, temp_dir)
}
