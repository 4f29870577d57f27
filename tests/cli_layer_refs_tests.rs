//! End-to-end tests for the `layer-refs` command.

use std::process::Command;

mod fixtures;
use fixtures::*;

/// Path to the dasbob-keymap binary
fn dasbob_bin() -> &'static str {
    env!("CARGO_BIN_EXE_dasbob-keymap")
}

#[test]
fn test_layer_refs_text_output() {
    let keymap = test_keymap_basic();
    let (keymap_path, _temp_dir) = create_temp_keymap_file(&keymap);

    let output = Command::new(dasbob_bin())
        .args(["layer-refs", "--keymap", keymap_path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Layer 0: Base"));
    assert!(stdout.contains("Layer 1: Overlay"));
    // Layer 1 has inbound references from MO(1) and LT(1, KC_ESC)
    assert!(stdout.contains("Momentary (MO)"));
    assert!(stdout.contains("Layer-Tap (LT)"));
}

#[test]
fn test_layer_refs_json_structure() {
    let keymap = test_keymap_basic();
    let (keymap_path, _temp_dir) = create_temp_keymap_file(&keymap);

    let output = Command::new(dasbob_bin())
        .args([
            "layer-refs",
            "--keymap",
            keymap_path.to_str().unwrap(),
            "--json",
        ])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let result: serde_json::Value =
        serde_json::from_str(&stdout).expect("Should parse JSON output");

    let layers = result["layers"].as_array().expect("Should have layers");
    assert_eq!(layers.len(), 2);

    // Layer 0 has no inbound refs
    assert_eq!(layers[0]["inbound_refs"].as_array().unwrap().len(), 0);

    // Layer 1 has two inbound refs (MO and LT)
    let refs = layers[1]["inbound_refs"].as_array().unwrap();
    assert_eq!(refs.len(), 2);
    let kinds: Vec<&str> = refs.iter().filter_map(|r| r["kind"].as_str()).collect();
    assert!(kinds.contains(&"Momentary (MO)"));
    assert!(kinds.contains(&"Layer-Tap (LT)"));
}

#[test]
fn test_layer_refs_reports_transparency_conflicts() {
    let keymap = test_keymap_with_transparency_conflict();
    let (keymap_path, _temp_dir) = create_temp_keymap_file(&keymap);

    let output = Command::new(dasbob_bin())
        .args([
            "layer-refs",
            "--keymap",
            keymap_path.to_str().unwrap(),
            "--json",
        ])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let result: serde_json::Value =
        serde_json::from_str(&stdout).expect("Should parse JSON output");

    let warnings = result["layers"][1]["warnings"].as_array().unwrap();
    assert!(!warnings.is_empty(), "Conflict should produce a warning");
    assert!(warnings[0]["message"]
        .as_str()
        .unwrap()
        .contains("Non-transparent key"));
}

#[test]
fn test_layer_refs_builtin_keymap() {
    let output = Command::new(dasbob_bin())
        .args(["layer-refs", "--json"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let result: serde_json::Value =
        serde_json::from_str(&stdout).expect("Should parse JSON output");

    let layers = result["layers"].as_array().unwrap();
    assert_eq!(layers.len(), 8);

    // The WASD layer (1) is toggled from three layers and never held
    let wasd_refs = layers[1]["inbound_refs"].as_array().unwrap();
    assert_eq!(wasd_refs.len(), 3);
    assert!(wasd_refs
        .iter()
        .all(|r| r["kind"].as_str().unwrap().contains("Toggle")));

    // Up Nav (7) is reached only via LT(7, KC_ENT) on Right Nav
    let up_nav_refs = layers[7]["inbound_refs"].as_array().unwrap();
    assert_eq!(up_nav_refs.len(), 1);
    assert_eq!(up_nav_refs[0]["from_layer"], 3);
}
