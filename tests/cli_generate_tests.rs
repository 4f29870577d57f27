//! End-to-end tests for the `generate` command.

use std::fs;
use std::process::Command;
use tempfile::TempDir;

mod fixtures;
use fixtures::*;

/// Path to the dasbob-keymap binary
fn dasbob_bin() -> &'static str {
    env!("CARGO_BIN_EXE_dasbob-keymap")
}

#[test]
fn test_generate_creates_files() {
    let keymap = test_keymap_basic();
    let (keymap_path, _temp_dir) = create_temp_keymap_file(&keymap);
    let out_dir = TempDir::new().unwrap();

    let output = Command::new(dasbob_bin())
        .args([
            "generate",
            "--keymap",
            keymap_path.to_str().unwrap(),
            "--out-dir",
            out_dir.path().to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "Generation should succeed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert!(out_dir.path().join("keymap.c").exists());
    assert!(out_dir.path().join("rules.mk").exists());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Generated keymap.c and rules.mk"));
}

#[test]
fn test_generate_builtin_keymap_c_structure() {
    let out_dir = TempDir::new().unwrap();

    let output = Command::new(dasbob_bin())
        .args([
            "generate",
            "--out-dir",
            out_dir.path().to_str().unwrap(),
            "--format",
            "keymap",
        ])
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let content = fs::read_to_string(out_dir.path().join("keymap.c")).unwrap();

    // Layer enum and keymap array for the built-in DasBob keymap
    assert!(content.contains("enum dasbob_layers"));
    assert!(content.contains("const uint16_t PROGMEM keymaps[][MATRIX_ROWS][MATRIX_COLS]"));
    for ident in [
        "_ALPHA",
        "_WASD",
        "_LEFT_NAV",
        "_RIGHT_NAV",
        "_NUMER",
        "_LEFT_MODS",
        "_RIGHT_MODS",
        "_UP_NAV",
    ] {
        assert!(content.contains(ident), "missing layer identifier {ident}");
    }

    // Layer references are rendered with enum names
    assert!(content.contains("LT(_LEFT_NAV, KC_ESC)"));
    assert!(content.contains("OSL(_NUMER)"));
    assert!(content.contains("TG(_WASD)"));
    assert!(content.contains("OSM(MOD_RSFT)"));

    // Override table
    assert!(content.contains("const key_override_t ko_KC_1"));
    assert!(content.contains("const key_override_t *key_overrides[]"));
}

#[test]
fn test_generate_deterministic_output_is_stable() {
    let out_dir_a = TempDir::new().unwrap();
    let out_dir_b = TempDir::new().unwrap();

    for out_dir in [&out_dir_a, &out_dir_b] {
        let output = Command::new(dasbob_bin())
            .args([
                "generate",
                "--out-dir",
                out_dir.path().to_str().unwrap(),
                "--deterministic",
            ])
            .output()
            .expect("Failed to execute command");
        assert_eq!(output.status.code(), Some(0));
    }

    let content_a = fs::read_to_string(out_dir_a.path().join("keymap.c")).unwrap();
    let content_b = fs::read_to_string(out_dir_b.path().join("keymap.c")).unwrap();

    assert_eq!(content_a, content_b, "Deterministic runs should be identical");
    assert!(content_a.contains("// Generated: <timestamp>"));
}

#[test]
fn test_generate_rules_only() {
    let out_dir = TempDir::new().unwrap();

    let output = Command::new(dasbob_bin())
        .args([
            "generate",
            "--out-dir",
            out_dir.path().to_str().unwrap(),
            "--format",
            "rules",
        ])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    assert!(!out_dir.path().join("keymap.c").exists());

    let rules = fs::read_to_string(out_dir.path().join("rules.mk")).unwrap();
    // Built-in keymap has overrides and mouse keys
    assert!(rules.contains("KEY_OVERRIDE_ENABLE = yes"));
    assert!(rules.contains("MOUSEKEY_ENABLE = yes"));
}

#[test]
fn test_generate_invalid_format() {
    let out_dir = TempDir::new().unwrap();

    let output = Command::new(dasbob_bin())
        .args([
            "generate",
            "--out-dir",
            out_dir.path().to_str().unwrap(),
            "--format",
            "bogus",
        ])
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(2),
        "Invalid format should exit with usage error code"
    );
}

#[test]
fn test_generate_refuses_invalid_keymap() {
    let keymap = test_keymap_with_invalid_keycode();
    let (keymap_path, _temp_dir) = create_temp_keymap_file(&keymap);
    let out_dir = TempDir::new().unwrap();

    let output = Command::new(dasbob_bin())
        .args([
            "generate",
            "--keymap",
            keymap_path.to_str().unwrap(),
            "--out-dir",
            out_dir.path().to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(1),
        "Invalid keymap should fail validation before generation"
    );
    assert!(!out_dir.path().join("keymap.c").exists());
}
