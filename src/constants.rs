//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and the target keyboard identity.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "DasBob Keymap";

/// The binary name of the application (used in command examples, lowercase with hyphens).
pub const APP_BINARY_NAME: &str = "dasbob-keymap";

/// QMK keyboard identifier this repository targets.
pub const KEYBOARD_NAME: &str = "dasbob";

/// QMK layout macro for the DasBob physical layout.
pub const LAYOUT_MACRO: &str = "LAYOUT_split_3x5_3";
