//! Built-in keymaps embedded at compile time.
//!
//! The DasBob keymap ships inside the binary the same way the keycode
//! database does, so every command works without a keymap file on disk.

use crate::models::Keymap;
use crate::parser::parse_keymap_str;
use anyhow::{Context, Result};

/// Markdown source of the built-in DasBob keymap.
pub const DASBOB_KEYMAP_MD: &str = include_str!("dasbob.md");

/// Loads the built-in DasBob keymap.
pub fn dasbob() -> Result<Keymap> {
    parse_keymap_str(DASBOB_KEYMAP_MD).context("Failed to parse embedded DasBob keymap")
}
