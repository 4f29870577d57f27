//! Parsing and serialization for the Markdown keymap format.
//!
//! This module handles reading and writing keymaps from Markdown with
//! YAML frontmatter.

pub mod keymap_gen;
pub mod keymap_md;

// Re-export commonly used functions
pub use keymap_gen::save_keymap;
pub use keymap_md::{parse_keymap, parse_keymap_str};
