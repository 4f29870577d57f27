//! Data models for the keymap, layers, and override rules.
//!
//! This module contains all the core data structures used throughout the
//! application. Models are designed to be independent of parsing and
//! generation logic.

pub mod geometry;
pub mod key_override;
pub mod keymap;
pub mod layer;
pub mod modifiers;

// Re-export all model types
pub use geometry::SplitGeometry;
pub use key_override::{KeyOverride, ALL_LAYERS};
pub use keymap::{Keymap, KeymapMetadata};
pub use layer::{KeyDefinition, Layer, Position};
pub use modifiers::Modifiers;
