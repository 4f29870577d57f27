//! Service layer for keymap analysis.
//!
//! This module contains the logic that interprets keycode strings:
//! typed action classification and layer-reference tracking.

pub mod key_actions;
pub mod layer_refs;

// Re-export commonly used types and functions
pub use key_actions::{classify, KeyAction};
pub use layer_refs::{build_layer_ref_index, LayerRef, LayerRefKind};
