//! CLI command handlers.
//!
//! This module provides headless, scriptable access to the crate's core
//! functionality for automation, testing, and CI integration.

pub mod common;
pub mod config_cmd;
pub mod generate;
pub mod keycodes;
pub mod layer_refs;
pub mod overrides;
pub mod validate;

// Re-export types used by main.rs and tests
pub use common::{CliError, CliResult};
pub use config_cmd::ConfigArgs;
pub use generate::GenerateArgs;
pub use keycodes::KeycodesArgs;
pub use layer_refs::LayerRefsArgs;
pub use overrides::OverridesArgs;
pub use validate::ValidateArgs;
