//! Shared types for CLI command handlers.

use crate::models::Keymap;
use serde::Serialize;
use std::path::Path;

/// Result type for CLI command execution.
pub type CliResult<T> = Result<T, CliError>;

/// Typed CLI error mapped to a process exit code.
#[derive(Debug, Clone)]
pub struct CliError {
    /// Error category
    pub kind: CliErrorKind,
    /// Human-readable message
    pub message: String,
}

/// CLI error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorKind {
    /// Validation failed (bad keymap content)
    Validation,
    /// Invalid command usage (bad arguments)
    Usage,
    /// File system or serialization failure
    Io,
}

#[allow(dead_code)]
impl CliError {
    /// Creates a validation error (exit code 1).
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: CliErrorKind::Validation,
            message: message.into(),
        }
    }

    /// Creates a usage error (exit code 2).
    pub fn usage(message: impl Into<String>) -> Self {
        Self {
            kind: CliErrorKind::Usage,
            message: message.into(),
        }
    }

    /// Creates an I/O error (exit code 3).
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: CliErrorKind::Io,
            message: message.into(),
        }
    }

    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self.kind {
            CliErrorKind::Validation => 1,
            CliErrorKind::Usage => 2,
            CliErrorKind::Io => 3,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Loads a keymap from a file, or the built-in DasBob keymap when no
/// path is given.
pub fn load_keymap(path: Option<&Path>) -> CliResult<Keymap> {
    match path {
        Some(path) => crate::parser::parse_keymap(path)
            .map_err(|e| CliError::io(format!("Failed to load keymap: {e:#}"))),
        None => crate::keymaps::dasbob()
            .map_err(|e| CliError::io(format!("Failed to load built-in keymap: {e:#}"))),
    }
}

/// Per-check status summary for validation JSON output.
#[derive(Debug, Serialize)]
pub struct ValidationChecks {
    /// Keycode database check status
    pub keycodes: String,
    /// Grid coverage and position check status
    pub positions: String,
    /// Layer reference check status
    pub layer_refs: String,
    /// Override table check status
    pub overrides: String,
}

impl ValidationChecks {
    /// All checks passing.
    #[must_use]
    pub fn all_passed() -> Self {
        Self {
            keycodes: "passed".to_string(),
            positions: "passed".to_string(),
            layer_refs: "passed".to_string(),
            overrides: "passed".to_string(),
        }
    }
}

/// Position payload for JSON output.
#[derive(Debug, Serialize)]
pub struct ValidationPosition {
    /// Visual row
    pub row: u8,
    /// Visual column
    pub col: u8,
}

/// Location payload for JSON output.
#[derive(Debug, Serialize)]
pub struct ValidationLocation {
    /// Layer index
    pub layer: usize,
    /// Position within the layer
    pub position: ValidationPosition,
}

/// Individual validation message for JSON output.
#[derive(Debug, Serialize)]
pub struct ValidationMessage {
    /// "error" or "warning"
    pub severity: String,
    /// Human-readable message
    pub message: String,
    /// Location context, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<ValidationLocation>,
}

/// Top-level validation response for JSON output.
#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    /// True if no errors were found
    pub valid: bool,
    /// All errors and warnings
    pub errors: Vec<ValidationMessage>,
    /// Per-check summary
    pub checks: ValidationChecks,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::validation("x").exit_code(), 1);
        assert_eq!(CliError::usage("x").exit_code(), 2);
        assert_eq!(CliError::io("x").exit_code(), 3);
    }

    #[test]
    fn test_load_keymap_builtin() {
        let keymap = load_keymap(None).unwrap();
        assert_eq!(keymap.metadata.keyboard, "dasbob");
    }

    #[test]
    fn test_load_keymap_missing_file() {
        let err = load_keymap(Some(Path::new("/nonexistent/keymap.md"))).unwrap_err();
        assert_eq!(err.kind, CliErrorKind::Io);
    }
}
