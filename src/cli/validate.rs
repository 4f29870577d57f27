//! Validation command for keymap files.

use crate::cli::common::{
    load_keymap, CliError, CliResult, ValidationChecks, ValidationLocation, ValidationMessage,
    ValidationPosition, ValidationResponse,
};
use crate::firmware::validator::{KeymapValidator, ValidationErrorKind};
use crate::keycode_db::KeycodeDb;
use crate::models::SplitGeometry;
use clap::Args;
use std::path::PathBuf;

/// Validate a keymap for errors and warnings
#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    /// Path to keymap markdown file (defaults to the built-in keymap)
    #[arg(short, long, value_name = "FILE")]
    pub keymap: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Treat warnings as errors (exit non-zero)
    #[arg(long)]
    pub strict: bool,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> CliResult<()> {
        let keymap = load_keymap(self.keymap.as_deref())?;

        // Load keycode database
        let keycode_db = KeycodeDb::load()
            .map_err(|e| CliError::io(format!("Failed to load keycode database: {e}")))?;

        // Validate
        let validator = KeymapValidator::new(&keymap, SplitGeometry::DASBOB, &keycode_db);
        let report = validator
            .validate()
            .map_err(|e| CliError::io(format!("Validation failed: {e}")))?;

        // Build response
        let mut checks = ValidationChecks::all_passed();
        let mut messages = Vec::new();

        // Convert errors
        for error in &report.errors {
            // Update check status based on error kind
            match error.kind {
                ValidationErrorKind::InvalidKeycode => {
                    checks.keycodes = "failed".to_string();
                }
                ValidationErrorKind::PositionOutOfBounds
                | ValidationErrorKind::MissingPosition
                | ValidationErrorKind::DuplicatePosition
                | ValidationErrorKind::MismatchedKeyCount
                | ValidationErrorKind::EmptyLayer => {
                    checks.positions = "failed".to_string();
                }
                ValidationErrorKind::LayerOutOfRange => {
                    checks.layer_refs = "failed".to_string();
                }
                ValidationErrorKind::InvalidOverride => {
                    checks.overrides = "failed".to_string();
                }
            }

            let location =
                if let (Some(layer), Some(row), Some(col)) = (error.layer, error.row, error.col) {
                    Some(ValidationLocation {
                        layer,
                        position: ValidationPosition { row, col },
                    })
                } else {
                    None
                };

            messages.push(ValidationMessage {
                severity: "error".to_string(),
                message: error.message.clone(),
                location,
            });
        }

        // Convert warnings
        for warning in &report.warnings {
            if checks.layer_refs == "passed" {
                checks.layer_refs = "warning".to_string();
            }

            messages.push(ValidationMessage {
                severity: "warning".to_string(),
                message: warning.message.clone(),
                location: None,
            });
        }

        let response = ValidationResponse {
            valid: report.is_valid(),
            errors: messages,
            checks,
        };

        // Output results
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&response)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else {
            // Human-readable output
            if response.valid {
                println!("✓ Validation passed");
            } else {
                println!("✗ Validation failed");
            }

            println!("\nChecks:");
            println!("  Keycodes:   {}", response.checks.keycodes);
            println!("  Positions:  {}", response.checks.positions);
            println!("  Layer refs: {}", response.checks.layer_refs);
            println!("  Overrides:  {}", response.checks.overrides);

            if !response.errors.is_empty() {
                println!("\nIssues:");
                for msg in &response.errors {
                    let prefix = if msg.severity == "error" {
                        "  ✗"
                    } else {
                        "  ⚠"
                    };
                    if let Some(loc) = &msg.location {
                        println!(
                            "{} [Layer {} ({}, {})] {}",
                            prefix, loc.layer, loc.position.row, loc.position.col, msg.message
                        );
                    } else {
                        println!("{} {}", prefix, msg.message);
                    }
                }
            }
        }

        // Exit code
        if !response.valid {
            return Err(CliError::validation("Validation failed"));
        }

        if self.strict {
            let has_warnings = response.errors.iter().any(|m| m.severity == "warning");
            if has_warnings {
                return Err(CliError::validation("Warnings found in strict mode"));
            }
        }

        Ok(())
    }
}
