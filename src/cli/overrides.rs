//! Overrides command for displaying the key override table.

use crate::cli::common::{load_keymap, CliError, CliResult};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Show the key override table
#[derive(Debug, Clone, Args)]
pub struct OverridesArgs {
    /// Path to keymap markdown file (defaults to the built-in keymap)
    #[arg(short, long, value_name = "FILE")]
    pub keymap: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON response for the override table
#[derive(Debug, Serialize)]
struct OverridesResponse {
    count: usize,
    overrides: Vec<OverrideData>,
}

/// Individual override rule for JSON output
#[derive(Debug, Serialize)]
struct OverrideData {
    trigger: String,
    trigger_mods: String,
    replacement: String,
    suppressed_mods: String,
    all_layers: bool,
}

impl OverridesArgs {
    /// Execute the overrides command
    pub fn execute(&self) -> CliResult<()> {
        let keymap = load_keymap(self.keymap.as_deref())?;

        if self.json {
            let overrides: Vec<OverrideData> = keymap
                .overrides
                .iter()
                .map(|rule| OverrideData {
                    trigger: rule.trigger.clone(),
                    trigger_mods: rule.trigger_mods.to_string(),
                    replacement: rule.replacement.clone(),
                    suppressed_mods: rule.suppressed_mods.to_string(),
                    all_layers: rule.layers == crate::models::ALL_LAYERS,
                })
                .collect();

            let response = OverridesResponse {
                count: overrides.len(),
                overrides,
            };

            println!(
                "{}",
                serde_json::to_string_pretty(&response)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else {
            if keymap.overrides.is_empty() {
                println!("No overrides defined");
                return Ok(());
            }

            println!("Overrides ({}):", keymap.overrides.len());
            for rule in &keymap.overrides {
                println!("  {rule}");
            }
        }

        Ok(())
    }
}
