//! Keycodes command for searching the keycode database.

use crate::cli::common::{CliError, CliResult};
use crate::keycode_db::KeycodeDb;
use clap::Args;
use serde::Serialize;

/// Search the keycode database
#[derive(Debug, Clone, Args)]
pub struct KeycodesArgs {
    /// Search query (matches code, name, or description)
    #[arg(value_name = "QUERY", default_value = "")]
    pub query: String,

    /// Restrict results to a category (e.g., "navigation")
    #[arg(short, long, value_name = "ID")]
    pub category: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON response for keycode search
#[derive(Debug, Serialize)]
struct KeycodesResponse {
    count: usize,
    keycodes: Vec<KeycodeData>,
}

/// Individual keycode for JSON output
#[derive(Debug, Serialize)]
struct KeycodeData {
    code: String,
    name: String,
    category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl KeycodesArgs {
    /// Execute the keycodes command
    pub fn execute(&self) -> CliResult<()> {
        let db = KeycodeDb::load()
            .map_err(|e| CliError::io(format!("Failed to load keycode database: {e}")))?;

        if let Some(category) = &self.category {
            if db.get_category(category).is_none() {
                let known: Vec<&str> = db.categories().iter().map(|c| c.id.as_str()).collect();
                return Err(CliError::usage(format!(
                    "Unknown category '{}'. Known categories: {}",
                    category,
                    known.join(", ")
                )));
            }
        }

        let results: Vec<_> = db
            .search(&self.query)
            .into_iter()
            .filter(|k| {
                self.category
                    .as_ref()
                    .is_none_or(|category| &k.category == category)
            })
            .collect();

        if self.json {
            let keycodes: Vec<KeycodeData> = results
                .iter()
                .map(|k| KeycodeData {
                    code: k.code.clone(),
                    name: k.name.clone(),
                    category: k.category.clone(),
                    description: k.description.clone(),
                })
                .collect();

            let response = KeycodesResponse {
                count: keycodes.len(),
                keycodes,
            };

            println!(
                "{}",
                serde_json::to_string_pretty(&response)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else {
            if results.is_empty() {
                println!("No keycodes match '{}'", self.query);
                return Ok(());
            }

            for k in &results {
                let description = k
                    .description
                    .as_deref()
                    .map(|d| format!(" - {d}"))
                    .unwrap_or_default();
                println!("  {:<24} {} [{}]{}", k.code, k.name, k.category, description);
            }
            println!("\n{} keycodes", results.len());
        }

        Ok(())
    }
}
