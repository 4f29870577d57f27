//! Generate command for firmware source files.

use crate::cli::common::{load_keymap, CliError, CliResult};
use crate::config::Config;
use crate::firmware::generator::FirmwareGenerator;
use crate::firmware::validator::KeymapValidator;
use crate::keycode_db::KeycodeDb;
use crate::models::SplitGeometry;
use clap::Args;
use std::path::PathBuf;

/// Generate QMK firmware sources from a keymap
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Path to keymap markdown file (defaults to the built-in keymap)
    #[arg(short, long, value_name = "FILE")]
    pub keymap: Option<PathBuf>,

    /// Output directory for generated files (defaults to the configured
    /// build directory)
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Output format: keymap, rules, or all
    #[arg(long, value_name = "TYPE", default_value = "all")]
    pub format: String,

    /// Use stable timestamps for deterministic output (for testing)
    #[arg(long)]
    pub deterministic: bool,
}

impl GenerateArgs {
    /// Execute the generate command
    pub fn execute(&self) -> CliResult<()> {
        // Validate format
        if !matches!(self.format.as_str(), "keymap" | "rules" | "all") {
            return Err(CliError::usage(format!(
                "Invalid format '{}'. Must be 'keymap', 'rules', or 'all'",
                self.format
            )));
        }

        let keymap = load_keymap(self.keymap.as_deref())?;

        // Resolve output directory from args or config
        let out_dir = match &self.out_dir {
            Some(dir) => dir.clone(),
            None => {
                let config = Config::load().unwrap_or_default();
                config.build.output_dir
            }
        };

        // Load keycode database
        let keycode_db = KeycodeDb::load()
            .map_err(|e| CliError::io(format!("Failed to load keycode database: {e}")))?;

        // Validate before generating
        let validator = KeymapValidator::new(&keymap, SplitGeometry::DASBOB, &keycode_db);
        let report = validator
            .validate()
            .map_err(|e| CliError::io(format!("Validation failed: {e}")))?;

        if !report.is_valid() {
            return Err(CliError::validation(format!(
                "Keymap validation failed:\n{}",
                report.format_message()
            )));
        }

        // Create output directory
        std::fs::create_dir_all(&out_dir)
            .map_err(|e| CliError::io(format!("Failed to create output directory: {e}")))?;

        let generator = FirmwareGenerator::new(&keymap, SplitGeometry::DASBOB);

        match self.format.as_str() {
            "all" => {
                let keymap_c = generator
                    .generate_keymap_c()
                    .map_err(|e| CliError::io(format!("Failed to generate keymap.c: {e}")))?;
                let rules_mk = generator.generate_rules_mk();

                let keymap_c = self.maybe_normalize(&keymap_c);
                let rules_mk = self.maybe_normalize(&rules_mk);

                std::fs::write(out_dir.join("keymap.c"), keymap_c)
                    .map_err(|e| CliError::io(format!("Failed to write keymap.c: {e}")))?;
                std::fs::write(out_dir.join("rules.mk"), rules_mk)
                    .map_err(|e| CliError::io(format!("Failed to write rules.mk: {e}")))?;

                println!("✓ Generated keymap.c and rules.mk");
                println!("  Output: {}", out_dir.display());
            }
            "keymap" => {
                let keymap_c = generator
                    .generate_keymap_c()
                    .map_err(|e| CliError::io(format!("Failed to generate keymap.c: {e}")))?;
                let keymap_c = self.maybe_normalize(&keymap_c);

                std::fs::write(out_dir.join("keymap.c"), keymap_c)
                    .map_err(|e| CliError::io(format!("Failed to write keymap.c: {e}")))?;

                println!("✓ Generated keymap.c");
                println!("  Output: {}", out_dir.display());
            }
            "rules" => {
                let rules_mk = self.maybe_normalize(&generator.generate_rules_mk());

                std::fs::write(out_dir.join("rules.mk"), rules_mk)
                    .map_err(|e| CliError::io(format!("Failed to write rules.mk: {e}")))?;

                println!("✓ Generated rules.mk");
                println!("  Output: {}", out_dir.display());
            }
            _ => unreachable!("Format already validated"),
        }

        Ok(())
    }

    /// Normalizes generated code for deterministic output when requested.
    fn maybe_normalize(&self, content: &str) -> String {
        if self.deterministic {
            normalize_for_deterministic(content)
        } else {
            content.to_string()
        }
    }
}

/// Normalize generated code for deterministic output (remove timestamps)
fn normalize_for_deterministic(content: &str) -> String {
    let mut lines: Vec<&str> = content
        .lines()
        .map(|line| {
            if line.starts_with("// Generated:") {
                "// Generated: <timestamp>"
            } else if line.starts_with("# Generated:") {
                "# Generated: <timestamp>"
            } else {
                line
            }
        })
        .collect();
    lines.push(""); // Preserve trailing newline
    lines.join("\n")
}
