//! Config command for inspecting and updating application settings.

use crate::cli::common::{CliError, CliResult};
use crate::config::Config;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Show or update application configuration
#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// Set the QMK firmware checkout path
    #[arg(long, value_name = "PATH")]
    pub set_qmk_path: Option<PathBuf>,

    /// Set the default output directory for generated sources
    #[arg(long, value_name = "DIR")]
    pub set_output_dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON response for the config command
#[derive(Debug, Serialize)]
struct ConfigResponse {
    qmk_firmware: Option<String>,
    output_dir: String,
    keymap_name: String,
}

impl ConfigArgs {
    /// Execute the config command
    pub fn execute(&self) -> CliResult<()> {
        let mut config =
            Config::load().map_err(|e| CliError::io(format!("Failed to load config: {e}")))?;

        let mut changed = false;

        if let Some(path) = &self.set_qmk_path {
            if !path.is_dir() {
                return Err(CliError::usage(format!(
                    "QMK path is not a directory: {}",
                    path.display()
                )));
            }
            config.paths.qmk_firmware = Some(path.clone());
            changed = true;
        }

        if let Some(dir) = &self.set_output_dir {
            config.build.output_dir.clone_from(dir);
            changed = true;
        }

        if changed {
            config
                .save()
                .map_err(|e| CliError::io(format!("Failed to save config: {e}")))?;
        }

        if self.json {
            let response = ConfigResponse {
                qmk_firmware: config
                    .paths
                    .qmk_firmware
                    .as_ref()
                    .map(|p| p.display().to_string()),
                output_dir: config.build.output_dir.display().to_string(),
                keymap_name: config.build.keymap_name.clone(),
            };

            println!(
                "{}",
                serde_json::to_string_pretty(&response)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else {
            if changed {
                println!("✓ Configuration saved");
                println!();
            }
            match &config.paths.qmk_firmware {
                Some(path) => println!("QMK firmware: {}", path.display()),
                None => println!("QMK firmware: (not configured)"),
            }
            println!("Output dir:   {}", config.build.output_dir.display());
            println!("Keymap name:  {}", config.build.keymap_name);
        }

        Ok(())
    }
}
