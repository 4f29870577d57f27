//! Layer references command for displaying inbound layer references and
//! transparency warnings.

use crate::cli::common::{load_keymap, CliError, CliResult};
use crate::services::layer_refs::{build_layer_ref_index, check_transparency_conflict, LayerRef};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Show layer references and transparency warnings
#[derive(Debug, Clone, Args)]
pub struct LayerRefsArgs {
    /// Path to keymap markdown file (defaults to the built-in keymap)
    #[arg(short, long, value_name = "FILE")]
    pub keymap: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON response for layer references
#[derive(Debug, Serialize)]
struct LayerRefsResponse {
    layers: Vec<LayerRefData>,
}

/// Layer reference data for JSON output
#[derive(Debug, Serialize)]
struct LayerRefData {
    number: usize,
    name: String,
    inbound_refs: Vec<InboundRefData>,
    warnings: Vec<WarningData>,
}

/// Individual inbound reference for JSON output
#[derive(Debug, Serialize)]
struct InboundRefData {
    from_layer: usize,
    position: PositionData,
    kind: String,
    keycode: String,
}

/// Position data for JSON output
#[derive(Debug, Serialize)]
struct PositionData {
    row: u8,
    col: u8,
}

/// Warning data for JSON output
#[derive(Debug, Serialize)]
struct WarningData {
    position: PositionData,
    message: String,
}

impl LayerRefsArgs {
    /// Execute the layer-refs command
    pub fn execute(&self) -> CliResult<()> {
        let keymap = load_keymap(self.keymap.as_deref())?;
        let index = build_layer_ref_index(&keymap.layers);

        // Collect per-layer data once; both output modes render from it
        let mut layers_data = Vec::new();
        for (layer_idx, layer) in keymap.layers.iter().enumerate() {
            let refs: &[LayerRef] = index.get(&layer_idx).map_or(&[], Vec::as_slice);

            let inbound_refs = refs
                .iter()
                .map(|r| InboundRefData {
                    from_layer: r.from_layer,
                    position: PositionData {
                        row: r.position.row,
                        col: r.position.col,
                    },
                    kind: r.kind.display_name().to_string(),
                    keycode: r.keycode.clone(),
                })
                .collect();

            // A key on this layer shadows a hold-like reference if it is
            // non-transparent at a referenced position
            let warnings = layer
                .keys
                .iter()
                .filter_map(|key| {
                    check_transparency_conflict(layer_idx, key.position, &key.keycode, &index)
                        .map(|message| WarningData {
                            position: PositionData {
                                row: key.position.row,
                                col: key.position.col,
                            },
                            message,
                        })
                })
                .collect();

            layers_data.push(LayerRefData {
                number: layer_idx,
                name: layer.name.clone(),
                inbound_refs,
                warnings,
            });
        }

        if self.json {
            let response = LayerRefsResponse {
                layers: layers_data,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&response)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
            return Ok(());
        }

        for data in &layers_data {
            println!("Layer {}: {}", data.number, data.name);

            if data.inbound_refs.is_empty() {
                println!("  No inbound references");
            } else {
                println!("  Inbound References:");
                for r in &data.inbound_refs {
                    println!(
                        "    - Layer {} [{},{}] {}: {}",
                        r.from_layer, r.position.row, r.position.col, r.kind, r.keycode
                    );
                }
            }

            if !data.warnings.is_empty() {
                println!("  Warnings:");
                for w in &data.warnings {
                    println!(
                        "    - Position [{},{}]: {}",
                        w.position.row, w.position.col, w.message
                    );
                }
            }

            println!();
        }

        Ok(())
    }
}
