//! Markdown keymap file generation (serialization).
//!
//! This module handles generating human-readable Markdown files from Keymap
//! structures, with atomic file writes for safety.

use crate::models::{Keymap, Layer};
use anyhow::{Context, Result};
use std::path::Path;

/// Generates a Markdown keymap file from a Keymap structure.
///
/// This performs an atomic write using a temp file + rename pattern to ensure
/// the file is never left in a corrupted state.
///
/// # Errors
///
/// Returns errors for:
/// - File I/O failures
/// - Permission issues
/// - Atomic rename failures
pub fn save_keymap(keymap: &Keymap, path: &Path) -> Result<()> {
    let markdown = generate_markdown(keymap)?;
    atomic_write(path, &markdown)
}

/// Generates Markdown content from a Keymap.
pub fn generate_markdown(keymap: &Keymap) -> Result<String> {
    let mut output = String::new();

    // Generate frontmatter
    output.push_str(&generate_frontmatter(keymap)?);
    output.push('\n');

    // Generate title
    output.push_str(&format!("# {}\n\n", keymap.metadata.name));

    // Generate layers
    for layer in &keymap.layers {
        output.push_str(&generate_layer(layer));
        output.push('\n');
    }

    // Generate overrides section if any exist
    if !keymap.overrides.is_empty() {
        output.push_str(&generate_overrides(keymap));
    }

    Ok(output)
}

/// Generates YAML frontmatter from metadata.
fn generate_frontmatter(keymap: &Keymap) -> Result<String> {
    let yaml =
        serde_yml::to_string(&keymap.metadata).context("Failed to serialize metadata to YAML")?;

    Ok(format!("---\n{yaml}---\n"))
}

/// Generates a layer section with header and table.
fn generate_layer(layer: &Layer) -> String {
    let mut output = String::new();

    // Layer header: ## Layer N: Name
    output.push_str(&format!("## Layer {}: {}\n\n", layer.number, layer.name));

    // Generate table
    output.push_str(&generate_table(layer));

    output
}

/// Generates a Markdown table for a layer's keys.
fn generate_table(layer: &Layer) -> String {
    use std::collections::HashMap;

    if layer.keys.is_empty() {
        return String::new();
    }

    // Group keys by row
    let mut rows: HashMap<u8, Vec<_>> = HashMap::new();
    let mut max_col = 0;

    for key in &layer.keys {
        max_col = max_col.max(key.position.col);
        rows.entry(key.position.row).or_default().push(key);
    }

    let num_cols = usize::from(max_col) + 1;
    let mut row_nums: Vec<_> = rows.keys().copied().collect();
    row_nums.sort_unstable();

    let mut output = String::new();

    // Generate header row
    output.push('|');
    for col in 0..num_cols {
        output.push_str(&format!(" C{col} |"));
    }
    output.push('\n');

    // Generate separator row
    output.push('|');
    for _ in 0..num_cols {
        output.push_str("------|");
    }
    output.push('\n');

    // Generate data rows
    for row_num in row_nums {
        output.push('|');
        let row_keys = rows.get(&row_num).unwrap();

        // Create a map for quick lookup by column
        let mut col_map: HashMap<u8, &crate::models::KeyDefinition> = HashMap::new();
        for key in row_keys {
            col_map.insert(key.position.col, key);
        }

        for col in 0..num_cols {
            #[allow(clippy::cast_possible_truncation)]
            if let Some(key) = col_map.get(&(col as u8)) {
                output.push(' ');
                output.push_str(&key.keycode);
                output.push_str(" |");
            } else {
                output.push_str("  |"); // Empty cell (gap)
            }
        }
        output.push('\n');
    }

    output.push('\n');
    output
}

/// Generates the overrides section.
fn generate_overrides(keymap: &Keymap) -> String {
    let mut output = String::from("## Overrides\n\n");

    for rule in &keymap.overrides {
        output.push_str(&format!("- {rule}\n"));
    }

    output
}

/// Performs an atomic file write using temp file + rename pattern.
///
/// This ensures the target file is never left in a corrupted state:
/// 1. Write to temporary file
/// 2. Verify write success
/// 3. Atomic rename to target path
fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let temp_path = path.with_extension("md.tmp");

    std::fs::write(&temp_path, content)
        .with_context(|| format!("Failed to write to temporary file: {}", temp_path.display()))?;

    std::fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temporary file to: {}", path.display()))?;

    Ok(())
}
