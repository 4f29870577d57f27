//! Markdown keymap file parsing.
//!
//! This module handles parsing keymaps from human-readable Markdown files.
//! The format uses YAML frontmatter for metadata, Markdown tables for key
//! assignments, and a list section for override rules.

use crate::constants::APP_BINARY_NAME;
use crate::models::{KeyDefinition, KeyOverride, Keymap, KeymapMetadata, Layer, Modifiers, Position};
use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;

/// Parses a Markdown keymap file into a Keymap structure.
///
/// # File Format
///
/// ```markdown
/// ---
/// name: "Keymap Name"
/// description: "Description"
/// author: "Author"
/// created: "2024-01-15T10:30:00Z"
/// modified: "2024-01-20T15:45:00Z"
/// tags: ["tag1", "tag2"]
/// version: "1.0"
/// keyboard: "dasbob"
/// layout_variant: "LAYOUT_split_3x5_3"
/// ---
///
/// # Keymap Title
///
/// ## Layer 0: Alpha
///
/// | C0 | C1 | ... |
/// |----|----|-----|
/// | KC_Q | KC_K | ... |
///
/// ## Overrides
///
/// - RSFT + KC_1: KC_F1
/// ```
///
/// # Errors
///
/// Returns errors for:
/// - File not found
/// - Invalid YAML frontmatter
/// - Malformed layer headers or override rules
/// - Invalid table structure or keycode syntax
pub fn parse_keymap(path: &Path) -> Result<Keymap> {
    // Check if file exists first to provide better error message
    if !path.exists() {
        anyhow::bail!(
            "Keymap file not found: {}\n\n\
             Please check the file path and try again.\n\
             Run {} without arguments to inspect the built-in keymap.",
            path.display(),
            APP_BINARY_NAME
        );
    }

    if !path.is_file() {
        anyhow::bail!(
            "Path is not a file: {}\n\n\
             Please provide a path to a Markdown (.md) keymap file.",
            path.display()
        );
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read keymap file: {}", path.display()))?;

    parse_keymap_str(&content)
        .with_context(|| format!("Failed to parse keymap file: {}", path.display()))
}

/// Parses a Markdown keymap from a string.
pub fn parse_keymap_str(content: &str) -> Result<Keymap> {
    let lines: Vec<&str> = content.lines().collect();

    // Parse frontmatter
    let (metadata, content_start) = parse_frontmatter(&lines)?;

    let mut keymap = Keymap {
        metadata,
        layers: Vec::new(),
        overrides: Vec::new(),
    };

    // Parse content (layers and overrides)
    parse_content(&lines[content_start..], &mut keymap)?;

    // Validate the parsed keymap
    keymap.validate()?;

    Ok(keymap)
}

/// Parses YAML frontmatter from the beginning of the file.
///
/// Returns the parsed metadata and the line index where content starts.
fn parse_frontmatter(lines: &[&str]) -> Result<(KeymapMetadata, usize)> {
    // Find frontmatter boundaries
    let mut start_idx = None;
    let mut end_idx = None;

    for (idx, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed == "---" {
            if start_idx.is_none() {
                start_idx = Some(idx);
            } else if end_idx.is_none() {
                end_idx = Some(idx);
                break;
            }
        }
    }

    let start =
        start_idx.ok_or_else(|| anyhow::anyhow!("Missing frontmatter start marker (---)"))?;
    let end = end_idx.ok_or_else(|| anyhow::anyhow!("Missing frontmatter end marker (---)"))?;

    // Extract YAML content (between the --- markers)
    let yaml_content = lines[start + 1..end].join("\n");

    // Parse YAML
    let metadata: KeymapMetadata =
        serde_yml::from_str(&yaml_content).context("Failed to parse YAML frontmatter")?;

    // Validate metadata
    validate_metadata(&metadata)?;

    Ok((metadata, end + 1))
}

/// Validates metadata after parsing.
fn validate_metadata(metadata: &KeymapMetadata) -> Result<()> {
    if metadata.name.is_empty() {
        anyhow::bail!("Keymap name cannot be empty");
    }

    if metadata.name.len() > 100 {
        anyhow::bail!(
            "Keymap name exceeds maximum length of 100 characters (got {})",
            metadata.name.len()
        );
    }

    if metadata.modified < metadata.created {
        anyhow::bail!("Modified timestamp cannot be before created timestamp");
    }

    if metadata.version != "1.0" {
        anyhow::bail!(
            "Unsupported schema version '{}'. Only version '1.0' is supported.",
            metadata.version
        );
    }

    if metadata.keyboard.is_empty() {
        anyhow::bail!("Keymap must name its target keyboard");
    }

    if metadata.layout_variant.is_empty() {
        anyhow::bail!("Keymap must name its layout variant");
    }

    // Validate tags
    let tag_regex = Regex::new(r"^[a-z0-9-]+$").unwrap();
    for tag in &metadata.tags {
        if !tag_regex.is_match(tag) {
            anyhow::bail!(
                "Invalid tag '{tag}'. Tags must be lowercase with hyphens and alphanumeric characters only"
            );
        }
    }

    Ok(())
}

/// Parses the content section (layers and overrides).
fn parse_content(lines: &[&str], keymap: &mut Keymap) -> Result<()> {
    let mut line_num = 0;

    while line_num < lines.len() {
        let line = lines[line_num].trim();

        // Skip empty lines and main title
        if line.is_empty() || line.starts_with("# ") {
            line_num += 1;
            continue;
        }

        // Check for layer header (## Layer N: Name)
        if line.starts_with("## Layer ") {
            line_num = parse_layer(lines, line_num, keymap)
                .with_context(|| format!("Error parsing layer at line {}", line_num + 1))?;
            continue;
        }

        // Check for overrides section (## Overrides)
        if line == "## Overrides" {
            line_num = parse_overrides(lines, line_num, keymap)
                .with_context(|| format!("Error parsing overrides at line {}", line_num + 1))?;
            continue;
        }

        line_num += 1;
    }

    Ok(())
}

/// Parses a single layer section.
fn parse_layer(lines: &[&str], start_line: usize, keymap: &mut Keymap) -> Result<usize> {
    let mut line_num = start_line;
    let header_line = lines[line_num];

    // Parse layer header: ## Layer N: Name
    let layer_regex = Regex::new(r"^##\s+Layer\s+(\d+):\s+(.+)$").unwrap();
    let captures = layer_regex
        .captures(header_line)
        .ok_or_else(|| anyhow::anyhow!("Invalid layer header format: {header_line}"))?;

    let layer_number: u8 = captures[1]
        .parse()
        .context("Failed to parse layer number")?;
    let layer_name = captures[2].trim().to_string();

    line_num += 1;

    // Skip blank lines before the table
    while line_num < lines.len() && lines[line_num].trim().is_empty() {
        line_num += 1;
    }

    // Create layer and parse its table
    let mut layer = Layer::new(layer_number, layer_name)?;
    line_num = parse_layer_table(lines, line_num, &mut layer)?;

    keymap.add_layer(layer)?;

    Ok(line_num)
}

/// Parses a layer's key table.
fn parse_layer_table(lines: &[&str], start_line: usize, layer: &mut Layer) -> Result<usize> {
    let mut line_num = start_line;
    let mut row = 0;

    // Skip table header row
    if line_num < lines.len() && lines[line_num].trim_start().starts_with('|') {
        line_num += 1;
    }

    // Skip separator row (|---|---|)
    if line_num < lines.len() && lines[line_num].contains("---") {
        line_num += 1;
    }

    // Parse data rows
    while line_num < lines.len() {
        let line = lines[line_num].trim();

        // Stop at empty line or next section
        if line.is_empty() || line.starts_with("##") || line.starts_with("---") {
            break;
        }

        // Parse table row
        if line.starts_with('|') {
            parse_table_row(line, row, layer).with_context(|| {
                format!("Error parsing table row {} at line {}", row, line_num + 1)
            })?;
            row += 1;
        }

        line_num += 1;
    }

    Ok(line_num)
}

/// Parses a single table row into key definitions.
fn parse_table_row(line: &str, row: u8, layer: &mut Layer) -> Result<()> {
    // Split by pipes and trim, keeping empty cells to preserve column indices
    // This is critical for split keyboards where gaps between halves and
    // around the thumb cluster are empty cells
    let cells: Vec<&str> = line.split('|').map(str::trim).collect();

    // Skip leading empty element from split (line starts with '|')
    // and trailing empty element (line ends with '|')
    let cells = if cells.len() >= 2 {
        &cells[1..cells.len() - 1]
    } else {
        &cells[..]
    };

    for (col, cell) in cells.iter().enumerate() {
        // Skip empty cells (gaps) but preserve column index
        if cell.is_empty() {
            continue;
        }

        let col = u8::try_from(col).context("Table has too many columns")?;
        let key = parse_keycode_syntax(cell, row, col)
            .with_context(|| format!("Error parsing cell at row {row}, col {col}: {cell}"))?;

        layer.add_key(key);
    }

    Ok(())
}

/// Parses a keycode cell.
///
/// Accepts basic keycodes (`KC_A`) and parameterized keycodes
/// (`LT(2, KC_ESC)`, `MT(MOD_LCTL, KC_TRNS)`).
fn parse_keycode_syntax(cell: &str, row: u8, col: u8) -> Result<KeyDefinition> {
    // Pattern breakdown:
    //   [A-Z][A-Z_0-9]*   - Keycode prefix (KC_, QK_, MO, LT, ...)
    //   (?:\([^)]*\))?    - Optional parentheses with parameters
    let keycode_regex = Regex::new(r"^([A-Z][A-Z_0-9]*(?:\([^)]*\))?)\s*$").unwrap();

    let captures = keycode_regex
        .captures(cell)
        .ok_or_else(|| anyhow::anyhow!("Invalid keycode syntax: {cell}"))?;

    let keycode = captures[1].to_string();
    let position = Position::new(row, col);

    Ok(KeyDefinition::new(position, keycode))
}

/// Parses the overrides section.
///
/// Each rule is a list line of the form `- MOD + KC_TRIGGER: KC_REPLACEMENT`,
/// e.g., `- RSFT + KC_1: KC_F1`.
fn parse_overrides(lines: &[&str], start_line: usize, keymap: &mut Keymap) -> Result<usize> {
    let mut line_num = start_line + 1; // Skip "## Overrides" header

    let override_regex =
        Regex::new(r"^-\s+([A-Z][A-Z_]*)\s*\+\s*([A-Z][A-Z_0-9]*):\s+([A-Z][A-Z_0-9]*)$").unwrap();

    while line_num < lines.len() {
        let line = lines[line_num].trim();

        // Skip empty lines
        if line.is_empty() {
            line_num += 1;
            continue;
        }

        // Stop at next section
        if line.starts_with("##") {
            break;
        }

        // Parse override line: - MOD + KC_X: KC_Y
        if line.starts_with('-') {
            let captures = override_regex
                .captures(line)
                .ok_or_else(|| anyhow::anyhow!("Invalid override rule: {line}"))?;

            let mods = Modifiers::parse_short(&captures[1])
                .with_context(|| format!("Invalid modifier in override rule: {line}"))?;
            let rule = KeyOverride::basic(mods, &captures[2], &captures[3])?;
            keymap.add_override(rule)?;
        }

        line_num += 1;
    }

    Ok(line_num)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_KEYMAP: &str = r#"---
name: "Test Keymap"
description: "A test keymap"
author: "test"
created: "2025-01-01T00:00:00Z"
modified: "2025-01-02T00:00:00Z"
tags: ["test"]
version: "1.0"
keyboard: "dasbob"
layout_variant: "LAYOUT_split_3x5_3"
---

# Test Keymap

## Layer 0: Alpha

| C0 | C1 |
|------|------|
| KC_A | KC_B |
| LT(1, KC_ESC) | KC_TRNS |

## Layer 1: Nav

| C0 | C1 |
|------|------|
| KC_LEFT | KC_RGHT |
| KC_TRNS | KC_TRNS |

## Overrides

- RSFT + KC_1: KC_F1
- RSFT + KC_COMM: KC_DOT
"#;

    #[test]
    fn test_parse_minimal_keymap() {
        let keymap = parse_keymap_str(MINIMAL_KEYMAP).unwrap();

        assert_eq!(keymap.metadata.name, "Test Keymap");
        assert_eq!(keymap.metadata.keyboard, "dasbob");
        assert_eq!(keymap.layers.len(), 2);
        assert_eq!(keymap.layers[0].name, "Alpha");
        assert_eq!(keymap.layers[0].keys.len(), 4);
        assert_eq!(keymap.layers[1].name, "Nav");
        assert_eq!(keymap.overrides.len(), 2);
    }

    #[test]
    fn test_parse_keycodes_and_positions() {
        let keymap = parse_keymap_str(MINIMAL_KEYMAP).unwrap();
        let layer = &keymap.layers[0];

        assert_eq!(layer.get_key(Position::new(0, 0)).unwrap().keycode, "KC_A");
        assert_eq!(
            layer.get_key(Position::new(1, 0)).unwrap().keycode,
            "LT(1, KC_ESC)"
        );
        assert_eq!(
            layer.get_key(Position::new(1, 1)).unwrap().keycode,
            "KC_TRNS"
        );
    }

    #[test]
    fn test_parse_overrides() {
        let keymap = parse_keymap_str(MINIMAL_KEYMAP).unwrap();

        let rule = keymap.get_override("KC_1").unwrap();
        assert_eq!(rule.trigger_mods, Modifiers::RSFT);
        assert_eq!(rule.suppressed_mods, Modifiers::RSFT);
        assert_eq!(rule.replacement, "KC_F1");
    }

    #[test]
    fn test_parse_empty_cells_preserve_columns() {
        let content = MINIMAL_KEYMAP.replace("| KC_A | KC_B |", "|  | KC_B |");
        let keymap = parse_keymap_str(&content).unwrap();
        let layer = &keymap.layers[0];

        assert!(layer.get_key(Position::new(0, 0)).is_none());
        assert_eq!(layer.get_key(Position::new(0, 1)).unwrap().keycode, "KC_B");
    }

    #[test]
    fn test_parse_missing_frontmatter() {
        assert!(parse_keymap_str("# No frontmatter\n").is_err());
    }

    #[test]
    fn test_parse_unsupported_version() {
        let content = MINIMAL_KEYMAP.replace("version: \"1.0\"", "version: \"2.0\"");
        assert!(parse_keymap_str(&content).is_err());
    }

    #[test]
    fn test_parse_invalid_keycode_syntax() {
        let content = MINIMAL_KEYMAP.replace("KC_A", "kc_lower");
        assert!(parse_keymap_str(&content).is_err());
    }

    #[test]
    fn test_parse_invalid_override_rule() {
        let content = MINIMAL_KEYMAP.replace("- RSFT + KC_1: KC_F1", "- not a rule");
        assert!(parse_keymap_str(&content).is_err());
    }

    #[test]
    fn test_parse_duplicate_override_trigger() {
        let content = MINIMAL_KEYMAP.replace("- RSFT + KC_COMM: KC_DOT", "- RSFT + KC_1: KC_F2");
        assert!(parse_keymap_str(&content).is_err());
    }

    #[test]
    fn test_parse_non_sequential_layers() {
        let content = MINIMAL_KEYMAP.replace("## Layer 1: Nav", "## Layer 3: Nav");
        assert!(parse_keymap_str(&content).is_err());
    }

    #[test]
    fn test_parse_rejects_modified_before_created() {
        let content = MINIMAL_KEYMAP.replace(
            "modified: \"2025-01-02T00:00:00Z\"",
            "modified: \"2024-12-31T00:00:00Z\"",
        );
        assert!(parse_keymap_str(&content).is_err());
    }
}
