//! Keymap validation before firmware generation.
//!
//! This module performs the structural checks that make a keymap safe to
//! compile into QMK firmware: full grid coverage, known keycodes, in-range
//! layer references, and a well-formed override table.

use crate::keycode_db::KeycodeDb;
use crate::models::{Keymap, SplitGeometry};
use crate::services::key_actions::{classify, KeyAction};
use crate::services::layer_refs::{build_layer_ref_index, check_transparency_conflict};
use anyhow::Result;
use std::collections::HashSet;

/// Validation result with specific errors and warnings.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// Critical errors that prevent firmware generation
    pub errors: Vec<ValidationError>,
    /// Non-critical warnings
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// Creates a new empty validation report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Returns true if there are no errors (warnings are allowed).
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Adds an error to the report.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Adds a warning to the report.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Formats the report as a user-friendly message.
    #[must_use]
    pub fn format_message(&self) -> String {
        let mut message = String::new();

        if !self.errors.is_empty() {
            message.push_str(&format!("✗ {} validation errors:\n", self.errors.len()));
            for (idx, error) in self.errors.iter().enumerate() {
                message.push_str(&format!("  {}. {}\n", idx + 1, error));
            }
        }

        if !self.warnings.is_empty() {
            message.push_str(&format!("\n⚠ {} warnings:\n", self.warnings.len()));
            for (idx, warning) in self.warnings.iter().enumerate() {
                message.push_str(&format!("  {}. {}\n", idx + 1, warning));
            }
        }

        message
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Type of validation error
    pub kind: ValidationErrorKind,
    /// Layer index where error occurred
    pub layer: Option<usize>,
    /// Row where error occurred
    pub row: Option<u8>,
    /// Column where error occurred
    pub col: Option<u8>,
    /// Human-readable error message
    pub message: String,
    /// Optional suggestion for fixing the error
    pub suggestion: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            layer: None,
            row: None,
            col: None,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Sets the layer context.
    #[must_use]
    pub const fn with_layer(mut self, layer: usize) -> Self {
        self.layer = Some(layer);
        self
    }

    /// Sets the position context.
    #[must_use]
    pub const fn with_position(mut self, row: u8, col: u8) -> Self {
        self.row = Some(row);
        self.col = Some(col);
        self
    }

    /// Sets a suggestion for fixing the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let (Some(layer), Some(row), Some(col)) = (self.layer, self.row, self.col) {
            write!(
                f,
                "[Layer {} ({}, {})] {}: {}",
                layer, row, col, self.kind, self.message
            )?;
        } else if let Some(layer) = self.layer {
            write!(f, "[Layer {}] {}: {}", layer, self.kind, self.message)?;
        } else {
            write!(f, "{}: {}", self.kind, self.message)?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n    → {suggestion}")?;
        }

        Ok(())
    }
}

/// Types of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Keycode not recognized by the database
    InvalidKeycode,
    /// Key position outside the keyboard geometry
    PositionOutOfBounds,
    /// Geometry position with no key definition
    MissingPosition,
    /// Multiple keys assigned to the same position
    DuplicatePosition,
    /// Layer contains no key definitions
    EmptyLayer,
    /// Number of keys doesn't match the keyboard geometry
    MismatchedKeyCount,
    /// Layer reference names a layer that doesn't exist
    LayerOutOfRange,
    /// Override table problem (duplicate trigger, bad keycode)
    InvalidOverride,
}

impl std::fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKeycode => write!(f, "Invalid Keycode"),
            Self::PositionOutOfBounds => write!(f, "Position Out of Bounds"),
            Self::MissingPosition => write!(f, "Missing Position"),
            Self::DuplicatePosition => write!(f, "Duplicate Position"),
            Self::EmptyLayer => write!(f, "Empty Layer"),
            Self::MismatchedKeyCount => write!(f, "Mismatched Key Count"),
            Self::LayerOutOfRange => write!(f, "Layer Out of Range"),
            Self::InvalidOverride => write!(f, "Invalid Override"),
        }
    }
}

/// Validation warning (non-blocking).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Warning message
    pub message: String,
}

impl ValidationWarning {
    /// Creates a new validation warning
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Keymap validator.
pub struct KeymapValidator<'a> {
    keymap: &'a Keymap,
    geometry: SplitGeometry,
    keycode_db: &'a KeycodeDb,
}

impl<'a> KeymapValidator<'a> {
    /// Creates a new keymap validator.
    #[must_use]
    pub const fn new(keymap: &'a Keymap, geometry: SplitGeometry, keycode_db: &'a KeycodeDb) -> Self {
        Self {
            keymap,
            geometry,
            keycode_db,
        }
    }

    /// Validates the keymap for firmware generation.
    ///
    /// Checks:
    /// - Every layer covers the geometry exactly (no missing cells,
    ///   no extras, no duplicates)
    /// - All keycodes are valid, including inner keycodes of compound actions
    /// - All layer references are in range
    /// - The override table has unique triggers and valid keycodes
    #[allow(clippy::unnecessary_wraps)]
    pub fn validate(&self) -> Result<ValidationReport> {
        let mut report = ValidationReport::new();

        if self.keymap.layers.is_empty() {
            report.add_error(
                ValidationError::new(ValidationErrorKind::EmptyLayer, "Keymap has no layers")
                    .with_suggestion("Add at least a base layer (Layer 0)"),
            );
            return Ok(report);
        }

        // Validate each layer
        for (layer_idx, layer) in self.keymap.layers.iter().enumerate() {
            self.validate_layer(&mut report, layer_idx, layer);
        }

        // Validate the override table
        self.validate_overrides(&mut report);

        // Transparency warnings for hold-like references
        self.collect_transparency_warnings(&mut report);

        Ok(report)
    }

    /// Validates a single layer.
    fn validate_layer(
        &self,
        report: &mut ValidationReport,
        layer_idx: usize,
        layer: &crate::models::Layer,
    ) {
        if layer.keys.is_empty() {
            report.add_error(
                ValidationError::new(
                    ValidationErrorKind::EmptyLayer,
                    format!("Layer {} '{}' has no keys", layer_idx, layer.name),
                )
                .with_layer(layer_idx)
                .with_suggestion("Add keys to the layer or remove it"),
            );
            return;
        }

        // Check for expected key count
        let expected_count = self.geometry.key_count();
        if layer.keys.len() != expected_count {
            report.add_error(
                ValidationError::new(
                    ValidationErrorKind::MismatchedKeyCount,
                    format!(
                        "Layer {} has {} keys, expected {} for {}",
                        layer_idx,
                        layer.keys.len(),
                        expected_count,
                        crate::constants::LAYOUT_MACRO
                    ),
                )
                .with_layer(layer_idx)
                .with_suggestion(format!(
                    "Add or remove keys to match the {} layout",
                    crate::constants::LAYOUT_MACRO
                )),
            );
        }

        // Track seen positions to detect duplicates and gaps
        let mut seen_positions = HashSet::new();

        for key in &layer.keys {
            let pos = key.position;

            // Check for duplicate positions
            if !seen_positions.insert(pos) {
                report.add_error(
                    ValidationError::new(
                        ValidationErrorKind::DuplicatePosition,
                        format!("Position ({}, {}) appears multiple times", pos.row, pos.col),
                    )
                    .with_layer(layer_idx)
                    .with_position(pos.row, pos.col)
                    .with_suggestion("Remove duplicate key definitions"),
                );
            }

            // Check the position exists on the keyboard
            if !self.geometry.contains(pos) {
                report.add_error(
                    ValidationError::new(
                        ValidationErrorKind::PositionOutOfBounds,
                        format!(
                            "Position ({}, {}) is outside the {} grid",
                            pos.row,
                            pos.col,
                            crate::constants::LAYOUT_MACRO
                        ),
                    )
                    .with_layer(layer_idx)
                    .with_position(pos.row, pos.col)
                    .with_suggestion("Main grid is rows 0-2, cols 0-9; thumbs row 3, cols 2-7"),
                );
            }

            // Validate the keycode and its action form
            self.validate_keycode(report, layer_idx, pos.row, pos.col, &key.keycode);
        }

        // Every geometry position must be defined (layers are full overlays)
        for pos in self.geometry.positions() {
            if !seen_positions.contains(&pos) {
                report.add_error(
                    ValidationError::new(
                        ValidationErrorKind::MissingPosition,
                        format!("No key defined at ({}, {})", pos.row, pos.col),
                    )
                    .with_layer(layer_idx)
                    .with_position(pos.row, pos.col)
                    .with_suggestion("Use KC_TRNS to defer to the layer below"),
                );
            }
        }
    }

    /// Validates a single keycode, including compound action contents.
    fn validate_keycode(
        &self,
        report: &mut ValidationReport,
        layer: usize,
        row: u8,
        col: u8,
        keycode: &str,
    ) {
        if !self.keycode_db.is_valid(keycode) {
            report.add_error(
                ValidationError::new(
                    ValidationErrorKind::InvalidKeycode,
                    format!("Invalid keycode '{keycode}'"),
                )
                .with_layer(layer)
                .with_position(row, col)
                .with_suggestion(self.suggest_keycode(keycode)),
            );
            return;
        }

        // The database pattern check accepts any well-formed parameter list;
        // classify to verify the action's contents.
        let action = match classify(keycode) {
            Ok(action) => action,
            Err(e) => {
                report.add_error(
                    ValidationError::new(
                        ValidationErrorKind::InvalidKeycode,
                        format!("Malformed keycode '{keycode}': {e}"),
                    )
                    .with_layer(layer)
                    .with_position(row, col),
                );
                return;
            }
        };

        // Inner keycodes of compound actions must be plain valid codes
        if !matches!(action, KeyAction::Plain(_)) {
            if let Some(inner) = action.inner_keycode() {
                if !self.keycode_db.is_plain(inner) && !crate::services::layer_refs::is_transparent(inner) {
                    report.add_error(
                        ValidationError::new(
                            ValidationErrorKind::InvalidKeycode,
                            format!("Invalid inner keycode '{inner}' in '{keycode}'"),
                        )
                        .with_layer(layer)
                        .with_position(row, col)
                        .with_suggestion(self.suggest_keycode(inner)),
                    );
                }
            }
        }

        // Layer references must name existing layers
        if let Some(target) = action.layer() {
            if target >= self.keymap.layers.len() {
                report.add_error(
                    ValidationError::new(
                        ValidationErrorKind::LayerOutOfRange,
                        format!(
                            "'{}' references layer {} but the keymap has {} layers",
                            keycode,
                            target,
                            self.keymap.layers.len()
                        ),
                    )
                    .with_layer(layer)
                    .with_position(row, col)
                    .with_suggestion(format!(
                        "Valid layer indices are 0-{}",
                        self.keymap.layers.len() - 1
                    )),
                );
            }
        }
    }

    /// Validates the override table.
    fn validate_overrides(&self, report: &mut ValidationReport) {
        let mut seen_triggers = HashSet::new();

        for rule in &self.keymap.overrides {
            if !seen_triggers.insert(rule.trigger.as_str()) {
                report.add_error(
                    ValidationError::new(
                        ValidationErrorKind::InvalidOverride,
                        format!("Duplicate override trigger '{}'", rule.trigger),
                    )
                    .with_suggestion("The framework defines no precedence between duplicate triggers"),
                );
            }

            if rule.trigger_mods.is_empty() {
                report.add_error(ValidationError::new(
                    ValidationErrorKind::InvalidOverride,
                    format!("Override for '{}' requires no modifiers", rule.trigger),
                ));
            }

            for (role, keycode) in [("trigger", &rule.trigger), ("replacement", &rule.replacement)]
            {
                if !self.keycode_db.is_plain(keycode) {
                    report.add_error(
                        ValidationError::new(
                            ValidationErrorKind::InvalidOverride,
                            format!("Override {role} '{keycode}' is not a plain keycode"),
                        )
                        .with_suggestion(self.suggest_keycode(keycode)),
                    );
                }
            }
        }
    }

    /// Collects transparency-conflict warnings for hold-like layer references.
    fn collect_transparency_warnings(&self, report: &mut ValidationReport) {
        let index = build_layer_ref_index(&self.keymap.layers);

        for (layer_idx, layer) in self.keymap.layers.iter().enumerate() {
            for key in &layer.keys {
                if let Some(message) =
                    check_transparency_conflict(layer_idx, key.position, &key.keycode, &index)
                {
                    report.add_warning(ValidationWarning::new(format!(
                        "Layer {layer_idx}: {message}"
                    )));
                }
            }
        }
    }

    /// Builds a "did you mean" suggestion for an unknown keycode.
    fn suggest_keycode(&self, keycode: &str) -> String {
        let suggestions = self.keycode_db.search(keycode);
        if suggestions.is_empty() {
            "Check the keycode database for valid codes".to_string()
        } else {
            let similar: Vec<&str> = suggestions.iter().take(3).map(|k| k.code.as_str()).collect();
            format!("Did you mean one of: {}", similar.join(", "))
        }
    }
}
