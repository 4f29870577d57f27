//! Keymap and metadata data structures.

use crate::models::layer::{KeyDefinition, Layer};
use crate::models::KeyOverride;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// File metadata embedded in YAML frontmatter.
///
/// # Validation
///
/// - name must be non-empty, max 100 characters
/// - created must be <= modified
/// - tags must be lowercase, hyphen/alphanumeric only
/// - version must match supported versions (currently "1.0")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeymapMetadata {
    /// Keymap name (e.g., "DasBob Colemak")
    pub name: String,
    /// Long description
    pub description: String,
    /// Creator name
    pub author: String,
    /// Creation timestamp (ISO 8601)
    pub created: DateTime<Utc>,
    /// Last modification timestamp (ISO 8601)
    pub modified: DateTime<Utc>,
    /// Searchable keywords
    pub tags: Vec<String>,
    /// Schema version (e.g., "1.0")
    pub version: String,
    /// QMK keyboard identifier (e.g., "dasbob")
    pub keyboard: String,
    /// QMK layout macro (e.g., "`LAYOUT_split_3x5_3`")
    pub layout_variant: String,
}

#[allow(dead_code)]
impl KeymapMetadata {
    /// Creates new metadata with default values for the DasBob.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        Self::validate_name(&name)?;

        let now = Utc::now();
        Ok(Self {
            name,
            description: String::new(),
            author: String::new(),
            created: now,
            modified: now,
            tags: Vec::new(),
            version: "1.0".to_string(),
            keyboard: crate::constants::KEYBOARD_NAME.to_string(),
            layout_variant: crate::constants::LAYOUT_MACRO.to_string(),
        })
    }

    /// Validates metadata name.
    fn validate_name(name: &str) -> Result<()> {
        if name.is_empty() {
            anyhow::bail!("Keymap name cannot be empty");
        }

        if name.len() > 100 {
            anyhow::bail!(
                "Keymap name '{}' exceeds maximum length of 100 characters (got {})",
                name,
                name.len()
            );
        }

        Ok(())
    }

    /// Updates the modification timestamp to now.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }

    /// Adds a tag with validation.
    pub fn add_tag(&mut self, tag: impl Into<String>) -> Result<()> {
        let tag = tag.into();
        Self::validate_tag(&tag)?;

        if !self.tags.contains(&tag) {
            self.tags.push(tag);
            self.touch();
        }

        Ok(())
    }

    /// Validates tag format (lowercase, hyphens, alphanumeric).
    fn validate_tag(tag: &str) -> Result<()> {
        if tag.is_empty() {
            anyhow::bail!("Tag cannot be empty");
        }

        if !tag
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            anyhow::bail!(
                "Tag '{tag}' must be lowercase with hyphens and alphanumeric characters only"
            );
        }

        Ok(())
    }
}

impl Default for KeymapMetadata {
    fn default() -> Self {
        Self::new("Untitled Keymap").unwrap()
    }
}

/// Complete keymap: metadata, ordered layers, and the override table.
///
/// # Validation
///
/// - At least one layer required (layer 0)
/// - Layer numbers must be sequential without gaps
/// - All layers must have the same number of keys
/// - Override trigger keycodes must be unique
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keymap {
    /// File metadata
    pub metadata: KeymapMetadata,
    /// Ordered list of layers (0-N)
    pub layers: Vec<Layer>,
    /// Modifier-conditional key replacement rules
    pub overrides: Vec<KeyOverride>,
}

#[allow(dead_code)]
impl Keymap {
    /// Creates a new Keymap with default metadata.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let metadata = KeymapMetadata::new(name)?;
        Ok(Self {
            metadata,
            layers: Vec::new(),
            overrides: Vec::new(),
        })
    }

    /// Adds a layer to this keymap.
    pub fn add_layer(&mut self, layer: Layer) -> Result<()> {
        // Validate sequential layer numbers
        if self.layers.is_empty() {
            if layer.number != 0 {
                anyhow::bail!("First layer must have number 0, got {}", layer.number);
            }
        } else {
            let expected_number = u8::try_from(self.layers.len())
                .map_err(|_| anyhow::anyhow!("Too many layers (max 256)"))?;
            if layer.number != expected_number {
                anyhow::bail!(
                    "Layer numbers must be sequential. Expected layer {}, got {}",
                    expected_number,
                    layer.number
                );
            }
        }

        self.layers.push(layer);
        self.metadata.touch();
        Ok(())
    }

    /// Gets a reference to the layer at the given index.
    #[must_use]
    pub fn get_layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    /// Gets a mutable reference to the layer at the given index.
    pub fn get_layer_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.metadata.touch();
        self.layers.get_mut(index)
    }

    /// Adds an override rule, rejecting duplicate triggers.
    pub fn add_override(&mut self, rule: KeyOverride) -> Result<()> {
        if self.overrides.iter().any(|o| o.trigger == rule.trigger) {
            anyhow::bail!("Override with trigger '{}' already exists", rule.trigger);
        }

        self.overrides.push(rule);
        self.metadata.touch();
        Ok(())
    }

    /// Gets an override rule by trigger keycode.
    #[must_use]
    pub fn get_override(&self, trigger: &str) -> Option<&KeyOverride> {
        self.overrides.iter().find(|o| o.trigger == trigger)
    }

    /// Gets the key definition at a position on a layer.
    #[must_use]
    pub fn key_at(&self, layer_idx: usize, position: crate::models::Position) -> Option<&KeyDefinition> {
        self.get_layer(layer_idx).and_then(|l| l.get_key(position))
    }

    /// Validates the keymap structure.
    ///
    /// Checks:
    /// - At least one layer exists
    /// - Layer numbers are sequential
    /// - All layers have the same number of keys
    /// - No duplicate positions within each layer
    /// - No duplicate override triggers
    pub fn validate(&self) -> Result<()> {
        if self.layers.is_empty() {
            anyhow::bail!("Keymap must have at least one layer");
        }

        // Check layer numbers are sequential
        for (idx, layer) in self.layers.iter().enumerate() {
            if usize::from(layer.number) != idx {
                anyhow::bail!(
                    "Layer numbers must be sequential. Layer at index {} has number {}",
                    idx,
                    layer.number
                );
            }
        }

        // Check all layers have same number of keys
        if let Some(first_layer) = self.layers.first() {
            let expected_key_count = first_layer.keys.len();
            for layer in &self.layers {
                if layer.keys.len() != expected_key_count {
                    anyhow::bail!(
                        "All layers must have the same number of keys. Layer {} has {}, expected {}",
                        layer.number,
                        layer.keys.len(),
                        expected_key_count
                    );
                }
            }
        }

        // Check for duplicate positions within each layer
        for layer in &self.layers {
            let mut positions = std::collections::HashSet::new();
            for key in &layer.keys {
                if !positions.insert(key.position) {
                    anyhow::bail!(
                        "Duplicate position ({}, {}) in layer {}",
                        key.position.row,
                        key.position.col,
                        layer.number
                    );
                }
            }
        }

        // Check for duplicate override triggers
        let mut triggers = std::collections::HashSet::new();
        for rule in &self.overrides {
            if !triggers.insert(rule.trigger.as_str()) {
                anyhow::bail!("Duplicate override trigger '{}'", rule.trigger);
            }
        }

        Ok(())
    }
}
