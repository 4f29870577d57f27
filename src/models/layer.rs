//! Layer and key definition data structures.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Position in visual grid coordinates (user's view).
///
/// This represents the visual position of a key as it appears in the
/// Markdown tables: rows 0-2 are the main grid, row 3 is the thumb
/// cluster. Layers are positional overlays, so (row, col) names the same
/// physical key on every layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Visual row (0-based; 0-2 main grid, 3 thumb row)
    pub row: u8,
    /// Visual column (0-based, 0-9; left half 0-4, right half 5-9)
    pub col: u8,
}

impl Position {
    /// Creates a new Position with the given row and column.
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

/// Individual key assignment with position and keycode.
///
/// # Validation
///
/// - Position must be within the keyboard geometry
/// - Keycode must exist in `KeycodeDb` (directly or via pattern)
/// - Position must be unique within the parent Layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDefinition {
    /// Visual position (row, col) in the grid
    pub position: Position,
    /// QMK keycode (e.g., "`KC_A`", "`KC_TRNS`", "LT(2, KC_ESC)")
    pub keycode: String,
    /// Optional user description for this key (e.g., "Primary thumb key")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[allow(dead_code)]
impl KeyDefinition {
    /// Creates a new `KeyDefinition` with the given position and keycode.
    pub fn new(position: Position, keycode: impl Into<String>) -> Self {
        Self {
            position,
            keycode: keycode.into(),
            description: None,
        }
    }

    /// Sets the description for this key.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Checks if this key is transparent (passes through to lower layer).
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.keycode == "KC_TRNS" || self.keycode == "KC_TRANSPARENT"
    }

    /// Checks if this key is a no-op (no key at this position).
    #[must_use]
    pub fn is_no_op(&self) -> bool {
        self.keycode == "KC_NO"
    }
}

/// A single layer of the keymap.
///
/// # Validation
///
/// - Name must be non-empty, max 50 characters
/// - Number must be sequential within the parent Keymap
/// - Key positions must cover the keyboard geometry exactly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    /// Layer number (0-based, max 255)
    pub number: u8,
    /// Human-readable name (e.g., "Alpha", "Numer")
    pub name: String,
    /// Key assignments for all positions (fixed size per geometry)
    pub keys: Vec<KeyDefinition>,
}

#[allow(dead_code)]
impl Layer {
    /// Creates a new Layer with the given number and name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or exceeds 50 characters.
    pub fn new(number: u8, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        Self::validate_name(&name)?;

        Ok(Self {
            number,
            name,
            keys: Vec::new(),
        })
    }

    /// Validates layer name.
    fn validate_name(name: &str) -> Result<()> {
        if name.is_empty() {
            anyhow::bail!("Layer name cannot be empty");
        }

        if name.len() > 50 {
            anyhow::bail!(
                "Layer name '{}' exceeds maximum length of 50 characters (got {})",
                name,
                name.len()
            );
        }

        Ok(())
    }

    /// Adds a key definition to this layer.
    pub fn add_key(&mut self, key: KeyDefinition) {
        self.keys.push(key);
    }

    /// Gets a reference to the key at the given position.
    #[must_use]
    pub fn get_key(&self, position: Position) -> Option<&KeyDefinition> {
        self.keys.iter().find(|k| k.position == position)
    }

    /// Gets a mutable reference to the key at the given position.
    pub fn get_key_mut(&mut self, position: Position) -> Option<&mut KeyDefinition> {
        self.keys.iter_mut().find(|k| k.position == position)
    }

    /// Updates the layer name with validation.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        Self::validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    /// C identifier for this layer in generated code (e.g., "`_LEFT_NAV`").
    #[must_use]
    pub fn c_identifier(&self) -> String {
        let upper: String = self
            .name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("_{upper}")
    }
}
