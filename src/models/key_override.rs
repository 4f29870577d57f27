//! Key override rules (modifier-conditional key replacement).

use crate::models::Modifiers;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Layer bitmask matching every layer, QMK's `~0` default.
pub const ALL_LAYERS: u16 = u16::MAX;

/// A single override rule: when the trigger key is pressed while the
/// trigger modifiers are held, the framework sends the replacement key
/// instead and suppresses the listed modifiers.
///
/// Mirrors QMK's `key_override_t`. The optional runtime hooks of that
/// struct (enable predicate, custom action, context) are not modeled;
/// they are emitted as defaults in generated code.
///
/// # Validation
///
/// - Trigger and replacement must be plain keycodes known to the database
/// - Trigger modifiers must be non-empty
/// - Trigger keycodes must be unique across the table (the framework
///   defines no precedence between duplicate triggers)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyOverride {
    /// Keycode that activates the rule (e.g., "`KC_1`")
    pub trigger: String,
    /// Modifiers that must be held for the rule to match
    pub trigger_mods: Modifiers,
    /// Bitmask of layers the rule is active on
    #[serde(default = "default_layers")]
    pub layers: u16,
    /// Modifiers that must NOT be held for the rule to match
    #[serde(default, skip_serializing_if = "Modifiers::is_empty")]
    pub negative_mod_mask: Modifiers,
    /// Modifiers removed from the report while the rule is active
    pub suppressed_mods: Modifiers,
    /// Keycode sent instead of the trigger (e.g., "`KC_F1`")
    pub replacement: String,
}

const fn default_layers() -> u16 {
    ALL_LAYERS
}

#[allow(dead_code)]
impl KeyOverride {
    /// Creates a basic override: active on all layers, no negative mask,
    /// and the trigger modifiers suppressed on match. This matches QMK's
    /// `ko_make_basic` semantics.
    pub fn basic(
        trigger_mods: Modifiers,
        trigger: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Result<Self> {
        let trigger = trigger.into();
        let replacement = replacement.into();

        if trigger_mods.is_empty() {
            anyhow::bail!("Override for '{trigger}' must require at least one modifier");
        }
        if trigger.is_empty() || replacement.is_empty() {
            anyhow::bail!("Override trigger and replacement cannot be empty");
        }

        Ok(Self {
            trigger,
            trigger_mods,
            layers: ALL_LAYERS,
            negative_mod_mask: Modifiers::NONE,
            suppressed_mods: trigger_mods,
            replacement,
        })
    }

    /// Restricts the rule to a layer bitmask.
    #[must_use]
    pub const fn with_layers(mut self, layers: u16) -> Self {
        self.layers = layers;
        self
    }

    /// Sets modifiers that must not be held.
    #[must_use]
    pub const fn with_negative_mods(mut self, mods: Modifiers) -> Self {
        self.negative_mod_mask = mods;
        self
    }

    /// C identifier for the generated `key_override_t` constant.
    #[must_use]
    pub fn c_identifier(&self) -> String {
        format!("ko_{}", self.trigger)
    }
}

impl std::fmt::Display for KeyOverride {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mods = self
            .trigger_mods
            .short_name()
            .map_or_else(|| self.trigger_mods.to_string(), String::from);
        write!(f, "{} + {}: {}", mods, self.trigger, self.replacement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_override_defaults() {
        let ko = KeyOverride::basic(Modifiers::RSFT, "KC_1", "KC_F1").unwrap();
        assert_eq!(ko.trigger, "KC_1");
        assert_eq!(ko.replacement, "KC_F1");
        assert_eq!(ko.trigger_mods, Modifiers::RSFT);
        assert_eq!(ko.suppressed_mods, Modifiers::RSFT);
        assert_eq!(ko.layers, ALL_LAYERS);
        assert!(ko.negative_mod_mask.is_empty());
    }

    #[test]
    fn test_basic_override_requires_modifier() {
        assert!(KeyOverride::basic(Modifiers::NONE, "KC_1", "KC_F1").is_err());
    }

    #[test]
    fn test_basic_override_rejects_empty_keycodes() {
        assert!(KeyOverride::basic(Modifiers::RSFT, "", "KC_F1").is_err());
        assert!(KeyOverride::basic(Modifiers::RSFT, "KC_1", "").is_err());
    }

    #[test]
    fn test_builder_methods() {
        let ko = KeyOverride::basic(Modifiers::RSFT, "KC_1", "KC_F1")
            .unwrap()
            .with_layers(0b0000_0001)
            .with_negative_mods(Modifiers::LCTL);

        assert_eq!(ko.layers, 1);
        assert_eq!(ko.negative_mod_mask, Modifiers::LCTL);
    }

    #[test]
    fn test_c_identifier() {
        let ko = KeyOverride::basic(Modifiers::RSFT, "KC_SLSH", "KC_BSLS").unwrap();
        assert_eq!(ko.c_identifier(), "ko_KC_SLSH");
    }

    #[test]
    fn test_display() {
        let ko = KeyOverride::basic(Modifiers::RSFT, "KC_COMM", "KC_DOT").unwrap();
        assert_eq!(ko.to_string(), "RSFT + KC_COMM: KC_DOT");
    }
}
