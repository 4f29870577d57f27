//! Modifier mask type mirroring QMK's 8-bit modifier byte.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Set of held modifiers as QMK encodes them: one bit per physical
/// modifier key, left hand in the low nibble, right hand in the high.
///
/// Matches the layout of QMK's `MOD_BIT(kc)` values, so a mask can be
/// rendered directly into `key_override_t` initializers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Modifiers(pub u8);

#[allow(dead_code)]
impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self(0);
    /// Left Control.
    pub const LCTL: Self = Self(0x01);
    /// Left Shift.
    pub const LSFT: Self = Self(0x02);
    /// Left Alt.
    pub const LALT: Self = Self(0x04);
    /// Left GUI (Super/Cmd).
    pub const LGUI: Self = Self(0x08);
    /// Right Control.
    pub const RCTL: Self = Self(0x10);
    /// Right Shift.
    pub const RSFT: Self = Self(0x20);
    /// Right Alt (AltGr).
    pub const RALT: Self = Self(0x40);
    /// Right GUI.
    pub const RGUI: Self = Self(0x80);
    /// Ctrl+Shift+Alt, QMK's `MOD_MEH`.
    pub const MEH: Self = Self(0x01 | 0x02 | 0x04);
    /// Ctrl+Shift+Alt+GUI, QMK's `MOD_HYPR`.
    pub const HYPR: Self = Self(0x01 | 0x02 | 0x04 | 0x08);

    /// Combines two masks.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns true if no modifier bits are set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if every bit of `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if the mask involves either shift key.
    #[must_use]
    pub const fn has_shift(self) -> bool {
        self.0 & (Self::LSFT.0 | Self::RSFT.0) != 0
    }

    /// Parses a single QMK `MOD_*` name (e.g., "MOD_LSFT", "MOD_MEH").
    fn parse_single(name: &str) -> Result<Self> {
        let mask = match name {
            "MOD_LCTL" => Self::LCTL,
            "MOD_LSFT" => Self::LSFT,
            "MOD_LALT" => Self::LALT,
            "MOD_LGUI" => Self::LGUI,
            "MOD_RCTL" => Self::RCTL,
            "MOD_RSFT" => Self::RSFT,
            "MOD_RALT" => Self::RALT,
            "MOD_RGUI" => Self::RGUI,
            "MOD_MEH" => Self::MEH,
            "MOD_HYPR" => Self::HYPR,
            _ => anyhow::bail!("Unknown modifier name: {name}"),
        };
        Ok(mask)
    }

    /// Parses a QMK modifier expression: one or more `MOD_*` names
    /// joined by `|` (e.g., "MOD_LCTL | MOD_LSFT").
    pub fn parse(expr: &str) -> Result<Self> {
        let mut mask = Self::NONE;
        for part in expr.split('|') {
            let part = part.trim();
            if part.is_empty() {
                anyhow::bail!("Empty modifier in expression: {expr}");
            }
            mask = mask.union(Self::parse_single(part)?);
        }
        Ok(mask)
    }

    /// Short hand-prefixed name for a single-bit mask (e.g., "RSFT"),
    /// used in the override rule syntax.
    #[must_use]
    pub fn short_name(self) -> Option<&'static str> {
        match self {
            Self::LCTL => Some("LCTL"),
            Self::LSFT => Some("LSFT"),
            Self::LALT => Some("LALT"),
            Self::LGUI => Some("LGUI"),
            Self::RCTL => Some("RCTL"),
            Self::RSFT => Some("RSFT"),
            Self::RALT => Some("RALT"),
            Self::RGUI => Some("RGUI"),
            _ => None,
        }
    }

    /// Parses the short hand-prefixed form used in override rules.
    /// Accepts the full `MOD_*` spelling as well.
    pub fn parse_short(name: &str) -> Result<Self> {
        if name.starts_with("MOD_") {
            Self::parse_single(name)
        } else {
            Self::parse_single(&format!("MOD_{name}"))
        }
    }

    /// Keycode names for each set bit, in QMK bit order.
    #[must_use]
    pub fn keycode_names(self) -> Vec<&'static str> {
        const BITS: [(u8, &str); 8] = [
            (0x01, "KC_LCTL"),
            (0x02, "KC_LSFT"),
            (0x04, "KC_LALT"),
            (0x08, "KC_LGUI"),
            (0x10, "KC_RCTL"),
            (0x20, "KC_RSFT"),
            (0x40, "KC_RALT"),
            (0x80, "KC_RGUI"),
        ];
        BITS.iter()
            .filter(|(bit, _)| self.0 & bit != 0)
            .map(|(_, name)| *name)
            .collect()
    }

    /// Renders the mask as a C expression of `MOD_BIT(...)` terms for
    /// `key_override_t` initializers. Empty masks render as "0".
    #[must_use]
    pub fn to_mod_bit_expr(&self) -> String {
        let names = self.keycode_names();
        if names.is_empty() {
            return "0".to_string();
        }
        names
            .iter()
            .map(|name| format!("MOD_BIT({name})"))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl std::fmt::Display for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if *self == Self::MEH {
            return write!(f, "MOD_MEH");
        }
        if *self == Self::HYPR {
            return write!(f, "MOD_HYPR");
        }
        let names = self.keycode_names();
        if names.is_empty() {
            return write!(f, "0");
        }
        let parts: Vec<String> = names
            .iter()
            .map(|name| format!("MOD_{}", name.trim_start_matches("KC_")))
            .collect();
        write!(f, "{}", parts.join(" | "))
    }
}
