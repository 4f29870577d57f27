//! Key action classification.
//!
//! Keycodes are stored as strings in the keymap tables; this module
//! classifies them into the typed action forms the firmware distinguishes:
//! plain keys, transparency, layer switches, tap-hold duals, one-shots,
//! and modifier-wrapped keys.

use crate::models::Modifiers;
use crate::services::layer_refs::{parse_layer_keycode, LayerRefKind};
use anyhow::Result;

/// A single key action as the firmware interprets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Plain keycode (e.g., `KC_A`)
    Plain(String),
    /// Defer to the next active layer below (`KC_TRNS`)
    Transparent,
    /// Key does nothing (`KC_NO`)
    NoOp,
    /// Activate a layer while held - MO(n)
    Momentary(usize),
    /// Toggle a layer on/off - TG(n)
    Toggle(usize),
    /// Deactivate other layers and switch - TO(n)
    SwitchTo(usize),
    /// Momentary on hold, toggle on repeated tap - TT(n)
    TapToggle(usize),
    /// Tap for keycode, hold to activate layer - LT(n, kc)
    LayerTap(usize, String),
    /// Tap for keycode, hold for modifier - MT(mod, kc)
    ModTap(Modifiers, String),
    /// Apply a modifier to the next keypress only - OSM(mod)
    OneShotMod(Modifiers),
    /// Activate a layer for the next keypress only - OSL(n)
    OneShotLayer(usize),
    /// Keycode sent with modifiers held - LCTL(kc), MEH(kc), ...
    Modified(Modifiers, String),
}

#[allow(dead_code)]
impl KeyAction {
    /// The layer index this action references, if any.
    #[must_use]
    pub const fn layer(&self) -> Option<usize> {
        match self {
            Self::Momentary(n)
            | Self::Toggle(n)
            | Self::SwitchTo(n)
            | Self::TapToggle(n)
            | Self::LayerTap(n, _)
            | Self::OneShotLayer(n) => Some(*n),
            _ => None,
        }
    }

    /// The plain keycode embedded in this action, if any.
    ///
    /// For compound actions this is the tap/wrapped keycode; for plain
    /// actions it is the keycode itself.
    #[must_use]
    pub fn inner_keycode(&self) -> Option<&str> {
        match self {
            Self::Plain(kc) | Self::LayerTap(_, kc) | Self::ModTap(_, kc) | Self::Modified(_, kc) => {
                Some(kc)
            }
            _ => None,
        }
    }

    /// The modifier mask carried by this action, if any.
    #[must_use]
    pub const fn modifiers(&self) -> Option<Modifiers> {
        match self {
            Self::ModTap(mods, _) | Self::OneShotMod(mods) | Self::Modified(mods, _) => Some(*mods),
            _ => None,
        }
    }

    /// Human-readable kind name for reports and JSON output.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Plain(_) => "plain",
            Self::Transparent => "transparent",
            Self::NoOp => "no-op",
            Self::Momentary(_) => "momentary-layer",
            Self::Toggle(_) => "layer-toggle",
            Self::SwitchTo(_) => "layer-switch",
            Self::TapToggle(_) => "tap-toggle",
            Self::LayerTap(_, _) => "layer-tap",
            Self::ModTap(_, _) => "mod-tap",
            Self::OneShotMod(_) => "one-shot-modifier",
            Self::OneShotLayer(_) => "one-shot-layer",
            Self::Modified(_, _) => "modified-key",
        }
    }
}

/// Modifier-wrapper prefixes QMK defines for sending a key with mods held.
const MOD_WRAPPERS: [(&str, Modifiers); 10] = [
    ("LCTL", Modifiers::LCTL),
    ("LSFT", Modifiers::LSFT),
    ("LALT", Modifiers::LALT),
    ("LGUI", Modifiers::LGUI),
    ("RCTL", Modifiers::RCTL),
    ("RSFT", Modifiers::RSFT),
    ("RALT", Modifiers::RALT),
    ("RGUI", Modifiers::RGUI),
    ("MEH", Modifiers::MEH),
    ("HYPR", Modifiers::HYPR),
];

/// Classifies a keycode string into its typed action form.
///
/// Bare identifiers classify as `Plain` without database validation;
/// validity is the `KeycodeDb`'s concern. Malformed parameterized forms
/// (e.g., "MT(MOD_LSFT)" with no tap key) are errors.
///
/// # Examples
/// ```
/// use dasbob_keymap::services::key_actions::{classify, KeyAction};
///
/// assert_eq!(classify("KC_TRNS").unwrap(), KeyAction::Transparent);
/// assert_eq!(classify("MO(2)").unwrap(), KeyAction::Momentary(2));
/// assert!(matches!(classify("LT(3, KC_F12)").unwrap(), KeyAction::LayerTap(3, _)));
/// ```
pub fn classify(keycode: &str) -> Result<KeyAction> {
    let keycode = keycode.trim();

    if keycode == "KC_TRNS" || keycode == "KC_TRANSPARENT" {
        return Ok(KeyAction::Transparent);
    }
    if keycode == "KC_NO" || keycode == "XXXXXXX" {
        return Ok(KeyAction::NoOp);
    }

    // Layer-switching forms share a parser with the reference index
    if let Some((layer, kind)) = parse_layer_keycode(keycode) {
        let action = match kind {
            LayerRefKind::Momentary => KeyAction::Momentary(layer),
            LayerRefKind::Toggle => KeyAction::Toggle(layer),
            LayerRefKind::SwitchTo => KeyAction::SwitchTo(layer),
            LayerRefKind::TapToggle => KeyAction::TapToggle(layer),
            LayerRefKind::OneShot => KeyAction::OneShotLayer(layer),
            LayerRefKind::TapHold => {
                let tap = extract_second_arg(keycode)?;
                KeyAction::LayerTap(layer, tap)
            }
        };
        return Ok(action);
    }

    // Mod-tap: MT(mod, kc)
    if let Some(inner) = keycode.strip_prefix("MT(") {
        let inner = strip_close_paren(inner, keycode)?;
        let (mod_part, tap_part) = inner
            .split_once(',')
            .ok_or_else(|| anyhow::anyhow!("MT requires a modifier and a tap keycode: {keycode}"))?;
        let mods = Modifiers::parse(mod_part.trim())?;
        return Ok(KeyAction::ModTap(mods, tap_part.trim().to_string()));
    }

    // One-shot modifier: OSM(mod)
    if let Some(inner) = keycode.strip_prefix("OSM(") {
        let inner = strip_close_paren(inner, keycode)?;
        let mods = Modifiers::parse(inner.trim())?;
        return Ok(KeyAction::OneShotMod(mods));
    }

    // Modifier wrappers: LCTL(kc), MEH(kc), ...
    for (prefix, mods) in MOD_WRAPPERS {
        if let Some(inner) = keycode.strip_prefix(prefix) {
            if let Some(inner) = inner.strip_prefix('(') {
                let inner = strip_close_paren(inner, keycode)?;
                if inner.contains(',') {
                    anyhow::bail!("Modifier wrapper takes a single keycode: {keycode}");
                }
                return Ok(KeyAction::Modified(mods, inner.trim().to_string()));
            }
        }
    }

    // Anything parenthesized that didn't match above is malformed
    if keycode.contains('(') {
        anyhow::bail!("Unrecognized parameterized keycode: {keycode}");
    }

    Ok(KeyAction::Plain(keycode.to_string()))
}

/// Extracts the second argument of a two-argument form like LT(n, kc).
fn extract_second_arg(keycode: &str) -> Result<String> {
    let open = keycode
        .find('(')
        .ok_or_else(|| anyhow::anyhow!("Malformed keycode: {keycode}"))?;
    let inner = keycode[open + 1..]
        .strip_suffix(')')
        .ok_or_else(|| anyhow::anyhow!("Missing closing parenthesis: {keycode}"))?;
    let (_, second) = inner
        .split_once(',')
        .ok_or_else(|| anyhow::anyhow!("Expected two arguments: {keycode}"))?;
    Ok(second.trim().to_string())
}

/// Strips the trailing ')' from a parameter list.
fn strip_close_paren<'a>(inner: &'a str, keycode: &str) -> Result<&'a str> {
    inner
        .strip_suffix(')')
        .ok_or_else(|| anyhow::anyhow!("Missing closing parenthesis: {keycode}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_plain_and_special() {
        assert_eq!(
            classify("KC_A").unwrap(),
            KeyAction::Plain("KC_A".to_string())
        );
        assert_eq!(classify("KC_TRNS").unwrap(), KeyAction::Transparent);
        assert_eq!(classify("KC_TRANSPARENT").unwrap(), KeyAction::Transparent);
        assert_eq!(classify("KC_NO").unwrap(), KeyAction::NoOp);
    }

    #[test]
    fn test_classify_layer_actions() {
        assert_eq!(classify("MO(2)").unwrap(), KeyAction::Momentary(2));
        assert_eq!(classify("TG(1)").unwrap(), KeyAction::Toggle(1));
        assert_eq!(classify("OSL(4)").unwrap(), KeyAction::OneShotLayer(4));
        assert_eq!(classify("TO(0)").unwrap(), KeyAction::SwitchTo(0));
        assert_eq!(classify("TT(3)").unwrap(), KeyAction::TapToggle(3));
        assert_eq!(
            classify("LT(2, KC_ESC)").unwrap(),
            KeyAction::LayerTap(2, "KC_ESC".to_string())
        );
    }

    #[test]
    fn test_classify_mod_tap() {
        assert_eq!(
            classify("MT(MOD_LSFT, KC_APP)").unwrap(),
            KeyAction::ModTap(Modifiers::LSFT, "KC_APP".to_string())
        );
        assert!(classify("MT(MOD_LSFT)").is_err());
        assert!(classify("MT(MOD_BOGUS, KC_A)").is_err());
    }

    #[test]
    fn test_classify_one_shot_mod() {
        assert_eq!(
            classify("OSM(MOD_RSFT)").unwrap(),
            KeyAction::OneShotMod(Modifiers::RSFT)
        );
        assert_eq!(
            classify("OSM(MOD_LCTL | MOD_LSFT)").unwrap(),
            KeyAction::OneShotMod(Modifiers::LCTL.union(Modifiers::LSFT))
        );
    }

    #[test]
    fn test_classify_modified_keys() {
        assert_eq!(
            classify("LCTL(KC_V)").unwrap(),
            KeyAction::Modified(Modifiers::LCTL, "KC_V".to_string())
        );
        assert_eq!(
            classify("RSFT(KC_TAB)").unwrap(),
            KeyAction::Modified(Modifiers::RSFT, "KC_TAB".to_string())
        );
        assert_eq!(
            classify("MEH(KC_LGUI)").unwrap(),
            KeyAction::Modified(Modifiers::MEH, "KC_LGUI".to_string())
        );
        assert!(classify("LCTL(KC_A, KC_B)").is_err());
    }

    #[test]
    fn test_classify_malformed() {
        assert!(classify("FOO(1)").is_err());
        assert!(classify("MO(").is_err());
        assert!(classify("LT(1)").is_err());
    }

    #[test]
    fn test_action_accessors() {
        let action = classify("LT(3, KC_F12)").unwrap();
        assert_eq!(action.layer(), Some(3));
        assert_eq!(action.inner_keycode(), Some("KC_F12"));
        assert_eq!(action.modifiers(), None);
        assert_eq!(action.kind_name(), "layer-tap");

        let action = classify("OSM(MOD_RSFT)").unwrap();
        assert_eq!(action.layer(), None);
        assert_eq!(action.inner_keycode(), None);
        assert_eq!(action.modifiers(), Some(Modifiers::RSFT));

        let action = classify("KC_Q").unwrap();
        assert_eq!(action.inner_keycode(), Some("KC_Q"));
    }
}
