//! QMK firmware source generation.
//!
//! This module generates the C sources QMK compiles for the keymap:
//! `keymap.c` (layer enum, keymap array, key override table) and
//! `rules.mk` (feature flags the keymap needs).

use crate::constants::{APP_BINARY_NAME, LAYOUT_MACRO};
use crate::models::{Keymap, SplitGeometry, ALL_LAYERS};
use crate::services::key_actions::{classify, KeyAction};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Firmware source generator.
pub struct FirmwareGenerator<'a> {
    keymap: &'a Keymap,
    geometry: SplitGeometry,
}

impl<'a> FirmwareGenerator<'a> {
    /// Creates a new firmware generator.
    #[must_use]
    pub const fn new(keymap: &'a Keymap, geometry: SplitGeometry) -> Self {
        Self { keymap, geometry }
    }

    /// Generates keymap.c and rules.mk into the output directory.
    ///
    /// Writes are atomic (temp file + rename). Returns the paths of the
    /// generated files.
    pub fn generate(&self, out_dir: &Path) -> Result<(PathBuf, PathBuf)> {
        let keymap_c = self.generate_keymap_c()?;
        let rules_mk = self.generate_rules_mk();

        let keymap_path = out_dir.join("keymap.c");
        let rules_path = out_dir.join("rules.mk");

        atomic_write(&keymap_path, &keymap_c)?;
        atomic_write(&rules_path, &rules_mk)?;

        Ok((keymap_path, rules_path))
    }

    /// Generates the keymap.c source.
    pub fn generate_keymap_c(&self) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.generate_header());
        output.push_str("#include QMK_KEYBOARD_H\n\n");
        output.push_str(&self.generate_layer_enum());
        output.push_str(&self.generate_keymaps_array()?);

        if !self.keymap.overrides.is_empty() {
            output.push('\n');
            output.push_str(&self.generate_overrides());
        }

        Ok(output)
    }

    /// Generates the rules.mk source.
    #[must_use]
    pub fn generate_rules_mk(&self) -> String {
        let mut output = format!(
            "# Generated by {} v{} - do not edit by hand\n# Keymap: {}\n# Generated: {}\n\n",
            APP_BINARY_NAME,
            env!("CARGO_PKG_VERSION"),
            self.keymap.metadata.name,
            chrono::Utc::now().to_rfc3339()
        );

        if !self.keymap.overrides.is_empty() {
            output.push_str("KEY_OVERRIDE_ENABLE = yes\n");
        }

        if self.uses_mouse_keys() {
            output.push_str("MOUSEKEY_ENABLE = yes\n");
        }

        output
    }

    /// Generated-file banner for C output.
    fn generate_header(&self) -> String {
        format!(
            "// Generated by {} v{} - do not edit by hand\n// Keymap: {}\n// Generated: {}\n\n",
            APP_BINARY_NAME,
            env!("CARGO_PKG_VERSION"),
            self.keymap.metadata.name,
            chrono::Utc::now().to_rfc3339()
        )
    }

    /// Generates the layer enumeration.
    fn generate_layer_enum(&self) -> String {
        let mut output = format!("enum {}_layers {{\n", self.keymap.metadata.keyboard);
        for layer in &self.keymap.layers {
            output.push_str(&format!("  {},\n", layer.c_identifier()));
        }
        output.push_str("};\n\n");
        output
    }

    /// Generates the PROGMEM keymaps array.
    fn generate_keymaps_array(&self) -> Result<String> {
        let mut output =
            String::from("const uint16_t PROGMEM keymaps[][MATRIX_ROWS][MATRIX_COLS] = {\n");

        for (idx, layer) in self.keymap.layers.iter().enumerate() {
            output.push_str(&format!("    // Layer {}: {}\n", layer.number, layer.name));
            output.push_str(&format!(
                "    [{}] = {}(\n",
                layer.c_identifier(),
                LAYOUT_MACRO
            ));
            output.push_str(&self.generate_layout_block(layer)?);
            output.push_str("    )");
            if idx + 1 < self.keymap.layers.len() {
                output.push(',');
            }
            output.push_str("\n\n");
        }

        output.push_str("};\n");
        Ok(output)
    }

    /// Generates the argument block of one layout macro invocation.
    ///
    /// Keys are emitted in macro argument order: main rows left-to-right
    /// across both halves, then the thumb row.
    fn generate_layout_block(&self, layer: &crate::models::Layer) -> Result<String> {
        let positions = self.geometry.positions();
        let total = positions.len();
        let cols = usize::from(self.geometry.cols_per_half) * 2;

        let mut rendered = Vec::with_capacity(total);
        for pos in &positions {
            let key = layer.get_key(*pos).ok_or_else(|| {
                anyhow::anyhow!(
                    "Layer {} has no key at ({}, {}); validate before generating",
                    layer.number,
                    pos.row,
                    pos.col
                )
            })?;
            rendered.push(self.render_keycode(&key.keycode)?);
        }

        let mut output = String::new();

        // Main grid rows, with a visual gap between the halves
        let half = cols / 2;
        for row in rendered[..total - usize::from(self.geometry.thumb_keys)].chunks(cols) {
            output.push_str("        ");
            let left = row[..half].join(", ");
            let right = row[half..].join(", ");
            output.push_str(&left);
            output.push_str(",    ");
            output.push_str(&right);
            output.push_str(",\n");
        }

        // Thumb cluster on its own line
        output.push('\n');
        output.push_str("        ");
        output.push_str(&rendered[total - usize::from(self.geometry.thumb_keys)..].join(", "));
        output.push('\n');

        Ok(output)
    }

    /// Renders a keycode for C output, replacing numeric layer indices
    /// with the generated enum identifiers.
    fn render_keycode(&self, keycode: &str) -> Result<String> {
        let layer_name = |idx: usize| -> Result<String> {
            self.keymap
                .get_layer(idx)
                .map(crate::models::Layer::c_identifier)
                .ok_or_else(|| anyhow::anyhow!("'{keycode}' references missing layer {idx}"))
        };

        let rendered = match classify(keycode)
            .with_context(|| format!("Cannot render keycode '{keycode}'"))?
        {
            KeyAction::Momentary(n) => format!("MO({})", layer_name(n)?),
            KeyAction::Toggle(n) => format!("TG({})", layer_name(n)?),
            KeyAction::SwitchTo(n) => format!("TO({})", layer_name(n)?),
            KeyAction::TapToggle(n) => format!("TT({})", layer_name(n)?),
            KeyAction::OneShotLayer(n) => format!("OSL({})", layer_name(n)?),
            KeyAction::LayerTap(n, tap) => format!("LT({}, {})", layer_name(n)?, tap),
            // All other forms pass through as written
            _ => keycode.to_string(),
        };

        Ok(rendered)
    }

    /// Generates the key override definitions and registration array.
    fn generate_overrides(&self) -> String {
        let mut output = String::new();

        for rule in &self.keymap.overrides {
            let layers = if rule.layers == ALL_LAYERS {
                "~0".to_string()
            } else {
                format!("0x{:04X}", rule.layers)
            };

            output.push_str(&format!(
                "const key_override_t {} = {{\n\
                 \x20   .trigger = {},\n\
                 \x20   .trigger_mods = {},\n\
                 \x20   .layers = {},\n\
                 \x20   .negative_mod_mask = {},\n\
                 \x20   .suppressed_mods = {},\n\
                 \x20   .replacement = {},\n\
                 \x20   .options = ko_options_default,\n\
                 \x20   .custom_action = NULL,\n\
                 \x20   .context = NULL,\n\
                 \x20   .enabled = NULL\n\
                 }};\n\n",
                rule.c_identifier(),
                rule.trigger,
                rule.trigger_mods.to_mod_bit_expr(),
                layers,
                rule.negative_mod_mask.to_mod_bit_expr(),
                rule.suppressed_mods.to_mod_bit_expr(),
                rule.replacement,
            ));
        }

        // Register all overrides with the framework
        output.push_str("const key_override_t *key_overrides[] = {\n");
        for rule in &self.keymap.overrides {
            output.push_str(&format!("    &{},\n", rule.c_identifier()));
        }
        output.push_str("};\n");

        output
    }

    /// Whether any layer uses mouse emulation keycodes.
    fn uses_mouse_keys(&self) -> bool {
        self.keymap.layers.iter().any(|layer| {
            layer
                .keys
                .iter()
                .any(|key| key.keycode.starts_with("QK_MOUSE_") || key.keycode.starts_with("KC_MS_"))
        })
    }
}

/// Performs an atomic file write using temp file + rename pattern.
fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let temp_path = path.with_extension("tmp");

    std::fs::write(&temp_path, content)
        .with_context(|| format!("Failed to write to temporary file: {}", temp_path.display()))?;

    std::fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temporary file to: {}", path.display()))?;

    Ok(())
}
