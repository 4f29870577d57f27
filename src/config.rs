//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application
//! configuration in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Directory name for application data under the platform config dir.
const APP_CONFIG_DIR: &str = "DasBobKeymap";

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// QMK firmware directory path (e.g., "/path/to/qmk_firmware")
    pub qmk_firmware: Option<PathBuf>,
}

/// Firmware build configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Output directory for generated firmware sources
    pub output_dir: PathBuf,
    /// Keymap directory name inside the QMK tree (keyboards/dasbob/keymaps/<name>)
    pub keymap_name: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        let output_dir = Config::config_dir()
            .map(|dir| dir.join("builds"))
            .unwrap_or_else(|_| PathBuf::from(".build"));

        Self {
            output_dir,
            keymap_name: "dasbob-keymap".to_string(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// File system locations
    #[serde(default)]
    pub paths: PathConfig,
    /// Firmware build settings
    #[serde(default)]
    pub build: BuildConfig,
}

impl Config {
    /// Gets the platform-specific configuration directory.
    ///
    /// - Linux: `~/.config/DasBobKeymap/`
    /// - macOS: `~/Library/Application Support/DasBobKeymap/`
    /// - Windows: `%APPDATA%\DasBobKeymap\`
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_CONFIG_DIR))
            .context("Could not determine platform configuration directory")
    }

    /// Gets the configuration file path.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns true if a configuration file exists.
    #[must_use]
    pub fn exists() -> bool {
        Self::config_file().map(|p| p.exists()).unwrap_or(false)
    }

    /// Loads the configuration from disk.
    ///
    /// Returns defaults if no configuration file exists.
    pub fn load() -> Result<Self> {
        let path = Self::config_file()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Saves the configuration to disk, creating the directory if needed.
    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let path = Self::config_file()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        // Atomic write: temp file + rename
        let temp_path = path.with_extension("toml.tmp");
        fs::write(&temp_path, content)
            .with_context(|| format!("Failed to write config file: {}", temp_path.display()))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to rename config file to: {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.paths.qmk_firmware.is_none());
        assert_eq!(config.build.keymap_name, "dasbob-keymap");
    }

    #[test]
    fn test_config_round_trip_toml() {
        let mut config = Config::default();
        config.paths.qmk_firmware = Some(PathBuf::from("/tmp/qmk_firmware"));
        config.build.output_dir = PathBuf::from("/tmp/out");

        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_config_parses_partial_file() {
        // Missing sections fall back to defaults
        let parsed: Config = toml::from_str("[paths]\n").unwrap();
        assert!(parsed.paths.qmk_firmware.is_none());
        assert_eq!(parsed.build.keymap_name, "dasbob-keymap");
    }
}
