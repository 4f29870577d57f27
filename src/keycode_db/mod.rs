//! QMK keycode database and validation.
//!
//! This module provides access to the embedded keycode database,
//! validation functions, and search capabilities used by the validator
//! and the `keycodes` CLI command.

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Category of keycodes for organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeycodeCategory {
    /// Category ID (e.g., "basic", "navigation")
    pub id: String,
    /// Display name (e.g., "Basic", "Navigation")
    pub name: String,
    /// Description of what keys are in this category
    pub description: String,
}

/// Individual keycode definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeycodeDefinition {
    /// QMK keycode (e.g., "`KC_A`") or parameterized template (e.g., "MO(layer)")
    pub code: String,
    /// Display name (e.g., "A", "Momentary Layer")
    pub name: String,
    /// Category ID
    pub category: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Optional regex pattern for validation (e.g., "^MO\\(\\d+\\)$")
    #[serde(default)]
    pub pattern: Option<String>,
    /// Alternative keycode names/aliases
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Database schema from keycodes.json.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct KeycodeDatabase {
    version: String,
    categories: Vec<KeycodeCategory>,
    keycodes: Vec<KeycodeDefinition>,
}

/// QMK keycode database with fast lookup and search capabilities.
///
/// The database is embedded in the binary at compile time. It provides
/// O(1) keycode validation for plain codes and pattern matching for
/// parameterized codes (MO(n), LT(n, kc), etc.).
#[derive(Debug, Clone)]
pub struct KeycodeDb {
    /// All keycode definitions
    keycodes: Vec<KeycodeDefinition>,
    /// Category definitions
    categories: Vec<KeycodeCategory>,
    /// Fast lookup by keycode string
    lookup: HashMap<String, usize>,
    /// Compiled regex patterns for parameterized keycodes
    patterns: Vec<(usize, Regex)>,
}

#[allow(dead_code)]
impl KeycodeDb {
    /// Loads the keycode database from the embedded JSON file.
    pub fn load() -> Result<Self> {
        let json_data = include_str!("keycodes.json");
        let db: KeycodeDatabase =
            serde_json::from_str(json_data).context("Failed to parse embedded keycodes.json")?;

        let mut lookup = HashMap::new();
        let mut patterns = Vec::new();

        // Build lookup table
        for (idx, keycode) in db.keycodes.iter().enumerate() {
            lookup.insert(keycode.code.clone(), idx);

            // Add aliases to lookup
            for alias in &keycode.aliases {
                lookup.insert(alias.clone(), idx);
            }

            // Compile regex patterns
            if let Some(pattern) = &keycode.pattern {
                let regex = Regex::new(pattern)
                    .with_context(|| format!("Invalid pattern for '{}'", keycode.code))?;
                patterns.push((idx, regex));
            }
        }

        Ok(Self {
            keycodes: db.keycodes,
            categories: db.categories,
            lookup,
            patterns,
        })
    }

    /// Validates a keycode against the database.
    ///
    /// Returns true if the keycode exists or matches a pattern (e.g., MO(5)).
    /// Parameterized templates ("MO(layer)") are not valid keycodes
    /// themselves; only their concrete instances are.
    #[must_use]
    pub fn is_valid(&self, keycode: &str) -> bool {
        // Check direct lookup first (O(1)), excluding pattern templates
        if let Some(&idx) = self.lookup.get(keycode) {
            return self.keycodes[idx].pattern.is_none();
        }

        // Check pattern matches (for MO(n), LT(n, kc), etc.)
        self.patterns.iter().any(|(_, regex)| regex.is_match(keycode))
    }

    /// Returns true if the keycode is a plain (non-parameterized) code
    /// known directly to the database.
    #[must_use]
    pub fn is_plain(&self, keycode: &str) -> bool {
        self.lookup
            .get(keycode)
            .is_some_and(|&idx| self.keycodes[idx].pattern.is_none())
    }

    /// Gets a keycode definition by code or alias.
    #[must_use]
    pub fn get(&self, keycode: &str) -> Option<&KeycodeDefinition> {
        let idx = self.lookup.get(keycode)?;
        self.keycodes.get(*idx)
    }

    /// Gets the definition whose pattern matches a parameterized keycode.
    #[must_use]
    pub fn get_pattern_match(&self, keycode: &str) -> Option<&KeycodeDefinition> {
        self.patterns
            .iter()
            .find(|(_, regex)| regex.is_match(keycode))
            .and_then(|(idx, _)| self.keycodes.get(*idx))
    }

    /// Searches for keycodes by matching the code, name, or description.
    ///
    /// Returns keycodes where the query appears as a substring
    /// (case-insensitive), sorted by relevance.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&KeycodeDefinition> {
        if query.is_empty() {
            return self.keycodes.iter().collect();
        }

        let query_lower = query.to_lowercase();
        let mut results: Vec<(&KeycodeDefinition, i32)> = self
            .keycodes
            .iter()
            .filter_map(|keycode| {
                let code_lower = keycode.code.to_lowercase();
                let name_lower = keycode.name.to_lowercase();
                let desc_lower = keycode
                    .description
                    .as_ref()
                    .map(|d| d.to_lowercase())
                    .unwrap_or_default();

                // Exact match (highest priority)
                if code_lower == query_lower || name_lower == query_lower {
                    return Some((keycode, 100));
                }

                // Starts with query (high priority)
                if code_lower.starts_with(&query_lower) || name_lower.starts_with(&query_lower) {
                    return Some((keycode, 50));
                }

                // Contains query in code or name (medium priority)
                if code_lower.contains(&query_lower) || name_lower.contains(&query_lower) {
                    return Some((keycode, 10));
                }

                // Contains query in description (lower priority)
                if desc_lower.contains(&query_lower) {
                    return Some((keycode, 5));
                }

                None
            })
            .collect();

        // Sort by relevance (descending)
        results.sort_by(|a, b| b.1.cmp(&a.1));

        results.into_iter().map(|(keycode, _)| keycode).collect()
    }

    /// Gets all keycodes in a category.
    #[must_use]
    pub fn get_category_keycodes(&self, category_id: &str) -> Vec<&KeycodeDefinition> {
        self.keycodes
            .iter()
            .filter(|k| k.category == category_id)
            .collect()
    }

    /// Gets all categories.
    #[must_use]
    pub fn categories(&self) -> &[KeycodeCategory] {
        &self.categories
    }

    /// Gets a category by ID.
    #[must_use]
    pub fn get_category(&self, id: &str) -> Option<&KeycodeCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Gets the total number of keycodes.
    #[must_use]
    pub const fn keycode_count(&self) -> usize {
        self.keycodes.len()
    }

    /// Gets the total number of categories.
    #[must_use]
    pub const fn category_count(&self) -> usize {
        self.categories.len()
    }
}
