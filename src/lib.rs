//! DasBob Keymap Library
//!
//! This library defines the keymap for the DasBob split keyboard as typed,
//! compiled-in data, and provides parsing, validation, layer-reference
//! analysis, and QMK firmware source generation around it.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod firmware;
pub mod keycode_db;
pub mod keymaps;
pub mod models;
pub mod parser;
pub mod services;
