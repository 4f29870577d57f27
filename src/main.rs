//! DasBob Keymap - keymap definition and QMK firmware generation for the
//! DasBob split keyboard.
//!
//! Running without a subcommand prints a summary of the built-in keymap
//! and its validation status.

use anyhow::Result;
use clap::{Parser, Subcommand};
use dasbob_keymap::cli::{
    ConfigArgs, GenerateArgs, KeycodesArgs, LayerRefsArgs, OverridesArgs, ValidateArgs,
};
use dasbob_keymap::constants::APP_NAME;
use dasbob_keymap::firmware::validator::KeymapValidator;
use dasbob_keymap::keycode_db::KeycodeDb;
use dasbob_keymap::keymaps;
use dasbob_keymap::models::SplitGeometry;
use dasbob_keymap::services::layer_refs::build_layer_ref_index;

/// DasBob Keymap - keymap tooling for the DasBob split keyboard
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a keymap for errors and warnings
    Validate(ValidateArgs),
    /// Generate QMK firmware sources from a keymap
    Generate(GenerateArgs),
    /// Show layer references and transparency warnings
    LayerRefs(LayerRefsArgs),
    /// Show the key override table
    Overrides(OverridesArgs),
    /// Search the keycode database
    Keycodes(KeycodesArgs),
    /// Show or update application configuration
    Config(ConfigArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Validate(args)) => args.execute(),
        Some(Commands::Generate(args)) => args.execute(),
        Some(Commands::LayerRefs(args)) => args.execute(),
        Some(Commands::Overrides(args)) => args.execute(),
        Some(Commands::Keycodes(args)) => args.execute(),
        Some(Commands::Config(args)) => args.execute(),
        None => {
            if let Err(e) = print_summary() {
                eprintln!("Error: {e:#}");
                std::process::exit(3);
            }
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

/// Prints a summary of the built-in keymap and its validation status.
fn print_summary() -> Result<()> {
    let keymap = keymaps::dasbob()?;
    let keycode_db = KeycodeDb::load()?;

    println!("{} v{}", APP_NAME, env!("CARGO_PKG_VERSION"));
    println!();
    println!("Keymap:   {}", keymap.metadata.name);
    println!("Keyboard: {}", keymap.metadata.keyboard);
    println!("Layout:   {}", keymap.metadata.layout_variant);
    println!();

    let ref_index = build_layer_ref_index(&keymap.layers);
    println!("Layers:");
    for (idx, layer) in keymap.layers.iter().enumerate() {
        let inbound = ref_index.get(&idx).map_or(0, Vec::len);
        println!(
            "  {} {:<12} {} keys, {} inbound refs",
            idx,
            layer.name,
            layer.keys.len(),
            inbound
        );
    }
    println!();
    println!("Overrides: {}", keymap.overrides.len());

    let validator = KeymapValidator::new(&keymap, SplitGeometry::DASBOB, &keycode_db);
    let report = validator.validate()?;
    if report.is_valid() {
        println!("Status:    ✓ valid");
    } else {
        println!("Status:    ✗ invalid");
        println!("{}", report.format_message());
    }

    Ok(())
}
