//! Config Command
//!
//! Manage LetterGate configuration.
//!
//! Usage:
//!   lettergate config show [-f json]
//!   lettergate config path
//!   lettergate config init [-g] [--force]

use crate::config::ConfigLoader;
use crate::types::Result;

/// Show merged effective configuration
pub fn show(format: &str) -> Result<()> {
    ConfigLoader::show_config(format == "json")
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Initialize global or project configuration
pub fn init(global: bool, force: bool) -> Result<()> {
    let path = if global {
        ConfigLoader::init_global(force)?
    } else {
        ConfigLoader::init_project(force)?
    };

    let scope = if global { "global" } else { "project" };
    println!("✓ Initialized {} configuration", scope);
    println!("  Config: {}", path.display());
    Ok(())
}
