//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/lettergate/config.toml)
//! 3. Project config (.lettergate/config.toml)
//! 4. Environment variables (LETTERGATE_* prefix, `__` separates sections)
//!
//! Provider credentials (`GEMINI_API_KEY`, ...) are never part of the
//! merged document; the adapter loader reads them separately.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{GatewayError, Result};

const ENV_PREFIX: &str = "LETTERGATE_";
const PROJECT_DIR: &str = ".lettergate";
const CONFIG_FILE: &str = "config.toml";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        Self::load_with(Self::global_config_path(), &Self::project_config_path())
    }

    /// Resolution chain with explicit file locations
    pub fn load_with(global: Option<PathBuf>, project: &Path) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = global
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        if project.exists() {
            debug!("Loading project config from: {}", project.display());
            figment = figment.merge(Toml::file(project));
        }

        // LETTERGATE_GATEWAY__MAX_TOKENS -> gateway.max_tokens
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| GatewayError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| GatewayError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/lettergate/)
    pub fn global_dir() -> Option<PathBuf> {
        directories::BaseDirs::new().map(|dirs| dirs.config_dir().join("lettergate"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join(CONFIG_FILE))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        Self::project_dir().join(CONFIG_FILE)
    }

    /// Get project config directory
    pub fn project_dir() -> PathBuf {
        PathBuf::from(PROJECT_DIR)
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file paths
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Show current effective configuration
    pub fn show_config(as_json: bool) -> Result<()> {
        let config = Self::load()?;
        println!("{}", Self::render(&config, as_json)?);
        Ok(())
    }

    /// Render a configuration as JSON or TOML text
    pub fn render(config: &Config, as_json: bool) -> Result<String> {
        if as_json {
            Ok(serde_json::to_string_pretty(config)?)
        } else {
            toml::to_string_pretty(config).map_err(|e| GatewayError::Config(e.to_string()))
        }
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Initialize global configuration
    pub fn init_global(force: bool) -> Result<PathBuf> {
        let global_dir = Self::global_dir().ok_or_else(|| {
            GatewayError::Config("Cannot determine global config directory".to_string())
        })?;
        Self::write_template(&global_dir, force)
    }

    /// Initialize project configuration
    pub fn init_project(force: bool) -> Result<PathBuf> {
        Self::write_template(&Self::project_dir(), force)
    }

    /// Write the default config template into `dir`, returning the file path
    pub fn write_template(dir: &Path, force: bool) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;

        let config_path = dir.join(CONFIG_FILE);
        if !config_path.exists() || force {
            fs::write(&config_path, Self::default_config_template())?;
            info!("Created config: {}", config_path.display());
        } else {
            info!("Config exists: {}", config_path.display());
        }

        Ok(config_path)
    }

    // =========================================================================
    // Internal
    // =========================================================================

    /// Default config content (TOML)
    fn default_config_template() -> String {
        r#"# LetterGate Configuration
# Project settings in .lettergate/config.toml override the global file.
# API keys are read from the environment (GEMINI_API_KEY, OPENAI_API_KEY, ...).

version = "1.0"

[gateway]
request_timeout_secs = 60
connect_timeout_secs = 10
max_tokens = 2000
temperature = 0.7
default_language = "en"

# Per-provider overrides. Lower priority is tried first.
# [providers.gemini]
# enabled = true
# priority = 1
# max_requests_per_minute = 15
# max_requests_per_day = 1000
# model = "gemini-1.5-flash"

[extraction]
ocr_languages = "deu+eng"
ocr_engine_mode = 3
page_segmentation_mode = 6
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_without_files() {
        let temp_dir = TempDir::new().unwrap();
        let config =
            ConfigLoader::load_with(None, &temp_dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.gateway.request_timeout_secs, 60);
    }

    #[test]
    fn test_template_is_loadable() {
        let temp_dir = TempDir::new().unwrap();
        let path = ConfigLoader::write_template(temp_dir.path(), false).unwrap();
        assert!(path.exists());

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.gateway.max_tokens, 2000);
        assert_eq!(config.extraction.page_segmentation_mode, 6);
    }

    #[test]
    fn test_write_template_respects_force() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&path, "version = \"custom\"\n").unwrap();

        ConfigLoader::write_template(temp_dir.path(), false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "version = \"custom\"\n");

        ConfigLoader::write_template(temp_dir.path(), true).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("[gateway]"));
    }

    #[test]
    fn test_project_overrides_global() {
        let temp_dir = TempDir::new().unwrap();
        let global = temp_dir.path().join("global.toml");
        let project = temp_dir.path().join("project.toml");
        fs::write(&global, "[gateway]\nmax_tokens = 100\ntemperature = 0.1\n").unwrap();
        fs::write(&project, "[gateway]\nmax_tokens = 300\n").unwrap();

        let config = ConfigLoader::load_with(Some(global), &project).unwrap();
        assert_eq!(config.gateway.max_tokens, 300);
        assert!((config.gateway.temperature - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&path, "[gateway]\ntemperature = 9.0\n").unwrap();
        assert!(matches!(
            ConfigLoader::load_from_file(&path),
            Err(GatewayError::Config(_))
        ));
    }

    #[test]
    fn test_env_override() {
        // SAFETY: This test runs in isolation
        unsafe {
            std::env::set_var("LETTERGATE_GATEWAY__DEFAULT_LANGUAGE", "ru");
        }
        let temp_dir = TempDir::new().unwrap();
        let config =
            ConfigLoader::load_with(None, &temp_dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.gateway.default_language, "ru");
        unsafe {
            std::env::remove_var("LETTERGATE_GATEWAY__DEFAULT_LANGUAGE");
        }
    }
}
