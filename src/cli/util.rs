//! CLI Common Utilities
//!
//! Shared initialization and context management for CLI commands.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;

use crate::ai::provider::{EnvCredentials, ProviderManager};
use crate::config::{Config, ConfigLoader};
use crate::types::{GatewayError, Result};

/// Command execution context
///
/// Resolved configuration plus a provider manager loaded from the
/// environment's credentials.
#[derive(Clone)]
pub struct CommandContext {
    /// Loaded configuration
    pub config: Config,
    /// Adapters with usable credentials, in priority order
    pub manager: Arc<ProviderManager>,
}

impl CommandContext {
    /// Load configuration and every adapter with a usable credential
    pub fn load() -> Result<Self> {
        let config = ConfigLoader::load()?;
        let manager = ProviderManager::load(&config, &EnvCredentials);

        Ok(Self {
            config,
            manager: Arc::new(manager),
        })
    }
}

/// Output format accepted by reporting commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            _ => Err(format!(
                "Invalid format '{}'. Valid values: text, json, yaml",
                s
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// Render a value as JSON or YAML; `None` for the text format
pub fn render_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<Option<String>> {
    match format {
        OutputFormat::Text => Ok(None),
        OutputFormat::Json => Ok(Some(serde_json::to_string_pretty(value)?)),
        OutputFormat::Yaml => Ok(Some(serde_yaml::to_string(value)?)),
    }
}

/// Fail when no adapter could be loaded
pub fn require_providers(manager: &ProviderManager) -> Result<()> {
    if manager.registry().is_empty() {
        return Err(GatewayError::Config(
            "No LLM providers configured. Set an API key such as GEMINI_API_KEY in .env"
                .to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("yaml".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_render_structured() {
        let value = serde_json::json!({"a": 1});
        assert!(render_structured(&value, OutputFormat::Text).unwrap().is_none());
        assert!(
            render_structured(&value, OutputFormat::Yaml)
                .unwrap()
                .unwrap()
                .contains("a: 1")
        );
    }

    #[test]
    fn test_require_providers_on_empty_manager() {
        let err = require_providers(&ProviderManager::default()).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }
}
