//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global and project (.lettergate/) level configuration.
//!
//! Provider credentials are NOT part of this structure. They are read from
//! the environment by a [`CredentialSource`](crate::ai::provider::CredentialSource)
//! every time the adapters are loaded.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

use crate::ai::provider::ProviderKind;
use crate::constants::{extraction, generation, network};
use crate::types::{GatewayError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Gateway-wide generation settings
    pub gateway: GatewayConfig,

    /// Per-provider overrides keyed by provider name
    pub providers: BTreeMap<String, ProviderOverride>,

    /// Text extraction settings
    pub extraction: ExtractionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            gateway: GatewayConfig::default(),
            providers: BTreeMap::new(),
            extraction: ExtractionConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `GatewayError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.gateway.temperature) {
            return Err(GatewayError::Config(format!(
                "Gateway temperature must be between 0.0 and 2.0, got {}",
                self.gateway.temperature
            )));
        }

        if self.gateway.request_timeout_secs == 0 {
            return Err(GatewayError::Config(
                "Gateway request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.gateway.connect_timeout_secs == 0 {
            return Err(GatewayError::Config(
                "Gateway connect_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.gateway.max_tokens == 0 {
            return Err(GatewayError::Config(
                "Gateway max_tokens must be greater than 0".to_string(),
            ));
        }

        for (name, overrides) in &self.providers {
            ProviderKind::from_str(name).map_err(GatewayError::Config)?;

            if let Some(api_base) = &overrides.api_base {
                let url = url::Url::parse(api_base).map_err(|e| {
                    GatewayError::Config(format!(
                        "Invalid api_base for provider {}: '{}': {}",
                        name, api_base, e
                    ))
                })?;
                if !matches!(url.scheme(), "http" | "https") {
                    return Err(GatewayError::Config(format!(
                        "api_base for provider {} must use http or https, got: {}",
                        name,
                        url.scheme()
                    )));
                }
            }
        }

        Ok(())
    }

    /// Overrides for one provider kind (empty when not configured)
    pub fn provider_override(&self, kind: ProviderKind) -> ProviderOverride {
        self.providers.get(kind.name()).cloned().unwrap_or_default()
    }
}

// =============================================================================
// Gateway Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Per-call timeout for one backend generation (seconds)
    pub request_timeout_secs: u64,

    /// TCP connect timeout for backend calls (seconds)
    pub connect_timeout_secs: u64,

    /// Output token ceiling sent with every generation call
    pub max_tokens: u32,

    /// Sampling temperature sent with every generation call
    pub temperature: f32,

    /// Language code used when the caller does not pass one
    pub default_language: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: network::CONNECTION_TIMEOUT_SECS,
            max_tokens: generation::MAX_TOKENS,
            temperature: generation::TEMPERATURE,
            default_language: "en".to_string(),
        }
    }
}

impl GatewayConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

// =============================================================================
// Provider Overrides
// =============================================================================

/// Optional per-provider settings; `None` keeps the built-in default
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderOverride {
    /// Set to false to never load this provider
    pub enabled: Option<bool>,

    /// Lower is tried first
    pub priority: Option<u32>,

    pub max_requests_per_minute: Option<u32>,

    pub max_requests_per_day: Option<u32>,

    /// Model name (provider-specific)
    pub model: Option<String>,

    /// API base URL (for proxies and self-hosted gateways)
    pub api_base: Option<String>,
}

// =============================================================================
// Extraction Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Tesseract `-l` language set
    pub ocr_languages: String,

    /// Tesseract `--oem` value
    pub ocr_engine_mode: u8,

    /// Tesseract `--psm` value
    pub page_segmentation_mode: u8,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            ocr_languages: extraction::OCR_LANGUAGES.to_string(),
            ocr_engine_mode: extraction::OCR_ENGINE_MODE,
            page_segmentation_mode: extraction::PAGE_SEGMENTATION_MODE,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.gateway.max_tokens, 2000);
        assert!((config.gateway.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.extraction.ocr_languages, "deu+eng");
    }

    #[test]
    fn test_rejects_out_of_range_temperature() {
        let mut config = Config::default();
        config.gateway.temperature = 3.5;
        assert!(matches!(config.validate(), Err(GatewayError::Config(_))));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let mut config = Config::default();
        config.gateway.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unknown_provider() {
        let mut config = Config::default();
        config
            .providers
            .insert("skynet".to_string(), ProviderOverride::default());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("skynet"));
    }

    #[test]
    fn test_rejects_non_http_api_base() {
        let mut config = Config::default();
        config.providers.insert(
            "openai".to_string(),
            ProviderOverride {
                api_base: Some("ftp://example.com".to_string()),
                ..Default::default()
            },
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_provider_override_lookup() {
        let mut config = Config::default();
        config.providers.insert(
            "cohere".to_string(),
            ProviderOverride {
                priority: Some(1),
                ..Default::default()
            },
        );
        assert_eq!(
            config.provider_override(ProviderKind::Cohere).priority,
            Some(1)
        );
        assert_eq!(
            config.provider_override(ProviderKind::Gemini),
            ProviderOverride::default()
        );
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [gateway]
            request_timeout_secs = 15

            [providers.mistral]
            max_requests_per_day = 42
            "#,
        )
        .unwrap();

        assert_eq!(config.gateway.request_timeout_secs, 15);
        assert_eq!(config.gateway.max_tokens, 2000);
        assert_eq!(config.providers["mistral"].max_requests_per_day, Some(42));
        assert!(config.validate().is_ok());
    }
}
