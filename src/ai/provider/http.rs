//! Generic HTTP Backend
//!
//! A single [`LlmBackend`] for every catalog entry. The service-specific
//! parts (endpoint, body, auth header, response field) come from the
//! backend's [`ProviderKind`] via its [`WireFormat`] and [`AuthStyle`].

use async_trait::async_trait;
use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::debug;

use super::kind::ProviderKind;
use super::wire::{AuthStyle, GenerationParams, WireFormat};
use super::LlmBackend;
use crate::config::Config;
use crate::constants::generation;
use crate::types::{ErrorCategory, ErrorClassifier, GatewayError, GenerationError, Result};

/// Resolved connection settings for one backend
#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    pub model: String,
    pub api_base: String,
    pub params: GenerationParams,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl HttpBackendConfig {
    /// Catalog defaults with config overrides applied
    pub fn for_kind(kind: ProviderKind, config: &Config) -> Self {
        let overrides = config.provider_override(kind);
        Self {
            model: overrides
                .model
                .unwrap_or_else(|| kind.default_model().to_string()),
            api_base: overrides
                .api_base
                .unwrap_or_else(|| kind.default_api_base().to_string()),
            params: GenerationParams {
                max_tokens: config.gateway.max_tokens,
                temperature: config.gateway.temperature,
            },
            connect_timeout: config.gateway.connect_timeout(),
            request_timeout: config.gateway.request_timeout(),
        }
    }
}

/// HTTP backend with secure API key handling
pub struct HttpBackend {
    kind: ProviderKind,
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    model: String,
    api_base: String,
    format: WireFormat,
    auth: AuthStyle,
    params: GenerationParams,
    client: reqwest::Client,
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("kind", &self.kind)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("format", &self.format)
            .finish()
    }
}

impl HttpBackend {
    /// Build a backend. Fails when the credential cannot be carried in an
    /// HTTP header or the client cannot be created; a credential that is
    /// merely empty or a placeholder yields a backend that reports itself
    /// unavailable.
    pub fn new(kind: ProviderKind, credential: &str, config: HttpBackendConfig) -> Result<Self> {
        let credential = credential.trim();

        HeaderValue::from_str(credential).map_err(|_| {
            GatewayError::credential(kind.name(), "credential contains invalid header characters")
        })?;

        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                GatewayError::credential(kind.name(), format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            kind,
            api_key: SecretString::from(credential.to_string()),
            model: config.model,
            api_base: config.api_base,
            format: kind.wire_format(),
            auth: kind.auth_style(),
            params: config.params,
            client,
        })
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn endpoint(&self) -> String {
        self.format.endpoint(&self.api_base, &self.model)
    }
}

#[async_trait]
impl LlmBackend for HttpBackend {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn is_available(&self) -> bool {
        self.kind
            .check_credential(self.api_key.expose_secret())
            .is_ok()
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let provider = self.kind.name();
        if !self.is_available() {
            return Err(GenerationError::with_provider(
                ErrorCategory::Auth,
                format!("{} client not initialized", provider),
                provider,
            )
            .into());
        }

        let start_time = Instant::now();
        let url = self.endpoint();
        let body = self.format.request_body(&self.model, prompt, self.params);

        let mut request = self.client.post(&url).json(&body);
        request = match self.auth {
            AuthStyle::Bearer => request.bearer_auth(self.api_key.expose_secret()),
            AuthStyle::Header(name) => request.header(name, self.api_key.expose_secret()),
        };
        for (name, value) in self.format.extra_headers() {
            request = request.header(*name, *value);
        }

        debug!(provider, model = %self.model, "Sending generation request");

        let response = request
            .send()
            .await
            .map_err(|e| ErrorClassifier::classify_transport(&e, provider))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let preview: String = body
                .chars()
                .take(generation::ERROR_BODY_PREVIEW_CHARS)
                .collect();
            return Err(ErrorClassifier::classify_http_status(
                status.as_u16(),
                &format!("{} API error ({}): {}", provider, status, preview),
                provider,
            )
            .into());
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ErrorClassifier::classify_transport(&e, provider))?;

        let text = self
            .format
            .extract_text(&payload)
            .ok_or_else(|| GenerationError::empty_response(provider))?;

        debug!(
            provider,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            chars = text.len(),
            "Generation succeeded"
        );

        Ok(text)
    }
}
