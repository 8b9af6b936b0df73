//! Provider Manager
//!
//! Ranked registry of adapters driven by a first-success fallback loop.
//!
//! ## Features
//!
//! - **Priority Order**: adapters sorted ascending by priority, ties keep
//!   registration order
//! - **Eligibility Gate**: rate-limited or non-active adapters are skipped
//!   without counting as attempts
//! - **Single Attempt**: each adapter gets at most one call per `generate`
//! - **Hot Reload**: a fresh registry is swapped in atomically; in-flight
//!   calls finish against the registry they started with
//!
//! ## Strategy
//!
//! 1. Walk the registry in order
//! 2. Reserve an attempt (quota + status check under the adapter lock)
//! 3. Call the backend with a per-call timeout
//! 4. First success wins; failures are recorded and the walk continues
//! 5. Exhausted list → `AllProvidersFailed` with the last error

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use tracing::{error, info, instrument, warn};

use super::adapter::{AdapterSettings, AttemptGate, ProviderAdapter, ProviderSnapshot};
use super::health::ProviderStatus;
use super::http::{HttpBackend, HttpBackendConfig};
use super::kind::ProviderKind;
use super::{CredentialSource, LlmBackend};
use crate::config::Config;
use crate::constants::probe as probe_constants;
use crate::types::{ErrorCategory, GatewayError, Result};

// =============================================================================
// Registry
// =============================================================================

/// Immutable, priority-ordered adapter list
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    adapters: Vec<Arc<ProviderAdapter>>,
}

impl ProviderRegistry {
    /// Sort by priority; the sort is stable so equal priorities keep
    /// insertion order.
    pub fn new(adapters: Vec<ProviderAdapter>) -> Self {
        let mut adapters: Vec<Arc<ProviderAdapter>> = adapters.into_iter().map(Arc::new).collect();
        adapters.sort_by_key(|adapter| adapter.priority());
        Self { adapters }
    }

    pub fn adapters(&self) -> &[Arc<ProviderAdapter>] {
        &self.adapters
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ProviderAdapter>> {
        self.adapters.iter().find(|adapter| adapter.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.adapters.iter().map(|adapter| adapter.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

// =============================================================================
// Status and Probe Reports
// =============================================================================

/// Status of every registered adapter
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub providers: BTreeMap<String, ProviderSnapshot>,
    pub total_providers: usize,
    pub active_providers: usize,
}

impl StatusSnapshot {
    pub fn new(providers: BTreeMap<String, ProviderSnapshot>) -> Self {
        let active_providers = providers
            .values()
            .filter(|snapshot| snapshot.status == ProviderStatus::Active)
            .count();
        Self {
            total_providers: providers.len(),
            active_providers,
            providers,
        }
    }

    pub fn total_providers(&self) -> usize {
        self.total_providers
    }

    pub fn active_providers(&self) -> usize {
        self.active_providers
    }
}

/// Result of probing one adapter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ProbeOutcome {
    Success { preview: String },
    Skipped { reason: String },
    Failed { error: String, category: ErrorCategory },
}

impl ProbeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbeEntry {
    pub provider: String,
    pub model: String,
    #[serde(flatten)]
    pub outcome: ProbeOutcome,
}

/// Probe results in registry order
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProbeReport {
    pub results: Vec<ProbeEntry>,
}

impl ProbeReport {
    pub fn successes(&self) -> usize {
        self.results
            .iter()
            .filter(|entry| entry.outcome.is_success())
            .count()
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() <= probe_constants::PREVIEW_CHARS {
        return text.to_string();
    }
    let head: String = text.chars().take(probe_constants::PREVIEW_CHARS).collect();
    format!("{}...", head)
}

// =============================================================================
// Manager
// =============================================================================

/// Orchestrator over a swappable adapter registry
#[derive(Debug, Default)]
pub struct ProviderManager {
    registry: RwLock<Arc<ProviderRegistry>>,
}

impl ProviderManager {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self {
            registry: RwLock::new(Arc::new(registry)),
        }
    }

    /// Manager over pre-built adapters
    pub fn from_adapters(adapters: Vec<ProviderAdapter>) -> Self {
        Self::new(ProviderRegistry::new(adapters))
    }

    /// Build adapters for every known kind and start a manager over them
    pub fn load(config: &Config, credentials: &dyn CredentialSource) -> Self {
        Self::new(Self::load_adapters(config, credentials))
    }

    /// Construct one adapter per catalog entry, keeping those whose
    /// credential is usable. Construction failures are logged and skipped.
    pub fn load_adapters(config: &Config, credentials: &dyn CredentialSource) -> ProviderRegistry {
        let mut adapters = Vec::new();

        for kind in ProviderKind::ALL {
            let overrides = config.provider_override(kind);
            if overrides.enabled == Some(false) {
                info!(provider = kind.name(), "Provider disabled by configuration");
                continue;
            }

            let credential = credentials.credential(kind).unwrap_or_default();
            let backend =
                match HttpBackend::new(kind, &credential, HttpBackendConfig::for_kind(kind, config)) {
                    Ok(backend) => backend,
                    Err(e) => {
                        error!(provider = kind.name(), error = %e, "Failed to load provider");
                        continue;
                    }
                };

            if !backend.is_available() {
                let reason = kind
                    .check_credential(&credential)
                    .err()
                    .unwrap_or_else(|| "credential rejected".to_string());
                warn!(provider = kind.name(), %reason, "Provider is not available");
                continue;
            }

            let (default_rpm, default_rpd) = kind.default_rate_limits();
            let settings = AdapterSettings::new(
                overrides.priority.unwrap_or_else(|| kind.default_priority()),
                overrides.max_requests_per_minute.unwrap_or(default_rpm),
                overrides.max_requests_per_day.unwrap_or(default_rpd),
            )
            .with_request_timeout(config.gateway.request_timeout());

            info!(provider = kind.name(), model = %backend.model(), "Loaded provider");
            adapters.push(ProviderAdapter::new(Arc::new(backend), settings));
        }

        let registry = ProviderRegistry::new(adapters);
        info!(count = registry.len(), "Loaded LLM providers");
        registry
    }

    /// Rebuild the registry from fresh credentials and swap it in
    pub fn reload(&self, config: &Config, credentials: &dyn CredentialSource) -> usize {
        let registry = Self::load_adapters(config, credentials);
        let count = registry.len();
        self.replace_registry(registry);
        count
    }

    /// Atomically replace the registry
    pub fn replace_registry(&self, registry: ProviderRegistry) {
        let mut guard = self
            .registry
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::new(registry);
    }

    /// Current registry handle
    pub fn registry(&self) -> Arc<ProviderRegistry> {
        Arc::clone(
            &self
                .registry
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        )
    }

    /// Try adapters in priority order and return the first success as
    /// `(content, provider_name)`.
    #[instrument(skip(self, prompt), fields(prompt_chars = prompt.len()))]
    pub async fn generate(&self, prompt: &str) -> Result<(String, String)> {
        let registry = self.registry();
        let mut attempted = 0usize;
        let mut last_error: Option<String> = None;

        for adapter in registry.adapters() {
            let provider = adapter.name();

            match adapter.try_begin_attempt() {
                AttemptGate::Granted => {}
                AttemptGate::RateLimited => {
                    info!(provider, "Provider has reached rate limit, skipping");
                    continue;
                }
                AttemptGate::Inactive(status) => {
                    info!(provider, %status, "Provider is not active, skipping");
                    continue;
                }
            }

            attempted += 1;
            info!(provider, attempt = attempted, "Attempting provider");

            match adapter.generate(prompt).await {
                Ok(content) => {
                    adapter.record_success();
                    info!(provider, "Generated content");
                    return Ok((content, provider.to_string()));
                }
                Err(err) => {
                    let failure = err.into_generation_error(provider);
                    adapter.record_failure(failure.message.clone());
                    warn!(
                        provider,
                        category = %failure.category,
                        error = %failure.message,
                        "Provider failed"
                    );
                    last_error = Some(failure.to_string());
                }
            }
        }

        let err = GatewayError::AllProvidersFailed {
            attempted,
            last_error,
        };
        error!(attempted, error = %err, "Generation failed");
        Err(err)
    }

    /// Side-effect-free status of every registered adapter
    pub fn status_snapshot(&self) -> StatusSnapshot {
        let registry = self.registry();
        let providers = registry
            .adapters()
            .iter()
            .map(|adapter| (adapter.name().to_string(), adapter.snapshot()))
            .collect();
        StatusSnapshot::new(providers)
    }

    /// Send `prompt` to every adapter in order, with the same gating and
    /// accounting as [`generate`](Self::generate), without stopping at the
    /// first success.
    pub async fn probe(&self, prompt: &str) -> ProbeReport {
        let registry = self.registry();
        let mut report = ProbeReport::default();

        for adapter in registry.adapters() {
            let provider = adapter.name();

            let outcome = match adapter.try_begin_attempt() {
                AttemptGate::RateLimited => ProbeOutcome::Skipped {
                    reason: "rate limit reached".to_string(),
                },
                AttemptGate::Inactive(status) => ProbeOutcome::Skipped {
                    reason: format!("status is {}", status),
                },
                AttemptGate::Granted => match adapter.generate(prompt).await {
                    Ok(content) => {
                        adapter.record_success();
                        ProbeOutcome::Success {
                            preview: preview(&content),
                        }
                    }
                    Err(err) => {
                        let failure = err.into_generation_error(provider);
                        adapter.record_failure(failure.message.clone());
                        ProbeOutcome::Failed {
                            error: failure.message,
                            category: failure.category,
                        }
                    }
                },
            };

            info!(provider, success = outcome.is_success(), "Probed provider");
            report.results.push(ProbeEntry {
                provider: provider.to_string(),
                model: adapter.model().to_string(),
                outcome,
            });
        }

        report
    }
}

// =============================================================================
// Tests
// =============================================================================
