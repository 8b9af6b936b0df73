//! LLM Provider Orchestration
//!
//! Ranked backend adapters with independent quota, health and failure
//! accounting, composed into a single first-success fallback call.
//!
//! ## Modules
//!
//! - `kind`: built-in backend catalog (credentials, endpoints, defaults)
//! - `wire`: request/response shapes per service family
//! - `http`: one generic HTTP backend for every catalog entry
//! - `quota`: rolling per-minute and per-day request windows
//! - `health`: consecutive-failure state machine
//! - `adapter`: backend + quota + health behind one lock
//! - `manager`: registry, fallback loop, status and probe

mod adapter;
mod health;
mod http;
mod kind;
mod manager;
mod quota;
mod wire;

#[cfg(test)]
pub(crate) mod mock;

pub use adapter::{AdapterSettings, AttemptGate, ProviderAdapter, ProviderSnapshot};
pub use health::{HealthState, ProviderStatus};
pub use http::{HttpBackend, HttpBackendConfig};
pub use kind::ProviderKind;
pub use manager::{ProbeEntry, ProbeOutcome, ProbeReport, ProviderManager, ProviderRegistry, StatusSnapshot};
pub use quota::{QuotaTracker, QuotaView, RollingWindow};
pub use wire::{AuthStyle, GenerationParams, WireFormat};

// Re-export error types from centralized location
pub use crate::types::{ErrorCategory, ErrorClassifier, GenerationError};

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::types::Result;

// =============================================================================
// Backend Trait
// =============================================================================

/// One third-party text-generation service
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Provider name (registry key)
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;

    /// Structural credential check. Never touches the network and never
    /// consults rate state.
    fn is_available(&self) -> bool;

    /// Generate text for a prompt. The returned text is trimmed and never
    /// empty; blank output is an error.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Shared backend handle
pub type SharedBackend = Arc<dyn LlmBackend>;

// =============================================================================
// Credential Source
// =============================================================================

/// Where adapter credentials come from. Read once per adapter load.
pub trait CredentialSource: Send + Sync {
    fn credential(&self, kind: ProviderKind) -> Option<String>;
}

/// Credentials from process environment variables (`GEMINI_API_KEY`, ...)
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn credential(&self, kind: ProviderKind) -> Option<String> {
        std::env::var(kind.env_var()).ok()
    }
}

/// Explicit mapping from provider name to credential
impl CredentialSource for HashMap<String, String> {
    fn credential(&self, kind: ProviderKind) -> Option<String> {
        self.get(kind.name()).cloned()
    }
}
