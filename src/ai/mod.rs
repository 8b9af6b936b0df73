//! AI Integration Layer
//!
//! Ranked LLM backends with quota-aware fallback.

pub mod provider;
pub mod timeout;

pub use provider::{
    AdapterSettings, CredentialSource, EnvCredentials, ErrorCategory, ErrorClassifier,
    GenerationError, HttpBackend, LlmBackend, ProbeOutcome, ProbeReport, ProviderAdapter,
    ProviderKind, ProviderManager, ProviderSnapshot, ProviderStatus, SharedBackend,
    StatusSnapshot,
};
pub use timeout::with_timeout;
