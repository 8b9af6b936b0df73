//! LetterGate - Official Letter Analysis over Ranked LLM Providers
//!
//! Extracts text from scanned letters and PDFs, asks the first available
//! LLM provider for a structured plain-language analysis, and falls back
//! down a priority-ordered list when a provider is rate limited, unhealthy
//! or failing.
//!
//! ## Core Features
//!
//! - **Ranked Fallback**: first success wins, every failure moves on
//! - **Quota Tracking**: rolling per-minute and per-day windows per provider
//! - **Health State**: consecutive failures take a provider out of rotation
//! - **Seven Backends**: Gemini, OpenAI, Anthropic, OpenRouter, Cohere,
//!   Mistral and HuggingFace over one generic HTTP adapter
//! - **Hot Reload**: swap the provider registry without disturbing in-flight calls
//!
//! ## Quick Start
//!
//! ```ignore
//! use lettergate::{ConfigLoader, EnvCredentials, ProviderManager};
//!
//! let config = ConfigLoader::load()?;
//! let manager = ProviderManager::load(&config, &EnvCredentials);
//! let (text, provider) = manager.generate("Summarize this letter ...").await?;
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: provider adapters, quota, health and the orchestrator
//! - [`analysis`]: text extraction, prompt construction, report shaping
//! - [`config`]: layered configuration
//! - [`cli`]: command handlers for the `lettergate` binary

pub mod ai;
pub mod analysis;
pub mod cli;
pub mod config;
pub mod constants;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, ExtractionConfig, GatewayConfig, ProviderOverride};

// Error Types
pub use types::error::{ErrorCategory, GatewayError, GenerationError, Result};

// =============================================================================
// Provider Re-exports
// =============================================================================

pub use ai::{
    AdapterSettings, CredentialSource, EnvCredentials, LlmBackend, ProviderAdapter, ProviderKind,
    ProviderManager, ProviderSnapshot, ProviderStatus, StatusSnapshot, with_timeout,
};

// =============================================================================
// Analysis Re-exports
// =============================================================================

pub use analysis::{AnalysisReport, LetterAnalyzer, PromptLanguage};
