//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//! Provides failure classification for diagnostics and status reporting.
//!
//! ## Error Taxonomy
//!
//! - **Credential**: adapter construction failed, adapter excluded from the registry
//! - **Generation**: one adapter's call failed, recorded and absorbed by fallback
//! - **AllProvidersFailed**: terminal, every adapter was ineligible or failed
//! - **ResponseFormat**: generated text is not the expected structured payload
//!
//! Rate-limit skips are not errors; the orchestrator moves on silently.

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Failure categories attached to generation errors.
///
/// Every category triggers the same fallback to the next adapter; the
/// category exists for logs and probe output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    /// Backend answered 429 or reported quota exhaustion
    RateLimit,
    /// Credential rejected (401/403)
    Auth,
    /// Transport-level failure (DNS, connect, reset)
    Network,
    /// Backend down or endpoint missing (404, 5xx)
    Unavailable,
    /// Request rejected as malformed (400, 422)
    BadRequest,
    /// Backend answered but produced no usable text
    EmptyResponse,
    /// Call exceeded the per-call timeout
    Timeout,
    /// Anything else
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::Network => write!(f, "NETWORK"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::EmptyResponse => write!(f, "EMPTY_RESPONSE"),
            Self::Timeout => write!(f, "TIMEOUT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// =============================================================================
// Generation Error
// =============================================================================

/// A single adapter's failed generation call
#[derive(Debug, Clone)]
pub struct GenerationError {
    /// Failure category
    pub category: ErrorCategory,
    /// Detailed error message
    pub message: String,
    /// Provider that produced the error
    pub provider: Option<String>,
}

impl std::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for GenerationError {}

impl GenerationError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider: None,
        }
    }

    /// Create error with provider context
    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            provider: Some(provider.into()),
        }
    }

    /// Add provider context to existing error
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Empty or whitespace-only output
    pub fn empty_response(provider: impl Into<String>) -> Self {
        let provider = provider.into();
        Self::with_provider(
            ErrorCategory::EmptyResponse,
            format!("Empty response from {}", provider),
            provider,
        )
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Maps raw failure signals onto an [`ErrorCategory`]
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify an error message from any provider
    pub fn classify(message: &str, provider: &str) -> GenerationError {
        let lower = message.to_lowercase();

        let category = if lower.contains("rate limit")
            || lower.contains("429")
            || lower.contains("too many requests")
            || lower.contains("quota")
        {
            ErrorCategory::RateLimit
        } else if lower.contains("401")
            || lower.contains("403")
            || lower.contains("unauthorized")
            || lower.contains("api key")
            || lower.contains("permission denied")
        {
            ErrorCategory::Auth
        } else if lower.contains("timed out") || lower.contains("timeout") {
            ErrorCategory::Timeout
        } else if lower.contains("connection")
            || lower.contains("dns")
            || lower.contains("network")
            || lower.contains("unreachable")
        {
            ErrorCategory::Network
        } else if lower.contains("503")
            || lower.contains("502")
            || lower.contains("500")
            || lower.contains("service unavailable")
            || lower.contains("not found")
        {
            ErrorCategory::Unavailable
        } else if lower.contains("400") || lower.contains("bad request") || lower.contains("invalid")
        {
            ErrorCategory::BadRequest
        } else if lower.contains("empty response") {
            ErrorCategory::EmptyResponse
        } else {
            ErrorCategory::Unknown
        };

        GenerationError::with_provider(category, message, provider)
    }

    /// Classify HTTP status code directly (more accurate than string matching)
    pub fn classify_http_status(status: u16, message: &str, provider: &str) -> GenerationError {
        let category = match status {
            429 => ErrorCategory::RateLimit,
            401 | 403 => ErrorCategory::Auth,
            400 | 422 => ErrorCategory::BadRequest,
            404 | 500..=599 => ErrorCategory::Unavailable,
            _ => ErrorCategory::Unknown,
        };
        GenerationError::with_provider(category, message, provider)
    }

    /// Classify a transport error from the HTTP client
    pub fn classify_transport(err: &reqwest::Error, provider: &str) -> GenerationError {
        let category = if err.is_timeout() {
            ErrorCategory::Timeout
        } else if err.is_connect() || err.is_request() {
            ErrorCategory::Network
        } else if err.is_decode() {
            ErrorCategory::EmptyResponse
        } else {
            ErrorCategory::Unknown
        };
        GenerationError::with_provider(category, format!("{} request failed: {}", provider, err), provider)
    }
}

// =============================================================================
// Extraction Error
// =============================================================================

/// Errors that can occur during text extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum GatewayError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // -------------------------------------------------------------------------
    // Provider Errors
    // -------------------------------------------------------------------------
    /// Adapter could not be constructed from its credential
    #[error("Credential error for {provider}: {reason}")]
    Credential { provider: String, reason: String },

    /// A single adapter's call failed
    #[error("Generation error: {0}")]
    Generation(GenerationError),

    /// Every adapter was ineligible or failed
    #[error("All LLM providers failed. Last error: {}", .last_error.as_deref().unwrap_or("none"))]
    AllProvidersFailed {
        attempted: usize,
        last_error: Option<String>,
    },

    /// Operation timeout with context
    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    // -------------------------------------------------------------------------
    // Analysis Errors
    // -------------------------------------------------------------------------
    #[error("Response format error: {0}")]
    ResponseFormat(String),

    #[error("Text extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Unsupported file type: {0}. Please upload an image or PDF file.")]
    UnsupportedContent(String),

    #[error("No text could be extracted from the file")]
    NoTextExtracted,

    #[error("Config error: {0}")]
    Config(String),
}

impl From<GenerationError> for GatewayError {
    fn from(err: GenerationError) -> Self {
        GatewayError::Generation(err)
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl GatewayError {
    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a credential error
    pub fn credential(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Credential {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    /// Convert into the generation error recorded against an adapter.
    ///
    /// Non-generation errors (timeouts, I/O) are folded into a categorized
    /// generation error so the adapter's failure accounting stays uniform.
    pub fn into_generation_error(self, provider: &str) -> GenerationError {
        match self {
            Self::Generation(err) if err.provider.is_some() => err,
            Self::Generation(err) => err.provider(provider),
            Self::Timeout {
                operation,
                duration,
            } => GenerationError::with_provider(
                ErrorCategory::Timeout,
                format!("Timeout after {:?}: {}", duration, operation),
                provider,
            ),
            other => ErrorClassifier::classify(&other.to_string(), provider),
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
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::RateLimit.to_string(), "RATE_LIMIT");
        assert_eq!(ErrorCategory::EmptyResponse.to_string(), "EMPTY_RESPONSE");
        assert_eq!(ErrorCategory::Auth.to_string(), "AUTH");
    }

    #[test]
    fn test_classify_rate_limit() {
        let err = ErrorClassifier::classify("Rate limit exceeded, please retry", "openai");
        assert_eq!(err.category, ErrorCategory::RateLimit);
        assert_eq!(err.provider.as_deref(), Some("openai"));
    }

    #[test]
    fn test_classify_auth() {
        let err = ErrorClassifier::classify("Invalid API key provided", "openai");
        assert_eq!(err.category, ErrorCategory::Auth);
    }

    #[test]
    fn test_classify_timeout_before_network() {
        let err = ErrorClassifier::classify("connection timed out after 30s", "mistral");
        assert_eq!(err.category, ErrorCategory::Timeout);
    }

    #[test]
    fn test_classify_unknown() {
        let err = ErrorClassifier::classify("Something weird happened", "test");
        assert_eq!(err.category, ErrorCategory::Unknown);
    }

    #[test]
    fn test_classify_http_status() {
        let rate_limit = ErrorClassifier::classify_http_status(429, "Rate limited", "test");
        assert_eq!(rate_limit.category, ErrorCategory::RateLimit);

        let auth = ErrorClassifier::classify_http_status(401, "Unauthorized", "test");
        assert_eq!(auth.category, ErrorCategory::Auth);

        let server_error = ErrorClassifier::classify_http_status(503, "Server error", "test");
        assert_eq!(server_error.category, ErrorCategory::Unavailable);

        let odd = ErrorClassifier::classify_http_status(418, "teapot", "test");
        assert_eq!(odd.category, ErrorCategory::Unknown);
    }

    #[test]
    fn test_generation_error_display() {
        let err =
            GenerationError::with_provider(ErrorCategory::RateLimit, "Too many requests", "openai");
        assert_eq!(err.to_string(), "[openai:RATE_LIMIT] Too many requests");

        let err_no_provider = GenerationError::new(ErrorCategory::Network, "Connection failed");
        assert_eq!(err_no_provider.to_string(), "[NETWORK] Connection failed");
    }

    #[test]
    fn test_all_providers_failed_message() {
        let err = GatewayError::AllProvidersFailed {
            attempted: 2,
            last_error: Some("[cohere:AUTH] bad key".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "All LLM providers failed. Last error: [cohere:AUTH] bad key"
        );

        let none = GatewayError::AllProvidersFailed {
            attempted: 0,
            last_error: None,
        };
        assert_eq!(none.to_string(), "All LLM providers failed. Last error: none");
    }

    #[test]
    fn test_timeout_folds_into_generation_error() {
        let err = GatewayError::timeout("gemini generation", Duration::from_secs(5));
        let generation = err.into_generation_error("gemini");
        assert_eq!(generation.category, ErrorCategory::Timeout);
        assert_eq!(generation.provider.as_deref(), Some("gemini"));
    }

    #[test]
    fn test_generation_error_keeps_existing_provider() {
        let err = GatewayError::from(GenerationError::empty_response("cohere"));
        let generation = err.into_generation_error("other");
        assert_eq!(generation.provider.as_deref(), Some("cohere"));
        assert_eq!(generation.category, ErrorCategory::EmptyResponse);
    }
}
