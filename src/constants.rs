//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Generation call constants (shared by every backend)
pub mod generation {
    /// Per-call output token ceiling
    pub const MAX_TOKENS: u32 = 2000;

    /// Sampling temperature
    pub const TEMPERATURE: f32 = 0.7;

    /// Maximum characters of an error body kept in a failure message
    pub const ERROR_BODY_PREVIEW_CHARS: usize = 500;
}

/// Rolling quota window constants
pub mod quota {
    /// Length of the per-minute window (seconds)
    pub const MINUTE_WINDOW_SECS: i64 = 60;

    /// Length of the per-day window (seconds)
    pub const DAY_WINDOW_SECS: i64 = 24 * 60 * 60;
}

/// Adapter health constants
pub mod health {
    /// Consecutive failures before an adapter is marked Error
    pub const FAILURE_THRESHOLD: u32 = 5;
}

/// Provider probe constants
pub mod probe {
    /// Prompt sent to every adapter by the probe command
    pub const TEST_PROMPT: &str =
        "Say 'Hello, I am working!' in JSON format: {\"message\": \"Hello, I am working!\"}";

    /// Characters of a successful probe response kept in the outcome
    pub const PREVIEW_CHARS: usize = 100;
}

/// HTTP/Network constants
pub mod network {
    /// Default per-call generation timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

    /// Connection timeout (seconds)
    pub const CONNECTION_TIMEOUT_SECS: u64 = 10;
}

/// Text extraction constants
pub mod extraction {
    /// Tesseract language set (German letters, English fallback)
    pub const OCR_LANGUAGES: &str = "deu+eng";

    /// Tesseract OCR engine mode (default LSTM engine)
    pub const OCR_ENGINE_MODE: u8 = 3;

    /// Tesseract page segmentation mode (single uniform block of text)
    pub const PAGE_SEGMENTATION_MODE: u8 = 6;
}
