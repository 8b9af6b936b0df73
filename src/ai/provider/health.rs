//! Adapter Health State Machine
//!
//! Tracks consecutive failures per adapter and flips the adapter to
//! [`ProviderStatus::Error`] once the failure threshold is reached.
//!
//! ## Transitions
//!
//! ```text
//! Active --[5th consecutive failure]--> Error
//! Error  --[success]-----------------> Active
//! ```
//!
//! Error is sticky: there is no time-based recovery. `QuotaExceeded` and
//! `Disabled` are reported but never assigned here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::health as health_constants;

/// Adapter status as reported by the status snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderStatus {
    /// Eligible for calls (subject to quota)
    Active,
    /// Reserved for quota-driven suspension
    QuotaExceeded,
    /// Too many consecutive failures
    Error,
    /// Reserved for operator-driven suspension
    Disabled,
}

impl std::fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::QuotaExceeded => write!(f, "quota_exceeded"),
            Self::Error => write!(f, "error"),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}

/// Failure accounting for one adapter
#[derive(Debug, Clone)]
pub struct HealthState {
    status: ProviderStatus,
    consecutive_errors: u32,
    failure_threshold: u32,
    last_error: Option<String>,
    last_success: Option<DateTime<Utc>>,
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new(health_constants::FAILURE_THRESHOLD)
    }
}

impl HealthState {
    pub fn new(failure_threshold: u32) -> Self {
        Self {
            status: ProviderStatus::Active,
            consecutive_errors: 0,
            failure_threshold,
            last_error: None,
            last_success: None,
        }
    }

    pub fn status(&self) -> ProviderStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == ProviderStatus::Active
    }

    pub fn consecutive_errors(&self) -> u32 {
        self.consecutive_errors
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_success(&self) -> Option<DateTime<Utc>> {
        self.last_success
    }

    /// Record a successful call
    pub fn record_success(&mut self) {
        self.record_success_at(Utc::now());
    }

    pub fn record_success_at(&mut self, now: DateTime<Utc>) {
        self.last_success = Some(now);
        self.consecutive_errors = 0;
        self.status = ProviderStatus::Active;
    }

    /// Record a failed call. Returns `true` when this failure moved the
    /// adapter into `Error`.
    pub fn record_failure(&mut self, message: impl Into<String>) -> bool {
        self.consecutive_errors = self.consecutive_errors.saturating_add(1);
        self.last_error = Some(message.into());

        if self.consecutive_errors >= self.failure_threshold
            && self.status != ProviderStatus::Error
        {
            self.status = ProviderStatus::Error;
            return true;
        }
        false
    }
}
