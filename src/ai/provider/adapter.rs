//! Provider Adapter
//!
//! One backend plus its quota windows and health state. All mutable state
//! lives in a single `Mutex` so counter updates and status changes from
//! concurrent callers are serialized per adapter. The lock is never held
//! across the backend call.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, warn};

use super::health::{HealthState, ProviderStatus};
use super::quota::QuotaTracker;
use super::SharedBackend;
use crate::ai::timeout::with_timeout;
use crate::constants::{health as health_constants, network};
use crate::types::Result;

/// Per-adapter tuning resolved at load time
#[derive(Debug, Clone)]
pub struct AdapterSettings {
    /// Lower is tried first
    pub priority: u32,
    pub max_requests_per_minute: u32,
    pub max_requests_per_day: u32,
    /// Upper bound for one backend call
    pub request_timeout: Duration,
    /// Consecutive failures before the adapter enters `Error`
    pub failure_threshold: u32,
}

impl AdapterSettings {
    pub fn new(priority: u32, max_requests_per_minute: u32, max_requests_per_day: u32) -> Self {
        Self {
            priority,
            max_requests_per_minute,
            max_requests_per_day,
            request_timeout: Duration::from_secs(network::DEFAULT_TIMEOUT_SECS),
            failure_threshold: health_constants::FAILURE_THRESHOLD,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold;
        self
    }
}

/// Outcome of the combined eligibility check and attempt reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptGate {
    /// Attempt counted; the caller must now issue the call
    Granted,
    /// A rolling window is full
    RateLimited,
    /// Status is not `Active`
    Inactive(ProviderStatus),
}

#[derive(Debug)]
struct AdapterState {
    quota: QuotaTracker,
    health: HealthState,
}

/// Point-in-time view of one adapter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderSnapshot {
    pub status: ProviderStatus,
    pub priority: u32,
    pub model: String,
    pub requests_today: u32,
    pub max_requests_day: u32,
    pub requests_this_minute: u32,
    pub max_requests_minute: u32,
    pub error_count: u32,
    pub last_error: Option<String>,
    pub last_success: Option<DateTime<Utc>>,
    pub can_make_request: bool,
}

/// Backend with quota tracking and failure accounting
pub struct ProviderAdapter {
    backend: SharedBackend,
    priority: u32,
    request_timeout: Duration,
    state: Mutex<AdapterState>,
}

impl std::fmt::Debug for ProviderAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderAdapter")
            .field("name", &self.backend.name())
            .field("priority", &self.priority)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl ProviderAdapter {
    pub fn new(backend: SharedBackend, settings: AdapterSettings) -> Self {
        Self {
            backend,
            priority: settings.priority,
            request_timeout: settings.request_timeout,
            state: Mutex::new(AdapterState {
                quota: QuotaTracker::new(
                    settings.max_requests_per_minute,
                    settings.max_requests_per_day,
                ),
                health: HealthState::new(settings.failure_threshold),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, AdapterState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn name(&self) -> &str {
        self.backend.name()
    }

    pub fn model(&self) -> &str {
        self.backend.model()
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub fn status(&self) -> ProviderStatus {
        self.lock().health.status()
    }

    /// Credential presence and shape only
    pub fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    /// Apply due window resets, then check both counters
    pub fn can_attempt(&self) -> bool {
        self.can_attempt_at(Utc::now())
    }

    pub fn can_attempt_at(&self, now: DateTime<Utc>) -> bool {
        self.lock().quota.can_attempt_at(now)
    }

    /// Count an attempt against both windows
    pub fn record_attempt(&self) {
        self.lock().quota.record_attempt();
    }

    pub fn record_success(&self) {
        self.lock().health.record_success();
    }

    pub fn record_failure(&self, message: impl Into<String>) {
        let message = message.into();
        let mut state = self.lock();
        if state.health.record_failure(message) {
            warn!(
                provider = %self.name(),
                consecutive_errors = state.health.consecutive_errors(),
                "Provider marked as error"
            );
        }
    }

    /// Check eligibility and reserve the attempt under one lock acquisition,
    /// so two callers cannot both take the last unit of quota.
    pub fn try_begin_attempt(&self) -> AttemptGate {
        self.try_begin_attempt_at(Utc::now())
    }

    pub fn try_begin_attempt_at(&self, now: DateTime<Utc>) -> AttemptGate {
        let mut state = self.lock();
        if !state.quota.can_attempt_at(now) {
            return AttemptGate::RateLimited;
        }
        if !state.health.is_active() {
            return AttemptGate::Inactive(state.health.status());
        }
        state.quota.record_attempt();
        AttemptGate::Granted
    }

    /// Issue the backend call, bounded by the per-call timeout
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(provider = %self.name(), "Calling backend");
        let operation = format!("{} generation", self.name());
        with_timeout(self.request_timeout, self.backend.generate(prompt), &operation).await
    }

    /// Side-effect-free read of the adapter's state
    pub fn snapshot(&self) -> ProviderSnapshot {
        self.snapshot_at(Utc::now())
    }

    pub fn snapshot_at(&self, now: DateTime<Utc>) -> ProviderSnapshot {
        let state = self.lock();
        let view = state.quota.peek_at(now);
        ProviderSnapshot {
            status: state.health.status(),
            priority: self.priority,
            model: self.backend.model().to_string(),
            requests_today: view.requests_today,
            max_requests_day: view.max_per_day,
            requests_this_minute: view.requests_this_minute,
            max_requests_minute: view.max_per_minute,
            error_count: state.health.consecutive_errors(),
            last_error: state.health.last_error().map(str::to_string),
            last_success: state.health.last_success(),
            can_make_request: view.has_capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::mock::MockBackend;
    use crate::types::{ErrorCategory, GatewayError};
    use std::sync::Arc;

    fn adapter(backend: MockBackend, rpm: u32, rpd: u32) -> ProviderAdapter {
        ProviderAdapter::new(Arc::new(backend), AdapterSettings::new(1, rpm, rpd))
    }

    #[test]
    fn test_gate_reserves_quota() {
        let adapter = adapter(MockBackend::succeeding("a", "ok"), 2, 100);

        assert_eq!(adapter.try_begin_attempt(), AttemptGate::Granted);
        assert_eq!(adapter.try_begin_attempt(), AttemptGate::Granted);
        assert_eq!(adapter.try_begin_attempt(), AttemptGate::RateLimited);

        let snapshot = adapter.snapshot();
        assert_eq!(snapshot.requests_this_minute, 2);
        assert_eq!(snapshot.requests_today, 2);
        assert!(!snapshot.can_make_request);
    }

    #[test]
    fn test_gate_skips_inactive_without_counting() {
        let adapter = ProviderAdapter::new(
            Arc::new(MockBackend::failing("a", "boom")),
            AdapterSettings::new(1, 10, 100).with_failure_threshold(1),
        );
        adapter.record_failure("boom");

        assert_eq!(
            adapter.try_begin_attempt(),
            AttemptGate::Inactive(ProviderStatus::Error)
        );
        assert_eq!(adapter.snapshot().requests_today, 0);
    }

    #[test]
    fn test_snapshot_after_attempts_and_failure() {
        let adapter = adapter(MockBackend::succeeding("a", "ok"), 10, 100);
        adapter.record_attempt();
        adapter.record_attempt();
        adapter.record_failure("bad gateway");

        let snapshot = adapter.snapshot();
        assert_eq!(snapshot.requests_today, 2);
        assert_eq!(snapshot.max_requests_day, 100);
        assert_eq!(snapshot.error_count, 1);
        assert_eq!(snapshot.last_error.as_deref(), Some("bad gateway"));
        assert_eq!(snapshot.status, ProviderStatus::Active);
        assert!(snapshot.last_success.is_none());
    }

    #[test]
    fn test_five_failures_then_success() {
        let adapter = adapter(MockBackend::succeeding("a", "ok"), 10, 100);
        for _ in 0..5 {
            adapter.record_failure("down");
        }
        assert_eq!(adapter.status(), ProviderStatus::Error);

        adapter.record_success();
        let snapshot = adapter.snapshot();
        assert_eq!(snapshot.status, ProviderStatus::Active);
        assert_eq!(snapshot.error_count, 0);
        assert!(snapshot.last_success.is_some());
    }

    #[test]
    fn test_availability_follows_backend() {
        let usable = adapter(MockBackend::succeeding("a", "ok"), 10, 100);
        let unusable = adapter(MockBackend::succeeding("b", "ok").unavailable(), 10, 100);

        assert!(usable.is_available());
        assert!(!unusable.is_available());
        // Availability is structural; the quota gate is independent of it
        assert_eq!(unusable.try_begin_attempt(), AttemptGate::Granted);
    }

    #[tokio::test]
    async fn test_generate_times_out() {
        let adapter = ProviderAdapter::new(
            Arc::new(MockBackend::slow("sleepy", Duration::from_secs(5))),
            AdapterSettings::new(1, 10, 100).with_request_timeout(Duration::from_millis(20)),
        );

        let err = adapter.generate("hi").await.unwrap_err();
        assert!(matches!(err, GatewayError::Timeout { .. }));
        assert_eq!(
            err.into_generation_error("sleepy").category,
            ErrorCategory::Timeout
        );
    }

    #[test]
    fn test_snapshot_serializes_rfc3339() {
        let adapter = adapter(MockBackend::succeeding("a", "ok"), 10, 100);
        adapter.record_success();

        let json = serde_json::to_value(adapter.snapshot()).unwrap();
        let stamp = json["last_success"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(stamp).is_ok());
        assert_eq!(json["status"], "active");
    }
}
