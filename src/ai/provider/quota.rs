//! Rolling Quota Tracker
//!
//! Per-adapter request accounting over two independent windows: one minute
//! and one day. Each window is a counter paired with the instant it was
//! last reset; once the window's duration has elapsed since that instant the
//! counter drops to zero and the instant advances to "now".
//!
//! Every time-dependent method has an `_at(now)` form so tests can drive
//! the clock explicitly.

use chrono::{DateTime, Duration, Utc};

use crate::constants::quota;

/// A counter that resets once `length` has elapsed since `last_reset`
#[derive(Debug, Clone)]
pub struct RollingWindow {
    count: u32,
    max: u32,
    length: Duration,
    last_reset: DateTime<Utc>,
}

impl RollingWindow {
    pub fn new(max: u32, length: Duration, now: DateTime<Utc>) -> Self {
        Self {
            count: 0,
            max,
            length,
            last_reset: now,
        }
    }

    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.last_reset >= self.length
    }

    /// Apply a due reset
    fn refresh(&mut self, now: DateTime<Utc>) {
        if self.is_expired(now) {
            self.count = 0;
            self.last_reset = now;
        }
    }

    /// Count as it would read after a due reset, without applying it
    fn effective_count(&self, now: DateTime<Utc>) -> u32 {
        if self.is_expired(now) { 0 } else { self.count }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn last_reset(&self) -> DateTime<Utc> {
        self.last_reset
    }
}

/// Read-only view of both windows at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaView {
    pub requests_this_minute: u32,
    pub max_per_minute: u32,
    pub requests_today: u32,
    pub max_per_day: u32,
}

impl QuotaView {
    pub fn has_capacity(&self) -> bool {
        self.requests_this_minute < self.max_per_minute && self.requests_today < self.max_per_day
    }
}

/// Minute and day windows for one adapter
#[derive(Debug, Clone)]
pub struct QuotaTracker {
    minute: RollingWindow,
    day: RollingWindow,
}

impl QuotaTracker {
    pub fn new(max_per_minute: u32, max_per_day: u32) -> Self {
        Self::new_at(max_per_minute, max_per_day, Utc::now())
    }

    pub fn new_at(max_per_minute: u32, max_per_day: u32, now: DateTime<Utc>) -> Self {
        Self {
            minute: RollingWindow::new(
                max_per_minute,
                Duration::seconds(quota::MINUTE_WINDOW_SECS),
                now,
            ),
            day: RollingWindow::new(max_per_day, Duration::seconds(quota::DAY_WINDOW_SECS), now),
        }
    }

    /// Apply due resets, then check both counters against their maxima
    pub fn can_attempt(&mut self) -> bool {
        self.can_attempt_at(Utc::now())
    }

    pub fn can_attempt_at(&mut self, now: DateTime<Utc>) -> bool {
        self.minute.refresh(now);
        self.day.refresh(now);
        self.minute.count < self.minute.max && self.day.count < self.day.max
    }

    /// Count one attempt against both windows
    pub fn record_attempt(&mut self) {
        self.minute.count = self.minute.count.saturating_add(1);
        self.day.count = self.day.count.saturating_add(1);
    }

    /// Non-mutating view; windows due for reset read as zero
    pub fn peek(&self) -> QuotaView {
        self.peek_at(Utc::now())
    }

    pub fn peek_at(&self, now: DateTime<Utc>) -> QuotaView {
        QuotaView {
            requests_this_minute: self.minute.effective_count(now),
            max_per_minute: self.minute.max,
            requests_today: self.day.effective_count(now),
            max_per_day: self.day.max,
        }
    }

    pub fn minute(&self) -> &RollingWindow {
        &self.minute
    }

    pub fn day(&self) -> &RollingWindow {
        &self.day
    }
}
