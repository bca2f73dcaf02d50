//! Client-side rate limiting.
//!
//! Two independent gates guard the same submissions on purpose:
//! [`RateLimiter`] keys on the endpoint URL and caps any secure
//! request, while [`SubmissionGuard`] tracks one form instance with a
//! tighter quota and stops a burst before it ever reaches the network.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::security::events::{EventKind, SecurityLog, Severity};

/// Window length shared by both gates.
pub const RATE_LIMIT_WINDOW_MS: u64 = 60_000;

/// Max requests per window per endpoint key.
pub const RATE_LIMIT_MAX: u32 = 10;

/// Max form submissions per rolling window.
pub const MAX_FORM_SUBMISSIONS: u32 = 5;

#[derive(Debug, Clone)]
struct RateLimitEntry {
    count: u32,
    reset_time_ms: u64,
}

fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Fixed-window limiter keyed by endpoint.
///
/// At most one entry per key; a request inside the window increments
/// the count, a request past the window replaces the entry with a
/// fresh one. Entries are never evicted; the endpoint set is small
/// and static.
pub struct RateLimiter {
    entries: Mutex<HashMap<String, RateLimitEntry>>,
    window_ms: u64,
    max_requests: u32,
}

impl RateLimiter {
    pub fn new(window_ms: u64, max_requests: u32) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            window_ms,
            max_requests,
        }
    }

    /// Returns true when the request is allowed. A denial records a
    /// `rate_limit` event at medium severity.
    pub fn check(&self, endpoint: &str, log: &SecurityLog) -> bool {
        self.check_at(endpoint, log, epoch_ms())
    }

    fn check_at(&self, endpoint: &str, log: &SecurityLog, now_ms: u64) -> bool {
        let mut entries = self.entries.lock().expect("rate limiter mutex poisoned");

        match entries.get_mut(endpoint) {
            None => {
                entries.insert(
                    endpoint.to_string(),
                    RateLimitEntry {
                        count: 1,
                        reset_time_ms: now_ms + self.window_ms,
                    },
                );
                true
            }
            Some(entry) if now_ms > entry.reset_time_ms => {
                entry.count = 1;
                entry.reset_time_ms = now_ms + self.window_ms;
                true
            }
            Some(entry) => {
                entry.count += 1;
                if entry.count > self.max_requests {
                    log.record(
                        EventKind::RateLimit,
                        &format!("Rate limit exceeded for {endpoint}"),
                        Severity::Medium,
                    );
                    false
                } else {
                    true
                }
            }
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RATE_LIMIT_WINDOW_MS, RATE_LIMIT_MAX)
    }
}

#[derive(Debug, Default)]
struct GuardState {
    submission_count: u32,
    last_submission_ms: u64,
}

/// Per-form submission quota, independent of the endpoint limiter.
///
/// The counter resets once a full window passes since the last
/// attempt. A denial records `rate_limit` at high severity, since at
/// this point a human is hammering the form.
pub struct SubmissionGuard {
    state: Mutex<GuardState>,
    max_submissions: u32,
    window_ms: u64,
}

impl SubmissionGuard {
    pub fn new(max_submissions: u32, window_ms: u64) -> Self {
        Self {
            state: Mutex::new(GuardState::default()),
            max_submissions,
            window_ms,
        }
    }

    /// Returns true when this submission may proceed.
    pub fn try_acquire(&self, form_id: &str, log: &SecurityLog) -> bool {
        self.try_acquire_at(form_id, log, epoch_ms())
    }

    fn try_acquire_at(&self, form_id: &str, log: &SecurityLog, now_ms: u64) -> bool {
        let mut state = self.state.lock().expect("submission guard mutex poisoned");

        if now_ms.saturating_sub(state.last_submission_ms) > self.window_ms {
            state.submission_count = 0;
        }

        if state.submission_count >= self.max_submissions {
            log.record(
                EventKind::RateLimit,
                &format!("Form submission rate limit exceeded for {form_id}"),
                Severity::High,
            );
            return false;
        }

        state.submission_count += 1;
        state.last_submission_ms = now_ms;
        true
    }

    /// Current count and last-attempt timestamp, for the stats view.
    pub fn stats(&self) -> (u32, u64) {
        let state = self.state.lock().expect("submission guard mutex poisoned");
        (state.submission_count, state.last_submission_ms)
    }

    /// Reset counters, e.g. when security data is cleared.
    pub fn reset(&self) {
        let mut state = self.state.lock().expect("submission guard mutex poisoned");
        *state = GuardState::default();
    }
}

impl Default for SubmissionGuard {
    fn default() -> Self {
        Self::new(MAX_FORM_SUBMISSIONS, RATE_LIMIT_WINDOW_MS)
    }
}
