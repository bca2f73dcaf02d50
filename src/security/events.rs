//! Security event log.
//!
//! # Responsibilities
//! - Record anomalies from every validation / rate-limit / CSRF path
//! - Keep a bounded, most-recent-first buffer (cap 1000)
//! - Expire entries older than 24 hours on the background sweep
//! - Mirror the buffer into the session store for the reporter
//!
//! # Design Decisions
//! - Logging never fails: persistence errors are swallowed
//! - Events are snapshots; consumers never hold a live reference

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::storage::{SessionStore, SECURITY_EVENTS_KEY};

/// Maximum number of buffered events.
pub const MAX_EVENTS: usize = 1000;

/// How long an event stays relevant before the sweep drops it.
pub const EVENT_TTL_MS: u64 = 24 * 60 * 60 * 1000;

/// Closed set of recordable anomaly categories.
///
/// `Info` is the dedicated category for success/initialization notices,
/// so they no longer ride on `validation_error` or `csrf_error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    XssAttempt,
    InjectionAttempt,
    RateLimit,
    ValidationError,
    CsrfError,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// One recorded security event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityEvent {
    /// Epoch millis at record time.
    pub timestamp: u64,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub details: String,
    pub severity: Severity,
}

/// Bounded, most-recent-first event buffer.
pub struct SecurityLog {
    events: Mutex<VecDeque<SecurityEvent>>,
    store: Arc<SessionStore>,
}

fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

impl SecurityLog {
    /// Create a log, hydrating any events the store already holds.
    pub fn new(store: Arc<SessionStore>) -> Self {
        let events = store
            .get(SECURITY_EVENTS_KEY)
            .and_then(|raw| serde_json::from_str::<VecDeque<SecurityEvent>>(&raw).ok())
            .unwrap_or_default();

        Self {
            events: Mutex::new(events),
            store,
        }
    }

    /// Record an event at the front of the buffer.
    pub fn record(&self, kind: EventKind, details: &str, severity: Severity) {
        self.record_at(kind, details, severity, epoch_ms());
    }

    fn record_at(&self, kind: EventKind, details: &str, severity: Severity, now_ms: u64) {
        tracing::warn!(
            kind = ?kind,
            severity = ?severity,
            details,
            "Security event"
        );

        let mut events = self.events.lock().expect("security log mutex poisoned");
        events.push_front(SecurityEvent {
            timestamp: now_ms,
            kind,
            details: details.to_string(),
            severity,
        });
        events.truncate(MAX_EVENTS);

        self.persist(&events);
    }

    /// Copy of the buffer, most recent first.
    pub fn snapshot(&self) -> Vec<SecurityEvent> {
        let events = self.events.lock().expect("security log mutex poisoned");
        events.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().expect("security log mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop everything.
    pub fn clear(&self) {
        let mut events = self.events.lock().expect("security log mutex poisoned");
        events.clear();
        self.persist(&events);
    }

    /// Drop the `count` oldest entries, keeping anything recorded
    /// since. The reporter uses this after a successful ship so events
    /// recorded while the request was in flight survive for the next
    /// interval.
    pub fn drain_oldest(&self, count: usize) {
        let mut events = self.events.lock().expect("security log mutex poisoned");
        let keep = events.len().saturating_sub(count);
        events.truncate(keep);
        self.persist(&events);
    }

    /// Drop entries past their TTL. Called by the hourly sweep.
    pub fn expire(&self) {
        self.expire_at(epoch_ms());
    }

    fn expire_at(&self, now_ms: u64) {
        let cutoff = now_ms.saturating_sub(EVENT_TTL_MS);
        let mut events = self.events.lock().expect("security log mutex poisoned");
        let before = events.len();
        events.retain(|e| e.timestamp > cutoff);
        if events.len() != before {
            tracing::debug!(expired = before - events.len(), "Expired old security events");
            self.persist(&events);
        }
    }

    fn persist(&self, events: &VecDeque<SecurityEvent>) {
        // Best effort; a full store never blocks logging.
        if let Ok(raw) = serde_json::to_string(&events) {
            self.store.set(SECURITY_EVENTS_KEY, &raw);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_log() -> SecurityLog {
        SecurityLog::new(Arc::new(SessionStore::in_memory()))
    }

    #[test]
    fn test_most_recent_first() {
        let log = fresh_log();
        log.record(EventKind::RateLimit, "first", Severity::Medium);
        log.record(EventKind::InjectionAttempt, "second", Severity::High);

        let events = log.snapshot();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].details, "second");
        assert_eq!(events[1].details, "first");
    }

    #[test]
    fn test_buffer_bound() {
        let log = fresh_log();
        for i in 0..1001 {
            log.record(EventKind::ValidationError, &format!("event {i}"), Severity::Low);
        }

        let events = log.snapshot();
        assert_eq!(events.len(), MAX_EVENTS);
        assert_eq!(events[0].details, "event 1000");
        assert_eq!(events[999].details, "event 1");
    }

    #[test]
    fn test_expiry_sweep() {
        let log = fresh_log();
        log.record_at(EventKind::Info, "stale", Severity::Low, 1_000);
        log.record_at(EventKind::Info, "fresh", Severity::Low, EVENT_TTL_MS + 5_000);

        log.expire_at(EVENT_TTL_MS + 10_000);

        let events = log.snapshot();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].details, "fresh");
    }

    #[test]
    fn test_drain_oldest_keeps_newer_entries() {
        let log = fresh_log();
        log.record(EventKind::RateLimit, "old-1", Severity::Medium);
        log.record(EventKind::RateLimit, "old-2", Severity::Medium);
        log.record(EventKind::InjectionAttempt, "newer", Severity::High);

        log.drain_oldest(2);

        let events = log.snapshot();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].details, "newer");

        // Draining more than the buffer holds empties it cleanly.
        log.drain_oldest(10);
        assert!(log.is_empty());
    }

    #[test]
    fn test_clear() {
        let log = fresh_log();
        log.record(EventKind::CsrfError, "anything", Severity::Medium);
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_persists_and_rehydrates() {
        let store = Arc::new(SessionStore::in_memory());
        {
            let log = SecurityLog::new(store.clone());
            log.record(EventKind::RateLimit, "persisted", Severity::Medium);
        }

        let reloaded = SecurityLog::new(store);
        let events = reloaded.snapshot();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].details, "persisted");
    }

    #[test]
    fn test_wire_shape() {
        let event = SecurityEvent {
            timestamp: 42,
            kind: EventKind::InjectionAttempt,
            details: "d".into(),
            severity: Severity::High,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "injection_attempt");
        assert_eq!(json["severity"], "high");
    }
}
