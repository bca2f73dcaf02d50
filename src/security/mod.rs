//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Form input:
//!     → sanitize.rs (strip controls, markup, dangerous patterns)
//!     → validate.rs (per-field pattern checks)
//!     → rate_limit.rs (endpoint window + form quota)
//!     → csrf.rs (attach token)
//!     → Pass to the submission orchestrator
//! Anomalies from every stage land in events.rs.
//! ```
//!
//! # Design Decisions
//! - All mutable state lives in one [`SecurityContext`] constructed at
//!   startup and passed to consumers, so tests get a fresh instance
//! - Pure checks (sanitize, patterns) stay free functions
//! - Fail closed on validation, fail open on CSRF (enforcement is
//!   server-side; a missing token is logged, never fatal)

pub mod csrf;
pub mod events;
pub mod file_check;
pub mod patterns;
pub mod rate_limit;
pub mod sanitize;
pub mod selftest;
pub mod validate;

use std::sync::Arc;

use crate::config::SecurityConfig;
use crate::storage::SessionStore;

pub use csrf::{CsrfManager, CSRF_HEADER};
pub use events::{EventKind, SecurityEvent, SecurityLog, Severity};
pub use file_check::{validate_file, ProofFile, MAX_UPLOAD_BYTES};
pub use rate_limit::{RateLimiter, SubmissionGuard};
pub use sanitize::{sanitize, sanitize_input};
pub use selftest::{run_security_tests, SecurityTestResult};
pub use validate::{validate_input, FieldKind, ValidationOutcome};

/// Snapshot of the security state for the monitoring view.
#[derive(Debug, Clone)]
pub struct SecurityStats {
    pub events: Vec<SecurityEvent>,
    pub submission_count: u32,
    pub last_submission_ms: u64,
}

/// All mutable security state, constructed once at application start.
pub struct SecurityContext {
    pub log: SecurityLog,
    pub rate_limiter: RateLimiter,
    pub csrf: CsrfManager,
    pub guard: SubmissionGuard,
}

impl SecurityContext {
    pub fn new(store: Arc<SessionStore>, config: &SecurityConfig) -> Self {
        Self {
            log: SecurityLog::new(store.clone()),
            rate_limiter: RateLimiter::new(
                config.rate_limit_window_secs * 1000,
                config.rate_limit_max,
            ),
            csrf: CsrfManager::new(store),
            guard: SubmissionGuard::new(
                config.max_form_submissions,
                config.rate_limit_window_secs * 1000,
            ),
        }
    }

    /// Context with the stock thresholds, backed by the given store.
    pub fn with_defaults(store: Arc<SessionStore>) -> Self {
        Self::new(store, &SecurityConfig::default())
    }

    /// Mint the CSRF token and record the startup notice. Called once
    /// when the client comes up.
    pub fn initialize(&self) {
        self.csrf.generate();
        self.log
            .record(EventKind::Info, "Security features initialized", Severity::Low);
    }

    /// Events plus the form-quota counters, for the monitoring view.
    pub fn stats(&self) -> SecurityStats {
        let (submission_count, last_submission_ms) = self.guard.stats();
        SecurityStats {
            events: self.log.snapshot(),
            submission_count,
            last_submission_ms,
        }
    }

    /// Wipe events, quota counters, and the CSRF token.
    pub fn clear_security_data(&self) {
        self.log.clear();
        self.guard.reset();
        self.csrf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_context() -> SecurityContext {
        SecurityContext::with_defaults(Arc::new(SessionStore::in_memory()))
    }

    #[test]
    fn test_initialize_mints_token_and_logs_info() {
        let ctx = fresh_context();
        ctx.initialize();

        assert!(ctx.csrf.current().is_some());
        let events = ctx.log.snapshot();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Info);
        assert_eq!(events[0].severity, Severity::Low);
    }

    #[test]
    fn test_clear_resets_everything() {
        let ctx = fresh_context();
        ctx.initialize();
        ctx.guard.try_acquire("form", &ctx.log);

        ctx.clear_security_data();

        let stats = ctx.stats();
        assert!(stats.events.is_empty());
        assert_eq!(stats.submission_count, 0);
        assert_eq!(stats.last_submission_ms, 0);
        assert!(ctx.csrf.current().is_none());
    }

    #[test]
    fn test_stats_reflect_quota_usage() {
        let ctx = fresh_context();
        ctx.guard.try_acquire("form", &ctx.log);
        ctx.guard.try_acquire("form", &ctx.log);

        assert_eq!(ctx.stats().submission_count, 2);
    }
}
