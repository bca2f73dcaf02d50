//! Persisted client state.
//!
//! # Responsibilities
//! - Hold the small set of values that survive restarts: language
//!   preference, CSRF token + expiration, buffered security events
//! - Namespace everything under fixed keys
//!
//! # Design Decisions
//! - Single JSON file, loaded once and rewritten on every change
//! - Storage failures are logged and swallowed: losing session state
//!   degrades gracefully, it never takes the client down

pub mod session;

pub use session::SessionStore;

/// Storage key for the active language preference.
pub const LANGUAGE_KEY: &str = "i18nextLng";

/// Storage key for the CSRF token value.
pub const CSRF_TOKEN_KEY: &str = "csrf_token";

/// Storage key for the CSRF token expiration (epoch millis, decimal).
pub const CSRF_EXPIRATION_KEY: &str = "csrf_expiration";

/// Storage key for the buffered security events (JSON array).
pub const SECURITY_EVENTS_KEY: &str = "security_events";
