//! Field validation.

use crate::security::events::{EventKind, SecurityLog, Severity};
use crate::security::patterns;

/// The field kinds the donation form knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Email,
    Phone,
    Amount,
    TransactionRef,
    Name,
    Message,
}

/// Result of a validation check. Validators never fail; a rejected
/// input comes back as a value with a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl ValidationOutcome {
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn fail(message: &str) -> Self {
        Self {
            is_valid: false,
            error: Some(message.to_string()),
        }
    }
}

fn error_message(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Email => "Please enter a valid email address",
        FieldKind::Phone => "Please enter a valid phone number",
        FieldKind::Amount => "Please enter a valid amount (e.g., 100, 1,000, or 100.50)",
        FieldKind::TransactionRef => "Please enter a valid transaction reference",
        FieldKind::Name => "Please enter a valid name",
        FieldKind::Message => "Message contains invalid characters",
    }
}

/// Validate `input` for the given field kind.
///
/// The dangerous-pattern screen runs first and takes precedence over
/// kind-specific checks: any hit records an `injection_attempt` event
/// at high severity and rejects with a deliberately generic message.
pub fn validate_input(input: &str, kind: FieldKind, log: &SecurityLog) -> ValidationOutcome {
    if input.is_empty() {
        return ValidationOutcome::fail("Input is required");
    }

    if let Some(pattern) = patterns::find_dangerous(input) {
        log.record(
            EventKind::InjectionAttempt,
            &format!("Dangerous pattern detected: {}", pattern.as_str()),
            Severity::High,
        );
        return ValidationOutcome::fail("Invalid input detected");
    }

    let pattern = match kind {
        FieldKind::Email => &patterns::EMAIL_PATTERN,
        FieldKind::Phone => &patterns::PHONE_PATTERN,
        FieldKind::Amount => &patterns::AMOUNT_PATTERN,
        FieldKind::TransactionRef => &patterns::TRANSACTION_REF_PATTERN,
        FieldKind::Name => &patterns::NAME_PATTERN,
        FieldKind::Message => &patterns::MESSAGE_PATTERN,
    };

    if !pattern.is_match(input) {
        return ValidationOutcome::fail(error_message(kind));
    }

    ValidationOutcome::ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SessionStore;
    use std::sync::Arc;

    fn fresh_log() -> SecurityLog {
        SecurityLog::new(Arc::new(SessionStore::in_memory()))
    }

    #[test]
    fn test_valid_inputs() {
        let log = fresh_log();
        assert!(validate_input("test@example.com", FieldKind::Email, &log).is_valid);
        assert!(validate_input("+251 911 123456", FieldKind::Phone, &log).is_valid);
        assert!(validate_input("1,000.50", FieldKind::Amount, &log).is_valid);
        assert!(validate_input("TXN-001", FieldKind::TransactionRef, &log).is_valid);
        assert!(validate_input("Ahmed Ali", FieldKind::Name, &log).is_valid);
        assert!(validate_input("Keep up the good work!", FieldKind::Message, &log).is_valid);
        assert!(log.is_empty());
    }

    #[test]
    fn test_pattern_mismatch_messages() {
        let log = fresh_log();
        let outcome = validate_input("not-an-email", FieldKind::Email, &log);
        assert!(!outcome.is_valid);
        assert_eq!(
            outcome.error.as_deref(),
            Some("Please enter a valid email address")
        );
        // A plain mismatch is not an anomaly.
        assert!(log.is_empty());
    }

    #[test]
    fn test_injection_takes_precedence() {
        let log = fresh_log();
        let outcome = validate_input("{{7*7}}@test.com", FieldKind::Email, &log);
        assert!(!outcome.is_valid);
        assert_eq!(outcome.error.as_deref(), Some("Invalid input detected"));

        let events = log.snapshot();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::InjectionAttempt);
        assert_eq!(events[0].severity, Severity::High);
    }

    #[test]
    fn test_scheme_in_phone_rejected() {
        let log = fresh_log();
        let outcome = validate_input("javascript:alert(1)", FieldKind::Phone, &log);
        assert!(!outcome.is_valid);
        assert_eq!(outcome.error.as_deref(), Some("Invalid input detected"));
    }

    #[test]
    fn test_empty_is_required() {
        let log = fresh_log();
        let outcome = validate_input("", FieldKind::Name, &log);
        assert!(!outcome.is_valid);
        assert_eq!(outcome.error.as_deref(), Some("Input is required"));
    }

    #[test]
    fn test_arabic_script_name_accepted() {
        let log = fresh_log();
        assert!(validate_input("محمد أحمد", FieldKind::Name, &log).is_valid);
    }
}
