//! Security self-tests.
//!
//! Exercises the sanitizer, validators, rate limiter, and CSRF
//! manager against known-hostile inputs and reports structured
//! results. Wired to `charity-cli selftest` so a deployment can be
//! spot-checked without a browser.

use std::sync::Arc;

use serde::Serialize;

use crate::security::csrf::CsrfManager;
use crate::security::rate_limit::RateLimiter;
use crate::security::sanitize::sanitize;
use crate::security::validate::{validate_input, FieldKind};
use crate::security::{patterns, SecurityLog};
use crate::storage::SessionStore;

/// Outcome of one self-test.
#[derive(Debug, Clone, Serialize)]
pub struct SecurityTestResult {
    pub test_name: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SecurityTestResult {
    fn pass(name: &str, details: &str) -> Self {
        Self {
            test_name: name.to_string(),
            passed: true,
            details: Some(details.to_string()),
            error: None,
        }
    }

    fn fail(name: &str, error: &str) -> Self {
        Self {
            test_name: name.to_string(),
            passed: false,
            details: None,
            error: Some(error.to_string()),
        }
    }
}

/// Run the full self-test battery against throwaway state.
pub fn run_security_tests() -> Vec<SecurityTestResult> {
    let mut results = Vec::new();

    results.push(test_sanitization());
    results.extend(test_email_validation());
    results.push(test_rate_limiting());
    results.push(test_csrf_stability());
    results.push(test_dangerous_pattern_detection());

    results
}

fn scratch_log() -> SecurityLog {
    SecurityLog::new(Arc::new(SessionStore::in_memory()))
}

fn test_sanitization() -> SecurityTestResult {
    let malicious = r#"<script>alert("xss")</script>{{7*7}}test"#;
    let sanitized = sanitize(malicious);

    if sanitized.contains("<script>") || sanitized.contains("{{7*7}}") {
        SecurityTestResult::fail(
            "Input Sanitization",
            &format!("Dangerous content survived: {sanitized}"),
        )
    } else {
        SecurityTestResult::pass("Input Sanitization", "Malicious input reduced to plain text")
    }
}

fn test_email_validation() -> Vec<SecurityTestResult> {
    let log = scratch_log();
    let cases = [
        ("test@example.com", true),
        ("invalid-email", false),
        ("test@", false),
        ("{{7*7}}@test.com", false),
    ];

    cases
        .iter()
        .map(|(input, expected)| {
            let outcome = validate_input(input, FieldKind::Email, &log);
            let name = format!("Email Validation: {input}");
            if outcome.is_valid == *expected {
                SecurityTestResult::pass(&name, "Validation matched expectation")
            } else {
                SecurityTestResult::fail(
                    &name,
                    &format!("expected {expected}, got {}", outcome.is_valid),
                )
            }
        })
        .collect()
}

fn test_rate_limiting() -> SecurityTestResult {
    let limiter = RateLimiter::default();
    let log = scratch_log();

    let allowed = (0..15)
        .filter(|_| limiter.check("/selftest", &log))
        .count();

    if allowed == 10 {
        SecurityTestResult::pass("Rate Limiting", "10 of 15 burst requests allowed")
    } else {
        SecurityTestResult::fail("Rate Limiting", &format!("allowed {allowed} of 15"))
    }
}

fn test_csrf_stability() -> SecurityTestResult {
    let csrf = CsrfManager::new(Arc::new(SessionStore::in_memory()));
    let first = csrf.generate();
    let second = csrf.generate();

    if first != second {
        return SecurityTestResult::fail("CSRF Token", "token changed within its lifetime");
    }
    if first.len() != 64 || !first.chars().all(|c| c.is_ascii_hexdigit()) {
        return SecurityTestResult::fail("CSRF Token", "token is not 32 hex-encoded bytes");
    }
    SecurityTestResult::pass("CSRF Token", "Stable 64-char hex token")
}

fn test_dangerous_pattern_detection() -> SecurityTestResult {
    let hostile = [
        "<script>alert(1)</script>",
        "javascript:alert(1)",
        "${process.env.SECRET}",
        "eval(payload)",
    ];

    for input in hostile {
        if patterns::find_dangerous(input).is_none() {
            return SecurityTestResult::fail(
                "Dangerous Patterns",
                &format!("missed hostile input: {input}"),
            );
        }
    }
    if patterns::find_dangerous("an ordinary thank-you note").is_some() {
        return SecurityTestResult::fail("Dangerous Patterns", "false positive on benign input");
    }
    SecurityTestResult::pass("Dangerous Patterns", "All probes detected, benign text clean")
}
