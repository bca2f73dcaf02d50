//! Configuration validation.
//!
//! Serde handles the syntactic side; this pass checks semantics:
//! URLs must parse, windows and deadlines must be non-zero. All
//! violations are collected and returned together, not just the first.

use thiserror::Error;
use url::Url;

use crate::config::schema::ClientConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid URL")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    ZeroValue { field: &'static str },
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if Url::parse(value).is_err() {
        errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
}

fn check_nonzero(errors: &mut Vec<ValidationError>, field: &'static str, value: u64) {
    if value == 0 {
        errors.push(ValidationError::ZeroValue { field });
    }
}

/// Validate a parsed configuration. Pure; returns every violation.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url(&mut errors, "api.base_url", &config.api.base_url);
    check_url(&mut errors, "translation.endpoint", &config.translation.endpoint);
    if config.monitoring.enabled {
        check_url(&mut errors, "monitoring.endpoint", &config.monitoring.endpoint);
    }

    check_nonzero(
        &mut errors,
        "security.rate_limit_window_secs",
        config.security.rate_limit_window_secs,
    );
    check_nonzero(
        &mut errors,
        "security.rate_limit_max",
        config.security.rate_limit_max as u64,
    );
    check_nonzero(
        &mut errors,
        "security.max_form_submissions",
        config.security.max_form_submissions as u64,
    );
    check_nonzero(
        &mut errors,
        "translation.cache_ttl_secs",
        config.translation.cache_ttl_secs,
    );
    check_nonzero(
        &mut errors,
        "monitoring.report_interval_secs",
        config.monitoring.report_interval_secs,
    );
    check_nonzero(&mut errors, "timeouts.request_secs", config.timeouts.request_secs);
    check_nonzero(
        &mut errors,
        "timeouts.translation_secs",
        config.timeouts.translation_secs,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
