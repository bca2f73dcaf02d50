//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! client. All types derive Serde traits for deserialization from
//! config files, and every section falls back to working defaults so
//! an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

/// Root configuration for the charity client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Donation backend settings.
    pub api: ApiConfig,

    /// Translation collaborator settings.
    pub translation: TranslationConfig,

    /// Security telemetry reporting.
    pub monitoring: MonitoringConfig,

    /// Rate-limit thresholds.
    pub security: SecurityConfig,

    /// Outbound request deadlines.
    pub timeouts: TimeoutConfig,

    /// Session persistence.
    pub storage: StorageConfig,
}

/// Donation backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Backend base URL (e.g., "https://api.example.org").
    pub base_url: String,

    /// Path of the donation-confirmation endpoint.
    pub submit_path: String,
}

impl ApiConfig {
    /// Full URL of the donation-confirmation endpoint.
    pub fn submit_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.submit_path)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            submit_path: "/api/submit-donation".to_string(),
        }
    }
}

/// Translation collaborator configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// Translation endpoint (Google Translate v2 shape).
    pub endpoint: String,

    /// API key. Missing or placeholder keys short-circuit every call
    /// to the deterministic fallback without touching the network.
    pub api_key: Option<String>,

    /// Cache entry lifetime in seconds.
    pub cache_ttl_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://translation.googleapis.com/language/translate/v2".to_string(),
            api_key: None,
            cache_ttl_secs: 3600,
        }
    }
}

/// Security telemetry reporting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MonitoringConfig {
    /// Enable the periodic reporter.
    pub enabled: bool,

    /// Monitoring endpoint receiving `{events, timestamp}` batches.
    pub endpoint: String,

    /// Reporting cadence in seconds.
    pub report_interval_secs: u64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "http://localhost:8000/api/security/events".to_string(),
            report_interval_secs: 300,
        }
    }
}

/// Rate-limit thresholds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Endpoint rate-limit window in seconds.
    pub rate_limit_window_secs: u64,

    /// Max requests per window per endpoint.
    pub rate_limit_max: u32,

    /// Max form submissions per rolling window.
    pub max_form_submissions: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            rate_limit_window_secs: 60,
            rate_limit_max: 10,
            max_form_submissions: 5,
        }
    }
}

/// Deadlines for outbound requests. Every fetch carries one; a hung
/// collaborator fails the operation instead of blocking it forever.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Donation submission and telemetry deadline in seconds.
    pub request_secs: u64,

    /// Translation request deadline in seconds.
    pub translation_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            translation_secs: 10,
        }
    }
}

/// Session persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the session-store file. `None` keeps state in memory.
    pub session_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_valid() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config.security.rate_limit_max, 10);
        assert_eq!(config.timeouts.request_secs, 30);
        assert!(config.translation.api_key.is_none());
    }

    #[test]
    fn test_submit_url_joins_cleanly() {
        let api = ApiConfig {
            base_url: "https://api.example.org/".to_string(),
            submit_path: "/api/submit-donation".to_string(),
        };
        assert_eq!(api.submit_url(), "https://api.example.org/api/submit-donation");
    }

    #[test]
    fn test_partial_override() {
        let config: ClientConfig = toml::from_str(
            r#"
            [security]
            max_form_submissions = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.security.max_form_submissions, 3);
        assert_eq!(config.security.rate_limit_max, 10);
    }
}
