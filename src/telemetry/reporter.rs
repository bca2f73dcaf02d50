//! Periodic security-event reporting.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::json;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::{MonitoringConfig, TimeoutConfig};
use crate::security::SecurityContext;

/// How often expired events are swept out of the buffer.
const EXPIRY_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Ships the buffered security events to the monitoring endpoint.
///
/// Delivery is at-least-once: shipped events are removed only after a
/// 2xx response, so a failed report retries the same events next
/// interval, and events recorded mid-flight are never lost.
pub struct TelemetryReporter {
    http: reqwest::Client,
    endpoint: String,
    enabled: bool,
    interval: Duration,
    timeout: Duration,
    security: Arc<SecurityContext>,
}

impl TelemetryReporter {
    pub fn new(
        monitoring: &MonitoringConfig,
        timeouts: &TimeoutConfig,
        security: Arc<SecurityContext>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: monitoring.endpoint.clone(),
            enabled: monitoring.enabled,
            interval: Duration::from_secs(monitoring.report_interval_secs),
            timeout: Duration::from_secs(timeouts.request_secs),
            security,
        }
    }

    /// Ship the current buffer once. Nothing to ship is a success.
    pub async fn report_once(&self) -> Result<usize, reqwest::Error> {
        let events = self.security.log.snapshot();
        if events.is_empty() {
            return Ok(0);
        }

        let count = events.len();
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        let response = self
            .http
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(&json!({
                "events": events,
                "timestamp": timestamp_ms,
            }))
            .send()
            .await?;

        if response.status().is_success() {
            // Remove only what was shipped; events recorded while the
            // request was in flight stay for the next interval.
            self.security.log.drain_oldest(count);
            tracing::info!(count, "Reported security events");
        } else {
            // Keep the buffer: the next interval retries.
            tracing::warn!(
                status = response.status().as_u16(),
                "Monitoring endpoint refused event report"
            );
        }

        Ok(count)
    }

    async fn report_loop(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.interval);
        interval.tick().await; // immediate first tick
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.report_once().await {
                        tracing::warn!(error = %e, "Security event report failed");
                    }
                }
                _ = shutdown.changed() => {
                    tracing::info!("Telemetry reporter stopping");
                    return;
                }
            }
        }
    }

    async fn expiry_loop(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(EXPIRY_SWEEP_INTERVAL);
        interval.tick().await;
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.security.log.expire();
                }
                _ = shutdown.changed() => return,
            }
        }
    }

    /// Spawn the reporting and expiry loops. Returns no handles when
    /// monitoring is disabled.
    pub fn spawn(self: Arc<Self>, shutdown: &super::Shutdown) -> Vec<JoinHandle<()>> {
        if !self.enabled {
            tracing::info!("Security monitoring disabled");
            return Vec::new();
        }

        vec![
            tokio::spawn(self.clone().report_loop(shutdown.subscribe())),
            tokio::spawn(self.expiry_loop(shutdown.subscribe())),
        ]
    }
}
