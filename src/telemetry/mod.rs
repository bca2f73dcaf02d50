//! Background telemetry.
//!
//! # Responsibilities
//! - Ship buffered security events to the monitoring endpoint on an
//!   interval
//! - Sweep expired events out of the buffer
//! - Coordinate clean shutdown of both loops

pub mod reporter;

pub use reporter::TelemetryReporter;

use tokio::sync::watch;

/// Coordinator for stopping background tasks.
///
/// Wraps a watch channel: tasks hold a receiver and exit when the
/// value flips to true.
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Receiver for a task to select on.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Signal every subscriber to stop.
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
