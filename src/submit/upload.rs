//! Upload state tracking.
//!
//! Progress here is cosmetic: the file is already in memory, so the
//! tracker simulates an upload with a ticking progress value and
//! reconciles to 100% when the (jittered) completion timer fires.
//! Clearing mid-flight must abort both timers; an orphaned ticker is
//! a leak, not a harmless leftover.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::Rng;
use tokio::task::JoinHandle;

use crate::security::{validate_file, EventKind, ProofFile, SecurityContext, Severity};

/// Where an upload currently stands.
///
/// `Empty → Validating → Uploading → Ready`; a validation failure
/// falls back to `Empty` with an error message, and a new selection
/// while `Ready` or `Uploading` replaces the prior file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Empty,
    Validating,
    Uploading,
    Ready,
}

/// Snapshot of the upload state handed to the UI.
#[derive(Debug, Clone)]
pub struct UploadState {
    pub phase: UploadPhase,
    pub file: Option<ProofFile>,
    pub progress: u8,
    pub error: Option<String>,
    /// Data-URI preview, populated for image files only.
    pub preview: Option<String>,
}

impl UploadState {
    fn empty() -> Self {
        Self {
            phase: UploadPhase::Empty,
            file: None,
            progress: 0,
            error: None,
            preview: None,
        }
    }
}

struct UploadInner {
    state: UploadState,
    progress_task: Option<JoinHandle<()>>,
    finish_task: Option<JoinHandle<()>>,
}

/// Tracks one form's proof-image selection.
#[derive(Clone)]
pub struct UploadTracker {
    inner: Arc<Mutex<UploadInner>>,
    security: Arc<SecurityContext>,
    tick: Duration,
    base_duration: Duration,
}

impl UploadTracker {
    pub fn new(security: Arc<SecurityContext>) -> Self {
        Self::with_timing(security, Duration::from_millis(200), Duration::from_millis(1500))
    }

    /// Timing hook so tests don't wait out the simulation.
    pub fn with_timing(
        security: Arc<SecurityContext>,
        tick: Duration,
        base_duration: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(UploadInner {
                state: UploadState::empty(),
                progress_task: None,
                finish_task: None,
            })),
            security,
            tick,
            base_duration,
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> UploadState {
        self.inner.lock().expect("upload mutex poisoned").state.clone()
    }

    /// Select a file: validate, then start the simulated upload.
    /// Returns the validation error when the file is refused.
    pub fn select(&self, file: ProofFile) -> Result<(), String> {
        self.cancel_tasks();

        {
            let mut inner = self.inner.lock().expect("upload mutex poisoned");
            inner.state.phase = UploadPhase::Validating;
        }

        let outcome = validate_file(&file, &self.security.log);
        if let Some(error) = outcome.error {
            self.security.log.record(
                EventKind::InjectionAttempt,
                &format!("File validation failed: {error}"),
                Severity::Medium,
            );
            let mut inner = self.inner.lock().expect("upload mutex poisoned");
            inner.state = UploadState::empty();
            inner.state.error = Some(error.clone());
            return Err(error);
        }

        let preview = if file.is_image() {
            Some(format!("data:{};base64,{}", file.mime, BASE64.encode(&file.bytes)))
        } else {
            None
        };

        // Both tasks are spawned and their handles stored under the
        // same lock that flips the phase to Uploading. The tasks begin
        // by taking this lock, so neither can observe its own handle
        // missing, and the finish timer always finds the ticker to
        // abort.
        let mut inner = self.inner.lock().expect("upload mutex poisoned");
        inner.state = UploadState::empty();
        inner.state.phase = UploadPhase::Uploading;
        inner.state.file = Some(file);

        let ticker_inner = self.inner.clone();
        inner.progress_task = Some(tokio::spawn({
            let tick = self.tick;
            async move {
                let mut interval = tokio::time::interval(tick);
                interval.tick().await; // first tick fires immediately
                loop {
                    interval.tick().await;
                    let increment = rand::thread_rng().gen_range(0..30) as u8;
                    let mut inner = ticker_inner.lock().expect("upload mutex poisoned");
                    inner.state.progress = (inner.state.progress + increment).min(90);
                }
            }
        }));

        let finish_inner = self.inner.clone();
        let jitter = rand::thread_rng().gen_range(0..1000);
        let total = self.base_duration + Duration::from_millis(jitter);
        inner.finish_task = Some(tokio::spawn(async move {
            tokio::time::sleep(total).await;

            let ticker = {
                let mut inner = finish_inner.lock().expect("upload mutex poisoned");
                inner.progress_task.take()
            };
            if let Some(handle) = ticker {
                handle.abort();
            }

            let mut inner = finish_inner.lock().expect("upload mutex poisoned");
            inner.state.phase = UploadPhase::Ready;
            inner.state.progress = 100;
            inner.state.preview = preview;
            inner.finish_task = None;
        }));

        Ok(())
    }

    /// Drop the selection, aborting any in-flight simulation.
    pub fn clear(&self) {
        self.cancel_tasks();
        let mut inner = self.inner.lock().expect("upload mutex poisoned");
        inner.state = UploadState::empty();
    }

    fn cancel_tasks(&self) {
        let (progress, finish) = {
            let mut inner = self.inner.lock().expect("upload mutex poisoned");
            (inner.progress_task.take(), inner.finish_task.take())
        };
        if let Some(handle) = progress {
            handle.abort();
        }
        if let Some(handle) = finish {
            handle.abort();
        }
    }
}
