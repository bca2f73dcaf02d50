//! Per-form submission state.
//!
//! One instance per mounted donation form. Holds the donor's fields,
//! the per-field error map, and the attempt phase, and enforces that
//! a form never has two submissions in flight.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::security::ProofFile;
use crate::submit::donation::DonationForm;
use crate::submit::orchestrator::SecureClient;
use crate::submit::types::{DonationOutcome, SubmitError};

/// Where a form currently stands.
///
/// `Editing → Submitting → {Confirmed | Editing}`; `Confirmed` returns
/// to a fresh `Editing` only through [`FormState::reset`] (the donor's
/// explicit "submit another").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    Submitting,
    Confirmed,
}

#[derive(Debug, Clone)]
struct FormInner {
    form: DonationForm,
    errors: HashMap<String, String>,
    phase: FormPhase,
    /// Server message for a rejection, surfaced verbatim.
    server_error: Option<String>,
    /// Reference from the confirmed receipt, for the confirmation view.
    confirmed_reference: Option<String>,
}

impl FormInner {
    fn empty() -> Self {
        Self {
            form: DonationForm::default(),
            errors: HashMap::new(),
            phase: FormPhase::Editing,
            server_error: None,
            confirmed_reference: None,
        }
    }
}

/// Mutable state of one donation form instance.
pub struct FormState {
    inner: Mutex<FormInner>,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(FormInner::empty()),
        }
    }

    /// Apply an edit to the fields. Ignored while a submission is in
    /// flight or after confirmation; editing also clears stale errors
    /// for the next validation pass.
    pub fn edit(&self, apply: impl FnOnce(&mut DonationForm)) {
        let mut inner = self.inner.lock().expect("form state mutex poisoned");
        if inner.phase != FormPhase::Editing {
            return;
        }
        apply(&mut inner.form);
        inner.errors.clear();
        inner.server_error = None;
    }

    pub fn form(&self) -> DonationForm {
        self.inner.lock().expect("form state mutex poisoned").form.clone()
    }

    pub fn phase(&self) -> FormPhase {
        self.inner.lock().expect("form state mutex poisoned").phase
    }

    pub fn errors(&self) -> HashMap<String, String> {
        self.inner
            .lock()
            .expect("form state mutex poisoned")
            .errors
            .clone()
    }

    pub fn server_error(&self) -> Option<String> {
        self.inner
            .lock()
            .expect("form state mutex poisoned")
            .server_error
            .clone()
    }

    pub fn confirmed_reference(&self) -> Option<String> {
        self.inner
            .lock()
            .expect("form state mutex poisoned")
            .confirmed_reference
            .clone()
    }

    /// Back to an empty editing state, e.g. "submit another donation".
    pub fn reset(&self) {
        let mut inner = self.inner.lock().expect("form state mutex poisoned");
        *inner = FormInner::empty();
    }

    /// Claim the submitting phase. Fails when a submission is already
    /// in flight or the form is already confirmed.
    fn begin(&self) -> Result<DonationForm, SubmitError> {
        let mut inner = self.inner.lock().expect("form state mutex poisoned");
        match inner.phase {
            FormPhase::Editing => {
                inner.phase = FormPhase::Submitting;
                inner.errors.clear();
                inner.server_error = None;
                Ok(inner.form.clone())
            }
            FormPhase::Submitting | FormPhase::Confirmed => Err(SubmitError::InFlight),
        }
    }

    fn settle(&self, result: &Result<DonationOutcome, SubmitError>) {
        let mut inner = self.inner.lock().expect("form state mutex poisoned");
        match result {
            Ok(DonationOutcome::Confirmed(receipt)) => {
                let reference = receipt.transaction_reference.clone();
                // Success wipes the fields; error state cannot coexist.
                *inner = FormInner::empty();
                inner.phase = FormPhase::Confirmed;
                inner.confirmed_reference = reference;
            }
            Ok(DonationOutcome::Rejected { message }) => {
                inner.phase = FormPhase::Editing;
                inner.server_error = Some(message.clone());
            }
            Err(SubmitError::InvalidForm(errors)) => {
                inner.phase = FormPhase::Editing;
                inner.errors = errors.clone();
            }
            Err(_) => {
                inner.phase = FormPhase::Editing;
            }
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl SecureClient {
    /// Submit the form held by `state`, keeping its phase and error
    /// map in step with the attempt. At most one submission per form
    /// instance is in flight at a time.
    pub async fn submit_form(
        &self,
        state: &FormState,
        proof: Option<&ProofFile>,
    ) -> Result<DonationOutcome, SubmitError> {
        let form = state.begin()?;
        let result = self.submit_confirmation(&form, proof).await;
        if let Err(error) = &result {
            self.record_submit_failure(error);
        }
        state.settle(&result);
        result
    }
}
