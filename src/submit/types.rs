//! Submission types and error definitions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sanitized donor fields as the backend expects them.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DonationFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_reference: Option<String>,
    pub donor_name: String,
    pub donor_contact: String,
    pub bank_used: String,
    pub amount_donated: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Success payload from the donation backend.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DonationReceipt {
    /// Reference echoed or assigned by the server, shown to the donor.
    /// Absent when the donor submitted without one.
    #[serde(default)]
    pub transaction_reference: Option<String>,
}

/// Error payload from the donation backend. The server reports under
/// either `detail` or `message` depending on the failure path.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct BackendRejection {
    pub detail: Option<String>,
    pub message: Option<String>,
}

impl BackendRejection {
    pub fn into_message(self) -> String {
        self.detail
            .or(self.message)
            .unwrap_or_else(|| "Submission failed".to_string())
    }
}

/// What became of a donation confirmation that reached the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DonationOutcome {
    /// Accepted; the receipt carries the transaction reference.
    Confirmed(DonationReceipt),
    /// The backend rejected the submission; `message` is surfaced to
    /// the donor verbatim.
    Rejected { message: String },
}

/// Failures on the way to (or through) the network, tagged so callers
/// classify structurally instead of matching message text.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Endpoint rate limit denied the request.
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    /// The per-form submission quota denied the request before it
    /// reached the network.
    #[error("Too many form submissions. Please wait a moment and try again.")]
    SubmissionQuota,

    /// The form instance already has a submission in flight (or an
    /// unacknowledged confirmation).
    #[error("A submission is already in progress.")]
    InFlight,

    /// Whole-form validation failed; the map carries one message per
    /// offending field.
    #[error("form validation failed")]
    InvalidForm(HashMap<String, String>),

    /// The attached file failed validation.
    #[error("{0}")]
    InvalidFile(String),

    /// The request exceeded its deadline.
    #[error("request timed out")]
    Timeout,

    /// Any other transport-level failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl SubmitError {
    /// Fold a reqwest failure into the taxonomy, keeping deadline
    /// expiry distinct from other transport errors.
    pub fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            SubmitError::Timeout
        } else {
            SubmitError::Transport(error)
        }
    }
}
