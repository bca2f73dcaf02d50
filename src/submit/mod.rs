//! Secure form submission.
//!
//! # Data Flow
//! ```text
//! Caller input:
//!     → donation.rs (whole-form validation, field error map)
//!     → rate_limit gates (form quota, endpoint window)
//!     → orchestrator.rs (sanitize payload, CSRF header, POST)
//!     → outcome classification (confirmed / rejected / failed)
//! ```
//!
//! # Design Decisions
//! - Failures carry a tagged [`SubmitError`]; callers branch on the
//!   variant, never on message text
//! - Server rejections are values, not errors: the backend answered,
//!   it just said no

pub mod donation;
pub mod form_state;
pub mod orchestrator;
pub mod types;
pub mod upload;

pub use donation::DonationForm;
pub use form_state::{FormPhase, FormState};
pub use orchestrator::{SecureClient, SubmitResponse};
pub use types::{DonationFields, DonationOutcome, DonationReceipt, SubmitError};
pub use upload::{UploadPhase, UploadState, UploadTracker};
