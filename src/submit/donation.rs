//! Donation confirmation flow.
//!
//! The one path that carries money-adjacent data: whole-form
//! validation with a per-field error map, both rate-limit gates, and
//! a multipart POST carrying the optional proof image.

use std::collections::HashMap;

use reqwest::multipart;

use crate::security::{
    sanitize_input, validate_file, validate_input, EventKind, FieldKind, ProofFile, Severity,
    CSRF_HEADER,
};
use crate::submit::orchestrator::SecureClient;
use crate::submit::types::{
    BackendRejection, DonationFields, DonationOutcome, DonationReceipt, SubmitError,
};

/// Multipart field name the backend expects for the proof image.
const PROOF_IMAGE_FIELD: &str = "proof_image";

/// Identifier used for the form-quota gate and its log entries.
const DONATION_FORM_ID: &str = "donation-form";

/// Raw donor input as typed, before sanitization.
#[derive(Debug, Clone, Default)]
pub struct DonationForm {
    pub transaction_reference: String,
    pub name: String,
    pub contact: String,
    pub bank: String,
    pub amount: String,
    pub message: String,
}

impl DonationForm {
    /// Sanitized fields in wire shape. Optional fields collapse to
    /// `None` when empty after sanitization.
    fn sanitized(&self) -> DonationFields {
        let reference = sanitize_input(&self.transaction_reference, 100);
        let message = sanitize_input(&self.message, 500);

        DonationFields {
            transaction_reference: non_empty(reference.trim()),
            donor_name: sanitize_input(&self.name, 100),
            donor_contact: sanitize_input(&self.contact, 100),
            bank_used: self.bank.clone(),
            amount_donated: sanitize_input(&self.amount, 50),
            message: non_empty(&message),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl SecureClient {
    /// Validate the whole form, returning one message per offending
    /// field. An empty map means the form may be submitted.
    pub fn validate_form(&self, form: &DonationForm) -> HashMap<String, String> {
        let log = &self.security.log;
        let mut errors = HashMap::new();

        let name = sanitize_input(&form.name, 100);
        if name.trim().is_empty() {
            errors.insert("name".to_string(), "Full name is required".to_string());
        } else {
            let outcome = validate_input(&name, FieldKind::Name, log);
            if let Some(error) = outcome.error {
                errors.insert("name".to_string(), error);
            }
        }

        let contact = sanitize_input(&form.contact, 100);
        if contact.trim().is_empty() {
            errors.insert(
                "contact".to_string(),
                "Email or phone number is required".to_string(),
            );
        } else {
            // The contact field accepts either an email or a phone
            // number; an @ decides which shape applies.
            let kind = if contact.contains('@') {
                FieldKind::Email
            } else {
                FieldKind::Phone
            };
            let outcome = validate_input(&contact, kind, log);
            if let Some(error) = outcome.error {
                errors.insert("contact".to_string(), error);
            }
        }

        if form.bank.is_empty() {
            errors.insert(
                "bank".to_string(),
                "Please select the bank you used".to_string(),
            );
        }

        let amount = sanitize_input(&form.amount, 50);
        if amount.trim().is_empty() {
            errors.insert(
                "amount".to_string(),
                "Donation amount is required".to_string(),
            );
        } else {
            let outcome = validate_input(&amount, FieldKind::Amount, log);
            if let Some(error) = outcome.error {
                errors.insert("amount".to_string(), error);
            }
        }

        let reference = sanitize_input(&form.transaction_reference, 100);
        if !reference.trim().is_empty() {
            let outcome = validate_input(reference.trim(), FieldKind::TransactionRef, log);
            if let Some(error) = outcome.error {
                errors.insert("transaction_reference".to_string(), error);
            }
        }

        let message = sanitize_input(&form.message, 500);
        if !message.trim().is_empty() {
            let outcome = validate_input(&message, FieldKind::Message, log);
            if let Some(error) = outcome.error {
                errors.insert("message".to_string(), error);
            }
        }

        errors
    }

    /// Submit a donation confirmation.
    ///
    /// Runs validate → quota gate → endpoint gate → multipart POST.
    /// A backend rejection is an `Ok(Rejected)` value; errors mean the
    /// submission never completed.
    pub async fn submit_confirmation(
        &self,
        form: &DonationForm,
        proof: Option<&ProofFile>,
    ) -> Result<DonationOutcome, SubmitError> {
        let log = &self.security.log;

        let errors = self.validate_form(form);
        if !errors.is_empty() {
            log.record(
                EventKind::ValidationError,
                "Form validation failed on client side",
                Severity::Medium,
            );
            return Err(SubmitError::InvalidForm(errors));
        }

        if !self.security.guard.try_acquire(DONATION_FORM_ID, log) {
            return Err(SubmitError::SubmissionQuota);
        }

        let url = self.config.api.submit_url();
        if !self.security.rate_limiter.check(&url, log) {
            return Err(SubmitError::RateLimited);
        }

        let fields = form.sanitized();
        let mut multipart_form = multipart::Form::new()
            .text("donor_name", fields.donor_name)
            .text("donor_contact", fields.donor_contact)
            .text("bank_used", fields.bank_used)
            .text("amount_donated", fields.amount_donated);

        if let Some(reference) = fields.transaction_reference {
            multipart_form = multipart_form.text("transaction_reference", reference);
        }
        if let Some(message) = fields.message {
            multipart_form = multipart_form.text("message", message);
        }

        if let Some(file) = proof {
            let outcome = validate_file(file, log);
            if let Some(error) = outcome.error {
                return Err(SubmitError::InvalidFile(error));
            }

            let part = multipart::Part::bytes(file.bytes.clone())
                .file_name(file.name.clone())
                .mime_str(&file.mime)?;
            multipart_form = multipart_form.part(PROOF_IMAGE_FIELD, part);
        }

        let mut request = self
            .http
            .post(&url)
            .timeout(self.request_timeout())
            .multipart(multipart_form);

        match self.security.csrf.current() {
            Some(token) => request = request.header(CSRF_HEADER, token),
            None => tracing::debug!("No CSRF token available for donation submission"),
        }

        let response = request.send().await.map_err(SubmitError::from_transport)?;
        let status = response.status();

        if status.is_success() {
            let receipt: DonationReceipt =
                response.json().await.map_err(SubmitError::from_transport)?;
            log.record(
                EventKind::Info,
                "Donation form submitted successfully",
                Severity::Low,
            );
            Ok(DonationOutcome::Confirmed(receipt))
        } else {
            let rejection: BackendRejection = response.json().await.unwrap_or_default();
            let message = rejection.into_message();
            log.record(
                EventKind::ValidationError,
                &format!("Backend validation error: {message}"),
                Severity::Medium,
            );
            Ok(DonationOutcome::Rejected { message })
        }
    }

    /// Record a submission failure at the severity its class deserves.
    /// Called by the UI layer before showing the generic retry prompt.
    pub fn record_submit_failure(&self, error: &SubmitError) {
        let log = &self.security.log;
        match error {
            SubmitError::RateLimited | SubmitError::SubmissionQuota => {
                log.record(
                    EventKind::RateLimit,
                    "Frontend rate limit triggered",
                    Severity::High,
                );
            }
            SubmitError::InvalidForm(errors)
                if errors.values().any(|e| e == "Invalid input detected") =>
            {
                log.record(
                    EventKind::InjectionAttempt,
                    "Client-side validation caught hostile input",
                    Severity::Critical,
                );
            }
            other => {
                log.record(
                    EventKind::ValidationError,
                    &format!("Form submission error: {other}"),
                    Severity::Medium,
                );
            }
        }
    }
}
