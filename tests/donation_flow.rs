//! End-to-end donation submission against a mock backend.

mod common;

use std::sync::Arc;

use serde_json::json;

use charity_client::config::ClientConfig;
use charity_client::security::{EventKind, ProofFile, Severity};
use charity_client::storage::SessionStore;
use charity_client::submit::{DonationForm, DonationOutcome, SecureClient, SubmitError};
use charity_client::SecurityContext;

use common::{start_mock_backend, MockBackend};

fn client_for(backend: &MockBackend) -> SecureClient {
    let mut config = ClientConfig::default();
    config.api.base_url = format!("http://{}", backend.addr);

    let store = Arc::new(SessionStore::in_memory());
    let security = Arc::new(SecurityContext::new(store, &config.security));
    security.initialize();

    SecureClient::new(config, security)
}

fn valid_form() -> DonationForm {
    DonationForm {
        transaction_reference: "TXN-001".into(),
        name: "Ahmed Ali".into(),
        contact: "ahmed@example.com".into(),
        bank: "commercial-bank".into(),
        amount: "500".into(),
        message: "For the school project".into(),
    }
}

#[tokio::test]
async fn test_successful_submission() {
    let backend = start_mock_backend(|_| {
        (
            200,
            json!({ "transaction_reference": "TXN-001" }).to_string(),
        )
    })
    .await;

    let client = client_for(&backend);
    let outcome = client
        .submit_confirmation(&valid_form(), None)
        .await
        .unwrap();

    match outcome {
        DonationOutcome::Confirmed(receipt) => {
            assert_eq!(receipt.transaction_reference.as_deref(), Some("TXN-001"));
        }
        other => panic!("expected Confirmed, got {other:?}"),
    }

    assert_eq!(backend.hits(), 1);
    let request = backend.last_request().unwrap();
    assert!(request.head.starts_with("POST /api/submit-donation"));

    // Multipart body carries the sanitized fields.
    let body = request.body_text();
    assert!(body.contains("name=\"donor_name\""));
    assert!(body.contains("Ahmed Ali"));
    assert!(body.contains("name=\"transaction_reference\""));
    assert!(body.contains("TXN-001"));

    // The minted CSRF token rides along as a header.
    let token = request.header("X-CSRF-Token").unwrap();
    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));

    let events = client.security().log.snapshot();
    assert_eq!(events[0].kind, EventKind::Info);
    assert!(events[0].details.contains("submitted successfully"));
}

#[tokio::test]
async fn test_proof_image_attached() {
    let backend = start_mock_backend(|_| (200, json!({}).to_string())).await;
    let client = client_for(&backend);

    let proof = ProofFile::new("receipt.png", "image/png", vec![0x89, 0x50, 0x4E, 0x47]);
    client
        .submit_confirmation(&valid_form(), Some(&proof))
        .await
        .unwrap();

    let body = backend.last_request().unwrap().body_text();
    assert!(body.contains("name=\"proof_image\""));
    assert!(body.contains("filename=\"receipt.png\""));
    assert!(body.contains("image/png"));
}

#[tokio::test]
async fn test_hostile_proof_image_rejected_before_network() {
    let backend = start_mock_backend(|_| (200, json!({}).to_string())).await;
    let client = client_for(&backend);

    let proof = ProofFile::new("../evil.png", "image/png", vec![0]);
    let result = client.submit_confirmation(&valid_form(), Some(&proof)).await;

    match result {
        Err(SubmitError::InvalidFile(message)) => {
            assert_eq!(message, "Invalid filename detected");
        }
        other => panic!("expected InvalidFile, got {other:?}"),
    }
    assert_eq!(backend.hits(), 0);
}

#[tokio::test]
async fn test_submission_quota_enforced() {
    let backend = start_mock_backend(|_| (200, json!({}).to_string())).await;
    let client = client_for(&backend);
    let form = valid_form();

    for _ in 0..5 {
        let outcome = client.submit_confirmation(&form, None).await.unwrap();
        assert!(matches!(outcome, DonationOutcome::Confirmed(_)));
    }

    let result = client.submit_confirmation(&form, None).await;
    assert!(matches!(result, Err(SubmitError::SubmissionQuota)));

    // The sixth attempt was refused before any network traffic.
    assert_eq!(backend.hits(), 5);

    let events = client.security().log.snapshot();
    assert_eq!(events[0].kind, EventKind::RateLimit);
    assert_eq!(events[0].severity, Severity::High);
}

#[tokio::test]
async fn test_backend_rejection_is_an_outcome() {
    let backend = start_mock_backend(|_| {
        (
            400,
            json!({ "detail": "Amount exceeds the transfer limit" }).to_string(),
        )
    })
    .await;

    let client = client_for(&backend);
    let outcome = client
        .submit_confirmation(&valid_form(), None)
        .await
        .unwrap();

    match outcome {
        DonationOutcome::Rejected { message } => {
            assert_eq!(message, "Amount exceeds the transfer limit");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }

    let events = client.security().log.snapshot();
    assert_eq!(events[0].kind, EventKind::ValidationError);
    assert!(events[0].details.contains("Amount exceeds the transfer limit"));
}

#[tokio::test]
async fn test_secure_submit_generic_endpoint() {
    let backend = start_mock_backend(|request| {
        // Echo back whether the payload arrived sanitized.
        let body = request.body_text();
        if body.contains("<script>") {
            (400, json!({ "detail": "hostile" }).to_string())
        } else {
            (200, json!({ "ok": true }).to_string())
        }
    })
    .await;

    let client = client_for(&backend);
    let payload = json!({
        "comment": "<script>alert(1)</script>Hello",
        "count": 3,
    });

    let response = client
        .secure_submit(&backend.url("/api/feedback"), &payload)
        .await
        .unwrap();

    assert!(response.is_success());
    let sent = backend.last_request().unwrap().body_text();
    assert!(!sent.contains("<script>"));
    assert!(sent.contains("Hello"));
}
