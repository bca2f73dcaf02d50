//! Uploaded-file validation.

use std::path::Path;

use crate::security::events::{EventKind, SecurityLog, Severity};
use crate::security::patterns::FILENAME_PATTERNS;
use crate::security::validate::ValidationOutcome;

/// Upload size ceiling: 5 MB.
pub const MAX_UPLOAD_BYTES: usize = 5_000_000;

/// MIME types accepted for proof-of-donation images.
pub const ALLOWED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];

/// A file handed to the donation flow: name, declared MIME type, and
/// the raw bytes.
#[derive(Debug, Clone)]
pub struct ProofFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ProofFile {
    pub fn new(name: &str, mime: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            mime: mime.to_string(),
            bytes,
        }
    }

    /// Read a file from disk, inferring the MIME type from the
    /// extension the way a browser file input would report it.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let mime = match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("png") => "image/png",
            _ => "application/octet-stream",
        };

        Ok(Self::new(&name, mime, bytes))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }
}

/// Check an upload before it may join a submission.
///
/// Checks run in a fixed order (size, then type, then filename) and
/// the first failure wins. A hostile filename additionally records an
/// `injection_attempt` event at high severity.
pub fn validate_file(file: &ProofFile, log: &SecurityLog) -> ValidationOutcome {
    if file.size() > MAX_UPLOAD_BYTES {
        let size_mb = file.size() as f64 / 1_000_000.0;
        return ValidationOutcome::fail(&format!(
            "File size must be less than 5MB. Your file is {size_mb:.2}MB"
        ));
    }

    if !ALLOWED_MIME_TYPES.contains(&file.mime.as_str()) {
        return ValidationOutcome::fail("Please upload a JPG or PNG image file");
    }

    for pattern in FILENAME_PATTERNS.iter() {
        if pattern.is_match(&file.name) {
            log.record(
                EventKind::InjectionAttempt,
                &format!("Suspicious filename: {}", file.name),
                Severity::High,
            );
            return ValidationOutcome::fail("Invalid filename detected");
        }
    }

    ValidationOutcome::ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SessionStore;
    use std::sync::Arc;

    fn fresh_log() -> SecurityLog {
        SecurityLog::new(Arc::new(SessionStore::in_memory()))
    }

    #[test]
    fn test_size_boundary() {
        let log = fresh_log();

        let at_limit = ProofFile::new("proof.png", "image/png", vec![0; MAX_UPLOAD_BYTES]);
        assert!(validate_file(&at_limit, &log).is_valid);

        let over = ProofFile::new("proof.png", "image/png", vec![0; MAX_UPLOAD_BYTES + 1]);
        let outcome = validate_file(&over, &log);
        assert!(!outcome.is_valid);
        assert!(outcome.error.unwrap().contains("5.00MB"));
    }

    #[test]
    fn test_mime_allow_list() {
        let log = fresh_log();

        for mime in ALLOWED_MIME_TYPES {
            let file = ProofFile::new("proof.png", mime, vec![0; 10]);
            assert!(validate_file(&file, &log).is_valid);
        }

        let pdf = ProofFile::new("proof.pdf", "application/pdf", vec![0; 10]);
        let outcome = validate_file(&pdf, &log);
        assert!(!outcome.is_valid);
        assert_eq!(
            outcome.error.as_deref(),
            Some("Please upload a JPG or PNG image file")
        );
    }

    #[test]
    fn test_path_traversal_rejected() {
        let log = fresh_log();
        let file = ProofFile::new("../evil.png", "image/png", vec![0; 10]);
        let outcome = validate_file(&file, &log);
        assert!(!outcome.is_valid);
        assert_eq!(outcome.error.as_deref(), Some("Invalid filename detected"));

        let events = log.snapshot();
        assert_eq!(events[0].kind, EventKind::InjectionAttempt);
        assert_eq!(events[0].severity, Severity::High);
    }

    #[test]
    fn test_hostile_filenames_rejected() {
        let log = fresh_log();
        for name in ["<script>.png", "javascript:x.png", "a|b.png", "a?.png"] {
            let file = ProofFile::new(name, "image/png", vec![0; 10]);
            assert!(!validate_file(&file, &log).is_valid, "accepted {name:?}");
        }
    }

    #[test]
    fn test_size_checked_before_type() {
        let log = fresh_log();
        let file = ProofFile::new("big.pdf", "application/pdf", vec![0; MAX_UPLOAD_BYTES + 1]);
        let outcome = validate_file(&file, &log);
        assert!(outcome.error.unwrap().contains("File size"));
    }
}
