//! Input sanitization.

use crate::security::patterns::{CONTROL_CHARS, DANGEROUS_PATTERNS, HTML_TAGS};

/// Default length cap applied by [`sanitize_input`].
pub const DEFAULT_MAX_INPUT_LEN: usize = 1000;

/// Reduce untrusted text to plain, bounded content.
///
/// Strips control characters (keeping newline and tab), then repeats
/// the dangerous-pattern deletions and the markup-tag strip until the
/// text stops changing, then truncates to `max_length` characters.
/// The repeat matters: removing a tag can splice a dangerous token
/// back together (`ja<b>vascript:` becomes `javascript:`), so a
/// single round of each pass is not enough. Every pass only deletes,
/// so the loop terminates, and the output is a fixed point, which
/// makes the function idempotent. Pure; never logs and never fails.
/// Empty input yields an empty string.
pub fn sanitize_input(input: &str, max_length: usize) -> String {
    if input.is_empty() {
        return String::new();
    }

    let mut sanitized = CONTROL_CHARS.replace_all(input, "").into_owned();

    loop {
        let before = sanitized.clone();

        for pattern in DANGEROUS_PATTERNS.iter() {
            sanitized = pattern.replace_all(&sanitized, "").into_owned();
        }
        sanitized = HTML_TAGS.replace_all(&sanitized, "").into_owned();

        if sanitized == before {
            break;
        }
    }

    if sanitized.chars().count() > max_length {
        sanitized = sanitized.chars().take(max_length).collect();
    }

    sanitized
}

/// [`sanitize_input`] with the default length cap.
pub fn sanitize(input: &str) -> String {
    sanitize_input(input, DEFAULT_MAX_INPUT_LEN)
}
