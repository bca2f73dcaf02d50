//! Pattern tables for input screening.
//!
//! Two fixed tables drive the whole pipeline: the validation patterns
//! each field kind must match, and the ordered dangerous-pattern list
//! every input is screened against before anything else. The dangerous
//! list is deliberately broad (markup, URI schemes, template syntax,
//! call-like tokens, runtime introspection) because the backend treats
//! any of them as a probe, not a typo.

use once_cell::sync::Lazy;
use regex::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("pattern table entry must compile")
}

/// Patterns whose presence marks the input as hostile. Matches are
/// deleted by the sanitizer and rejected outright by the validator.
pub static DANGEROUS_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)<script[^>]*>.*?</script>",
        r"(?i)javascript:",
        r"(?i)on\w+\s*=",
        r"(?i)<object[^>]*>",
        r"(?i)<embed[^>]*>",
        r"(?i)<svg[^>]*>.*?</svg>",
        r"(?i)<img[^>]*src.*onerror",
        r"(?i)vbscript:",
        r"(?i)data:text/html",
        r"\{\{.*\}\}",
        r"\$\{.*\}",
        r"<%.*%>",
        r"(?i)<\?php.*\?>",
        r"(?i)eval\(",
        r"(?i)exec\(",
        r"(?i)system\(",
        r"(?i)os\.",
        r"(?i)subprocess\.",
        r"(?i)import\s+",
        r"__import__",
        // Iframes are only blocked when they carry an unsafe scheme
        // or inline handlers, not wholesale.
        r#"(?i)<iframe[^>]*src=["'][^"']*(javascript|data|vbscript):"#,
        r"(?i)<iframe[^>]*onload=",
        r"(?i)<iframe[^>]*onerror=",
    ]
    .iter()
    .map(|p| compile(p))
    .collect()
});

/// C0 control characters except newline and tab, plus DEL.
pub static CONTROL_CHARS: Lazy<Regex> =
    Lazy::new(|| compile(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]"));

/// Any markup tag. The sanitizer allows no tags at all.
pub static HTML_TAGS: Lazy<Regex> = Lazy::new(|| compile(r"<[^>]*>"));

pub static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| compile(r"^[^\s@]+@[^\s@]+\.[^\s@]+$"));

pub static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| compile(r"^[+]?[0-9\s\-()]{10,15}$"));

pub static AMOUNT_PATTERN: Lazy<Regex> =
    Lazy::new(|| compile(r"^\d{1,3}(,\d{3})*(\.\d{1,2})?$|^\d+(\.\d{1,2})?$"));

pub static TRANSACTION_REF_PATTERN: Lazy<Regex> = Lazy::new(|| compile(r"^[A-Z0-9\-_]+$"));

/// Donor names: Latin letters, spaces, and the Arabic-script ranges
/// used by the languages the site serves.
pub static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"^[a-zA-Z\s\u{0600}-\u{06FF}\u{0750}-\u{077F}\u{08A0}-\u{08FF}\u{FB50}-\u{FDFF}\u{FE70}-\u{FEFF}]+$",
    )
});

/// Free-text messages: same script ranges plus digits and a fixed
/// punctuation allow-list.
pub static MESSAGE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"^[a-zA-Z0-9\s\u{0600}-\u{06FF}\u{0750}-\u{077F}\u{08A0}-\u{08FF}\u{FB50}-\u{FDFF}\u{FE70}-\u{FEFF}.,!?\-_@#$%^&*()]+$",
    )
});

/// Filename screens for uploaded files: markup, script URIs, path
/// traversal, and characters no legitimate filename carries.
pub static FILENAME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)<script",
        r"(?i)javascript:",
        r"\.\.",
        r#"[<>:"|?*]"#,
    ]
    .iter()
    .map(|p| compile(p))
    .collect()
});

/// First dangerous pattern matching `input`, if any. Returns the
/// pattern source so the event log can name what fired.
pub fn find_dangerous(input: &str) -> Option<&'static Regex> {
    DANGEROUS_PATTERNS.iter().find(|p| p.is_match(input))
}
