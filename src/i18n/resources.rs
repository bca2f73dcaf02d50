//! Static localized resources.
//!
//! English is the source language; every other language is produced
//! by the translation collaborator at runtime. These keys are the
//! fallback vocabulary the resolver works from.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// The language static resources are written in.
pub const SOURCE_LANGUAGE: &str = "en";

/// A language the UI can offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageOption {
    pub code: String,
    pub name: String,
    #[serde(rename = "nativeName")]
    pub native_name: String,
}

impl LanguageOption {
    fn new(code: &str, name: &str, native_name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            native_name: native_name.to_string(),
        }
    }
}

/// Languages offered when the remote listing is unavailable.
pub fn supported_languages() -> Vec<LanguageOption> {
    vec![
        LanguageOption::new("en", "English", "English"),
        LanguageOption::new("am", "Amharic", "አማርኛ"),
        LanguageOption::new("om", "Oromo", "Afaan Oromoo"),
        LanguageOption::new("so", "Somali", "Soomaali"),
        LanguageOption::new("ti", "Tigrinya", "ትግርኛ"),
        LanguageOption::new("ar", "Arabic", "العربية"),
    ]
}

/// True when `code` is one of the offered languages.
pub fn is_supported(code: &str) -> bool {
    supported_languages().iter().any(|lang| lang.code == code)
}

static RESOURCES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // Navigation
        ("nav.home", "Home"),
        ("nav.about", "About"),
        ("nav.programs", "Programs"),
        ("nav.events", "Events"),
        ("nav.donate", "Donate"),
        ("nav.gallery", "Gallery"),
        ("nav.contact", "Contact"),
        // Header
        ("header.logoAlt", "Mufti Dawud Charity Logo"),
        ("header.branding.title", "Mufti Dawud"),
        ("header.branding.subtitle", "Charity Organization"),
        ("header.donateButton", "Donate Now"),
        ("header.mobileDonateButton", "Donate Now & Save Lives"),
        // Common
        ("common.loading", "Loading..."),
        ("common.error", "Error"),
        ("common.success", "Success"),
        ("common.close", "Close"),
        ("common.save", "Save"),
        ("common.cancel", "Cancel"),
        ("common.delete", "Delete"),
        ("common.edit", "Edit"),
        ("common.view", "View"),
        ("common.back", "Back"),
        ("common.next", "Next"),
        ("common.previous", "Previous"),
        ("common.submit", "Submit"),
        ("common.search", "Search"),
        ("common.filter", "Filter"),
        ("common.sort", "Sort"),
    ])
});

/// Source-language text for a key, if the key exists.
pub fn lookup(key: &str) -> Option<&'static str> {
    RESOURCES.get(key).copied()
}
