//! Translation layer.
//!
//! # Data Flow
//! ```text
//! UI text key:
//!     → content.rs (resolve against static resources)
//!     → cache.rs (per-session translation cache, 1h TTL)
//!     → client.rs (remote translation collaborator)
//! ```
//!
//! # Design Decisions
//! - Translation never blocks rendering: every failure falls back to
//!   the source-language text
//! - The cache is dropped wholesale on language change; keys embed the
//!   language pair so stale pairs cannot leak through anyway

pub mod cache;
pub mod client;
pub mod content;
pub mod resources;

pub use cache::TranslationCache;
pub use client::TranslationClient;
pub use content::ContentResolver;
pub use resources::{supported_languages, LanguageOption, SOURCE_LANGUAGE};
