//! Language selection and text resolution.
//!
//! The resolver owns the active language and a per-language map of
//! translated texts. Resolution is synchronous and total; fetching is
//! a separate async step that populates the map in bulk.

use std::sync::Arc;

use arc_swap::ArcSwap;
use dashmap::DashMap;

use crate::i18n::client::TranslationClient;
use crate::i18n::resources::{self, SOURCE_LANGUAGE};
use crate::storage::{SessionStore, LANGUAGE_KEY};

/// Resolves UI text keys to display text in the active language.
pub struct ContentResolver {
    language: ArcSwap<String>,
    client: Arc<TranslationClient>,
    translated: DashMap<String, String>,
    store: Arc<SessionStore>,
}

impl ContentResolver {
    /// The active language is restored from the session store; an
    /// unknown or absent value falls back to the source language.
    pub fn new(client: Arc<TranslationClient>, store: Arc<SessionStore>) -> Self {
        let language = store
            .get(LANGUAGE_KEY)
            .filter(|code| resources::is_supported(code))
            .unwrap_or_else(|| SOURCE_LANGUAGE.to_string());

        Self {
            language: ArcSwap::from_pointee(language),
            client,
            translated: DashMap::new(),
            store,
        }
    }

    pub fn current_language(&self) -> String {
        self.language.load().as_ref().clone()
    }

    /// Switch the active language. Persists the choice and drops both
    /// the resolved-text map and the translation cache, so the next
    /// fetch starts clean.
    pub fn set_language(&self, code: &str) {
        if !resources::is_supported(code) {
            tracing::warn!(code, "Ignoring unsupported language");
            return;
        }

        tracing::info!(code, "Switching language");
        self.store.set(LANGUAGE_KEY, code);
        self.language.store(Arc::new(code.to_string()));
        self.translated.clear();
        self.client.clear_cache();
    }

    pub fn is_language_supported(&self, code: &str) -> bool {
        resources::is_supported(code)
    }

    /// Display text for `key`, synchronously.
    ///
    /// In the source language this is the static resource, then the
    /// caller's fallback, then the key itself. In any other language a
    /// previously fetched translation wins, with the same chain behind
    /// it so unfetched keys still render.
    pub fn final_text(&self, key: &str, fallback: Option<&str>) -> String {
        let source_text = || {
            resources::lookup(key)
                .map(str::to_string)
                .or_else(|| fallback.map(str::to_string))
                .unwrap_or_else(|| key.to_string())
        };

        if self.current_language() == SOURCE_LANGUAGE {
            return source_text();
        }

        self.translated
            .get(key)
            .map(|entry| entry.value().clone())
            .unwrap_or_else(source_text)
    }

    /// Fetch translations for `keys` into the active language and
    /// populate the resolved-text map. A no-op in the source language.
    /// Keys with no source text are skipped.
    pub async fn translated_texts(&self, keys: &[&str]) -> Vec<String> {
        let language = self.current_language();
        if language == SOURCE_LANGUAGE {
            return keys.iter().map(|key| self.final_text(key, None)).collect();
        }

        let known: Vec<(&str, String)> = keys
            .iter()
            .filter_map(|key| resources::lookup(key).map(|text| (*key, text.to_string())))
            .collect();

        let texts: Vec<String> = known.iter().map(|(_, text)| text.clone()).collect();
        let translations = self
            .client
            .translate_many(&texts, &language, SOURCE_LANGUAGE)
            .await;

        for ((key, _), translation) in known.iter().zip(translations) {
            self.translated.insert(key.to_string(), translation);
        }

        keys.iter().map(|key| self.final_text(key, None)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TimeoutConfig, TranslationConfig};

    fn resolver(store: Arc<SessionStore>) -> ContentResolver {
        let config = TranslationConfig {
            endpoint: "http://127.0.0.1:1/translate".to_string(),
            api_key: None,
            cache_ttl_secs: 3600,
        };
        let client = Arc::new(TranslationClient::new(&config, &TimeoutConfig::default()));
        ContentResolver::new(client, store)
    }

    #[test]
    fn test_defaults_to_source_language() {
        let resolver = resolver(Arc::new(SessionStore::in_memory()));
        assert_eq!(resolver.current_language(), "en");
    }

    #[test]
    fn test_restores_persisted_language() {
        let store = Arc::new(SessionStore::in_memory());
        store.set(LANGUAGE_KEY, "am");
        assert_eq!(resolver(store).current_language(), "am");
    }

    #[test]
    fn test_ignores_unknown_persisted_language() {
        let store = Arc::new(SessionStore::in_memory());
        store.set(LANGUAGE_KEY, "klingon");
        assert_eq!(resolver(store).current_language(), "en");
    }

    #[test]
    fn test_set_language_persists() {
        let store = Arc::new(SessionStore::in_memory());
        let resolver = resolver(store.clone());

        resolver.set_language("ar");
        assert_eq!(resolver.current_language(), "ar");
        assert_eq!(store.get(LANGUAGE_KEY).as_deref(), Some("ar"));

        resolver.set_language("fr");
        assert_eq!(resolver.current_language(), "ar");
    }

    #[test]
    fn test_final_text_fallback_chain() {
        let resolver = resolver(Arc::new(SessionStore::in_memory()));

        assert_eq!(resolver.final_text("nav.home", None), "Home");
        assert_eq!(
            resolver.final_text("nav.missing", Some("Fallback")),
            "Fallback"
        );
        assert_eq!(resolver.final_text("nav.missing", None), "nav.missing");
    }

    #[tokio::test]
    async fn test_translated_texts_source_language_no_network() {
        let resolver = resolver(Arc::new(SessionStore::in_memory()));
        let texts = resolver.translated_texts(&["nav.home", "nav.about"]).await;
        assert_eq!(texts, vec!["Home", "About"]);
    }

    #[tokio::test]
    async fn test_translated_texts_falls_back_without_key() {
        // No API key: the client falls back to source text, and the
        // resolver must still return something for every key.
        let resolver = resolver(Arc::new(SessionStore::in_memory()));
        resolver.set_language("am");

        let texts = resolver
            .translated_texts(&["nav.home", "nav.missing"])
            .await;
        assert_eq!(texts, vec!["Home", "nav.missing"]);
    }
}
