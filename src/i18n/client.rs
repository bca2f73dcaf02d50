//! Remote translation collaborator.
//!
//! Speaks the Google Translate v2 wire shape. Every public method is
//! total: a missing API key, a dead endpoint, or a malformed response
//! all collapse to a deterministic fallback, because untranslated
//! text must never block rendering.

use std::time::Duration;

use futures_util::future::join_all;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::config::{TimeoutConfig, TranslationConfig};
use crate::i18n::cache::TranslationCache;
use crate::i18n::resources::{supported_languages, LanguageOption, SOURCE_LANGUAGE};

/// Keys left at this placeholder are treated as absent.
const PLACEHOLDER_API_KEY: &str = "your_api_key_here";

#[derive(Debug, Error)]
enum TranslationError {
    #[error("translation API error: {0}")]
    Status(u16),

    #[error("translation response missing expected fields")]
    Shape,

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    translations: Vec<TranslationItem>,
}

#[derive(Debug, Deserialize)]
struct TranslationItem {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

#[derive(Debug, Deserialize)]
struct DetectResponse {
    data: DetectData,
}

#[derive(Debug, Deserialize)]
struct DetectData {
    detections: Vec<Vec<DetectionItem>>,
}

#[derive(Debug, Deserialize)]
struct DetectionItem {
    language: String,
}

#[derive(Debug, Deserialize)]
struct LanguagesResponse {
    data: LanguagesData,
}

#[derive(Debug, Deserialize)]
struct LanguagesData {
    languages: Vec<LanguageItem>,
}

#[derive(Debug, Deserialize)]
struct LanguageItem {
    language: String,
    name: Option<String>,
    #[serde(rename = "nativeName")]
    native_name: Option<String>,
}

/// Client for the translation REST collaborator, with a per-session
/// cache in front of it.
pub struct TranslationClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    timeout: Duration,
    cache: TranslationCache,
}

impl TranslationClient {
    pub fn new(translation: &TranslationConfig, timeouts: &TimeoutConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: translation.endpoint.trim_end_matches('/').to_string(),
            api_key: translation.api_key.clone(),
            timeout: Duration::from_secs(timeouts.translation_secs),
            cache: TranslationCache::new(translation.cache_ttl_secs * 1000),
        }
    }

    fn usable_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
    }

    /// Translate `text` into `target`. Never fails; the source text
    /// is the fallback for every error path.
    pub async fn translate(&self, text: &str, target: &str, source: &str) -> String {
        if target == source {
            return text.to_string();
        }

        if let Some(cached) = self.cache.get(text, target, source) {
            return cached;
        }

        let Some(key) = self.usable_key() else {
            tracing::warn!("Translation API key not configured, returning original text");
            return text.to_string();
        };

        match self.fetch_translation(text, target, source, key).await {
            Ok(translated) => {
                self.cache.insert(text, target, source, &translated);
                translated
            }
            Err(e) => {
                tracing::error!(error = %e, target, "Translation failed, using source text");
                text.to_string()
            }
        }
    }

    async fn fetch_translation(
        &self,
        text: &str,
        target: &str,
        source: &str,
        key: &str,
    ) -> Result<String, TranslationError> {
        let response = self
            .http
            .post(format!("{}?key={key}", self.endpoint))
            .timeout(self.timeout)
            .json(&json!({
                "q": text,
                "target": target,
                "source": source,
                "format": "text",
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TranslationError::Status(response.status().as_u16()));
        }

        let parsed: TranslateResponse = response.json().await?;
        parsed
            .data
            .translations
            .into_iter()
            .next()
            .map(|item| item.translated_text)
            .ok_or(TranslationError::Shape)
    }

    /// Translate an ordered list, preserving index correspondence.
    /// Each element independently falls back to its source text.
    pub async fn translate_many(&self, texts: &[String], target: &str, source: &str) -> Vec<String> {
        if target == source {
            return texts.to_vec();
        }

        join_all(
            texts
                .iter()
                .map(|text| self.translate(text, target, source)),
        )
        .await
    }

    /// Detect the language of `text`, defaulting to the source
    /// language on any failure.
    pub async fn detect_language(&self, text: &str) -> String {
        let Some(key) = self.usable_key() else {
            tracing::debug!("Translation API key not configured, assuming source language");
            return SOURCE_LANGUAGE.to_string();
        };

        let result: Result<String, TranslationError> = async {
            let response = self
                .http
                .post(format!("{}/detect?key={key}", self.endpoint))
                .timeout(self.timeout)
                .json(&json!({ "q": text }))
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(TranslationError::Status(response.status().as_u16()));
            }

            let parsed: DetectResponse = response.json().await?;
            parsed
                .data
                .detections
                .into_iter()
                .next()
                .and_then(|group| group.into_iter().next())
                .map(|item| item.language)
                .ok_or(TranslationError::Shape)
        }
        .await;

        match result {
            Ok(language) => language,
            Err(e) => {
                tracing::error!(error = %e, "Language detection failed");
                SOURCE_LANGUAGE.to_string()
            }
        }
    }

    /// Languages the collaborator offers, or the static list when the
    /// remote listing is unavailable.
    pub async fn remote_languages(&self) -> Vec<LanguageOption> {
        let Some(key) = self.usable_key() else {
            tracing::debug!("Translation API key not configured, using fallback languages");
            return supported_languages();
        };

        let result: Result<Vec<LanguageOption>, TranslationError> = async {
            let response = self
                .http
                .get(format!("{}/languages?key={key}", self.endpoint))
                .timeout(self.timeout)
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(TranslationError::Status(response.status().as_u16()));
            }

            let parsed: LanguagesResponse = response.json().await?;
            Ok(parsed
                .data
                .languages
                .into_iter()
                .map(|item| {
                    let name = item.name.unwrap_or_else(|| item.language.clone());
                    LanguageOption {
                        code: item.language,
                        native_name: item.native_name.unwrap_or_else(|| name.clone()),
                        name,
                    }
                })
                .collect())
        }
        .await;

        match result {
            Ok(languages) => languages,
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch supported languages");
                supported_languages()
            }
        }
    }

    /// Drop every cached translation.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    #[cfg(test)]
    pub(crate) fn cache_len(&self) -> usize {
        self.cache.len()
    }
}
