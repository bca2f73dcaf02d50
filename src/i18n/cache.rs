//! Per-session translation cache.

use std::time::{SystemTime, UNIX_EPOCH};

use dashmap::DashMap;

/// Cache entry lifetime: entries older than this are refetched.
pub const DEFAULT_CACHE_TTL_MS: u64 = 60 * 60 * 1000;

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct CacheKey {
    text: String,
    target: String,
    source: String,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    text: String,
    timestamp_ms: u64,
}

fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Thread-safe translation cache keyed by (text, target, source).
///
/// Stale entries are not evicted in the background; they are simply
/// ignored on read and overwritten on the next successful fetch. The
/// whole cache drops on language change.
pub struct TranslationCache {
    entries: DashMap<CacheKey, CacheEntry>,
    ttl_ms: u64,
}

impl TranslationCache {
    pub fn new(ttl_ms: u64) -> Self {
        Self {
            entries: DashMap::new(),
            ttl_ms,
        }
    }

    /// Fresh translation for the triple, if one is cached and inside
    /// its TTL.
    pub fn get(&self, text: &str, target: &str, source: &str) -> Option<String> {
        self.get_at(text, target, source, epoch_ms())
    }

    fn get_at(&self, text: &str, target: &str, source: &str, now_ms: u64) -> Option<String> {
        let key = CacheKey {
            text: text.to_string(),
            target: target.to_string(),
            source: source.to_string(),
        };

        self.entries.get(&key).and_then(|entry| {
            if now_ms.saturating_sub(entry.timestamp_ms) < self.ttl_ms {
                Some(entry.text.clone())
            } else {
                None
            }
        })
    }

    /// Store a translation for the triple, stamped now.
    pub fn insert(&self, text: &str, target: &str, source: &str, translated: &str) {
        self.insert_at(text, target, source, translated, epoch_ms());
    }

    fn insert_at(&self, text: &str, target: &str, source: &str, translated: &str, now_ms: u64) {
        self.entries.insert(
            CacheKey {
                text: text.to_string(),
                target: target.to_string(),
                source: source.to_string(),
            },
            CacheEntry {
                text: translated.to_string(),
                timestamp_ms: now_ms,
            },
        );
    }

    /// Drop everything.
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL_MS)
    }
}
