//! CSRF token lifecycle.
//!
//! A single process-wide token: 32 random bytes hex-encoded, valid
//! for 24 hours, persisted in the session store so a restart keeps
//! the same token. Enforcement is server-side; the client only has
//! to attach it and keep it fresh.

use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::RngCore;

use crate::storage::{SessionStore, CSRF_EXPIRATION_KEY, CSRF_TOKEN_KEY};

/// Token lifetime.
pub const CSRF_TTL_MS: u64 = 24 * 60 * 60 * 1000;

/// Header carrying the token on secure submissions.
pub const CSRF_HEADER: &str = "X-CSRF-Token";

#[derive(Debug, Clone)]
struct CsrfToken {
    value: String,
    expires_at_ms: u64,
}

impl CsrfToken {
    fn is_valid(&self, now_ms: u64) -> bool {
        self.expires_at_ms > now_ms
    }
}

fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Issues and caches the process-wide CSRF token.
pub struct CsrfManager {
    token: Mutex<Option<CsrfToken>>,
    store: Arc<SessionStore>,
}

impl CsrfManager {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self {
            token: Mutex::new(None),
            store,
        }
    }

    /// Return the active token, minting a new one only when the cached
    /// token is missing or expired. Idempotent within the TTL.
    pub fn generate(&self) -> String {
        self.generate_at(epoch_ms())
    }

    fn generate_at(&self, now_ms: u64) -> String {
        let mut slot = self.token.lock().expect("csrf mutex poisoned");

        if let Some(token) = slot.as_ref() {
            if token.is_valid(now_ms) {
                return token.value.clone();
            }
        }

        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let value: String = bytes.iter().map(|b| format!("{b:02x}")).collect();

        let expires_at_ms = now_ms + CSRF_TTL_MS;
        self.store.set(CSRF_TOKEN_KEY, &value);
        self.store.set(CSRF_EXPIRATION_KEY, &expires_at_ms.to_string());

        *slot = Some(CsrfToken {
            value: value.clone(),
            expires_at_ms,
        });

        value
    }

    /// Current token if one is live, hydrating from the session store
    /// when the in-memory cache is cold. Returns `None` for expired or
    /// absent tokens; never mints.
    pub fn current(&self) -> Option<String> {
        self.current_at(epoch_ms())
    }

    fn current_at(&self, now_ms: u64) -> Option<String> {
        let mut slot = self.token.lock().expect("csrf mutex poisoned");

        if slot.is_none() {
            let stored = self.store.get(CSRF_TOKEN_KEY);
            let expiration = self
                .store
                .get(CSRF_EXPIRATION_KEY)
                .and_then(|raw| raw.parse::<u64>().ok());

            if let (Some(value), Some(expires_at_ms)) = (stored, expiration) {
                *slot = Some(CsrfToken {
                    value,
                    expires_at_ms,
                });
            }
        }

        slot.as_ref()
            .filter(|token| token.is_valid(now_ms))
            .map(|token| token.value.clone())
    }

    /// Drop the token from memory and storage.
    pub fn clear(&self) {
        let mut slot = self.token.lock().expect("csrf mutex poisoned");
        *slot = None;
        self.store.remove(CSRF_TOKEN_KEY);
        self.store.remove(CSRF_EXPIRATION_KEY);
    }
}
