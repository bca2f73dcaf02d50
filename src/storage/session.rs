//! Session-scoped key/value persistence.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A small string-to-string store backed by an optional JSON file.
///
/// Stands in for the browser's session/local storage: fixed keys,
/// tiny values, best-effort durability. Constructed once at startup
/// and shared behind an `Arc`.
pub struct SessionStore {
    values: Mutex<HashMap<String, String>>,
    path: Option<PathBuf>,
}

impl SessionStore {
    /// Create a store with no backing file. Values live for the
    /// process lifetime only. Used by tests and by callers that opt
    /// out of persistence.
    pub fn in_memory() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            path: None,
        }
    }

    /// Open a file-backed store, loading existing values if the file
    /// is present and parseable. A corrupt file is discarded with a
    /// warning rather than propagated.
    pub fn open(path: &Path) -> Self {
        let mut values = HashMap::new();

        if path.exists() {
            match File::open(path) {
                Ok(file) => {
                    let reader = BufReader::new(file);
                    match serde_json::from_reader::<_, HashMap<String, String>>(reader) {
                        Ok(loaded) => {
                            tracing::debug!(entries = loaded.len(), "Loaded session store");
                            values = loaded;
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "Session store unreadable, starting empty");
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to open session store, starting empty");
                }
            }
        }

        Self {
            values: Mutex::new(values),
            path: Some(path.to_path_buf()),
        }
    }

    /// Read a value by key.
    pub fn get(&self, key: &str) -> Option<String> {
        let values = self.values.lock().expect("session store mutex poisoned");
        values.get(key).cloned()
    }

    /// Write a value and flush to disk.
    pub fn set(&self, key: &str, value: &str) {
        {
            let mut values = self.values.lock().expect("session store mutex poisoned");
            values.insert(key.to_string(), value.to_string());
        }
        self.flush();
    }

    /// Remove a value and flush to disk.
    pub fn remove(&self, key: &str) {
        {
            let mut values = self.values.lock().expect("session store mutex poisoned");
            values.remove(key);
        }
        self.flush();
    }

    fn flush(&self) {
        let Some(path) = &self.path else {
            return;
        };

        let snapshot = {
            let values = self.values.lock().expect("session store mutex poisoned");
            values.clone()
        };

        let result = File::create(path).and_then(|file| {
            let writer = BufWriter::new(file);
            serde_json::to_writer(writer, &snapshot).map_err(std::io::Error::from)
        });

        if let Err(e) = result {
            tracing::warn!(error = %e, path = %path.display(), "Failed to persist session store");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_roundtrip() {
        let store = SessionStore::in_memory();
        assert!(store.get("csrf_token").is_none());

        store.set("csrf_token", "abc123");
        assert_eq!(store.get("csrf_token").as_deref(), Some("abc123"));

        store.remove("csrf_token");
        assert!(store.get("csrf_token").is_none());
    }

    #[test]
    fn test_file_persistence() {
        let path = std::env::temp_dir().join("charity_session_test.json");
        let _ = std::fs::remove_file(&path);

        let store = SessionStore::open(&path);
        store.set("i18nextLng", "am");
        drop(store);

        let reloaded = SessionStore::open(&path);
        assert_eq!(reloaded.get("i18nextLng").as_deref(), Some("am"));

        std::fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let path = std::env::temp_dir().join("charity_session_corrupt.json");
        std::fs::write(&path, "not json at all").unwrap();

        let store = SessionStore::open(&path);
        assert!(store.get("i18nextLng").is_none());

        std::fs::remove_file(&path).unwrap_or_default();
    }
}
