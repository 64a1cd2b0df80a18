//! Session-scoped key/value storage.
//!
//! DESIGN
//! ======
//! The widget only ever needs a string map with get/set/remove, so storage
//! sits behind `SessionStorage`. `MemoryStorage` is the in-process store
//! used by tests and embedders; `FileStorage` keeps the map in a JSON file
//! so a restarted terminal session reuses the resolved config the way a
//! reloaded page reuses `sessionStorage`.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::StorageError;

pub const KEY_BOT_NAME: &str = "bot_name";
pub const KEY_SHOPIFY_DOMAIN: &str = "shopify_domain";
pub const KEY_SHOPIFY_TOKEN: &str = "shopify_token";

/// Keys the widget reads and writes.
pub const SESSION_KEYS: [&str; 3] = [KEY_BOT_NAME, KEY_SHOPIFY_DOMAIN, KEY_SHOPIFY_TOKEN];

/// Mapping from key to string value with session lifetime.
pub trait SessionStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

// =============================================================================
// MEMORY
// =============================================================================

/// In-memory storage. Contents die with the value.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self { entries: entries.into_iter().map(|(k, v)| (k.to_owned(), v.to_owned())).collect() }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

// =============================================================================
// FILE
// =============================================================================

/// JSON-file backed storage. Every mutation rewrites the file.
///
/// Write failures are logged and otherwise ignored: the in-memory map stays
/// authoritative for the running process, and the next load simply falls
/// back further down the resolution chain.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open the session file at `path`. A missing file is an empty session.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not a
    /// JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, entries })
    }

    /// Open the file, starting from an empty session if it is unreadable.
    #[must_use]
    pub fn open_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(&path) {
            Ok(storage) => storage,
            Err(e) => {
                warn!(error = %e, path = %path.display(), "session: unreadable file, starting empty");
                Self { path, entries: BTreeMap::new() }
            }
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    fn persist_or_warn(&self) {
        if let Err(e) = self.persist() {
            warn!(error = %e, path = %self.path.display(), "session: write failed");
        }
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        if self.entries.get(key).map(String::as_str) == Some(value) {
            return;
        }
        self.entries.insert(key.to_owned(), value.to_owned());
        self.persist_or_warn();
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.persist_or_warn();
        }
    }
}

/// Default session file location.
#[must_use]
pub fn default_session_path() -> PathBuf {
    std::env::temp_dir().join("seep-session.json")
}
