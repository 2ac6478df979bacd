//! In-memory settings storage.
//!
//! Keeps the current document in a `Mutex<Option<String>>`.  Each write
//! replaces the previous document, so a long-lived store holds one copy no
//! matter how often it saves.
//!
//! # Recording writes
//!
//! [`MemoryStorage::recording`] additionally pushes every write onto a
//! history list, so tests can assert on exactly what was persisted and in
//! what order.  The history is unbounded; keep it out of long-running use.
//!
//! # `should_fail` flag
//!
//! Set `should_fail = true` to make every call return
//! [`StorageError::Unavailable`].  This exercises error paths in callers
//! without needing a broken file system.
//!
//! ```
//! use jsetting::{MemoryStorage, Settings};
//!
//! let settings = Settings::with_storage(3, MemoryStorage::new().recording());
//! settings.save().unwrap();
//!
//! let writes = settings.storage().writes();
//! assert_eq!(writes.len(), 1);
//! assert!(writes[0].contains("\"version\": 3"));
//! ```

use std::sync::Mutex;

use crate::application::storage::{SettingsStorage, StorageError};

/// A storage backend that keeps the document in memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    contents: Mutex<Option<String>>,
    writes: Mutex<Vec<String>>,
    record_writes: bool,
    /// When `true`, every method immediately returns
    /// [`StorageError::Unavailable`].
    pub should_fail: bool,
}

impl MemoryStorage {
    /// Creates an empty backend; `read` returns `None` until something is written.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that already holds `contents`.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(Some(contents.into())),
            ..Self::default()
        }
    }

    /// Keeps a copy of every write, readable through [`writes`](Self::writes).
    pub fn recording(self) -> Self {
        Self {
            record_writes: true,
            ..self
        }
    }

    /// Creates a backend whose every call fails.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// The currently stored document, if any.
    pub fn contents(&self) -> Option<String> {
        lock(&self.contents).clone()
    }

    /// Every document written so far, oldest first.
    ///
    /// Always empty unless the backend was built with
    /// [`recording`](Self::recording).
    pub fn writes(&self) -> Vec<String> {
        lock(&self.writes).clone()
    }

    fn check(&self, operation: &str) -> Result<(), StorageError> {
        if self.should_fail {
            return Err(StorageError::Unavailable(format!(
                "memory storage configured to fail on {operation}"
            )));
        }
        Ok(())
    }
}

impl SettingsStorage for MemoryStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        self.check("read")?;
        Ok(lock(&self.contents).clone())
    }

    fn write(&self, contents: &str) -> Result<(), StorageError> {
        self.check("write")?;
        *lock(&self.contents) = Some(contents.to_owned());
        if self.record_writes {
            lock(&self.writes).push(contents.to_owned());
        }
        Ok(())
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}

// A poisoned lock still guards a plain String, so keep using it.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
