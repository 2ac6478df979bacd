//! File-backed settings storage.
//!
//! Reads and writes are plain blocking calls: a write truncates and rewrites
//! the file in place, and nothing creates missing parent directories.  A
//! reader racing a writer can observe a partially written file.

use std::path::{Path, PathBuf};

use crate::application::storage::{SettingsStorage, StorageError};

/// Settings document stored in a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Creates a backend for `path`.  The file does not need to exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The configured file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStorage for JsonFileStorage {
    /// Returns `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] for every other file-system failure.
    fn read(&self) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Overwrites the file with `contents`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the file cannot be written, including
    /// when its parent directory does not exist.
    fn write(&self, contents: &str) -> Result<(), StorageError> {
        std::fs::write(&self.path, contents).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
