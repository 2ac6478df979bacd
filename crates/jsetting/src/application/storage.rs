//! Storage seam for persisted settings.
//!
//! The settings store never touches the file system directly.  It hands the
//! serialized document to a [`SettingsStorage`] implementation, which lives
//! in the infrastructure layer.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for save and load operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored document is not valid JSON, or is not an object of objects.
    #[error("failed to parse settings JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The in-memory properties could not be serialized.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The backend refused the operation.
    #[error("settings storage unavailable: {0}")]
    Unavailable(String),
}

/// Where a settings document is read from and written to.
pub trait SettingsStorage: Send + Sync {
    /// Returns the stored document, or `None` if nothing has been stored yet.
    fn read(&self) -> Result<Option<String>, StorageError>;

    /// Replaces the stored document with `contents`.
    fn write(&self, contents: &str) -> Result<(), StorageError>;

    /// Human-readable description of where the document lives.
    fn location(&self) -> String;
}
