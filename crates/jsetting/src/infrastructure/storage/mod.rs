//! Storage backends for settings documents.
//!
//! - [`json_file::JsonFileStorage`] reads and writes a file on disk.  This is
//!   the backend used by [`Settings::new`](crate::Settings::new) and
//!   [`Settings::with_path`](crate::Settings::with_path).
//! - [`memory::MemoryStorage`] keeps the document in memory and records every
//!   write, so callers can observe exactly what would have been persisted.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;
