//! # jsetting
//!
//! Named properties grouped into sections, persisted as a single JSON file.
//!
//! A [`Settings`] value holds a two-level mapping (group name → property
//! key → JSON value) and a storage backend.  Properties are declared with a
//! default, read and updated in memory, and written to or read from disk
//! only when the caller asks for it.
//!
//! ```no_run
//! use jsetting::Settings;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut settings = Settings::with_path(1, "app.json");
//! settings
//!     .declare("network", "host", "localhost")
//!     .declare("network", "port", 8080);
//! settings.load()?;
//!
//! let port = settings.get("network", "port")?.clone();
//! settings.set("network", "host", "example.org")?;
//! settings.save()?;
//! # let _ = port;
//! # Ok(())
//! # }
//! ```
//!
//! The crate is layered:
//!
//! - **`domain`** – the in-memory property mapping.  No I/O.
//! - **`application`** – the settings store: version seeding, save and load.
//! - **`infrastructure`** – storage backends (JSON file, in-memory).

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::settings::{Settings, DEFAULT_PATH};
pub use application::storage::{SettingsStorage, StorageError};
pub use domain::properties::{Group, PropertyError, PropertyStore, META_GROUP, VERSION_KEY};
pub use infrastructure::storage::{JsonFileStorage, MemoryStorage};
pub use serde_json::Value;
