//! The settings store: grouped properties plus explicit save and load.
//!
//! Every store starts with one property, `meta.version`, holding the schema
//! version supplied by the caller.  Everything else is declared by the caller
//! or merged in by [`Settings::load`].
//!
//! Persistence is never automatic.  [`Settings::save`] writes the whole
//! mapping as pretty-printed JSON (two-space indent, non-ASCII characters
//! kept literal); [`Settings::load`] re-declares every property found in the
//! stored document, so loaded values replace declared defaults.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::application::storage::{SettingsStorage, StorageError};
use crate::domain::properties::{Group, PropertyError, PropertyStore, META_GROUP, VERSION_KEY};
use crate::infrastructure::storage::JsonFileStorage;

/// File used when no path is given, relative to the working directory.
pub const DEFAULT_PATH: &str = "settings.json";

/// Grouped settings backed by a [`SettingsStorage`].
///
/// Instances are independent; two stores pointed at the same file do not see
/// each other's in-memory changes.  Access is not synchronized, so callers
/// sharing a store or a file across threads or processes must serialize it
/// themselves.
#[derive(Debug)]
pub struct Settings<S: SettingsStorage = JsonFileStorage> {
    properties: PropertyStore,
    storage: S,
}

impl Settings<JsonFileStorage> {
    /// Creates a store persisted to [`DEFAULT_PATH`].
    pub fn new(version: i64) -> Self {
        Self::with_path(version, DEFAULT_PATH)
    }

    /// Creates a store persisted to `path`.  Nothing is read or written yet.
    pub fn with_path(version: i64, path: impl AsRef<Path>) -> Self {
        Self::with_storage(version, JsonFileStorage::new(path.as_ref()))
    }

    /// The configured file path.
    pub fn path(&self) -> &Path {
        self.storage.path()
    }
}

impl<S: SettingsStorage> Settings<S> {
    /// Creates a store over an arbitrary backend, seeded with `meta.version`.
    pub fn with_storage(version: i64, storage: S) -> Self {
        let mut properties = PropertyStore::new();
        properties.declare(META_GROUP, VERSION_KEY, version);
        Self {
            properties,
            storage,
        }
    }

    /// Declares `group.key` with `default`, creating the group if needed.
    ///
    /// Re-declaring an existing key replaces its value.
    pub fn declare(&mut self, group: &str, key: &str, default: impl Into<Value>) -> &mut Self {
        self.properties.declare(group, key, default);
        self
    }

    /// Declares `group.key` with a `null` default.
    pub fn declare_unset(&mut self, group: &str, key: &str) -> &mut Self {
        self.declare(group, key, Value::Null)
    }

    /// Assigns `value` to a declared `group.key`.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] if the group or key was never declared or
    /// loaded.  Nothing is created on failure.
    pub fn set(
        &mut self,
        group: &str,
        key: &str,
        value: impl Into<Value>,
    ) -> Result<&mut Self, PropertyError> {
        self.properties.set(group, key, value)?;
        Ok(self)
    }

    /// Returns the value stored at `group.key`.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] if the group or key is absent.
    pub fn get(&self, group: &str, key: &str) -> Result<&Value, PropertyError> {
        self.properties.get(group, key)
    }

    /// Returns `true` if `group.key` holds `null`.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] if the group or key is absent.
    pub fn is_unset(&self, group: &str, key: &str) -> Result<bool, PropertyError> {
        self.properties.is_unset(group, key)
    }

    /// Returns every property of `group`.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::MissingGroup`] if the group is absent.
    pub fn get_group(&self, group: &str) -> Result<&Group, PropertyError> {
        self.properties.get_group(group)
    }

    /// Live, mutable access to the properties of `group`.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::MissingGroup`] if the group is absent.
    pub fn get_group_mut(&mut self, group: &str) -> Result<&mut Group, PropertyError> {
        self.properties.get_group_mut(group)
    }

    /// Read-only view of the whole mapping.
    pub fn properties(&self) -> &PropertyStore {
        &self.properties
    }

    /// The storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Writes every group and property to the backend, replacing what is there.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serialize`] if the mapping cannot be rendered,
    /// or whatever the backend reports on write.
    pub fn save(&self) -> Result<(), StorageError> {
        let document =
            serde_json::to_string_pretty(&self.properties).map_err(StorageError::Serialize)?;
        self.storage.write(&document)?;

        info!(
            "saved {} settings group(s) to {}",
            self.properties.len(),
            self.storage.location()
        );
        Ok(())
    }

    /// Declares every property found in the stored document.
    ///
    /// Loaded values replace declared defaults, `meta.version` included.
    /// Properties declared in memory but absent from the document are kept.
    /// If nothing is stored yet this is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Parse`] if the document is not a JSON object
    /// whose values are all objects, or whatever the backend reports on read.
    /// On error the in-memory properties are left untouched.
    pub fn load(&mut self) -> Result<(), StorageError> {
        let Some(document) = self.storage.read()? else {
            debug!(
                "no stored settings at {}; keeping declared defaults",
                self.storage.location()
            );
            return Ok(());
        };

        let stored: PropertyStore = serde_json::from_str(&document)?;

        if let (Ok(stored_version), Ok(current)) = (
            stored.get(META_GROUP, VERSION_KEY),
            self.properties.get(META_GROUP, VERSION_KEY),
        ) {
            if current != stored_version {
                warn!(
                    "stored settings version {} replaces version {}",
                    stored_version, current
                );
            }
        }

        let group_count = stored.len();
        self.properties.merge(stored);

        info!(
            "loaded {} settings group(s) from {}",
            group_count,
            self.storage.location()
        );
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::MemoryStorage;
    use serde_json::json;

    fn memory_settings(version: i64) -> Settings<MemoryStorage> {
        Settings::with_storage(version, MemoryStorage::new())
    }

    // ── construction ──────────────────────────────────────────────────────────

    #[test]
    fn test_new_store_has_only_meta_version() {
        // Arrange / Act
        let settings = memory_settings(4);

        // Assert
        assert_eq!(settings.get(META_GROUP, VERSION_KEY), Ok(&json!(4)));
        assert_eq!(settings.properties().groups().collect::<Vec<_>>(), vec![META_GROUP]);
        assert_eq!(settings.get_group(META_GROUP).unwrap().len(), 1);
    }

    #[test]
    fn test_new_uses_default_path() {
        let settings = Settings::new(1);

        assert_eq!(settings.path(), Path::new(DEFAULT_PATH));
    }

    #[test]
    fn test_with_path_uses_given_path() {
        let settings = Settings::with_path(1, "conf/app.json");

        assert_eq!(settings.path(), Path::new("conf/app.json"));
    }

    #[test]
    fn test_construction_does_not_touch_storage() {
        let settings = Settings::with_storage(1, MemoryStorage::new().recording());

        assert!(settings.storage().writes().is_empty());
        assert_eq!(settings.storage().contents(), None);
    }

    // ── declare / set / get ───────────────────────────────────────────────────

    #[test]
    fn test_declare_chains_and_get_returns_defaults() {
        let mut settings = memory_settings(1);

        settings
            .declare("db", "host", "local")
            .declare("db", "port", 5432)
            .declare_unset("db", "password");

        assert_eq!(settings.get("db", "host"), Ok(&json!("local")));
        assert_eq!(settings.get("db", "port"), Ok(&json!(5432)));
        assert_eq!(settings.is_unset("db", "password"), Ok(true));
        assert_eq!(settings.is_unset("db", "host"), Ok(false));
    }

    #[test]
    fn test_set_requires_prior_declare() {
        let mut settings = memory_settings(1);

        let err = settings.set("db", "host", "remote").unwrap_err();

        assert_eq!(
            err,
            PropertyError::MissingGroup {
                group: "db".to_string()
            }
        );
        assert!(settings.get_group("db").is_err());
    }

    #[test]
    fn test_set_after_declare_chains() {
        let mut settings = memory_settings(1);
        settings.declare("db", "host", "local").declare("db", "port", 5432);

        settings
            .set("db", "host", "remote")
            .and_then(|s| s.set("db", "port", 6543))
            .unwrap();

        assert_eq!(settings.get("db", "host"), Ok(&json!("remote")));
        assert_eq!(settings.get("db", "port"), Ok(&json!(6543)));
    }

    #[test]
    fn test_version_can_be_redeclared() {
        let mut settings = memory_settings(1);

        settings.declare(META_GROUP, VERSION_KEY, 2);

        assert_eq!(settings.get(META_GROUP, VERSION_KEY), Ok(&json!(2)));
    }

    #[test]
    fn test_get_group_mut_changes_store() {
        let mut settings = memory_settings(1);
        settings.declare("ui", "theme", "dark");

        settings
            .get_group_mut("ui")
            .unwrap()
            .insert("theme".to_string(), json!("light"));

        assert_eq!(settings.get("ui", "theme"), Ok(&json!("light")));
    }

    // ── save ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_save_writes_pretty_json_with_two_space_indent() {
        // Arrange
        let mut settings = memory_settings(1);
        settings.declare("network", "port", 8080);

        // Act
        settings.save().unwrap();

        // Assert
        let expected = "{\n  \"meta\": {\n    \"version\": 1\n  },\n  \"network\": {\n    \"port\": 8080\n  }\n}";
        assert_eq!(settings.storage().contents().as_deref(), Some(expected));
    }

    #[test]
    fn test_save_keeps_non_ascii_literal() {
        let mut settings = memory_settings(1);
        settings.declare("ui", "greeting", "héllo wörld ✓");

        settings.save().unwrap();

        let written = settings.storage().contents().unwrap();
        assert!(written.contains("héllo wörld ✓"), "got {written}");
        assert!(!written.contains("\\u"));
    }

    #[test]
    fn test_save_overwrites_previous_document() {
        let storage = MemoryStorage::with_contents("garbage").recording();
        let mut settings = Settings::with_storage(1, storage);
        settings.declare("a", "b", true);

        settings.save().unwrap();
        settings.save().unwrap();

        let writes = settings.storage().writes();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0], writes[1]);
        assert_ne!(settings.storage().contents().as_deref(), Some("garbage"));
    }

    #[test]
    fn test_save_propagates_storage_failure() {
        let settings = Settings::with_storage(1, MemoryStorage::failing());

        assert!(matches!(settings.save(), Err(StorageError::Unavailable(_))));
    }

    // ── load ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_load_with_nothing_stored_is_noop() {
        let mut settings = Settings::with_storage(7, MemoryStorage::new().recording());
        settings.declare("db", "host", "local");
        let before = settings.properties().clone();

        settings.load().unwrap();

        assert_eq!(settings.properties(), &before);
        assert!(settings.storage().writes().is_empty(), "load must not write");
    }

    #[test]
    fn test_load_overwrites_defaults_and_version() {
        // Arrange
        let stored = r#"{"meta": {"version": 2}, "db": {"host": "remote"}}"#;
        let mut settings = Settings::with_storage(0, MemoryStorage::with_contents(stored));
        settings.declare("db", "host", "local").declare("db", "port", 5432);

        // Act
        settings.load().unwrap();

        // Assert
        assert_eq!(settings.get(META_GROUP, VERSION_KEY), Ok(&json!(2)));
        assert_eq!(settings.get("db", "host"), Ok(&json!("remote")));
        // Declared but absent from the document: default survives.
        assert_eq!(settings.get("db", "port"), Ok(&json!(5432)));
    }

    #[test]
    fn test_load_declares_unknown_groups_and_keys() {
        let stored = r#"{"plugins": {"enabled": ["a", "b"], "limits": {"max": 3}}}"#;
        let mut settings = Settings::with_storage(1, MemoryStorage::with_contents(stored));

        settings.load().unwrap();

        assert_eq!(settings.get("plugins", "enabled"), Ok(&json!(["a", "b"])));
        assert_eq!(settings.get("plugins", "limits"), Ok(&json!({"max": 3})));
        assert!(settings.set("plugins", "enabled", json!([])).is_ok());
        // meta.version from the constructor is untouched when absent from the file.
        assert_eq!(settings.get(META_GROUP, VERSION_KEY), Ok(&json!(1)));
    }

    #[test]
    fn test_load_preserves_null_values() {
        let stored = r#"{"db": {"password": null}}"#;
        let mut settings = Settings::with_storage(1, MemoryStorage::with_contents(stored));

        settings.load().unwrap();

        assert_eq!(settings.is_unset("db", "password"), Ok(true));
    }

    #[test]
    fn test_load_malformed_json_returns_parse_error_and_keeps_state() {
        let mut settings = Settings::with_storage(1, MemoryStorage::with_contents("{ not json"));
        settings.declare("db", "host", "local");

        let err = settings.load().unwrap_err();

        assert!(matches!(err, StorageError::Parse(_)));
        assert_eq!(settings.get("db", "host"), Ok(&json!("local")));
    }

    #[test]
    fn test_load_rejects_non_object_group() {
        // Arrange: a group whose value is a scalar instead of an object
        let mut settings =
            Settings::with_storage(1, MemoryStorage::with_contents(r#"{"db": 5}"#));

        // Act / Assert
        assert!(matches!(settings.load(), Err(StorageError::Parse(_))));
        assert!(settings.get_group("db").is_err());
    }

    #[test]
    fn test_load_propagates_storage_failure() {
        let mut settings = Settings::with_storage(1, MemoryStorage::failing());

        assert!(matches!(settings.load(), Err(StorageError::Unavailable(_))));
    }

    #[test]
    fn test_save_then_load_into_fresh_store_round_trips() {
        // Arrange
        let mut original = memory_settings(2);
        original
            .declare("db", "host", "local")
            .declare("db", "port", 5432)
            .declare("ui", "scale", 1.25)
            .declare_unset("ui", "font");
        original.save().unwrap();
        let document = original.storage().contents().unwrap();

        // Act
        let mut restored = Settings::with_storage(0, MemoryStorage::with_contents(document));
        restored.load().unwrap();

        // Assert
        assert_eq!(restored.properties(), original.properties());
    }
}
