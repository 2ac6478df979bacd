//! Grouped property mapping.
//!
//! A [`PropertyStore`] maps a group name to a [`Group`], and each group maps a
//! property key to an arbitrary JSON value.  Properties must be declared
//! before they can be read or assigned; [`PropertyStore::declare`] is the only
//! operation that creates groups or keys.
//!
//! # Example layout
//!
//! ```text
//! meta     ─┬─ version = 1
//! network  ─┬─ host    = "localhost"
//!           └─ port    = 8080
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// Name of the group that carries bookkeeping properties.
pub const META_GROUP: &str = "meta";

/// Key inside [`META_GROUP`] holding the caller-supplied schema version.
pub const VERSION_KEY: &str = "version";

/// The properties of a single group, keyed by property name.
pub type Group = Map<String, Value>;

/// Lookup failure for a group or property that was never declared or loaded.
///
/// Both variants are the same kind of failure (a missing attribute); they
/// only differ in how much of the address was found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// The group does not exist.
    #[error("no properties in '{group}'")]
    MissingGroup { group: String },

    /// The group exists but has no property with this key.
    #[error("no property called '{key}' in '{group}'")]
    MissingProperty { group: String, key: String },
}

/// Two-level mapping of group name → property key → value.
///
/// Groups are kept sorted by name (and keys sorted within a group), so the
/// serialized form is stable across save/load cycles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyStore {
    groups: BTreeMap<String, Group>,
}

impl PropertyStore {
    /// Creates an empty mapping with no groups.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `group.key` with `default` as its value.
    ///
    /// Creates the group if needed.  If the key already exists its value is
    /// replaced: the last declaration wins.
    pub fn declare(&mut self, group: &str, key: &str, default: impl Into<Value>) -> &mut Self {
        let properties = self.groups.entry(group.to_owned()).or_insert_with(|| {
            debug!(group, "declared new settings group");
            Group::new()
        });
        properties.insert(key.to_owned(), default.into());
        self
    }

    /// Assigns `value` to an already declared `group.key`.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::MissingGroup`] or
    /// [`PropertyError::MissingProperty`] if the address was never declared.
    /// Unlike [`declare`](Self::declare), nothing is created.
    pub fn set(
        &mut self,
        group: &str,
        key: &str,
        value: impl Into<Value>,
    ) -> Result<&mut Self, PropertyError> {
        let slot = self.lookup_mut(group, key)?;
        *slot = value.into();
        Ok(self)
    }

    /// Returns the value stored at `group.key`.
    ///
    /// # Errors
    ///
    /// Returns a [`PropertyError`] if the group or the key is absent.
    pub fn get(&self, group: &str, key: &str) -> Result<&Value, PropertyError> {
        self.get_group(group)?
            .get(key)
            .ok_or_else(|| PropertyError::MissingProperty {
                group: group.to_owned(),
                key: key.to_owned(),
            })
    }

    /// Returns `true` if the value at `group.key` is JSON `null`.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub fn is_unset(&self, group: &str, key: &str) -> Result<bool, PropertyError> {
        Ok(self.get(group, key)?.is_null())
    }

    /// Returns every property of `group`.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::MissingGroup`] if the group is absent.
    pub fn get_group(&self, group: &str) -> Result<&Group, PropertyError> {
        self.groups.get(group).ok_or_else(|| missing_group(group))
    }

    /// Mutable access to the live properties of `group`.
    ///
    /// Changes made through the returned map, including inserting new keys,
    /// are changes to the store itself.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::MissingGroup`] if the group is absent.
    pub fn get_group_mut(&mut self, group: &str) -> Result<&mut Group, PropertyError> {
        self.groups.get_mut(group).ok_or_else(|| missing_group(group))
    }

    /// Whether `group.key` has been declared.
    pub fn contains(&self, group: &str, key: &str) -> bool {
        self.groups
            .get(group)
            .is_some_and(|properties| properties.contains_key(key))
    }

    /// Iterates over group names in sorted order.
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// `true` if no group has been declared.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Declares every property of `other` into `self`.
    ///
    /// Values from `other` replace existing ones; properties only present in
    /// `self` are kept.
    pub fn merge(&mut self, other: PropertyStore) {
        for (group, properties) in other.groups {
            for (key, value) in properties {
                self.declare(&group, &key, value);
            }
        }
    }

    fn lookup_mut(&mut self, group: &str, key: &str) -> Result<&mut Value, PropertyError> {
        self.get_group_mut(group)?
            .get_mut(key)
            .ok_or_else(|| PropertyError::MissingProperty {
                group: group.to_owned(),
                key: key.to_owned(),
            })
    }
}

fn missing_group(group: &str) -> PropertyError {
    PropertyError::MissingGroup {
        group: group.to_owned(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
