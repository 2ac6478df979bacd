//! Application layer: the settings store and its storage seam.
//!
//! [`settings::Settings`] combines the domain mapping with a
//! [`storage::SettingsStorage`] backend provided by the infrastructure layer.

pub mod settings;
pub mod storage;
