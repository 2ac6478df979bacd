//! Domain types for grouped settings.
//!
//! Nothing in here touches the file system; the mapping can be built and
//! tested on its own.

/// The two-level property mapping.
///
/// See [`properties::PropertyStore`] for the main type.
pub mod properties;
