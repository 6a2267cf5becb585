//! Core types for kvconf
//!
//! This crate defines the contracts shared by every kvconf crate:
//! - [`RegistryHost`]: the uniform capability set over flat key-value registries
//! - [`KeyMapping`]: separator translation between registry and configuration key spaces
//! - [`RegistryError`]: the error taxonomy surfaced by registry backends

pub mod entry;
pub mod error;
pub mod host;
pub mod key;

pub use entry::RegistryEntry;
pub use error::{RegistryError, RegistryResult};
pub use host::RegistryHost;
pub use key::{KeyMapping, CONFIG_SEPARATOR, REGISTRY_SEPARATOR};

#[cfg(any(test, feature = "mock"))]
pub use host::MockRegistryHost;
