//! Configuration source layer for kvconf
//!
//! Presents the contents of a flat key-value registry as a hierarchical
//! configuration source:
//! - [`adapters::RegistryConfigurationProvider`]: key lookup, writes and child-key
//!   enumeration over a [`kvconf_core::RegistryHost`]
//! - [`RegistryConfigurationSource`]: lazy, exactly-once construction of the
//!   provider from a deferred registry factory
//! - [`settings`] and [`telemetry`]: configuration loading and tracing bootstrap

pub mod adapters;
pub mod error;
pub mod settings;
pub mod source;
pub mod telemetry;

pub use adapters::{ConfigurationProvider, RegistryConfigurationProvider};
pub use error::{SettingsError, SourceError, TelemetryError};
pub use settings::KvconfSettings;
pub use source::RegistryConfigurationSource;
