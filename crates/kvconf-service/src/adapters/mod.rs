//! Configuration adapters over registry backends
//!
//! The provider here is the only piece the embedding configuration framework
//! talks to. It owns no state beyond the registry handle and the separator
//! mapping, and re-queries the registry on every call.

pub mod registry_provider;

pub use registry_provider::{ConfigurationProvider, RegistryConfigurationProvider};
