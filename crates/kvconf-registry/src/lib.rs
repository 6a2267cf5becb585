//! Registry backends for kvconf
//!
//! Two implementations of [`RegistryHost`]:
//! - [`InMemoryRegistryHost`]: map-backed, for tests and local use
//! - [`ConsulRegistryHost`]: delegates to Consul's HTTP KV API
//!
//! [`connect`] selects one of them from [`RegistrySettings`].

pub mod consul;
pub mod in_memory;
pub mod settings;

use std::sync::Arc;

use kvconf_core::RegistryHost;
use tracing::info;

pub use consul::ConsulRegistryHost;
pub use in_memory::InMemoryRegistryHost;
pub use settings::{BackendKind, ConsulSettings, RegistrySettings, SetupError};

/// Construct the registry backend named by `settings`
pub fn connect(settings: &RegistrySettings) -> Result<Arc<dyn RegistryHost>, SetupError> {
    let host: Arc<dyn RegistryHost> = match settings.backend {
        BackendKind::InMemory => Arc::new(InMemoryRegistryHost::new()),
        BackendKind::Consul => Arc::new(ConsulRegistryHost::new(&settings.consul)?),
    };
    info!(backend = ?settings.backend, "Registry backend ready");
    Ok(host)
}
