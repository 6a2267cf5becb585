//! Shared fixtures for kvconf integration tests

pub mod consul_double;

use kvconf_core::{RegistryHost, RegistryResult};

pub use consul_double::ConsulKvDouble;

/// Entries every integration scenario starts from
pub const SEED_ENTRIES: [(&str, &str); 4] = [
    ("key1", "value1"),
    ("key2", "value2"),
    ("folder/key3", "value3"),
    ("folder/key4", "value4"),
];

/// Write [`SEED_ENTRIES`] through the registry's own `put`
pub async fn seed(host: &dyn RegistryHost) -> RegistryResult<()> {
    for (key, value) in SEED_ENTRIES {
        host.put(key, value).await?;
    }
    Ok(())
}
