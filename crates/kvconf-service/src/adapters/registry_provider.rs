//! Registry Configuration Provider
//!
//! Thin adapter presenting a flat key-value registry as a hierarchical
//! configuration source. Keys are translated between the configuration
//! separator (`:`) and the registry separator (`/`) on the way in and out;
//! child keys are discovered by prefix listing.

use async_trait::async_trait;
use kvconf_core::{KeyMapping, RegistryHost};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Operations a layered configuration framework performs on one of its sources
#[async_trait]
pub trait ConfigurationProvider: Send + Sync {
    /// Look up a configuration value, `None` when it is not configured
    async fn try_get(&self, key: &str) -> Option<String>;

    /// Store a configuration value
    async fn set(&self, key: &str, value: &str);

    /// Keys under `parent_path`, in lexicographic order, minus any key a
    /// higher-priority source already reported in `earlier_keys`
    async fn get_child_keys(&self, earlier_keys: &HashSet<String>, parent_path: &str) -> Vec<String>;
}

/// Configuration provider backed by a [`RegistryHost`]
///
/// Registry failures never reach the caller: reads degrade to "not
/// configured", listings to an empty list, and failed writes are dropped.
/// There is no retry, backoff or circuit breaking at this layer.
#[derive(Clone)]
pub struct RegistryConfigurationProvider {
    /// Registry backend
    registry: Arc<dyn RegistryHost>,
    /// Separator translation between the two key spaces
    key_mapping: KeyMapping,
}

impl RegistryConfigurationProvider {
    /// Create a provider using the default `:` to `/` key mapping
    pub fn new(registry: Arc<dyn RegistryHost>) -> Self {
        Self {
            registry,
            key_mapping: KeyMapping::default(),
        }
    }

    /// Set the key mapping
    pub fn with_key_mapping(mut self, key_mapping: KeyMapping) -> Self {
        self.key_mapping = key_mapping;
        self
    }

    /// Get the key mapping
    pub fn key_mapping(&self) -> KeyMapping {
        self.key_mapping
    }

    /// Get the underlying registry
    pub fn registry(&self) -> &Arc<dyn RegistryHost> {
        &self.registry
    }
}

impl std::fmt::Debug for RegistryConfigurationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryConfigurationProvider")
            .field("key_mapping", &self.key_mapping)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ConfigurationProvider for RegistryConfigurationProvider {
    #[instrument(skip(self))]
    async fn try_get(&self, key: &str) -> Option<String> {
        let registry_key = self.key_mapping.to_registry(key);

        match self.registry.get(&registry_key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %key, error = %e, "Registry read failed - treating key as not configured");
                None
            }
        }
    }

    #[instrument(skip(self, value))]
    async fn set(&self, key: &str, value: &str) {
        let registry_key = self.key_mapping.to_registry(key);

        // A configuration source never fails its caller, so a rejected or
        // unreachable write is only logged. The caller cannot tell that the
        // value was lost; changing that means changing `set`'s signature.
        if let Err(e) = self.registry.put(&registry_key, value).await {
            warn!(key = %key, error = %e, "Registry write failed - value dropped");
            return;
        }

        debug!(key = %key, "Configuration value stored");
    }

    #[instrument(skip(self, earlier_keys))]
    async fn get_child_keys(&self, earlier_keys: &HashSet<String>, parent_path: &str) -> Vec<String> {
        let prefix = self
            .key_mapping
            .to_registry(&self.key_mapping.normalize_parent(parent_path));

        let registry_keys = match self.registry.list_keys_with_prefix(&prefix).await {
            Ok(keys) => keys,
            Err(e) => {
                warn!(parent_path = %parent_path, error = %e, "Registry listing failed - no child keys");
                return Vec::new();
            }
        };

        // Children come back in the spelling the caller used for the parent
        let registry_spelled = self.key_mapping.is_registry_spelled(parent_path);
        let child_keys: Vec<String> = registry_keys
            .iter()
            .map(|key| {
                if registry_spelled {
                    key.clone()
                } else {
                    self.key_mapping.to_config(key)
                }
            })
            .filter(|key| !earlier_keys.contains(key))
            .collect();

        debug!(
            parent_path = %parent_path,
            listed = registry_keys.len(),
            returned = child_keys.len(),
            "Child keys resolved"
        );

        child_keys
    }
}
