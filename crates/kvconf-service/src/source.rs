//! Registry configuration source
//!
//! Registers a registry-backed provider with a configuration framework
//! without constructing the registry up front. The registry comes from a
//! deferred factory that may need async bootstrap (connecting, seeding).
//! The factory runs the first time the source is built, and every later
//! build returns the same provider.

use futures::future::BoxFuture;
use futures::FutureExt;
use kvconf_core::{KeyMapping, RegistryHost};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};

use crate::adapters::RegistryConfigurationProvider;
use crate::error::SourceError;
use crate::settings::KvconfSettings;

/// Future produced by a registry factory
pub type RegistryFuture = BoxFuture<'static, anyhow::Result<Arc<dyn RegistryHost>>>;

type RegistryFactory = Box<dyn Fn() -> RegistryFuture + Send + Sync>;

/// Configuration source resolving its registry lazily
///
/// Concurrent first builds share a single factory invocation and none of
/// them observes a half-built provider. A failed factory leaves the source
/// unbuilt, so the next build invokes the factory again.
pub struct RegistryConfigurationSource {
    factory: RegistryFactory,
    key_mapping: KeyMapping,
    provider: OnceCell<Arc<RegistryConfigurationProvider>>,
}

impl RegistryConfigurationSource {
    /// Create a source from a deferred registry factory
    pub fn new<F, Fut>(factory: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Arc<dyn RegistryHost>>> + Send + 'static,
    {
        Self {
            factory: Box::new(move || factory().boxed()),
            key_mapping: KeyMapping::default(),
            provider: OnceCell::new(),
        }
    }

    /// Create a source whose factory constructs the backend named in `settings`
    pub fn from_settings(settings: &KvconfSettings) -> Self {
        let registry_settings = settings.registry.clone();
        Self::new(move || {
            let registry_settings = registry_settings.clone();
            async move { Ok::<_, anyhow::Error>(kvconf_registry::connect(&registry_settings)?) }
        })
        .with_key_mapping(settings.key_mapping)
    }

    /// Set the key mapping used by the provider
    pub fn with_key_mapping(mut self, key_mapping: KeyMapping) -> Self {
        self.key_mapping = key_mapping;
        self
    }

    /// Whether the provider has been built
    pub fn is_built(&self) -> bool {
        self.provider.initialized()
    }

    /// Get the provider, running the registry factory on first use
    #[instrument(skip(self))]
    pub async fn build(&self) -> Result<Arc<RegistryConfigurationProvider>, SourceError> {
        let provider = self
            .provider
            .get_or_try_init(|| async {
                info!("Resolving registry for configuration source");
                let registry = (self.factory)().await.map_err(SourceError::Bootstrap)?;
                let provider = RegistryConfigurationProvider::new(registry)
                    .with_key_mapping(self.key_mapping);
                info!(key_mapping = ?self.key_mapping, "Configuration source initialized");
                Ok::<_, SourceError>(Arc::new(provider))
            })
            .await?;

        debug!("Configuration source ready");
        Ok(provider.clone())
    }
}

impl std::fmt::Debug for RegistryConfigurationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryConfigurationSource")
            .field("key_mapping", &self.key_mapping)
            .field("built", &self.is_built())
            .finish_non_exhaustive()
    }
}
