//! Lazy configuration source construction from settings

use kvconf_core::RegistryHost;
use kvconf_integration_tests::{seed, ConsulKvDouble};
use kvconf_registry::InMemoryRegistryHost;
use kvconf_service::{ConfigurationProvider, KvconfSettings, RegistryConfigurationSource};
use std::collections::HashSet;
use std::sync::Arc;

#[tokio::test]
async fn source_from_consul_settings() {
    let (server, double) = ConsulKvDouble::start().await;
    let settings = KvconfSettings::from_toml(&format!(
        r#"
        [registry]
        backend = "consul"

        [registry.consul]
        address = "{}"
        "#,
        server.uri()
    ))
    .unwrap();

    let source = RegistryConfigurationSource::from_settings(&settings);
    assert!(!source.is_built());
    assert!(server.received_requests().await.unwrap_or_default().is_empty());

    let provider = source.build().await.unwrap();
    provider.set("feature:enabled", "true").await;

    assert_eq!(double.value("feature/enabled").as_deref(), Some("true"));
    assert_eq!(provider.try_get("feature:enabled").await.as_deref(), Some("true"));
    assert_eq!(
        provider.get_child_keys(&HashSet::new(), "feature").await,
        vec!["feature:enabled"]
    );
}

#[tokio::test]
async fn source_with_async_seeding_factory() {
    let source = RegistryConfigurationSource::new(|| async {
        let host = InMemoryRegistryHost::new();
        seed(&host).await?;
        Ok::<_, anyhow::Error>(Arc::new(host) as Arc<dyn RegistryHost>)
    });

    let provider = source.build().await.unwrap();
    assert_eq!(provider.try_get("folder:key4").await.as_deref(), Some("value4"));
    assert_eq!(
        provider.get_child_keys(&HashSet::new(), "").await,
        vec!["folder:key3", "folder:key4", "key1", "key2"]
    );
}
