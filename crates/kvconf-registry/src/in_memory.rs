//! In-memory registry host
//!
//! Map-backed [`RegistryHost`] for tests and single-process use. A single
//! async `RwLock` guards the map, so a write is visible to every read that
//! starts after it returns.

use async_trait::async_trait;
use kvconf_core::host::is_proper_child;
use kvconf_core::{RegistryEntry, RegistryHost, RegistryResult};
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Registry host keeping every entry in process memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistryHost {
    entries: Arc<RwLock<BTreeMap<String, String>>>,
}

impl InMemoryRegistryHost {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with `entries`.
    ///
    /// Entries without a value are skipped; later duplicates overwrite earlier ones.
    pub fn with_entries<I, E>(entries: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<RegistryEntry>,
    {
        let map = entries
            .into_iter()
            .map(Into::into)
            .filter_map(|entry| entry.value.map(|value| (entry.key, value)))
            .collect();
        Self {
            entries: Arc::new(RwLock::new(map)),
        }
    }

    /// Number of stored entries
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the registry holds no entries
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Copy of every entry, ordered by key
    pub async fn snapshot(&self) -> Vec<RegistryEntry> {
        self.entries
            .read()
            .await
            .iter()
            .map(|(key, value)| RegistryEntry::new(key.clone(), value.clone()))
            .collect()
    }
}

#[async_trait]
impl RegistryHost for InMemoryRegistryHost {
    #[instrument(skip(self, value))]
    async fn put(&self, key: &str, value: &str) -> RegistryResult<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value.to_string());
        debug!(key = %key, "Stored registry entry");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> RegistryResult<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    #[instrument(skip(self))]
    async fn delete(&self, key: &str) -> RegistryResult<()> {
        let mut entries = self.entries.write().await;
        if entries.remove(key).is_some() {
            debug!(key = %key, "Removed registry entry");
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_keys_with_prefix(&self, prefix: &str) -> RegistryResult<Vec<String>> {
        let entries = self.entries.read().await;
        // Keys sharing a prefix are contiguous in a BTreeMap, starting right after the prefix itself.
        let keys: Vec<String> = entries
            .range::<str, _>((Bound::Excluded(prefix), Bound::Unbounded))
            .map(|(key, _)| key)
            .take_while(|key| key.starts_with(prefix))
            .filter(|key| is_proper_child(key, prefix))
            .cloned()
            .collect();

        debug!(prefix = %prefix, count = keys.len(), "Listed registry keys");
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> InMemoryRegistryHost {
        InMemoryRegistryHost::with_entries([
            ("key1", "value1"),
            ("key2", "value2"),
            ("folder/key3", "value3"),
            ("folder/key4", "value4"),
        ])
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let host = InMemoryRegistryHost::new();
        host.put("key1", "value1").await.unwrap();
        assert_eq!(host.get("key1").await.unwrap().as_deref(), Some("value1"));
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let host = seeded();
        assert_eq!(host.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let host = seeded();
        host.put("key1", "updated").await.unwrap();
        assert_eq!(host.get("key1").await.unwrap().as_deref(), Some("updated"));
        assert_eq!(host.len().await, 4);
    }

    #[tokio::test]
    async fn test_delete() {
        let host = seeded();
        host.delete("key1").await.unwrap();
        assert_eq!(host.get("key1").await.unwrap(), None);

        // Deleting an absent key is not an error
        host.delete("key1").await.unwrap();
        assert_eq!(host.len().await, 3);
    }

    #[tokio::test]
    async fn test_list_keys_with_prefix() {
        let host = seeded();
        let keys = host.list_keys_with_prefix("folder/").await.unwrap();
        assert_eq!(keys, vec!["folder/key3", "folder/key4"]);
    }

    #[tokio::test]
    async fn test_list_excludes_exact_prefix_match() {
        let host = seeded();
        host.put("folder/", "").await.unwrap();
        host.put("folderx", "other").await.unwrap();

        let keys = host.list_keys_with_prefix("folder/").await.unwrap();
        assert_eq!(keys, vec!["folder/key3", "folder/key4"]);
    }

    #[tokio::test]
    async fn test_list_empty_prefix_matches_everything() {
        let host = seeded();
        let keys = host.list_keys_with_prefix("").await.unwrap();
        assert_eq!(keys, vec!["folder/key3", "folder/key4", "key1", "key2"]);
    }

    #[tokio::test]
    async fn test_list_unknown_prefix() {
        let host = seeded();
        assert!(host.list_keys_with_prefix("nope/").await.unwrap().is_empty());
    }

    #[test]
    fn test_absent_seed_entries_skipped() {
        let host = InMemoryRegistryHost::with_entries([
            RegistryEntry::new("key1", "value1"),
            RegistryEntry::absent("key2"),
        ]);
        let snapshot = tokio_test::block_on(host.snapshot());
        assert_eq!(snapshot, vec![RegistryEntry::new("key1", "value1")]);
    }

    #[tokio::test]
    async fn test_concurrent_writers() {
        let host = InMemoryRegistryHost::new();
        let mut handles = Vec::new();
        for i in 0..32 {
            let host = host.clone();
            handles.push(tokio::spawn(async move {
                host.put(&format!("node/{:02}", i), &i.to_string()).await.unwrap();
                host.list_keys_with_prefix("node/").await.unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let keys = host.list_keys_with_prefix("node/").await.unwrap();
        assert_eq!(keys.len(), 32);
        assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
