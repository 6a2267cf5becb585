//! Registry capability
//!
//! The four operations every registry backend provides. Backends are selected
//! when a configuration source is constructed and are used behind
//! `Arc<dyn RegistryHost>`.

use async_trait::async_trait;

use crate::error::RegistryResult;

/// Uniform capability set over a flat key-value registry.
///
/// Implementations must tolerate concurrent calls on the same instance.
/// Consistency is whatever the backend provides; callers do not strengthen it.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait RegistryHost: Send + Sync {
    /// Create or overwrite the entry for `key`
    async fn put(&self, key: &str, value: &str) -> RegistryResult<()>;

    /// Fetch the value for `key`, `None` when the key is absent
    async fn get(&self, key: &str) -> RegistryResult<Option<String>>;

    /// Remove `key`; removing an absent key succeeds
    async fn delete(&self, key: &str) -> RegistryResult<()>;

    /// List keys that start with `prefix`, in lexicographic order.
    ///
    /// A key equal to `prefix` is not part of the result. An empty prefix
    /// matches every key.
    async fn list_keys_with_prefix(&self, prefix: &str) -> RegistryResult<Vec<String>>;
}

/// Whether `key` belongs in a listing for `prefix`
pub fn is_proper_child(key: &str, prefix: &str) -> bool {
    key.len() > prefix.len() && key.starts_with(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RegistryError;
    use std::sync::Arc;

    #[test]
    fn test_is_proper_child() {
        assert!(is_proper_child("folder/key3", "folder/"));
        assert!(!is_proper_child("folder/", "folder/"));
        assert!(!is_proper_child("folderkey", "folder/"));
        assert!(is_proper_child("key1", ""));
    }

    #[tokio::test]
    async fn test_mock_host_behind_trait_object() {
        let mut mock = MockRegistryHost::new();
        mock.expect_get()
            .withf(|key| key == "key1")
            .returning(|_| Ok(Some("value1".to_string())));
        mock.expect_put()
            .returning(|_, _| Err(RegistryError::connection("connection refused")));

        let host: Arc<dyn RegistryHost> = Arc::new(mock);
        assert_eq!(host.get("key1").await.unwrap().as_deref(), Some("value1"));
        assert!(host.put("key1", "value2").await.is_err());
    }
}
