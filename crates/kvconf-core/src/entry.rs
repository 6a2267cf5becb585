//! Registry entries

use serde::{Deserialize, Serialize};

/// A single key/value pair held by a registry.
///
/// Keys are opaque and live in one flat namespace; the registry enforces no
/// hierarchy. An entry without a value is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    /// Registry-space key
    pub key: String,
    /// Stored value, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl RegistryEntry {
    /// Create an entry holding `value`
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }

    /// Create an entry for a key with no value
    pub fn absent(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }
}

impl<K, V> From<(K, V)> for RegistryEntry
where
    K: Into<String>,
    V: Into<String>,
{
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}
