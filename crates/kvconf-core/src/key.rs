//! Key translation between registry space and configuration space
//!
//! Registries name keys with `/` (`folder/key3`); configuration systems use
//! `:` (`folder:key3`). The translation is a character swap, so it is
//! reversible for any key that does not literally contain the opposite
//! separator. Keys containing both separators are not supported.

use serde::{Deserialize, Serialize};

/// Hierarchy separator of configuration-space keys
pub const CONFIG_SEPARATOR: char = ':';

/// Hierarchy separator of registry-space keys
pub const REGISTRY_SEPARATOR: char = '/';

/// Separator pair used to translate keys between the two key spaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMapping {
    /// Separator used by the configuration system
    pub config_separator: char,
    /// Separator used by the registry
    pub registry_separator: char,
}

impl KeyMapping {
    /// Create a mapping for a custom separator pair
    pub const fn new(config_separator: char, registry_separator: char) -> Self {
        Self {
            config_separator,
            registry_separator,
        }
    }

    /// Mapping for configuration systems that already use registry-style keys
    pub const fn passthrough() -> Self {
        Self::new(REGISTRY_SEPARATOR, REGISTRY_SEPARATOR)
    }

    /// Whether both key spaces share a separator
    pub fn is_passthrough(&self) -> bool {
        self.config_separator == self.registry_separator
    }

    /// Translate a configuration-space key to registry space
    pub fn to_registry(&self, key: &str) -> String {
        swap(key, self.config_separator, self.registry_separator)
    }

    /// Translate a registry-space key to configuration space
    pub fn to_config(&self, key: &str) -> String {
        swap(key, self.registry_separator, self.config_separator)
    }

    /// Terminate a non-empty parent path with a separator so that prefix
    /// matching happens on a segment boundary.
    ///
    /// A path already ending in either separator is left alone. The empty
    /// path is the root and stays empty.
    pub fn normalize_parent(&self, parent_path: &str) -> String {
        let mut normalized = parent_path.to_string();
        if !normalized.is_empty()
            && !normalized.ends_with(self.config_separator)
            && !normalized.ends_with(self.registry_separator)
        {
            normalized.push(self.config_separator);
        }
        normalized
    }

    /// Whether `path` is written with the registry separator only.
    ///
    /// Callers addressing a parent as `folder/` get its children back in the
    /// same spelling.
    pub fn is_registry_spelled(&self, path: &str) -> bool {
        !self.is_passthrough()
            && path.contains(self.registry_separator)
            && !path.contains(self.config_separator)
    }
}

impl Default for KeyMapping {
    fn default() -> Self {
        Self::new(CONFIG_SEPARATOR, REGISTRY_SEPARATOR)
    }
}

fn swap(key: &str, from: char, to: char) -> String {
    if from == to {
        return key.to_string();
    }
    key.chars().map(|c| if c == from { to } else { c }).collect()
}
