//! Registry backend settings

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while constructing a registry backend
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Invalid registry address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },
    #[error("Failed to build registry HTTP client: {0}")]
    Client(String),
}

/// Which registry backend to construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    InMemory,
    Consul,
}

/// Connection settings for a Consul agent
#[derive(Debug, Clone, Deserialize)]
pub struct ConsulSettings {
    /// Base address of the agent's HTTP API
    #[serde(default = "default_address")]
    pub address: String,
    /// Datacenter to query, the agent's own when unset
    #[serde(default)]
    pub datacenter: Option<String>,
    /// ACL token sent as `X-Consul-Token`
    #[serde(default)]
    pub token: Option<SecretString>,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ConsulSettings {
    /// Settings for an agent at `address` with default timeout
    pub fn with_address(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ConsulSettings {
    fn default() -> Self {
        Self {
            address: default_address(),
            datacenter: None,
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_address() -> String {
    "http://localhost:8500".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Backend selection plus per-backend settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrySettings {
    #[serde(default)]
    pub backend: BackendKind,
    #[serde(default)]
    pub consul: ConsulSettings,
}
