//! kvconf settings
//!
//! Loaded in layers, later layers winning:
//! 1. built-in defaults (in-memory registry, `:` to `/` key mapping, `info` logging)
//! 2. an optional settings file (any format the `config` crate understands)
//! 3. environment variables prefixed `KVCONF`, nested with `__`,
//!    e.g. `KVCONF__REGISTRY__CONSUL__ADDRESS=http://consul:8500`
//!
//! A `.env` file in the working directory is read into the environment first.

use config::{Config, Environment, File, FileFormat};
use kvconf_core::KeyMapping;
use kvconf_registry::RegistrySettings;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

use crate::error::SettingsError;
use crate::telemetry::TracingSettings;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "KVCONF";

/// Nesting separator for environment variables
pub const ENV_SEPARATOR: &str = "__";

/// Top-level kvconf settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KvconfSettings {
    /// Registry backend selection
    #[serde(default)]
    pub registry: RegistrySettings,
    /// Separator translation between configuration and registry keys
    #[serde(default)]
    pub key_mapping: KeyMapping,
    /// Logging
    #[serde(default)]
    pub tracing: TracingSettings,
}

impl KvconfSettings {
    /// Load settings from defaults, an optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        if let Ok(dotenv) = dotenvy::dotenv() {
            debug!(path = %dotenv.display(), "Loaded .env file");
        }

        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }
        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR),
            )
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }

    /// Parse settings from TOML text, without consulting the environment
    pub fn from_toml(contents: &str) -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::LogFormat;
    use kvconf_registry::BackendKind;

    #[test]
    fn test_defaults() {
        let settings = KvconfSettings::default();
        assert_eq!(settings.registry.backend, BackendKind::InMemory);
        assert_eq!(settings.key_mapping, KeyMapping::default());
        assert_eq!(settings.tracing.filter, "info");
    }

    #[test]
    fn test_from_toml() {
        let settings = KvconfSettings::from_toml(
            r#"
            [registry]
            backend = "consul"

            [registry.consul]
            address = "http://consul.service:8500"
            datacenter = "eu-west"
            timeout_secs = 3

            [key_mapping]
            config_separator = "/"
            registry_separator = "/"

            [tracing]
            filter = "kvconf_service=debug"
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(settings.registry.backend, BackendKind::Consul);
        assert_eq!(settings.registry.consul.address, "http://consul.service:8500");
        assert_eq!(settings.registry.consul.datacenter.as_deref(), Some("eu-west"));
        assert_eq!(settings.registry.consul.timeout_secs, 3);
        assert!(settings.key_mapping.is_passthrough());
        assert_eq!(settings.tracing.format, LogFormat::Json);
    }

    #[test]
    fn test_from_toml_empty_uses_defaults() {
        let settings = KvconfSettings::from_toml("").unwrap();
        assert_eq!(settings.registry.backend, BackendKind::InMemory);
        assert_eq!(settings.registry.consul.address, "http://localhost:8500");
    }

    #[test]
    fn test_from_toml_rejects_unknown_backend() {
        let result = KvconfSettings::from_toml(
            r#"
            [registry]
            backend = "etcd"
            "#,
        );
        assert!(matches!(result, Err(SettingsError::Load(_))));
    }

    #[test]
    fn test_load_reads_environment() {
        std::env::set_var("KVCONF__REGISTRY__CONSUL__DATACENTER", "env-dc");
        let settings = KvconfSettings::load(None).unwrap();
        std::env::remove_var("KVCONF__REGISTRY__CONSUL__DATACENTER");

        assert_eq!(settings.registry.consul.datacenter.as_deref(), Some("env-dc"));
    }
}
