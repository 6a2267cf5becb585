//! Tracing bootstrap
//!
//! kvconf crates only emit `tracing` events; embedding applications usually
//! install their own subscriber. [`init_tracing`] is for binaries and tests
//! that want kvconf's default output.

use serde::{Deserialize, Serialize};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::TelemetryError;

/// Output format of the fmt layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for TracingSettings {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            format: LogFormat::default(),
        }
    }
}

fn default_filter() -> String {
    "info".to_string()
}

/// Build the filter, preferring `RUST_LOG` over the configured directive
pub fn env_filter(settings: &TracingSettings) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&settings.filter).map_err(|e| TelemetryError::InvalidFilter {
        filter: settings.filter.clone(),
        reason: e.to_string(),
    })
}

/// Install the global tracing subscriber.
///
/// Fails if another global subscriber is already installed.
pub fn init_tracing(settings: &TracingSettings) -> Result<(), TelemetryError> {
    let registry = tracing_subscriber::registry().with(env_filter(settings)?);

    let result = match settings.format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Pretty => registry.with(fmt::layer()).try_init(),
    };
    result.map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let settings = TracingSettings {
            filter: "kvconf=loud".to_string(),
            format: LogFormat::Pretty,
        };
        assert!(matches!(
            env_filter(&settings),
            Err(TelemetryError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn test_second_init_fails() {
        let settings = TracingSettings::default();
        let _ = init_tracing(&settings);
        assert!(matches!(
            init_tracing(&settings),
            Err(TelemetryError::AlreadyInitialized(_))
        ));
    }
}
