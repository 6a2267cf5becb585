//! Error types for the configuration source layer

use thiserror::Error;

/// Errors from building a configuration source
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Registry bootstrap failed: {0}")]
    Bootstrap(#[from] anyhow::Error),
}

/// Errors from loading kvconf settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
}

/// Errors from installing the tracing subscriber
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },
    #[error("Tracing subscriber already installed: {0}")]
    AlreadyInitialized(String),
}
