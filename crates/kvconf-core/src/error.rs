//! Registry error taxonomy
//!
//! A missing key is not an error: lookups report it as `Ok(None)`. Every
//! variant here means the registry could not answer the request.

use thiserror::Error;

/// Errors surfaced by a [`RegistryHost`](crate::RegistryHost) implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Registry unreachable: {0}")]
    Connection(String),
    #[error("Registry backend rejected request ({status}): {message}")]
    Backend { status: u16, message: String },
    #[error("Invalid registry response: {0}")]
    InvalidResponse(String),
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

impl RegistryError {
    /// Build a connection error from any displayable transport failure
    pub fn connection(err: impl std::fmt::Display) -> Self {
        Self::Connection(err.to_string())
    }

    /// Whether the failure happened before the registry produced a response
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RegistryError::Backend {
            status: 500,
            message: "rpc error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Registry backend rejected request (500): rpc error"
        );
    }

    #[test]
    fn test_is_transport() {
        assert!(RegistryError::connection("refused").is_transport());
        assert!(!RegistryError::InvalidResponse("garbage".to_string()).is_transport());
    }
}
