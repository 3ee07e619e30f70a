//! Fetch error types and conversions
//!
//! This module provides the error type every [`AssetSource`](crate::AssetSource)
//! implementation reports, including missing resources, transport failures
//! and payloads that could not be decoded.

use scene_assembly_core::SceneError;
use thiserror::Error;

/// Result type alias for fetch operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Fetch errors
///
/// Cloneable so a failed fetch can be shared by every caller waiting on the
/// same cache entry.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// Resource does not exist
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Transport failure talking to the service
    #[error("Transport error: {0}")]
    Transport(String),

    /// Payload could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Cache error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Internal source error
    #[error("Internal source error: {0}")]
    Internal(String),

    /// Domain error from core crate
    #[error("Domain error: {0}")]
    Domain(#[from] SceneError),
}

impl SourceError {
    /// Check if this error is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::NotFound(_))
    }

    /// Check if this is a transient error that could be retried
    pub fn is_transient(&self) -> bool {
        matches!(self, SourceError::Transport(_))
    }
}

/// Convert serde_json errors
impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Decode(format!("{}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(SourceError::NotFound("x".into()).is_not_found());
        assert!(!SourceError::NotFound("x".into()).is_transient());
        assert!(SourceError::Transport("reset".into()).is_transient());
        assert!(!SourceError::Decode("bad".into()).is_transient());
    }

    #[test]
    fn test_from_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let source_err: SourceError = err.into();
        assert!(matches!(source_err, SourceError::Decode(_)));
    }

    #[test]
    fn test_from_domain_error() {
        let err: SourceError = SceneError::NoPackages("a.b".into()).into();
        assert!(err.to_string().contains("a.b"));
    }
}
