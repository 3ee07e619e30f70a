//! Error types for scene assembly

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, SceneError>;

/// Main error type for pure assembly operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// Descriptor carries neither a primary nor a fallback package set
    #[error("Model {0} does not have any packages")]
    NoPackages(String),

    /// Only the fallback package set exists and the loading policy forbids it
    #[error("Model {0} only has fallback packages and fallback is disabled")]
    FallbackRejected(String),

    /// Remote service does not support this client version
    #[error("Client version {client} is not supported by the service (current: {current})")]
    IncompatibleVersion { client: String, current: String },

    /// Serialization/Deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Generic internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<serde_json::Error> for SceneError {
    fn from(err: serde_json::Error) -> Self {
        SceneError::SerializationError(err.to_string())
    }
}

impl From<semver::Error> for SceneError {
    fn from(err: semver::Error) -> Self {
        SceneError::InternalError(format!("Invalid version: {}", err))
    }
}
