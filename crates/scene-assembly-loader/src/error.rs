//! Loader error types
//!
//! This module defines the error taxonomy surfaced to callers of the loader,
//! mapping domain and fetch errors to loader-level errors.

use scene_assembly_core::SceneError;
use scene_assembly_source::SourceError;
use thiserror::Error;

/// Result type alias for loader operations
pub type LoaderResult<T> = std::result::Result<T, LoaderError>;

/// Loader error types
#[derive(Error, Debug)]
pub enum LoaderError {
    /// A sub-model could not be assembled
    #[error("Failed to load model {model}: {reason}")]
    ModelLoading { model: String, reason: String },

    /// A query found nothing for an otherwise valid id
    #[error("No value: {0}")]
    NoValue(String),

    /// The service does not support this client
    #[error("Incompatible version: {0}")]
    IncompatibleVersion(String),

    /// Collaborator failure outside assembly
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal loader error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LoaderError {
    /// Build a model loading error
    pub fn model_loading(model: impl Into<String>, reason: impl ToString) -> Self {
        LoaderError::ModelLoading {
            model: model.into(),
            reason: reason.to_string(),
        }
    }

    /// Check if this error is a model loading error
    pub fn is_model_loading(&self) -> bool {
        matches!(self, LoaderError::ModelLoading { .. })
    }

    /// Check if this error reports an absent value
    pub fn is_no_value(&self) -> bool {
        matches!(self, LoaderError::NoValue(_))
    }
}

impl From<SceneError> for LoaderError {
    fn from(err: SceneError) -> Self {
        match err {
            SceneError::NoPackages(ref model) | SceneError::FallbackRejected(ref model) => {
                LoaderError::model_loading(model.clone(), &err)
            }
            SceneError::IncompatibleVersion { .. } => {
                LoaderError::IncompatibleVersion(err.to_string())
            }
            SceneError::SerializationError(msg) => LoaderError::Internal(msg),
            SceneError::InternalError(msg) => LoaderError::Internal(msg),
        }
    }
}

impl From<SourceError> for LoaderError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Domain(err) => LoaderError::from(err),
            SourceError::Internal(msg) => LoaderError::Internal(msg),
            other => LoaderError::Fetch(other.to_string()),
        }
    }
}

impl From<config::ConfigError> for LoaderError {
    fn from(err: config::ConfigError) -> Self {
        LoaderError::Configuration(err.to_string())
    }
}
