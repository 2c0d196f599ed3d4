//! Error types for the runtime layer.

use std::path::PathBuf;

/// Runtime error wrapping the model, point and configuration layers behind
/// one interface for the driver loop and CLI.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("Failed to read plant config: {path}")]
    ConfigFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config validation failed: {0}")]
    Validation(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Point error: {0}")]
    Points(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;

impl From<ps_models::ModelError> for RuntimeError {
    fn from(err: ps_models::ModelError) -> Self {
        RuntimeError::Model(err.to_string())
    }
}

impl From<ps_points::PointError> for RuntimeError {
    fn from(err: ps_points::PointError) -> Self {
        RuntimeError::Points(err.to_string())
    }
}

impl From<ps_core::PsError> for RuntimeError {
    fn from(err: ps_core::PsError) -> Self {
        RuntimeError::Validation(err.to_string())
    }
}
