//! Error types for point registration and access.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PointError {
    #[error("Unknown point id: {id}")]
    UnknownId { id: u16 },

    #[error("Duplicate point name: {name}")]
    DuplicateName { name: String },

    #[error("Point '{name}' is read-only")]
    ReadOnly { name: String },

    #[error("Type mismatch writing '{name}': expected {expected}, got {got}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        got: &'static str,
    },

    #[error("Value out of range for '{name}'")]
    OutOfRange { name: String },
}

pub type PointResult<T> = Result<T, PointError>;
