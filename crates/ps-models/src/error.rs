//! Error types for model construction and config validation.

use thiserror::Error;

/// Errors raised when building a model or validating its configuration.
///
/// Cyclic updates never fail; they clamp.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: &'static str },
}

pub type ModelResult<T> = Result<T, ModelError>;

impl From<ps_core::PsError> for ModelError {
    fn from(e: ps_core::PsError) -> Self {
        match e {
            ps_core::PsError::InvalidArg { what } => ModelError::InvalidArg { what },
            ps_core::PsError::NonFinite { what, .. } | ps_core::PsError::Invariant { what } => {
                ModelError::NonPhysical { what }
            }
        }
    }
}
