//! Error types for vehicle model construction.

use accel_core::CoreError;
use thiserror::Error;

/// Errors raised when a model is built from non-physical parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VehicleError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },
}

pub type VehicleResult<T> = Result<T, VehicleError>;

impl From<CoreError> for VehicleError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::NonFinite { what, .. } => VehicleError::NonPhysical { what },
            CoreError::InvalidArg { what } => VehicleError::InvalidArg { what },
            CoreError::Invariant { what } => VehicleError::NonPhysical { what },
        }
    }
}
