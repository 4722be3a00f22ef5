//! Error types for simulation operations.

use accel_core::CoreError;
use accel_vehicle::VehicleError;
use thiserror::Error;

/// Errors encountered while building or running a simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid configuration: {}", violations.join(", "))]
    InvalidConfig { violations: Vec<String> },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-finite {what} at t = {time} s: {value}")]
    NonFinite {
        what: &'static str,
        value: f64,
        time: f64,
    },

    #[error("Backend error: {message}")]
    Backend { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<VehicleError> for SimError {
    fn from(e: VehicleError) -> Self {
        match e {
            VehicleError::InvalidArg { what } | VehicleError::NonPhysical { what } => {
                SimError::InvalidArg { what }
            }
        }
    }
}

impl From<CoreError> for SimError {
    fn from(e: CoreError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}
