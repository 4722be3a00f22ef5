//! Shared argument checks for model constructors.

use crate::error::{VehicleError, VehicleResult};
use accel_core::numeric::ensure_finite;

/// Ensure a value is finite, returning VehicleError if not.
pub fn check_finite(value: f64, what: &'static str) -> VehicleResult<f64> {
    Ok(ensure_finite(value, what)?)
}

/// Finite and strictly positive.
pub fn check_positive(value: f64, what: &'static str) -> VehicleResult<f64> {
    check_finite(value, what)?;
    if value <= 0.0 {
        return Err(VehicleError::InvalidArg { what });
    }
    Ok(value)
}

/// Finite and not negative.
pub fn check_non_negative(value: f64, what: &'static str) -> VehicleResult<f64> {
    check_finite(value, what)?;
    if value < 0.0 {
        return Err(VehicleError::InvalidArg { what });
    }
    Ok(value)
}

/// Efficiency in (0, 1].
pub fn check_efficiency(value: f64, what: &'static str) -> VehicleResult<f64> {
    check_positive(value, what)?;
    if value > 1.0 {
        return Err(VehicleError::InvalidArg { what });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_finite() {
        assert!(check_finite(1.0, "test").is_ok());
        assert!(check_finite(f64::INFINITY, "test").is_err());
        assert!(check_finite(f64::NAN, "test").is_err());
    }

    #[test]
    fn test_check_positive() {
        assert_eq!(check_positive(2.0, "x"), Ok(2.0));
        assert!(check_positive(0.0, "x").is_err());
        assert!(check_non_negative(0.0, "x").is_ok());
        assert!(check_non_negative(-1e-9, "x").is_err());
    }

    #[test]
    fn test_check_efficiency() {
        assert!(check_efficiency(1.0, "eta").is_ok());
        assert!(check_efficiency(1.01, "eta").is_err());
        assert!(check_efficiency(0.0, "eta").is_err());
    }
}
