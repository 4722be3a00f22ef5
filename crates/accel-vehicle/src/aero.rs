//! Aerodynamic drag and downforce.

use crate::common::{check_finite, check_non_negative, check_positive};
use crate::error::VehicleResult;
use accel_config::AerodynamicsProperties;
use accel_core::numeric::sign_or_zero;

/// Aerodynamic loads at one airspeed.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AeroForces {
    /// Longitudinal drag, signed against the airspeed (N)
    pub drag: f64,
    /// Load added to the front axle (N)
    pub downforce_front: f64,
    /// Load added to the rear axle (N)
    pub downforce_rear: f64,
}

#[derive(Clone, Debug)]
pub struct AerodynamicsModel {
    pub cda: f64,
    pub cl_front: f64,
    pub cl_rear: f64,
    pub air_density: f64,
}

impl AerodynamicsModel {
    pub fn from_config(aero: &AerodynamicsProperties) -> VehicleResult<Self> {
        check_non_negative(aero.cda, "drag area cannot be negative")?;
        check_finite(aero.cl_front, "front lift coefficient")?;
        check_finite(aero.cl_rear, "rear lift coefficient")?;
        check_positive(aero.air_density, "air density must be positive")?;
        Ok(Self {
            cda: aero.cda,
            cl_front: aero.cl_front,
            cl_rear: aero.cl_rear,
            air_density: aero.air_density,
        })
    }

    pub fn dynamic_pressure(&self, airspeed: f64) -> f64 {
        0.5 * self.air_density * airspeed * airspeed
    }

    /// Forces from dynamic pressure `q = ½ρv²`.
    ///
    /// Lift coefficients are downforce coefficients: a positive value presses
    /// the axle into the ground.
    pub fn forces(&self, airspeed: f64) -> AeroForces {
        let q = self.dynamic_pressure(airspeed);
        AeroForces {
            drag: -sign_or_zero(airspeed) * self.cda * q,
            downforce_front: self.cl_front * q,
            downforce_rear: self.cl_rear * q,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accel_config::VehicleConfig;
    use accel_core::{Tolerances, nearly_equal};

    fn model() -> AerodynamicsModel {
        AerodynamicsModel::from_config(&VehicleConfig::formula_student_baseline().aerodynamics)
            .unwrap()
    }

    #[test]
    fn no_forces_at_rest() {
        assert_eq!(model().forces(0.0), AeroForces::default());
    }

    #[test]
    fn drag_opposes_airspeed() {
        let aero = model();
        let f = aero.forces(20.0);
        // q = 0.5 * 1.225 * 400 = 245
        assert!(nearly_equal(f.drag, -1.1 * 245.0, Tolerances::default()));
        assert!(nearly_equal(f.downforce_front, 0.8 * 245.0, Tolerances::default()));
        assert!(nearly_equal(f.downforce_rear, 245.0, Tolerances::default()));
        assert!(aero.forces(-20.0).drag > 0.0);
    }

    #[test]
    fn downforce_grows_with_square_of_speed() {
        let aero = model();
        let ratio = aero.forces(30.0).downforce_rear / aero.forces(15.0).downforce_rear;
        assert!(nearly_equal(ratio, 4.0, Tolerances::default()));
    }

    #[test]
    fn rejects_negative_drag_area() {
        let mut props = VehicleConfig::formula_student_baseline().aerodynamics;
        props.cda = -0.1;
        assert!(AerodynamicsModel::from_config(&props).is_err());
    }
}
