//! Longitudinal tire model.
//!
//! ## Model
//!
//! Traction is `Fx = mu(slip) * Fz` where `mu` comes from a [`FrictionCurve`].
//! The default curve is piecewise linear:
//!
//! ```text
//! mu(s) = mu_max * |s| / s_opt                          |s| <= s_opt
//! mu(s) = mu_max * (1 - (|s| - s_opt) / (1 - s_opt))    |s| >  s_opt, floored at 0
//! ```
//!
//! Rolling resistance is `crr * Fz`, opposing the direction of travel.

use crate::common::{check_non_negative, check_positive};
use crate::error::{VehicleError, VehicleResult};
use accel_config::{EnvironmentProperties, TireProperties};
use accel_core::constants::LOW_SPEED_THRESHOLD_MPS;
use accel_core::numeric::sign_or_zero;

/// Friction coefficient as a function of slip ratio.
pub trait FrictionCurve {
    fn mu(&self, slip_ratio: f64) -> f64;

    /// Peak of the curve, used for grip limits.
    fn mu_max(&self) -> f64;
}

/// Linear rise to the optimal slip, then linear decay to zero at full slip.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearFriction {
    pub mu_max: f64,
    pub slip_optimal: f64,
}

impl LinearFriction {
    pub fn new(mu_max: f64, slip_optimal: f64) -> VehicleResult<Self> {
        check_positive(mu_max, "peak friction coefficient must be positive")?;
        check_positive(slip_optimal, "optimal slip ratio must be positive")?;
        if slip_optimal >= 1.0 {
            return Err(VehicleError::InvalidArg {
                what: "optimal slip ratio must be below 1",
            });
        }
        Ok(Self {
            mu_max,
            slip_optimal,
        })
    }
}

impl FrictionCurve for LinearFriction {
    fn mu(&self, slip_ratio: f64) -> f64 {
        let s = slip_ratio.abs();
        if s <= self.slip_optimal {
            self.mu_max * (s / self.slip_optimal)
        } else {
            let decay = (s - self.slip_optimal) / (1.0 - self.slip_optimal);
            (self.mu_max * (1.0 - decay)).max(0.0)
        }
    }

    fn mu_max(&self) -> f64 {
        self.mu_max
    }
}

/// Per-axle tire forces.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TireForces {
    /// Traction force available at this slip (N)
    pub traction: f64,
    /// Rolling resistance, signed against velocity (N)
    pub rolling_resistance: f64,
}

/// Slip ratio of a wheel against the ground, clamped to [-1, 1].
///
/// Below 0.1 m/s of vehicle speed the ratio is undefined; a spinning wheel
/// reports full slip in its direction of rotation and a stopped one reports 0.
pub fn slip_ratio(wheel_angular_velocity: f64, radius: f64, vehicle_velocity: f64) -> f64 {
    let wheel_velocity = wheel_angular_velocity * radius;
    let slip = if vehicle_velocity.abs() < LOW_SPEED_THRESHOLD_MPS {
        if wheel_velocity > LOW_SPEED_THRESHOLD_MPS {
            1.0
        } else if wheel_velocity < -LOW_SPEED_THRESHOLD_MPS {
            -1.0
        } else {
            0.0
        }
    } else {
        (wheel_velocity - vehicle_velocity) / vehicle_velocity.abs()
    };
    slip.clamp(-1.0, 1.0)
}

/// Tire model with a swappable friction curve.
#[derive(Clone, Debug)]
pub struct TireModel<C: FrictionCurve = LinearFriction> {
    /// Loaded rolling radius (m)
    pub radius: f64,
    pub rolling_resistance_coeff: f64,
    pub curve: C,
}

impl TireModel<LinearFriction> {
    /// Build the default tire, scaling peak grip by the surface factor.
    pub fn from_config(
        tires: &TireProperties,
        environment: &EnvironmentProperties,
    ) -> VehicleResult<Self> {
        check_positive(environment.surface_mu_scaling, "surface grip scaling must be positive")?;
        let curve = LinearFriction::new(
            tires.mu_max * environment.surface_mu_scaling,
            tires.mu_slip_optimal,
        )?;
        Self::with_curve(tires.radius_loaded, tires.rolling_resistance_coeff, curve)
    }
}

impl<C: FrictionCurve> TireModel<C> {
    pub fn with_curve(radius: f64, rolling_resistance_coeff: f64, curve: C) -> VehicleResult<Self> {
        check_positive(radius, "tire radius must be positive")?;
        check_non_negative(
            rolling_resistance_coeff,
            "rolling resistance coefficient cannot be negative",
        )?;
        Ok(Self {
            radius,
            rolling_resistance_coeff,
            curve,
        })
    }

    pub fn slip_ratio(&self, wheel_angular_velocity: f64, vehicle_velocity: f64) -> f64 {
        slip_ratio(wheel_angular_velocity, self.radius, vehicle_velocity)
    }

    pub fn friction_coefficient(&self, slip_ratio: f64) -> f64 {
        self.curve.mu(slip_ratio)
    }

    pub fn mu_max(&self) -> f64 {
        self.curve.mu_max()
    }

    pub fn longitudinal_force(&self, normal_force: f64, slip_ratio: f64, velocity: f64) -> TireForces {
        let traction = self.friction_coefficient(slip_ratio) * normal_force;
        let rolling_resistance =
            -sign_or_zero(velocity) * (self.rolling_resistance_coeff * normal_force).abs();
        TireForces {
            traction,
            rolling_resistance,
        }
    }

    /// Largest wheel torque the tire can carry at this normal load (N·m).
    pub fn grip_torque_limit(&self, normal_force: f64) -> f64 {
        self.mu_max() * normal_force * self.radius
    }

    /// Angular velocity of a free-rolling wheel at this ground speed.
    pub fn rolling_speed(&self, vehicle_velocity: f64) -> f64 {
        vehicle_velocity / self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accel_config::VehicleConfig;
    use accel_core::{Tolerances, nearly_equal};

    fn baseline_tire() -> TireModel {
        let config = VehicleConfig::formula_student_baseline();
        TireModel::from_config(&config.tires, &config.environment).unwrap()
    }

    #[test]
    fn slip_is_zero_when_wheel_matches_ground() {
        let slip = slip_ratio(10.0, 0.2286, 2.286);
        assert!(nearly_equal(slip, 0.0, Tolerances::default()));
    }

    #[test]
    fn slip_at_standstill() {
        assert_eq!(slip_ratio(5.0, 0.2286, 0.0), 1.0);
        assert_eq!(slip_ratio(-5.0, 0.2286, 0.05), -1.0);
        assert_eq!(slip_ratio(0.1, 0.2286, 0.0), 0.0);
    }

    #[test]
    fn slip_is_clamped() {
        assert_eq!(slip_ratio(100.0, 0.2286, 1.0), 1.0);
        assert_eq!(slip_ratio(-100.0, 0.2286, 1.0), -1.0);
    }

    #[test]
    fn friction_curve_boundaries() {
        let tire = baseline_tire();
        assert_eq!(tire.friction_coefficient(0.0), 0.0);
        assert_eq!(tire.friction_coefficient(0.15), 1.5);
        assert_eq!(tire.friction_coefficient(1.0), 0.0);
        assert!(nearly_equal(
            tire.friction_coefficient(0.075),
            0.75,
            Tolerances::default()
        ));
    }

    #[test]
    fn friction_is_symmetric_in_slip() {
        let tire = baseline_tire();
        assert_eq!(tire.friction_coefficient(-0.3), tire.friction_coefficient(0.3));
    }

    #[test]
    fn rolling_resistance_opposes_motion() {
        let tire = baseline_tire();
        let forward = tire.longitudinal_force(1000.0, 0.1, 5.0);
        let reverse = tire.longitudinal_force(1000.0, 0.1, -5.0);
        let parked = tire.longitudinal_force(1000.0, 0.0, 0.0);
        assert!(nearly_equal(forward.rolling_resistance, -15.0, Tolerances::default()));
        assert!(nearly_equal(reverse.rolling_resistance, 15.0, Tolerances::default()));
        assert_eq!(parked.rolling_resistance, 0.0);
        assert_eq!(parked.traction, 0.0);
    }

    #[test]
    fn surface_scaling_lowers_peak_grip() {
        let mut config = VehicleConfig::formula_student_baseline();
        config.environment.surface_mu_scaling = 0.5;
        let tire = TireModel::from_config(&config.tires, &config.environment).unwrap();
        assert_eq!(tire.mu_max(), 0.75);
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(LinearFriction::new(1.5, 1.0).is_err());
        assert!(LinearFriction::new(0.0, 0.15).is_err());
        let curve = LinearFriction::new(1.5, 0.15).unwrap();
        assert!(TireModel::with_curve(0.0, 0.015, curve).is_err());
    }

    #[derive(Clone, Debug)]
    struct Constant(f64);

    impl FrictionCurve for Constant {
        fn mu(&self, _slip_ratio: f64) -> f64 {
            self.0
        }
        fn mu_max(&self) -> f64 {
            self.0
        }
    }

    #[test]
    fn custom_curve_is_used() {
        let tire = TireModel::with_curve(0.25, 0.0, Constant(1.2)).unwrap();
        assert_eq!(tire.longitudinal_force(500.0, 0.9, 3.0).traction, 600.0);
        assert_eq!(tire.grip_torque_limit(500.0), 150.0);
    }
}
