//! Single-speed electric powertrain with current, speed and power limits.

use crate::common::{check_efficiency, check_non_negative, check_positive};
use crate::error::VehicleResult;
use accel_config::PowertrainProperties;

/// Realized operating point after all limits.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PowertrainOutput {
    /// Torque delivered at the driven wheels (N·m)
    pub wheel_torque: f64,
    /// Motor shaft torque (N·m)
    pub motor_torque: f64,
    /// Motor current (A)
    pub motor_current: f64,
    /// Power drawn at the accumulator outlet, negative when regenerating (W)
    pub power: f64,
}

/// Motor, accumulator and single reduction.
///
/// ## Limiting chain
///
/// Limits are applied multiplicatively on motor torque, in order:
///
/// 1. wheel request to motor torque through gear ratio and drivetrain efficiency
/// 2. clip to `kt * max_current`
/// 3. cut to zero above the motor speed limit
/// 4. current `T / kt`, electrical power `V * I`, divided by motor efficiency
///    when motoring and multiplied by it when regenerating
/// 5. if `|P|` exceeds the accumulator limit, scale torque and current by
///    `limit / |P|` so the realized power sits exactly on the limit
/// 6. motor torque back to wheel torque
#[derive(Clone, Debug)]
pub struct PowertrainModel {
    pub torque_constant: f64,
    pub max_current: f64,
    /// Motor speed above which no torque is produced (rad/s)
    pub max_speed: f64,
    pub battery_voltage: f64,
    pub gear_ratio: f64,
    pub motor_efficiency: f64,
    pub drivetrain_efficiency: f64,
    /// Accumulator outlet power limit (W)
    pub max_power: f64,
    /// Rotational inertia of one wheel (kg·m²)
    pub wheel_inertia: f64,
}

impl PowertrainModel {
    pub fn from_config(pt: &PowertrainProperties) -> VehicleResult<Self> {
        Ok(Self {
            torque_constant: check_positive(
                pt.motor_torque_constant,
                "motor torque constant must be positive",
            )?,
            max_current: check_positive(pt.motor_max_current, "motor max current must be positive")?,
            max_speed: check_positive(pt.motor_max_speed, "motor max speed must be positive")?,
            battery_voltage: check_positive(
                pt.battery_voltage_nominal,
                "battery voltage must be positive",
            )?,
            gear_ratio: check_positive(pt.gear_ratio, "gear ratio must be positive")?,
            motor_efficiency: check_efficiency(pt.motor_efficiency, "motor efficiency must be in (0,1]")?,
            drivetrain_efficiency: check_efficiency(
                pt.drivetrain_efficiency,
                "drivetrain efficiency must be in (0,1]",
            )?,
            max_power: check_positive(
                pt.max_power_accumulator_outlet,
                "accumulator power limit must be positive",
            )?,
            wheel_inertia: check_non_negative(pt.wheel_inertia, "wheel inertia cannot be negative")?,
        })
    }

    /// Peak motor torque allowed by the current limit (N·m).
    pub fn max_motor_torque(&self) -> f64 {
        self.torque_constant * self.max_current
    }

    /// Run a wheel torque request through the limiting chain.
    pub fn torque(&self, requested_wheel_torque: f64, motor_speed: f64) -> PowertrainOutput {
        let transmission = self.gear_ratio * self.drivetrain_efficiency;
        let peak = self.max_motor_torque();

        let mut motor_torque = (requested_wheel_torque / transmission).clamp(-peak, peak);
        if motor_speed.abs() > self.max_speed {
            motor_torque = 0.0;
        }

        let mut motor_current = motor_torque / self.torque_constant;
        let shaft_power = self.battery_voltage * motor_current;
        let mut power = if shaft_power > 0.0 {
            shaft_power / self.motor_efficiency
        } else {
            shaft_power * self.motor_efficiency
        };

        if power.abs() > self.max_power {
            let factor = self.max_power / power.abs();
            motor_torque *= factor;
            motor_current *= factor;
            power = self.max_power.copysign(power);
        }

        PowertrainOutput {
            wheel_torque: motor_torque * transmission,
            motor_torque,
            motor_current,
            power,
        }
    }

    pub fn motor_speed(&self, wheel_angular_velocity: f64) -> f64 {
        wheel_angular_velocity * self.gear_ratio
    }

    pub fn wheel_speed(&self, motor_speed: f64) -> f64 {
        motor_speed / self.gear_ratio
    }

    /// Ground speed at which the motor reaches its speed limit (m/s).
    pub fn top_speed(&self, tire_radius: f64) -> f64 {
        self.wheel_speed(self.max_speed) * tire_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accel_config::VehicleConfig;
    use accel_core::{Tolerances, nearly_equal};

    fn model() -> PowertrainModel {
        PowertrainModel::from_config(&VehicleConfig::formula_student_baseline().powertrain).unwrap()
    }

    #[test]
    fn small_request_passes_through() {
        let pt = model();
        let out = pt.torque(95.0, 100.0);
        assert!(nearly_equal(out.wheel_torque, 95.0, Tolerances::default()));
        assert!(nearly_equal(out.motor_torque, 10.0, Tolerances::default()));
        assert!(nearly_equal(out.motor_current, 20.0, Tolerances::default()));
        assert!(nearly_equal(out.power, 400.0 * 20.0 / 0.95, Tolerances::default()));
    }

    #[test]
    fn current_limit_caps_motor_torque() {
        let mut props = VehicleConfig::formula_student_baseline().powertrain;
        props.battery_voltage_nominal = 100.0;
        let pt = PowertrainModel::from_config(&props).unwrap();
        let out = pt.torque(10_000.0, 0.0);
        assert_eq!(out.motor_torque, 100.0);
        assert_eq!(out.motor_current, 200.0);
    }

    #[test]
    fn power_limit_lands_exactly_on_limit() {
        let pt = model();
        // 400 V * 200 A / 0.95 is above 80 kW
        let out = pt.torque(10_000.0, 0.0);
        assert_eq!(out.power, 80_000.0);
        assert!(out.motor_current < 200.0);
        assert!(nearly_equal(
            out.motor_current,
            200.0 * 80_000.0 / (400.0 * 200.0 / 0.95),
            Tolerances::default()
        ));
    }

    #[test]
    fn regeneration_is_limited_symmetrically() {
        let mut props = VehicleConfig::formula_student_baseline().powertrain;
        props.max_power_accumulator_outlet = 20_000.0;
        let pt = PowertrainModel::from_config(&props).unwrap();
        let out = pt.torque(-10_000.0, 0.0);
        assert_eq!(out.power, -20_000.0);
        assert!(out.wheel_torque < 0.0);
    }

    #[test]
    fn overspeed_cuts_torque() {
        let pt = model();
        let out = pt.torque(500.0, 1600.0);
        assert_eq!(out, PowertrainOutput::default());
    }

    #[test]
    fn speed_conversions() {
        let pt = model();
        assert_eq!(pt.motor_speed(50.0), 500.0);
        assert_eq!(pt.wheel_speed(500.0), 50.0);
        assert!(nearly_equal(pt.top_speed(0.2286), 150.0 * 0.2286, Tolerances::default()));
    }

    #[test]
    fn rejects_zero_gear_ratio() {
        let mut props = VehicleConfig::formula_student_baseline().powertrain;
        props.gear_ratio = 0.0;
        assert!(PowertrainModel::from_config(&props).is_err());
    }
}
