//! Configuration validation.
//!
//! Validation collects every violation rather than stopping at the first one,
//! so a loader can report the whole list at once.

use crate::parameter::Parameter;
use crate::schema::VehicleConfig;
use accel_core::constants::MAX_ACCUMULATOR_POWER_W;

impl VehicleConfig {
    /// Human-readable violations; empty when the configuration is usable.
    pub fn validate(&self) -> Vec<String> {
        validate_config(self)
    }
}

pub fn validate_config(config: &VehicleConfig) -> Vec<String> {
    let mut errors = Vec::new();

    for parameter in Parameter::ALL {
        let value = parameter.get(config);
        if !value.is_finite() {
            errors.push(format!("{} must be finite (got {})", parameter, value));
        }
    }

    let mass = &config.mass;
    let tires = &config.tires;
    let pt = &config.powertrain;
    let aero = &config.aerodynamics;
    let sim = &config.simulation;

    if pt.max_power_accumulator_outlet > MAX_ACCUMULATOR_POWER_W {
        errors.push("Power limit exceeds 80 kW".to_string());
    }
    if pt.max_power_accumulator_outlet <= 0.0 {
        errors.push("Power limit must be positive".to_string());
    }

    if mass.total_mass <= 0.0 {
        errors.push("Total mass must be positive".to_string());
    }
    if mass.wheelbase <= 0.0 {
        errors.push("Wheelbase must be positive".to_string());
    }
    if mass.cg_x < 0.0 || mass.cg_x > mass.wheelbase {
        errors.push("CG X position must be within wheelbase".to_string());
    }
    if mass.cg_z < 0.0 {
        errors.push("CG height cannot be negative".to_string());
    }
    if mass.sprung_mass() < 0.0 {
        errors.push("Unsprung mass exceeds total mass".to_string());
    }

    if tires.radius_loaded <= 0.0 {
        errors.push("Tire radius must be positive".to_string());
    }
    if tires.mu_max <= 0.0 {
        errors.push("Peak friction coefficient must be positive".to_string());
    }
    if tires.mu_slip_optimal <= 0.0 || tires.mu_slip_optimal >= 1.0 {
        errors.push("Optimal slip ratio must be between 0 and 1".to_string());
    }
    if tires.rolling_resistance_coeff < 0.0 {
        errors.push("Rolling resistance coefficient cannot be negative".to_string());
    }

    if pt.gear_ratio <= 0.0 {
        errors.push("Gear ratio must be positive".to_string());
    }
    if pt.motor_torque_constant <= 0.0 {
        errors.push("Motor torque constant must be positive".to_string());
    }
    if pt.motor_max_current <= 0.0 {
        errors.push("Motor max current must be positive".to_string());
    }
    if pt.motor_max_speed <= 0.0 {
        errors.push("Motor max speed must be positive".to_string());
    }
    if pt.battery_voltage_nominal <= 0.0 {
        errors.push("Battery voltage must be positive".to_string());
    }
    for (name, eta) in [
        ("Motor efficiency", pt.motor_efficiency),
        ("Drivetrain efficiency", pt.drivetrain_efficiency),
    ] {
        if eta <= 0.0 || eta > 1.0 {
            errors.push(format!("{} must be in (0, 1]", name));
        }
    }
    if pt.wheel_inertia < 0.0 {
        errors.push("Wheel inertia cannot be negative".to_string());
    }

    if aero.cda < 0.0 {
        errors.push("Drag area cannot be negative".to_string());
    }
    if aero.air_density <= 0.0 {
        errors.push("Air density must be positive".to_string());
    }

    let susp = &config.suspension;
    for (name, height) in [
        ("Front ride height", susp.ride_height_front),
        ("Rear ride height", susp.ride_height_rear),
    ] {
        if height < 0.0 {
            errors.push(format!("{} cannot be negative", name));
        }
    }
    for (name, rate) in [
        ("Front wheel rate", susp.wheel_rate_front),
        ("Rear wheel rate", susp.wheel_rate_rear),
    ] {
        if rate < 0.0 {
            errors.push(format!("{} cannot be negative", name));
        }
    }

    let control = &config.control;
    if control.launch_torque_limit < 0.0 {
        errors.push("Launch torque limit cannot be negative".to_string());
    }
    if control.target_slip_ratio < 0.0 {
        errors.push("Target slip ratio cannot be negative".to_string());
    }
    if control.torque_ramp_rate < 0.0 {
        errors.push("Torque ramp rate cannot be negative".to_string());
    }

    if config.environment.surface_mu_scaling <= 0.0 {
        errors.push("Surface grip scaling must be positive".to_string());
    }

    if !(sim.dt.is_finite() && sim.dt > 0.0) {
        errors.push("Time step must be positive".to_string());
    }
    if !(sim.max_time.is_finite() && sim.max_time > 0.0) {
        errors.push("Max time must be positive".to_string());
    }
    if !(sim.target_distance.is_finite() && sim.target_distance > 0.0) {
        errors.push("Target distance must be positive".to_string());
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_is_valid() {
        let config = VehicleConfig::formula_student_baseline();
        assert!(validate_config(&config).is_empty());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn power_above_cap_is_reported() {
        let mut config = VehicleConfig::formula_student_baseline();
        config.powertrain.max_power_accumulator_outlet = 85_000.0;
        let errors = validate_config(&config);
        assert_eq!(errors, vec!["Power limit exceeds 80 kW".to_string()]);
    }

    #[test]
    fn all_violations_are_collected() {
        let mut config = VehicleConfig::formula_student_baseline();
        config.mass.total_mass = 0.0;
        config.tires.radius_loaded = -0.1;
        config.powertrain.gear_ratio = 0.0;
        let errors = validate_config(&config);
        assert!(errors.iter().any(|e| e.contains("Total mass")));
        assert!(errors.iter().any(|e| e.contains("Tire radius")));
        assert!(errors.iter().any(|e| e.contains("Gear ratio")));
    }

    #[test]
    fn cg_outside_wheelbase_is_rejected() {
        let mut config = VehicleConfig::formula_student_baseline();
        config.mass.cg_x = config.mass.wheelbase + 0.1;
        let errors = validate_config(&config);
        assert!(errors.iter().any(|e| e.contains("CG X")));
    }

    #[test]
    fn non_finite_fields_are_rejected() {
        let mut config = VehicleConfig::formula_student_baseline();
        config.aerodynamics.cl_rear = f64::NAN;
        let errors = validate_config(&config);
        assert!(errors.iter().any(|e| e.contains("aerodynamics.cl_rear")));
    }

    #[test]
    fn zero_time_step_is_rejected() {
        let mut config = VehicleConfig::formula_student_baseline();
        config.simulation.dt = 0.0;
        let errors = validate_config(&config);
        assert!(errors.iter().any(|e| e.contains("Time step")));
    }

    #[test]
    fn control_and_suspension_violations_are_listed_together() {
        let mut config = VehicleConfig::formula_student_baseline();
        config.control.launch_torque_limit = -100.0;
        config.control.torque_ramp_rate = -1.0;
        config.suspension.ride_height_rear = -0.1;
        config.suspension.wheel_rate_front = -5.0;
        let errors = validate_config(&config);
        assert_eq!(
            errors,
            vec![
                "Rear ride height cannot be negative".to_string(),
                "Front wheel rate cannot be negative".to_string(),
                "Launch torque limit cannot be negative".to_string(),
                "Torque ramp rate cannot be negative".to_string(),
            ]
        );
    }
}
