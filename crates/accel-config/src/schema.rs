//! Vehicle configuration schema.
//!
//! Every group is plain data. Models in `accel-vehicle` read the group they
//! need; nothing in the engine mutates a configuration after it is loaded.

use accel_core::constants::{ACCELERATION_DISTANCE_M, MAX_ACCUMULATOR_POWER_W};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VehicleConfig {
    pub mass: MassProperties,
    pub tires: TireProperties,
    pub powertrain: PowertrainProperties,
    pub aerodynamics: AerodynamicsProperties,
    #[serde(default)]
    pub suspension: SuspensionProperties,
    #[serde(default)]
    pub control: ControlProperties,
    #[serde(default)]
    pub environment: EnvironmentProperties,
    #[serde(default)]
    pub simulation: SimulationSettings,
}

/// Mass, CG location and chassis geometry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MassProperties {
    /// Vehicle mass including driver (kg)
    pub total_mass: f64,
    /// CG distance behind the front axle (m)
    pub cg_x: f64,
    /// CG height above ground (m)
    pub cg_z: f64,
    pub wheelbase: f64,
    pub front_track: f64,
    pub rear_track: f64,
    /// Yaw inertia (kg·m²)
    pub i_yaw: f64,
    /// Pitch inertia (kg·m²)
    pub i_pitch: f64,
    #[serde(default)]
    pub unsprung_mass_front: f64,
    #[serde(default)]
    pub unsprung_mass_rear: f64,
}

impl MassProperties {
    pub fn sprung_mass(&self) -> f64 {
        self.total_mass - self.unsprung_mass_front - self.unsprung_mass_rear
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TireProperties {
    /// Loaded rolling radius (m)
    pub radius_loaded: f64,
    pub mass: f64,
    /// Peak friction coefficient
    pub mu_max: f64,
    /// Slip ratio at which `mu_max` is reached
    pub mu_slip_optimal: f64,
    #[serde(default = "default_rolling_resistance")]
    pub rolling_resistance_coeff: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PowertrainProperties {
    /// Motor torque constant (N·m/A)
    pub motor_torque_constant: f64,
    pub motor_max_current: f64,
    /// Motor speed cutoff (rad/s)
    pub motor_max_speed: f64,
    pub battery_voltage_nominal: f64,
    /// Internal resistance (Ω)
    pub battery_internal_resistance: f64,
    pub battery_max_current: f64,
    /// Overall motor-to-wheel reduction
    pub gear_ratio: f64,
    #[serde(default = "default_efficiency")]
    pub motor_efficiency: f64,
    #[serde(default = "default_efficiency")]
    pub drivetrain_efficiency: f64,
    #[serde(default = "default_unity")]
    pub differential_ratio: f64,
    /// Accumulator outlet power limit (W)
    #[serde(default = "default_max_power")]
    pub max_power_accumulator_outlet: f64,
    /// Per-wheel rotational inertia (kg·m²)
    #[serde(default = "default_wheel_inertia")]
    pub wheel_inertia: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AerodynamicsProperties {
    /// Drag area Cd·A (m²)
    pub cda: f64,
    #[serde(default)]
    pub cl_front: f64,
    #[serde(default)]
    pub cl_rear: f64,
    #[serde(default = "default_air_density")]
    pub air_density: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuspensionProperties {
    #[serde(default)]
    pub anti_squat_ratio: f64,
    #[serde(default = "default_ride_height")]
    pub ride_height_front: f64,
    #[serde(default = "default_ride_height")]
    pub ride_height_rear: f64,
    /// Wheel rate (N/m)
    #[serde(default = "default_wheel_rate")]
    pub wheel_rate_front: f64,
    #[serde(default = "default_wheel_rate")]
    pub wheel_rate_rear: f64,
}

impl Default for SuspensionProperties {
    fn default() -> Self {
        Self {
            anti_squat_ratio: 0.0,
            ride_height_front: default_ride_height(),
            ride_height_rear: default_ride_height(),
            wheel_rate_front: default_wheel_rate(),
            wheel_rate_rear: default_wheel_rate(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ControlProperties {
    /// Wheel torque ceiling during launch (N·m)
    #[serde(default = "default_launch_torque")]
    pub launch_torque_limit: f64,
    #[serde(default = "default_target_slip")]
    pub target_slip_ratio: f64,
    /// Launch ramp rate (N·m/s)
    #[serde(default = "default_ramp_rate")]
    pub torque_ramp_rate: f64,
    #[serde(default = "default_true")]
    pub traction_control_enabled: bool,
}

impl Default for ControlProperties {
    fn default() -> Self {
        Self {
            launch_torque_limit: default_launch_torque(),
            target_slip_ratio: default_target_slip(),
            torque_ramp_rate: default_ramp_rate(),
            traction_control_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvironmentProperties {
    /// Track slope (rad), positive uphill
    #[serde(default)]
    pub track_grade: f64,
    /// Wind speed (m/s), positive is a headwind
    #[serde(default)]
    pub wind_speed: f64,
    /// Grip multiplier applied to `mu_max`
    #[serde(default = "default_unity")]
    pub surface_mu_scaling: f64,
}

impl Default for EnvironmentProperties {
    fn default() -> Self {
        Self {
            track_grade: 0.0,
            wind_speed: 0.0,
            surface_mu_scaling: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationSettings {
    /// Fixed integration step (s)
    #[serde(default = "default_dt")]
    pub dt: f64,
    #[serde(default = "default_max_time")]
    pub max_time: f64,
    #[serde(default = "default_target_distance")]
    pub target_distance: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            dt: default_dt(),
            max_time: default_max_time(),
            target_distance: default_target_distance(),
        }
    }
}

impl VehicleConfig {
    /// Reference rear-wheel-drive electric car used by tests and as a CLI template.
    pub fn formula_student_baseline() -> Self {
        Self {
            mass: MassProperties {
                total_mass: 280.0,
                cg_x: 0.85,
                cg_z: 0.30,
                wheelbase: 1.55,
                front_track: 1.20,
                rear_track: 1.18,
                i_yaw: 100.0,
                i_pitch: 120.0,
                unsprung_mass_front: 15.0,
                unsprung_mass_rear: 17.0,
            },
            tires: TireProperties {
                radius_loaded: 0.2286,
                mass: 3.0,
                mu_max: 1.5,
                mu_slip_optimal: 0.15,
                rolling_resistance_coeff: default_rolling_resistance(),
            },
            powertrain: PowertrainProperties {
                motor_torque_constant: 0.5,
                motor_max_current: 200.0,
                motor_max_speed: 1500.0,
                battery_voltage_nominal: 400.0,
                battery_internal_resistance: 0.01,
                battery_max_current: 300.0,
                gear_ratio: 10.0,
                motor_efficiency: default_efficiency(),
                drivetrain_efficiency: default_efficiency(),
                differential_ratio: 1.0,
                max_power_accumulator_outlet: MAX_ACCUMULATOR_POWER_W,
                wheel_inertia: default_wheel_inertia(),
            },
            aerodynamics: AerodynamicsProperties {
                cda: 1.1,
                cl_front: 0.8,
                cl_rear: 1.0,
                air_density: default_air_density(),
            },
            suspension: SuspensionProperties::default(),
            control: ControlProperties::default(),
            environment: EnvironmentProperties::default(),
            simulation: SimulationSettings::default(),
        }
    }
}

fn default_rolling_resistance() -> f64 {
    0.015
}

fn default_efficiency() -> f64 {
    0.95
}

fn default_unity() -> f64 {
    1.0
}

fn default_max_power() -> f64 {
    MAX_ACCUMULATOR_POWER_W
}

fn default_wheel_inertia() -> f64 {
    0.1
}

fn default_air_density() -> f64 {
    1.225
}

fn default_ride_height() -> f64 {
    0.1
}

fn default_wheel_rate() -> f64 {
    30_000.0
}

fn default_launch_torque() -> f64 {
    1000.0
}

fn default_target_slip() -> f64 {
    0.15
}

fn default_ramp_rate() -> f64 {
    500.0
}

fn default_true() -> bool {
    true
}

fn default_dt() -> f64 {
    0.001
}

fn default_max_time() -> f64 {
    30.0
}

fn default_target_distance() -> f64 {
    ACCELERATION_DISTANCE_M
}
