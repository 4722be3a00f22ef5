//! Typed access to tunable configuration fields.
//!
//! Sweeps and the optimizer address parameters by their dotted path
//! (`"mass.cg_x"`). Each path maps to one enum variant with a compiled-in
//! getter and setter, so there is no string-based field lookup at runtime.

use crate::ConfigError;
use crate::schema::VehicleConfig;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

macro_rules! parameters {
    ($($variant:ident => $group:ident . $field:ident),+ $(,)?) => {
        /// One tunable numeric field of [`VehicleConfig`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Parameter {
            $($variant),+
        }

        impl Parameter {
            pub const ALL: &'static [Parameter] = &[$(Parameter::$variant),+];

            /// Dotted `group.field` path.
            pub fn path(self) -> &'static str {
                match self {
                    $(Parameter::$variant => concat!(stringify!($group), ".", stringify!($field))),+
                }
            }

            pub fn get(self, config: &VehicleConfig) -> f64 {
                match self {
                    $(Parameter::$variant => config.$group.$field),+
                }
            }

            fn slot(self, config: &mut VehicleConfig) -> &mut f64 {
                match self {
                    $(Parameter::$variant => &mut config.$group.$field),+
                }
            }
        }
    };
}

parameters! {
    TotalMass => mass.total_mass,
    CgX => mass.cg_x,
    CgZ => mass.cg_z,
    Wheelbase => mass.wheelbase,
    FrontTrack => mass.front_track,
    RearTrack => mass.rear_track,
    IYaw => mass.i_yaw,
    IPitch => mass.i_pitch,
    UnsprungMassFront => mass.unsprung_mass_front,
    UnsprungMassRear => mass.unsprung_mass_rear,
    TireRadius => tires.radius_loaded,
    TireMass => tires.mass,
    MuMax => tires.mu_max,
    MuSlipOptimal => tires.mu_slip_optimal,
    RollingResistance => tires.rolling_resistance_coeff,
    MotorTorqueConstant => powertrain.motor_torque_constant,
    MotorMaxCurrent => powertrain.motor_max_current,
    MotorMaxSpeed => powertrain.motor_max_speed,
    BatteryVoltage => powertrain.battery_voltage_nominal,
    BatteryResistance => powertrain.battery_internal_resistance,
    BatteryMaxCurrent => powertrain.battery_max_current,
    GearRatio => powertrain.gear_ratio,
    MotorEfficiency => powertrain.motor_efficiency,
    DrivetrainEfficiency => powertrain.drivetrain_efficiency,
    DifferentialRatio => powertrain.differential_ratio,
    MaxPower => powertrain.max_power_accumulator_outlet,
    WheelInertia => powertrain.wheel_inertia,
    Cda => aerodynamics.cda,
    ClFront => aerodynamics.cl_front,
    ClRear => aerodynamics.cl_rear,
    AirDensity => aerodynamics.air_density,
    AntiSquatRatio => suspension.anti_squat_ratio,
    RideHeightFront => suspension.ride_height_front,
    RideHeightRear => suspension.ride_height_rear,
    WheelRateFront => suspension.wheel_rate_front,
    WheelRateRear => suspension.wheel_rate_rear,
    LaunchTorqueLimit => control.launch_torque_limit,
    TargetSlipRatio => control.target_slip_ratio,
    TorqueRampRate => control.torque_ramp_rate,
    TrackGrade => environment.track_grade,
    WindSpeed => environment.wind_speed,
    SurfaceMuScaling => environment.surface_mu_scaling,
}

impl Parameter {
    /// Copy of `config` with this parameter set to `value`.
    pub fn with_value(self, config: &VehicleConfig, value: f64) -> VehicleConfig {
        let mut updated = config.clone();
        self.set(&mut updated, value);
        updated
    }

    pub fn set(self, config: &mut VehicleConfig, value: f64) {
        *self.slot(config) = value;
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Parameter {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Parameter::ALL
            .iter()
            .copied()
            .find(|p| p.path() == wanted)
            .ok_or_else(|| ConfigError::UnknownParameter {
                path: wanted.to_string(),
            })
    }
}

/// Serialized as its dotted path.
impl Serialize for Parameter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.path())
    }
}

impl<'de> Deserialize<'de> for Parameter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let path = String::deserialize(deserializer)?;
        path.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_round_trip_through_from_str() {
        for p in Parameter::ALL {
            let parsed: Parameter = p.path().parse().unwrap();
            assert_eq!(parsed, *p);
        }
    }

    #[test]
    fn with_value_leaves_original_untouched() {
        let base = VehicleConfig::formula_student_baseline();
        let changed = Parameter::CgX.with_value(&base, 0.95);
        assert_eq!(changed.mass.cg_x, 0.95);
        assert_eq!(base.mass.cg_x, 0.85);
        assert_eq!(Parameter::CgX.get(&changed), 0.95);
    }

    #[test]
    fn unknown_path_is_an_error() {
        let err = "mass.colour".parse::<Parameter>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownParameter { .. }));
        assert!("cg_x".parse::<Parameter>().is_err());
    }

    #[test]
    fn serializes_as_dotted_path() {
        let json = serde_json::to_string(&Parameter::GearRatio).unwrap();
        assert_eq!(json, "\"powertrain.gear_ratio\"");
        let back: Parameter = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Parameter::GearRatio);
        assert!(serde_json::from_str::<Parameter>("\"mass.colour\"").is_err());
    }

    #[test]
    fn paths_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for p in Parameter::ALL {
            assert!(seen.insert(p.path()), "duplicate path {}", p.path());
        }
    }
}
