//! Simulation state vector.
//!
//! The same type carries a state and its time derivative. Arithmetic is
//! component-wise over every field; it has no physical meaning on its own and
//! exists so RK4 can combine stage derivatives.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul};

/// Vector arithmetic needed by the integrators.
pub trait StateVector: Clone {
    fn add(&self, other: &Self) -> Self;
    fn scale(&self, k: f64) -> Self;
}

macro_rules! state_fields {
    ($($(#[$doc:meta])* $field:ident),+ $(,)?) => {
        /// Dynamic quantities of the vehicle at one instant.
        #[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
        pub struct SimulationState {
            $($(#[$doc])* pub $field: f64),+
        }

        impl SimulationState {
            /// Field names in declaration order.
            pub const FIELDS: &'static [&'static str] = &[$(stringify!($field)),+];

            /// Field values in the order of [`Self::FIELDS`].
            pub fn values(&self) -> Vec<f64> {
                vec![$(self.$field),+]
            }

            fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
                Self { $($field: f(self.$field, other.$field)),+ }
            }

            fn map(&self, f: impl Fn(f64) -> f64) -> Self {
                Self { $($field: f(self.$field)),+ }
            }
        }
    };
}

state_fields! {
    /// Elapsed time (s)
    time,
    /// Distance from the start line (m)
    position,
    /// Vehicle speed (m/s)
    velocity,
    /// Longitudinal acceleration (m/s²)
    acceleration,
    /// Front wheel angular velocity (rad/s)
    wheel_speed_front,
    /// Rear (driven) wheel angular velocity (rad/s)
    wheel_speed_rear,
    /// Motor angular velocity (rad/s)
    motor_speed,
    /// Motor current (A)
    motor_current,
    /// Motor shaft torque (N·m)
    motor_torque,
    /// Tractive force at the rear contact patch (N)
    drive_force,
    /// Aerodynamic drag, negative when opposing motion (N)
    drag_force,
    /// Rolling resistance of both axles (N)
    rolling_resistance,
    normal_force_front,
    normal_force_rear,
    /// Available front tire force at the current slip (N)
    tire_force_front,
    tire_force_rear,
    /// Power drawn at the accumulator outlet (W)
    power_consumed,
}

impl SimulationState {
    /// First field that is NaN or infinite, if any.
    pub fn first_non_finite(&self) -> Option<(&'static str, f64)> {
        Self::FIELDS
            .iter()
            .copied()
            .zip(self.values())
            .find(|(_, v)| !v.is_finite())
    }
}

impl StateVector for SimulationState {
    fn add(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a + b)
    }

    fn scale(&self, k: f64) -> Self {
        self.map(|a| a * k)
    }
}

impl Add for SimulationState {
    type Output = SimulationState;

    fn add(self, rhs: SimulationState) -> SimulationState {
        StateVector::add(&self, &rhs)
    }
}

impl Mul<f64> for SimulationState {
    type Output = SimulationState;

    fn mul(self, k: f64) -> SimulationState {
        self.scale(k)
    }
}
