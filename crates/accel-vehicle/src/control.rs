//! Launch and traction control.
//!
//! The strategy keeps one piece of state, the last committed torque request,
//! which the launch ramp builds on. Evaluating a request is side-effect free;
//! the caller commits the request once per accepted integration step and
//! resets the strategy before each independent run.

use crate::common::{check_non_negative, check_positive};
use crate::error::VehicleResult;
use crate::tire::slip_ratio;
use accel_config::ControlProperties;

/// Length of the launch phase during which torque is ramped (s).
pub const LAUNCH_PHASE_S: f64 = 0.1;

/// Slip above `target * TC_ACTIVATION_MARGIN` engages traction control.
const TC_ACTIVATION_MARGIN: f64 = 1.2;

/// Slip error over which the full reduction is applied.
const TC_SLIP_WINDOW: f64 = 0.5;

/// Traction control never removes more than half of the target torque.
const TC_MIN_FACTOR: f64 = 0.5;

/// Per-evaluation inputs.
#[derive(Clone, Copy, Debug)]
pub struct ControlInputs {
    pub time: f64,
    pub velocity: f64,
    /// Driven (rear) wheel angular velocity (rad/s)
    pub wheel_speed_rear: f64,
    pub normal_force_rear: f64,
    pub dt: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TorqueRequest {
    /// Requested wheel torque (N·m)
    pub torque: f64,
    /// Driven wheel slip the request was based on
    pub slip_ratio: f64,
    /// Traction control reduction applied, 1.0 when inactive
    pub tc_factor: f64,
}

#[derive(Clone, Debug)]
pub struct ControlStrategy {
    pub launch_torque_limit: f64,
    pub target_slip_ratio: f64,
    /// Launch ramp rate (N·m/s)
    pub torque_ramp_rate: f64,
    pub traction_control_enabled: bool,
    tire_radius: f64,
    mu_max: f64,
    last_request: f64,
}

impl ControlStrategy {
    /// Build a strategy for a tire of the given radius and (surface scaled) peak grip.
    pub fn new(props: &ControlProperties, tire_radius: f64, mu_max: f64) -> VehicleResult<Self> {
        check_non_negative(props.launch_torque_limit, "launch torque limit cannot be negative")?;
        check_non_negative(props.target_slip_ratio, "target slip ratio cannot be negative")?;
        check_non_negative(props.torque_ramp_rate, "torque ramp rate cannot be negative")?;
        check_positive(tire_radius, "tire radius must be positive")?;
        check_positive(mu_max, "peak friction coefficient must be positive")?;
        Ok(Self {
            launch_torque_limit: props.launch_torque_limit,
            target_slip_ratio: props.target_slip_ratio,
            torque_ramp_rate: props.torque_ramp_rate,
            traction_control_enabled: props.traction_control_enabled,
            tire_radius,
            mu_max,
            last_request: 0.0,
        })
    }

    pub fn last_request(&self) -> f64 {
        self.last_request
    }

    /// Record the request accepted for this step; the ramp continues from it.
    pub fn commit(&mut self, request: &TorqueRequest) {
        self.last_request = request.torque;
    }

    pub fn reset(&mut self) {
        self.last_request = 0.0;
    }

    /// Torque target before grip limiting.
    fn ramped_target(&self, time: f64, dt: f64) -> f64 {
        if time < LAUNCH_PHASE_S {
            (self.last_request + self.torque_ramp_rate * dt).min(self.launch_torque_limit)
        } else {
            self.launch_torque_limit
        }
    }

    fn traction_factor(&self, slip: f64) -> f64 {
        if !self.traction_control_enabled {
            return 1.0;
        }
        let magnitude = slip.abs();
        if magnitude > self.target_slip_ratio * TC_ACTIVATION_MARGIN {
            let error = magnitude - self.target_slip_ratio;
            (1.0 - error / TC_SLIP_WINDOW).max(TC_MIN_FACTOR)
        } else {
            1.0
        }
    }

    /// Largest wheel torque the driven axle can transmit (N·m).
    pub fn grip_limit(&self, normal_force_rear: f64) -> f64 {
        self.mu_max * normal_force_rear * self.tire_radius
    }

    /// Wheel torque request for the current step.
    pub fn requested_torque(&self, inputs: &ControlInputs) -> TorqueRequest {
        let slip = slip_ratio(inputs.wheel_speed_rear, self.tire_radius, inputs.velocity);
        let tc_factor = self.traction_factor(slip);
        let target = self.ramped_target(inputs.time, inputs.dt) * tc_factor;
        TorqueRequest {
            torque: target.min(self.grip_limit(inputs.normal_force_rear)),
            slip_ratio: slip,
            tc_factor,
        }
    }

    /// Grip-limited launch torque for a given rear load, capped by the launch limit.
    pub fn optimal_launch_torque(&self, normal_force_rear: f64) -> f64 {
        self.grip_limit(normal_force_rear).min(self.launch_torque_limit)
    }
}
