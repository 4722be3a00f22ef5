//! Event time limit.

use accel_core::constants::MAX_RUN_TIME_S;
use accel_sim::SimulationState;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeCheck {
    pub compliant: bool,
    pub final_time: f64,
}

/// Check the final state against the regulatory 25 s limit.
pub fn check_time_limit(final_state: &SimulationState) -> TimeCheck {
    check_time_limit_with(final_state, MAX_RUN_TIME_S)
}

pub fn check_time_limit_with(final_state: &SimulationState, max_time: f64) -> TimeCheck {
    TimeCheck {
        compliant: final_state.time <= max_time,
        final_time: final_state.time,
    }
}
