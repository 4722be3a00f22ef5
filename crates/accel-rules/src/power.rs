//! Accumulator outlet power limit.

use accel_sim::SimulationState;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PowerCheck {
    pub compliant: bool,
    /// Largest `|power|` seen over the run (W)
    pub max_power_used: f64,
    /// Time of the first state above the limit
    pub violation_time: Option<f64>,
}

/// Scan a trajectory once against the power limit.
pub fn check_power_limit(states: &[SimulationState], max_power: f64) -> PowerCheck {
    let mut max_power_used = 0.0f64;
    let mut violation_time = None;

    for state in states {
        let power = state.power_consumed.abs();
        if power > max_power_used {
            max_power_used = power;
            if power > max_power && violation_time.is_none() {
                violation_time = Some(state.time);
            }
        }
    }

    PowerCheck {
        compliant: max_power_used <= max_power,
        max_power_used,
        violation_time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(time: f64, power: f64) -> SimulationState {
        SimulationState {
            time,
            power_consumed: power,
            ..SimulationState::default()
        }
    }

    #[test]
    fn compliant_trace() {
        let states = [state(0.0, 0.0), state(0.1, 60_000.0), state(0.2, 80_000.0)];
        let check = check_power_limit(&states, 80_000.0);
        assert!(check.compliant);
        assert_eq!(check.max_power_used, 80_000.0);
        assert_eq!(check.violation_time, None);
    }

    #[test]
    fn empty_trace_is_compliant() {
        let check = check_power_limit(&[], 80_000.0);
        assert!(check.compliant);
        assert_eq!(check.max_power_used, 0.0);
    }

    #[test]
    fn regeneration_counts_by_magnitude() {
        let states = [state(0.0, 0.0), state(0.5, -90_000.0)];
        let check = check_power_limit(&states, 80_000.0);
        assert!(!check.compliant);
        assert_eq!(check.violation_time, Some(0.5));
    }
}
