//! Summary statistics over a trajectory.

use accel_core::constants::ACCELERATION_DISTANCE_M;
use accel_core::numeric::crossing_time;
use accel_core::units::{display, joule, mps, mps2, watt};
use accel_sim::Trajectory;
use serde::{Deserialize, Serialize};

/// 100 km/h in m/s.
const HUNDRED_KMH_MPS: f64 = 100.0 / 3.6;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryStats {
    pub max_velocity: f64,
    pub max_acceleration: f64,
    /// Peak `|power|` (W)
    pub max_power: f64,
    /// Time-weighted mean power (W)
    pub average_power: f64,
    pub time_to_100_kmh: Option<f64>,
    /// Interpolated time at which 75 m is reached
    pub time_to_75_m: Option<f64>,
    /// Trapezoidal integral of power over time (J)
    pub energy_consumed: f64,
    pub steps: usize,
}

impl TrajectoryStats {
    pub fn from_trajectory(trajectory: &Trajectory) -> Self {
        let states = trajectory.states();
        let Some(last) = states.last() else {
            return Self::default();
        };

        let max_of = |f: fn(&accel_sim::SimulationState) -> f64| {
            states.iter().map(f).fold(f64::NEG_INFINITY, f64::max)
        };

        let energy_consumed: f64 = states
            .windows(2)
            .map(|w| 0.5 * (w[0].power_consumed + w[1].power_consumed) * (w[1].time - w[0].time))
            .sum();
        let duration = last.time - states[0].time;
        let average_power = if duration > 0.0 {
            energy_consumed / duration
        } else {
            0.0
        };

        let speed: Vec<(f64, f64)> = states.iter().map(|s| (s.time, s.velocity)).collect();
        let distance: Vec<(f64, f64)> = states.iter().map(|s| (s.time, s.position)).collect();

        Self {
            max_velocity: max_of(|s| s.velocity),
            max_acceleration: max_of(|s| s.acceleration),
            max_power: max_of(|s| s.power_consumed.abs()),
            average_power,
            time_to_100_kmh: crossing_time(&speed, HUNDRED_KMH_MPS),
            time_to_75_m: crossing_time(&distance, ACCELERATION_DISTANCE_M),
            energy_consumed,
            steps: states.len().saturating_sub(1),
        }
    }

    /// Human-readable lines for terminal output.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!(
                "  Top speed:        {:.1} km/h",
                display::kmh(mps(self.max_velocity))
            ),
            format!(
                "  Peak accel:       {:.2} g",
                display::g_units(mps2(self.max_acceleration))
            ),
            format!("  Peak power:       {:.1} kW", display::kw(watt(self.max_power))),
            format!("  Mean power:       {:.1} kW", display::kw(watt(self.average_power))),
            format!(
                "  Energy:           {:.4} kWh",
                display::kwh(joule(self.energy_consumed))
            ),
        ];
        if let Some(t) = self.time_to_100_kmh {
            lines.push(format!("  0-100 km/h:       {:.3} s", t));
        }
        if let Some(t) = self.time_to_75_m {
            lines.push(format!("  75 m:             {:.3} s", t));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accel_sim::SimulationState;

    fn trajectory() -> Trajectory {
        Trajectory::from_states(
            (0..=10)
                .map(|i| {
                    let t = i as f64;
                    SimulationState {
                        time: t,
                        position: 10.0 * t,
                        velocity: 4.0 * t,
                        acceleration: 4.0,
                        power_consumed: 1000.0,
                        ..SimulationState::default()
                    }
                })
                .collect(),
        )
    }

    #[test]
    fn constant_power_integrates_exactly() {
        let stats = TrajectoryStats::from_trajectory(&trajectory());
        assert_eq!(stats.energy_consumed, 10_000.0);
        assert_eq!(stats.average_power, 1000.0);
        assert_eq!(stats.max_power, 1000.0);
        assert_eq!(stats.steps, 10);
    }

    #[test]
    fn crossings_are_interpolated() {
        let stats = TrajectoryStats::from_trajectory(&trajectory());
        let t75 = stats.time_to_75_m.unwrap();
        assert!((t75 - 7.5).abs() < 1e-12);
        let t100 = stats.time_to_100_kmh.unwrap();
        assert!((t100 - HUNDRED_KMH_MPS / 4.0).abs() < 1e-9);
        assert_eq!(stats.max_velocity, 40.0);
    }

    #[test]
    fn empty_trajectory_gives_defaults() {
        let stats = TrajectoryStats::from_trajectory(&Trajectory::default());
        assert_eq!(stats, TrajectoryStats::default());
        assert!(!stats.summary_lines().is_empty());
    }
}
