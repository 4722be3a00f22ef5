//! One acceleration run and its result.

use accel_config::VehicleConfig;
use accel_rules::{check_power_limit, check_time_limit, score};
use accel_sim::{DynamicsSolver, SimResult, SimulationState, Termination, Trajectory};
use serde::{Deserialize, Serialize};

/// Outcome of one run, including regulatory checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub final_state: SimulationState,
    /// Power and time limits both met
    pub compliant: bool,
    pub power_compliant: bool,
    pub time_compliant: bool,
    /// Peak `|power|` at the accumulator outlet (W)
    pub max_power_used: f64,
    pub power_violation_time: Option<f64>,
    pub final_time: f64,
    pub final_distance: f64,
    pub final_velocity: f64,
    /// Event score, present when a fastest time was supplied
    pub score: Option<f64>,
    pub fastest_time: Option<f64>,
    pub termination: Termination,
}

/// A configured vehicle ready to run.
///
/// Owns its solver, and with it the control ramp state, so independent
/// simulations never share mutable state.
#[derive(Debug, Clone)]
pub struct AccelerationSimulation {
    config: VehicleConfig,
    solver: DynamicsSolver,
}

impl AccelerationSimulation {
    /// Validate `config` and build the solver.
    pub fn new(config: VehicleConfig) -> SimResult<Self> {
        let solver = DynamicsSolver::new(&config)?;
        Ok(Self { config, solver })
    }

    pub fn config(&self) -> &VehicleConfig {
        &self.config
    }

    /// Run the event and evaluate it against the rules.
    pub fn run(&mut self, fastest_time: Option<f64>) -> SimResult<SimulationResult> {
        let final_state = self.solver.solve()?;
        let trajectory = self.solver.trajectory();

        let power = check_power_limit(
            trajectory.states(),
            self.config.powertrain.max_power_accumulator_outlet,
        );
        let time = check_time_limit(&final_state);

        let termination = self.solver.termination().unwrap_or(Termination::Timeout);

        Ok(SimulationResult {
            final_state,
            compliant: power.compliant && time.compliant,
            power_compliant: power.compliant,
            time_compliant: time.compliant,
            max_power_used: power.max_power_used,
            power_violation_time: power.violation_time,
            final_time: final_state.time,
            final_distance: final_state.position,
            final_velocity: final_state.velocity,
            score: fastest_time.map(|fastest| score(final_state.time, fastest)),
            fastest_time,
            termination,
        })
    }

    /// States of the most recent run.
    pub fn trajectory(&self) -> &Trajectory {
        self.solver.trajectory()
    }

    pub fn dt(&self) -> f64 {
        self.solver.dt()
    }
}

/// Build, run and discard a simulation.
pub fn simulate(config: &VehicleConfig, fastest_time: Option<f64>) -> SimResult<SimulationResult> {
    AccelerationSimulation::new(config.clone())?.run(fastest_time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_is_compliant() {
        let result = simulate(&VehicleConfig::formula_student_baseline(), None).unwrap();
        assert!(result.compliant);
        assert!(result.power_compliant);
        assert!(result.time_compliant);
        assert_eq!(result.power_violation_time, None);
        assert_eq!(result.termination, Termination::TargetReached);
        assert!(result.final_distance >= 75.0);
        assert_eq!(result.score, None);
    }

    #[test]
    fn fastest_time_enables_scoring() {
        let config = VehicleConfig::formula_student_baseline();
        let mut sim = AccelerationSimulation::new(config).unwrap();
        let own = sim.run(None).unwrap();
        let scored = sim.run(Some(own.final_time)).unwrap();
        let points = scored.score.unwrap();
        assert!((points - 75.0).abs() < 1e-9);
        assert_eq!(scored.fastest_time, Some(own.final_time));
    }

    #[test]
    fn timeout_fails_time_limit() {
        let mut config = VehicleConfig::formula_student_baseline();
        // motor speed limit caps the car near 34 m/s, so 2 km takes far longer than 25 s
        config.simulation.target_distance = 2000.0;
        config.simulation.max_time = 26.0;
        let result = simulate(&config, None).unwrap();
        assert_eq!(result.termination, Termination::Timeout);
        assert!(!result.time_compliant);
        assert!(!result.compliant);
        assert!(result.power_compliant);
    }
}
