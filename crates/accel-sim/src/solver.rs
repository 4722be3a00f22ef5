//! Acceleration run loop.
//!
//! The solver is `Running` until the car covers the target distance or the
//! clock reaches the time cap; both conditions are checked before each step.
//! Every accepted state is appended to the trajectory, first state at t = 0.

use crate::error::{SimError, SimResult};
use crate::integrator::{Integrator, Rk4};
use crate::model::TransientModel;
use crate::state::SimulationState;
use crate::vehicle_model::LongitudinalModel;
use accel_config::{VehicleConfig, validate_config};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Why a run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    TargetReached,
    Timeout,
}

/// Ordered, append-only record of accepted states.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trajectory {
    states: Vec<SimulationState>,
}

impl Trajectory {
    pub fn from_states(states: Vec<SimulationState>) -> Self {
        Self { states }
    }

    pub fn push(&mut self, state: SimulationState) {
        self.states.push(state);
    }

    pub fn states(&self) -> &[SimulationState] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn first(&self) -> Option<&SimulationState> {
        self.states.first()
    }

    pub fn last(&self) -> Option<&SimulationState> {
        self.states.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SimulationState> {
        self.states.iter()
    }

    fn clear(&mut self) {
        self.states.clear();
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a SimulationState;
    type IntoIter = std::slice::Iter<'a, SimulationState>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.iter()
    }
}

/// Fixed-step RK4 solver for one vehicle configuration.
#[derive(Clone, Debug)]
pub struct DynamicsSolver {
    model: LongitudinalModel,
    integrator: Rk4,
    dt: f64,
    max_time: f64,
    target_distance: f64,
    trajectory: Trajectory,
    termination: Option<Termination>,
}

impl DynamicsSolver {
    /// Validate the configuration and build the subsystem models.
    ///
    /// An invalid configuration is refused with the full list of violations.
    pub fn new(config: &VehicleConfig) -> SimResult<Self> {
        let violations = validate_config(config);
        if !violations.is_empty() {
            warn!(count = violations.len(), "refusing invalid vehicle configuration");
            return Err(SimError::InvalidConfig { violations });
        }
        Ok(Self {
            model: LongitudinalModel::from_config(config)?,
            integrator: Rk4,
            dt: config.simulation.dt,
            max_time: config.simulation.max_time,
            target_distance: config.simulation.target_distance,
            trajectory: Trajectory::default(),
            termination: None,
        })
    }

    pub fn model(&self) -> &LongitudinalModel {
        &self.model
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Run from rest until the target distance or the time cap.
    ///
    /// Each call starts a fresh run: the trajectory and control ramp are reset.
    pub fn solve(&mut self) -> SimResult<SimulationState> {
        self.model.reset();
        self.trajectory.clear();
        self.termination = None;

        let mut state = self.model.initial_state();
        self.trajectory.push(state);
        debug!(
            dt = self.dt,
            max_time = self.max_time,
            target_distance = self.target_distance,
            "starting acceleration run"
        );

        let mut steps: u64 = 0;
        while state.position < self.target_distance && state.time < self.max_time {
            self.model.begin_step();
            let mut next = self
                .integrator
                .step(&mut self.model, state.time, &state, self.dt)?;
            self.model.end_step();
            // Time from the step count, so it never accumulates rounding.
            steps += 1;
            next.time = steps as f64 * self.dt;

            if let Some((what, value)) = next.first_non_finite() {
                return Err(SimError::NonFinite {
                    what,
                    value,
                    time: next.time,
                });
            }
            state = next;
            self.trajectory.push(state);
        }

        let termination = if state.position >= self.target_distance {
            Termination::TargetReached
        } else {
            Termination::Timeout
        };
        self.termination = Some(termination);
        debug!(
            ?termination,
            time = state.time,
            position = state.position,
            velocity = state.velocity,
            steps = self.trajectory.len() - 1,
            "acceleration run finished"
        );
        Ok(state)
    }

    /// States of the most recent run.
    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    /// Stop reason of the most recent run, `None` before the first run.
    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trajectory_starts_at_rest() {
        let mut config = VehicleConfig::formula_student_baseline();
        config.simulation.target_distance = 1.0;
        let mut solver = DynamicsSolver::new(&config).unwrap();
        solver.solve().unwrap();
        let first = solver.trajectory().first().unwrap();
        assert_eq!(*first, SimulationState::default());
        assert_eq!(solver.termination(), Some(Termination::TargetReached));
    }

    #[test]
    fn refuses_invalid_configuration() {
        let mut config = VehicleConfig::formula_student_baseline();
        config.mass.total_mass = -5.0;
        match DynamicsSolver::new(&config) {
            Err(SimError::InvalidConfig { violations }) => assert!(!violations.is_empty()),
            other => panic!("expected invalid config, got {other:?}"),
        }
    }

    #[test]
    fn times_out_when_distance_is_unreachable() {
        let mut config = VehicleConfig::formula_student_baseline();
        config.simulation.max_time = 0.05;
        let mut solver = DynamicsSolver::new(&config).unwrap();
        let last = solver.solve().unwrap();
        assert!(last.time >= 0.05);
        assert!(last.position < 75.0);
        assert_eq!(solver.termination(), Some(Termination::Timeout));
        // 50 steps of 1 ms, plus one more if 50 * dt rounds just below the cap
        assert!((51..=52).contains(&solver.trajectory().len()));
    }
}
