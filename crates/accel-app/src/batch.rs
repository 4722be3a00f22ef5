//! Batch runs and parameter sweeps.
//!
//! Every configuration runs in its own simulation, so points are independent
//! and can be spread across threads. Results keep input order. A configuration
//! that fails validation becomes an `Err` for that point only.

use crate::simulation::{SimulationResult, simulate};
use accel_config::{Parameter, VehicleConfig};
use accel_sim::SimResult;
use rayon::prelude::*;
use tracing::{info, warn};

/// One evaluated point of a sweep.
#[derive(Debug, Clone)]
pub struct SweepPoint {
    /// Parameter values applied on top of the base configuration
    pub values: Vec<(Parameter, f64)>,
    pub outcome: SimResult<SimulationResult>,
}

impl SweepPoint {
    pub fn result(&self) -> Option<&SimulationResult> {
        self.outcome.as_ref().ok()
    }
}

#[derive(Debug, Clone)]
pub struct BatchRunner {
    pub base: VehicleConfig,
    pub parallel: bool,
    pub fastest_time: Option<f64>,
}

impl BatchRunner {
    pub fn new(base: VehicleConfig) -> Self {
        Self {
            base,
            parallel: true,
            fastest_time: None,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_fastest_time(mut self, fastest_time: Option<f64>) -> Self {
        self.fastest_time = fastest_time;
        self
    }

    /// Run a list of configurations.
    pub fn run_batch(&self, configs: &[VehicleConfig]) -> Vec<SimResult<SimulationResult>> {
        let fastest = self.fastest_time;
        let run_one = |config: &VehicleConfig| {
            let outcome = simulate(config, fastest);
            if let Err(e) = &outcome {
                warn!(error = %e, "batch point rejected");
            }
            outcome
        };

        let results: Vec<_> = if self.parallel {
            configs.par_iter().map(run_one).collect()
        } else {
            configs.iter().map(run_one).collect()
        };

        let failed = results.iter().filter(|r| r.is_err()).count();
        info!(runs = results.len(), failed, "batch complete");
        results
    }

    /// Vary one parameter over `values`.
    pub fn parameter_sweep(&self, parameter: Parameter, values: &[f64]) -> Vec<SweepPoint> {
        let assignments: Vec<Vec<(Parameter, f64)>> =
            values.iter().map(|&v| vec![(parameter, v)]).collect();
        self.run_assignments(assignments)
    }

    /// Full factorial over several parameters; the last parameter varies fastest.
    pub fn multi_parameter_sweep(&self, axes: &[(Parameter, Vec<f64>)]) -> Vec<SweepPoint> {
        let mut assignments: Vec<Vec<(Parameter, f64)>> = vec![Vec::new()];
        for (parameter, values) in axes {
            assignments = assignments
                .into_iter()
                .flat_map(|prefix| {
                    values.iter().map(move |&v| {
                        let mut point = prefix.clone();
                        point.push((*parameter, v));
                        point
                    })
                })
                .collect();
        }
        if axes.is_empty() {
            assignments.clear();
        }
        self.run_assignments(assignments)
    }

    fn run_assignments(&self, assignments: Vec<Vec<(Parameter, f64)>>) -> Vec<SweepPoint> {
        let configs: Vec<VehicleConfig> = assignments
            .iter()
            .map(|point| {
                point
                    .iter()
                    .fold(self.base.clone(), |config, &(p, v)| p.with_value(&config, v))
            })
            .collect();
        self.run_batch(&configs)
            .into_iter()
            .zip(assignments)
            .map(|(outcome, values)| SweepPoint { values, outcome })
            .collect()
    }
}

/// `n` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}
