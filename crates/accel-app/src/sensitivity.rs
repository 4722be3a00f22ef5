//! One-at-a-time sensitivity analysis.
//!
//! The coefficient is the mean elasticity `(ΔY/Y) / (Δp/p)` of an output
//! metric against the middle value of the sweep.

use crate::batch::BatchRunner;
use crate::error::{AppError, AppResult};
use crate::simulation::SimulationResult;
use accel_config::{Parameter, VehicleConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputMetric {
    FinalTime,
    Score,
    FinalVelocity,
}

impl OutputMetric {
    /// Metric value for one result; a missing score counts as zero.
    pub fn of(self, result: &SimulationResult) -> f64 {
        match self {
            OutputMetric::FinalTime => result.final_time,
            OutputMetric::Score => result.score.unwrap_or(0.0),
            OutputMetric::FinalVelocity => result.final_velocity,
        }
    }
}

impl fmt::Display for OutputMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputMetric::FinalTime => "final_time",
            OutputMetric::Score => "score",
            OutputMetric::FinalVelocity => "final_velocity",
        })
    }
}

impl FromStr for OutputMetric {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "final_time" | "time" => Ok(OutputMetric::FinalTime),
            "score" => Ok(OutputMetric::Score),
            "final_velocity" | "velocity" => Ok(OutputMetric::FinalVelocity),
            other => Err(AppError::InvalidInput(format!("unknown output metric: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sensitivity {
    pub parameter: String,
    pub metric: OutputMetric,
    pub base_value: f64,
    /// (parameter value, metric value) for every point that ran
    pub points: Vec<(f64, f64)>,
    pub coefficient: f64,
}

impl Sensitivity {
    pub fn metric_range(&self) -> Option<(f64, f64)> {
        let mut values = self.points.iter().map(|&(_, y)| y);
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
    }
}

/// Sweep `parameter` over `values` and compute its sensitivity coefficient.
///
/// The middle entry of `values` is the reference point; it must produce a
/// valid run.
pub fn sensitivity(
    runner: &BatchRunner,
    parameter: Parameter,
    values: &[f64],
    metric: OutputMetric,
) -> AppResult<Sensitivity> {
    if values.len() < 2 {
        return Err(AppError::InvalidInput(
            "sensitivity needs at least two values".into(),
        ));
    }
    let points = runner.parameter_sweep(parameter, values);
    let base_idx = values.len() / 2;
    let base_value = values[base_idx];
    let base_result = points[base_idx]
        .outcome
        .as_ref()
        .map_err(|e| AppError::Simulation(e.clone()))?;
    let base_metric = metric.of(base_result);

    let evaluated: Vec<(f64, f64)> = points
        .iter()
        .zip(values)
        .filter_map(|(point, &v)| point.result().map(|r| (v, metric.of(r))))
        .collect();

    let mut elasticities = Vec::new();
    if base_metric > 0.0 && base_value > 0.0 {
        for (i, (point, &v)) in points.iter().zip(values).enumerate() {
            let Some(result) = point.result() else {
                continue;
            };
            let y = metric.of(result);
            if i == base_idx || v <= 0.0 || y <= 0.0 {
                continue;
            }
            let dp = (v - base_value) / base_value;
            if dp != 0.0 {
                elasticities.push(((y - base_metric) / base_metric) / dp);
            }
        }
    }
    let coefficient = if elasticities.is_empty() {
        0.0
    } else {
        elasticities.iter().sum::<f64>() / elasticities.len() as f64
    };

    Ok(Sensitivity {
        parameter: parameter.path().to_string(),
        metric,
        base_value,
        points: evaluated,
        coefficient,
    })
}

/// Sensitivities of several parameters, each swept over `±span` of its base value.
pub fn relative_sensitivities(
    base: &VehicleConfig,
    parameters: &[Parameter],
    span: f64,
    points: usize,
    metric: OutputMetric,
) -> AppResult<Vec<Sensitivity>> {
    let runner = BatchRunner::new(base.clone());
    parameters
        .iter()
        .map(|&p| {
            let centre = p.get(base);
            let values = crate::batch::linspace(centre * (1.0 - span), centre * (1.0 + span), points);
            sensitivity(&runner, p, &values, metric)
        })
        .collect()
}

/// Order by absolute coefficient, largest first.
pub fn rank_sensitivities(mut results: Vec<Sensitivity>) -> Vec<Sensitivity> {
    results.sort_by(|a, b| b.coefficient.abs().total_cmp(&a.coefficient.abs()));
    results
}
