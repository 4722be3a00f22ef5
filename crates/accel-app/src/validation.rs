//! Comparison of a simulated run against measured test data.
//!
//! Measured data comes from a CSV log with a time column, a position column
//! and optional velocity, acceleration and power columns. Each metric is
//! compared on a common time grid inside the overlap of both series.

use crate::batch::linspace;
use crate::error::{AppError, AppResult};
use crate::simulation::SimulationResult;
use accel_core::numeric::interp;
use accel_sim::SimulationState;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use std::io;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationMetric {
    Position,
    Velocity,
    Acceleration,
    Power,
}

impl ValidationMetric {
    pub const ALL: [ValidationMetric; 4] = [
        ValidationMetric::Position,
        ValidationMetric::Velocity,
        ValidationMetric::Acceleration,
        ValidationMetric::Power,
    ];

    pub fn of(self, state: &SimulationState) -> f64 {
        match self {
            ValidationMetric::Position => state.position,
            ValidationMetric::Velocity => state.velocity,
            ValidationMetric::Acceleration => state.acceleration,
            ValidationMetric::Power => state.power_consumed,
        }
    }
}

impl fmt::Display for ValidationMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValidationMetric::Position => "position",
            ValidationMetric::Velocity => "velocity",
            ValidationMetric::Acceleration => "acceleration",
            ValidationMetric::Power => "power",
        })
    }
}

impl FromStr for ValidationMetric {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValidationMetric::ALL
            .into_iter()
            .find(|m| m.to_string() == s)
            .ok_or_else(|| AppError::InvalidInput(format!("unknown validation metric: {s}")))
    }
}

/// Column names to read from a measurement log.
#[derive(Debug, Clone)]
pub struct ValidationColumns {
    pub time: String,
    pub position: String,
    /// Optional columns are read only when named and present
    pub velocity: Option<String>,
    pub acceleration: Option<String>,
    pub power: Option<String>,
}

impl Default for ValidationColumns {
    fn default() -> Self {
        Self {
            time: "time".into(),
            position: "position".into(),
            velocity: Some("velocity".into()),
            acceleration: Some("acceleration".into()),
            power: Some("power".into()),
        }
    }
}

/// Measured time series from a test run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationData {
    pub time: Vec<f64>,
    pub position: Vec<f64>,
    pub velocity: Option<Vec<f64>>,
    pub acceleration: Option<Vec<f64>>,
    pub power: Option<Vec<f64>>,
}

impl ValidationData {
    pub fn from_csv(path: &Path, columns: &ValidationColumns) -> AppResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file, columns)
    }

    /// Parse a CSV log with a header row.
    ///
    /// Time must be non-decreasing; every value in a selected column must parse
    /// as a number.
    pub fn from_csv_reader<R: io::Read>(reader: R, columns: &ValidationColumns) -> AppResult<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers = rdr.headers()?.clone();
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        let time_idx = find(columns.time.as_str()).ok_or_else(|| missing_column(&columns.time))?;
        let position_idx = find(columns.position.as_str())
            .ok_or_else(|| missing_column(&columns.position))?;
        let optional = |name: &Option<String>| name.as_deref().and_then(find);
        let velocity_idx = optional(&columns.velocity);
        let acceleration_idx = optional(&columns.acceleration);
        let power_idx = optional(&columns.power);

        let mut data = ValidationData {
            velocity: velocity_idx.map(|_| Vec::new()),
            acceleration: acceleration_idx.map(|_| Vec::new()),
            power: power_idx.map(|_| Vec::new()),
            ..ValidationData::default()
        };

        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            let field = |idx: usize| -> AppResult<f64> {
                let raw = record.get(idx).unwrap_or_default().trim();
                raw.parse::<f64>().map_err(|_| {
                    AppError::InvalidInput(format!(
                        "row {}: '{}' in column {} is not a number",
                        row + 1,
                        raw,
                        headers.get(idx).unwrap_or_default()
                    ))
                })
            };
            data.time.push(field(time_idx)?);
            data.position.push(field(position_idx)?);
            for (idx, series) in [
                (velocity_idx, &mut data.velocity),
                (acceleration_idx, &mut data.acceleration),
                (power_idx, &mut data.power),
            ] {
                if let (Some(idx), Some(series)) = (idx, series.as_mut()) {
                    series.push(field(idx)?);
                }
            }
        }

        if data.time.windows(2).any(|w| w[1] < w[0]) {
            return Err(AppError::InvalidInput(
                "measured time must be non-decreasing".into(),
            ));
        }
        Ok(data)
    }

    /// Measured values for `metric`, if the log carries them.
    pub fn series(&self, metric: ValidationMetric) -> Option<&[f64]> {
        match metric {
            ValidationMetric::Position => Some(self.position.as_slice()),
            ValidationMetric::Velocity => self.velocity.as_deref(),
            ValidationMetric::Acceleration => self.acceleration.as_deref(),
            ValidationMetric::Power => self.power.as_deref(),
        }
        .filter(|s| !s.is_empty())
    }
}

fn missing_column(name: &str) -> AppError {
    AppError::InvalidInput(format!("measurement log has no '{name}' column"))
}

/// Error statistics of one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub metric: ValidationMetric,
    pub time_points: Vec<f64>,
    pub simulated_values: Vec<f64>,
    pub test_values: Vec<f64>,
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
    pub max_error: f64,
    /// Pearson correlation of simulated against measured values
    pub correlation: f64,
}

/// Compare one simulated metric against measured data.
///
/// Both series are cut to their common time range. With `interpolate` they
/// are resampled onto an even grid as long as the shorter series; otherwise
/// only time stamps present in both are used.
pub fn compare_time_series(
    states: &[SimulationState],
    data: &ValidationData,
    metric: ValidationMetric,
    interpolate: bool,
) -> AppResult<ValidationResult> {
    let measured = data.series(metric).ok_or_else(|| {
        AppError::InvalidInput(format!("measured data has no {metric} values"))
    })?;
    let (Some(sim_first), Some(sim_last)) = (states.first(), states.last()) else {
        return Err(AppError::InvalidInput("simulated trajectory is empty".into()));
    };
    let n_test = measured.len().min(data.time.len());
    if n_test == 0 {
        return Err(AppError::InvalidInput("measured data is empty".into()));
    }
    let test_times = &data.time[..n_test];
    let measured = &measured[..n_test];

    let start = sim_first.time.max(test_times[0]);
    let end = sim_last.time.min(test_times[n_test - 1]);
    if start > end {
        return Err(AppError::InvalidInput(
            "simulation and measurement do not overlap in time".into(),
        ));
    }

    let in_range = |t: f64| t >= start && t <= end;
    let (sim_times, sim_values): (Vec<f64>, Vec<f64>) = states
        .iter()
        .filter(|s| in_range(s.time))
        .map(|s| (s.time, metric.of(s)))
        .unzip();
    let (test_times, test_values): (Vec<f64>, Vec<f64>) = test_times
        .iter()
        .zip(measured)
        .filter(|&(&t, _)| in_range(t))
        .map(|(&t, &v)| (t, v))
        .unzip();

    let time_points = if interpolate {
        linspace(start, end, sim_times.len().min(test_times.len()))
    } else {
        test_times
            .iter()
            .copied()
            .filter(|t| sim_times.contains(t))
            .collect()
    };
    if time_points.is_empty() {
        return Err(AppError::InvalidInput(
            "no common time points between simulation and measurement".into(),
        ));
    }

    let resample = |xs: &[f64], ys: &[f64]| -> Vec<f64> {
        time_points
            .iter()
            .filter_map(|&t| interp(xs, ys, t))
            .collect()
    };
    let simulated_values = resample(&sim_times, &sim_values);
    let test_values = resample(&test_times, &test_values);

    let errors: Vec<f64> = simulated_values
        .iter()
        .zip(&test_values)
        .map(|(s, m)| s - m)
        .collect();
    let n = errors.len() as f64;
    let mse = errors.iter().map(|e| e * e).sum::<f64>() / n;
    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
    let max_error = errors.iter().fold(0.0_f64, |acc, e| acc.max(e.abs()));

    Ok(ValidationResult {
        metric,
        correlation: correlation(&simulated_values, &test_values),
        time_points,
        simulated_values,
        test_values,
        mse,
        rmse: mse.sqrt(),
        mae,
        max_error,
    })
}

/// Pearson correlation. Constant series correlate fully only with an identical series.
fn correlation(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len()) as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;
    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (x, y) in a.iter().zip(b) {
        cov += (x - mean_a) * (y - mean_b);
        var_a += (x - mean_a) * (x - mean_a);
        var_b += (y - mean_b) * (y - mean_b);
    }
    if var_a > 0.0 && var_b > 0.0 {
        cov / (var_a * var_b).sqrt()
    } else if a == b {
        1.0
    } else {
        0.0
    }
}

/// Compare every requested metric; metrics the data cannot support are skipped
/// with a warning.
pub fn validate_simulation(
    states: &[SimulationState],
    data: &ValidationData,
    metrics: &[ValidationMetric],
) -> Vec<ValidationResult> {
    metrics
        .iter()
        .filter_map(|&metric| match compare_time_series(states, data, metric, true) {
            Ok(result) => Some(result),
            Err(e) => {
                warn!(%metric, error = %e, "skipping validation metric");
                None
            }
        })
        .collect()
}

/// Plain-text table of the error statistics.
pub fn validation_summary(results: &[ValidationResult]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<14} {:>12} {:>12} {:>12} {:>12}",
        "metric", "RMSE", "MAE", "max error", "correlation"
    );
    for r in results {
        let _ = writeln!(
            out,
            "{:<14} {:>12.4} {:>12.4} {:>12.4} {:>12.4}",
            r.metric.to_string(),
            r.rmse,
            r.mae,
            r.max_error,
            r.correlation
        );
    }
    out
}

/// One end-of-run quantity checked against a measured value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalComparison {
    pub name: String,
    pub matches: bool,
    pub simulated: f64,
    pub measured: f64,
}

/// Measured end-of-run values; `None` entries are not compared.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeasuredFinals {
    pub final_time: Option<f64>,
    pub final_distance: Option<f64>,
    pub final_velocity: Option<f64>,
}

/// Check final time, distance and velocity within a relative `tolerance`.
pub fn compare_final_results(
    result: &SimulationResult,
    measured: &MeasuredFinals,
    tolerance: f64,
) -> Vec<FinalComparison> {
    [
        ("final_time", result.final_time, measured.final_time),
        ("final_distance", result.final_distance, measured.final_distance),
        ("final_velocity", result.final_velocity, measured.final_velocity),
    ]
    .into_iter()
    .filter_map(|(name, simulated, measured)| {
        let measured = measured?;
        let relative = ((simulated - measured) / measured).abs();
        Some(FinalComparison {
            name: name.to_string(),
            matches: relative <= tolerance,
            simulated,
            measured,
        })
    })
    .collect()
}
