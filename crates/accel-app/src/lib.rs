//! Application services for the acceleration simulator.
//!
//! Single runs, batch sweeps, sensitivity analysis, optimization, result
//! export and validation against measured data, shared by the CLI and tests.

pub mod batch;
pub mod error;
pub mod export;
pub mod optimizer;
pub mod sensitivity;
pub mod simulation;
pub mod stats;
pub mod validation;

pub use batch::{BatchRunner, SweepPoint, linspace};
pub use error::{AppError, AppResult};
pub use export::{
    RunManifest, comparison_table, compute_run_id, result_json, save_run, trajectory_csv,
};
pub use optimizer::{Objective, OptimizationResult, Optimizer, OptimizerSettings, ParameterBounds};
pub use sensitivity::{
    OutputMetric, Sensitivity, rank_sensitivities, relative_sensitivities, sensitivity,
};
pub use simulation::{AccelerationSimulation, SimulationResult, simulate};
pub use stats::TrajectoryStats;
pub use validation::{
    FinalComparison, MeasuredFinals, ValidationColumns, ValidationData, ValidationMetric,
    ValidationResult, compare_final_results, compare_time_series, validate_simulation,
    validation_summary,
};

/// Engine version recorded in run manifests.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
