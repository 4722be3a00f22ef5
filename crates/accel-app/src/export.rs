//! Result export: trajectory CSV, result JSON and run manifests.

use crate::ENGINE_VERSION;
use crate::error::AppResult;
use crate::simulation::{AccelerationSimulation, SimulationResult};
use accel_config::VehicleConfig;
use accel_sim::{SimulationState, Termination, Trajectory};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Content hash of a configuration and the engine version.
///
/// Identical configurations run by the same engine share an id.
pub fn compute_run_id(config: &VehicleConfig) -> String {
    let mut hasher = Sha256::new();

    let config_json = serde_json::to_string(config).unwrap_or_default();
    hasher.update(config_json.as_bytes());
    hasher.update(ENGINE_VERSION.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}

/// One header row of state field names, then one row per state.
pub fn trajectory_csv(trajectory: &Trajectory) -> String {
    let mut out = SimulationState::FIELDS.join(",");
    out.push('\n');
    for state in trajectory {
        let row: Vec<String> = state.values().iter().map(|v| v.to_string()).collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

pub fn result_json(result: &SimulationResult) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: String,
    pub timestamp: String,
    pub engine_version: String,
    pub dt_s: f64,
    pub steps: usize,
    pub final_time_s: f64,
    pub termination: Termination,
}

impl RunManifest {
    pub fn new(simulation: &AccelerationSimulation, result: &SimulationResult) -> Self {
        Self {
            run_id: compute_run_id(simulation.config()),
            timestamp: chrono::Utc::now().to_rfc3339(),
            engine_version: ENGINE_VERSION.to_string(),
            dt_s: simulation.dt(),
            steps: simulation.trajectory().len().saturating_sub(1),
            final_time_s: result.final_time,
            termination: result.termination,
        }
    }
}

/// Write `manifest.json`, `result.json` and `trajectory.csv` into
/// `dir/<run_id>/`, returning the run id.
pub fn save_run(
    dir: &Path,
    simulation: &AccelerationSimulation,
    result: &SimulationResult,
) -> AppResult<String> {
    let manifest = RunManifest::new(simulation, result);
    let run_dir = dir.join(&manifest.run_id);
    fs::create_dir_all(&run_dir)?;

    fs::write(
        run_dir.join("manifest.json"),
        serde_json::to_string_pretty(&manifest)?,
    )?;
    fs::write(run_dir.join("result.json"), result_json(result)?)?;
    fs::write(
        run_dir.join("trajectory.csv"),
        trajectory_csv(simulation.trajectory()),
    )?;

    Ok(manifest.run_id)
}

/// Plain-text table comparing named results side by side.
pub fn comparison_table(rows: &[(String, SimulationResult)]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<24} {:>9} {:>10} {:>11} {:>9}",
        "name", "time (s)", "v (km/h)", "P max (kW)", "rules"
    );
    for (name, r) in rows {
        let _ = writeln!(
            out,
            "{:<24} {:>9.3} {:>10.1} {:>11.1} {:>9}",
            name,
            r.final_time,
            r.final_velocity * 3.6,
            r.max_power_used / 1000.0,
            if r.compliant { "ok" } else { "VIOLATION" }
        );
    }
    out
}
