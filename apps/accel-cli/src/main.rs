use accel_app::{
    AccelerationSimulation, AppError, AppResult, BatchRunner, MeasuredFinals, Objective,
    Optimizer, OptimizerSettings, OutputMetric, ParameterBounds, TrajectoryStats,
    ValidationColumns, ValidationData, ValidationMetric, compare_final_results, comparison_table,
    linspace, rank_sensitivities, relative_sensitivities, result_json, trajectory_csv,
    validate_simulation, validation_summary,
};
use accel_config::{Parameter, VehicleConfig, load_config, save_config};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "accel-cli")]
#[command(about = "Formula Student acceleration event simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a vehicle configuration file
    Validate {
        /// Path to the YAML or JSON configuration
        config: PathBuf,
    },
    /// Simulate one acceleration run
    Run {
        config: PathBuf,
        /// Fastest time in the field, enables scoring
        #[arg(long)]
        fastest_time: Option<f64>,
        /// Write the trajectory as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Write the result as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Write the reference configuration
    Baseline {
        /// Output path (.yaml, .yml or .json)
        output: PathBuf,
    },
    /// Sweep one parameter over an evenly spaced range
    Sweep {
        config: PathBuf,
        /// Dotted parameter path, e.g. powertrain.gear_ratio
        parameter: String,
        start: f64,
        end: f64,
        points: usize,
        #[arg(long)]
        fastest_time: Option<f64>,
    },
    /// Rank parameters by their effect on an output metric
    Sensitivity {
        config: PathBuf,
        #[arg(required = true)]
        parameters: Vec<String>,
        /// Output metric: final_time, score or final_velocity
        #[arg(long, default_value = "final_time")]
        metric: String,
        /// Relative half-width of the sweep around each base value
        #[arg(long, default_value_t = 0.1)]
        span: f64,
        #[arg(long, default_value_t = 5)]
        points: usize,
    },
    /// Compare a simulated run with a measured CSV log
    Compare {
        config: PathBuf,
        /// CSV with time and position columns, optionally velocity, acceleration and power
        measured: PathBuf,
        /// Metrics to compare
        #[arg(long = "metric", default_values = ["position", "velocity"])]
        metrics: Vec<String>,
        /// Measured final time (s)
        #[arg(long)]
        final_time: Option<f64>,
        /// Relative tolerance for final values
        #[arg(long, default_value_t = 0.05)]
        tolerance: f64,
    },
    /// Search parameter bounds for the best configuration
    Optimize {
        config: PathBuf,
        /// Bounds as path=min:max or path=min:max:step
        #[arg(long = "param", required = true)]
        params: Vec<String>,
        #[arg(long, default_value_t = 50)]
        generations: usize,
        #[arg(long)]
        population: Option<usize>,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// minimize_time, maximize_score or minimize_time_with_rules
        #[arg(long, default_value = "minimize_time")]
        objective: String,
        #[arg(long)]
        fastest_time: Option<f64>,
        /// Write the best configuration here
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config } => cmd_validate(&config),
        Commands::Run {
            config,
            fastest_time,
            csv,
            json,
        } => cmd_run(&config, fastest_time, csv.as_deref(), json.as_deref()),
        Commands::Baseline { output } => cmd_baseline(&output),
        Commands::Sweep {
            config,
            parameter,
            start,
            end,
            points,
            fastest_time,
        } => cmd_sweep(&config, &parameter, start, end, points, fastest_time),
        Commands::Sensitivity {
            config,
            parameters,
            metric,
            span,
            points,
        } => cmd_sensitivity(&config, &parameters, &metric, span, points),
        Commands::Compare {
            config,
            measured,
            metrics,
            final_time,
            tolerance,
        } => cmd_compare(&config, &measured, &metrics, final_time, tolerance),
        Commands::Optimize {
            config,
            params,
            generations,
            population,
            seed,
            objective,
            fastest_time,
            output,
        } => {
            let settings = OptimizerSettings {
                generations,
                population,
                seed,
                ..OptimizerSettings::default()
            };
            cmd_optimize(
                &config,
                &params,
                &objective,
                settings,
                fastest_time,
                output.as_deref(),
            )
        }
    }
}

fn cmd_validate(path: &Path) -> AppResult<()> {
    println!("Validating configuration: {}", path.display());
    load_config(path)?;
    println!("✓ Configuration is valid");
    Ok(())
}

fn cmd_run(
    path: &Path,
    fastest_time: Option<f64>,
    csv: Option<&Path>,
    json: Option<&Path>,
) -> AppResult<()> {
    let config = load_config(path)?;
    let started = Instant::now();
    let mut sim = AccelerationSimulation::new(config)?;
    let result = sim.run(fastest_time)?;

    println!(
        "✓ Simulation completed in {:.1} ms ({:?})",
        started.elapsed().as_secs_f64() * 1000.0,
        result.termination
    );
    println!("  Final time:       {:.3} s", result.final_time);
    println!("  Distance:         {:.2} m", result.final_distance);
    println!("  Final speed:      {:.1} km/h", result.final_velocity * 3.6);
    for line in TrajectoryStats::from_trajectory(sim.trajectory()).summary_lines() {
        println!("{line}");
    }
    println!(
        "  Power limit:      {}",
        match result.power_violation_time {
            None => "ok".to_string(),
            Some(t) => format!("exceeded at {:.3} s", t),
        }
    );
    println!(
        "  Time limit:       {}",
        if result.time_compliant { "ok" } else { "exceeded" }
    );
    if let Some(score) = result.score {
        println!("  Score:            {:.2} pts", score);
    }

    if let Some(csv) = csv {
        fs::write(csv, trajectory_csv(sim.trajectory()))?;
        println!("  Trajectory written to {}", csv.display());
    }
    if let Some(json) = json {
        fs::write(json, result_json(&result)?)?;
        println!("  Result written to {}", json.display());
    }
    Ok(())
}

fn cmd_baseline(output: &Path) -> AppResult<()> {
    save_config(output, &VehicleConfig::formula_student_baseline())?;
    println!("✓ Baseline configuration written to {}", output.display());
    Ok(())
}

fn cmd_sweep(
    path: &Path,
    parameter: &str,
    start: f64,
    end: f64,
    points: usize,
    fastest_time: Option<f64>,
) -> AppResult<()> {
    let config = load_config(path)?;
    let parameter: Parameter = parameter.parse()?;
    let values = linspace(start, end, points);
    let runner = BatchRunner::new(config).with_fastest_time(fastest_time);

    println!("Sweeping {} over {} points", parameter, values.len());
    let mut rows = Vec::new();
    for (value, point) in values.iter().zip(runner.parameter_sweep(parameter, &values)) {
        match point.outcome {
            Ok(result) => rows.push((format!("{} = {:.4}", parameter.path(), value), result)),
            Err(e) => println!("  {} = {:.4}: {}", parameter.path(), value, e),
        }
    }
    print!("{}", comparison_table(&rows));
    Ok(())
}

fn cmd_sensitivity(
    path: &Path,
    parameters: &[String],
    metric: &str,
    span: f64,
    points: usize,
) -> AppResult<()> {
    let config = load_config(path)?;
    let metric: OutputMetric = metric.parse()?;
    let parameters = parameters
        .iter()
        .map(|p| p.parse::<Parameter>().map_err(AppError::from))
        .collect::<AppResult<Vec<_>>>()?;

    let ranked = rank_sensitivities(relative_sensitivities(
        &config,
        &parameters,
        span,
        points,
        metric,
    )?);

    println!("Sensitivity of {} (±{:.0}%):", metric, span * 100.0);
    for s in ranked {
        println!("  {:<40} {:>+8.4}", s.parameter, s.coefficient);
    }
    Ok(())
}

fn cmd_compare(
    path: &Path,
    measured: &Path,
    metrics: &[String],
    final_time: Option<f64>,
    tolerance: f64,
) -> AppResult<()> {
    let config = load_config(path)?;
    let metrics = metrics
        .iter()
        .map(|m| m.parse::<ValidationMetric>())
        .collect::<AppResult<Vec<_>>>()?;
    let data = ValidationData::from_csv(measured, &ValidationColumns::default())?;

    let mut sim = AccelerationSimulation::new(config)?;
    let result = sim.run(None)?;
    let results = validate_simulation(sim.trajectory().states(), &data, &metrics);

    println!("Comparing against {}", measured.display());
    print!("{}", validation_summary(&results));

    let measured_finals = MeasuredFinals {
        final_time,
        ..MeasuredFinals::default()
    };
    for c in compare_final_results(&result, &measured_finals, tolerance) {
        println!(
            "  {:<16} sim {:.3}  measured {:.3}  {}",
            c.name,
            c.simulated,
            c.measured,
            if c.matches { "✓" } else { "✗" }
        );
    }
    Ok(())
}

fn cmd_optimize(
    path: &Path,
    params: &[String],
    objective: &str,
    settings: OptimizerSettings,
    fastest_time: Option<f64>,
    output: Option<&Path>,
) -> AppResult<()> {
    let config = load_config(path)?;
    let objective: Objective = objective.parse()?;
    let bounds = params
        .iter()
        .map(|p| p.parse::<ParameterBounds>())
        .collect::<AppResult<Vec<_>>>()?;

    let started = Instant::now();
    let result = Optimizer::new(config, bounds, objective)
        .with_settings(settings)
        .with_fastest_time(fastest_time)
        .run()?;

    println!(
        "✓ Optimization finished: {} evaluations over {} generations in {:.1} s",
        result.evaluations,
        result.generations_run,
        started.elapsed().as_secs_f64()
    );
    println!("  Best objective:   {:.4}", result.best_objective);
    println!("  Final time:       {:.3} s", result.best_result.final_time);
    println!(
        "  Compliant:        {}",
        if result.best_result.compliant { "yes" } else { "no" }
    );
    for (parameter, value) in &result.best_values {
        println!("  {:<40} {:.4}", parameter.path(), value);
    }

    if let Some(output) = output {
        save_config(output, &result.best_config)?;
        println!("  Best configuration written to {}", output.display());
    }
    Ok(())
}
