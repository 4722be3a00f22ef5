//! Differential-evolution search over vehicle parameters.
//!
//! Classic rand/1/bin with deferred updating: every generation builds all
//! trial vectors from one seeded generator, evaluates them in parallel, then
//! keeps each trial that is no worse than its parent. Fixed seed and settings
//! give identical results regardless of thread count.

use crate::error::{AppError, AppResult};
use crate::simulation::{SimulationResult, simulate};
use accel_config::{Parameter, VehicleConfig};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

const POWER_VIOLATION_PENALTY: f64 = 1e5;
const TIME_VIOLATION_PENALTY: f64 = 1e4;
const INVALID_CONFIG_PENALTY: f64 = 1e6;
const PER_VIOLATION_PENALTY: f64 = 1e5;

/// Search range of one parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterBounds {
    pub parameter: Parameter,
    pub min: f64,
    pub max: f64,
    /// Round to multiples of this step (discrete parameters)
    pub step: Option<f64>,
}

impl ParameterBounds {
    pub fn new(parameter: Parameter, min: f64, max: f64) -> AppResult<Self> {
        if !(min.is_finite() && max.is_finite()) || min > max {
            return Err(AppError::InvalidInput(format!(
                "bounds for {parameter} must satisfy min <= max (got {min}..{max})"
            )));
        }
        Ok(Self {
            parameter,
            min,
            max,
            step: None,
        })
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = (step > 0.0).then_some(step);
        self
    }

    /// Clamp into range, then snap to the step grid if one is set.
    pub fn clip(&self, value: f64) -> f64 {
        let value = value.clamp(self.min, self.max);
        match self.step {
            Some(step) => ((value / step).round() * step).clamp(self.min, self.max),
            None => value,
        }
    }

    fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Parses `path=min:max` or `path=min:max:step`.
impl FromStr for ParameterBounds {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::InvalidInput(format!("expected path=min:max[:step], got '{s}'"));
        let (path, range) = s.split_once('=').ok_or_else(invalid)?;
        let parameter: Parameter = path.parse()?;
        let numbers = range
            .split(':')
            .map(|part| part.trim().parse::<f64>().map_err(|_| invalid()))
            .collect::<AppResult<Vec<f64>>>()?;
        match numbers.as_slice() {
            [min, max] => ParameterBounds::new(parameter, *min, *max),
            [min, max, step] => Ok(ParameterBounds::new(parameter, *min, *max)?.with_step(*step)),
            _ => Err(invalid()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Objective {
    MinimizeTime,
    MaximizeScore,
    /// Any rules violation is treated as a failed run
    MinimizeTimeWithRules,
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Objective::MinimizeTime => "minimize_time",
            Objective::MaximizeScore => "maximize_score",
            Objective::MinimizeTimeWithRules => "minimize_time_with_rules",
        })
    }
}

impl FromStr for Objective {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minimize_time" => Ok(Objective::MinimizeTime),
            "maximize_score" => Ok(Objective::MaximizeScore),
            "minimize_time_with_rules" => Ok(Objective::MinimizeTimeWithRules),
            other => Err(AppError::InvalidInput(format!("unknown objective: {other}"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OptimizerSettings {
    pub generations: usize,
    /// Population size; defaults to `max(10, 5 * dimensions)`
    pub population: Option<usize>,
    /// Differential weight F
    pub mutation: f64,
    /// Crossover probability CR
    pub crossover: f64,
    pub seed: u64,
    /// Stop once the population's objective spread falls below this
    pub tolerance: f64,
    pub parallel: bool,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            generations: 100,
            population: None,
            mutation: 0.8,
            crossover: 0.7,
            seed: 42,
            tolerance: 1e-3,
            parallel: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OptimizationResult {
    pub best_config: VehicleConfig,
    pub best_result: SimulationResult,
    pub best_objective: f64,
    /// Parameter values of the best configuration, in bounds order
    pub best_values: Vec<(Parameter, f64)>,
    pub evaluations: usize,
    pub generations_run: usize,
    /// Best objective after each generation, starting with the initial population
    pub history: Vec<f64>,
}

/// Objective value plus the run behind it, if the configuration ran.
type Evaluation = (f64, Option<SimulationResult>);

pub struct Optimizer {
    pub base: VehicleConfig,
    pub bounds: Vec<ParameterBounds>,
    pub objective: Objective,
    pub fastest_time: Option<f64>,
    /// Penalize invalid configurations and rules violations
    pub enforce_rules: bool,
    pub settings: OptimizerSettings,
}

impl Optimizer {
    pub fn new(base: VehicleConfig, bounds: Vec<ParameterBounds>, objective: Objective) -> Self {
        Self {
            base,
            bounds,
            objective,
            fastest_time: None,
            enforce_rules: true,
            settings: OptimizerSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: OptimizerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_fastest_time(mut self, fastest_time: Option<f64>) -> Self {
        self.fastest_time = fastest_time;
        self
    }

    /// Copy of the base configuration with `x` applied.
    pub fn config_for(&self, x: &[f64]) -> VehicleConfig {
        self.bounds
            .iter()
            .zip(x)
            .fold(self.base.clone(), |config, (b, &v)| {
                b.parameter.with_value(&config, v)
            })
    }

    fn evaluate(&self, x: &[f64]) -> Evaluation {
        let config = self.config_for(x);
        if self.enforce_rules {
            let violations = config.validate();
            if !violations.is_empty() {
                return (
                    INVALID_CONFIG_PENALTY + PER_VIOLATION_PENALTY * violations.len() as f64,
                    None,
                );
            }
        }

        let result = match simulate(&config, self.fastest_time) {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "optimizer candidate rejected");
                return (INVALID_CONFIG_PENALTY, None);
            }
        };

        let mut penalty = 0.0;
        if self.enforce_rules && !result.power_compliant {
            penalty += POWER_VIOLATION_PENALTY;
        }
        if self.enforce_rules && !result.time_compliant {
            penalty += TIME_VIOLATION_PENALTY;
        }

        let value = match self.objective {
            Objective::MinimizeTime => result.final_time + penalty,
            Objective::MaximizeScore => match result.score {
                Some(score) => -score + penalty,
                None => INVALID_CONFIG_PENALTY + penalty,
            },
            Objective::MinimizeTimeWithRules => {
                if result.compliant {
                    result.final_time + penalty
                } else {
                    INVALID_CONFIG_PENALTY + penalty
                }
            }
        };
        (value, Some(result))
    }

    fn evaluate_all(&self, candidates: &[Vec<f64>]) -> Vec<Evaluation> {
        if self.settings.parallel {
            candidates.par_iter().map(|x| self.evaluate(x)).collect()
        } else {
            candidates.iter().map(|x| self.evaluate(x)).collect()
        }
    }

    fn check_inputs(&self) -> AppResult<()> {
        if self.bounds.is_empty() {
            return Err(AppError::InvalidInput("no parameters to optimize".into()));
        }
        if self.objective == Objective::MaximizeScore && self.fastest_time.is_none() {
            return Err(AppError::InvalidInput(
                "maximize_score needs a fastest time".into(),
            ));
        }
        let s = &self.settings;
        if !(0.0..=2.0).contains(&s.mutation) || !(0.0..=1.0).contains(&s.crossover) {
            return Err(AppError::InvalidInput(
                "mutation must be in [0, 2] and crossover in [0, 1]".into(),
            ));
        }
        Ok(())
    }

    pub fn run(&self) -> AppResult<OptimizationResult> {
        self.check_inputs()?;
        let dims = self.bounds.len();
        let pop_size = self.settings.population.unwrap_or(10.max(5 * dims)).max(4);
        let mut rng = Pcg64Mcg::seed_from_u64(self.settings.seed);

        info!(
            parameters = dims,
            population = pop_size,
            generations = self.settings.generations,
            objective = %self.objective,
            "starting optimization"
        );

        let mut population: Vec<Vec<f64>> = (0..pop_size)
            .map(|_| {
                self.bounds
                    .iter()
                    .map(|b| b.clip(b.min + rng.r#gen::<f64>() * b.span()))
                    .collect()
            })
            .collect();
        let mut scores = self.evaluate_all(&population);
        let mut evaluations = pop_size;
        let mut history = vec![best_of(&scores).1];
        let mut generations_run = 0;

        for generation in 0..self.settings.generations {
            if spread(&scores) < self.settings.tolerance {
                debug!(generation, "population converged");
                break;
            }

            let trials: Vec<Vec<f64>> = (0..pop_size)
                .map(|i| self.trial_vector(&population, i, &mut rng))
                .collect();
            let trial_scores = self.evaluate_all(&trials);
            evaluations += pop_size;

            for (i, (trial, trial_score)) in trials.into_iter().zip(trial_scores).enumerate() {
                if trial_score.0 <= scores[i].0 {
                    population[i] = trial;
                    scores[i] = trial_score;
                }
            }

            let (_, best) = best_of(&scores);
            history.push(best);
            generations_run = generation + 1;
            info!(generation = generations_run, best, evaluations, "generation complete");
        }

        let (best_idx, best_objective) = best_of(&scores);
        let best_values: Vec<(Parameter, f64)> = self
            .bounds
            .iter()
            .map(|b| b.parameter)
            .zip(population[best_idx].iter().copied())
            .collect();
        let best_result = scores[best_idx].1.clone().ok_or_else(|| {
            AppError::InvalidInput("no candidate produced a valid run within the bounds".into())
        })?;

        Ok(OptimizationResult {
            best_config: self.config_for(&population[best_idx]),
            best_result,
            best_objective,
            best_values,
            evaluations,
            generations_run,
            history,
        })
    }

    /// rand/1/bin trial for member `i`.
    fn trial_vector(&self, population: &[Vec<f64>], i: usize, rng: &mut Pcg64Mcg) -> Vec<f64> {
        let [a, b, c] = pick_distinct(rng, population.len(), i);
        let dims = self.bounds.len();
        let forced = rng.gen_range(0..dims);
        self.bounds
            .iter()
            .enumerate()
            .map(|(j, bound)| {
                if j == forced || rng.r#gen::<f64>() < self.settings.crossover {
                    let mutant =
                        population[a][j] + self.settings.mutation * (population[b][j] - population[c][j]);
                    bound.clip(mutant)
                } else {
                    population[i][j]
                }
            })
            .collect()
    }
}

/// Three distinct indices in `0..n`, none equal to `exclude`. Needs `n >= 4`.
fn pick_distinct(rng: &mut Pcg64Mcg, n: usize, exclude: usize) -> [usize; 3] {
    let mut picked = [0usize; 3];
    let mut count = 0;
    while count < 3 {
        let candidate = rng.gen_range(0..n);
        if candidate != exclude && !picked[..count].contains(&candidate) {
            picked[count] = candidate;
            count += 1;
        }
    }
    picked
}

fn best_of(scores: &[Evaluation]) -> (usize, f64) {
    scores
        .iter()
        .enumerate()
        .map(|(i, (value, _))| (i, *value))
        .fold((0, f64::INFINITY), |best, cur| if cur.1 < best.1 { cur } else { best })
}

fn spread(scores: &[Evaluation]) -> f64 {
    let (lo, hi) = scores
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (v, _)| {
            (lo.min(*v), hi.max(*v))
        });
    hi - lo
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_parse_and_clip() {
        let b: ParameterBounds = "powertrain.gear_ratio=8:12:0.5".parse().unwrap();
        assert_eq!(b.parameter, Parameter::GearRatio);
        assert_eq!(b.clip(20.0), 12.0);
        assert_eq!(b.clip(9.3), 9.5);
        assert!("powertrain.gear_ratio=12:8".parse::<ParameterBounds>().is_err());
        assert!("nope=1:2".parse::<ParameterBounds>().is_err());
        assert!("mass.cg_x".parse::<ParameterBounds>().is_err());
    }

    #[test]
    fn bounds_serialize_with_parameter_path() {
        let b = ParameterBounds::new(Parameter::CgX, 0.7, 0.9)
            .unwrap()
            .with_step(0.05);
        let json = serde_json::to_string(&b).unwrap();
        assert!(json.contains("\"mass.cg_x\""));
        let back: ParameterBounds = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);
    }

    #[test]
    fn objective_names_round_trip() {
        for o in [
            Objective::MinimizeTime,
            Objective::MaximizeScore,
            Objective::MinimizeTimeWithRules,
        ] {
            assert_eq!(o.to_string().parse::<Objective>().unwrap(), o);
        }
    }

    #[test]
    fn invalid_candidates_are_penalized_by_violation_count() {
        let bounds = vec![ParameterBounds::new(Parameter::TotalMass, -10.0, -1.0).unwrap()];
        let opt = Optimizer::new(
            VehicleConfig::formula_student_baseline(),
            bounds,
            Objective::MinimizeTime,
        );
        let (value, result) = opt.evaluate(&[-5.0]);
        assert!(result.is_none());
        // negative mass: total mass and sprung mass checks both fail
        assert_eq!(value, 1e6 + 2.0 * 1e5);
    }

    #[test]
    fn pick_distinct_excludes_self() {
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        for _ in 0..100 {
            let [a, b, c] = pick_distinct(&mut rng, 4, 2);
            assert!(a != 2 && b != 2 && c != 2);
            assert!(a != b && b != c && a != c);
        }
    }

    #[test]
    fn score_objective_needs_fastest_time() {
        let bounds = vec![ParameterBounds::new(Parameter::GearRatio, 8.0, 12.0).unwrap()];
        let opt = Optimizer::new(
            VehicleConfig::formula_student_baseline(),
            bounds,
            Objective::MaximizeScore,
        );
        assert!(opt.run().is_err());
    }
}
