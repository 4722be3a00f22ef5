use accel_config::VehicleConfig;
use accel_core::constants::ACCELERATION_DISTANCE_M;
use accel_sim::{DynamicsSolver, SimulationState, Termination};

fn run(config: &VehicleConfig) -> (SimulationState, Vec<SimulationState>) {
    let mut solver = DynamicsSolver::new(config).unwrap();
    let last = solver.solve().unwrap();
    (last, solver.trajectory().states().to_vec())
}

#[test]
fn baseline_covers_the_event_distance() {
    let config = VehicleConfig::formula_student_baseline();
    let (last, states) = run(&config);
    assert!(last.position >= ACCELERATION_DISTANCE_M);
    assert!(last.time > 2.0 && last.time < 8.0, "final time {}", last.time);
    assert_eq!(states.last(), Some(&last));
    assert_eq!(states[0].time, 0.0);
}

#[test]
fn position_never_decreases() {
    let config = VehicleConfig::formula_student_baseline();
    let (_, states) = run(&config);
    for pair in states.windows(2) {
        assert!(pair[1].position >= pair[0].position);
        assert!(pair[1].time > pair[0].time);
    }
}

#[test]
fn repeated_runs_are_bit_identical() {
    let config = VehicleConfig::formula_student_baseline();
    let mut solver = DynamicsSolver::new(&config).unwrap();
    solver.solve().unwrap();
    let first = solver.trajectory().clone();
    solver.solve().unwrap();
    assert_eq!(&first, solver.trajectory());

    let (_, fresh) = run(&config);
    assert_eq!(first.states(), fresh.as_slice());
}

#[test]
fn power_stays_within_configured_limit() {
    let config = VehicleConfig::formula_student_baseline();
    let (_, states) = run(&config);
    let limit = config.powertrain.max_power_accumulator_outlet;
    assert!(states.iter().all(|s| s.power_consumed.abs() <= limit));
    let peak = states
        .iter()
        .map(|s| s.power_consumed)
        .fold(0.0f64, f64::max);
    assert!(peak > 0.9 * limit, "peak power {peak}");
}

#[test]
fn drag_and_low_grip_slow_the_car() {
    let base = VehicleConfig::formula_student_baseline();
    let (reference, reference_states) = run(&base);

    let mut draggy = base.clone();
    draggy.aerodynamics.cda = 2.0;
    let (with_drag, _) = run(&draggy);
    assert!(with_drag.time > reference.time);

    let mut wet = base.clone();
    wet.environment.surface_mu_scaling = 0.6;
    let (on_wet, _) = run(&wet);
    assert!(on_wet.time > reference.time);

    let mut windy = base.clone();
    windy.environment.wind_speed = 10.0;
    let (_, windy_states) = run(&windy);
    assert!(windy_states[100].drag_force < reference_states[100].drag_force);
}

#[test]
fn short_time_cap_reports_timeout() {
    let mut config = VehicleConfig::formula_student_baseline();
    config.simulation.max_time = 1.0;
    let mut solver = DynamicsSolver::new(&config).unwrap();
    let last = solver.solve().unwrap();
    assert_eq!(solver.termination(), Some(Termination::Timeout));
    assert!(last.position < config.simulation.target_distance);
}

#[test]
fn trajectory_serializes_as_a_list() {
    let mut config = VehicleConfig::formula_student_baseline();
    config.simulation.target_distance = 0.5;
    let mut solver = DynamicsSolver::new(&config).unwrap();
    solver.solve().unwrap();
    let json = serde_json::to_value(solver.trajectory()).unwrap();
    assert_eq!(json.as_array().map(Vec::len), Some(solver.trajectory().len()));
}

#[test]
fn times_are_exact_multiples_of_the_step() {
    let mut config = VehicleConfig::formula_student_baseline();
    config.simulation.target_distance = 20.0;
    let (_, states) = run(&config);
    for (i, state) in states.iter().enumerate() {
        assert_eq!(state.time, i as f64 * config.simulation.dt);
    }
}

#[test]
fn time_cap_stops_on_the_exact_step() {
    let mut config = VehicleConfig::formula_student_baseline();
    config.simulation.max_time = 1.0;
    let (last, states) = run(&config);
    assert_eq!(last.time, 1.0);
    assert_eq!(states.len(), 1001);
}

#[test]
fn solver_refuses_config_with_every_violation_listed() {
    let mut config = VehicleConfig::formula_student_baseline();
    config.control.launch_torque_limit = -100.0;
    config.suspension.ride_height_rear = -0.1;
    match DynamicsSolver::new(&config) {
        Err(accel_sim::SimError::InvalidConfig { violations }) => {
            assert_eq!(violations.len(), 2);
            assert!(violations.iter().any(|v| v.contains("Launch torque")));
            assert!(violations.iter().any(|v| v.contains("ride height")));
        }
        other => panic!("expected InvalidConfig, got {other:?}"),
    }
}
