use accel_config::{
    ConfigError, Parameter, VehicleConfig, load_config, parse_json, parse_yaml, save_config,
};

fn temp_path(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("accel-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

#[test]
fn yaml_roundtrip() {
    let config = VehicleConfig::formula_student_baseline();
    let path = temp_path("baseline.yaml");
    save_config(&path, &config).unwrap();
    let loaded = load_config(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn json_roundtrip() {
    let config = Parameter::GearRatio.with_value(&VehicleConfig::formula_student_baseline(), 11.5);
    let path = temp_path("geared.json");
    save_config(&path, &config).unwrap();
    let loaded = load_config(&path).unwrap();
    assert_eq!(loaded.powertrain.gear_ratio, 11.5);
}

#[test]
fn optional_groups_take_defaults() {
    let yaml = r#"
mass:
  total_mass: 300.0
  cg_x: 0.8
  cg_z: 0.3
  wheelbase: 1.6
  front_track: 1.2
  rear_track: 1.2
  i_yaw: 100.0
  i_pitch: 120.0
tires:
  radius_loaded: 0.2286
  mass: 3.0
  mu_max: 1.5
  mu_slip_optimal: 0.15
powertrain:
  motor_torque_constant: 0.5
  motor_max_current: 200.0
  motor_max_speed: 1000.0
  battery_voltage_nominal: 300.0
  battery_internal_resistance: 0.01
  battery_max_current: 300.0
  gear_ratio: 10.0
aerodynamics:
  cda: 1.0
"#;
    let config = parse_yaml(yaml).unwrap();
    assert_eq!(config.powertrain.max_power_accumulator_outlet, 80_000.0);
    assert_eq!(config.powertrain.motor_efficiency, 0.95);
    assert_eq!(config.tires.rolling_resistance_coeff, 0.015);
    assert_eq!(config.control.launch_torque_limit, 1000.0);
    assert!(config.control.traction_control_enabled);
    assert_eq!(config.simulation.dt, 0.001);
    assert_eq!(config.simulation.max_time, 30.0);
    assert_eq!(config.simulation.target_distance, 75.0);
    assert_eq!(config.environment.surface_mu_scaling, 1.0);
}

#[test]
fn invalid_config_is_refused_with_all_violations() {
    let mut config = VehicleConfig::formula_student_baseline();
    config.powertrain.max_power_accumulator_outlet = 100_000.0;
    config.mass.total_mass = -1.0;
    let json = serde_json::to_string(&config).unwrap();
    match parse_json(&json) {
        Err(ConfigError::Validation { violations }) => {
            assert!(violations.iter().any(|v| v.contains("80 kW")));
            assert!(violations.iter().any(|v| v.contains("Total mass")));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn unknown_extension_is_rejected() {
    let path = temp_path("config.toml");
    std::fs::write(&path, "").unwrap();
    assert!(matches!(
        load_config(&path),
        Err(ConfigError::UnsupportedFormat { .. })
    ));
}

#[test]
fn shipped_baseline_matches_reference_car() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../configs/baseline.yaml");
    let loaded = load_config(&path).unwrap();
    assert_eq!(loaded, VehicleConfig::formula_student_baseline());
}
