use accel_rules::{check_power_limit, check_time_limit, score};
use accel_sim::SimulationState;
use proptest::prelude::*;

fn trace(powers: &[f64]) -> Vec<SimulationState> {
    powers
        .iter()
        .enumerate()
        .map(|(i, &p)| SimulationState {
            time: i as f64 * 0.01,
            power_consumed: p,
            ..SimulationState::default()
        })
        .collect()
}

#[test]
fn power_trace_peaking_at_85_kw_fails() {
    let states = trace(&[0.0, 40_000.0, 79_000.0, 82_000.0, 85_000.0, 83_000.0, 70_000.0]);
    let check = check_power_limit(&states, 80_000.0);
    assert!(!check.compliant);
    assert_eq!(check.max_power_used, 85_000.0);
    assert_eq!(check.violation_time, Some(states[3].time));
}

#[test]
fn time_check_uses_final_state() {
    let states = trace(&[0.0; 3]);
    let check = check_time_limit(states.last().unwrap());
    assert!(check.compliant);
    assert_eq!(check.final_time, 0.02);
}

proptest! {
    #[test]
    fn score_is_bounded(team in 0.1f64..60.0, fastest in 0.1f64..20.0) {
        let s = score(team, fastest);
        prop_assert!(s >= 3.75 - 1e-9);
        // faster than the fastest run earns above max points
        if team >= fastest {
            prop_assert!(s <= 75.0 + 1e-9);
        }
    }

    #[test]
    fn score_decreases_with_time(a in 1.0f64..10.0, b in 1.0f64..10.0) {
        let fastest = 1.0;
        let (fast, slow) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(score(fast, fastest) >= score(slow, fastest));
    }
}
