//! Acceleration event scoring.
//!
//! ```text
//! Tmax    = 1.5 * fastest
//! capped  = min(team, Tmax)
//! score   = 0.95 * P * ((Tmax / capped - 1) / 0.5) + 0.05 * P
//! ```

use accel_core::constants::MAX_EVENT_POINTS;

/// Slowest time that still earns performance points, relative to the fastest.
const T_MAX_FACTOR: f64 = 1.5;

/// Share of points awarded for finishing at all.
const FINISH_SHARE: f64 = 0.05;

pub fn t_max(fastest_time: f64) -> f64 {
    T_MAX_FACTOR * fastest_time
}

/// Score out of the standard 75 points.
pub fn score(team_time: f64, fastest_time: f64) -> f64 {
    score_with_max_points(team_time, fastest_time, MAX_EVENT_POINTS)
}

pub fn score_with_max_points(team_time: f64, fastest_time: f64, max_points: f64) -> f64 {
    let t_max = t_max(fastest_time);
    let capped = team_time.min(t_max);
    if capped <= 0.0 {
        return 0.0;
    }
    let performance = (1.0 - FINISH_SHARE) * max_points * ((t_max / capped - 1.0) / 0.5);
    (performance + FINISH_SHARE * max_points).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use accel_core::{Tolerances, nearly_equal};

    #[test]
    fn fastest_team_gets_full_points() {
        assert!(nearly_equal(score(4.5, 4.5), 75.0, Tolerances::default()));
    }

    #[test]
    fn slowest_scoring_time_gets_floor() {
        assert!(nearly_equal(score(6.75, 4.5), 3.75, Tolerances::default()));
    }

    #[test]
    fn slower_than_t_max_is_capped() {
        assert_eq!(score(10.0, 4.5), score(6.75, 4.5));
    }

    #[test]
    fn t_max_is_one_and_a_half_fastest() {
        assert_eq!(t_max(4.0), 6.0);
    }

    #[test]
    fn degenerate_times_score_zero() {
        assert_eq!(score(0.0, 4.5), 0.0);
        assert_eq!(score(5.0, 0.0), 0.0);
    }
}
