//! accel-rules: regulatory checks and scoring for the acceleration event.
//!
//! Non-compliance is an outcome, not an error: every check returns a value
//! describing how the run fared against the limit.

pub mod power;
pub mod scoring;
pub mod time;

pub use power::{PowerCheck, check_power_limit};
pub use scoring::{score, score_with_max_points, t_max};
pub use time::{TimeCheck, check_time_limit, check_time_limit_with};
