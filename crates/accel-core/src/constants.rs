//! Physical constants and competition rule limits.

/// Standard gravity used for axle loads (m/s²).
pub const GRAVITY_MPS2: f64 = 9.81;

/// Accumulator outlet power cap (W).
pub const MAX_ACCUMULATOR_POWER_W: f64 = 80_000.0;

/// Runs slower than this are disqualified (s).
pub const MAX_RUN_TIME_S: f64 = 25.0;

/// Points available for the acceleration event.
pub const MAX_EVENT_POINTS: f64 = 75.0;

/// Length of the acceleration track (m).
pub const ACCELERATION_DISTANCE_M: f64 = 75.0;

/// Below this ground speed slip ratios are not divided out (m/s).
pub const LOW_SPEED_THRESHOLD_MPS: f64 = 0.1;

/// Number of wheels contributing rotational inertia.
pub const WHEEL_COUNT: f64 = 4.0;
