//! Longitudinal dynamics integration for the acceleration event.
//!
//! Provides:
//! - `SimulationState`, a flat numeric vector used both as state and as derivative
//! - `TransientModel` / `Integrator` traits and a fixed-step RK4
//! - `LongitudinalModel`, the coupled vehicle right-hand side
//! - `DynamicsSolver`, the run loop that produces a `Trajectory`

pub mod error;
pub mod integrator;
pub mod model;
pub mod solver;
pub mod state;
pub mod vehicle_model;

pub use error::{SimError, SimResult};
pub use integrator::{Integrator, Rk4};
pub use model::TransientModel;
pub use solver::{DynamicsSolver, Termination, Trajectory};
pub use state::{SimulationState, StateVector};
pub use vehicle_model::LongitudinalModel;
