//! TransientModel trait for pluggable dynamic systems.

use crate::error::SimResult;
use crate::state::StateVector;

/// Trait for transient (dynamic) system models.
///
/// A TransientModel must implement:
/// - State type (vector arithmetic for integration)
/// - Initial state
/// - RHS (right-hand side) computation: x_dot = f(t, x)
pub trait TransientModel {
    type State: StateVector;

    /// Return the initial state at t=0.
    fn initial_state(&self) -> Self::State;

    /// Compute state derivative dxdt = f(t, x).
    ///
    /// Takes &mut self so a model can remember values from the first
    /// evaluation of a step.
    fn rhs(&mut self, t: f64, x: &Self::State) -> SimResult<Self::State>;

    /// Build the accepted state at `t_next` from the integrated state and the
    /// averaged slope. Models whose state carries algebraic (non-integrated)
    /// quantities override this to take them from the slope.
    fn accept(
        &self,
        _previous: &Self::State,
        integrated: Self::State,
        _slope: &Self::State,
        _t_next: f64,
    ) -> Self::State {
        integrated
    }
}
