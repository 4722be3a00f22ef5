//! Fixed-step time integrators.

use crate::error::{SimError, SimResult};
use crate::model::TransientModel;
use crate::state::StateVector;

/// Trait for time integrators.
pub trait Integrator {
    /// Advance state by one time step using the transient model.
    fn step<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State>;
}

/// Classical RK4 (Runge-Kutta 4th order) integrator.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rk4;

impl Integrator for Rk4 {
    fn step<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }

        let k1 = model.rhs(t, x)?;

        let x2 = x.add(&k1.scale(0.5 * dt));
        let k2 = model.rhs(t + 0.5 * dt, &x2)?;

        let x3 = x.add(&k2.scale(0.5 * dt));
        let k3 = model.rhs(t + 0.5 * dt, &x3)?;

        let x4 = x.add(&k3.scale(dt));
        let k4 = model.rhs(t + dt, &x4)?;

        // slope = (k1 + 2*k2 + 2*k3 + k4) / 6
        let slope = k1
            .add(&k2.scale(2.0))
            .add(&k3.scale(2.0).add(&k4))
            .scale(1.0 / 6.0);

        let integrated = x.add(&slope.scale(dt));
        Ok(model.accept(x, integrated, &slope, t + dt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Scalar(f64);

    impl StateVector for Scalar {
        fn add(&self, other: &Self) -> Self {
            Scalar(self.0 + other.0)
        }
        fn scale(&self, k: f64) -> Self {
            Scalar(self.0 * k)
        }
    }

    /// dx/dt = -x
    struct Decay {
        calls: usize,
    }

    impl TransientModel for Decay {
        type State = Scalar;

        fn initial_state(&self) -> Scalar {
            Scalar(1.0)
        }

        fn rhs(&mut self, _t: f64, x: &Scalar) -> SimResult<Scalar> {
            self.calls += 1;
            Ok(Scalar(-x.0))
        }
    }

    #[test]
    fn rk4_tracks_exponential_decay() {
        let mut model = Decay { calls: 0 };
        let mut x = model.initial_state();
        let dt = 0.01;
        let mut t = 0.0;
        for _ in 0..100 {
            x = Rk4.step(&mut model, t, &x, dt).unwrap();
            t += dt;
        }
        assert!((x.0 - (-1.0f64).exp()).abs() < 1e-9);
        assert_eq!(model.calls, 400);
    }

    #[test]
    fn rejects_non_positive_dt() {
        let mut model = Decay { calls: 0 };
        let x = model.initial_state();
        assert!(Rk4.step(&mut model, 0.0, &x, 0.0).is_err());
    }
}
