//! accel-core: stable foundation for the acceleration simulator.
//!
//! Contains:
//! - units (uom SI types + constructors + display conversions)
//! - numeric (Real + tolerances + float helpers)
//! - constants (physical and regulatory)
//! - error (shared error types)

pub mod constants;
pub mod error;
pub mod numeric;
pub mod units;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use units::*;
