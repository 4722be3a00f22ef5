//! accel-vehicle: longitudinal subsystem models for a rear-wheel-drive car.
//!
//! Each model is built from its configuration group and is a deterministic
//! function of that configuration plus its per-step inputs. The only model
//! with memory is [`ControlStrategy`], whose ramp state is owned by whoever
//! runs the simulation and must be reset between independent runs.
//!
//! # Example
//!
//! ```
//! use accel_config::VehicleConfig;
//! use accel_vehicle::{PowertrainModel, TireModel};
//!
//! let config = VehicleConfig::formula_student_baseline();
//! let tire = TireModel::from_config(&config.tires, &config.environment).unwrap();
//! let powertrain = PowertrainModel::from_config(&config.powertrain).unwrap();
//!
//! let slip = tire.slip_ratio(12.0, 2.5);
//! let out = powertrain.torque(5000.0, 0.0);
//! assert!(slip <= 1.0);
//! assert!(out.power <= config.powertrain.max_power_accumulator_outlet);
//! ```

pub mod aero;
pub mod common;
pub mod control;
pub mod error;
pub mod mass;
pub mod powertrain;
pub mod suspension;
pub mod tire;

pub use aero::{AeroForces, AerodynamicsModel};
pub use control::{ControlInputs, ControlStrategy, TorqueRequest};
pub use error::{VehicleError, VehicleResult};
pub use mass::{AxleLoads, MassTransferModel};
pub use powertrain::{PowertrainModel, PowertrainOutput};
pub use suspension::SuspensionModel;
pub use tire::{FrictionCurve, LinearFriction, TireForces, TireModel, slip_ratio};
