//! Coupled longitudinal vehicle model.
//!
//! One right-hand-side evaluation runs the subsystem chain in dependency
//! order: aero, normal loads at an acceleration estimate, slip, tire forces,
//! torque request, powertrain limits, net force, acceleration, and finally
//! normal loads at the resulting acceleration.
//!
//! The derivative state carries true derivatives in the integrated fields
//! (`position`, `velocity`, both wheel speeds, `time`) and the evaluated
//! values in every other field.

use crate::error::{SimError, SimResult};
use crate::model::TransientModel;
use crate::state::SimulationState;
use accel_config::VehicleConfig;
use accel_core::constants::WHEEL_COUNT;
use accel_vehicle::{
    AeroForces, AerodynamicsModel, AxleLoads, ControlInputs, ControlStrategy, MassTransferModel,
    PowertrainModel, SuspensionModel, TireModel, TorqueRequest,
};

/// Acceleration assumed for load transfer when the state carries none yet.
const INITIAL_ACCEL_GUESS: f64 = 1.0;

#[derive(Clone, Debug)]
pub struct LongitudinalModel {
    pub tire: TireModel,
    pub aero: AerodynamicsModel,
    pub mass: MassTransferModel,
    pub suspension: SuspensionModel,
    pub powertrain: PowertrainModel,
    control: ControlStrategy,
    /// Headwind added to ground speed for aero (m/s)
    wind_speed: f64,
    /// Translational mass plus the equivalent mass of four spinning wheels (kg)
    effective_mass: f64,
    dt: f64,
    pending_request: Option<TorqueRequest>,
}

impl LongitudinalModel {
    /// Build every subsystem from a configuration that has already been validated.
    pub fn from_config(config: &VehicleConfig) -> SimResult<Self> {
        let tire = TireModel::from_config(&config.tires, &config.environment)?;
        let aero = AerodynamicsModel::from_config(&config.aerodynamics)?;
        let mass = MassTransferModel::from_config(&config.mass, &config.environment)?;
        let suspension = SuspensionModel::from_config(&config.suspension)?;
        let powertrain = PowertrainModel::from_config(&config.powertrain)?;
        let control = ControlStrategy::new(&config.control, tire.radius, tire.mu_max())?;

        let dt = config.simulation.dt;
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }

        let rotational_mass = WHEEL_COUNT * powertrain.wheel_inertia / (tire.radius * tire.radius);
        Ok(Self {
            effective_mass: config.mass.total_mass + rotational_mass,
            wind_speed: config.environment.wind_speed,
            tire,
            aero,
            mass,
            suspension,
            powertrain,
            control,
            dt,
            pending_request: None,
        })
    }

    pub fn effective_mass(&self) -> f64 {
        self.effective_mass
    }

    pub fn control(&self) -> &ControlStrategy {
        &self.control
    }

    /// Clear ramp memory before an independent run.
    pub fn reset(&mut self) {
        self.control.reset();
        self.pending_request = None;
    }

    /// Forget the request captured by a previous step.
    pub fn begin_step(&mut self) {
        self.pending_request = None;
    }

    /// Commit the request from the first evaluation of the step to the ramp.
    pub fn end_step(&mut self) {
        if let Some(request) = self.pending_request.take() {
            self.control.commit(&request);
        }
    }

    fn axle_loads(&self, acceleration: f64, aero: &AeroForces) -> AxleLoads {
        let mut loads =
            self.mass
                .normal_forces(acceleration, aero.downforce_front, aero.downforce_rear);
        loads.rear += self.suspension.anti_squat_force(acceleration, loads.rear);
        loads
    }
}

impl TransientModel for LongitudinalModel {
    type State = SimulationState;

    fn initial_state(&self) -> SimulationState {
        SimulationState::default()
    }

    fn rhs(&mut self, t: f64, x: &SimulationState) -> SimResult<SimulationState> {
        let v = x.velocity;
        let radius = self.tire.radius;

        let aero = self.aero.forces(v + self.wind_speed);
        let accel_guess = if x.acceleration != 0.0 {
            x.acceleration
        } else {
            INITIAL_ACCEL_GUESS
        };
        let loads = self.axle_loads(accel_guess, &aero);

        // Rear-wheel drive; the front axle rolls freely.
        let slip_front = self.tire.slip_ratio(x.wheel_speed_front, v);
        let slip_rear = self.tire.slip_ratio(x.wheel_speed_rear, v);

        let request = self.control.requested_torque(&ControlInputs {
            time: t,
            velocity: v,
            wheel_speed_rear: x.wheel_speed_rear,
            normal_force_rear: loads.rear,
            dt: self.dt,
        });
        if self.pending_request.is_none() {
            self.pending_request = Some(request);
        }

        let motor_speed = self.powertrain.motor_speed(x.wheel_speed_rear);
        let output = self.powertrain.torque(request.torque, motor_speed);

        let front = self.tire.longitudinal_force(loads.front, slip_front, v);
        let rear = self.tire.longitudinal_force(loads.rear, slip_rear, v);

        let drive_force = output.wheel_torque / radius;
        let rolling_resistance = front.rolling_resistance + rear.rolling_resistance;
        let net_force = drive_force + aero.drag + rolling_resistance + self.mass.grade_force();
        let acceleration = net_force / self.effective_mass;

        let loads = self.axle_loads(acceleration, &aero);

        tracing::trace!(t, v, acceleration, torque = request.torque, power = output.power, "rhs");

        Ok(SimulationState {
            time: 1.0,
            position: v,
            velocity: acceleration,
            acceleration,
            wheel_speed_front: acceleration / radius,
            wheel_speed_rear: acceleration / radius,
            motor_speed,
            motor_current: output.motor_current,
            motor_torque: output.motor_torque,
            drive_force,
            drag_force: aero.drag,
            rolling_resistance,
            normal_force_front: loads.front,
            normal_force_rear: loads.rear,
            tire_force_front: front.traction,
            tire_force_rear: rear.traction,
            power_consumed: output.power,
        })
    }

    /// Only position, velocity and wheel speeds are integrated; the rest is
    /// the RK4-weighted average of the stage evaluations.
    fn accept(
        &self,
        _previous: &SimulationState,
        integrated: SimulationState,
        slope: &SimulationState,
        t_next: f64,
    ) -> SimulationState {
        SimulationState {
            time: t_next,
            position: integrated.position,
            velocity: integrated.velocity,
            wheel_speed_front: integrated.wheel_speed_front,
            wheel_speed_rear: integrated.wheel_speed_rear,
            ..*slope
        }
    }
}
