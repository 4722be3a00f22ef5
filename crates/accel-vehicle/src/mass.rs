//! Static axle loads and longitudinal load transfer.

use crate::common::{check_finite, check_non_negative, check_positive};
use crate::error::{VehicleError, VehicleResult};
use accel_config::{EnvironmentProperties, MassProperties};
use accel_core::constants::GRAVITY_MPS2;

/// Normal load per axle (N).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AxleLoads {
    pub front: f64,
    pub rear: f64,
}

impl AxleLoads {
    pub fn total(&self) -> f64 {
        self.front + self.rear
    }
}

#[derive(Clone, Debug)]
pub struct MassTransferModel {
    pub total_mass: f64,
    /// CG distance behind the front axle (m)
    pub cg_x: f64,
    /// CG height (m)
    pub cg_z: f64,
    pub wheelbase: f64,
    /// Track grade (rad), positive uphill
    pub grade: f64,
}

impl MassTransferModel {
    pub fn from_config(
        mass: &MassProperties,
        environment: &EnvironmentProperties,
    ) -> VehicleResult<Self> {
        check_positive(mass.total_mass, "total mass must be positive")?;
        check_positive(mass.wheelbase, "wheelbase must be positive")?;
        check_non_negative(mass.cg_z, "CG height cannot be negative")?;
        check_finite(mass.cg_x, "CG position")?;
        if mass.cg_x < 0.0 || mass.cg_x > mass.wheelbase {
            return Err(VehicleError::InvalidArg {
                what: "CG position must lie within the wheelbase",
            });
        }
        check_finite(environment.track_grade, "track grade")?;
        Ok(Self {
            total_mass: mass.total_mass,
            cg_x: mass.cg_x,
            cg_z: mass.cg_z,
            wheelbase: mass.wheelbase,
            grade: environment.track_grade,
        })
    }

    /// Weight perpendicular to the road (N).
    pub fn weight(&self) -> f64 {
        self.total_mass * GRAVITY_MPS2 * self.grade.cos()
    }

    /// Gravity component along the road, negative when climbing (N).
    pub fn grade_force(&self) -> f64 {
        -self.total_mass * GRAVITY_MPS2 * self.grade.sin()
    }

    /// Split the static weight between axles by lever arm.
    pub fn static_load_distribution(&self) -> AxleLoads {
        let weight = self.weight();
        AxleLoads {
            front: weight * (self.wheelbase - self.cg_x) / self.wheelbase,
            rear: weight * self.cg_x / self.wheelbase,
        }
    }

    /// Load moved from front to rear under longitudinal acceleration (N).
    pub fn load_transfer(&self, acceleration: f64) -> f64 {
        self.total_mass * acceleration * self.cg_z / self.wheelbase
    }

    /// Static load plus transfer plus downforce, each axle floored at zero.
    pub fn normal_forces(
        &self,
        acceleration: f64,
        downforce_front: f64,
        downforce_rear: f64,
    ) -> AxleLoads {
        let statics = self.static_load_distribution();
        let transfer = self.load_transfer(acceleration);
        AxleLoads {
            front: (statics.front - transfer + downforce_front).max(0.0),
            rear: (statics.rear + transfer + downforce_rear).max(0.0),
        }
    }

    /// Fraction of static weight on the rear axle.
    pub fn rear_weight_fraction(&self) -> f64 {
        self.cg_x / self.wheelbase
    }
}
