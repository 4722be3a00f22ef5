//! Suspension geometry and anti-squat.

use crate::common::{check_finite, check_non_negative};
use crate::error::VehicleResult;
use accel_config::SuspensionProperties;

/// Fraction of rear load that a full anti-squat ratio adds back to the axle.
const ANTI_SQUAT_GAIN: f64 = 0.1;

#[derive(Clone, Debug)]
pub struct SuspensionModel {
    pub anti_squat_ratio: f64,
    pub ride_height_front: f64,
    pub ride_height_rear: f64,
    pub wheel_rate_front: f64,
    pub wheel_rate_rear: f64,
}

impl SuspensionModel {
    pub fn from_config(props: &SuspensionProperties) -> VehicleResult<Self> {
        check_finite(props.anti_squat_ratio, "anti-squat ratio")?;
        check_non_negative(props.ride_height_front, "front ride height cannot be negative")?;
        check_non_negative(props.ride_height_rear, "rear ride height cannot be negative")?;
        check_non_negative(props.wheel_rate_front, "front wheel rate cannot be negative")?;
        check_non_negative(props.wheel_rate_rear, "rear wheel rate cannot be negative")?;
        Ok(Self {
            anti_squat_ratio: props.anti_squat_ratio,
            ride_height_front: props.ride_height_front,
            ride_height_rear: props.ride_height_rear,
            wheel_rate_front: props.wheel_rate_front,
            wheel_rate_rear: props.wheel_rate_rear,
        })
    }

    /// Extra rear normal load from anti-squat geometry (N).
    ///
    /// Lumped model with no instant-centre geometry: only active for a positive
    /// ratio under forward acceleration.
    pub fn anti_squat_force(&self, acceleration: f64, normal_force_rear: f64) -> f64 {
        if self.anti_squat_ratio > 0.0 && acceleration > 0.0 {
            normal_force_rear * self.anti_squat_ratio * ANTI_SQUAT_GAIN
        } else {
            0.0
        }
    }

    /// (front, rear) static ride heights (m).
    pub fn ride_heights(&self) -> (f64, f64) {
        (self.ride_height_front, self.ride_height_rear)
    }

    /// (front, rear) wheel rates (N/m).
    pub fn wheel_rates(&self) -> (f64, f64) {
        (self.wheel_rate_front, self.wheel_rate_rear)
    }

    /// Static deflection of each axle under the given loads, split over two wheels (m).
    pub fn static_deflection(&self, load_front: f64, load_rear: f64) -> (f64, f64) {
        let deflect = |load: f64, rate: f64| if rate > 0.0 { 0.5 * load / rate } else { 0.0 };
        (
            deflect(load_front, self.wheel_rate_front),
            deflect(load_rear, self.wheel_rate_rear),
        )
    }
}
