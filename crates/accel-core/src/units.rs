// accel-core/src/units.rs

use uom::si::f64::{
    Acceleration as UomAcceleration, Energy as UomEnergy, Power as UomPower,
    Velocity as UomVelocity,
};

// Public canonical unit types (SI, f64)
pub type Accel = UomAcceleration;
pub type Energy = UomEnergy;
pub type Power = UomPower;
pub type Velocity = UomVelocity;

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn mps2(v: f64) -> Accel {
    use uom::si::acceleration::meter_per_second_squared;
    Accel::new::<meter_per_second_squared>(v)
}

#[inline]
pub fn watt(v: f64) -> Power {
    use uom::si::power::watt;
    Power::new::<watt>(v)
}

#[inline]
pub fn joule(v: f64) -> Energy {
    use uom::si::energy::joule;
    Energy::new::<joule>(v)
}

/// Display conversions used by reports and the CLI.
pub mod display {
    use super::*;

    #[inline]
    pub fn kmh(v: Velocity) -> f64 {
        use uom::si::velocity::kilometer_per_hour;
        v.get::<kilometer_per_hour>()
    }

    #[inline]
    pub fn kw(p: Power) -> f64 {
        use uom::si::power::kilowatt;
        p.get::<kilowatt>()
    }

    #[inline]
    pub fn kwh(e: Energy) -> f64 {
        use uom::si::energy::kilowatt_hour;
        e.get::<kilowatt_hour>()
    }

    #[inline]
    pub fn g_units(a: Accel) -> f64 {
        a.value / crate::constants::GRAVITY_MPS2
    }
}
