// hl-core/src/units.rs
//
// The engine itself works in plain psi / gpm / ft numbers. These helpers keep
// the few places that touch physical derivations honest about dimensions.

use uom::si::f64::{
    Acceleration as UomAcceleration, Length as UomLength, MassDensity as UomMassDensity,
    Pressure as UomPressure, VolumeRate as UomVolumeRate,
};

pub type Accel = UomAcceleration;
pub type Density = UomMassDensity;
pub type Length = UomLength;
pub type Pressure = UomPressure;
pub type Flow = UomVolumeRate;

#[inline]
pub fn psi(v: f64) -> Pressure {
    use uom::si::pressure::psi;
    Pressure::new::<psi>(v)
}

#[inline]
pub fn ft(v: f64) -> Length {
    use uom::si::length::foot;
    Length::new::<foot>(v)
}

#[inline]
pub fn gpm(v: f64) -> Flow {
    use uom::si::volume_rate::gallon_per_minute;
    Flow::new::<gallon_per_minute>(v)
}

#[inline]
pub fn as_psi(p: Pressure) -> f64 {
    p.get::<uom::si::pressure::psi>()
}

#[inline]
pub fn as_gpm(q: Flow) -> f64 {
    q.get::<uom::si::volume_rate::gallon_per_minute>()
}

pub mod constants {
    use super::*;

    pub const G0_MPS2: f64 = 9.806_65;

    /// Fresh water at fireground temperatures.
    pub const WATER_LB_PER_FT3: f64 = 62.4;

    #[inline]
    pub fn g0() -> Accel {
        use uom::si::acceleration::meter_per_second_squared;
        Accel::new::<meter_per_second_squared>(G0_MPS2)
    }

    #[inline]
    pub fn water_density() -> Density {
        use uom::si::mass_density::pound_per_cubic_foot;
        Density::new::<pound_per_cubic_foot>(WATER_LB_PER_FT3)
    }
}

/// Static head of a water column of the given height.
pub fn water_column(height: Length) -> Pressure {
    constants::water_density() * constants::g0() * height
}

/// Hydrostatic gradient in psi per foot of rise (about 0.433).
pub fn water_column_psi_per_ft() -> f64 {
    as_psi(water_column(ft(1.0)))
}
