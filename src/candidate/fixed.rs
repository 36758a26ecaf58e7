//! Fixed-point quantities carried by a candidate record.
//!
//! Each type stores the raw hardware integer and knows its LSB. Construction
//! from physical units rounds to nearest and saturates to the representable
//! range; raw constructors clamp instead of wrapping.

use crate::util::math::{quantize_signed, quantize_unsigned, wrap_delta_phi};
use std::f64::consts::PI;

/// Angle LSB in radians shared by eta and phi (pi / 720, a quarter degree).
pub const ANGLE_LSB_RAD: f64 = PI / 720.0;

/// Transverse momentum: unsigned 14-bit, LSB 0.25 GeV.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pt(u16);

impl Pt {
    /// Number of raw bits.
    pub const BITS: u32 = 14;
    /// Largest raw value.
    pub const MAX_RAW: u16 = (1 << Self::BITS) - 1;
    /// LSB in GeV.
    pub const LSB_GEV: f64 = 0.25;
    /// Zero momentum.
    pub const ZERO: Pt = Pt(0);
    /// Largest representable momentum (4095.75 GeV).
    pub const MAX: Pt = Pt(Self::MAX_RAW);

    /// Creates a momentum from raw units, saturating at [`Pt::MAX`].
    pub fn from_raw(raw: u16) -> Self {
        Self(raw.min(Self::MAX_RAW))
    }

    /// Quantizes a momentum in GeV.
    pub fn from_gev(gev: f32) -> Self {
        Self(quantize_unsigned(f64::from(gev), Self::LSB_GEV, u64::from(Self::MAX_RAW)) as u16)
    }

    /// Returns the raw value.
    pub fn raw(self) -> u16 {
        self.0
    }

    /// Returns the momentum in GeV.
    pub fn to_gev(self) -> f32 {
        (f64::from(self.0) * Self::LSB_GEV) as f32
    }

    /// Adds two momenta, saturating at [`Pt::MAX`].
    pub fn saturating_add(self, other: Pt) -> Pt {
        Self((u32::from(self.0) + u32::from(other.0)).min(u32::from(Self::MAX_RAW)) as u16)
    }

    /// Returns true for zero momentum.
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

/// Pseudorapidity: signed 12-bit, LSB pi/720.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Eta(i16);

impl Eta {
    /// Zero pseudorapidity.
    pub const ZERO: Eta = Eta(0);
    /// Number of raw bits.
    pub const BITS: u32 = 12;
    /// Smallest raw value.
    pub const MIN_RAW: i16 = -(1 << (Self::BITS - 1));
    /// Largest raw value.
    pub const MAX_RAW: i16 = (1 << (Self::BITS - 1)) - 1;

    /// Creates a pseudorapidity from raw units, clamped to the 12-bit range.
    pub fn from_raw(raw: i16) -> Self {
        Self(raw.clamp(Self::MIN_RAW, Self::MAX_RAW))
    }

    /// Quantizes a pseudorapidity value.
    pub fn from_value(eta: f32) -> Self {
        Self(quantize_signed(
            f64::from(eta),
            ANGLE_LSB_RAD,
            i64::from(Self::MIN_RAW),
            i64::from(Self::MAX_RAW),
        ) as i16)
    }

    /// Returns the raw value.
    pub fn raw(self) -> i16 {
        self.0
    }

    /// Returns the pseudorapidity as a float.
    pub fn to_value(self) -> f32 {
        (f64::from(self.0) * ANGLE_LSB_RAD) as f32
    }
}

/// Azimuthal angle: signed 11-bit, LSB pi/720, periodic with a full turn of 1440 units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Phi(i16);

impl Phi {
    /// Zero angle.
    pub const ZERO: Phi = Phi(0);
    /// Number of raw bits.
    pub const BITS: u32 = 11;
    /// Smallest raw value.
    pub const MIN_RAW: i16 = -(1 << (Self::BITS - 1));
    /// Largest raw value.
    pub const MAX_RAW: i16 = (1 << (Self::BITS - 1)) - 1;

    /// Creates an angle from raw units, clamped to the 11-bit range.
    pub fn from_raw(raw: i16) -> Self {
        Self(raw.clamp(Self::MIN_RAW, Self::MAX_RAW))
    }

    /// Quantizes an angle in radians, wrapping it into `(-pi, pi]`.
    pub fn from_rad(rad: f32) -> Self {
        let turns = (f64::from(rad) / (2.0 * PI)).round();
        let reduced = f64::from(rad) - turns * 2.0 * PI;
        let raw = quantize_signed(reduced, ANGLE_LSB_RAD, -2048, 2047) as i32;
        Self(wrap_delta_phi(raw) as i16)
    }

    /// Returns the raw value.
    pub fn raw(self) -> i16 {
        self.0
    }

    /// Returns the angle in radians.
    pub fn to_rad(self) -> f32 {
        (f64::from(self.0) * ANGLE_LSB_RAD) as f32
    }
}

/// Longitudinal vertex offset: signed 10-bit, LSB 0.5 mm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Z0(i16);

impl Z0 {
    /// Zero offset.
    pub const ZERO: Z0 = Z0(0);
    /// Number of raw bits.
    pub const BITS: u32 = 10;
    /// Smallest raw value.
    pub const MIN_RAW: i16 = -(1 << (Self::BITS - 1));
    /// Largest raw value.
    pub const MAX_RAW: i16 = (1 << (Self::BITS - 1)) - 1;
    /// LSB in millimetres.
    pub const LSB_MM: f64 = 0.5;

    /// Creates an offset from raw units, clamped to the 10-bit range.
    pub fn from_raw(raw: i16) -> Self {
        Self(raw.clamp(Self::MIN_RAW, Self::MAX_RAW))
    }

    /// Quantizes an offset in millimetres.
    pub fn from_mm(mm: f32) -> Self {
        Self(quantize_signed(
            f64::from(mm),
            Self::LSB_MM,
            i64::from(Self::MIN_RAW),
            i64::from(Self::MAX_RAW),
        ) as i16)
    }

    /// Returns the raw value.
    pub fn raw(self) -> i16 {
        self.0
    }

    /// Returns the offset in millimetres.
    pub fn to_mm(self) -> f32 {
        (f64::from(self.0) * Self::LSB_MM) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::{Eta, Phi, Pt, Z0};

    #[test]
    fn pt_saturates_instead_of_wrapping() {
        assert_eq!(Pt::from_gev(4095.75), Pt::MAX);
        assert_eq!(Pt::from_gev(1.0e6), Pt::MAX);
        assert_eq!(Pt::from_gev(-2.0), Pt::ZERO);
        assert_eq!(Pt::from_raw(u16::MAX), Pt::MAX);
        assert_eq!(Pt::MAX.saturating_add(Pt::from_gev(1.0)), Pt::MAX);
        assert_eq!(Pt::from_gev(2.0).saturating_add(Pt::from_gev(0.5)).raw(), 10);
    }

    #[test]
    fn pt_round_trips_on_lsb_grid() {
        let pt = Pt::from_gev(12.25);
        assert_eq!(pt.raw(), 49);
        assert_eq!(pt.to_gev(), 12.25);
    }

    #[test]
    fn phi_wraps_periodically() {
        let a = Phi::from_rad(std::f32::consts::PI + 0.1);
        let b = Phi::from_rad(-std::f32::consts::PI + 0.1);
        assert_eq!(a, b);
        assert_eq!(Phi::from_rad(std::f32::consts::PI).raw(), 720);
        assert_eq!(Phi::from_rad(0.0).raw(), 0);
    }

    #[test]
    fn eta_and_z0_clamp_to_register_width() {
        assert_eq!(Eta::from_value(100.0).raw(), Eta::MAX_RAW);
        assert_eq!(Eta::from_value(-100.0).raw(), Eta::MIN_RAW);
        assert_eq!(Z0::from_mm(1000.0).raw(), Z0::MAX_RAW);
        assert_eq!(Z0::from_mm(-3.0).raw(), -6);
        assert_eq!(Z0::from_raw(i16::MIN).raw(), Z0::MIN_RAW);
    }
}
