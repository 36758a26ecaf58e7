//! Fixed-point angular distance and invariant-mass arithmetic.
//!
//! These functions are the single implementation of the geometry used by the
//! isolation filter, the triplet cuts and the feature builder.

pub mod trig;

use crate::candidate::fixed::ANGLE_LSB_RAD;
use crate::candidate::Candidate;
use crate::util::math::{isqrt, quantize_unsigned, shr_round, wrap_delta_phi};
use trig::{cos_q, cosh_q, TRIG_FRAC_BITS};

/// Squared angular distance in raw angle units, held in a 24-bit register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dr2(u32);

impl Dr2 {
    /// Number of raw bits.
    pub const BITS: u32 = 24;
    /// Largest raw value.
    pub const MAX_RAW: u32 = (1 << Self::BITS) - 1;
    /// Saturated distance.
    pub const MAX: Dr2 = Dr2(Self::MAX_RAW);

    /// Creates a distance from raw units, saturating at [`Dr2::MAX`].
    pub fn from_raw(raw: u32) -> Self {
        Self(raw.min(Self::MAX_RAW))
    }

    /// Converts an angular radius `dr` (radians) to a squared raw distance.
    pub fn from_dr(dr: f32) -> Self {
        let units = f64::from(dr) / ANGLE_LSB_RAD;
        Self(quantize_unsigned(units * units, 1.0, u64::from(Self::MAX_RAW)) as u32)
    }

    /// Returns the raw value.
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Invariant mass squared: unsigned 20-bit, LSB 1/8 GeV^2, saturating.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MassSq(u32);

impl MassSq {
    /// Number of raw bits.
    pub const BITS: u32 = 20;
    /// Fractional bits.
    pub const FRAC_BITS: u32 = 3;
    /// Largest raw value.
    pub const MAX_RAW: u32 = (1 << Self::BITS) - 1;
    /// LSB in GeV^2.
    pub const LSB_GEV2: f64 = 1.0 / (1 << Self::FRAC_BITS) as f64;
    /// Zero mass.
    pub const ZERO: MassSq = MassSq(0);
    /// Saturated mass (131071.875 GeV^2).
    pub const MAX: MassSq = MassSq(Self::MAX_RAW);

    /// Creates a mass from raw units, saturating at [`MassSq::MAX`].
    pub fn from_raw(raw: u32) -> Self {
        Self(raw.min(Self::MAX_RAW))
    }

    /// Quantizes a squared mass given in GeV^2.
    pub fn from_gev2(gev2: f32) -> Self {
        Self(quantize_unsigned(f64::from(gev2), Self::LSB_GEV2, u64::from(Self::MAX_RAW)) as u32)
    }

    /// Quantizes the square of a mass given in GeV.
    pub fn from_mass_gev(mass_gev: f32) -> Self {
        let m = f64::from(mass_gev.max(0.0));
        Self(quantize_unsigned(m * m, Self::LSB_GEV2, u64::from(Self::MAX_RAW)) as u32)
    }

    /// Returns the raw value.
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Returns the value in GeV^2.
    pub fn to_gev2(self) -> f32 {
        (f64::from(self.0) * Self::LSB_GEV2) as f32
    }

    /// Returns the invariant mass in GeV, floored to [`MASS_LSB_GEV`].
    ///
    /// The square root is taken on the raw integer, so every code path sees
    /// the same value for the same register contents.
    pub fn to_mass_gev(self) -> f32 {
        let shift = 2 * MASS_FRAC_BITS - Self::FRAC_BITS;
        let root = isqrt(u64::from(self.0) << shift);
        (root as f64 * MASS_LSB_GEV) as f32
    }

    /// Adds two masses, saturating at [`MassSq::MAX`].
    pub fn saturating_add(self, other: MassSq) -> MassSq {
        Self(self.0.saturating_add(other.0).min(Self::MAX_RAW))
    }

    /// Returns true when the value sits at the saturation ceiling.
    pub fn is_saturated(self) -> bool {
        self.0 == Self::MAX_RAW
    }
}

/// Squared angular distance `deta^2 + dphi^2`, with `dphi` wrapped into `(-pi, pi]`.
pub fn delta_r2(a: &Candidate, b: &Candidate) -> Dr2 {
    let dphi = wrap_delta_phi(i32::from(a.phi.raw()) - i32::from(b.phi.raw()));
    let deta = i32::from(a.eta.raw()) - i32::from(b.eta.raw());
    let sum = (dphi * dphi) as u32 + (deta * deta) as u32;
    Dr2::from_raw(sum)
}

/// Smallest pairwise distance among three candidates.
pub fn min_delta_r2(a: &Candidate, b: &Candidate, c: &Candidate) -> Dr2 {
    delta_r2(a, b).min(delta_r2(a, c)).min(delta_r2(b, c))
}

/// Pair invariant mass squared for massless particles:
/// `m^2 = 2 pt1 pt2 (cosh(deta) - cos(dphi))`.
///
/// The product is exact in 64 bits; only the final narrowing rounds (half up)
/// and saturates.
pub fn pair_mass_sq(a: &Candidate, b: &Candidate) -> MassSq {
    let dphi = i32::from(a.phi.raw()) - i32::from(b.phi.raw());
    let deta = i32::from(a.eta.raw()) - i32::from(b.eta.raw());
    let weight = (i64::from(cosh_q(deta)) - i64::from(cos_q(dphi))).max(0) as u64;

    let pt_product = u64::from(a.pt.raw()) * u64::from(b.pt.raw());
    let exact = 2 * pt_product * weight;

    // pt1 * pt2 carries two pt fractions, the weight TRIG_FRAC_BITS more.
    let frac_bits = 2 * PT_FRAC_BITS + TRIG_FRAC_BITS;
    let raw = shr_round(exact, frac_bits - MassSq::FRAC_BITS);
    MassSq::from_raw(raw.min(u64::from(MassSq::MAX_RAW)) as u32)
}

/// Three-body invariant mass squared of massless particles (sum of pair masses).
pub fn triplet_mass_sq(a: &Candidate, b: &Candidate, c: &Candidate) -> MassSq {
    pair_mass_sq(a, b)
        .saturating_add(pair_mass_sq(a, c))
        .saturating_add(pair_mass_sq(b, c))
}

/// Fractional bits of an invariant mass read back from [`MassSq`].
pub const MASS_FRAC_BITS: u32 = 6;

/// Resolution of [`MassSq::to_mass_gev`] in GeV.
pub const MASS_LSB_GEV: f64 = 1.0 / (1 << MASS_FRAC_BITS) as f64;

/// Fractional bits of [`crate::candidate::fixed::Pt`] (LSB 0.25 GeV).
const PT_FRAC_BITS: u32 = 2;
