//! Fixed feature vector handed to the scorer.

use crate::candidate::Candidate;
use crate::kinematics::{min_delta_r2, pair_mass_sq};
use std::ops::Index;

/// Number of features per triplet.
pub const N_FEATURES: usize = 11;

/// Feature names in model order.
pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    "pi2_pt",
    "pi1_pt",
    "m01",
    "charge_sum",
    "dz0_02",
    "pi0_pt",
    "pt_sum",
    "m02",
    "z0_spread",
    "min_dr2",
    "pi2_eta",
];

/// Features of one triplet, in the order the model was trained with.
///
/// Momenta and pair masses are in GeV; z0, eta and angular distances stay
/// in raw hardware units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FeatureVector([f32; N_FEATURES]);

impl FeatureVector {
    /// Wraps precomputed values.
    pub fn new(values: [f32; N_FEATURES]) -> Self {
        Self(values)
    }

    /// Computes the features of members `[pi0, pi1, pi2]`.
    pub fn from_members(members: &[Candidate; 3]) -> Self {
        let [p0, p1, p2] = members;
        let charge_sum = i32::from(p0.charge()) + i32::from(p1.charge()) + i32::from(p2.charge());
        let z0 = [p0.z0.raw(), p1.z0.raw(), p2.z0.raw()];
        let z0_max = z0.iter().copied().max().unwrap_or(0);
        let z0_min = z0.iter().copied().min().unwrap_or(0);
        let pt_sum = p0.pt.saturating_add(p1.pt).saturating_add(p2.pt);

        Self([
            p2.pt.to_gev(),
            p1.pt.to_gev(),
            pair_mass_sq(p0, p1).to_mass_gev(),
            charge_sum as f32,
            f32::from(p0.z0.raw() - p2.z0.raw()),
            p0.pt.to_gev(),
            pt_sum.to_gev(),
            pair_mass_sq(p0, p2).to_mass_gev(),
            f32::from(z0_max - z0_min),
            min_delta_r2(p0, p1, p2).raw() as f32,
            f32::from(p2.eta.raw()),
        ])
    }

    /// Returns the values in model order.
    pub fn values(&self) -> &[f32; N_FEATURES] {
        &self.0
    }

    /// Returns feature `idx`, or `None` past the end.
    pub fn get(&self, idx: usize) -> Option<f32> {
        self.0.get(idx).copied()
    }
}

impl Index<usize> for FeatureVector {
    type Output = f32;

    fn index(&self, idx: usize) -> &f32 {
        &self.0[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::{FeatureVector, FEATURE_NAMES, N_FEATURES};
    use crate::candidate::fixed::{Eta, Phi, Pt, Z0};
    use crate::candidate::{Candidate, ParticleId};

    fn cand(pt: f32, eta: i16, phi: i16, pid: ParticleId, z0: i16) -> Candidate {
        Candidate::new(
            Pt::from_gev(pt),
            Eta::from_raw(eta),
            Phi::from_raw(phi),
            pid,
            Z0::from_raw(z0),
        )
    }

    #[test]
    fn features_follow_model_order() {
        let members = [
            cand(10.0, 0, 720, ParticleId::HadronPlus, 4),
            cand(10.0, 0, 0, ParticleId::HadronMinus, -3),
            cand(5.5, -40, 30, ParticleId::HadronPlus, 9),
        ];
        let f = FeatureVector::from_members(&members);
        assert_eq!(f[0], 5.5);
        assert_eq!(f[1], 10.0);
        // back-to-back 10 GeV pivots: m^2 = 400 GeV^2, m = 20 GeV
        assert_eq!(f[2], 20.0);
        assert_eq!(f[3], 1.0);
        assert_eq!(f[4], -5.0);
        assert_eq!(f[5], 10.0);
        assert_eq!(f[6], 25.5);
        assert_eq!(f[8], 12.0);
        // closest pair is (1, 2): 40^2 + 30^2
        assert_eq!(f[9], 2500.0);
        assert_eq!(f[10], -40.0);
        assert!(f[7] > 0.0 && f[7] < 20.0);
        assert_eq!(f.get(N_FEATURES), None);
        assert_eq!(FEATURE_NAMES.len(), f.values().len());
    }

    #[test]
    fn pt_sum_saturates() {
        let hot = cand(4000.0, 0, 0, ParticleId::HadronPlus, 0);
        let f = FeatureVector::from_members(&[hot, hot, hot]);
        assert_eq!(f[6], Pt::MAX.to_gev());
    }
}
