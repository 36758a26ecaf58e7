//! Annular isolation cut.

use crate::candidate::fixed::Pt;
use crate::candidate::Candidate;
use crate::kinematics::{delta_r2, Dr2};
use crate::util::{W3PiError, W3PiResult};

/// Fractional bits used to compare the isolation ratio in integers.
const RATIO_FRAC_BITS: u32 = 10;

/// Isolation thresholds.
///
/// A neighbour contributes when `veto_dr2 < dr2 < outer_dr2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IsolationConfig {
    /// Outer cone radius, squared.
    pub outer_dr2: Dr2,
    /// Inner veto radius, squared.
    pub veto_dr2: Dr2,
    /// Largest accepted `iso_sum / pt`.
    pub max_ratio: f32,
}

impl Default for IsolationConfig {
    fn default() -> Self {
        Self {
            outer_dr2: Dr2::from_dr(0.4),
            veto_dr2: Dr2::from_dr(0.1),
            max_ratio: 0.6,
        }
    }
}

impl IsolationConfig {
    pub(crate) fn validate(&self) -> W3PiResult<()> {
        if self.veto_dr2 >= self.outer_dr2 {
            return Err(W3PiError::InvalidConfig {
                reason: "isolation veto cone must be smaller than the outer cone",
            });
        }
        if !self.max_ratio.is_finite() || self.max_ratio < 0.0 {
            return Err(W3PiError::InvalidConfig {
                reason: "isolation ratio must be finite and non-negative",
            });
        }
        Ok(())
    }

    fn ratio_q(&self) -> u64 {
        (f64::from(self.max_ratio) * f64::from(1u32 << RATIO_FRAC_BITS)).round() as u64
    }

    /// Sum of neighbour momenta around slot `idx`, over slots flagged in `kept`.
    pub fn iso_sum(&self, candidates: &[Candidate], kept: &[bool], idx: usize) -> Pt {
        let seed = &candidates[idx];
        candidates
            .iter()
            .zip(kept)
            .enumerate()
            .filter(|(j, (_, keep))| *j != idx && **keep)
            .map(|(_, (other, _))| (other, delta_r2(seed, other)))
            .filter(|(_, dr2)| *dr2 > self.veto_dr2 && *dr2 < self.outer_dr2)
            .fold(Pt::ZERO, |sum, (other, _)| sum.saturating_add(other.pt))
    }

    /// Drops from `kept` every candidate whose isolation ratio is too large.
    ///
    /// Sums only include neighbours kept on entry, so the outcome does not
    /// depend on slot order.
    pub(crate) fn apply(&self, candidates: &[Candidate], kept: &[bool]) -> Vec<bool> {
        let ratio_q = self.ratio_q();
        (0..candidates.len())
            .map(|idx| {
                if !kept[idx] {
                    return false;
                }
                let iso = u64::from(self.iso_sum(candidates, kept, idx).raw());
                let pt = u64::from(candidates[idx].pt.raw());
                (iso << RATIO_FRAC_BITS) <= ratio_q * pt
            })
            .collect()
    }
}
