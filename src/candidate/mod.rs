//! Candidate records, ranked slots and top-K selection.
//!
//! A [`Candidate`] is the decoded hardware record of one reconstructed
//! particle. The pipeline never edits candidates; masked slots are replaced by
//! [`Candidate::DUMMY`] copies.

pub mod fixed;
pub mod topk;

pub use topk::TopK;

use fixed::{Eta, Phi, Pt, Z0};
use std::cmp::Ordering;

/// Particle-type code carried in the 3-bit id field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ParticleId {
    #[default]
    NeutralHadron = 0,
    Photon = 1,
    HadronMinus = 2,
    HadronPlus = 3,
    ElectronMinus = 4,
    ElectronPlus = 5,
    MuonMinus = 6,
    MuonPlus = 7,
}

impl ParticleId {
    /// All codes in id order.
    pub const ALL: [ParticleId; 8] = [
        ParticleId::NeutralHadron,
        ParticleId::Photon,
        ParticleId::HadronMinus,
        ParticleId::HadronPlus,
        ParticleId::ElectronMinus,
        ParticleId::ElectronPlus,
        ParticleId::MuonMinus,
        ParticleId::MuonPlus,
    ];

    /// Decodes the low three bits of `code`.
    pub fn from_bits(code: u8) -> Self {
        Self::ALL[usize::from(code & 0b111)]
    }

    /// Returns the 3-bit code.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Electric charge: 0 for neutrals, then alternating -1/+1.
    pub fn charge(self) -> i8 {
        match self.code() {
            0 | 1 => 0,
            code if code % 2 == 0 => -1,
            _ => 1,
        }
    }
}

/// One reconstructed particle candidate in hardware units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Candidate {
    /// Transverse momentum.
    pub pt: Pt,
    /// Pseudorapidity.
    pub eta: Eta,
    /// Azimuthal angle.
    pub phi: Phi,
    /// Particle type.
    pub pid: ParticleId,
    /// Longitudinal vertex offset.
    pub z0: Z0,
}

impl Candidate {
    /// The all-zero candidate used for masked and empty slots.
    pub const DUMMY: Candidate = Candidate {
        pt: Pt::ZERO,
        eta: Eta::ZERO,
        phi: Phi::ZERO,
        pid: ParticleId::NeutralHadron,
        z0: Z0::ZERO,
    };

    /// Creates a candidate from fixed-point fields.
    pub fn new(pt: Pt, eta: Eta, phi: Phi, pid: ParticleId, z0: Z0) -> Self {
        Self {
            pt,
            eta,
            phi,
            pid,
            z0,
        }
    }

    /// Quantizes a candidate given in physical units (GeV, rad, mm).
    pub fn from_physical(pt_gev: f32, eta: f32, phi_rad: f32, pid: ParticleId, z0_mm: f32) -> Self {
        Self {
            pt: Pt::from_gev(pt_gev),
            eta: Eta::from_value(eta),
            phi: Phi::from_rad(phi_rad),
            pid,
            z0: Z0::from_mm(z0_mm),
        }
    }

    /// Charge derived from the particle id.
    pub fn charge(&self) -> i8 {
        self.pid.charge()
    }

    /// Returns true for the all-zero candidate.
    pub fn is_dummy(&self) -> bool {
        *self == Self::DUMMY
    }
}

/// One entry of the ranked sequence.
///
/// `slot` is the index in the original candidate store; slots past the store
/// capacity only appear as network padding and never leave the network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RankedSlot {
    /// Original slot index.
    pub slot: usize,
    /// The candidate, or [`Candidate::DUMMY`] for masked slots.
    pub candidate: Candidate,
    /// False for masked, empty or padding slots.
    pub real: bool,
}

impl RankedSlot {
    /// Wraps a surviving candidate.
    pub fn real(slot: usize, candidate: Candidate) -> Self {
        Self {
            slot,
            candidate,
            real: true,
        }
    }

    /// Creates a dummy entry for a masked or empty slot.
    pub fn dummy(slot: usize) -> Self {
        Self {
            slot,
            candidate: Candidate::DUMMY,
            real: false,
        }
    }

    /// Ranking order: real before dummy, momentum descending, slot ascending.
    ///
    /// `Ordering::Less` means `self` is ranked ahead of `other`.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .real
            .cmp(&self.real)
            .then_with(|| other.candidate.pt.cmp(&self.candidate.pt))
            .then_with(|| self.slot.cmp(&other.slot))
    }
}

impl PartialOrd for RankedSlot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RankedSlot {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank_cmp(other)
    }
}

#[cfg(test)]
mod tests {
    use super::fixed::Pt;
    use super::{Candidate, ParticleId, RankedSlot};
    use std::cmp::Ordering;

    #[test]
    fn charge_follows_id_code() {
        let charges: Vec<i8> = ParticleId::ALL.iter().map(|id| id.charge()).collect();
        assert_eq!(charges, vec![0, 0, -1, 1, -1, 1, -1, 1]);
        assert_eq!(ParticleId::from_bits(0b1011), ParticleId::HadronPlus);
    }

    #[test]
    fn rank_order_is_total_and_prefers_real_high_pt() {
        let hi = Candidate::from_physical(10.0, 0.0, 0.0, ParticleId::HadronPlus, 0.0);
        let lo = Candidate::from_physical(5.0, 0.0, 0.0, ParticleId::HadronPlus, 0.0);
        let zero_pt = Candidate {
            pt: Pt::ZERO,
            ..lo
        };

        assert_eq!(RankedSlot::real(7, hi).cmp(&RankedSlot::real(1, lo)), Ordering::Less);
        assert_eq!(RankedSlot::real(3, hi).cmp(&RankedSlot::real(4, hi)), Ordering::Less);
        assert_eq!(
            RankedSlot::real(9, zero_pt).cmp(&RankedSlot::dummy(0)),
            Ordering::Less
        );
        assert_eq!(RankedSlot::dummy(2).cmp(&RankedSlot::dummy(5)), Ordering::Less);
        assert!(RankedSlot::dummy(0).candidate.is_dummy());
    }
}
