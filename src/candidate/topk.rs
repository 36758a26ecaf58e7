//! Top-K selection over the ranked sequence.

use crate::candidate::RankedSlot;

/// The `k` highest-ranked slots of an event.
///
/// Positions past the surviving candidates hold dummy entries; because the
/// ranked order puts every real candidate ahead of every dummy, the real
/// entries always form a prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopK {
    slots: Vec<RankedSlot>,
    real: usize,
}

impl TopK {
    /// Copies the first `k` entries of a ranked sequence.
    ///
    /// A ranked sequence shorter than `k` is padded with dummies whose slot
    /// indices continue past its end.
    pub fn select(ranked: &[RankedSlot], k: usize) -> Self {
        let mut slots: Vec<RankedSlot> = ranked.iter().take(k).copied().collect();
        while slots.len() < k {
            slots.push(RankedSlot::dummy(slots.len()));
        }
        let real = slots.iter().take_while(|slot| slot.real).count();
        debug_assert!(slots[real..].iter().all(|slot| !slot.real));
        Self { slots, real }
    }

    /// Returns the selected slots in rank order.
    pub fn slots(&self) -> &[RankedSlot] {
        &self.slots
    }

    /// Returns the entry at top-K position `pos`.
    pub fn get(&self, pos: usize) -> Option<&RankedSlot> {
        self.slots.get(pos)
    }

    /// Number of positions (K).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true when K is zero.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of real (non-dummy) candidates among the positions.
    pub fn real_count(&self) -> usize {
        self.real
    }
}

#[cfg(test)]
mod tests {
    use super::TopK;
    use crate::candidate::{Candidate, ParticleId, RankedSlot};

    fn real(slot: usize, pt: f32) -> RankedSlot {
        RankedSlot::real(
            slot,
            Candidate::from_physical(pt, 0.0, 0.0, ParticleId::HadronMinus, 0.0),
        )
    }

    #[test]
    fn select_truncates_and_counts_real_prefix() {
        let ranked = vec![
            real(4, 30.0),
            real(1, 20.0),
            real(0, 10.0),
            RankedSlot::dummy(2),
            RankedSlot::dummy(3),
        ];
        let top = TopK::select(&ranked, 4);
        assert_eq!(top.len(), 4);
        assert_eq!(top.real_count(), 3);
        assert_eq!(top.get(0).map(|s| s.slot), Some(4));
        assert!(!top.get(3).unwrap().real);
    }

    #[test]
    fn select_pads_short_sequences_with_dummies() {
        let ranked = vec![real(0, 5.0)];
        let top = TopK::select(&ranked, 3);
        assert_eq!(top.len(), 3);
        assert_eq!(top.real_count(), 1);
        assert_eq!(top.slots()[2].slot, 2);
        assert!(top.slots()[1].candidate.is_dummy());
    }
}
