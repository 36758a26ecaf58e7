//! Partitioned bitonic ranking network.
//!
//! The candidate store is split into `P` partitions of `ceil(N / P)` slots.
//! Each partition is sorted with a bitonic network, then adjacent runs are
//! merged pairwise until one run remains. The result is the ranked sequence:
//! real candidates by descending momentum, ties and dummies by slot index.
//! It does not depend on `P`, the hybrid switch or the execution mode.

pub mod bitonic;
mod hybrid;

#[cfg(feature = "rayon")]
pub mod rayon;

use crate::candidate::{Candidate, RankedSlot};
use crate::filter::Mask;
use crate::trace::{stage, trace_event, trace_span};
use crate::util::{W3PiError, W3PiResult};
use bitonic::{bitonic_sort, merge_runs};
use std::ops::AddAssign;

/// Direction of a sort or merge under the rank order.
///
/// `Ascending` puts the best-ranked element first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    /// Returns the opposite direction.
    pub fn reverse(self) -> Self {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }
}

/// Work counters of one network evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NetworkStats {
    /// Compare-exchange operations executed.
    pub comparators: u64,
}

impl AddAssign for NetworkStats {
    fn add_assign(&mut self, rhs: Self) {
        self.comparators += rhs.comparators;
    }
}

/// Shape of the ranking network.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Candidate-store capacity N.
    pub capacity: usize,
    /// Number of partitions P (a power of two, at most N).
    pub partitions: usize,
    /// Use the fixed networks for short sub-sorts.
    pub hybrid: bool,
    /// Sort partitions and merge runs on the rayon pool (`rayon` feature).
    pub parallel: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            capacity: 208,
            partitions: 8,
            hybrid: true,
            parallel: false,
        }
    }
}

impl NetworkConfig {
    pub(crate) fn validate(&self) -> W3PiResult<()> {
        if self.capacity == 0 {
            return Err(W3PiError::InvalidConfig {
                reason: "capacity must be positive",
            });
        }
        if !self.partitions.is_power_of_two() {
            return Err(W3PiError::InvalidConfig {
                reason: "partition count must be a power of two",
            });
        }
        if self.partitions > self.capacity {
            return Err(W3PiError::InvalidConfig {
                reason: "partition count exceeds capacity",
            });
        }
        Ok(())
    }

    /// Slots per partition, `ceil(N / P)`.
    pub fn partition_size(&self) -> usize {
        self.capacity.div_ceil(self.partitions)
    }

    /// Length of the padded network input, `P * ceil(N / P)`.
    pub fn padded_len(&self) -> usize {
        self.partition_size() * self.partitions
    }
}

/// Validated ranking network.
#[derive(Clone, Debug)]
pub struct RankingNetwork {
    cfg: NetworkConfig,
}

impl RankingNetwork {
    /// Validates the configuration and builds the network.
    pub fn new(cfg: NetworkConfig) -> W3PiResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &NetworkConfig {
        &self.cfg
    }

    /// Ranks a masked candidate array into a sequence of length N.
    pub fn rank(&self, candidates: &[Candidate], mask: &Mask) -> W3PiResult<Vec<RankedSlot>> {
        self.rank_with_stats(candidates, mask).map(|(ranked, _)| ranked)
    }

    /// Like [`RankingNetwork::rank`], also returning the work counters.
    pub fn rank_with_stats(
        &self,
        candidates: &[Candidate],
        mask: &Mask,
    ) -> W3PiResult<(Vec<RankedSlot>, NetworkStats)> {
        let _span = trace_span!(
            stage::RANK,
            partitions = self.cfg.partitions,
            hybrid = self.cfg.hybrid
        )
        .entered();

        let mut slots = ranked_input(candidates, mask, self.cfg.capacity)?;
        slots.extend((self.cfg.capacity..self.cfg.padded_len()).map(RankedSlot::dummy));

        let stats = self.sort_slots(&mut slots);
        slots.truncate(self.cfg.capacity);

        trace_event!("rank_done", comparators = stats.comparators);
        Ok((slots, stats))
    }

    fn sort_slots(&self, slots: &mut [RankedSlot]) -> NetworkStats {
        let part = self.cfg.partition_size();
        #[cfg(feature = "rayon")]
        if self.cfg.parallel {
            return self::rayon::rank_in_place_par(slots, part, self.cfg.hybrid);
        }
        rank_in_place(slots, part, self.cfg.hybrid)
    }
}

/// Sorts `v` (a whole number of `part`-sized partitions, a power of two of
/// them) with per-partition sorts followed by pairwise merge rounds.
pub fn rank_in_place<T: Ord>(v: &mut [T], part: usize, hybrid: bool) -> NetworkStats {
    debug_assert!(part > 0 && v.len() % part == 0);
    debug_assert!((v.len() / part).is_power_of_two());

    let mut stats = NetworkStats::default();
    for chunk in v.chunks_mut(part) {
        bitonic_sort(chunk, Direction::Ascending, hybrid, &mut stats);
    }
    let mut width = part;
    while width < v.len() {
        for pair in v.chunks_mut(2 * width) {
            merge_runs(pair, width, &mut stats);
        }
        width *= 2;
    }
    stats
}

/// Builds the unsorted network input: one entry per store slot, real for
/// present unmasked candidates and dummy otherwise.
pub fn ranked_input(
    candidates: &[Candidate],
    mask: &Mask,
    capacity: usize,
) -> W3PiResult<Vec<RankedSlot>> {
    if candidates.len() > capacity {
        return Err(W3PiError::CapacityExceeded {
            got: candidates.len(),
            capacity,
        });
    }
    if mask.len() != candidates.len() {
        return Err(W3PiError::IndexOutOfBounds {
            index: mask.len(),
            len: candidates.len(),
            context: "mask length",
        });
    }
    Ok((0..capacity)
        .map(|slot| match candidates.get(slot) {
            Some(cand) if !mask.is_excluded(slot) => RankedSlot::real(slot, *cand),
            _ => RankedSlot::dummy(slot),
        })
        .collect())
}

/// Ranks with a stable library sort under the same total order.
///
/// The network output must match this exactly.
pub fn reference_rank(
    candidates: &[Candidate],
    mask: &Mask,
    capacity: usize,
) -> W3PiResult<Vec<RankedSlot>> {
    let mut slots = ranked_input(candidates, mask, capacity)?;
    slots.sort();
    Ok(slots)
}
