//! Rayon-parallel network evaluation (feature-gated).
//!
//! Partition sorts are independent, and so are the merges within one round.
//! Each task counts its own comparators and the counts are summed, so the
//! statistics match the sequential path exactly.

use crate::network::bitonic::{bitonic_sort, merge_runs};
use crate::network::{Direction, NetworkStats};
use rayon::prelude::*;

/// Parallel counterpart of [`crate::network::rank_in_place`].
pub fn rank_in_place_par<T: Ord + Send>(v: &mut [T], part: usize, hybrid: bool) -> NetworkStats {
    debug_assert!(part > 0 && v.len() % part == 0);

    let mut stats = v
        .par_chunks_mut(part)
        .map(|chunk| {
            let mut local = NetworkStats::default();
            bitonic_sort(chunk, Direction::Ascending, hybrid, &mut local);
            local
        })
        .reduce(NetworkStats::default, sum_stats);

    let mut width = part;
    while width < v.len() {
        stats += v
            .par_chunks_mut(2 * width)
            .map(|pair| {
                let mut local = NetworkStats::default();
                merge_runs(pair, width, &mut local);
                local
            })
            .reduce(NetworkStats::default, sum_stats);
        width *= 2;
    }
    stats
}

fn sum_stats(mut a: NetworkStats, b: NetworkStats) -> NetworkStats {
    a += b;
    a
}
