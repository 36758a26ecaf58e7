//! Arbitrary-length bitonic sorter and merger.
//!
//! The merge of a length-`n` bitonic sequence compares element `i` with
//! `i + k`, where `k` is the largest power of two strictly below `n`, then
//! recurses on both halves. The sorter splits at `n / 2`, sorts the halves in
//! opposite directions and merges. Neither needs `n` to be a power of two.

use super::hybrid::fixed_network;
use super::{Direction, NetworkStats};

/// Compare-exchange of `v[i]` and `v[j]` (`i < j`).
#[inline]
fn compare_exchange<T: Ord>(
    v: &mut [T],
    i: usize,
    j: usize,
    dir: Direction,
    stats: &mut NetworkStats,
) {
    stats.comparators += 1;
    let out_of_order = match dir {
        Direction::Ascending => v[j] < v[i],
        Direction::Descending => v[i] < v[j],
    };
    if out_of_order {
        v.swap(i, j);
    }
}

fn largest_pow2_below(n: usize) -> usize {
    debug_assert!(n > 1);
    1 << (usize::BITS - 1 - (n - 1).leading_zeros())
}

/// Sorts `v` in direction `dir`.
///
/// With `hybrid`, sub-sorts whose length has a fixed network use it instead
/// of recursing.
pub fn bitonic_sort<T: Ord>(
    v: &mut [T],
    dir: Direction,
    hybrid: bool,
    stats: &mut NetworkStats,
) {
    let n = v.len();
    if n <= 1 {
        return;
    }
    if hybrid {
        if let Some(net) = fixed_network(n) {
            for &(i, j) in net {
                compare_exchange(v, usize::from(i), usize::from(j), dir, stats);
            }
            return;
        }
    }
    let m = n / 2;
    let (lo, hi) = v.split_at_mut(m);
    bitonic_sort(lo, dir.reverse(), hybrid, stats);
    bitonic_sort(hi, dir, hybrid, stats);
    bitonic_merge(v, dir, stats);
}

/// Merges a bitonic sequence (first run opposite to `dir`, second run in
/// `dir`) into direction `dir`.
pub fn bitonic_merge<T: Ord>(v: &mut [T], dir: Direction, stats: &mut NetworkStats) {
    let n = v.len();
    if n <= 1 {
        return;
    }
    let k = largest_pow2_below(n);
    for i in 0..n - k {
        compare_exchange(v, i, i + k, dir, stats);
    }
    let (lo, hi) = v.split_at_mut(k);
    bitonic_merge(lo, dir, stats);
    bitonic_merge(hi, dir, stats);
}

/// Merges two adjacent ascending runs `v[..split]` and `v[split..]` of equal
/// length into one ascending run.
pub(crate) fn merge_runs<T: Ord>(v: &mut [T], split: usize, stats: &mut NetworkStats) {
    debug_assert_eq!(2 * split, v.len(), "merge runs must have equal length");
    v[..split].reverse();
    bitonic_merge(v, Direction::Ascending, stats);
}
