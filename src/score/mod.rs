//! Triplet scoring and best-triplet selection.

pub mod forest;

pub use forest::{Tree, TreeEnsemble};

use crate::triplet::{FeatureVector, Triplet};

/// Maps a feature vector to a score; higher is better.
///
/// Implementations must be deterministic and free of side effects.
pub trait Scorer {
    fn score(&self, features: &FeatureVector) -> f32;
}

impl<F> Scorer for F
where
    F: Fn(&FeatureVector) -> f32,
{
    fn score(&self, features: &FeatureVector) -> f32 {
        self(features)
    }
}

/// An accepted triplet together with its score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredTriplet {
    /// Position in the enumeration order.
    pub index: usize,
    pub triplet: Triplet,
    pub features: FeatureVector,
    pub score: f32,
}

/// Returns the highest-scoring entry; equal scores keep the earliest one.
///
/// Scores compare with `f32::total_cmp`, so the choice is defined for every
/// bit pattern.
pub fn select_best(scored: &[ScoredTriplet]) -> Option<&ScoredTriplet> {
    scored.iter().fold(None, |best: Option<&ScoredTriplet>, cand| match best {
        Some(b) if cand.score.total_cmp(&b.score).is_le() => Some(b),
        _ => Some(cand),
    })
}

#[cfg(test)]
mod tests {
    use super::{select_best, ScoredTriplet, Scorer};
    use crate::triplet::{FeatureVector, Triplet, N_FEATURES};

    fn scored(index: usize, score: f32) -> ScoredTriplet {
        ScoredTriplet {
            index,
            triplet: Triplet::with_pivots(index as u8 + 2),
            features: FeatureVector::new([0.0; N_FEATURES]),
            score,
        }
    }

    #[test]
    fn closures_are_scorers() {
        let by_pt = |f: &FeatureVector| f[0] * 2.0;
        let mut values = [0.0; N_FEATURES];
        values[0] = 3.0;
        assert_eq!(by_pt.score(&FeatureVector::new(values)), 6.0);
    }

    #[test]
    fn ties_keep_lowest_enumeration_index() {
        let list = vec![scored(0, 0.1), scored(1, 0.7), scored(2, 0.7), scored(3, -2.0)];
        assert_eq!(select_best(&list).map(|s| s.index), Some(1));
        assert!(select_best(&[]).is_none());
    }

    #[test]
    fn negative_zero_ranks_below_positive_zero() {
        let list = vec![scored(0, -0.0), scored(1, 0.0)];
        assert_eq!(select_best(&list).map(|s| s.index), Some(1));
    }
}
