//! Per-candidate quality cuts producing an exclusion mask.
//!
//! The filter is a pure function of the candidate array. Masked slots are
//! never edited in place; [`slim`] produces a copy with masked slots replaced
//! by [`Candidate::DUMMY`].

mod isolation;

pub use isolation::IsolationConfig;

use crate::candidate::fixed::{Eta, Pt};
use crate::candidate::{Candidate, ParticleId};
use crate::trace::{stage, trace_event, trace_span};
use crate::util::{W3PiError, W3PiResult};

const WORD_BITS: usize = u64::BITS as usize;

/// Per-event exclusion bitset: one bit per slot, set means excluded.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Mask {
    words: Vec<u64>,
    len: usize,
}

impl Mask {
    /// Creates a mask of `len` slots with every slot kept.
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(WORD_BITS)],
            len,
        }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true when the mask covers no slots.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns whether slot `idx` is excluded, or `None` past the end.
    pub fn get(&self, idx: usize) -> Option<bool> {
        if idx >= self.len {
            return None;
        }
        Some(self.words[idx / WORD_BITS] >> (idx % WORD_BITS) & 1 == 1)
    }

    /// Returns true when slot `idx` exists and is excluded.
    #[inline]
    pub fn is_excluded(&self, idx: usize) -> bool {
        self.get(idx).unwrap_or(false)
    }

    /// Marks slot `idx` as excluded (`true`) or kept (`false`).
    pub fn set(&mut self, idx: usize, excluded: bool) -> W3PiResult<()> {
        if idx >= self.len {
            return Err(W3PiError::IndexOutOfBounds {
                index: idx,
                len: self.len,
                context: "mask slot",
            });
        }
        let bit = 1u64 << (idx % WORD_BITS);
        let word = &mut self.words[idx / WORD_BITS];
        if excluded {
            *word |= bit;
        } else {
            *word &= !bit;
        }
        Ok(())
    }

    /// Number of excluded slots.
    pub fn count_excluded(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Number of kept slots.
    pub fn count_kept(&self) -> usize {
        self.len - self.count_excluded()
    }

    /// Iterates the exclusion flags in slot order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |idx| self.is_excluded(idx))
    }
}

/// Set of accepted particle-id codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IdSet(u8);

impl IdSet {
    /// Accepts nothing.
    pub const EMPTY: IdSet = IdSet(0);

    /// Builds a set from a list of ids.
    pub fn from_ids(ids: &[ParticleId]) -> Self {
        Self(ids.iter().fold(0, |bits, id| bits | 1 << id.code()))
    }

    /// Returns true when `id` is in the set.
    pub fn contains(self, id: ParticleId) -> bool {
        self.0 >> id.code() & 1 == 1
    }

    /// Returns the members in id order.
    pub fn ids(self) -> Vec<ParticleId> {
        ParticleId::ALL
            .iter()
            .copied()
            .filter(|id| self.contains(*id))
            .collect()
    }
}

impl Default for IdSet {
    /// Charged hadrons and electrons (codes 2..=5).
    fn default() -> Self {
        Self::from_ids(&[
            ParticleId::HadronMinus,
            ParticleId::HadronPlus,
            ParticleId::ElectronMinus,
            ParticleId::ElectronPlus,
        ])
    }
}

/// Filter thresholds.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterConfig {
    /// Accepted particle ids.
    pub accepted_ids: IdSet,
    /// Largest accepted `|eta|`.
    pub max_abs_eta: Eta,
    /// When set, candidates with `pt <= min_pt` are masked.
    pub min_pt: Option<Pt>,
    /// Optional isolation cut, applied after the other cuts.
    pub isolation: Option<IsolationConfig>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            accepted_ids: IdSet::default(),
            max_abs_eta: Eta::from_value(2.4),
            min_pt: None,
            isolation: None,
        }
    }
}

impl FilterConfig {
    pub(crate) fn validate(&self) -> W3PiResult<()> {
        if self.accepted_ids == IdSet::EMPTY {
            return Err(W3PiError::InvalidConfig {
                reason: "filter accepts no particle id",
            });
        }
        if self.max_abs_eta.raw() < 0 {
            return Err(W3PiError::InvalidConfig {
                reason: "eta cut must be non-negative",
            });
        }
        if let Some(iso) = &self.isolation {
            iso.validate()?;
        }
        Ok(())
    }
}

/// Validated candidate filter.
#[derive(Clone, Debug)]
pub struct Filter {
    cfg: FilterConfig,
}

impl Filter {
    /// Validates the thresholds and builds the filter.
    pub fn new(cfg: FilterConfig) -> W3PiResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &FilterConfig {
        &self.cfg
    }

    /// Returns true when `cand` passes every cut except isolation.
    ///
    /// Dummy candidates never pass.
    pub fn passes_base_cuts(&self, cand: &Candidate) -> bool {
        if cand.is_dummy() || !self.cfg.accepted_ids.contains(cand.pid) {
            return false;
        }
        if cand.eta.raw().unsigned_abs() > self.cfg.max_abs_eta.raw().unsigned_abs() {
            return false;
        }
        match self.cfg.min_pt {
            Some(min_pt) => cand.pt > min_pt,
            None => true,
        }
    }

    /// Computes the exclusion mask of `candidates`.
    pub fn mask(&self, candidates: &[Candidate]) -> Mask {
        let _span = trace_span!(stage::FILTER, candidates = candidates.len()).entered();

        let kept: Vec<bool> = candidates
            .iter()
            .map(|cand| self.passes_base_cuts(cand))
            .collect();
        let isolated = match &self.cfg.isolation {
            Some(iso) => iso.apply(candidates, &kept),
            None => kept,
        };

        let mut mask = Mask::new(candidates.len());
        for (idx, keep) in isolated.iter().enumerate() {
            if !keep {
                mask.words[idx / WORD_BITS] |= 1 << (idx % WORD_BITS);
            }
        }
        trace_event!("filter_done", kept = mask.count_kept());
        mask
    }
}

/// Replaces every excluded slot with [`Candidate::DUMMY`].
pub fn slim(candidates: &[Candidate], mask: &Mask) -> Vec<Candidate> {
    candidates
        .iter()
        .enumerate()
        .map(|(idx, cand)| {
            if mask.is_excluded(idx) {
                Candidate::DUMMY
            } else {
                *cand
            }
        })
        .collect()
}
