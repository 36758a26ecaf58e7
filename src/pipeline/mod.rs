//! Per-event driver wiring filter, ranking, selection, triplets and scoring.
//!
//! An [`EventProcessor`] is configured once and reused for any number of
//! events. It holds no per-event state, so a shared reference can serve
//! several threads.

mod batch;

use crate::candidate::{Candidate, RankedSlot, TopK};
use crate::filter::{Filter, FilterConfig, Mask};
use crate::network::{NetworkConfig, NetworkStats, RankingNetwork};
use crate::score::{select_best, ScoredTriplet, Scorer};
use crate::trace::{stage, trace_event, trace_span};
use crate::triplet::{
    members, Enumeration, FeatureVector, Triplet, TripletCuts, TripletGenerator,
};
use crate::util::{W3PiError, W3PiResult};

/// Pipeline configuration.
///
/// Defaults follow the deployed trigger: 208 slots in 8 partitions, hybrid
/// networks, top-10 selection.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    /// Candidate-store capacity N.
    pub capacity: usize,
    /// Ranking-network partitions P.
    pub partitions: usize,
    /// Use fixed networks for short sub-sorts.
    pub hybrid: bool,
    /// Number of ranked slots kept for triplet building (K).
    pub top_k: usize,
    /// Run independent work on the rayon pool (`rayon` feature only).
    pub parallel: bool,
    /// Candidate cuts.
    pub filter: FilterConfig,
    /// Triplet cuts.
    pub cuts: TripletCuts,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let network = NetworkConfig::default();
        Self {
            capacity: network.capacity,
            partitions: network.partitions,
            hybrid: network.hybrid,
            top_k: 10,
            parallel: network.parallel,
            filter: FilterConfig::default(),
            cuts: TripletCuts::default(),
        }
    }
}

impl PipelineConfig {
    /// The network shape implied by this configuration.
    pub fn network(&self) -> NetworkConfig {
        NetworkConfig {
            capacity: self.capacity,
            partitions: self.partitions,
            hybrid: self.hybrid,
            parallel: self.parallel,
        }
    }

    /// Checks every threshold and size.
    pub fn validate(&self) -> W3PiResult<()> {
        self.network().validate()?;
        if self.top_k < 3 {
            return Err(W3PiError::InvalidConfig {
                reason: "top_k must be at least 3",
            });
        }
        if self.top_k > self.capacity {
            return Err(W3PiError::InvalidConfig {
                reason: "top_k exceeds capacity",
            });
        }
        if self.top_k > usize::from(Triplet::SENTINEL_INDEX) {
            return Err(W3PiError::InvalidConfig {
                reason: "top_k positions must fit below the sentinel index",
            });
        }
        self.filter.validate()?;
        self.cuts.validate()
    }
}

/// Why an event produced no triplet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoCandidateReason {
    /// Fewer than three real candidates reached the top-K.
    TooFewCandidates,
    /// Every enumerated triplet failed a cut.
    NoTripletPassed,
}

/// The selected triplet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Winner {
    /// Top-K positions.
    pub triplet: Triplet,
    /// Original store slots of the three members.
    pub slots: [usize; 3],
    /// Scorer output.
    pub score: f32,
    /// Position in the enumeration order.
    pub index: usize,
}

/// Outcome for one event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Decision {
    Selected(Winner),
    NoCandidate(NoCandidateReason),
}

impl Decision {
    /// Returns the winner, if any.
    pub fn winner(&self) -> Option<&Winner> {
        match self {
            Decision::Selected(winner) => Some(winner),
            Decision::NoCandidate(_) => None,
        }
    }

    /// Returns true when a triplet was selected.
    pub fn is_selected(&self) -> bool {
        matches!(self, Decision::Selected(_))
    }
}

/// Every intermediate stage of one event.
#[derive(Clone, Debug, PartialEq)]
pub struct EventReport {
    pub mask: Mask,
    pub ranked: Vec<RankedSlot>,
    pub network: NetworkStats,
    pub top: TopK,
    pub enumeration: Enumeration,
    /// Accepted triplets with features and scores, in enumeration order.
    pub scored: Vec<ScoredTriplet>,
    pub decision: Decision,
}

/// Configured event pipeline.
#[derive(Clone, Debug)]
pub struct EventProcessor<S> {
    cfg: PipelineConfig,
    filter: Filter,
    network: RankingNetwork,
    generator: TripletGenerator,
    scorer: S,
}

impl<S: Scorer> EventProcessor<S> {
    /// Validates `cfg` and builds the processor.
    pub fn new(cfg: PipelineConfig, scorer: S) -> W3PiResult<Self> {
        cfg.validate()?;
        Ok(Self {
            filter: Filter::new(cfg.filter.clone())?,
            network: RankingNetwork::new(cfg.network())?,
            generator: TripletGenerator::new(cfg.cuts)?,
            cfg,
            scorer,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.cfg
    }

    /// Returns the scorer.
    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Selects the best triplet of one event.
    pub fn process(&self, event: &[Candidate]) -> W3PiResult<Decision> {
        self.process_detailed(event).map(|report| report.decision)
    }

    /// Runs one event and keeps every intermediate stage.
    pub fn process_detailed(&self, event: &[Candidate]) -> W3PiResult<EventReport> {
        if event.len() > self.cfg.capacity {
            return Err(W3PiError::CapacityExceeded {
                got: event.len(),
                capacity: self.cfg.capacity,
            });
        }

        let mask = self.filter.mask(event);
        let (ranked, network) = self.network.rank_with_stats(event, &mask)?;
        let top = TopK::select(&ranked, self.cfg.top_k);
        let enumeration = self.generator.enumerate(&top)?;

        let scored = self.score_accepted(&top, &enumeration)?;
        let decision = match (&enumeration, select_best(&scored)) {
            (Enumeration::Sentinel, _) => Decision::NoCandidate(NoCandidateReason::TooFewCandidates),
            (_, None) => Decision::NoCandidate(NoCandidateReason::NoTripletPassed),
            (_, Some(best)) => Decision::Selected(self.winner(&top, best)?),
        };

        Ok(EventReport {
            mask,
            ranked,
            network,
            top,
            enumeration,
            scored,
            decision,
        })
    }

    fn score_accepted(
        &self,
        top: &TopK,
        enumeration: &Enumeration,
    ) -> W3PiResult<Vec<ScoredTriplet>> {
        let _span = trace_span!(stage::SCORE).entered();
        let scored = enumeration
            .accepted()
            .map(|(index, triplet)| -> W3PiResult<ScoredTriplet> {
                let trio = members(top, triplet).ok_or(W3PiError::IndexOutOfBounds {
                    index: usize::from(triplet.idx2),
                    len: top.len(),
                    context: "top-k position",
                })?;
                let features = FeatureVector::from_members(&trio);
                Ok(ScoredTriplet {
                    index,
                    triplet,
                    features,
                    score: self.scorer.score(&features),
                })
            })
            .collect::<W3PiResult<Vec<_>>>()?;
        trace_event!("score_done", scored = scored.len());
        Ok(scored)
    }

    fn winner(&self, top: &TopK, best: &ScoredTriplet) -> W3PiResult<Winner> {
        let mut slots = [0usize; 3];
        for (out, pos) in slots.iter_mut().zip(best.triplet.positions()) {
            *out = top
                .get(pos)
                .ok_or(W3PiError::IndexOutOfBounds {
                    index: pos,
                    len: top.len(),
                    context: "top-k position",
                })?
                .slot;
        }
        Ok(Winner {
            triplet: best.triplet,
            slots,
            score: best.score,
            index: best.index,
        })
    }
}
