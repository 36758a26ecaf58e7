//! W3Pi is a fixed-point triplet trigger core: from a few hundred
//! reconstructed particle candidates per event it deterministically picks the
//! best three-pion combination compatible with a W boson decay.
//!
//! The pipeline masks candidates with quality cuts, ranks them with a
//! partitioned bitonic network, keeps the top-K, enumerates pivot triplets
//! under charge and kinematic cuts, builds an eleven-entry feature vector per
//! triplet and lets an injected [`Scorer`] pick the winner. Partition sorts,
//! merges and event batches can run on rayon via the `rayon` feature.

pub mod candidate;
pub mod filter;
pub mod kinematics;
pub mod lowlevel;
pub mod network;
pub mod pipeline;
pub mod score;
mod trace;
pub mod triplet;
pub mod util;

pub use candidate::fixed::{Eta, Phi, Pt, Z0};
pub use candidate::{Candidate, ParticleId, RankedSlot, TopK};
pub use filter::{Filter, FilterConfig, IdSet, IsolationConfig, Mask};
pub use kinematics::{Dr2, MassSq};
pub use network::{NetworkConfig, NetworkStats, RankingNetwork};
pub use pipeline::{
    Decision, EventProcessor, EventReport, NoCandidateReason, PipelineConfig, Winner,
};
pub use score::{select_best, ScoredTriplet, Scorer, Tree, TreeEnsemble};
pub use triplet::{
    Enumeration, FeatureVector, MassWindow, RejectReason, Triplet, TripletCandidate, TripletCuts,
    TripletGenerator, Verdict, N_FEATURES,
};
pub use util::{W3PiError, W3PiResult};
