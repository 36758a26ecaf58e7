//! Pivot-based triplet enumeration and kinematic cuts.
//!
//! Top-K positions 0 and 1 are the pivots; every later position is tried as
//! the third member, giving `K - 2` triplets in enumeration order. Each one
//! carries a verdict so callers can see why a triplet was dropped.

pub mod features;

pub use features::{FeatureVector, FEATURE_NAMES, N_FEATURES};

use crate::candidate::fixed::Pt;
use crate::candidate::{Candidate, TopK};
use crate::kinematics::{min_delta_r2, triplet_mass_sq, Dr2, MassSq};
use crate::trace::{stage, trace_event, trace_span};
use crate::util::{W3PiError, W3PiResult};

/// Three top-K positions `(pivot0, pivot1, third)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Triplet {
    pub idx0: u8,
    pub idx1: u8,
    pub idx2: u8,
}

impl Triplet {
    /// Index value marking the invalid triplet.
    pub const SENTINEL_INDEX: u8 = u8::MAX;

    /// The invalid triplet emitted when fewer than three real candidates survive.
    pub const SENTINEL: Triplet = Triplet {
        idx0: Self::SENTINEL_INDEX,
        idx1: Self::SENTINEL_INDEX,
        idx2: Self::SENTINEL_INDEX,
    };

    /// Triplet of both pivots and top-K position `third`.
    pub fn with_pivots(third: u8) -> Self {
        Self {
            idx0: 0,
            idx1: 1,
            idx2: third,
        }
    }

    /// Returns true for [`Triplet::SENTINEL`].
    pub fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }

    /// Positions as `usize`.
    pub fn positions(&self) -> [usize; 3] {
        [
            usize::from(self.idx0),
            usize::from(self.idx1),
            usize::from(self.idx2),
        ]
    }
}

/// Why a triplet was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// A member is a dummy slot.
    Dummy,
    /// `|charge sum| != 1`.
    Charge,
    /// First pivot below its momentum threshold.
    Pivot0Pt,
    /// Second pivot below its momentum threshold.
    Pivot1Pt,
    /// Third member below its momentum threshold.
    ThirdPt,
    /// Three-body mass outside the window.
    MassWindow,
    /// Two members closer than the minimum separation.
    Separation,
}

/// Outcome of the cuts for one triplet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    Accepted,
    Rejected(RejectReason),
}

impl Verdict {
    /// Returns true for [`Verdict::Accepted`].
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

/// Inclusive window on the three-body invariant mass squared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MassWindow {
    pub min: MassSq,
    pub max: MassSq,
}

impl MassWindow {
    /// Window from mass bounds in GeV (squared internally).
    pub fn from_mass_gev(min_gev: f32, max_gev: f32) -> Self {
        Self {
            min: MassSq::from_mass_gev(min_gev),
            max: MassSq::from_mass_gev(max_gev),
        }
    }

    /// Returns true when `m2` lies inside the window.
    pub fn contains(&self, m2: MassSq) -> bool {
        self.min <= m2 && m2 <= self.max
    }
}

/// Triplet cuts beyond the always-on charge requirement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TripletCuts {
    /// Minimum momentum of the first pivot.
    pub pivot0_min_pt: Option<Pt>,
    /// Minimum momentum of the second pivot.
    pub pivot1_min_pt: Option<Pt>,
    /// Minimum momentum of the third member.
    pub third_min_pt: Option<Pt>,
    /// Accepted three-body mass range.
    pub mass_window: Option<MassWindow>,
    /// Minimum pairwise separation, squared.
    pub min_dr2: Option<Dr2>,
}

impl TripletCuts {
    pub(crate) fn validate(&self) -> W3PiResult<()> {
        if let Some(window) = &self.mass_window {
            if window.min > window.max {
                return Err(W3PiError::InvalidConfig {
                    reason: "mass window minimum exceeds maximum",
                });
            }
        }
        Ok(())
    }

    /// Applies the cuts to members `[pivot0, pivot1, third]`.
    pub fn evaluate(&self, members: &[Candidate; 3]) -> Verdict {
        let [p0, p1, p2] = members;
        let charge = i32::from(p0.charge()) + i32::from(p1.charge()) + i32::from(p2.charge());
        if charge.abs() != 1 {
            return Verdict::Rejected(RejectReason::Charge);
        }
        let below = |pt: Pt, min: Option<Pt>| min.is_some_and(|min| pt < min);
        if below(p0.pt, self.pivot0_min_pt) {
            return Verdict::Rejected(RejectReason::Pivot0Pt);
        }
        if below(p1.pt, self.pivot1_min_pt) {
            return Verdict::Rejected(RejectReason::Pivot1Pt);
        }
        if below(p2.pt, self.third_min_pt) {
            return Verdict::Rejected(RejectReason::ThirdPt);
        }
        if let Some(window) = &self.mass_window {
            if !window.contains(triplet_mass_sq(p0, p1, p2)) {
                return Verdict::Rejected(RejectReason::MassWindow);
            }
        }
        if let Some(min_dr2) = self.min_dr2 {
            if min_delta_r2(p0, p1, p2) < min_dr2 {
                return Verdict::Rejected(RejectReason::Separation);
            }
        }
        Verdict::Accepted
    }
}

/// One enumerated triplet and its verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TripletCandidate {
    pub triplet: Triplet,
    pub verdict: Verdict,
}

/// Output of the triplet generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Enumeration {
    /// Fewer than three real candidates; only the sentinel triplet exists.
    Sentinel,
    /// All `K - 2` triplets in enumeration order.
    Triplets(Vec<TripletCandidate>),
}

impl Enumeration {
    /// Returns the enumerated triplets (empty for the sentinel).
    pub fn triplets(&self) -> &[TripletCandidate] {
        match self {
            Enumeration::Sentinel => &[],
            Enumeration::Triplets(list) => list,
        }
    }

    /// Iterates `(enumeration index, triplet)` over accepted triplets.
    pub fn accepted(&self) -> impl Iterator<Item = (usize, Triplet)> + '_ {
        self.triplets()
            .iter()
            .enumerate()
            .filter(|(_, cand)| cand.verdict.is_accepted())
            .map(|(idx, cand)| (idx, cand.triplet))
    }

    /// Returns true for the sentinel outcome.
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Enumeration::Sentinel)
    }
}

/// Builds and filters triplets over a top-K selection.
#[derive(Clone, Debug)]
pub struct TripletGenerator {
    cuts: TripletCuts,
}

impl TripletGenerator {
    /// Validates the cuts and builds the generator.
    pub fn new(cuts: TripletCuts) -> W3PiResult<Self> {
        cuts.validate()?;
        Ok(Self { cuts })
    }

    /// Returns the cuts.
    pub fn cuts(&self) -> &TripletCuts {
        &self.cuts
    }

    /// Enumerates the pivot triplets of `top`.
    ///
    /// Fails when `top` holds more positions than fit below
    /// [`Triplet::SENTINEL_INDEX`].
    pub fn enumerate(&self, top: &TopK) -> W3PiResult<Enumeration> {
        let _span = trace_span!(stage::TRIPLETS, real = top.real_count()).entered();
        if top.len() > usize::from(Triplet::SENTINEL_INDEX) {
            return Err(W3PiError::InvalidConfig {
                reason: "top_k positions must fit below the sentinel index",
            });
        }
        if top.real_count() < 3 {
            trace_event!("triplets_sentinel", real = top.real_count());
            return Ok(Enumeration::Sentinel);
        }

        let slots = top.slots();
        let (p0, p1) = (slots[0].candidate, slots[1].candidate);
        let mut list = Vec::with_capacity(top.len().saturating_sub(2));
        for pos in 2..top.len() {
            let triplet = Triplet::with_pivots(pos as u8);
            // Dummies form the tail, so every later position is a dummy too.
            let verdict = if slots[pos].real {
                self.cuts.evaluate(&[p0, p1, slots[pos].candidate])
            } else {
                Verdict::Rejected(RejectReason::Dummy)
            };
            list.push(TripletCandidate { triplet, verdict });
        }

        trace_event!(
            "triplets_done",
            enumerated = list.len(),
            accepted = list.iter().filter(|c| c.verdict.is_accepted()).count()
        );
        Ok(Enumeration::Triplets(list))
    }
}

/// Returns the members of `triplet` from `top`, or `None` for an invalid triplet.
pub fn members(top: &TopK, triplet: Triplet) -> Option<[Candidate; 3]> {
    let [i0, i1, i2] = triplet.positions();
    Some([
        top.get(i0)?.candidate,
        top.get(i1)?.candidate,
        top.get(i2)?.candidate,
    ])
}
