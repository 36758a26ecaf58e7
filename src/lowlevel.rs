//! Building blocks below the [`crate::EventProcessor`] API.
//!
//! These expose the individual stages for custom pipelines, firmware
//! cross-checks and benchmarks: the raw bitonic networks, the reference
//! ranking, the quantized geometry and the trig tables.

pub use crate::filter::slim;
pub use crate::kinematics::trig::{cos_q, cosh_q, TRIG_FRAC_BITS, TRIG_ONE};
pub use crate::kinematics::{delta_r2, min_delta_r2, pair_mass_sq, triplet_mass_sq};
pub use crate::network::bitonic::{bitonic_merge, bitonic_sort};
pub use crate::network::{rank_in_place, ranked_input, reference_rank, Direction, NetworkStats};
pub use crate::triplet::members;

#[cfg(feature = "rayon")]
pub use crate::network::rayon::rank_in_place_par;
