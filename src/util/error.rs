//! Error types for w3pi.

use thiserror::Error;

/// Result alias for w3pi operations.
pub type W3PiResult<T> = std::result::Result<T, W3PiError>;

/// Errors that can occur when configuring or running the trigger pipeline.
///
/// Events that simply yield no triplet are not errors; they are reported as
/// [`crate::Decision::NoCandidate`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum W3PiError {
    /// A configuration value is out of its supported range.
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: &'static str },
    /// An event holds more candidates than the store capacity.
    #[error("event holds {got} candidates but the store capacity is {capacity}")]
    CapacityExceeded { got: usize, capacity: usize },
    /// A decision-tree ensemble is malformed.
    #[error("invalid model: {reason}")]
    InvalidModel { reason: String },
    /// An index is out of bounds for the given context.
    #[error("index {index} out of bounds for {context} (len {len})")]
    IndexOutOfBounds {
        index: usize,
        len: usize,
        context: &'static str,
    },
}
