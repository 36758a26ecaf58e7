//! Shared utility helpers.

pub mod error;
pub(crate) mod math;

pub use error::{W3PiError, W3PiResult};
