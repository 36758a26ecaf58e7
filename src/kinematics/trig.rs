//! Quantized cosine and hyperbolic-cosine look-up tables.
//!
//! Both tables are indexed by the magnitude of a raw angle difference and
//! hold values with [`TRIG_FRAC_BITS`] fractional bits. They are built once
//! per process in a `OnceLock` and shared by every caller, so the isolation
//! filter, triplet cuts and feature builder all see identical values.

use crate::candidate::fixed::ANGLE_LSB_RAD;
use crate::util::math::{wrap_delta_phi, HALF_TURN};
use std::sync::OnceLock;

/// Fractional bits of the table entries (LSB = 1/1024).
pub const TRIG_FRAC_BITS: u32 = 10;

/// Table value representing 1.0.
pub const TRIG_ONE: i32 = 1 << TRIG_FRAC_BITS;

/// Number of cos entries, covering `|dphi|` in `0..=HALF_TURN`.
pub const COS_TABLE_LEN: usize = HALF_TURN as usize + 1;

/// Number of cosh entries; larger `|deta|` saturates at the last entry.
pub const COSH_TABLE_LEN: usize = 1024;

struct TrigTables {
    cos: Vec<i32>,
    cosh: Vec<u32>,
}

impl TrigTables {
    fn build() -> Self {
        let scale = f64::from(TRIG_ONE);
        let cos = (0..COS_TABLE_LEN)
            .map(|idx| ((idx as f64 * ANGLE_LSB_RAD).cos() * scale).round() as i32)
            .collect();
        let cosh = (0..COSH_TABLE_LEN)
            .map(|idx| ((idx as f64 * ANGLE_LSB_RAD).cosh() * scale).round() as u32)
            .collect();
        Self { cos, cosh }
    }
}

static TABLES: OnceLock<TrigTables> = OnceLock::new();

fn tables() -> &'static TrigTables {
    TABLES.get_or_init(TrigTables::build)
}

/// Quantized `cos(dphi)` for a raw azimuthal difference (wrapped first).
pub fn cos_q(dphi_raw: i32) -> i32 {
    let idx = wrap_delta_phi(dphi_raw).unsigned_abs() as usize;
    tables().cos[idx]
}

/// Quantized `cosh(deta)` for a raw pseudorapidity difference.
pub fn cosh_q(deta_raw: i32) -> u32 {
    let idx = (deta_raw.unsigned_abs() as usize).min(COSH_TABLE_LEN - 1);
    tables().cosh[idx]
}

#[cfg(test)]
mod tests {
    use super::{cos_q, cosh_q, COSH_TABLE_LEN, TRIG_ONE};

    #[test]
    fn cos_table_hits_quadrants() {
        assert_eq!(cos_q(0), TRIG_ONE);
        assert_eq!(cos_q(720), -TRIG_ONE);
        assert_eq!(cos_q(-720), -TRIG_ONE);
        assert_eq!(cos_q(360), 0);
        assert_eq!(cos_q(1440), TRIG_ONE);
        assert_eq!(cos_q(100), cos_q(-100));
    }

    #[test]
    fn cosh_table_is_even_monotone_and_saturates() {
        assert_eq!(cosh_q(0), TRIG_ONE as u32);
        assert_eq!(cosh_q(200), cosh_q(-200));
        assert!(cosh_q(300) > cosh_q(299));
        let last = cosh_q(COSH_TABLE_LEN as i32 - 1);
        assert_eq!(cosh_q(4000), last);
        assert_eq!(cosh_q(-4000), last);
    }
}
