//! Integer helpers for fixed-point angle and rounding arithmetic.

/// Raw angle units in a full turn (LSB = pi / 720).
pub(crate) const FULL_TURN: i32 = 1440;

/// Raw angle units in half a turn.
pub(crate) const HALF_TURN: i32 = FULL_TURN / 2;

/// Wraps a raw azimuthal difference into `(-HALF_TURN, HALF_TURN]`.
pub(crate) fn wrap_delta_phi(dphi: i32) -> i32 {
    let wrapped = dphi.rem_euclid(FULL_TURN);
    if wrapped > HALF_TURN {
        wrapped - FULL_TURN
    } else {
        wrapped
    }
}

/// Drops `shift` fractional bits, rounding half up.
pub(crate) fn shr_round(value: u64, shift: u32) -> u64 {
    if shift == 0 {
        return value;
    }
    let half = 1u64 << (shift - 1);
    (value >> shift) + u64::from(value & ((half << 1) - 1) >= half)
}

/// Rounds a non-negative physical value to raw units of `lsb`, saturating at `max_raw`.
pub(crate) fn quantize_unsigned(value: f64, lsb: f64, max_raw: u64) -> u64 {
    if !value.is_finite() {
        return if value > 0.0 { max_raw } else { 0 };
    }
    if value <= 0.0 {
        return 0;
    }
    let raw = (value / lsb).round();
    if raw >= max_raw as f64 {
        max_raw
    } else {
        raw as u64
    }
}

/// Rounds a signed physical value to raw units of `lsb`, clamped to `[min_raw, max_raw]`.
pub(crate) fn quantize_signed(value: f64, lsb: f64, min_raw: i64, max_raw: i64) -> i64 {
    if value.is_nan() {
        return 0;
    }
    let raw = (value / lsb).round();
    if raw >= max_raw as f64 {
        max_raw
    } else if raw <= min_raw as f64 {
        min_raw
    } else {
        raw as i64
    }
}

/// Floor of the square root of `value`.
pub(crate) fn isqrt(value: u64) -> u64 {
    if value < 2 {
        return value;
    }
    // Newton from above converges monotonically to the floor.
    let mut x = 1u64 << (64 - value.leading_zeros()).div_ceil(2);
    loop {
        let next = (x + value / x) / 2;
        if next >= x {
            return x;
        }
        x = next;
    }
}

#[cfg(test)]
mod tests {
    use super::{isqrt, quantize_signed, quantize_unsigned, shr_round, wrap_delta_phi, HALF_TURN};

    #[test]
    fn wrap_delta_phi_maps_to_half_open_range() {
        assert_eq!(wrap_delta_phi(0), 0);
        assert_eq!(wrap_delta_phi(HALF_TURN), HALF_TURN);
        assert_eq!(wrap_delta_phi(-HALF_TURN), HALF_TURN);
        assert_eq!(wrap_delta_phi(721), -719);
        assert_eq!(wrap_delta_phi(-721), 719);
        assert_eq!(wrap_delta_phi(2047), 607);
        assert_eq!(wrap_delta_phi(-2047), -607);
    }

    #[test]
    fn shr_round_rounds_half_up() {
        assert_eq!(shr_round(5, 0), 5);
        assert_eq!(shr_round(0b0111, 2), 2);
        assert_eq!(shr_round(0b0110, 2), 2);
        assert_eq!(shr_round(0b0101, 2), 1);
        assert_eq!(shr_round(u64::MAX >> 1, 10), 1u64 << 53);
    }

    #[test]
    fn quantize_saturates_at_bounds() {
        assert_eq!(quantize_unsigned(1.0, 0.25, 100), 4);
        assert_eq!(quantize_unsigned(-3.0, 0.25, 100), 0);
        assert_eq!(quantize_unsigned(1e9, 0.25, 100), 100);
        assert_eq!(quantize_unsigned(f64::INFINITY, 0.25, 100), 100);
        assert_eq!(quantize_signed(-1e9, 0.5, -512, 511), -512);
        assert_eq!(quantize_signed(1.24, 0.5, -512, 511), 2);
        assert_eq!(quantize_signed(f64::NAN, 0.5, -512, 511), 0);
    }

    #[test]
    fn isqrt_floors() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(1), 1);
        assert_eq!(isqrt(3), 1);
        assert_eq!(isqrt(4), 2);
        assert_eq!(isqrt(1_638_400), 1280);
        assert_eq!(isqrt(1_638_399), 1279);
        assert_eq!(isqrt(u64::MAX), u64::from(u32::MAX));
        for v in 0..2000u64 {
            let r = isqrt(v);
            assert!(r * r <= v && (r + 1) * (r + 1) > v, "v={v}");
        }
    }
}
