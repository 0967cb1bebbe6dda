//! Exact base-10 conversion for [`Uint128`]
//!
//! Parsing multiplies and accumulates one digit at a time and checks for
//! overflow at each step against a precomputed cutoff. Formatting divides by
//! 10^19 so each remainder fits a `u64` and renders with the native formatter.

use crate::{CoreError, Uint128};

/// `floor((2^128 - 1) / 10)`
const CUTOFF: Uint128 = Uint128::new(0x1999_9999_9999_9999, 0x9999_9999_9999_9999);

/// Largest power of ten that fits a `u64`
const CHUNK: u64 = 10_000_000_000_000_000_000;
const CHUNK_DIGITS: usize = 19;

/// 2^128 - 1 has 39 digits, so three 19-digit chunks always suffice.
const MAX_CHUNKS: usize = 3;

/// Parse `s` as an unsigned decimal literal
///
/// Returns `(MAX, Some(Overflow))` once the value no longer fits and
/// `(ZERO, Some(InvalidFormat))` for malformed input.
pub(crate) fn parse(s: &str) -> (Uint128, Option<CoreError>) {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return (Uint128::ZERO, Some(CoreError::InvalidFormat));
    }

    let mut value = Uint128::ZERO;
    for b in s.bytes() {
        if value > CUTOFF {
            return (Uint128::MAX, Some(CoreError::Overflow));
        }

        // value <= CUTOFF, so value * 10 <= MAX - 5 and cannot wrap.
        let scaled = times_ten(value);
        let next = scaled + Uint128::from(u64::from(b - b'0'));
        if next < scaled {
            return (Uint128::MAX, Some(CoreError::Overflow));
        }

        value = next;
    }

    (value, None)
}

/// Render `x` as canonical decimal digits
pub(crate) fn format(x: Uint128) -> String {
    if x.is_zero() {
        return "0".to_string();
    }

    let mut chunks = [0u64; MAX_CHUNKS];
    let mut count = 0;
    let mut rest = x;
    while !rest.is_zero() {
        let (quotient, remainder) = div_rem_u64(rest, CHUNK);
        chunks[count] = remainder;
        count += 1;
        rest = quotient;
    }

    let mut out = String::with_capacity(MAX_CHUNKS * CHUNK_DIGITS);
    out.push_str(&chunks[count - 1].to_string());
    for chunk in chunks[..count - 1].iter().rev() {
        out.push_str(&format!("{:0width$}", chunk, width = CHUNK_DIGITS));
    }

    out
}

#[inline]
fn times_ten(x: Uint128) -> Uint128 {
    (x << 3) + (x << 1)
}

/// Long division of `x` by a 64-bit divisor, most significant half first
fn div_rem_u64(x: Uint128, divisor: u64) -> (Uint128, u64) {
    let divisor = u128::from(divisor);

    let hi = u128::from(x.hi());
    let q_hi = hi / divisor;
    let r_hi = hi % divisor;

    // r_hi < divisor, so the low quotient fits in 64 bits.
    let dividend = (r_hi << 64) | u128::from(x.lo());
    let q_lo = dividend / divisor;
    let remainder = dividend % divisor;

    (Uint128::new(q_hi as u64, q_lo as u64), remainder as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX_DECIMAL: &str = "340282366920938463463374607431768211455";
    const MAX_PLUS_ONE: &str = "340282366920938463463374607431768211456";

    #[test]
    fn test_cutoff_is_max_over_ten() {
        assert_eq!(u128::from(CUTOFF), u128::MAX / 10);
    }

    #[test]
    fn test_parse_simple() {
        assert_eq!(parse("0"), (Uint128::ZERO, None));
        assert_eq!(parse("42"), (Uint128::from(42u64), None));
        assert_eq!(parse("18446744073709551615"), (Uint128::new(0, u64::MAX), None));
        assert_eq!(parse("18446744073709551616"), (Uint128::new(1, 0), None));
    }

    #[test]
    fn test_parse_leading_zeros() {
        assert_eq!(parse("0000"), (Uint128::ZERO, None));
        assert_eq!(parse("000123"), (Uint128::from(123u64), None));

        let padded = format!("{}{}", "0".repeat(100), MAX_DECIMAL);
        assert_eq!(parse(&padded), (Uint128::MAX, None));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(parse(""), (Uint128::ZERO, Some(CoreError::InvalidFormat)));
        assert_eq!(parse("12a3").1, Some(CoreError::InvalidFormat));
        assert_eq!(parse("-1").1, Some(CoreError::InvalidFormat));
        assert_eq!(parse("+1").1, Some(CoreError::InvalidFormat));
        assert_eq!(parse(" 1").1, Some(CoreError::InvalidFormat));
        assert_eq!(parse("1_000").1, Some(CoreError::InvalidFormat));
        assert_eq!(parse("١٢").1, Some(CoreError::InvalidFormat));
    }

    #[test]
    fn test_parse_overflow_boundary() {
        assert_eq!(parse(MAX_DECIMAL), (Uint128::MAX, None));
        assert_eq!(parse(MAX_PLUS_ONE), (Uint128::MAX, Some(CoreError::Overflow)));
    }

    #[test]
    fn test_parse_overflow_before_last_digit() {
        // Trips the cutoff check rather than the post-add wrap check.
        let long = "9".repeat(40);
        assert_eq!(parse(&long), (Uint128::MAX, Some(CoreError::Overflow)));

        let huge = "1".repeat(1000);
        assert_eq!(parse(&huge).1, Some(CoreError::Overflow));
    }

    #[test]
    fn test_parse_cutoff_then_small_digit() {
        // CUTOFF * 10 + 5 == MAX exactly; + 6..9 must wrap and be caught.
        let cutoff = u128::MAX / 10;
        for digit in 0..=9u128 {
            let s = format!("{}{}", cutoff, digit);
            let (value, err) = parse(&s);
            if digit <= 5 {
                assert_eq!(err, None, "digit {}", digit);
                assert_eq!(u128::from(value), cutoff * 10 + digit);
            } else {
                assert_eq!(err, Some(CoreError::Overflow), "digit {}", digit);
            }
        }
    }

    #[test]
    fn test_format() {
        assert_eq!(format(Uint128::ZERO), "0");
        assert_eq!(format(Uint128::ONE), "1");
        assert_eq!(format(Uint128::from(CHUNK)), "10000000000000000000");
        assert_eq!(format(Uint128::from(CHUNK - 1)), "9999999999999999999");
        assert_eq!(format(Uint128::new(1, 0)), "18446744073709551616");
        assert_eq!(format(Uint128::MAX), MAX_DECIMAL);
    }

    #[test]
    fn test_format_keeps_inner_zeros() {
        let x = Uint128::from(100_000_000_000_000_000_000_000_000_000u128);
        assert_eq!(format(x), "100000000000000000000000000000");

        let y = Uint128::from(10_000_000_000_000_000_000_000_000_000_000_000_001u128);
        assert_eq!(format(y), "10000000000000000000000000000000000001");
    }

    #[test]
    fn test_decimal_round_trip() {
        let mut values = vec![
            0u128,
            1,
            9,
            10,
            u64::MAX as u128,
            u64::MAX as u128 + 1,
            u128::MAX,
            u128::MAX - 1,
            u128::MAX / 10,
        ];
        let mut x: u128 = 1;
        while let Some(next) = x.checked_mul(7) {
            values.push(next);
            values.push(next - 1);
            x = next;
        }

        for v in values {
            let s = format(Uint128::from(v));
            assert_eq!(s, v.to_string());
            assert_eq!(parse(&s), (Uint128::from(v), None));
        }
    }

    #[test]
    fn test_div_rem_u64() {
        let (q, r) = div_rem_u64(Uint128::MAX, 10);
        assert_eq!(u128::from(q), u128::MAX / 10);
        assert_eq!(r, 5);
    }
}
