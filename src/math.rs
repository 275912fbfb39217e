//! Wide-integer helpers shared by the curve and fee math.
//!
//! Every product of two 256-bit amounts is taken in 512 bits and divided
//! last. Narrowing back to 256 bits is checked; nothing wraps.

use primitive_types::{U256, U512};

use crate::engine::EngineError;

/// Newton steps allowed in [`isqrt`]. convergence needs ~log2(bits) steps, this is a hard cap.
pub const MAX_SQRT_ITERATIONS: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    Down,
    Up,
}

pub fn narrow(value: U512, operation: &'static str) -> Result<U256, EngineError> {
    U256::try_from(value).map_err(|_| EngineError::Overflow { operation })
}

pub fn div_rounded(
    numerator: U512,
    denominator: U512,
    rounding: Rounding,
    operation: &'static str,
) -> Result<U512, EngineError> {
    if denominator.is_zero() {
        return Err(EngineError::DivisionByZero { operation });
    }
    let (quotient, remainder) = numerator.div_mod(denominator);
    match rounding {
        Rounding::Up if !remainder.is_zero() => Ok(quotient + U512::one()),
        _ => Ok(quotient),
    }
}

pub fn mul_div(
    a: U256,
    b: U256,
    denominator: U256,
    rounding: Rounding,
    operation: &'static str,
) -> Result<U256, EngineError> {
    let quotient = div_rounded(a.full_mul(b), U512::from(denominator), rounding, operation)?;
    narrow(quotient, operation)
}

pub fn mul_div_floor(
    a: U256,
    b: U256,
    denominator: U256,
    operation: &'static str,
) -> Result<U256, EngineError> {
    mul_div(a, b, denominator, Rounding::Down, operation)
}

/// floor(sqrt(n)) by Newton iteration from an overestimate.
pub fn isqrt(n: U512) -> U512 {
    if n < U512::from(2u8) {
        return n;
    }
    // 2^ceil(bits/2) >= sqrt(n), so the sequence decreases monotonically to the floor root
    let mut x = U512::one() << ((n.bits() + 1) / 2);
    for _ in 0..MAX_SQRT_ITERATIONS {
        let y = (x + n / x) >> 1usize;
        if y >= x {
            return x;
        }
        x = y;
    }
    x
}

/// Little-endian 64-bit limbs to f64. display paths only.
pub fn words_to_f64(words: &[u64]) -> f64 {
    words
        .iter()
        .rev()
        .fold(0.0, |acc, &w| acc * 18_446_744_073_709_551_616.0 + w as f64)
}

/// Percent change from price `old_num/old_den` to `new_num/new_den`.
///
/// The cross products are exact in 512 bits; only the final ratio is taken
/// in floating point, so tiny moves keep their precision. Returns 0.0 when
/// either price is undefined.
pub fn percent_change(new_num: U256, new_den: U256, old_num: U256, old_den: U256) -> f64 {
    let after = new_num.full_mul(old_den);
    let before = old_num.full_mul(new_den);
    if before.is_zero() || new_den.is_zero() {
        return 0.0;
    }
    let (diff, negative) = if after >= before {
        (after - before, false)
    } else {
        (before - after, true)
    };
    let pct = words_to_f64(&diff.0) / words_to_f64(&before.0) * 100.0;
    if negative {
        -pct
    } else {
        pct
    }
}
