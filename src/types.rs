// 1.0: all the primitives live here. every monetary amount in the engine is a FixedPoint18.
// integers scaled by 10^18 (erc-20 wei convention). floating point never touches these.

use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::math;

/// Number of fractional decimal digits carried by [`FixedPoint18`].
pub const DECIMALS: usize = 18;

/// 10^18, the fixed-point scale.
pub const WAD: u64 = 1_000_000_000_000_000_000;

// 1.1: unsigned 18-decimal fixed-point amount backed by a 256-bit integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedPoint18(U256);

impl FixedPoint18 {
    pub const ZERO: Self = Self(U256([0, 0, 0, 0]));
    pub const ONE: Self = Self(U256([WAD, 0, 0, 0]));

    pub fn from_wei<T: Into<U256>>(wei: T) -> Self {
        Self(wei.into())
    }

    pub const fn from_wei_u64(wei: u64) -> Self {
        Self(U256([wei, 0, 0, 0]))
    }

    /// Whole tokens, i.e. `units * 10^18`.
    pub fn from_units(units: u64) -> Self {
        Self(U256::from(units) * U256::from(WAD))
    }

    /// Signed raw amounts come from loosely typed callers. negative is a caller bug.
    pub fn try_from_i128(wei: i128) -> Result<Self, ParseFixedError> {
        if wei < 0 {
            return Err(ParseFixedError::Negative);
        }
        Ok(Self(U256::from(wei as u128)))
    }

    pub fn wei(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(&self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(&self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(&self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// `self * numerator / denominator` in 512-bit precision, rounded down.
    /// None on a zero denominator or a result wider than 256 bits.
    pub fn checked_mul_div(&self, numerator: Self, denominator: Self) -> Option<Self> {
        math::mul_div_floor(self.0, numerator.0, denominator.0, "checked_mul_div")
            .ok()
            .map(Self)
    }

    /// Display only. None when the value does not fit a 96-bit decimal mantissa.
    pub fn to_decimal(&self) -> Option<Decimal> {
        if self.0.bits() > 127 {
            return None;
        }
        Decimal::try_from_i128_with_scale(self.0.as_u128() as i128, DECIMALS as u32).ok()
    }

    /// Display only. loses precision past 53 bits of mantissa.
    pub fn to_f64_lossy(&self) -> f64 {
        math::words_to_f64(&self.0 .0) / WAD as f64
    }
}

// canonical form: integer part, then the fractional digits with trailing zeros trimmed.
impl fmt::Display for FixedPoint18 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = U256::from(WAD);
        let whole = self.0 / scale;
        let frac = (self.0 % scale).low_u64();
        if frac == 0 {
            return write!(f, "{}", whole);
        }
        let digits = format!("{:018}", frac);
        write!(f, "{}.{}", whole, digits.trim_end_matches('0'))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseFixedError {
    #[error("empty amount")]
    Empty,

    #[error("negative amounts are not representable")]
    Negative,

    #[error("invalid character in amount: {0:?}")]
    InvalidDigit(String),

    #[error("more than 18 fractional digits: {0}")]
    TooPrecise(usize),

    #[error("amount exceeds 256 bits")]
    Overflow,
}

impl FromStr for FixedPoint18 {
    type Err = ParseFixedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseFixedError::Empty);
        }
        if s.starts_with('-') {
            return Err(ParseFixedError::Negative);
        }

        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, Some(f)),
            None => (s, None),
        };

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseFixedError::InvalidDigit(s.to_string()));
        }

        let frac_digits = match frac {
            Some(f) if f.is_empty() || !f.bytes().all(|b| b.is_ascii_digit()) => {
                return Err(ParseFixedError::InvalidDigit(s.to_string()));
            }
            Some(f) if f.len() > DECIMALS => return Err(ParseFixedError::TooPrecise(f.len())),
            Some(f) => format!("{:0<18}", f),
            None => "0".to_string(),
        };

        let whole = U256::from_dec_str(whole).map_err(|_| ParseFixedError::Overflow)?;
        let frac = U256::from_dec_str(&frac_digits).map_err(|_| ParseFixedError::Overflow)?;

        whole
            .checked_mul(U256::from(WAD))
            .and_then(|w| w.checked_add(frac))
            .map(Self)
            .ok_or(ParseFixedError::Overflow)
    }
}

// wire form is the raw wei integer as a string, so json number precision never matters.
impl Serialize for FixedPoint18 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for FixedPoint18 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        // from_dec_str reads "" as zero
        if raw.is_empty() {
            return Err(de::Error::custom(ParseFixedError::Empty));
        }
        if raw.starts_with('-') {
            return Err(de::Error::custom(ParseFixedError::Negative));
        }
        U256::from_dec_str(&raw)
            .map(Self)
            .map_err(|_| de::Error::custom(format!("invalid wei amount: {raw:?}")))
    }
}

/// Sum of amounts, None on overflow.
pub fn checked_sum<'a, I>(amounts: I) -> Option<FixedPoint18>
where
    I: IntoIterator<Item = &'a FixedPoint18>,
{
    amounts
        .into_iter()
        .try_fold(FixedPoint18::ZERO, |acc, x| acc.checked_add(*x))
}

// 1.2: basis points. 100 bps = 1%, 10_000 bps = 100%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Bps(u32);

impl Bps {
    pub const MAX: u32 = 10_000;

    pub fn new(bps: u32) -> Self {
        Self(bps)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn as_fraction(&self) -> Decimal {
        Decimal::new(self.0 as i64, 4)
    }
}

impl fmt::Display for Bps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bps", self.0)
    }
}
