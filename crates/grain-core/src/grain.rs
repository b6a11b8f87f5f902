//! Exact fixed-point currency.
//!
//! A [`Grain`] is an `i128` count of raw units, with [`ONE_RAW`] (10^18) raw
//! units per whole grain. Addition, subtraction and comparison are exact
//! integer operations. Floating point only enters through [`Grain::scale`],
//! which multiplies by a [`Ratio`] and rounds half to even, and through
//! [`Grain::from_approximate_float`], which exists for fixtures and
//! configuration literals.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::{DECIMAL_PRECISION, ONE_RAW};
use crate::error::GrainError;
use crate::ratio::Ratio;

/// An exact amount of currency, in raw units of 10^-18 grain.
///
/// # Examples
///
/// ```
/// use grain_core::Grain;
/// let half = Grain::ONE.scale_by_ratio(0.5).unwrap();
/// assert_eq!(half.checked_add(half).unwrap(), Grain::ONE);
/// assert_eq!(half.format(2), "0.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Grain(i128);

impl Grain {
    /// The additive identity.
    pub const ZERO: Self = Self(0);
    /// One whole grain.
    pub const ONE: Self = Self(ONE_RAW);

    /// Build from a raw unit count.
    pub const fn from_raw(raw: i128) -> Self {
        Self(raw)
    }

    /// Build from a whole number of grains. Cannot overflow: `i64::MAX`
    /// whole grains is well inside the `i128` raw range.
    pub const fn from_integer(whole: i64) -> Self {
        Self(whole as i128 * ONE_RAW)
    }

    /// The raw unit count.
    pub const fn raw(self) -> i128 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, other: Self) -> Result<Self, GrainError> {
        self.0.checked_add(other.0).map(Self).ok_or(GrainError::Overflow)
    }

    /// Exact difference. May be negative; callers check the sign where the
    /// domain forbids it.
    pub fn checked_sub(self, other: Self) -> Result<Self, GrainError> {
        self.0.checked_sub(other.0).map(Self).ok_or(GrainError::Overflow)
    }

    /// Sum an iterator of amounts, failing on overflow.
    pub fn checked_sum<I>(amounts: I) -> Result<Self, GrainError>
    where
        I: IntoIterator<Item = Self>,
    {
        amounts
            .into_iter()
            .try_fold(Self::ZERO, |acc, amount| acc.checked_add(amount))
    }

    /// Multiply by an inexact ratio, rounding half to even to the nearest
    /// raw unit.
    ///
    /// The ratio is taken as the exact binary value it holds
    /// (`mantissa * 2^exponent`), the product is formed in 192-bit integer
    /// arithmetic, and only the final shift rounds. The result is within
    /// half a raw unit of the exact product.
    pub fn scale(self, ratio: Ratio) -> Result<Self, GrainError> {
        let (ratio_negative, mantissa, exponent) = ratio.decompose();
        if mantissa == 0 || self.0 == 0 {
            return Ok(Self::ZERO);
        }

        let negative = (self.0 < 0) ^ ratio_negative;
        let (hi, lo) = widening_mul(self.0.unsigned_abs(), mantissa);

        let magnitude = if exponent >= 0 {
            let shift = exponent as u32;
            if hi != 0 || shift >= 128 || lo.leading_zeros() < shift {
                return Err(GrainError::Overflow);
            }
            lo << shift
        } else {
            shr_round_half_even(hi, lo, exponent.unsigned_abs()).ok_or(GrainError::Overflow)?
        };

        let magnitude = i128::try_from(magnitude).map_err(|_| GrainError::Overflow)?;
        Ok(Self(if negative { -magnitude } else { magnitude }))
    }

    /// [`scale`](Self::scale) by a plain float, rejecting non-finite input.
    pub fn scale_by_ratio(self, ratio: f64) -> Result<Self, GrainError> {
        self.scale(Ratio::new(ratio)?)
    }

    /// Construct from a human-entered decimal such as `0.1` or `15`.
    ///
    /// Goes through the shortest decimal rendering of the float, so `0.1`
    /// becomes exactly 10^17 raw units rather than the binary neighbour.
    /// Digits past the 18th decimal place round half to even. For test
    /// fixtures and configuration literals only; computed amounts go
    /// through [`scale`](Self::scale).
    pub fn from_approximate_float(value: f64) -> Result<Self, GrainError> {
        if !value.is_finite() {
            return Err(GrainError::InvalidNumber(value.to_string()));
        }
        parse_decimal(&value.to_string(), true)
    }

    /// Render with exactly `places` decimals, truncating toward zero.
    ///
    /// Display only; never parse the output back into an amount for
    /// further computation. `places` above 18 is clamped.
    pub fn format(&self, places: u32) -> String {
        let places = places.min(DECIMAL_PRECISION);
        let one = ONE_RAW as u128;
        let magnitude = self.0.unsigned_abs();
        let whole = magnitude / one;
        let frac = (magnitude % one) / 10u128.pow(DECIMAL_PRECISION - places);
        let sign = if self.0 < 0 && (whole != 0 || frac != 0) { "-" } else { "" };

        if places == 0 {
            format!("{sign}{whole}")
        } else {
            format!("{sign}{whole}.{frac:0width$}", width = places as usize)
        }
    }
}

impl fmt::Display for Grain {
    /// Full precision with trailing zeros trimmed, e.g. `1.5`, `-0.25`, `3`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let full = self.format(DECIMAL_PRECISION);
        let trimmed = full.trim_end_matches('0').trim_end_matches('.');
        f.write_str(trimmed)
    }
}

impl FromStr for Grain {
    type Err = GrainError;

    /// Exact decimal parsing. More than 18 fractional digits is an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_decimal(s, false)
    }
}

impl Serialize for Grain {
    /// Serialized as the raw integer in a string, so no JSON consumer ever
    /// sees the amount as a float.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Grain {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<i128>()
            .map(Self)
            .map_err(|e| serde::de::Error::custom(format!("invalid raw grain {raw:?}: {e}")))
    }
}

/// `a * b` as a 192-bit value `(hi, lo)`, with `hi < 2^64`.
fn widening_mul(a: u128, b: u64) -> (u128, u128) {
    let b = b as u128;
    let low_product = (a & u64::MAX as u128) * b;
    let high_product = (a >> 64) * b;
    let (lo, carry) = low_product.overflowing_add(high_product << 64);
    ((high_product >> 64) + carry as u128, lo)
}

/// `(hi, lo) / 2^shift` rounded half to even. `None` if the quotient does
/// not fit in a `u128`. `shift` must be at least 1.
fn shr_round_half_even(hi: u128, lo: u128, shift: u32) -> Option<u128> {
    // The value is below 2^192, so anything shifted further rounds to zero.
    if shift > 192 {
        return Some(0);
    }

    let (q_hi, q_lo) = if shift < 128 {
        (hi >> shift, (lo >> shift) | (hi << (128 - shift)))
    } else {
        (0, hi >> (shift - 128))
    };
    if q_hi != 0 {
        return None;
    }

    let round_bit = bit_at(hi, lo, shift - 1);
    let sticky = any_below(hi, lo, shift - 1);
    if round_bit && (sticky || q_lo & 1 == 1) {
        q_lo.checked_add(1)
    } else {
        Some(q_lo)
    }
}

fn bit_at(hi: u128, lo: u128, index: u32) -> bool {
    if index < 128 {
        (lo >> index) & 1 == 1
    } else {
        (hi >> (index - 128)) & 1 == 1
    }
}

/// Whether any of the lowest `count` bits are set.
fn any_below(hi: u128, lo: u128, count: u32) -> bool {
    match count {
        0 => false,
        1..=127 => lo & ((1u128 << count) - 1) != 0,
        128 => lo != 0,
        _ => lo != 0 || hi & ((1u128 << (count - 128)) - 1) != 0,
    }
}

/// Parse `[+-]digits[.digits]` into raw units. With `round_excess`, digits
/// past the 18th decimal place round half to even; otherwise they are an
/// error.
fn parse_decimal(s: &str, round_excess: bool) -> Result<Grain, GrainError> {
    let invalid = || GrainError::Parse(format!("invalid decimal: {s:?}"));

    let (negative, unsigned) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let (whole, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if !whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let places = DECIMAL_PRECISION as usize;
    let (kept, excess) = frac.split_at(frac.len().min(places));
    if !excess.is_empty() && !round_excess {
        return Err(GrainError::Parse(format!(
            "more than {DECIMAL_PRECISION} decimal places: {s:?}"
        )));
    }

    let whole_raw = if whole.is_empty() {
        0
    } else {
        whole.parse::<i128>().map_err(|_| GrainError::Overflow)?
    };
    let frac_raw = kept
        .bytes()
        .fold(0i128, |acc, b| acc * 10 + (b - b'0') as i128)
        * 10i128.pow((places - kept.len()) as u32);

    let mut raw = whole_raw
        .checked_mul(ONE_RAW)
        .and_then(|w| w.checked_add(frac_raw))
        .ok_or(GrainError::Overflow)?;

    let mut excess_digits = excess.bytes();
    if let Some(first) = excess_digits.next() {
        let rest_nonzero = excess_digits.any(|b| b != b'0');
        let round_up = first > b'5' || (first == b'5' && (rest_nonzero || raw & 1 == 1));
        if round_up {
            raw = raw.checked_add(1).ok_or(GrainError::Overflow)?;
        }
    }

    Ok(Grain(if negative { -raw } else { raw }))
}
