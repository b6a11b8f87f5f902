//! Inexact scaling factors.
//!
//! A [`Ratio`] is the only floating-point value allowed to touch a
//! [`Grain`] amount, and only through [`Grain::scale`]. Keeping it a
//! separate type means no arithmetic path can mix floats into amounts
//! without going through that one rounding step.

use std::fmt;

use crate::error::GrainError;
use crate::grain::Grain;

/// A finite floating-point multiplier.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Ratio(f64);

impl Ratio {
    pub const ZERO: Self = Self(0.0);
    pub const ONE: Self = Self(1.0);

    /// Wrap a float, rejecting NaN and infinities.
    pub fn new(value: f64) -> Result<Self, GrainError> {
        if !value.is_finite() {
            return Err(GrainError::InvalidNumber(value.to_string()));
        }
        Ok(Self(value))
    }

    /// The float quotient `numerator / denominator` of two amounts.
    ///
    /// This is the only path from a [`Grain`] back into floating point.
    /// A zero denominator yields an infinite or NaN quotient, which is
    /// rejected like any other non-finite value.
    pub fn of(numerator: Grain, denominator: Grain) -> Result<Self, GrainError> {
        Self::new(numerator.raw() as f64 / denominator.raw() as f64)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Exact binary decomposition: `|self| == mantissa * 2^exponent`.
    ///
    /// Returns `(negative, mantissa, exponent)`. Subnormals decompose with
    /// the fixed minimum exponent; zero has a zero mantissa.
    pub(crate) fn decompose(self) -> (bool, u64, i32) {
        let bits = self.0.to_bits();
        let negative = bits >> 63 == 1;
        let biased = ((bits >> 52) & 0x7ff) as i32;
        let fraction = bits & 0x000f_ffff_ffff_ffff;
        if biased == 0 {
            (negative, fraction, -1074)
        } else {
            (negative, fraction | (1 << 52), biased - 1075)
        }
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
