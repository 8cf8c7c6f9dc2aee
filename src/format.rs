//! # Float Formats
//!
//! A [`FloatFormat`] is the `(exp_bits, man_bits)` pair that every
//! [`FloatValue`](crate::FloatValue) carries alongside its fields. The pair is
//! validated once, on construction, and everything derived from it (bias,
//! all-ones exponent, storage width) is computed from the two widths.
//!
//! ## Layout
//!
//! ```text
//! [Sign: 1 bit][Exponent: exp_bits][Mantissa: man_bits]
//! ```
//!
//! ## Examples
//!
//! ```rust
//! use varfloat::FloatFormat;
//!
//! let e4m3 = FloatFormat::new(4, 3).unwrap();
//! assert_eq!(e4m3.bias(), 7);
//! assert_eq!(e4m3.max_exponent(), 15);
//! assert_eq!(e4m3.total_bits(), 8);
//!
//! assert!(FloatFormat::new(0, 3).is_err());
//! ```

use std::fmt;

use crate::error::{FormatError, Result};

/// Largest supported exponent field width. Unbiased exponents, including the
/// sum of two of them during multiplication, are kept in an `i64`.
pub const MAX_EXP_BITS: u32 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FloatFormat {
    exp_bits: u32,
    man_bits: u32,
}

impl FloatFormat {
    /// IEEE 754 binary64, the layout of `f64`.
    pub const DOUBLE: Self = Self {
        exp_bits: 11,
        man_bits: 52,
    };

    /// IEEE 754 binary32, the layout of `f32`.
    pub const SINGLE: Self = Self {
        exp_bits: 8,
        man_bits: 23,
    };

    /// Validates the two field widths.
    ///
    /// The mantissa is backed by an arbitrary precision integer, so any
    /// `man_bits` is accepted. The exponent width must be in
    /// `1..=MAX_EXP_BITS`.
    pub fn new(exp_bits: u32, man_bits: u32) -> Result<Self> {
        if exp_bits == 0 || exp_bits > MAX_EXP_BITS {
            tracing::debug!(exp_bits, man_bits, "rejected float format");
            return Err(FormatError::InvalidExponentWidth { exp_bits });
        }
        Ok(Self { exp_bits, man_bits })
    }

    /// The format of the result of a binary operation between `a` and `b`:
    /// each field is as wide as the wider of the two operands.
    pub fn promote(a: Self, b: Self) -> Self {
        Self {
            exp_bits: a.exp_bits.max(b.exp_bits),
            man_bits: a.man_bits.max(b.man_bits),
        }
    }

    pub fn exp_bits(&self) -> u32 {
        self.exp_bits
    }

    pub fn man_bits(&self) -> u32 {
        self.man_bits
    }

    /// `2^(exp_bits - 1) - 1`
    pub fn bias(&self) -> i64 {
        (1_i64 << (self.exp_bits - 1)) - 1
    }

    /// The all-ones exponent field, reserved for infinities and NaN.
    pub fn max_exponent(&self) -> u64 {
        (1_u64 << self.exp_bits) - 1
    }

    /// Unbiased exponent of the smallest normal number, which is also the
    /// scale of every subnormal.
    pub fn min_exponent(&self) -> i64 {
        1 - self.bias()
    }

    /// Unbiased exponent of the largest finite number.
    pub fn max_finite_exponent(&self) -> i64 {
        self.max_exponent() as i64 - 1 - self.bias()
    }

    pub fn total_bits(&self) -> u64 {
        1 + u64::from(self.exp_bits) + u64::from(self.man_bits)
    }

    /// Whether NaN has a bit pattern in this format. With no mantissa bits
    /// the all-ones exponent can only encode infinity.
    pub fn has_nan(&self) -> bool {
        self.man_bits > 0
    }
}

impl fmt::Display for FloatFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}m{}", self.exp_bits, self.man_bits)
    }
}
