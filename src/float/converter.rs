//! # Conversion Utilities
//!
//! Conversions between [`FloatValue`] and `f64`, between a value and its raw
//! bit pattern, and between two formats.
//!
//! ## Overview
//!
//! - `from_float` decomposes the IEEE 754 double into an exact
//!   `significand * 2^exponent` and rounds it once into the target format.
//! - `to_float` casts into the binary64 layout with the same rounding and
//!   reinterprets the bits. For every format no wider than `(11, 52)` this is
//!   exact.
//! - `from_bits` and `to_bits` never round; they only check that the
//!   pattern fits.
//!
//! ## Examples
//!
//! ```rust
//! use num_bigint::BigUint;
//! use varfloat::FloatValue;
//!
//! let x = FloatValue::from_float(2.625, 5, 5).unwrap();
//! assert_eq!(x.to_float(), 2.625);
//! assert_eq!(x.to_bits(), BigUint::from(0b0_10000_01010_u32));
//!
//! // 0.1 is quantized to the nearest value with 5 mantissa bits
//! let y = FloatValue::from_float(0.1, 5, 5).unwrap();
//! assert_eq!(y.to_float(), 0.099609375);
//!
//! // Too large for e4m3
//! let z = FloatValue::from_float(1e6, 4, 3).unwrap();
//! assert!(z.is_inf());
//! ```

use num_bigint::BigUint;

use crate::codec;
use crate::error::Result;
use crate::float::round::quantize;
use crate::float::{FloatClass, FloatValue};
use crate::format::FloatFormat;

const F64_MAN_BITS: u32 = f64::MANTISSA_DIGITS - 1;
const F64_EXP_MASK: u64 = (1 << 11) - 1;
/// Scale of a subnormal `f64` significand: `2^(1 - 1023 - 52)`.
const F64_SUBNORMAL_EXPONENT: i64 = -1074;

impl FloatValue {
    /// Converts an `f64` into an `(exp_bits, man_bits)` value, rounding to
    /// nearest even.
    ///
    /// NaN becomes the canonical NaN of the format, infinities and zeros keep
    /// their sign. Finite values past the largest finite value become infinity;
    /// values too small for the smallest subnormal become zero.
    pub fn from_float(value: f64, exp_bits: u32, man_bits: u32) -> Result<Self> {
        let format = FloatFormat::new(exp_bits, man_bits)?;
        Ok(Self::from_f64_with_format(value, format))
    }

    pub(crate) fn from_f64_with_format(value: f64, format: FloatFormat) -> Self {
        let sign = value.is_sign_negative();
        if value.is_nan() {
            return Self::nan(sign, format);
        }
        if value.is_infinite() {
            return Self::infinity(sign, format);
        }
        if value == 0.0 {
            return Self::zero(sign, format);
        }

        let bits = value.to_bits();
        let biased = (bits >> F64_MAN_BITS) & F64_EXP_MASK;
        let fraction = bits & ((1 << F64_MAN_BITS) - 1);
        let (significand, exponent) = if biased == 0 {
            (fraction, F64_SUBNORMAL_EXPONENT)
        } else {
            (
                fraction | (1 << F64_MAN_BITS),
                biased as i64 - 1023 - i64::from(F64_MAN_BITS),
            )
        };

        quantize(sign, &BigUint::from(significand), exponent, format)
    }

    /// Converts the value to the nearest `f64`.
    ///
    /// Special values map directly and keep their sign, so `nan`, `inf`,
    /// `-inf`, `0.0` and `-0.0` round-trip through any format with at least
    /// one mantissa bit.
    pub fn to_float(&self) -> f64 {
        match self.classify() {
            FloatClass::NaN if self.sign => -f64::NAN,
            FloatClass::NaN => f64::NAN,
            FloatClass::Infinity if self.sign => f64::NEG_INFINITY,
            FloatClass::Infinity => f64::INFINITY,
            FloatClass::Zero if self.sign => -0.0,
            FloatClass::Zero => 0.0,
            FloatClass::Normal | FloatClass::Subnormal => {
                let double = self.cast_to(FloatFormat::DOUBLE);
                f64::from_bits(codec::low_u64(&double.to_bits()))
            }
        }
    }

    /// Reinterprets `raw` as an `(exp_bits, man_bits)` bit pattern.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use varfloat::FloatValue;
    ///
    /// let min_subnormal = FloatValue::from_bits(0b0_0000_001_u32, 4, 3).unwrap();
    /// assert_eq!(min_subnormal.to_float(), 2.0_f64.powi(-9));
    ///
    /// // Nine bits do not fit in an 8-bit format
    /// assert!(FloatValue::from_bits(0b1_0000_0000_u32, 4, 3).is_err());
    /// ```
    pub fn from_bits(raw: impl Into<BigUint>, exp_bits: u32, man_bits: u32) -> Result<Self> {
        codec::decode(&raw.into(), exp_bits, man_bits)
    }

    /// The raw bit pattern, sign bit first.
    pub fn to_bits(&self) -> BigUint {
        codec::encode(self)
    }

    /// Rounds the value into another format.
    ///
    /// Widening is always exact. Narrowing rounds to nearest even with the
    /// same overflow and underflow behavior as [`FloatValue::from_float`].
    pub fn cast(&self, exp_bits: u32, man_bits: u32) -> Result<Self> {
        let format = FloatFormat::new(exp_bits, man_bits)?;
        Ok(self.cast_to(format))
    }

    pub(crate) fn cast_to(&self, format: FloatFormat) -> Self {
        match self.unpack() {
            Some(unpacked) => quantize(
                unpacked.sign,
                &unpacked.significand,
                unpacked.exponent,
                format,
            ),
            None if self.is_nan() => Self::nan(self.sign, format),
            None => Self::infinity(self.sign, format),
        }
    }
}

impl From<&FloatValue> for f64 {
    fn from(value: &FloatValue) -> Self {
        value.to_float()
    }
}

impl From<FloatValue> for f64 {
    fn from(value: FloatValue) -> Self {
        value.to_float()
    }
}
