use std::fmt::{self, Debug, Display};

use num_bigint::BigUint;
use num_traits::One;

use crate::codec;
use crate::error::{FormatError, Result};
use crate::format::FloatFormat;

pub mod arithmetic;
pub mod class;
pub mod cmp;
pub mod converter;
pub(crate) mod round;

pub use class::FloatClass;

/// A binary floating-point number whose field widths are part of the value.
///
/// The fields always satisfy `exponent < 2^exp_bits` and
/// `mantissa < 2^man_bits`. Values are never mutated; every operation builds a
/// new one.
#[derive(Clone)]
pub struct FloatValue {
    sign: bool,
    exponent: u64,
    mantissa: BigUint,
    format: FloatFormat,
}

impl FloatValue {
    /// Callers guarantee the fields fit in `format`.
    pub(crate) fn new_unchecked(
        sign: bool,
        exponent: u64,
        mantissa: BigUint,
        format: FloatFormat,
    ) -> Self {
        debug_assert!(exponent <= format.max_exponent());
        debug_assert!(mantissa.bits() <= u64::from(format.man_bits()));
        Self {
            sign,
            exponent,
            mantissa,
            format,
        }
    }

    /// Builds a value from its raw fields.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use varfloat::FloatValue;
    ///
    /// let max_normal = FloatValue::from_fields(false, 14, 7_u8, 4, 3).unwrap();
    /// assert_eq!(max_normal.to_float(), 240.0);
    ///
    /// assert!(FloatValue::from_fields(false, 16, 0_u8, 4, 3).is_err());
    /// ```
    pub fn from_fields(
        sign: bool,
        exponent: u64,
        mantissa: impl Into<BigUint>,
        exp_bits: u32,
        man_bits: u32,
    ) -> Result<Self> {
        let format = FloatFormat::new(exp_bits, man_bits)?;
        let mantissa = mantissa.into();

        if exponent > format.max_exponent() {
            return Err(FormatError::FieldOutOfRange {
                field: "exponent",
                width: exp_bits,
            });
        }
        if mantissa.bits() > u64::from(man_bits) {
            return Err(FormatError::FieldOutOfRange {
                field: "mantissa",
                width: man_bits,
            });
        }
        Ok(Self::new_unchecked(sign, exponent, mantissa, format))
    }

    pub fn zero(sign: bool, format: FloatFormat) -> Self {
        Self::new_unchecked(sign, 0, BigUint::ZERO, format)
    }

    pub fn infinity(sign: bool, format: FloatFormat) -> Self {
        Self::new_unchecked(sign, format.max_exponent(), BigUint::ZERO, format)
    }

    /// The canonical NaN: all-ones exponent and only the highest mantissa
    /// bit set. Formats without mantissa bits cannot encode NaN and get the
    /// infinity pattern instead.
    pub fn nan(sign: bool, format: FloatFormat) -> Self {
        let mantissa = match format.man_bits() {
            0 => BigUint::ZERO,
            man_bits => BigUint::one() << (man_bits - 1),
        };
        Self::new_unchecked(sign, format.max_exponent(), mantissa, format)
    }

    pub fn sign(&self) -> bool {
        self.sign
    }

    pub fn sign_is_negative(&self) -> bool {
        self.sign
    }

    /// The biased exponent field.
    pub fn exponent(&self) -> u64 {
        self.exponent
    }

    /// The fraction field, without the implicit leading bit.
    pub fn mantissa(&self) -> &BigUint {
        &self.mantissa
    }

    pub fn format(&self) -> FloatFormat {
        self.format
    }

    pub fn exp_bits(&self) -> u32 {
        self.format.exp_bits()
    }

    pub fn man_bits(&self) -> u32 {
        self.format.man_bits()
    }

    pub fn bias(&self) -> i64 {
        self.format.bias()
    }
}

impl Debug for FloatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FloatValue")
            .field("sign", if self.sign { &'-' } else { &'+' })
            .field("exponent", &self.exponent)
            .field("mantissa", &self.mantissa)
            .field("exp_bits", &self.format.exp_bits())
            .field("man_bits", &self.format.man_bits())
            .field("bits", &codec::to_bit_string(self))
            .finish()
    }
}

/// Prints the nearest `f64`, so special values read `NaN`, `inf`, `-inf`,
/// `0` and `-0`.
impl Display for FloatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.to_float(), f)
    }
}
