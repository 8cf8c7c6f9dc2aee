//! # Bit Field Codec
//!
//! Splits a raw bit pattern into the sign, exponent and mantissa fields of a
//! [`FloatValue`] and joins them back together. Both directions are exact:
//! no rounding ever happens here.
//!
//! ```text
//! bit:  [1 + e + m - 1]  [e + m - 1 .. m]  [m - 1 .. 0]
//!        sign             exponent          mantissa
//! ```
//!
//! ## Examples
//!
//! ```rust
//! use num_bigint::BigUint;
//! use varfloat::codec;
//!
//! let value = codec::decode(&BigUint::from(0b1_0001_010u32), 4, 3).unwrap();
//! assert!(value.sign());
//! assert_eq!(value.exponent(), 1);
//! assert_eq!(codec::encode(&value), BigUint::from(0b1_0001_010u32));
//! assert_eq!(codec::to_bit_string(&value), "1_0001_010");
//! ```

use num_bigint::BigUint;
use num_traits::One;

use crate::error::{FormatError, Result};
use crate::float::FloatValue;
use crate::format::FloatFormat;

/// `2^n_bits - 1`
pub(crate) fn low_mask(n_bits: u32) -> BigUint {
    (BigUint::one() << n_bits) - 1_u8
}

/// The lowest 64 bits of `value`.
pub(crate) fn low_u64(value: &BigUint) -> u64 {
    value.iter_u64_digits().next().unwrap_or(0)
}

/// Splits `raw` into the fields of an `(exp_bits, man_bits)` value.
///
/// Fails if the widths are invalid or if `raw` has bits set above the
/// `1 + exp_bits + man_bits` bits of the format.
pub fn decode(raw: &BigUint, exp_bits: u32, man_bits: u32) -> Result<FloatValue> {
    let format = FloatFormat::new(exp_bits, man_bits)?;
    decode_with_format(raw, format)
}

pub(crate) fn decode_with_format(raw: &BigUint, format: FloatFormat) -> Result<FloatValue> {
    let total_bits = format.total_bits();
    if raw.bits() > total_bits {
        tracing::debug!(%format, bits = raw.bits(), "bit pattern wider than format");
        return Err(FormatError::BitsOutOfRange {
            bits: raw.clone(),
            total_bits,
        });
    }

    let man_bits = format.man_bits();
    let sign = raw.bit(total_bits - 1);
    let exponent = low_u64(&(raw >> man_bits)) & format.max_exponent();
    let mantissa = raw & low_mask(man_bits);

    Ok(FloatValue::new_unchecked(sign, exponent, mantissa, format))
}

/// Joins the fields of `value` into its raw bit pattern.
pub fn encode(value: &FloatValue) -> BigUint {
    let format = value.format();
    let man_bits = format.man_bits();

    let mut raw = BigUint::from(value.exponent()) << man_bits;
    raw |= value.mantissa();
    if value.sign() {
        raw.set_bit(format.total_bits() - 1, true);
    }
    raw
}

/// Renders the bit pattern of `value` grouped by field, e.g. `0_1110_111`.
/// The mantissa group is left out for formats with no mantissa bits.
pub fn to_bit_string(value: &FloatValue) -> String {
    let format = value.format();
    let sign = if value.sign() { '1' } else { '0' };
    let exponent = format!(
        "{:0width$b}",
        value.exponent(),
        width = format.exp_bits() as usize
    );

    if format.man_bits() == 0 {
        format!("{sign}_{exponent}")
    } else {
        let mantissa = format!(
            "{:0width$b}",
            value.mantissa(),
            width = format.man_bits() as usize
        );
        format!("{sign}_{exponent}_{mantissa}")
    }
}
