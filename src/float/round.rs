//! Exact unpacking and round-to-nearest-even packing.
//!
//! Every finite result in the crate, whether it comes from `f64`, from another
//! format or from an arithmetic operation, is produced by [`quantize`]. It
//! takes an exact magnitude `significand * 2^exponent` of any length and
//! rounds it once into the target format.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::float::{FloatClass, FloatValue};
use crate::format::FloatFormat;

/// The exact magnitude of a finite value: `significand * 2^exponent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Unpacked {
    pub sign: bool,
    pub significand: BigUint,
    pub exponent: i64,
}

impl Unpacked {
    /// Exponent of the leading one, so the magnitude lies in
    /// `[2^e, 2^(e + 1))`. The significand must be nonzero.
    pub fn leading_exponent(&self) -> i64 {
        self.exponent + self.significand.bits() as i64 - 1
    }

    /// Shifts the significand left so it has exactly `width` bits, keeping
    /// the value unchanged. `width` must be at least the current length.
    pub fn widen_to(&mut self, width: u64) {
        let shift = width - self.significand.bits();
        self.significand <<= shift;
        self.exponent -= shift as i64;
    }
}

impl FloatValue {
    /// Exact magnitude of a finite value. Zero unpacks to a zero significand.
    /// Subnormals keep their leading zeros; `quantize` and `widen_to` deal
    /// with significands of any length, so no explicit normalization is done.
    pub(crate) fn unpack(&self) -> Option<Unpacked> {
        let man_bits = self.format.man_bits();
        let scale = self.format.min_exponent() - i64::from(man_bits);
        match self.classify() {
            FloatClass::NaN | FloatClass::Infinity => None,
            FloatClass::Zero | FloatClass::Subnormal => Some(Unpacked {
                sign: self.sign,
                significand: self.mantissa.clone(),
                exponent: scale,
            }),
            FloatClass::Normal => {
                let mut significand = self.mantissa.clone();
                significand.set_bit(u64::from(man_bits), true);
                Some(Unpacked {
                    sign: self.sign,
                    significand,
                    exponent: self.exponent as i64 - self.format.bias() - i64::from(man_bits),
                })
            }
        }
    }
}

/// Shifts `value` right by `shift` bits, OR-ing every bit shifted out into
/// the lowest bit of the result.
pub(crate) fn shift_right_sticky(value: &BigUint, shift: u64) -> BigUint {
    if shift == 0 {
        return value.clone();
    }
    if shift >= value.bits() {
        return if value.is_zero() {
            BigUint::ZERO
        } else {
            BigUint::one()
        };
    }

    let mut shifted = value >> shift;
    if has_bits_below(value, shift) {
        shifted.set_bit(0, true);
    }
    shifted
}

/// Whether any of the lowest `n_bits` bits of `value` is set.
fn has_bits_below(value: &BigUint, n_bits: u64) -> bool {
    value.trailing_zeros().is_some_and(|zeros| zeros < n_bits)
}

/// Rounds the exact magnitude `significand * 2^exponent` into `format` with
/// round-to-nearest-even.
///
/// The quantum is `2^(e - man_bits)` for a leading exponent `e` in the normal
/// range and the subnormal quantum `2^(min_exponent - man_bits)` below it.
/// With `G` the first discarded bit and `T` the OR of the remaining ones,
/// the kept bits are incremented when `G & (lsb | T)`. A carry out of the
/// mantissa bumps the exponent, and an exponent past the largest finite one
/// gives infinity. Magnitudes at or below half the smallest subnormal round
/// to zero.
pub(crate) fn quantize(
    sign: bool,
    significand: &BigUint,
    exponent: i64,
    format: FloatFormat,
) -> FloatValue {
    if significand.is_zero() {
        return FloatValue::zero(sign, format);
    }

    let man_bits = format.man_bits();
    let leading = exponent + significand.bits() as i64 - 1;
    if leading > format.max_finite_exponent() {
        tracing::trace!(%format, leading, "overflow to infinity");
        return FloatValue::infinity(sign, format);
    }

    let quantum = leading.max(format.min_exponent()) - i64::from(man_bits);
    let shift = quantum - exponent;

    let kept = if shift <= 0 {
        significand << shift.unsigned_abs()
    } else {
        let shift = shift.unsigned_abs();
        let mut kept = significand >> shift;
        let guard = significand.bit(shift - 1);
        let sticky = has_bits_below(significand, shift - 1);
        if guard && (sticky || kept.bit(0)) {
            kept += 1_u8;
        }
        kept
    };

    if kept.is_zero() {
        tracing::trace!(%format, leading, "underflow to zero");
        return FloatValue::zero(sign, format);
    }

    // `kept` now has at most `man_bits + 2` bits. In the normal range the
    // leading one is the implicit bit; below it the field exponent is zero
    // unless rounding reached the smallest normal.
    let kept_bits = kept.bits() as i64;
    let (biased, mantissa) = if kept_bits > i64::from(man_bits) {
        // A carry only happens on `kept == 2^(man_bits + 1)`, so the bit
        // shifted out here is zero.
        let carry = kept_bits - 1 - i64::from(man_bits);
        let mantissa = (&kept >> carry as u64) - (BigUint::one() << man_bits);
        (quantum + carry + i64::from(man_bits) + format.bias(), mantissa)
    } else {
        (0, kept)
    };

    if biased >= format.max_exponent() as i64 {
        tracing::trace!(%format, leading, "rounded up to infinity");
        return FloatValue::infinity(sign, format);
    }

    FloatValue::new_unchecked(sign, biased as u64, mantissa, format)
}
