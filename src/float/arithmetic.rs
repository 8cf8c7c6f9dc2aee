//! # Arithmetic
//!
//! Negation, absolute value, addition, subtraction and multiplication.
//!
//! Binary operations accept operands of different formats. The result uses
//! the promoted format (the wider exponent field and the wider mantissa
//! field of the two operands), so it never has less precision than either
//! operand. Every finite result is rounded exactly once, to nearest even.
//!
//! Arithmetic never fails: an undefined result such as `inf - inf` or
//! `0 * inf` is NaN.
//!
//! ## Examples
//!
//! ```rust
//! use varfloat::FloatValue;
//!
//! let a = FloatValue::from_float(2.75, 5, 5).unwrap();
//! let b = FloatValue::from_float(2.5, 6, 7).unwrap();
//!
//! let sum = &a + &b;
//! assert_eq!((sum.exp_bits(), sum.man_bits()), (6, 7));
//! assert_eq!(sum.to_float(), 5.25);
//!
//! let product = a * FloatValue::from_float(2.0, 6, 6).unwrap();
//! assert_eq!((product.exp_bits(), product.man_bits()), (6, 6));
//! assert_eq!(product.to_float(), 5.5);
//! ```

use std::cmp::Ordering;
use std::ops::{Add, Mul, Neg, Sub};

use num_bigint::BigUint;

use crate::float::FloatValue;
use crate::float::round::{Unpacked, quantize, shift_right_sticky};
use crate::format::FloatFormat;

/// Bits kept below the target precision while aligning addends: guard,
/// round and sticky.
const GUARD_BITS: u64 = 3;

impl FloatValue {
    pub fn abs(&self) -> Self {
        Self {
            sign: false,
            exponent: self.exponent,
            mantissa: self.mantissa.clone(),
            format: self.format,
        }
    }

    fn negated(&self) -> Self {
        Self {
            sign: !self.sign,
            exponent: self.exponent,
            mantissa: self.mantissa.clone(),
            format: self.format,
        }
    }
}

fn add(lhs: &FloatValue, rhs: &FloatValue) -> FloatValue {
    let format = FloatFormat::promote(lhs.format, rhs.format);

    if lhs.is_nan() || rhs.is_nan() {
        return FloatValue::nan(false, format);
    }
    match (lhs.is_inf(), rhs.is_inf()) {
        (true, true) if lhs.sign != rhs.sign => return FloatValue::nan(false, format),
        (true, _) => return FloatValue::infinity(lhs.sign, format),
        (_, true) => return FloatValue::infinity(rhs.sign, format),
        (false, false) => {}
    }
    match (lhs.is_zero(), rhs.is_zero()) {
        (true, true) => return FloatValue::zero(lhs.sign && rhs.sign, format),
        (true, false) => return rhs.cast_to(format),
        (false, true) => return lhs.cast_to(format),
        (false, false) => {}
    }

    let (Some(lhs), Some(rhs)) = (lhs.unpack(), rhs.unpack()) else {
        unreachable!("finite operands always unpack");
    };
    add_finite(lhs, rhs, format)
}

/// Adds two nonzero finite magnitudes.
///
/// Both significands are widened to `man_bits + 1 + GUARD_BITS` bits, then
/// the one with the smaller exponent is shifted right to line up with the
/// other. Bits shifted out collapse into a sticky bit, which is enough for
/// round-to-nearest-even since at most one bit of cancellation can happen
/// once anything has been shifted out.
fn add_finite(mut lhs: Unpacked, mut rhs: Unpacked, format: FloatFormat) -> FloatValue {
    let width = u64::from(format.man_bits()) + 1 + GUARD_BITS;
    lhs.widen_to(width);
    rhs.widen_to(width);

    let ordering = (lhs.exponent, &lhs.significand).cmp(&(rhs.exponent, &rhs.significand));
    let (big, small) = match ordering {
        Ordering::Less => (rhs, lhs),
        Ordering::Equal | Ordering::Greater => (lhs, rhs),
    };
    let aligned = shift_right_sticky(&small.significand, (big.exponent - small.exponent) as u64);

    let (sign, significand) = if big.sign == small.sign {
        (big.sign, big.significand + aligned)
    } else {
        (big.sign, big.significand - aligned)
    };

    // Exact cancellation is +0
    let sign = sign && significand.bits() != 0;
    quantize(sign, &significand, big.exponent, format)
}

fn mul(lhs: &FloatValue, rhs: &FloatValue) -> FloatValue {
    let format = FloatFormat::promote(lhs.format, rhs.format);
    let sign = lhs.sign ^ rhs.sign;

    if lhs.is_nan() || rhs.is_nan() {
        return FloatValue::nan(false, format);
    }
    if lhs.is_inf() || rhs.is_inf() {
        if lhs.is_zero() || rhs.is_zero() {
            return FloatValue::nan(false, format);
        }
        return FloatValue::infinity(sign, format);
    }
    if lhs.is_zero() || rhs.is_zero() {
        return FloatValue::zero(sign, format);
    }

    let (Some(lhs), Some(rhs)) = (lhs.unpack(), rhs.unpack()) else {
        unreachable!("finite operands always unpack");
    };
    let significand: BigUint = lhs.significand * rhs.significand;
    quantize(sign, &significand, lhs.exponent + rhs.exponent, format)
}

impl Neg for FloatValue {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            sign: !self.sign,
            ..self
        }
    }
}

impl Neg for &FloatValue {
    type Output = FloatValue;

    fn neg(self) -> Self::Output {
        self.negated()
    }
}

macro_rules! impl_binop {
    ($trait:ident, $method:ident, |$lhs:ident, $rhs:ident| $body:expr) => {
        impl $trait<&FloatValue> for &FloatValue {
            type Output = FloatValue;

            fn $method(self, other: &FloatValue) -> Self::Output {
                let ($lhs, $rhs) = (self, other);
                $body
            }
        }

        impl $trait<FloatValue> for &FloatValue {
            type Output = FloatValue;

            fn $method(self, other: FloatValue) -> Self::Output {
                self.$method(&other)
            }
        }

        impl $trait<&FloatValue> for FloatValue {
            type Output = FloatValue;

            fn $method(self, other: &FloatValue) -> Self::Output {
                (&self).$method(other)
            }
        }

        impl $trait<FloatValue> for FloatValue {
            type Output = FloatValue;

            fn $method(self, other: FloatValue) -> Self::Output {
                (&self).$method(&other)
            }
        }
    };
}

impl_binop!(Add, add, |lhs, rhs| add(lhs, rhs));
impl_binop!(Sub, sub, |lhs, rhs| add(lhs, &rhs.negated()));
impl_binop!(Mul, mul, |lhs, rhs| mul(lhs, rhs));

#[cfg(test)]
mod tests {
    use rand::Rng;
    use rstest::rstest;

    use super::*;
    use crate::tests::*;

    fn float(value: f64, exp_bits: u32, man_bits: u32) -> FloatValue {
        FloatValue::from_float(value, exp_bits, man_bits).unwrap()
    }

    #[rstest]
    #[case(13.0)]
    #[case(-13.0)]
    #[case(0.0)]
    #[case(-0.0)]
    #[case(f64::INFINITY)]
    #[case(f64::NEG_INFINITY)]
    fn test_negation(#[case] value: f64) {
        let x = float(value, 5, 5);
        let negated = (-&x).to_float();
        assert_eq!(negated, -value);
        assert_eq!(negated.is_sign_negative(), !value.is_sign_negative());
        assert!((-(-x.clone())).is_identical(&x));
    }

    #[rstest]
    #[case(13.0)]
    #[case(-13.0)]
    #[case(0.0)]
    #[case(-0.0)]
    #[case(f64::INFINITY)]
    #[case(f64::NEG_INFINITY)]
    fn test_abs(#[case] value: f64) {
        let x = float(value, 5, 5);
        let abs = x.abs().to_float();
        assert_eq!(abs, value.abs());
        assert!(abs.is_sign_positive());
        assert!((-&x).abs().is_identical(&x.abs()));
    }

    #[rstest]
    fn test_add_representable(
        #[values((2.75, 2.5), (2.5, 2.75), (2.75, 16.5), (16.5, 2.75), (2.5, 16.5), (16.5, 2.5),
                 (2.75, 0.0), (0.0, 2.75), (2.5, 0.0), (0.0, 2.5), (16.5, 0.0), (0.0, 16.5))]
        operands: (f64, f64),
        #[values((1.0, 1.0), (1.0, -1.0), (-1.0, 1.0), (-1.0, -1.0))] signs: (f64, f64),
        #[values((5, 6), (6, 5), (5, 10), (10, 5), (6, 10), (10, 6))] exp: (u32, u32),
        #[values((5, 6), (6, 5), (5, 10), (10, 5), (6, 10), (10, 6))] man: (u32, u32),
    ) {
        let lhs = signs.0 * operands.0;
        let rhs = signs.1 * operands.1;
        let result = float(lhs, exp.0, man.0) + float(rhs, exp.1, man.1);
        assert_eq!(result.to_float(), lhs + rhs, "{lhs} + {rhs}");
        assert_eq!(result.exp_bits(), exp.0.max(exp.1));
        assert_eq!(result.man_bits(), man.0.max(man.1));
    }

    #[rstest]
    fn test_mul_mixed(
        #[values((2.75, 2.5), (2.5, 2.75), (2.75, 0.0), (0.0, 2.75), (2.5, 0.0), (0.0, 2.5))]
        operands: (f64, f64),
        #[values((1.0, 1.0), (1.0, -1.0), (-1.0, 1.0), (-1.0, -1.0))] signs: (f64, f64),
        #[values(5, 6, 7, 8)] exp0: u32,
        #[values(5, 6, 7, 8)] exp1: u32,
        #[values(5, 8)] man0: u32,
        #[values(5, 8)] man1: u32,
    ) {
        let lhs = signs.0 * operands.0;
        let rhs = signs.1 * operands.1;
        let result = float(lhs, exp0, man0) * float(rhs, exp1, man1);
        let expected = lhs * rhs;
        assert_eq!(result.to_float(), expected, "{lhs} * {rhs}");
        assert_eq!(result.sign(), expected.is_sign_negative());
        assert_eq!(result.exp_bits(), exp0.max(exp1));
        assert_eq!(result.man_bits(), man0.max(man1));
    }

    #[test]
    fn test_promotion() {
        let sum = float(2.75, 5, 5) + float(2.5, 6, 7);
        assert_eq!((sum.exp_bits(), sum.man_bits()), (6, 7));
        assert_eq!(sum.to_float(), 5.25);

        let product = float(2.75, 5, 5) * float(2.0, 6, 6);
        assert_eq!((product.exp_bits(), product.man_bits()), (6, 6));
        assert_eq!(product.to_float(), 5.5);
    }

    #[rstest]
    #[case(float(2.75, 6, 5), float(2.5, 5, 7), 0.25)]
    #[case(float(2.5, 5, 7), float(2.75, 6, 5), -0.25)]
    #[case(float(4.0, 9, 5), float(16.0, 5, 12), -12.0)]
    #[case(float(16.0, 5, 12), float(4.0, 9, 5), 12.0)]
    #[case(float(12.0, 9, 4), float(-4.0, 5, 14), 16.0)]
    #[case(float(-4.0, 5, 14), float(12.0, 9, 4), -16.0)]
    #[case(float(5.75, 15, 5), float(0.0, 5, 12), 5.75)]
    #[case(float(0.0, 5, 12), float(5.75, 15, 5), -5.75)]
    fn test_sub(#[case] lhs: FloatValue, #[case] rhs: FloatValue, #[case] expected: f64) {
        let format = FloatFormat::promote(lhs.format(), rhs.format());
        let result = &lhs - &rhs;
        assert_eq!(result.to_float(), expected);
        assert_eq!(result.format(), format);
    }

    #[test]
    fn test_special_addition() {
        let inf = float(f64::INFINITY, 5, 5);
        let neg_inf = float(f64::NEG_INFINITY, 5, 5);
        let one = float(1.0, 4, 3);
        let nan = float(f64::NAN, 4, 3);

        assert!((&inf + &one).is_inf());
        assert!(!(&inf + &one).sign());
        assert!((&neg_inf + &one).sign());
        assert!((&inf + &inf).is_inf());
        assert!((&inf + &neg_inf).is_nan());
        assert!((&inf - &inf).is_nan());
        assert!((&nan + &one).is_nan());
        assert!((&one + &nan).is_nan());
        assert!((&nan + &inf).is_nan());

        let pos_zero = float(0.0, 5, 5);
        let neg_zero = float(-0.0, 5, 5);
        assert!(!(&pos_zero + &pos_zero).sign());
        assert!((&neg_zero + &neg_zero).sign());
        assert!(!(&pos_zero + &neg_zero).sign());
        assert!(!(&neg_zero + &pos_zero).sign());
        assert!((&neg_zero - &pos_zero).sign());

        let x = float(-3.25, 5, 5);
        assert!((&x + &pos_zero).is_identical(&x));
        assert!((&x + &neg_zero).is_identical(&x));

        // x - x is +0
        let difference = &x - &x;
        assert!(difference.is_zero() && !difference.sign());
    }

    #[test]
    fn test_special_multiplication() {
        let inf = float(f64::INFINITY, 5, 5);
        let neg_inf = float(f64::NEG_INFINITY, 5, 5);
        let two = float(2.0, 4, 3);
        let neg_zero = float(-0.0, 4, 3);

        assert!((&inf * &two).is_inf() && !(&inf * &two).sign());
        assert!((&neg_inf * &two).sign());
        assert!((&inf * &neg_inf).is_inf() && (&inf * &neg_inf).sign());
        assert!((&neg_inf * &neg_inf).is_inf() && !(&neg_inf * &neg_inf).sign());
        assert!((&inf * &neg_zero).is_nan());
        assert!((&neg_zero * &inf).is_nan());
        assert!((&neg_zero * &two).is_zero() && (&neg_zero * &two).sign());
        assert!((&neg_zero * &neg_zero).is_zero() && !(&neg_zero * &neg_zero).sign());
        assert!((float(f64::NAN, 5, 5) * &two).is_nan());
    }

    #[test]
    fn test_nan_results_e5m2() {
        let inf = float(f64::INFINITY, 5, 2);
        let zero = float(0.0, 5, 2);
        let nan = FloatValue::from_bits(0b1_11111_01_u32, 5, 2).unwrap();
        for result in [&inf - &inf, &inf * &zero, &nan + &zero, &nan * &inf] {
            assert!(result.is_nan());
            assert_ne!(result.mantissa() & BigUint::from(0b11_u8), BigUint::ZERO);
        }
    }

    #[test]
    fn test_overflow_and_underflow() {
        let max = float(240.0, 4, 3);
        assert!((&max + &max).is_inf());
        assert!((&max * &float(2.0, 4, 3)).is_inf());
        assert!((-&max - &max).sign());

        let min_subnormal = float(2.0_f64.powi(-9), 4, 3);
        let half = float(0.5, 4, 3);
        let product = &min_subnormal * &half;
        assert!(product.is_zero());
        let product = &min_subnormal * &float(1.5, 4, 3);
        assert_eq!(product.to_float(), 2.0 * 2.0_f64.powi(-9));

        // Two subnormals add up to the smallest normal
        let max_subnormal = float(7.0 * 2.0_f64.powi(-9), 4, 3);
        let sum = &max_subnormal + &min_subnormal;
        assert!(sum.is_normal());
        assert_eq!(sum.to_float(), 2.0_f64.powi(-6));
    }

    #[test]
    fn test_rounding_ties() {
        // 1 + 2^-4 is halfway between 1 and 1.125 in e4m3
        let one = float(1.0, 4, 3);
        let tiny = float(2.0_f64.powi(-4), 4, 3);
        assert_eq!((&one + &tiny).to_float(), 1.0);
        let one_eighth_more = float(1.125, 4, 3);
        assert_eq!((&one_eighth_more + &tiny).to_float(), 1.25);

        // Far apart operands only contribute a sticky bit
        let big = float(16.0, 4, 3);
        let small = float(2.0_f64.powi(-8), 4, 3);
        assert_eq!((&big + &small).to_float(), 16.0);
        assert_eq!((&big - &small).to_float(), 16.0);
        let just_below = float(15.0, 4, 3);
        assert_eq!((&just_below + &float(0.5, 4, 3)).to_float(), 16.0);
        assert_eq!((&float(18.0, 4, 3) + &small).to_float(), 18.0);
        // 17 would tie to 16, the sticky bit of the extra 1/8 breaks the tie
        assert_eq!((&big + &float(1.125, 4, 3)).to_float(), 18.0);
        assert_eq!((&big + &float(1.0, 4, 3)).to_float(), 16.0);
    }

    fn random_f32(mut rng: impl Rng) -> f32 {
        loop {
            let float = f32::from_bits(rng.random());
            if float.is_finite() {
                return float;
            }
        }
    }

    /// Draws either an arbitrary finite `f32` or one from a narrow band of
    /// exponents, so that cancellation and carries show up often.
    fn random_operand(mut rng: impl Rng) -> f32 {
        if rng.random_bool(0.5) {
            random_f32(&mut rng)
        } else {
            let exponent = rng.random_range(-3..=3);
            let significand: f32 = rng.random_range(-2.0..2.0);
            significand * 2.0_f32.powi(exponent)
        }
    }

    fn assert_same_f32(result: &FloatValue, expected: f32, message: &str) {
        if expected.is_nan() {
            assert!(result.is_nan(), "{message}: expected NaN, got {result:?}");
        } else {
            assert_eq!(
                result.to_bits(),
                BigUint::from(expected.to_bits()),
                "{message}: expected {expected:e}, got {result:?}"
            );
        }
    }

    #[rstest]
    fn test_matches_f32(mut rng: impl Rng, n_experiments: usize) {
        for _ in 0..n_experiments / 10 {
            let a = random_operand(&mut rng);
            let b = random_operand(&mut rng);
            let fa = float(f64::from(a), 8, 23);
            let fb = float(f64::from(b), 8, 23);

            assert_same_f32(&(&fa + &fb), a + b, &format!("{a:e} + {b:e}"));
            assert_same_f32(&(&fa - &fb), a - b, &format!("{a:e} - {b:e}"));
            assert_same_f32(&(&fa * &fb), a * b, &format!("{a:e} * {b:e}"));
        }
    }

    #[rstest]
    fn test_matches_f64(mut rng: impl Rng, n_experiments: usize) {
        for _ in 0..n_experiments / 10 {
            let a = random_f64(&mut rng);
            let b = if rng.random_bool(0.5) {
                random_f64(&mut rng)
            } else {
                a * rng.random_range(-4.0..4.0)
            };
            let fa = float(a, 11, 52);
            let fb = float(b, 11, 52);

            for (result, expected, op) in [(&fa + &fb, a + b, '+'), (&fa - &fb, a - b, '-'), (&fa * &fb, a * b, '*')] {
                if expected.is_nan() {
                    assert!(result.is_nan(), "{a:e} {op} {b:e}");
                } else {
                    assert_eq!(result.to_float().to_bits(), expected.to_bits(), "{a:e} {op} {b:e}");
                }
            }
        }
    }

    #[rstest]
    fn test_negation_involution(mut rng: impl Rng, n_experiments: usize) {
        for _ in 0..n_experiments / 10 {
            let exp_bits = rng.random_range(2..=11);
            let man_bits = rng.random_range(0..=52);
            let x = float(random_f64(&mut rng), exp_bits, man_bits);
            assert!((-(-&x)).is_identical(&x));
            assert!((-&x).abs().is_identical(&x.abs()));
        }
    }
}
