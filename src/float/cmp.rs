use std::cmp::Ordering;

use crate::float::round::Unpacked;
use crate::float::{FloatClass, FloatValue};

impl FloatValue {
    /// Bit-for-bit identity, including the format. Unlike `==`, identical NaNs
    /// are identical and `+0` is not identical to `-0`.
    pub fn is_identical(&self, other: &FloatValue) -> bool {
        self.format == other.format
            && self.sign == other.sign
            && self.exponent == other.exponent
            && self.mantissa == other.mantissa
    }

    /// -1, 0 or 1, treating both zeros as 0.
    fn signum(&self) -> i8 {
        match (self.is_zero(), self.sign) {
            (true, _) => 0,
            (false, true) => -1,
            (false, false) => 1,
        }
    }

    /// Orders two non-NaN values by their exact real value.
    fn cmp_non_nan(&self, other: &FloatValue) -> Ordering {
        let by_sign = self.signum().cmp(&other.signum());
        if by_sign != Ordering::Equal || self.signum() == 0 {
            return by_sign;
        }

        let magnitude = cmp_magnitude(self, other);
        if self.sign {
            magnitude.reverse()
        } else {
            magnitude
        }
    }
}

/// Compares `|a|` and `|b|` for nonzero, non-NaN values of any formats
/// without rounding either of them.
fn cmp_magnitude(a: &FloatValue, b: &FloatValue) -> Ordering {
    match (a.unpack(), b.unpack()) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => cmp_unpacked(&a, &b),
    }
}

fn cmp_unpacked(a: &Unpacked, b: &Unpacked) -> Ordering {
    let by_leading = a.leading_exponent().cmp(&b.leading_exponent());
    if by_leading != Ordering::Equal {
        return by_leading;
    }

    // Same leading exponent: pad both significands to the same length, which
    // puts them on the same scale.
    let width = a.significand.bits().max(b.significand.bits());
    let (mut a, mut b) = (a.clone(), b.clone());
    a.widen_to(width);
    b.widen_to(width);
    a.significand.cmp(&b.significand)
}

/// Values compare by their exact real value, whatever their formats.
/// `+0 == -0`, and a NaN operand makes every comparison false, `!=`
/// included.
impl PartialEq for FloatValue {
    fn eq(&self, other: &FloatValue) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }

    #[allow(clippy::partialeq_ne_impl)]
    fn ne(&self, other: &FloatValue) -> bool {
        matches!(
            self.partial_cmp(other),
            Some(Ordering::Less | Ordering::Greater)
        )
    }
}

impl PartialOrd for FloatValue {
    fn partial_cmp(&self, other: &FloatValue) -> Option<Ordering> {
        if self.classify() == FloatClass::NaN || other.classify() == FloatClass::NaN {
            return None;
        }
        Some(self.cmp_non_nan(other))
    }
}
