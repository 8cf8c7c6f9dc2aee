use num_traits::Zero;

use crate::float::FloatValue;

/// The class of a value, derived from its exponent and mantissa fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatClass {
    Zero,
    Subnormal,
    Normal,
    Infinity,
    NaN,
}

impl FloatValue {
    pub fn classify(&self) -> FloatClass {
        let mantissa_is_zero = self.mantissa.is_zero();
        if self.exponent == 0 {
            if mantissa_is_zero {
                FloatClass::Zero
            } else {
                FloatClass::Subnormal
            }
        } else if self.exponent == self.format.max_exponent() {
            if mantissa_is_zero {
                FloatClass::Infinity
            } else {
                FloatClass::NaN
            }
        } else {
            FloatClass::Normal
        }
    }

    pub fn is_nan(&self) -> bool {
        self.classify() == FloatClass::NaN
    }

    pub fn is_inf(&self) -> bool {
        self.classify() == FloatClass::Infinity
    }

    pub fn is_zero(&self) -> bool {
        self.classify() == FloatClass::Zero
    }

    pub fn is_normal(&self) -> bool {
        self.classify() == FloatClass::Normal
    }

    pub fn is_subnormal(&self) -> bool {
        self.classify() == FloatClass::Subnormal
    }

    pub fn is_finite(&self) -> bool {
        !matches!(self.classify(), FloatClass::Infinity | FloatClass::NaN)
    }
}
