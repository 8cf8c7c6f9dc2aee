//! # VarFloat
//!
//! Binary floating-point numbers whose exponent and mantissa widths are
//! chosen per value at runtime. VarFloat reproduces IEEE 754 semantics (biased
//! exponent, implicit leading bit, subnormals, signed zeros, infinities, NaN
//! and round-to-nearest-even) for any `(exp_bits, man_bits)` pair, which makes
//! it suitable for bit-accurate simulation of custom formats such as e4m3,
//! e5m2 or bfloat16.
//!
//! ## Overview
//!
//! VarFloat provides:
//! - **Runtime formats**: every value carries its own [`FloatFormat`]
//! - **Exact bit patterns**: encode and decode without rounding
//! - **Correct rounding**: every finite result is rounded once, to nearest even
//! - **Mixed precision**: binary operations promote to the wider of each field
//! - **Total arithmetic**: undefined results are NaN, never errors
//!
//! ## Architecture
//!
//! ### Format
//! [`FloatFormat`] validates the field widths and derives the bias and the
//! reserved exponent. The exponent field holds up to
//! [`MAX_EXP_BITS`](format::MAX_EXP_BITS) bits; the mantissa is backed by a
//! `BigUint` and has no fixed limit.
//!
//! ### Codec
//! [`codec`] splits raw bit patterns into sign, exponent and mantissa fields
//! and joins them back.
//!
//! ### FloatValue
//! [`FloatValue`] implements classification, conversion to and from `f64`,
//! exact cross-format comparison and arithmetic.
//!
//! ## Quick Start
//!
//! ```rust
//! use varfloat::FloatValue;
//!
//! // e4m3: 4 exponent bits, 3 mantissa bits
//! let x = FloatValue::from_float(3.0, 4, 3).unwrap();
//! let y = FloatValue::from_float(0.4, 4, 3).unwrap();
//! assert_eq!(y.to_float(), 0.40625);
//!
//! let sum = &x + &y;
//! assert_eq!(sum.to_float(), 3.5);
//!
//! // Operands of different formats compare by their exact value
//! let wide = FloatValue::from_float(3.0, 8, 23).unwrap();
//! assert!(x == wide);
//! ```
//!
//! ## Special Values
//!
//! ```rust
//! use varfloat::prelude::*;
//!
//! let format = FloatFormat::new(5, 2).unwrap();
//! let inf = FloatValue::infinity(false, format);
//! let nan = FloatValue::nan(false, format);
//!
//! assert!((&inf - &inf).is_nan());
//! // NaN is unordered: every comparison is false, `!=` included
//! assert!(!(nan == nan) && !(nan != nan));
//! assert_eq!(FloatValue::zero(true, format).to_string(), "-0");
//! ```

pub mod codec;
pub mod error;
pub mod float;
pub mod format;

// Re-export the main types for convenience
pub use error::{FormatError, Result};
pub use float::{FloatClass, FloatValue};
pub use format::FloatFormat;

pub mod prelude {
    //! Prelude module for VarFloat.
    //!
    //! Re-exports the types needed to build and inspect values.

    pub use crate::error::FormatError;
    pub use crate::float::{FloatClass, FloatValue};
    pub use crate::format::FloatFormat;
}
