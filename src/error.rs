//! Construction errors

use num_bigint::BigUint;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Invalid exponent width: {exp_bits} (must be 1-{max})", max = crate::format::MAX_EXP_BITS)]
    InvalidExponentWidth { exp_bits: u32 },

    #[error("Bit pattern {bits:#b} does not fit in a {total_bits}-bit format")]
    BitsOutOfRange { bits: BigUint, total_bits: u64 },

    #[error("The {field} field does not fit in {width} bits")]
    FieldOutOfRange { field: &'static str, width: u32 },
}

pub type Result<T> = std::result::Result<T, FormatError>;
