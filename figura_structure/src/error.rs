use figura_code::CodeError;
use thiserror::Error;

/// Errors raised when building a system or structure from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("degree must be at least 1")]
    InvalidDegree,

    #[error("capacity {degree}^{order} does not fit in 128 bits")]
    CapacityOverflow { degree: u32, order: usize },

    #[error("expected {expected} digits, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("digit {digit} at position {position} is outside [0, {degree})")]
    DigitOutOfRange {
        position: usize,
        digit: u32,
        degree: u32,
    },

    #[error("malformed structural code: {0}")]
    Code(#[from] CodeError),
}
