use thiserror::Error;

/// Why a structural code was rejected by the strict parser.
///
/// `index` always counts positions in the expanded (unpacked) token stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    #[error("token {index} ({token:?}) is not an integer")]
    Malformed { index: usize, token: String },

    #[error("token {index} is negative ({value})")]
    Negative { index: usize, value: i64 },

    #[error("token {index} ({value}) is outside the alphabet [0, {degree})")]
    OutOfAlphabet { index: usize, value: i64, degree: u32 },

    #[error("expected {expected} digits, found {found}")]
    DigitCount { expected: usize, found: usize },
}
