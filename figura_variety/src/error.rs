use figura_structure::System;
use thiserror::Error;

/// Errors from configuring or running a variety.
///
/// Reaching the cap or the sieve ceiling is not an error; see
/// `Variety::is_capped` and the generator's log output.
#[derive(Debug, Error)]
pub enum VarietyError {
    #[error("mask is built on {mask}, but the variety uses {variety}")]
    MaskSystemMismatch { mask: System, variety: System },

    #[error("binary class enumeration needs degree 2, got degree {0}")]
    NotBinary(u32),

    #[error("variety has already been generated")]
    AlreadyGenerated,

    #[error("failed to read generator config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid generator config: {0}")]
    Config(#[from] serde_json::Error),
}
