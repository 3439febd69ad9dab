use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid change code: {0}")]
    InvalidCode(String),

    #[error("unknown change code bits: {0:#04x}")]
    UnknownBits(u8),
}
