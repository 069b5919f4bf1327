//! # Error Types
//!
//! Errors raised while decoding or encoding account identifiers.

use thiserror::Error;

/// Errors that can occur while handling account identifier strings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountError {
    /// The identifier was empty or only whitespace.
    #[error("empty address string is not allowed")]
    Empty,

    /// The identifier is not valid bech32.
    #[error("decoding bech32 failed: {0}")]
    Bech32(String),

    /// The human-readable prefix does not belong to this chain.
    #[error("invalid Bech32 prefix; expected {expected}, got {actual}")]
    WrongPrefix { expected: String, actual: String },

    /// Decoded payload has an unsupported length.
    #[error("address length must be between 1 and {max} bytes, got {actual}")]
    InvalidLength { actual: usize, max: usize },
}
