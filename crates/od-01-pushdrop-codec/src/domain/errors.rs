//! # Codec Errors

use thiserror::Error;

/// Errors raised while tokenizing or building a script.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// A push opcode announces more bytes than remain in the script.
    #[error("Truncated push at offset {offset}: need {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A token must carry at least one field.
    #[error("Cannot encode a token without fields")]
    NoFields,

    /// Field exceeds the largest push the script format can express.
    #[error("Field of {0} bytes exceeds the maximum push size")]
    FieldTooLarge(usize),
}
