//! # Error Types
//!
//! Parse errors for the shared vocabulary.

use thiserror::Error;

/// Errors raised while parsing shared types from text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeError {
    /// Protocol name is neither SHIP nor SLAP.
    #[error("Unknown protocol: {0}")]
    UnknownProtocol(String),

    /// Transaction id is not 64 hex characters.
    #[error("Invalid txid: {0}")]
    InvalidTxid(String),

    /// Outpoint is not `<txid>.<index>`.
    #[error("Invalid outpoint: {0}")]
    InvalidOutpoint(String),

    /// Sort order is neither `asc` nor `desc`.
    #[error("Invalid sort order: {0}")]
    InvalidSortOrder(String),
}
