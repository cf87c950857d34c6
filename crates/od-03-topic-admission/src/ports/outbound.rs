//! # Outbound Ports (Driven Ports / SPI)
//!
//! Traits that define dependencies this subsystem needs.

use crate::domain::entities::Transaction;
use thiserror::Error;

/// Error from envelope decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Input ended inside a field
    #[error("Transaction truncated")]
    Truncated,

    /// A length prefix exceeds the remaining input
    #[error("Length {0} exceeds remaining input")]
    LengthOverflow(u64),

    /// Bytes left after the lock time
    #[error("{0} trailing bytes after transaction")]
    TrailingBytes(usize),
}

/// Parses the outer transaction envelope.
pub trait TransactionDecoder: Send + Sync {
    /// Decode `bytes` into a transaction.
    ///
    /// # Errors
    /// * `DecodeError` - `bytes` is not a complete, well-formed transaction
    fn decode(&self, bytes: &[u8]) -> Result<Transaction, DecodeError>;
}
