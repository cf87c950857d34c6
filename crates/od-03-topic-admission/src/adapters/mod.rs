//! # Adapters
//!
//! - `raw_tx`: decoder for the raw (non-BEEF) transaction serialization

pub mod raw_tx;

pub use raw_tx::{encode_transaction, txid_of, RawTransactionDecoder};
