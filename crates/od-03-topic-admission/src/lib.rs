//! # Topic Admission Subsystem (OD-03)
//!
//! Decides which outputs of a transaction are admissible SHIP or SLAP
//! advertisements.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): URI and name policies, the generic
//!   validator, admission entities
//! - **Ports Layer** (`ports/`): `TopicManagerApi` (inbound) and
//!   `TransactionDecoder` (outbound)
//! - **Adapters Layer** (`adapters/`): raw transaction decoder
//! - **Service Layer** (`service.rs`): `TopicManager`, one per protocol
//!
//! ## Rejections
//!
//! Almost every output on chain is not an advertisement. Rejection is an
//! ordinary `false`, logged at `trace!` only.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::{encode_transaction, txid_of, RawTransactionDecoder};
pub use domain::entities::{
    documentation, AdmittanceInstructions, TopicManagerMetadata, Transaction, TxInput, TxOutput,
};
pub use domain::errors::{NameError, Rejection, UriError};
pub use domain::name_policy::{check_advertised_name, check_name, MAX_NAME_LEN};
pub use domain::token::AnnouncementToken;
pub use domain::uri_policy::{check_uri, is_advertisable_uri};
pub use domain::validator::{is_valid_output, validate_output, ADMISSION_FIELD_COUNT};
pub use ports::inbound::TopicManagerApi;
pub use ports::outbound::{DecodeError, TransactionDecoder};
pub use service::TopicManager;
