//! # Signature Linkage Subsystem (OD-02)
//!
//! Binds "who signed an announcement" to "who can spend it".
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Pure key derivation and ECDSA logic, no I/O
//! - **Ports Layer** (`ports/`): Trait definition for the inbound API
//! - **Service Layer** (`service.rs`): Wires domain logic to the port
//!
//! ## Linkage Rule
//!
//! For a token with fields `[id, identity_key, uri, name, signature]`:
//!
//! 1. Derive `expected = identity_key + HMAC(identity_key, invoice)·G`
//!    where `invoice = "2-<protocol name>-1"` and the counterparty is "anyone".
//! 2. `expected` must equal the output's locking key.
//! 3. `signature` must verify over `id || identity_key || uri || name`
//!    under `expected`.
//!
//! ## Security Notes
//!
//! - Every failure path yields `false`; a malformed candidate never aborts
//!   the scan of the surrounding transaction.
//! - High-S signatures are normalized before verification.

pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use domain::derivation::{invoice_number, KeyDeriver, KEY_ID, SECURITY_LEVEL};
pub use domain::errors::LinkageError;
pub use domain::linkage::{check_linkage, is_token_signature_correctly_linked};
pub use domain::signer::AnnouncementSigner;
pub use ports::inbound::SignatureLinkageApi;
pub use service::SignatureLinkageService;
