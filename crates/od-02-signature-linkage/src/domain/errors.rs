//! # Linkage Errors
//!
//! Reasons a token fails the linkage check. Callers on the admission path
//! collapse these to `false`; they exist for diagnostics and tests.

use od_01_pushdrop_codec::CodecError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LinkageError {
    /// Fewer than identifier, identity key and signature.
    #[error("Token has {0} fields, need at least 3")]
    MissingFields(usize),

    /// Field 0 names neither SHIP nor SLAP.
    #[error("Unknown protocol identifier")]
    UnknownProtocol,

    /// Field 1 is not a valid secp256k1 point.
    #[error("Invalid identity key")]
    InvalidIdentityKey,

    /// Derivation produced the point at infinity.
    #[error("Key derivation failed")]
    DerivationFailed,

    /// Derived key differs from the locking key.
    #[error("Locking key is not derived from the identity key")]
    KeyMismatch,

    /// Signature is not valid DER.
    #[error("Invalid signature encoding")]
    InvalidSignatureEncoding,

    /// Signature does not verify under the derived key.
    #[error("Signature verification failed")]
    VerificationFailed,

    /// Building the locking script failed.
    #[error("Script encoding failed: {0}")]
    Encoding(#[from] CodecError),
}
