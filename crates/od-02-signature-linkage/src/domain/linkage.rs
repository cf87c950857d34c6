//! # Signature Linkage Check
//!
//! Token fields are positional: `[identifier, identity_key, .., signature]`.
//! The signed message is the raw concatenation of every field before the
//! signature. Both of these must hold:
//!
//! 1. the key derived from `identity_key` equals the locking key
//! 2. the signature verifies over the message under that derived key

use super::derivation::{invoice_number, KeyDeriver, KEY_ID, SECURITY_LEVEL};
use super::errors::LinkageError;
use k256::ecdsa::signature::Verifier;
use k256::ecdsa::{Signature, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::PublicKey;
use shared_types::Protocol;
use tracing::trace;

/// Whether the token's signature is linked to its locking key.
///
/// Never panics; every failure is `false`.
#[must_use]
pub fn is_token_signature_correctly_linked(locking_key: &PublicKey, fields: &[Vec<u8>]) -> bool {
    match check_linkage(locking_key, fields) {
        Ok(()) => true,
        Err(reason) => {
            trace!(%reason, "Token signature not linked");
            false
        }
    }
}

/// Linkage check reporting why it failed.
///
/// # Errors
/// Any [`LinkageError`] except `Encoding`.
pub fn check_linkage(locking_key: &PublicKey, fields: &[Vec<u8>]) -> Result<(), LinkageError> {
    let (signature, data) = fields
        .split_last()
        .filter(|(_, data)| data.len() >= 2)
        .ok_or(LinkageError::MissingFields(fields.len()))?;

    let protocol = Protocol::from_identifier(&data[0]).ok_or(LinkageError::UnknownProtocol)?;
    let identity_key =
        PublicKey::from_sec1_bytes(&data[1]).map_err(|_| LinkageError::InvalidIdentityKey)?;

    let invoice = invoice_number(
        SECURITY_LEVEL,
        protocol.config().derivation_protocol,
        KEY_ID,
    );
    let expected = KeyDeriver::anyone().derive_public_key(&identity_key, &invoice)?;

    if expected.to_encoded_point(true) != locking_key.to_encoded_point(true) {
        return Err(LinkageError::KeyMismatch);
    }

    let message = data.concat();
    verify_der(&expected, &message, signature)
}

/// Verify a DER signature over SHA-256(`message`).
pub(crate) fn verify_der(
    key: &PublicKey,
    message: &[u8],
    der: &[u8],
) -> Result<(), LinkageError> {
    let signature = Signature::from_der(der).map_err(|_| LinkageError::InvalidSignatureEncoding)?;
    let signature = signature.normalize_s().unwrap_or(signature);

    VerifyingKey::from(key)
        .verify(message, &signature)
        .map_err(|_| LinkageError::VerificationFailed)
}
