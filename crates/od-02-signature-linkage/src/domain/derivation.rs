//! # Child Key Derivation (secp256k1)
//!
//! Deterministic, non-secret derivation scoped to a protocol:
//!
//! ```text
//! shared  = counterparty_pub × root_priv
//! h       = HMAC-SHA256(key = compressed(shared), msg = invoice) mod n
//! child_pub  = counterparty_pub + h·G
//! child_priv = root_priv + h
//! ```
//!
//! With root `anyone` (scalar 1) and counterparty = an identity key, anyone
//! can compute the identity's child public key, while only the identity's
//! owner (root = identity secret, counterparty = `anyone` public key) can
//! compute the matching private key.

use super::errors::LinkageError;
use hmac::{Hmac, Mac};
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{FieldBytes, NonZeroScalar, ProjectivePoint, PublicKey, Scalar, SecretKey, U256};
use sha2::Sha256;
use zeroize::Zeroize;

type HmacSha256 = Hmac<Sha256>;

/// Security level used by both advertisement protocols.
pub const SECURITY_LEVEL: u8 = 2;

/// Key id used by both advertisement protocols.
pub const KEY_ID: &str = "1";

/// Build the invoice number `"<level>-<protocol>-<key id>"`.
///
/// The protocol name is trimmed and lowercased.
#[must_use]
pub fn invoice_number(security_level: u8, protocol_name: &str, key_id: &str) -> String {
    format!(
        "{}-{}-{}",
        security_level,
        protocol_name.trim().to_lowercase(),
        key_id
    )
}

/// Derives child keys from a root private key.
#[derive(Clone)]
pub struct KeyDeriver {
    root: SecretKey,
}

impl KeyDeriver {
    #[must_use]
    pub fn new(root: SecretKey) -> Self {
        Self { root }
    }

    /// Deriver rooted at the publicly known scalar 1.
    #[must_use]
    pub fn anyone() -> Self {
        Self::new(anyone_secret())
    }

    /// Public key of the "anyone" counterparty (the generator point).
    #[must_use]
    pub fn anyone_public_key() -> PublicKey {
        anyone_secret().public_key()
    }

    #[must_use]
    pub fn root_public_key(&self) -> PublicKey {
        self.root.public_key()
    }

    /// Child public key of `counterparty` for `invoice`.
    ///
    /// # Errors
    /// * `LinkageError::DerivationFailed` - the child is the point at infinity
    pub fn derive_public_key(
        &self,
        counterparty: &PublicKey,
        invoice: &str,
    ) -> Result<PublicKey, LinkageError> {
        let tweak = self.tweak(counterparty, invoice);
        let child = counterparty.to_projective() + ProjectivePoint::GENERATOR * tweak;
        PublicKey::from_affine(child.to_affine()).map_err(|_| LinkageError::DerivationFailed)
    }

    /// Child private key of this root for `invoice`, shared with `counterparty`.
    ///
    /// # Errors
    /// * `LinkageError::DerivationFailed` - the child scalar is zero
    pub fn derive_private_key(
        &self,
        counterparty: &PublicKey,
        invoice: &str,
    ) -> Result<SecretKey, LinkageError> {
        let tweak = self.tweak(counterparty, invoice);
        let child = *self.root.to_nonzero_scalar() + tweak;
        Option::<NonZeroScalar>::from(NonZeroScalar::new(child))
            .map(SecretKey::from)
            .ok_or(LinkageError::DerivationFailed)
    }

    /// `HMAC(compressed(counterparty × root), invoice)` reduced mod n.
    fn tweak(&self, counterparty: &PublicKey, invoice: &str) -> Scalar {
        let shared = counterparty.to_projective() * *self.root.to_nonzero_scalar();
        let mut shared_bytes = shared.to_affine().to_encoded_point(true).as_bytes().to_vec();

        let mut mac = <HmacSha256 as Mac>::new_from_slice(&shared_bytes)
            .expect("HMAC accepts keys of any length");
        mac.update(invoice.as_bytes());
        let mut digest = mac.finalize().into_bytes();

        let scalar = <Scalar as Reduce<U256>>::reduce_bytes(&FieldBytes::clone_from_slice(&digest));

        shared_bytes.zeroize();
        digest.as_mut_slice().zeroize();
        scalar
    }
}

impl std::fmt::Debug for KeyDeriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyDeriver")
            .field("root_public_key", &self.root_public_key())
            .finish_non_exhaustive()
    }
}

fn anyone_secret() -> SecretKey {
    let mut one = FieldBytes::default();
    one[31] = 1;
    SecretKey::from_bytes(&one).expect("1 is a valid scalar")
}
