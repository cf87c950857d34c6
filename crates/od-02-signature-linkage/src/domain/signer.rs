//! # Announcement Signer
//!
//! The advertiser side of the linkage rule: derives the protocol child key
//! from an identity secret, signs the announcement fields with it, and locks
//! the token to the child public key.

use super::derivation::{invoice_number, KeyDeriver, KEY_ID, SECURITY_LEVEL};
use super::errors::LinkageError;
use k256::ecdsa::signature::Signer;
use k256::ecdsa::{Signature, SigningKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::SecretKey;
use shared_types::Protocol;
use tracing::debug;

/// Creates linked SHIP/SLAP locking scripts for one identity.
#[derive(Debug, Clone)]
pub struct AnnouncementSigner {
    deriver: KeyDeriver,
}

impl AnnouncementSigner {
    #[must_use]
    pub fn new(identity: SecretKey) -> Self {
        Self {
            deriver: KeyDeriver::new(identity),
        }
    }

    /// Compressed identity public key, as written into field 1.
    #[must_use]
    pub fn identity_key(&self) -> [u8; 33] {
        let point = self.deriver.root_public_key().to_encoded_point(true);
        let mut out = [0u8; 33];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Child signing key for `protocol`.
    ///
    /// # Errors
    /// * `LinkageError::DerivationFailed` - degenerate derivation
    pub fn signing_key(&self, protocol: Protocol) -> Result<SigningKey, LinkageError> {
        let invoice = invoice_number(
            SECURITY_LEVEL,
            protocol.config().derivation_protocol,
            KEY_ID,
        );
        let child = self
            .deriver
            .derive_private_key(&KeyDeriver::anyone_public_key(), &invoice)?;
        Ok(SigningKey::from(&child))
    }

    /// Build a locking script advertising `uri` for `name`.
    ///
    /// No policy checks are applied here; the admission validator decides
    /// whether the result is admissible.
    ///
    /// # Errors
    /// * `LinkageError::DerivationFailed` - degenerate derivation
    /// * `LinkageError::Encoding` - script encoding failed
    pub fn create_announcement(
        &self,
        protocol: Protocol,
        uri: &str,
        name: &str,
    ) -> Result<Vec<u8>, LinkageError> {
        let signing_key = self.signing_key(protocol)?;

        let mut fields = vec![
            protocol.identifier().as_bytes().to_vec(),
            self.identity_key().to_vec(),
            uri.as_bytes().to_vec(),
            name.as_bytes().to_vec(),
        ];
        let signature: Signature = signing_key.sign(&fields.concat());
        fields.push(signature.to_der().as_bytes().to_vec());

        let locking_key = k256::PublicKey::from(signing_key.verifying_key());
        let script = od_01_pushdrop_codec::encode(&locking_key, &fields)?;

        debug!(
            protocol = %protocol,
            identity = %hex::encode(self.identity_key()),
            name,
            "Created announcement"
        );
        Ok(script)
    }
}
