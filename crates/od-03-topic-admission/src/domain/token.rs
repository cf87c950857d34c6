//! # Announcement Token
//!
//! The typed view of a decoded 5-field SHIP/SLAP output. Only built after
//! every admission rule has passed.

use k256::PublicKey;
use shared_types::Protocol;

/// A validated announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementToken {
    pub protocol: Protocol,
    /// Raw SEC1 bytes of the claimed identity key (field 1).
    pub identity_key: Vec<u8>,
    /// Field 2.
    pub advertised_uri: String,
    /// Topic (SHIP) or service (SLAP) name, field 3.
    pub name: String,
    /// DER signature, field 4.
    pub signature: Vec<u8>,
    /// Key the output is locked to.
    pub locking_key: PublicKey,
}

impl AnnouncementToken {
    /// Identity key as stored in the lookup index.
    #[must_use]
    pub fn identity_key_hex(&self) -> String {
        hex::encode(&self.identity_key)
    }
}
