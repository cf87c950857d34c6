//! # Inbound Ports (Driving Ports / API)
//!
//! Traits that define the public API of this subsystem.

use k256::PublicKey;

/// Signature linkage API consulted by the admission validator.
///
/// Implementations must be thread-safe (`Send + Sync`) and total: malformed
/// input yields `false`, never a panic.
pub trait SignatureLinkageApi: Send + Sync {
    /// Whether `fields` (signature last) are signed by the key derived from
    /// `fields[1]`, and that key is `locking_key`.
    fn is_linked(&self, locking_key: &PublicKey, fields: &[Vec<u8>]) -> bool;
}
