//! # Signature Linkage Service
//!
//! Application service layer that implements the `SignatureLinkageApi` trait
//! by delegating to the domain layer.

use crate::domain::linkage;
use crate::ports::inbound::SignatureLinkageApi;
use k256::PublicKey;

/// Signature Linkage Service.
///
/// Stateless; cheap to clone and share across worker threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureLinkageService;

impl SignatureLinkageService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SignatureLinkageApi for SignatureLinkageService {
    fn is_linked(&self, locking_key: &PublicKey, fields: &[Vec<u8>]) -> bool {
        linkage::is_token_signature_correctly_linked(locking_key, fields)
    }
}
