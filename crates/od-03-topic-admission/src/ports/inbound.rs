//! # Inbound Ports (Driving Ports / API)

use crate::domain::entities::{AdmittanceInstructions, TopicManagerMetadata};
use shared_types::Outpoint;

/// The topic manager contract consumed by the overlay engine.
pub trait TopicManagerApi: Send + Sync {
    /// Output indices of `transaction` to admit under this topic.
    ///
    /// A transaction that cannot be parsed admits nothing; it never fails
    /// the surrounding batch.
    fn identify_admissible_outputs(
        &self,
        transaction: &[u8],
        previous_coins: &[u32],
    ) -> AdmittanceInstructions;

    /// Inputs whose history this topic needs. None for SHIP/SLAP.
    fn identify_needed_inputs(&self, transaction: &[u8]) -> Vec<Outpoint>;

    fn metadata(&self) -> TopicManagerMetadata;

    fn documentation(&self) -> String;
}
