//! # Inbound Ports (Driving Ports / API)
//!
//! The lookup service contract: query answering plus the ledger event
//! handlers that keep the index current.

use crate::domain::entities::{EventOutcome, LookupAnswer, LookupQuestion, LookupServiceMetadata};
use crate::domain::errors::LookupError;
use async_trait::async_trait;
use shared_types::{Outpoint, Txid};

/// Lookup service API.
///
/// Every event handler first checks the topic against its own and returns
/// `EventOutcome::Ignored` on mismatch, so one event stream can serve every
/// variant.
#[async_trait]
pub trait LookupServiceApi: Send + Sync {
    /// Answer a lookup.
    ///
    /// # Errors
    /// Query validation errors, or `LookupError::Storage`.
    async fn lookup(&self, question: &LookupQuestion) -> Result<LookupAnswer, LookupError>;

    /// A new output was admitted under `topic`.
    async fn output_admitted_by_topic(
        &self,
        topic: &str,
        outpoint: Outpoint,
        locking_script: &[u8],
    ) -> Result<EventOutcome, LookupError>;

    /// An admitted output under `topic` was spent.
    async fn output_spent(&self, topic: &str, outpoint: Outpoint)
        -> Result<EventOutcome, LookupError>;

    /// An output was removed without a spend.
    async fn output_evicted(&self, outpoint: Outpoint) -> Result<EventOutcome, LookupError>;

    /// History pruning notice. Nothing to do for announcements.
    async fn output_no_longer_retained_in_history(
        &self,
        outpoint: Outpoint,
        topic: &str,
    ) -> Result<EventOutcome, LookupError>;

    /// Confirmation height changed. Nothing to do for announcements.
    async fn output_block_height_updated(
        &self,
        txid: Txid,
        block_height: u32,
        output_index: u32,
    ) -> Result<EventOutcome, LookupError>;

    fn metadata(&self) -> LookupServiceMetadata;

    fn documentation(&self) -> String;
}
