//! # Lookup Service
//!
//! Application service layer that implements the `LookupServiceApi` trait.
//!
//! ## Architecture
//!
//! - Implements the inbound port (`LookupServiceApi`)
//! - Uses the outbound port (`AnnouncementStore`) for every read and write
//! - Delegates query validation and output reading to the domain layer

use crate::domain::entities::{
    documentation, EventOutcome, LookupAnswer, LookupQuestion, LookupServiceMetadata,
};
use crate::domain::errors::LookupError;
use crate::domain::ingestion::read_announcement;
use crate::domain::query::{is_missing, parse_query, LookupQuery};
use crate::ports::inbound::LookupServiceApi;
use crate::ports::outbound::{AnnouncementStore, NewAnnouncement};
use async_trait::async_trait;
use shared_types::{Outpoint, Protocol, ProtocolConfig, Txid};
use std::sync::Arc;
use tracing::{debug, trace};

/// Lookup service for one advertisement protocol.
pub struct LookupService<S: AnnouncementStore> {
    config: &'static ProtocolConfig,
    store: Arc<S>,
}

impl<S: AnnouncementStore> LookupService<S> {
    pub fn new(protocol: Protocol, store: Arc<S>) -> Self {
        Self {
            config: protocol.config(),
            store,
        }
    }

    #[must_use]
    pub fn protocol(&self) -> Protocol {
        self.config.protocol
    }

    /// Service id this instance answers to (`ls_ship` / `ls_slap`).
    #[must_use]
    pub fn service_id(&self) -> &'static str {
        self.config.lookup_service
    }

    /// Topic whose events this instance consumes (`tm_ship` / `tm_slap`).
    #[must_use]
    pub fn topic(&self) -> &'static str {
        self.config.topic_manager
    }

    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Prepare the store.
    ///
    /// # Errors
    /// * `LookupError::Storage` - the store could not create its indexes
    pub async fn initialize(&self) -> Result<(), LookupError> {
        self.store.ensure_indexes().await?;
        Ok(())
    }

    fn is_own_topic(&self, topic: &str) -> bool {
        topic == self.config.topic_manager
    }
}

#[async_trait]
impl<S: AnnouncementStore> LookupServiceApi for LookupService<S> {
    async fn lookup(&self, question: &LookupQuestion) -> Result<LookupAnswer, LookupError> {
        if is_missing(&question.query) {
            return Err(LookupError::QueryRequired);
        }
        if question.service != self.config.lookup_service {
            return Err(LookupError::ServiceNotSupported);
        }

        let outputs = match parse_query(self.config, &question.query)? {
            LookupQuery::FindAll(pagination) => self.store.find_all(pagination).await?,
            LookupQuery::Filtered(query) => self.store.find_record(&query).await?,
        };

        debug!(service = self.config.lookup_service, results = outputs.len(), "Lookup answered");
        Ok(LookupAnswer::OutputList { outputs })
    }

    async fn output_admitted_by_topic(
        &self,
        topic: &str,
        outpoint: Outpoint,
        locking_script: &[u8],
    ) -> Result<EventOutcome, LookupError> {
        if !self.is_own_topic(topic) {
            return Ok(EventOutcome::Ignored);
        }

        let Some(announcement) = read_announcement(self.config, locking_script)? else {
            trace!(%outpoint, "Admitted output carries another protocol's identifier");
            return Ok(EventOutcome::Ignored);
        };

        debug!(
            %outpoint,
            name = %announcement.name,
            domain = %announcement.domain,
            "Storing announcement"
        );
        self.store
            .store_record(NewAnnouncement {
                outpoint,
                identity_key: announcement.identity_key,
                domain: announcement.domain,
                name: announcement.name,
            })
            .await?;
        Ok(EventOutcome::Stored)
    }

    async fn output_spent(
        &self,
        topic: &str,
        outpoint: Outpoint,
    ) -> Result<EventOutcome, LookupError> {
        if !self.is_own_topic(topic) {
            return Ok(EventOutcome::Ignored);
        }
        debug!(%outpoint, "Deleting spent announcement");
        self.store.delete_record(outpoint).await?;
        Ok(EventOutcome::Deleted)
    }

    async fn output_evicted(&self, outpoint: Outpoint) -> Result<EventOutcome, LookupError> {
        debug!(%outpoint, "Deleting evicted announcement");
        self.store.delete_record(outpoint).await?;
        Ok(EventOutcome::Deleted)
    }

    async fn output_no_longer_retained_in_history(
        &self,
        _outpoint: Outpoint,
        _topic: &str,
    ) -> Result<EventOutcome, LookupError> {
        Ok(EventOutcome::Ignored)
    }

    async fn output_block_height_updated(
        &self,
        _txid: Txid,
        _block_height: u32,
        _output_index: u32,
    ) -> Result<EventOutcome, LookupError> {
        Ok(EventOutcome::Ignored)
    }

    fn metadata(&self) -> LookupServiceMetadata {
        LookupServiceMetadata::for_protocol(self.config.protocol)
    }

    fn documentation(&self) -> String {
        documentation(self.config.protocol)
    }
}
