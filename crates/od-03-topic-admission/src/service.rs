//! # Topic Manager Service
//!
//! Application service layer that implements the `TopicManagerApi` trait.
//!
//! ## Architecture
//!
//! This is the hexagonal "application service" that:
//! - Implements the inbound port (`TopicManagerApi`)
//! - Uses the outbound port (`TransactionDecoder`) to parse envelopes
//! - Uses `SignatureLinkageApi` for the final admission rule
//! - Delegates every other rule to the domain validator

use crate::adapters::raw_tx::RawTransactionDecoder;
use crate::domain::entities::{
    documentation, AdmittanceInstructions, Transaction, TopicManagerMetadata,
};
use crate::domain::validator::validate_output;
use crate::ports::inbound::TopicManagerApi;
use crate::ports::outbound::TransactionDecoder;
use od_02_signature_linkage::{SignatureLinkageApi, SignatureLinkageService};
use rayon::prelude::*;
use shared_types::{Outpoint, Protocol, ProtocolConfig};
use tracing::{debug, trace, warn};

/// Topic manager for one advertisement protocol.
pub struct TopicManager<D = RawTransactionDecoder, L = SignatureLinkageService> {
    config: &'static ProtocolConfig,
    decoder: D,
    linkage: L,
}

impl TopicManager {
    /// Topic manager with the raw transaction decoder and the default
    /// signature linkage verifier.
    #[must_use]
    pub fn new(protocol: Protocol) -> Self {
        Self::with_ports(protocol, RawTransactionDecoder, SignatureLinkageService)
    }
}

impl<D: TransactionDecoder, L: SignatureLinkageApi> TopicManager<D, L> {
    pub fn with_ports(protocol: Protocol, decoder: D, linkage: L) -> Self {
        Self {
            config: protocol.config(),
            decoder,
            linkage,
        }
    }

    #[must_use]
    pub fn protocol(&self) -> Protocol {
        self.config.protocol
    }

    /// Topic this manager admits under (`tm_ship` / `tm_slap`).
    #[must_use]
    pub fn topic(&self) -> &'static str {
        self.config.topic_manager
    }

    /// Indices of admissible outputs of an already parsed transaction.
    #[must_use]
    pub fn admissible_outputs(&self, transaction: &Transaction) -> Vec<u32> {
        transaction
            .outputs
            .iter()
            .zip(0u32..)
            .filter_map(|(output, index)| {
                match validate_output(self.config, &self.linkage, &output.locking_script) {
                    Ok(token) => {
                        debug!(
                            protocol = %self.config.protocol,
                            index,
                            name = %token.name,
                            uri = %token.advertised_uri,
                            "Admitting output"
                        );
                        Some(index)
                    }
                    Err(reason) => {
                        trace!(protocol = %self.config.protocol, index, %reason, "Output not admitted");
                        None
                    }
                }
            })
            .collect()
    }

    /// Admit many transactions in parallel.
    ///
    /// Results are in input order; each transaction's indices refer to its
    /// own outputs.
    #[must_use]
    pub fn admit_batch(&self, transactions: &[Vec<u8>]) -> Vec<AdmittanceInstructions> {
        transactions
            .par_iter()
            .map(|tx| self.identify_admissible_outputs(tx, &[]))
            .collect()
    }
}

impl<D: TransactionDecoder, L: SignatureLinkageApi> TopicManagerApi for TopicManager<D, L> {
    fn identify_admissible_outputs(
        &self,
        transaction: &[u8],
        _previous_coins: &[u32],
    ) -> AdmittanceInstructions {
        let parsed = match self.decoder.decode(transaction) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(protocol = %self.config.protocol, error = %e, "Failed to parse transaction");
                return AdmittanceInstructions::none();
            }
        };

        AdmittanceInstructions {
            outputs_to_admit: self.admissible_outputs(&parsed),
            coins_to_retain: Vec::new(),
        }
    }

    fn identify_needed_inputs(&self, _transaction: &[u8]) -> Vec<Outpoint> {
        Vec::new()
    }

    fn metadata(&self) -> TopicManagerMetadata {
        TopicManagerMetadata::for_protocol(self.config.protocol)
    }

    fn documentation(&self) -> String {
        documentation(self.config.protocol)
    }
}
