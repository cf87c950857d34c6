//! # Admission Entities

use serde::Serialize;
use shared_types::{Outpoint, Protocol};

/// A transaction input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxInput {
    pub previous_output: Outpoint,
    pub unlocking_script: Vec<u8>,
    pub sequence: u32,
}

/// A transaction output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutput {
    pub satoshis: u64,
    pub locking_script: Vec<u8>,
}

/// A parsed transaction envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub version: u32,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    pub lock_time: u32,
}

/// What the overlay should do with a transaction's outputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmittanceInstructions {
    /// Indices of admitted outputs, ascending.
    pub outputs_to_admit: Vec<u32>,
    /// Indices of previous coins to keep. Always empty for SHIP/SLAP.
    pub coins_to_retain: Vec<u32>,
}

impl AdmittanceInstructions {
    /// Nothing admitted, nothing retained.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outputs_to_admit.is_empty() && self.coins_to_retain.is_empty()
    }
}

/// Display metadata of a topic manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicManagerMetadata {
    pub name: String,
    pub short_description: String,
}

impl TopicManagerMetadata {
    #[must_use]
    pub fn for_protocol(protocol: Protocol) -> Self {
        let (name, short_description) = match protocol {
            Protocol::Ship => (
                "SHIP Topic Manager",
                "Manages SHIP tokens for service host interconnect.",
            ),
            Protocol::Slap => (
                "SLAP Topic Manager",
                "Manages SLAP tokens for service lookup availability.",
            ),
        };
        Self {
            name: name.to_string(),
            short_description: short_description.to_string(),
        }
    }
}

/// Markdown shown to overlay operators.
#[must_use]
pub fn documentation(protocol: Protocol) -> String {
    let config = protocol.config();
    let subject = match protocol {
        Protocol::Ship => "hosts a topic",
        Protocol::Slap => "provides a lookup service",
    };
    format!(
        "# {id} Topic Manager\n\n\
         Admits outputs advertising that an identity {subject}.\n\n\
         An output is admitted when its locking script is a pushdrop token with exactly \
         five fields:\n\n\
         1. the literal `{id}`\n\
         2. the advertiser's 33-byte identity key\n\
         3. an advertisable URI (`https://`, `wss://` or an authenticated transport scheme, \
         never a loopback host)\n\
         4. a name matching `^[a-z]+(_[a-z]+)*$`, at most 50 characters, prefixed `{prefix}`\n\
         5. a signature over fields 1-4 by the key derived from the identity key for \
         protocol `{derivation}`, which must also be the key the output is locked to\n",
        id = config.identifier,
        prefix = config.name_prefix,
        derivation = config.derivation_protocol,
    )
}
