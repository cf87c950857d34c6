//! # Lookup Entities

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::{Protocol, RecordRef};

/// A lookup request addressed to one lookup service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupQuestion {
    /// Service id, e.g. `ls_ship`.
    pub service: String,
    /// Raw query; absent deserializes as `null`.
    #[serde(default)]
    pub query: Value,
}

impl LookupQuestion {
    pub fn new(service: impl Into<String>, query: Value) -> Self {
        Self {
            service: service.into(),
            query,
        }
    }
}

/// A lookup result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum LookupAnswer {
    /// Matching outputs, in store order.
    OutputList { outputs: Vec<RecordRef> },
}

impl LookupAnswer {
    #[must_use]
    pub fn outputs(&self) -> &[RecordRef] {
        match self {
            Self::OutputList { outputs } => outputs,
        }
    }
}

/// What a ledger event did to the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// A record was written.
    Stored,
    /// A delete was issued.
    Deleted,
    /// The event is not for this service.
    Ignored,
}

/// Display metadata of a lookup service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupServiceMetadata {
    pub name: String,
    pub short_description: String,
}

impl LookupServiceMetadata {
    #[must_use]
    pub fn for_protocol(protocol: Protocol) -> Self {
        Self {
            name: format!("{protocol} Lookup Service"),
            short_description: format!("Provides lookup capabilities for {protocol} tokens."),
        }
    }
}

/// Markdown shown to overlay clients.
#[must_use]
pub fn documentation(protocol: Protocol) -> String {
    let config = protocol.config();
    let name_field = config.name_filter.query_field();
    let name_shape = match config.name_filter {
        shared_types::NameFilterKind::Topics => "array of topic names, any may match",
        shared_types::NameFilterKind::Service => "exact service name",
    };
    format!(
        "# {id} Lookup Service\n\n\
         Query with `{{ \"service\": \"{service}\", \"query\": ... }}`.\n\n\
         - `\"findAll\"` returns every {id} record, newest first.\n\
         - An object filters: `domain`, `{name_field}` ({name_shape}), `identityKey`, \
         `limit`, `skip`, `sortOrder` (`\"asc\"` | `\"desc\"`). Set `findAll: true` to \
         page through every record instead.\n\n\
         Results are `{{ \"txid\", \"outputIndex\" }}` pairs.\n",
        id = config.identifier,
        service = config.lookup_service,
    )
}
