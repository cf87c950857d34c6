//! # Ledger Events
//!
//! Output lifecycle events produced by the transaction-processing layer.

use serde::{Deserialize, Serialize};
use shared_types::{Outpoint, Txid};

/// Every event that can be published to the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LedgerEvent {
    /// An output was admitted under `topic`.
    #[serde(rename_all = "camelCase")]
    OutputAdmittedByTopic {
        topic: String,
        outpoint: Outpoint,
        locking_script: Vec<u8>,
    },

    /// An output admitted under `topic` was spent.
    OutputSpent { topic: String, outpoint: Outpoint },

    /// An output was removed without a spend (reorg, retention policy).
    OutputEvicted { outpoint: Outpoint },

    /// An output's history is no longer retained under `topic`.
    OutputNoLongerRetainedInHistory { outpoint: Outpoint, topic: String },

    /// An output's confirmation height changed.
    #[serde(rename_all = "camelCase")]
    OutputBlockHeightUpdated {
        txid: Txid,
        block_height: u32,
        output_index: u32,
    },
}

impl LedgerEvent {
    /// Get the kind of this event (for filtering).
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::OutputAdmittedByTopic { .. } => EventKind::Admitted,
            Self::OutputSpent { .. } => EventKind::Spent,
            Self::OutputEvicted { .. } => EventKind::Evicted,
            Self::OutputNoLongerRetainedInHistory { .. } => EventKind::HistoryPruned,
            Self::OutputBlockHeightUpdated { .. } => EventKind::BlockHeightUpdated,
        }
    }

    /// Overlay topic the event is scoped to, if any.
    #[must_use]
    pub fn topic(&self) -> Option<&str> {
        match self {
            Self::OutputAdmittedByTopic { topic, .. }
            | Self::OutputSpent { topic, .. }
            | Self::OutputNoLongerRetainedInHistory { topic, .. } => Some(topic),
            Self::OutputEvicted { .. } | Self::OutputBlockHeightUpdated { .. } => None,
        }
    }

    /// Outpoint the event concerns.
    #[must_use]
    pub fn outpoint(&self) -> Outpoint {
        match self {
            Self::OutputAdmittedByTopic { outpoint, .. }
            | Self::OutputSpent { outpoint, .. }
            | Self::OutputEvicted { outpoint }
            | Self::OutputNoLongerRetainedInHistory { outpoint, .. } => *outpoint,
            Self::OutputBlockHeightUpdated {
                txid, output_index, ..
            } => Outpoint::new(*txid, *output_index),
        }
    }
}

/// Event kinds for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Admitted,
    Spent,
    Evicted,
    HistoryPruned,
    BlockHeightUpdated,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Kinds to include. Empty means all kinds.
    pub kinds: Vec<EventKind>,
    /// Overlay topics to include. Empty means all topics. Events without a
    /// topic always pass this check.
    pub topics: Vec<String>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific kinds.
    #[must_use]
    pub fn kinds(kinds: Vec<EventKind>) -> Self {
        Self {
            kinds,
            topics: Vec::new(),
        }
    }

    /// Create a filter for specific overlay topics.
    #[must_use]
    pub fn topics<I, S>(topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kinds: Vec::new(),
            topics: topics.into_iter().map(Into::into).collect(),
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &LedgerEvent) -> bool {
        let kind_match = self.kinds.is_empty() || self.kinds.contains(&event.kind());

        let topic_match = self.topics.is_empty()
            || event
                .topic()
                .map_or(true, |topic| self.topics.iter().any(|t| t == topic));

        kind_match && topic_match
    }
}
