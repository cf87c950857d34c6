//! # Event Subscriber
//!
//! Receiving side of the ledger bus. A subscription only ever sees events
//! its filter accepted at publish time, in the order they were published.

use crate::events::{EventFilter, LedgerEvent};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The bus was dropped and the queue is empty.
    #[error("Event bus closed")]
    Closed,
}

/// Anything that hands out [`Subscription`]s.
pub trait EventSubscriber: Send + Sync {
    fn subscribe(&self, filter: EventFilter) -> Subscription;
}

/// A subscriber's end of its bounded queue. Dropping it unsubscribes.
pub struct Subscription {
    receiver: mpsc::Receiver<LedgerEvent>,
    filter: EventFilter,
}

impl Subscription {
    pub(crate) fn new(receiver: mpsc::Receiver<LedgerEvent>, filter: EventFilter) -> Self {
        Self { receiver, filter }
    }

    /// Next event, or `None` once the bus is gone and the queue is drained.
    pub async fn recv(&mut self) -> Option<LedgerEvent> {
        self.receiver.recv().await
    }

    /// Next queued event without waiting.
    ///
    /// # Errors
    /// [`SubscriptionError::Closed`] once the bus is gone and nothing is
    /// left to read.
    pub fn try_recv(&mut self) -> Result<Option<LedgerEvent>, SubscriptionError> {
        match self.receiver.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(SubscriptionError::Closed),
        }
    }

    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}
