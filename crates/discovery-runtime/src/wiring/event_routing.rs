//! # Event Routing
//!
//! Delivers ledger events from the bus to every lookup service.
//!
//! ## Event Flow
//!
//! ```text
//! LEDGER LAYER
//!     │
//!     ├──OutputAdmittedByTopic / OutputSpent / OutputEvicted──┐
//!     │                                                      │
//!     ▼                                                      │
//! EVENT BUS (shared-bus)                                     │
//!     │                                                      │
//!     ▼                                                      │
//! EVENT ROUTER ──dispatch──→ ls_ship ──→ SHIP record store   │
//!              └─dispatch──→ ls_slap ──→ SLAP record store   │
//! ```
//!
//! Every event goes to every service; each service ignores topics that are
//! not its own. One event is fully handled by every service before the next
//! is taken, so an admit followed by a spend of the same outpoint always
//! reaches the store in that order. Store failures are logged and counted,
//! never retried.
//!
//! On shutdown the router stops waiting for new events and dispatches the
//! ones already queued before it exits.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use od_04_lookup_service::{EventOutcome, LookupError, LookupServiceApi};
use shared_bus::{LedgerEvent, Subscription};
use tokio::sync::watch;
use tracing::{debug, error, info};

/// Outcome counts for one dispatched event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub stored: usize,
    pub deleted: usize,
    pub ignored: usize,
    pub failed: usize,
}

impl DispatchSummary {
    fn record(&mut self, outcome: &Result<EventOutcome, LookupError>) {
        match outcome {
            Ok(EventOutcome::Stored) => self.stored += 1,
            Ok(EventOutcome::Deleted) => self.deleted += 1,
            Ok(EventOutcome::Ignored) => self.ignored += 1,
            Err(_) => self.failed += 1,
        }
    }
}

/// Running totals across every dispatched event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouterStats {
    pub events: u64,
    pub stored: u64,
    pub deleted: u64,
    pub ignored: u64,
    pub failures: u64,
}

#[derive(Debug, Default)]
struct Counters {
    events: AtomicU64,
    stored: AtomicU64,
    deleted: AtomicU64,
    ignored: AtomicU64,
    failures: AtomicU64,
}

/// Event router from the ledger bus to the lookup services.
pub struct EventRouter {
    services: Vec<Arc<dyn LookupServiceApi>>,
    counters: Counters,
}

impl EventRouter {
    /// Create a router over `services`, dispatched in the given order.
    pub fn new(services: Vec<Arc<dyn LookupServiceApi>>) -> Self {
        Self {
            services,
            counters: Counters::default(),
        }
    }

    /// Number of registered lookup services.
    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    /// Snapshot of the running totals.
    pub fn stats(&self) -> RouterStats {
        RouterStats {
            events: self.counters.events.load(Ordering::Relaxed),
            stored: self.counters.stored.load(Ordering::Relaxed),
            deleted: self.counters.deleted.load(Ordering::Relaxed),
            ignored: self.counters.ignored.load(Ordering::Relaxed),
            failures: self.counters.failures.load(Ordering::Relaxed),
        }
    }

    /// Deliver one event to every service, sequentially.
    pub async fn dispatch(&self, event: &LedgerEvent) -> DispatchSummary {
        let mut summary = DispatchSummary::default();

        for service in &self.services {
            let outcome = deliver(service.as_ref(), event).await;
            if let Err(e) = &outcome {
                error!(
                    service = %service.metadata().name,
                    kind = ?event.kind(),
                    outpoint = %event.outpoint(),
                    error = %e,
                    "Lookup service failed to handle ledger event"
                );
            }
            summary.record(&outcome);
        }

        self.counters.events.fetch_add(1, Ordering::Relaxed);
        self.counters
            .stored
            .fetch_add(summary.stored as u64, Ordering::Relaxed);
        self.counters
            .deleted
            .fetch_add(summary.deleted as u64, Ordering::Relaxed);
        self.counters
            .ignored
            .fetch_add(summary.ignored as u64, Ordering::Relaxed);
        self.counters
            .failures
            .fetch_add(summary.failed as u64, Ordering::Relaxed);

        debug!(
            kind = ?event.kind(),
            outpoint = %event.outpoint(),
            ?summary,
            "Ledger event dispatched"
        );
        summary
    }

    /// Dispatch every event from `subscription` until the bus closes or
    /// `shutdown` fires, then drain what is still queued.
    pub async fn run(&self, mut subscription: Subscription, mut shutdown: watch::Receiver<bool>) {
        info!(services = self.services.len(), "Event router started");

        loop {
            tokio::select! {
                event = subscription.recv() => match event {
                    Some(event) => {
                        self.dispatch(&event).await;
                    }
                    None => {
                        info!("Event bus closed, event router exiting");
                        return;
                    }
                },
                _ = shutdown.changed() => break,
            }
        }

        let drained = self.drain(&mut subscription).await;
        info!(drained, "Event router stopped");
    }

    /// Dispatch every event already queued on `subscription`.
    pub async fn drain(&self, subscription: &mut Subscription) -> u64 {
        let mut drained = 0;
        while let Ok(Some(event)) = subscription.try_recv() {
            self.dispatch(&event).await;
            drained += 1;
        }
        drained
    }
}

async fn deliver(
    service: &dyn LookupServiceApi,
    event: &LedgerEvent,
) -> Result<EventOutcome, LookupError> {
    match event {
        LedgerEvent::OutputAdmittedByTopic {
            topic,
            outpoint,
            locking_script,
        } => {
            service
                .output_admitted_by_topic(topic, *outpoint, locking_script)
                .await
        }
        LedgerEvent::OutputSpent { topic, outpoint } => {
            service.output_spent(topic, *outpoint).await
        }
        LedgerEvent::OutputEvicted { outpoint } => service.output_evicted(*outpoint).await,
        LedgerEvent::OutputNoLongerRetainedInHistory { outpoint, topic } => {
            service
                .output_no_longer_retained_in_history(*outpoint, topic)
                .await
        }
        LedgerEvent::OutputBlockHeightUpdated {
            txid,
            block_height,
            output_index,
        } => {
            service
                .output_block_height_updated(*txid, *block_height, *output_index)
                .await
        }
    }
}
