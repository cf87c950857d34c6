//! # Event Publisher
//!
//! Fan-out side of the ledger bus. Every subscriber owns a bounded queue;
//! an event is copied into the queue of each subscriber whose filter
//! accepts it. A full queue makes `publish` wait, so a slow lookup service
//! slows the ledger layer down instead of missing admits or spends.

use crate::events::{EventFilter, LedgerEvent};
use crate::subscriber::{EventSubscriber, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Trait for publishing events to the bus.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish an event, waiting for queue space where a subscriber is full.
    ///
    /// Returns the number of subscribers the event was delivered to.
    async fn publish(&self, event: LedgerEvent) -> usize;

    /// Total events handed to `publish`, delivered or not.
    fn events_published(&self) -> u64;
}

/// One subscriber's queue and the events it wants.
struct Route {
    filter: EventFilter,
    sender: mpsc::Sender<LedgerEvent>,
}

/// In-memory ledger bus.
///
/// Events from one publisher reach each subscriber in publish order.
/// Callers that need a total order across publishers serialize their
/// `publish` calls.
pub struct InMemoryEventBus {
    routes: RwLock<Vec<Route>>,
    events_published: AtomicU64,
    capacity: usize,
}

impl InMemoryEventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a bus whose subscriber queues hold `capacity` events.
    ///
    /// # Panics
    ///
    /// If `capacity` is zero; configuration validation rejects that first.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "bus capacity must be positive");
        Self {
            routes: RwLock::new(Vec::new()),
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to events matching a filter.
    ///
    /// The subscriber must keep reading: once its queue is full, publishers
    /// wait for it. Dropping the [`Subscription`] unsubscribes.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        let (sender, receiver) = mpsc::channel(self.capacity);

        let mut routes = self.routes.write();
        routes.retain(|route| !route.sender.is_closed());
        routes.push(Route {
            filter: filter.clone(),
            sender,
        });
        debug!(
            kinds = ?filter.kinds,
            topics = ?filter.topics,
            subscribers = routes.len(),
            "Subscribed to ledger events"
        );

        Subscription::new(receiver, filter)
    }

    /// Subscribers still holding their [`Subscription`].
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.routes
            .read()
            .iter()
            .filter(|route| !route.sender.is_closed())
            .count()
    }

    /// Per-subscriber queue capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: LedgerEvent) -> usize {
        self.events_published.fetch_add(1, Ordering::Relaxed);

        let targets: Vec<mpsc::Sender<LedgerEvent>> = self
            .routes
            .read()
            .iter()
            .filter(|route| route.filter.matches(&event))
            .map(|route| route.sender.clone())
            .collect();

        let mut delivered = 0;
        let mut stale = false;
        for sender in &targets {
            match sender.send(event.clone()).await {
                Ok(()) => delivered += 1,
                Err(_) => stale = true,
            }
        }
        if stale {
            self.routes.write().retain(|route| !route.sender.is_closed());
        }

        trace!(
            kind = ?event.kind(),
            outpoint = %event.outpoint(),
            delivered,
            "Ledger event published"
        );
        delivered
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

impl EventSubscriber for InMemoryEventBus {
    fn subscribe(&self, filter: EventFilter) -> Subscription {
        InMemoryEventBus::subscribe(self, filter)
    }
}
