//! # Shared Bus - Ledger Event Bus
//!
//! Carries output lifecycle events from the transaction-processing layer to
//! every lookup service.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────────┐
//! │ Ledger layer │    publish()       │ Lookup services  │
//! │              │ ──────┐            │ (SHIP, SLAP)     │
//! └──────────────┘       │            └──────────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! The bus is an injected component, never global state. Each subscriber
//! reads from its own bounded queue; when a queue is full the publisher waits,
//! so no admit or spend is ever dropped on the way to a lookup service.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventKind, LedgerEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventSubscriber, Subscription, SubscriptionError};

/// Events queued per subscriber before publishers wait for it.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
