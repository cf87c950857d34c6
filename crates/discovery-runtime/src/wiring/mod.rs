//! # Subsystem Wiring Module
//!
//! Connects the ledger layer, the topic managers and the lookup services.
//!
//! ```text
//! raw tx ──→ AdmissionPipeline ──→ TopicManager (tm_ship, tm_slap)
//!                   │
//!                   │ publish
//!                   ▼
//!              EVENT BUS ──→ EventRouter ──→ LookupService (ls_ship, ls_slap)
//! ```

pub mod admission;
pub mod event_routing;

pub use admission::*;
pub use event_routing::*;
