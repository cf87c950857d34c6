//! # Lookup Service Subsystem (OD-04)
//!
//! Answers SHIP/SLAP lookups and keeps the announcement index current from
//! ledger events.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): query parsing and validation, reading
//!   admitted outputs, lookup entities
//! - **Ports Layer** (`ports/`): `LookupServiceApi` (inbound) and
//!   `AnnouncementStore` (outbound)
//! - **Adapters Layer** (`adapters/`): in-memory record store
//! - **Service Layer** (`service.rs`): `LookupService`, one per protocol
//!
//! ## Two admission paths
//!
//! First-time admission (OD-03) requires exactly five fields and verifies
//! the signature. Ingestion here trusts that admission and reads any output
//! with at least four fields without verifying again.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::InMemoryAnnouncementStore;
pub use domain::entities::{
    documentation, EventOutcome, LookupAnswer, LookupQuestion, LookupServiceMetadata,
};
pub use domain::errors::LookupError;
pub use domain::ingestion::{read_announcement, IngestedAnnouncement, INGESTION_MIN_FIELDS};
pub use domain::query::{
    is_missing, parse_query, AnnouncementQuery, LookupQuery, NameFilter, Pagination, FIND_ALL,
};
pub use ports::inbound::LookupServiceApi;
pub use ports::outbound::{AnnouncementStore, NewAnnouncement, StoreError};
pub use service::LookupService;
