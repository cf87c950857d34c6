//! # Outbound Ports (Driven Ports / SPI)
//!
//! The record store is an external collaborator. The lookup service awaits
//! every call and propagates its result; it never retries.

use crate::domain::query::{AnnouncementQuery, Pagination};
use async_trait::async_trait;
use shared_types::{Outpoint, RecordRef};
use thiserror::Error;

/// Error from record store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A record for this outpoint already exists
    #[error("Duplicate outpoint {0}")]
    DuplicateOutpoint(Outpoint),

    /// The backing store could not serve the request
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Fields of a record about to be stored. The store stamps `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnnouncement {
    pub outpoint: Outpoint,
    pub identity_key: String,
    pub domain: String,
    pub name: String,
}

/// Persistent index of admitted announcements, one per protocol.
#[async_trait]
pub trait AnnouncementStore: Send + Sync {
    /// One-time index setup. Idempotent.
    async fn ensure_indexes(&self) -> Result<(), StoreError>;

    /// Insert a record.
    ///
    /// # Errors
    /// * `StoreError::DuplicateOutpoint` - the outpoint is already indexed
    async fn store_record(&self, record: NewAnnouncement) -> Result<(), StoreError>;

    /// Delete the record for `outpoint`. Deleting an absent record succeeds.
    async fn delete_record(&self, outpoint: Outpoint) -> Result<(), StoreError>;

    /// Records matching `query`, ordered and paged per its pagination.
    async fn find_record(&self, query: &AnnouncementQuery) -> Result<Vec<RecordRef>, StoreError>;

    /// Every record, ordered and paged.
    async fn find_all(&self, pagination: Pagination) -> Result<Vec<RecordRef>, StoreError>;
}
