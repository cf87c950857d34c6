//! # In-Memory Announcement Store
//!
//! Ordering is by `(created_at, insertion sequence)`, so records created in
//! the same instant keep their insertion order. `skip` is applied before
//! `limit`.

use crate::domain::query::{AnnouncementQuery, Pagination};
use crate::ports::outbound::{AnnouncementStore, NewAnnouncement, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use shared_types::{AnnouncementRecord, Outpoint, RecordRef, SortOrder};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone)]
struct Entry {
    record: AnnouncementRecord,
    seq: u64,
}

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<Outpoint, Entry>,
    next_seq: u64,
    indexes_ready: bool,
}

/// Record store held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryAnnouncementStore {
    inner: RwLock<Inner>,
}

impl InMemoryAnnouncementStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert with an explicit creation time.
    ///
    /// # Errors
    /// * `StoreError::DuplicateOutpoint` - the outpoint is already indexed
    pub fn insert_at(
        &self,
        record: NewAnnouncement,
        created_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if inner.records.contains_key(&record.outpoint) {
            return Err(StoreError::DuplicateOutpoint(record.outpoint));
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.records.insert(
            record.outpoint,
            Entry {
                record: AnnouncementRecord {
                    outpoint: record.outpoint,
                    identity_key: record.identity_key,
                    domain: record.domain,
                    name: record.name,
                    created_at,
                },
                seq,
            },
        );
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored record for `outpoint`, if any.
    #[must_use]
    pub fn get(&self, outpoint: &Outpoint) -> Option<AnnouncementRecord> {
        self.inner
            .read()
            .records
            .get(outpoint)
            .map(|e| e.record.clone())
    }

    #[must_use]
    pub fn indexes_ready(&self) -> bool {
        self.inner.read().indexes_ready
    }

    fn select(
        &self,
        filter: impl Fn(&AnnouncementRecord) -> bool,
        pagination: Pagination,
    ) -> Vec<RecordRef> {
        let inner = self.inner.read();
        let mut matches: Vec<&Entry> = inner
            .records
            .values()
            .filter(|e| filter(&e.record))
            .collect();

        matches.sort_by_key(|e| (e.record.created_at, e.seq));
        if pagination.sort_order() == SortOrder::Desc {
            matches.reverse();
        }

        let skip = usize::try_from(pagination.skip.unwrap_or(0)).unwrap_or(usize::MAX);
        let limit = pagination
            .limit
            .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));

        matches
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|e| e.record.record_ref())
            .collect()
    }
}

#[async_trait]
impl AnnouncementStore for InMemoryAnnouncementStore {
    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if !inner.indexes_ready {
            debug!("Creating announcement indexes");
            inner.indexes_ready = true;
        }
        Ok(())
    }

    async fn store_record(&self, record: NewAnnouncement) -> Result<(), StoreError> {
        self.insert_at(record, Utc::now())
    }

    async fn delete_record(&self, outpoint: Outpoint) -> Result<(), StoreError> {
        self.inner.write().records.remove(&outpoint);
        Ok(())
    }

    async fn find_record(&self, query: &AnnouncementQuery) -> Result<Vec<RecordRef>, StoreError> {
        Ok(self.select(
            |r| {
                query.domain.as_ref().map_or(true, |d| *d == r.domain)
                    && query.name.as_ref().map_or(true, |n| n.matches(&r.name))
                    && query
                        .identity_key
                        .as_ref()
                        .map_or(true, |k| *k == r.identity_key)
            },
            query.pagination,
        ))
    }

    async fn find_all(&self, pagination: Pagination) -> Result<Vec<RecordRef>, StoreError> {
        Ok(self.select(|_| true, pagination))
    }
}
