//! # Lookup Errors
//!
//! Caller-input messages are stable; clients match on them.

use crate::ports::outbound::StoreError;
use thiserror::Error;

/// Lookup and ingestion errors.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("A valid query must be provided!")]
    QueryRequired,

    #[error("Lookup service not supported!")]
    ServiceNotSupported,

    #[error("Invalid string query. Only \"findAll\" is supported.")]
    InvalidStringQuery,

    #[error("Invalid query format. Expected \"findAll\" or an object.")]
    InvalidQueryFormat,

    #[error("query.domain must be a non-empty string if provided")]
    InvalidDomain,

    #[error("query.topics must be a non-empty array of non-empty strings if provided")]
    InvalidTopics,

    #[error("query.service must be a non-empty string if provided")]
    InvalidService,

    #[error("query.identityKey must be a non-empty string if provided")]
    InvalidIdentityKey,

    #[error("query.limit must be a non-negative integer if provided")]
    InvalidLimit,

    #[error("query.skip must be a non-negative integer if provided")]
    InvalidSkip,

    #[error("query.sortOrder must be \"asc\" or \"desc\" if provided")]
    InvalidSortOrder,

    #[error("query.findAll must be a boolean if provided")]
    InvalidFindAll,

    /// An admitted output could not be read back as an announcement.
    #[error("Malformed announcement output: {0}")]
    MalformedOutput(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl LookupError {
    /// Whether this error was caused by the caller's query.
    #[must_use]
    pub fn is_query_error(&self) -> bool {
        !matches!(self, Self::MalformedOutput(_) | Self::Storage(_))
    }
}
