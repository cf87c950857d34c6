//! # Lookup Query Parsing
//!
//! Two query surfaces are accepted:
//!
//! - the legacy bare string `"findAll"`
//! - a structured object:
//!
//! ```text
//! { findAll?, domain?, topics? (SHIP) | service? (SLAP), identityKey?, limit?, skip?, sortOrder? }
//! ```
//!
//! Fields are validated in a fixed order and the first failure wins.
//! Absent fields place no constraint; a field that is present but `null` is
//! invalid.

use super::errors::LookupError;
use serde::Serialize;
use serde_json::{Map, Value};
use shared_types::{NameFilterKind, ProtocolConfig, SortOrder};

/// Legacy marker for "every record".
pub const FIND_ALL: &str = "findAll";

/// Paging and ordering passed through to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub limit: Option<u64>,
    pub skip: Option<u64>,
    /// `None` means the store default (newest first).
    pub sort_order: Option<SortOrder>,
}

impl Pagination {
    #[must_use]
    pub fn sort_order(&self) -> SortOrder {
        self.sort_order.unwrap_or_default()
    }
}

/// Constraint on the advertised name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NameFilter {
    /// Any of these topics (SHIP).
    Topics(Vec<String>),
    /// Exactly this service (SLAP).
    Service(String),
}

impl NameFilter {
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Topics(topics) => topics.iter().any(|t| t == name),
            Self::Service(service) => service == name,
        }
    }
}

/// A validated filtered query. Every `None` is "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementQuery {
    pub domain: Option<String>,
    pub name: Option<NameFilter>,
    pub identity_key: Option<String>,
    pub pagination: Pagination,
}

/// A validated lookup query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupQuery {
    /// Every record, paged.
    FindAll(Pagination),
    /// Records matching the filter, paged.
    Filtered(AnnouncementQuery),
}

/// Whether `query` counts as "no query given".
#[must_use]
pub fn is_missing(query: &Value) -> bool {
    match query {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Parse and validate a raw query for `config`'s variant.
///
/// # Errors
/// The first failing [`LookupError`] in validation order.
pub fn parse_query(config: &ProtocolConfig, query: &Value) -> Result<LookupQuery, LookupError> {
    if is_missing(query) {
        return Err(LookupError::QueryRequired);
    }

    match query {
        Value::String(s) if s == FIND_ALL => Ok(LookupQuery::FindAll(Pagination::default())),
        Value::String(_) => Err(LookupError::InvalidStringQuery),
        Value::Object(object) => parse_object(config, object),
        _ => Err(LookupError::InvalidQueryFormat),
    }
}

fn parse_object(
    config: &ProtocolConfig,
    object: &Map<String, Value>,
) -> Result<LookupQuery, LookupError> {
    let domain = optional(object, "domain", non_empty_string, LookupError::InvalidDomain)?;

    let name = match config.name_filter {
        NameFilterKind::Topics => {
            optional(object, "topics", topic_list, LookupError::InvalidTopics)?
                .map(NameFilter::Topics)
        }
        NameFilterKind::Service => {
            optional(object, "service", non_empty_string, LookupError::InvalidService)?
                .map(NameFilter::Service)
        }
    };

    let identity_key = optional(
        object,
        "identityKey",
        non_empty_string,
        LookupError::InvalidIdentityKey,
    )?;
    let limit = optional(object, "limit", Value::as_u64, LookupError::InvalidLimit)?;
    let skip = optional(object, "skip", Value::as_u64, LookupError::InvalidSkip)?;
    let sort_order = optional(
        object,
        "sortOrder",
        |v| v.as_str().and_then(|s| s.parse::<SortOrder>().ok()),
        LookupError::InvalidSortOrder,
    )?;
    let find_all = optional(object, "findAll", Value::as_bool, LookupError::InvalidFindAll)?;

    let pagination = Pagination {
        limit,
        skip,
        sort_order,
    };

    if find_all == Some(true) {
        return Ok(LookupQuery::FindAll(pagination));
    }

    Ok(LookupQuery::Filtered(AnnouncementQuery {
        domain,
        name,
        identity_key,
        pagination,
    }))
}

/// Read `key` with `convert`; present but unconvertible is `error`.
fn optional<T>(
    object: &Map<String, Value>,
    key: &str,
    convert: impl Fn(&Value) -> Option<T>,
    error: LookupError,
) -> Result<Option<T>, LookupError> {
    match object.get(key) {
        None => Ok(None),
        Some(value) => convert(value).map(Some).ok_or(error),
    }
}

fn non_empty_string(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn topic_list(value: &Value) -> Option<Vec<String>> {
    let items = value.as_array().filter(|a| !a.is_empty())?;
    items.iter().map(non_empty_string).collect()
}
