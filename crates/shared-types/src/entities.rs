//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Ledger references**: `Txid`, `Outpoint`, `RecordRef`
//! - **Index**: `AnnouncementRecord`, `SortOrder`

use crate::errors::TypeError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// LEDGER REFERENCES
// =============================================================================

/// A 32-byte transaction id, held in display (big-endian hex) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Txid(pub [u8; 32]);

impl Txid {
    /// Build a txid from a double-SHA256 digest (internal byte order).
    #[must_use]
    pub fn from_hash(mut hash: [u8; 32]) -> Self {
        hash.reverse();
        Self(hash)
    }

    /// Lowercase hex, as shown to clients.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Txid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Txid {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| TypeError::InvalidTxid(s.to_string()))?;
        let array: [u8; 32] = bytes
            .try_into()
            .map_err(|_| TypeError::InvalidTxid(s.to_string()))?;
        Ok(Self(array))
    }
}

impl TryFrom<String> for Txid {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Txid> for String {
    fn from(txid: Txid) -> Self {
        txid.to_hex()
    }
}

/// A (transaction id, output index) pair identifying a spendable output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outpoint {
    pub txid: Txid,
    pub output_index: u32,
}

impl Outpoint {
    #[must_use]
    pub const fn new(txid: Txid, output_index: u32) -> Self {
        Self { txid, output_index }
    }
}

impl fmt::Display for Outpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.txid, self.output_index)
    }
}

impl FromStr for Outpoint {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (txid, index) = s
            .split_once('.')
            .ok_or_else(|| TypeError::InvalidOutpoint(s.to_string()))?;
        let output_index = index
            .parse()
            .map_err(|_| TypeError::InvalidOutpoint(s.to_string()))?;
        Ok(Self::new(txid.parse()?, output_index))
    }
}

/// What a lookup returns for each match: `{ "txid", "outputIndex" }`.
pub type RecordRef = Outpoint;

// =============================================================================
// INDEX
// =============================================================================

/// A currently admitted announcement, as persisted by the record store.
///
/// One record per admitted and not-yet-spent/evicted output. Records are
/// never updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementRecord {
    /// Unique key.
    pub outpoint: Outpoint,
    /// Lowercase hex of the 33-byte identity key.
    pub identity_key: String,
    /// Advertised URI.
    pub domain: String,
    /// Topic (SHIP) or service (SLAP) name.
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl AnnouncementRecord {
    #[must_use]
    pub fn record_ref(&self) -> RecordRef {
        self.outpoint
    }
}

/// Ordering of results by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    /// Newest first.
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(TypeError::InvalidSortOrder(other.to_string())),
        }
    }
}
