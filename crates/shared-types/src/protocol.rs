//! # Protocol Variants
//!
//! SHIP (Service Host Interconnect Protocol) advertises that a host serves a
//! topic; SLAP (Service Lookup Availability Protocol) advertises that a host
//! provides a lookup service. Both share one token layout:
//!
//! ```text
//! [0] identifier   "SHIP" | "SLAP"
//! [1] identity key 33-byte compressed secp256k1 point
//! [2] advertised URI
//! [3] topic or service name ("tm_*" | "ls_*")
//! [4] DER signature over fields [0..4] (admission path only)
//! ```

use crate::errors::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a lookup query constrains the advertised name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameFilterKind {
    /// `topics: string[]`, any-match (SHIP).
    Topics,
    /// `service: string`, exact match (SLAP).
    Service,
}

impl NameFilterKind {
    /// The JSON field name used by lookup queries.
    #[must_use]
    pub const fn query_field(self) -> &'static str {
        match self {
            Self::Topics => "topics",
            Self::Service => "service",
        }
    }
}

/// Variant-specific facts consumed by the generic validator and query engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolConfig {
    pub protocol: Protocol,
    /// Literal expected in field 0.
    pub identifier: &'static str,
    /// Required prefix of the advertised name in field 3.
    pub name_prefix: &'static str,
    /// Topic under which the topic manager admits outputs.
    pub topic_manager: &'static str,
    /// Service id the lookup service answers to.
    pub lookup_service: &'static str,
    /// Key-derivation protocol name bound to the identity key.
    pub derivation_protocol: &'static str,
    pub name_filter: NameFilterKind,
}

const SHIP_CONFIG: ProtocolConfig = ProtocolConfig {
    protocol: Protocol::Ship,
    identifier: "SHIP",
    name_prefix: "tm_",
    topic_manager: "tm_ship",
    lookup_service: "ls_ship",
    derivation_protocol: "service host interconnect",
    name_filter: NameFilterKind::Topics,
};

const SLAP_CONFIG: ProtocolConfig = ProtocolConfig {
    protocol: Protocol::Slap,
    identifier: "SLAP",
    name_prefix: "ls_",
    topic_manager: "tm_slap",
    lookup_service: "ls_slap",
    derivation_protocol: "service lookup availability",
    name_filter: NameFilterKind::Service,
};

/// The two advertisement protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    /// Host advertisement: "I host this topic".
    Ship,
    /// Service advertisement: "I provide this lookup service".
    Slap,
}

impl Protocol {
    /// Both variants, in a stable order.
    pub const ALL: [Protocol; 2] = [Protocol::Ship, Protocol::Slap];

    /// Variant facts.
    #[must_use]
    pub const fn config(self) -> &'static ProtocolConfig {
        match self {
            Self::Ship => &SHIP_CONFIG,
            Self::Slap => &SLAP_CONFIG,
        }
    }

    /// Resolve a variant from the raw bytes of field 0.
    ///
    /// The identifiers are distinct, so at most one variant matches.
    #[must_use]
    pub fn from_identifier(field: &[u8]) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.config().identifier.as_bytes() == field)
    }

    /// Literal identifier ("SHIP" / "SLAP").
    #[must_use]
    pub const fn identifier(self) -> &'static str {
        self.config().identifier
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for Protocol {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SHIP" => Ok(Self::Ship),
            "SLAP" => Ok(Self::Slap),
            other => Err(TypeError::UnknownProtocol(other.to_string())),
        }
    }
}
