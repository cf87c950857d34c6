//! # Shared Types Crate
//!
//! This crate contains the vocabulary shared by the admission, lookup and
//! event-routing subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: protocol identifiers, prefixes and topic
//!   names are defined once in [`ProtocolConfig`].
//! - **One Generic Algorithm**: SHIP and SLAP differ only in the facts
//!   carried by their `ProtocolConfig`; subsystems never branch on the
//!   variant beyond reading those facts.

pub mod entities;
pub mod errors;
pub mod protocol;

pub use entities::*;
pub use errors::*;
pub use protocol::*;
