//! # Ports Layer
//!
//! - `inbound`: the lookup service API
//! - `outbound`: the announcement record store

pub mod inbound;
pub mod outbound;
