//! # Ports Layer
//!
//! - `inbound`: the topic manager API
//! - `outbound`: the transaction envelope decoder

pub mod inbound;
pub mod outbound;
