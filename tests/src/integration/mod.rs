//! # Cross-Subsystem Integration
//!
//! - `flows` - the runtime end to end: submit, route, look up
//! - `scenarios` - fixed announcements with exact expected records

pub mod flows;
pub mod scenarios;
