//! # Domain Layer
//!
//! Query parsing, ingestion of admitted outputs and the lookup entities.

pub mod entities;
pub mod errors;
pub mod ingestion;
pub mod query;
