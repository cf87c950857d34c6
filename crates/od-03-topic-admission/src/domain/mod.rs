//! # Domain Layer
//!
//! Pure admission logic: URI and name policies, the generic validator and
//! the entities exchanged with the topic manager.

pub mod entities;
pub mod errors;
pub mod name_policy;
pub mod token;
pub mod uri_policy;
pub mod validator;
