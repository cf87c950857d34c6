//! # Domain Layer
//!
//! Pure cryptographic logic with no I/O dependencies.

pub mod derivation;
pub mod errors;
pub mod linkage;
pub mod signer;
