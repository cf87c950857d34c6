//! # PushDrop Field Codec (OD-01)
//!
//! Decodes and encodes the data-carrying locking script used by overlay
//! advertisement tokens:
//!
//! ```text
//! <push pubkey> OP_CHECKSIG <push field_1> ... <push field_N> OP_2DROP{N/2} [OP_DROP]
//! ```
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Pure byte-level logic, no I/O
//!
//! ## Behaviour
//!
//! - Most outputs on chain are not tokens, so [`decode`] reports a shape
//!   mismatch as `None` rather than an error and never panics.
//! - [`encode`] is the inverse, using the smallest push form per field.

pub mod domain;

// Re-export public API
pub use domain::errors::CodecError;
pub use domain::opcodes;
pub use domain::pushdrop::{decode, encode, PushDropToken};
pub use domain::script::{Chunk, Script};
