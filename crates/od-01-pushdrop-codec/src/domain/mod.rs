//! # Domain Layer
//!
//! Pure script logic with no I/O dependencies.

pub mod errors;
pub mod opcodes;
pub mod pushdrop;
pub mod script;
