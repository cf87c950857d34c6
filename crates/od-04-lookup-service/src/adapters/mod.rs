//! # Adapters
//!
//! - `memory`: in-process record store

pub mod memory;

pub use memory::InMemoryAnnouncementStore;
