//! # Discovery Runtime Library
//!
//! This library exposes the runtime's modules for testing. The main entry
//! point is the `main.rs` binary.
//!
//! ## Modular Structure
//!
//! - `container/` - Configuration and the per-protocol subsystem container
//! - `wiring/` - Admission pipeline and ledger event routing
//! - `runtime` - Startup and shutdown of the whole process

#![allow(clippy::module_name_repetitions)]

pub mod container;
pub mod runtime;
pub mod wiring;

pub use container::{load_config, ConfigError, DiscoveryConfig, DiscoveryContainer};
pub use runtime::DiscoveryRuntime;
pub use wiring::{
    AdmissionPipeline, DispatchSummary, EventRouter, RouterStats, SubmitError,
    SubmitReport,
};
