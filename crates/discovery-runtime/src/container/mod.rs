//! # Discovery Container
//!
//! Central container holding the per-protocol subsystem instances with
//! their shared infrastructure.
//!
//! - One topic manager and one lookup service per enabled protocol
//! - One record store per lookup service
//! - One event bus shared by every protocol

pub mod config;
pub mod services;

pub use config::{
    load_config, load_config_from, BusConfig, ConfigError, DiscoveryConfig, LoggingConfig,
    StoreBackend, StoreConfig,
};
pub use services::{ConcreteLookupService, DiscoveryContainer};
