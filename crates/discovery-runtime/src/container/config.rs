//! # Discovery Configuration
//!
//! Unified configuration for the runtime: which protocols run, how large the
//! event bus is, which record store backs the lookup services and how
//! verbose logging is.
//!
//! Every field has a default; environment variables override them:
//!
//! | Variable          | Field                    | Example     |
//! |-------------------|--------------------------|-------------|
//! | `OD_PROTOCOLS`    | `protocols`              | `SHIP,SLAP` |
//! | `OD_BUS_CAPACITY` | `bus.channel_capacity`   | `4096`      |
//! | `OD_LOG`          | `logging.filter`         | `debug`     |

use shared_bus::DEFAULT_CHANNEL_CAPACITY;
use shared_types::{Protocol, TypeError};
use thiserror::Error;

pub const ENV_PROTOCOLS: &str = "OD_PROTOCOLS";
pub const ENV_BUS_CAPACITY: &str = "OD_BUS_CAPACITY";
pub const ENV_LOG: &str = "OD_LOG";

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// Enabled advertisement protocols, without duplicates.
    pub protocols: Vec<Protocol>,
    /// Event bus configuration.
    pub bus: BusConfig,
    /// Record store configuration.
    pub store: StoreConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            protocols: Protocol::ALL.to_vec(),
            bus: BusConfig::default(),
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl DiscoveryConfig {
    /// Check the configuration before anything is wired.
    ///
    /// # Errors
    /// * `ConfigError::NoProtocols` - nothing would run
    /// * `ConfigError::ZeroCapacity` - the bus could not buffer any event
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.protocols.is_empty() {
            return Err(ConfigError::NoProtocols);
        }
        if self.bus.channel_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }

    /// Whether `protocol` is enabled.
    #[must_use]
    pub fn is_enabled(&self, protocol: Protocol) -> bool {
        self.protocols.contains(&protocol)
    }
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No protocols enabled. Set OD_PROTOCOLS to SHIP, SLAP or SHIP,SLAP.")]
    NoProtocols,

    #[error("Event bus channel capacity must be greater than zero")]
    ZeroCapacity,

    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    #[error(transparent)]
    Protocol(#[from] TypeError),
}

/// Event bus configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusConfig {
    /// Events queued per subscriber before publishers wait.
    pub channel_capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Record store backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// Process-local store; records are lost on restart.
    #[default]
    Memory,
}

/// Record store configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive string.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Load configuration from the process environment.
///
/// # Errors
/// Any [`ConfigError`]; the result is validated before it is returned.
pub fn load_config() -> Result<DiscoveryConfig, ConfigError> {
    load_config_from(|var| std::env::var(var).ok())
}

/// Load configuration from an arbitrary variable source.
///
/// Unset or blank variables keep their defaults.
///
/// # Errors
/// Any [`ConfigError`]; the result is validated before it is returned.
pub fn load_config_from<F>(lookup: F) -> Result<DiscoveryConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = DiscoveryConfig::default();
    let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(list) = var(ENV_PROTOCOLS) {
        config.protocols = parse_protocols(&list)?;
    }

    if let Some(capacity) = var(ENV_BUS_CAPACITY) {
        config.bus.channel_capacity =
            capacity
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    var: ENV_BUS_CAPACITY,
                    value: capacity.clone(),
                })?;
    }

    if let Some(filter) = var(ENV_LOG) {
        config.logging.filter = filter.trim().to_string();
    }

    config.validate()?;
    Ok(config)
}

/// Parse a comma-separated protocol list, dropping duplicates.
fn parse_protocols(list: &str) -> Result<Vec<Protocol>, ConfigError> {
    let mut protocols = Vec::new();
    for item in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let protocol: Protocol = item.parse()?;
        if !protocols.contains(&protocol) {
            protocols.push(protocol);
        }
    }
    Ok(protocols)
}
