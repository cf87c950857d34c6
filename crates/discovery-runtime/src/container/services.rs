//! # Service Container
//!
//! Holds the subsystem instances for every enabled protocol and the event
//! bus that connects them to the ledger layer.
//!
//! ## Thread Safety
//!
//! - All services wrapped in `Arc` for shared ownership
//! - Services are internally synchronized; the container itself is immutable
//! - The event bus is the sole channel from the ledger layer into the index

use std::sync::Arc;

use od_03_topic_admission::TopicManager;
use od_04_lookup_service::{
    InMemoryAnnouncementStore, LookupError, LookupService, LookupServiceApi,
};
use shared_bus::InMemoryEventBus;
use shared_types::Protocol;
use tracing::{info, instrument};

use crate::container::config::{DiscoveryConfig, StoreBackend};

/// Concrete lookup service type for the in-memory backend.
pub type ConcreteLookupService = LookupService<InMemoryAnnouncementStore>;

/// Central container holding all subsystem instances.
pub struct DiscoveryContainer {
    /// Admission engines, in configured protocol order.
    pub topic_managers: Vec<Arc<TopicManager>>,

    /// Query engines, in configured protocol order.
    pub lookup_services: Vec<Arc<ConcreteLookupService>>,

    /// Ledger event bus shared by every protocol.
    pub event_bus: Arc<InMemoryEventBus>,

    /// Runtime configuration (immutable after initialization).
    pub config: DiscoveryConfig,
}

impl DiscoveryContainer {
    /// Create the container with one subsystem pair per enabled protocol.
    ///
    /// The configuration is expected to have passed
    /// [`DiscoveryConfig::validate`].
    #[instrument(name = "container_init", skip(config))]
    pub fn new(config: DiscoveryConfig) -> Self {
        info!("Initializing overlay discovery container");

        let event_bus = Arc::new(InMemoryEventBus::with_capacity(
            config.bus.channel_capacity,
        ));

        let mut topic_managers = Vec::with_capacity(config.protocols.len());
        let mut lookup_services = Vec::with_capacity(config.protocols.len());

        for &protocol in &config.protocols {
            let store = match config.store.backend {
                StoreBackend::Memory => Arc::new(InMemoryAnnouncementStore::new()),
            };
            let manager = TopicManager::new(protocol);
            let lookup = LookupService::new(protocol, store);

            info!(
                %protocol,
                topic = manager.topic(),
                service = lookup.service_id(),
                backend = ?config.store.backend,
                "Protocol subsystems initialized"
            );

            topic_managers.push(Arc::new(manager));
            lookup_services.push(Arc::new(lookup));
        }

        Self {
            topic_managers,
            lookup_services,
            event_bus,
            config,
        }
    }

    /// Prepare every record store for use.
    ///
    /// # Errors
    /// The first store failure.
    pub async fn initialize(&self) -> Result<(), LookupError> {
        for service in &self.lookup_services {
            service.initialize().await?;
        }
        Ok(())
    }

    /// Topic manager for `protocol`, if enabled.
    #[must_use]
    pub fn topic_manager(&self, protocol: Protocol) -> Option<&Arc<TopicManager>> {
        self.topic_managers
            .iter()
            .find(|m| m.protocol() == protocol)
    }

    /// Lookup service for `protocol`, if enabled.
    #[must_use]
    pub fn lookup_service(&self, protocol: Protocol) -> Option<&Arc<ConcreteLookupService>> {
        self.lookup_services
            .iter()
            .find(|s| s.protocol() == protocol)
    }

    /// Lookup service answering to `service_id` (`ls_ship` / `ls_slap`).
    #[must_use]
    pub fn lookup_service_by_id(&self, service_id: &str) -> Option<&Arc<ConcreteLookupService>> {
        self.lookup_services
            .iter()
            .find(|s| s.service_id() == service_id)
    }

    /// Every lookup service behind the inbound port, for event routing.
    #[must_use]
    pub fn lookup_handlers(&self) -> Vec<Arc<dyn LookupServiceApi>> {
        self.lookup_services
            .iter()
            .map(|s| Arc::clone(s) as Arc<dyn LookupServiceApi>)
            .collect()
    }
}
