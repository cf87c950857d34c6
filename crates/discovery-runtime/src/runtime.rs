//! # Discovery Runtime
//!
//! Owns the container, the admission pipeline and the event router task.
//!
//! ## Startup Sequence
//!
//! 1. Build the container from a validated configuration
//! 2. Prepare every record store (`ensure_indexes`)
//! 3. Subscribe the event router to the bus and spawn it
//! 4. Accept submissions and lookups
//!
//! ## Shutdown Sequence
//!
//! 1. Close the admission pipeline and wait for in-flight submissions
//! 2. Signal the router, which dispatches everything still queued
//! 3. Abort the router if that takes longer than the grace period

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use od_04_lookup_service::{is_missing, LookupAnswer, LookupError, LookupQuestion, LookupServiceApi};
use parking_lot::Mutex;
use shared_bus::{EventFilter, EventPublisher};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::container::{DiscoveryConfig, DiscoveryContainer};
use crate::wiring::{AdmissionPipeline, EventRouter};

/// How long each shutdown step may take before it is cut short.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// The runtime hosting every enabled protocol.
pub struct DiscoveryRuntime {
    container: Arc<DiscoveryContainer>,
    pipeline: Arc<AdmissionPipeline>,
    router: Arc<EventRouter>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    router_task: Mutex<Option<JoinHandle<()>>>,
}

impl DiscoveryRuntime {
    /// Create a runtime from a configuration.
    ///
    /// # Errors
    /// The configuration does not validate.
    pub fn new(config: DiscoveryConfig) -> Result<Self> {
        config.validate().context("Invalid discovery configuration")?;

        let container = Arc::new(DiscoveryContainer::new(config));
        let publisher: Arc<dyn EventPublisher> = container.event_bus.clone();
        let pipeline = Arc::new(AdmissionPipeline::new(
            container.topic_managers.clone(),
            publisher,
        ));
        let router = Arc::new(EventRouter::new(container.lookup_handlers()));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok(Self {
            container,
            pipeline,
            router,
            shutdown_tx,
            shutdown_rx,
            router_task: Mutex::new(None),
        })
    }

    /// Prepare the stores and start routing ledger events.
    ///
    /// # Errors
    /// A record store could not be prepared.
    pub async fn start(&self) -> Result<()> {
        info!("===========================================");
        info!("  Overlay Discovery Runtime v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        self.container
            .initialize()
            .await
            .context("Failed to prepare record stores")?;

        // Subscribe before returning so no published event is missed
        let subscription = self.container.event_bus.subscribe(EventFilter::all());
        let router = Arc::clone(&self.router);
        let shutdown = self.shutdown_rx.clone();
        let handle = tokio::spawn(async move { router.run(subscription, shutdown).await });
        *self.router_task.lock() = Some(handle);

        for protocol in &self.container.config.protocols {
            info!(%protocol, "Protocol enabled");
        }
        info!(
            bus_capacity = self.container.event_bus.capacity(),
            "Discovery runtime started"
        );
        Ok(())
    }

    /// Answer a lookup addressed to any enabled service.
    ///
    /// # Errors
    /// * `LookupError::QueryRequired` - no query
    /// * `LookupError::ServiceNotSupported` - no enabled service has this id
    /// * anything the addressed service returns
    pub async fn lookup(&self, question: &LookupQuestion) -> Result<LookupAnswer, LookupError> {
        if is_missing(&question.query) {
            return Err(LookupError::QueryRequired);
        }
        let service = self
            .container
            .lookup_service_by_id(&question.service)
            .ok_or(LookupError::ServiceNotSupported)?;
        service.lookup(question).await
    }

    /// Shut down gracefully.
    ///
    /// Stops accepting submissions, then lets the router dispatch every
    /// event already published before it exits.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");

        if tokio::time::timeout(SHUTDOWN_GRACE, self.pipeline.close())
            .await
            .is_err()
        {
            warn!("In-flight submissions did not finish within {:?}", SHUTDOWN_GRACE);
        }

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        let handle = self.router_task.lock().take();
        if let Some(mut handle) = handle {
            match tokio::time::timeout(SHUTDOWN_GRACE, &mut handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!("Event router task failed: {}", e),
                Err(_) => {
                    warn!("Event router did not drain within {:?}", SHUTDOWN_GRACE);
                    handle.abort();
                }
            }
        }

        let stats = self.router.stats();
        info!(
            subscribers = self.container.event_bus.subscriber_count(),
            events = stats.events,
            stored = stats.stored,
            deleted = stats.deleted,
            failures = stats.failures,
            "Shutdown complete"
        );
    }

    pub fn container(&self) -> Arc<DiscoveryContainer> {
        Arc::clone(&self.container)
    }

    pub fn pipeline(&self) -> Arc<AdmissionPipeline> {
        Arc::clone(&self.pipeline)
    }

    pub fn router(&self) -> Arc<EventRouter> {
        Arc::clone(&self.router)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared_types::Protocol;

    #[test]
    fn test_invalid_config_rejected() {
        let config = DiscoveryConfig {
            protocols: Vec::new(),
            ..DiscoveryConfig::default()
        };
        assert!(DiscoveryRuntime::new(config).is_err());
    }

    #[tokio::test]
    async fn test_lookup_routes_by_service_id() {
        let runtime = DiscoveryRuntime::new(DiscoveryConfig::default()).unwrap();
        runtime.start().await.unwrap();

        let answer = runtime
            .lookup(&LookupQuestion::new("ls_slap", json!("findAll")))
            .await
            .unwrap();
        assert!(answer.outputs().is_empty());

        let err = runtime
            .lookup(&LookupQuestion::new("ls_other", json!("findAll")))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Lookup service not supported!");

        let err = runtime
            .lookup(&LookupQuestion::new("ls_other", json!(null)))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "A valid query must be provided!");

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_disabled_service_not_supported() {
        let config = DiscoveryConfig {
            protocols: vec![Protocol::Ship],
            ..DiscoveryConfig::default()
        };
        let runtime = DiscoveryRuntime::new(config).unwrap();

        let err = runtime
            .lookup(&LookupQuestion::new("ls_slap", json!("findAll")))
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::ServiceNotSupported));
    }

    #[tokio::test]
    async fn test_shutdown_stops_router() {
        let runtime = DiscoveryRuntime::new(DiscoveryConfig::default()).unwrap();
        runtime.start().await.unwrap();
        assert_eq!(runtime.container.event_bus.subscriber_count(), 1);

        runtime.shutdown().await;
        assert!(runtime.router_task.lock().is_none());
        assert!(runtime.pipeline.is_closed());
        assert_eq!(runtime.container.event_bus.subscriber_count(), 0);
    }
}
