//! # Integration Test Flows
//!
//! The runtime end to end: a raw transaction goes through the admission
//! pipeline, its ledger events cross the shared bus, the event router
//! updates the lookup services and a lookup returns the result.
//!
//! ## Flows Tested
//!
//! 1. **Admit → Lookup**: an admitted announcement becomes queryable
//! 2. **Spend / Evict → Lookup**: the record disappears again
//! 3. **Mutual exclusivity**: each protocol indexes only its own outputs
//! 4. **Rejections**: invalid announcements never reach the bus
//! 5. **Backpressure / Shutdown**: bursts and shutdown never lose an event

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use discovery_runtime::container::BusConfig;
    use discovery_runtime::{DiscoveryConfig, DiscoveryRuntime, SubmitError};
    use od_03_topic_admission::{AdmittanceInstructions, TopicManager};
    use od_04_lookup_service::{LookupQuestion, LookupServiceApi};
    use shared_bus::{EventFilter, EventPublisher, LedgerEvent};
    use shared_types::{Outpoint, Protocol};

    use crate::fixtures::{advertiser, announcement, funding, raw_transaction, routed};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    async fn started_runtime() -> DiscoveryRuntime {
        let runtime = DiscoveryRuntime::new(DiscoveryConfig::default()).expect("valid config");
        runtime.start().await.expect("runtime starts");
        runtime
    }

    async fn lookup(runtime: &DiscoveryRuntime, service: &str, query: serde_json::Value) -> Vec<Outpoint> {
        runtime
            .lookup(&LookupQuestion::new(service, query))
            .await
            .expect("lookup succeeds")
            .outputs()
            .to_vec()
    }

    // =============================================================================
    // ADMIT → LOOKUP
    // =============================================================================

    #[tokio::test]
    async fn test_admitted_announcement_becomes_queryable() {
        let runtime = started_runtime().await;
        let signer = advertiser();
        let raw = raw_transaction(
            &[funding(1)],
            vec![announcement(&signer, Protocol::Ship, "https://bridge.example", "tm_bridge")],
        );

        let report = runtime.pipeline().submit(&raw).await.unwrap();
        assert_eq!(report.admitted_count(), 1);
        routed(&runtime, 1).await;

        let expected = vec![Outpoint::new(report.txid, 0)];
        assert_eq!(lookup(&runtime, "ls_ship", json!("findAll")).await, expected);
        assert_eq!(
            lookup(&runtime, "ls_ship", json!({ "topics": ["tm_other", "tm_bridge"] })).await,
            expected
        );
        assert_eq!(
            lookup(
                &runtime,
                "ls_ship",
                json!({ "identityKey": hex::encode(signer.identity_key()) })
            )
            .await,
            expected
        );
        assert!(lookup(&runtime, "ls_ship", json!({ "domain": "https://other.example" }))
            .await
            .is_empty());
        assert!(lookup(&runtime, "ls_slap", json!("findAll")).await.is_empty());

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_results_follow_sort_order_and_paging() {
        let runtime = started_runtime().await;
        let signer = advertiser();

        let mut txids = Vec::new();
        for n in 0..3u8 {
            let raw = raw_transaction(
                &[funding(n)],
                vec![announcement(
                    &signer,
                    Protocol::Slap,
                    "https://lookup.example",
                    &format!("ls_service_{n}"),
                )],
            );
            txids.push(runtime.pipeline().submit(&raw).await.unwrap().txid);
        }
        routed(&runtime, 3).await;

        let oldest_first: Vec<Outpoint> = txids.iter().map(|t| Outpoint::new(*t, 0)).collect();
        let newest_first: Vec<Outpoint> = oldest_first.iter().rev().copied().collect();

        assert_eq!(lookup(&runtime, "ls_slap", json!("findAll")).await, newest_first);
        assert_eq!(
            lookup(&runtime, "ls_slap", json!({ "findAll": true, "sortOrder": "asc" })).await,
            oldest_first
        );
        assert_eq!(
            lookup(
                &runtime,
                "ls_slap",
                json!({ "findAll": true, "sortOrder": "asc", "skip": 1, "limit": 1 })
            )
            .await,
            vec![oldest_first[1]]
        );
        assert!(lookup(&runtime, "ls_slap", json!({ "findAll": true, "skip": 3 }))
            .await
            .is_empty());
        assert_eq!(
            lookup(&runtime, "ls_slap", json!({ "service": "ls_service_2" })).await,
            vec![oldest_first[2]]
        );

        runtime.shutdown().await;
    }

    // =============================================================================
    // SPEND / EVICT → LOOKUP
    // =============================================================================

    #[tokio::test]
    async fn test_spent_announcement_is_removed() {
        let runtime = started_runtime().await;
        let signer = advertiser();
        let raw = raw_transaction(
            &[funding(2)],
            vec![announcement(&signer, Protocol::Ship, "https://bridge.example", "tm_bridge")],
        );
        let admitted = runtime.pipeline().submit(&raw).await.unwrap();
        let coin = Outpoint::new(admitted.txid, 0);

        // Re-advertise from the spent coin: delete old, insert new
        let replacement = raw_transaction(
            &[coin],
            vec![announcement(&signer, Protocol::Ship, "https://bridge2.example", "tm_bridge")],
        );
        let report = runtime.pipeline().submit(&replacement).await.unwrap();
        assert_eq!(report.spent, vec![("tm_ship", coin)]);
        routed(&runtime, 3).await;

        assert_eq!(
            lookup(&runtime, "ls_ship", json!({ "topics": ["tm_bridge"] })).await,
            vec![Outpoint::new(report.txid, 0)]
        );
        assert!(lookup(&runtime, "ls_ship", json!({ "domain": "https://bridge.example" }))
            .await
            .is_empty());

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_evicted_announcement_is_removed() {
        let runtime = started_runtime().await;
        let signer = advertiser();
        let raw = raw_transaction(
            &[funding(3)],
            vec![announcement(&signer, Protocol::Slap, "https://lookup.example", "ls_identity")],
        );
        let report = runtime.pipeline().submit(&raw).await.unwrap();
        let coin = Outpoint::new(report.txid, 0);

        assert!(runtime.pipeline().evict(coin).await.unwrap());
        routed(&runtime, 2).await;

        assert!(lookup(&runtime, "ls_slap", json!("findAll")).await.is_empty());
        assert!(!runtime.pipeline().is_admitted("tm_slap", &coin));

        runtime.shutdown().await;
    }

    // =============================================================================
    // MUTUAL EXCLUSIVITY
    // =============================================================================

    #[tokio::test]
    async fn test_each_protocol_indexes_only_its_own_outputs() {
        let runtime = started_runtime().await;
        let signer = advertiser();
        let raw = raw_transaction(
            &[funding(4)],
            vec![
                announcement(&signer, Protocol::Ship, "https://host.example", "tm_meter"),
                announcement(&signer, Protocol::Slap, "https://lookup.example", "ls_meter"),
                vec![0x6a, 0x04, b'n', b'o', b'p', b'e'],
            ],
        );

        let report = runtime.pipeline().submit(&raw).await.unwrap();
        assert_eq!(report.admitted.get("tm_ship"), Some(&vec![0]));
        assert_eq!(report.admitted.get("tm_slap"), Some(&vec![1]));
        routed(&runtime, 2).await;

        assert_eq!(
            lookup(&runtime, "ls_ship", json!("findAll")).await,
            vec![Outpoint::new(report.txid, 0)]
        );
        assert_eq!(
            lookup(&runtime, "ls_slap", json!("findAll")).await,
            vec![Outpoint::new(report.txid, 1)]
        );

        let stats = runtime.router().stats();
        assert_eq!(stats.stored, 2);
        assert_eq!(stats.ignored, 2);
        assert_eq!(stats.failures, 0);

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_topic_filtered_subscriber_sees_only_its_topic() {
        let runtime = started_runtime().await;
        let container = runtime.container();
        let mut slap_only = container.event_bus.subscribe(EventFilter::topics(["tm_slap"]));
        let signer = advertiser();

        let raw = raw_transaction(
            &[funding(5)],
            vec![
                announcement(&signer, Protocol::Ship, "https://host.example", "tm_a"),
                announcement(&signer, Protocol::Slap, "https://lookup.example", "ls_a"),
            ],
        );
        runtime.pipeline().submit(&raw).await.unwrap();

        let event = slap_only.recv().await.expect("slap event");
        assert!(matches!(
            event,
            LedgerEvent::OutputAdmittedByTopic { ref topic, .. } if topic == "tm_slap"
        ));
        assert!(slap_only.try_recv().unwrap().is_none());

        runtime.shutdown().await;
    }

    // =============================================================================
    // REJECTIONS
    // =============================================================================

    #[tokio::test]
    async fn test_invalid_announcements_never_reach_the_bus() {
        let runtime = started_runtime().await;
        let signer = advertiser();
        let raw = raw_transaction(
            &[funding(6)],
            vec![
                // Loopback host
                announcement(&signer, Protocol::Ship, "https://localhost", "tm_bridge"),
                // Wrong prefix for the protocol
                announcement(&signer, Protocol::Ship, "https://host.example", "ls_bridge"),
                // Plain http is not advertisable
                announcement(&signer, Protocol::Slap, "http://lookup.example", "ls_bridge"),
            ],
        );

        let report = runtime.pipeline().submit(&raw).await.unwrap();
        assert_eq!(report.admitted_count(), 0);
        assert_eq!(runtime.container().event_bus.events_published(), 0);

        runtime.shutdown().await;
    }

    #[test]
    fn test_unparseable_transaction_does_not_abort_batch() {
        let manager = TopicManager::new(Protocol::Ship);
        let signer = advertiser();
        let good = raw_transaction(
            &[funding(7)],
            vec![announcement(&signer, Protocol::Ship, "https://host.example", "tm_batch")],
        );

        let results = manager.admit_batch(&[good.clone(), vec![0xff; 3], good]);

        assert_eq!(results[0].outputs_to_admit, vec![0]);
        assert_eq!(results[1], AdmittanceInstructions::none());
        assert_eq!(results[2].outputs_to_admit, vec![0]);
    }

    #[tokio::test]
    async fn test_lookup_services_behind_the_port() {
        let runtime = started_runtime().await;
        let container = runtime.container();

        for service in container.lookup_handlers() {
            let metadata = service.metadata();
            assert!(metadata.name.ends_with("Lookup Service"));
            assert!(!service.documentation().is_empty());
        }

        let handlers: Vec<Arc<dyn LookupServiceApi>> = container.lookup_handlers();
        assert_eq!(handlers.len(), 2);

        runtime.shutdown().await;
    }

    // =============================================================================
    // BACKPRESSURE / SHUTDOWN
    // =============================================================================

    #[tokio::test]
    async fn test_burst_beyond_bus_capacity_is_fully_indexed() {
        let config = DiscoveryConfig {
            bus: BusConfig {
                channel_capacity: 4,
            },
            ..DiscoveryConfig::default()
        };
        let runtime = DiscoveryRuntime::new(config).expect("valid config");
        runtime.start().await.expect("runtime starts");
        let signer = advertiser();

        for n in 0..10u8 {
            let raw = raw_transaction(
                &[funding(100 + n)],
                vec![announcement(
                    &signer,
                    Protocol::Ship,
                    "https://host.example",
                    "tm_burst",
                )],
            );
            runtime.pipeline().submit(&raw).await.unwrap();
        }
        routed(&runtime, 10).await;

        assert_eq!(lookup(&runtime, "ls_ship", json!("findAll")).await.len(), 10);
        let stats = runtime.router().stats();
        assert_eq!(stats.events, 10);
        assert_eq!(stats.stored, 10);
        assert_eq!(stats.failures, 0);

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_indexes_events_still_queued() {
        let runtime = started_runtime().await;
        let signer = advertiser();

        for n in 0..20u8 {
            let raw = raw_transaction(
                &[funding(150 + n)],
                vec![announcement(
                    &signer,
                    Protocol::Slap,
                    "https://lookup.example",
                    "ls_drain",
                )],
            );
            runtime.pipeline().submit(&raw).await.unwrap();
        }
        runtime.shutdown().await;

        let stats = runtime.router().stats();
        assert_eq!(stats.events, 20);
        assert_eq!(stats.stored, 20);
        assert_eq!(lookup(&runtime, "ls_slap", json!("findAll")).await.len(), 20);

        let late = raw_transaction(&[funding(200)], vec![vec![0x6a]]);
        assert!(matches!(
            runtime.pipeline().submit(&late).await,
            Err(SubmitError::Closed)
        ));
    }
}
