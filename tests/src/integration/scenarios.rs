//! # Concrete Scenarios
//!
//! Fixed announcements run through the whole runtime, checked against the
//! exact record they should (or should not) produce.

#[cfg(test)]
mod tests {
    use k256::SecretKey;
    use rand::rngs::OsRng;
    use serde_json::json;

    use discovery_runtime::{DiscoveryConfig, DiscoveryRuntime};
    use od_01_pushdrop_codec::{decode, encode};
    use od_02_signature_linkage::SignatureLinkageService;
    use od_03_topic_admission::{is_valid_output, validate_output, Rejection};
    use od_04_lookup_service::LookupQuestion;
    use shared_bus::{EventPublisher, LedgerEvent};
    use shared_types::{Outpoint, Protocol, Txid};

    use crate::fixtures::{advertiser, announcement, funding, raw_transaction, routed};

    async fn started_runtime() -> DiscoveryRuntime {
        let runtime = DiscoveryRuntime::new(DiscoveryConfig::default()).expect("valid config");
        runtime.start().await.expect("runtime starts");
        runtime
    }

    #[tokio::test]
    async fn test_host_announcement_stores_exact_record() {
        let runtime = started_runtime().await;
        let signer = advertiser();
        let script = announcement(&signer, Protocol::Ship, "https://example.com", "tm_bridge");

        let raw = raw_transaction(&[funding(10)], vec![script]);
        let report = runtime.pipeline().submit(&raw).await.unwrap();
        routed(&runtime, 1).await;

        let container = runtime.container();
        let store = container
            .lookup_service(Protocol::Ship)
            .unwrap()
            .store();
        let record = store
            .get(&Outpoint::new(report.txid, 0))
            .expect("record stored");

        assert_eq!(record.identity_key, hex::encode(signer.identity_key()));
        assert_eq!(record.domain, "https://example.com");
        assert_eq!(record.name, "tm_bridge");

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_relabelled_identifier_is_not_admitted() {
        let runtime = started_runtime().await;
        let signer = advertiser();
        let script = announcement(&signer, Protocol::Ship, "https://example.com", "tm_bridge");

        let token = decode(&script).unwrap();
        let mut fields = token.fields;
        fields[0] = b"SLAP".to_vec();
        let relabelled = encode(&token.locking_key, &fields).unwrap();

        let ship = Protocol::Ship.config();
        assert_eq!(
            validate_output(ship, &SignatureLinkageService, &relabelled),
            Err(Rejection::WrongIdentifier)
        );
        assert!(!is_valid_output(Protocol::Slap.config(), &SignatureLinkageService, &relabelled));

        let raw = raw_transaction(&[funding(11)], vec![relabelled]);
        let report = runtime.pipeline().submit(&raw).await.unwrap();
        assert_eq!(report.admitted_count(), 0);
        assert_eq!(runtime.container().event_bus.events_published(), 0);

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_ingestion_trusts_upstream_admission() {
        // Four unsigned fields would never pass admission, but an output the
        // ledger reports as admitted is indexed as-is.
        let runtime = started_runtime().await;
        let key = SecretKey::random(&mut OsRng).public_key();
        let identity = vec![0x02; 33];
        let script = encode(
            &key,
            &[
                b"SLAP".to_vec(),
                identity.clone(),
                b"https://lookup.example".to_vec(),
                b"ls_legacy".to_vec(),
            ],
        )
        .unwrap();
        assert!(!is_valid_output(Protocol::Slap.config(), &SignatureLinkageService, &script));

        let outpoint = Outpoint::new(Txid([0x5a; 32]), 3);
        runtime
            .container()
            .event_bus
            .publish(LedgerEvent::OutputAdmittedByTopic {
                topic: "tm_slap".into(),
                outpoint,
                locking_script: script,
            })
            .await;
        routed(&runtime, 1).await;

        let answer = runtime
            .lookup(&LookupQuestion::new(
                "ls_slap",
                json!({ "identityKey": hex::encode(&identity) }),
            ))
            .await
            .unwrap();
        assert_eq!(answer.outputs(), &[outpoint]);

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_negative_limit_rejected_naming_the_field() {
        let runtime = started_runtime().await;

        let err = runtime
            .lookup(&LookupQuestion::new("ls_ship", json!({ "limit": -1 })))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("query.limit"));
        assert!(err.is_query_error());

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_malformed_admitted_output_counts_as_failure() {
        let runtime = started_runtime().await;

        runtime
            .container()
            .event_bus
            .publish(LedgerEvent::OutputAdmittedByTopic {
                topic: "tm_ship".into(),
                outpoint: Outpoint::new(Txid([0x11; 32]), 0),
                locking_script: vec![0x6a],
            })
            .await;
        routed(&runtime, 1).await;

        let stats = runtime.router().stats();
        assert_eq!(stats.failures, 1);
        assert_eq!(stats.ignored, 1);
        assert_eq!(stats.stored, 0);

        runtime.shutdown().await;
    }
}
