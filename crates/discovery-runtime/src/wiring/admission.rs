//! # Admission Pipeline
//!
//! A minimal ledger layer in front of the topic managers. It runs a
//! submitted transaction through every topic manager and publishes the
//! resulting ledger events on the bus:
//!
//! 1. inputs that consume a coin admitted under a topic → `OutputSpent`
//! 2. admitted outputs → `OutputAdmittedByTopic`
//!
//! Only coins admitted through this pipeline are tracked. Consensus, fee
//! rules and proof checking stay with the real ledger.
//!
//! Signature checks run concurrently. Updating the coin set and publishing
//! the matching events happen under one sequencing lock, so the bus sees
//! submissions in the same order the coin set does: a spend is never
//! published ahead of the admission it consumes.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use od_03_topic_admission::{
    txid_of, AdmittanceInstructions, DecodeError, RawTransactionDecoder, TopicManager,
    TopicManagerApi, Transaction, TransactionDecoder,
};
use parking_lot::RwLock;
use shared_bus::{EventPublisher, LedgerEvent};
use shared_types::{Outpoint, Txid};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The runtime is shutting down.
    #[error("Admission pipeline is closed")]
    Closed,
}

/// What one submission did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReport {
    pub txid: Txid,
    /// Admitted output indices per topic. Topics admitting nothing are absent.
    pub admitted: BTreeMap<&'static str, Vec<u32>>,
    /// Previously admitted coins consumed by this transaction.
    pub spent: Vec<(&'static str, Outpoint)>,
}

impl SubmitReport {
    /// Total outputs admitted across every topic.
    #[must_use]
    pub fn admitted_count(&self) -> usize {
        self.admitted.values().map(Vec::len).sum()
    }
}

/// Runs submissions through the topic managers and publishes the outcome.
pub struct AdmissionPipeline {
    managers: Vec<Arc<TopicManager>>,
    decoder: RawTransactionDecoder,
    publisher: Arc<dyn EventPublisher>,
    /// Topics each admitted coin is currently held under.
    coins: RwLock<HashMap<Outpoint, BTreeSet<&'static str>>>,
    /// Held from the coin update through the last publish of a submission.
    sequencer: Mutex<()>,
    closed: AtomicBool,
}

impl AdmissionPipeline {
    pub fn new(managers: Vec<Arc<TopicManager>>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            managers,
            decoder: RawTransactionDecoder,
            publisher,
            coins: RwLock::new(HashMap::new()),
            sequencer: Mutex::new(()),
            closed: AtomicBool::new(false),
        }
    }

    /// Whether `outpoint` is currently admitted under `topic`.
    pub fn is_admitted(&self, topic: &str, outpoint: &Outpoint) -> bool {
        self.coins
            .read()
            .get(outpoint)
            .is_some_and(|topics| topics.contains(topic))
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Refuse new work, then wait for in-flight submissions to finish
    /// publishing.
    pub async fn close(&self) {
        self.closed.store(true, Ordering::Release);
        drop(self.sequencer.lock().await);
        debug!("Admission pipeline closed");
    }

    /// Submit a raw transaction.
    ///
    /// # Errors
    /// * `SubmitError::Decode` - the transaction cannot be parsed
    /// * `SubmitError::Closed` - the pipeline was closed
    ///
    /// Nothing is published in either case.
    pub async fn submit(&self, raw: &[u8]) -> Result<SubmitReport, SubmitError> {
        if self.is_closed() {
            return Err(SubmitError::Closed);
        }
        let tx = self.decoder.decode(raw)?;
        let txid = txid_of(raw);

        let validated: Vec<(&'static str, AdmittanceInstructions)> = self
            .managers
            .iter()
            .map(|manager| {
                let previous_coins = self.tracked_inputs(manager.topic(), &tx);
                (
                    manager.topic(),
                    manager.identify_admissible_outputs(raw, &previous_coins),
                )
            })
            .collect();

        let _turn = self.sequencer.lock().await;
        if self.is_closed() {
            return Err(SubmitError::Closed);
        }

        let mut report = SubmitReport {
            txid,
            admitted: BTreeMap::new(),
            spent: Vec::new(),
        };
        let events = self.apply(&tx, validated, &mut report);

        for event in events {
            self.publisher.publish(event).await;
        }

        info!(
            %txid,
            admitted = report.admitted_count(),
            spent = report.spent.len(),
            "Transaction submitted"
        );
        Ok(report)
    }

    /// Remove `outpoint` from every topic without a spend.
    ///
    /// Returns whether the outpoint was tracked. The eviction is published
    /// either way.
    ///
    /// # Errors
    /// `SubmitError::Closed` once the pipeline is closed.
    pub async fn evict(&self, outpoint: Outpoint) -> Result<bool, SubmitError> {
        let _turn = self.sequencer.lock().await;
        if self.is_closed() {
            return Err(SubmitError::Closed);
        }

        let tracked = self.coins.write().remove(&outpoint).is_some();
        debug!(%outpoint, tracked, "Evicting output");
        self.publisher
            .publish(LedgerEvent::OutputEvicted { outpoint })
            .await;
        Ok(tracked)
    }

    /// Input indices of `tx` spending coins held under `topic`.
    fn tracked_inputs(&self, topic: &'static str, tx: &Transaction) -> Vec<u32> {
        let coins = self.coins.read();
        tx.inputs
            .iter()
            .zip(0u32..)
            .filter(|(input, _)| {
                coins
                    .get(&input.previous_output)
                    .is_some_and(|topics| topics.contains(topic))
            })
            .map(|(_, index)| index)
            .collect()
    }

    /// Update the coin set and build the events, spends first per topic.
    ///
    /// Spends are recomputed here against the current coin set; the
    /// snapshot taken during validation may be stale.
    fn apply(
        &self,
        tx: &Transaction,
        validated: Vec<(&'static str, AdmittanceInstructions)>,
        report: &mut SubmitReport,
    ) -> Vec<LedgerEvent> {
        let mut coins = self.coins.write();
        let mut events = Vec::new();

        for (topic, instructions) in validated {
            for (input, index) in tx.inputs.iter().zip(0u32..) {
                let outpoint = input.previous_output;
                if instructions.coins_to_retain.contains(&index) {
                    continue;
                }
                let Some(topics) = coins.get_mut(&outpoint) else {
                    continue;
                };
                if !topics.remove(topic) {
                    continue;
                }
                if topics.is_empty() {
                    coins.remove(&outpoint);
                }
                report.spent.push((topic, outpoint));
                events.push(LedgerEvent::OutputSpent {
                    topic: topic.to_string(),
                    outpoint,
                });
            }

            for &index in &instructions.outputs_to_admit {
                let Some(output) = tx.outputs.get(index as usize) else {
                    continue;
                };
                let outpoint = Outpoint::new(report.txid, index);
                coins.entry(outpoint).or_default().insert(topic);
                events.push(LedgerEvent::OutputAdmittedByTopic {
                    topic: topic.to_string(),
                    outpoint,
                    locking_script: output.locking_script.clone(),
                });
            }

            if !instructions.outputs_to_admit.is_empty() {
                report.admitted.insert(topic, instructions.outputs_to_admit);
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use k256::SecretKey;
    use od_02_signature_linkage::AnnouncementSigner;
    use od_03_topic_admission::{encode_transaction, Transaction, TxInput, TxOutput};
    use rand::rngs::OsRng;
    use shared_bus::{EventFilter, EventKind, InMemoryEventBus};
    use shared_types::Protocol;
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Holds the first publish until `gate` is notified and records the
    /// order events arrive in.
    #[derive(Default)]
    struct GatedPublisher {
        held: AtomicBool,
        entered: Notify,
        gate: Notify,
        order: parking_lot::Mutex<Vec<EventKind>>,
    }

    #[async_trait]
    impl EventPublisher for GatedPublisher {
        async fn publish(&self, event: LedgerEvent) -> usize {
            if !self.held.swap(true, Ordering::SeqCst) {
                self.entered.notify_one();
                self.gate.notified().await;
            }
            self.order.lock().push(event.kind());
            1
        }

        fn events_published(&self) -> u64 {
            self.order.lock().len() as u64
        }
    }

    fn managers() -> Vec<Arc<TopicManager>> {
        Protocol::ALL
            .into_iter()
            .map(|p| Arc::new(TopicManager::new(p)))
            .collect()
    }

    fn pipeline() -> (AdmissionPipeline, Arc<InMemoryEventBus>) {
        let bus = Arc::new(InMemoryEventBus::new());
        (
            AdmissionPipeline::new(managers(), bus.clone() as Arc<dyn EventPublisher>),
            bus,
        )
    }

    fn transaction(inputs: Vec<Outpoint>, scripts: Vec<Vec<u8>>) -> Vec<u8> {
        encode_transaction(&Transaction {
            version: 1,
            inputs: inputs
                .into_iter()
                .map(|previous_output| TxInput {
                    previous_output,
                    unlocking_script: vec![0x51],
                    sequence: u32::MAX,
                })
                .collect(),
            outputs: scripts
                .into_iter()
                .map(|locking_script| TxOutput {
                    satoshis: 1,
                    locking_script,
                })
                .collect(),
            lock_time: 0,
        })
    }

    #[tokio::test]
    async fn test_submit_publishes_admissions_per_topic() {
        let (pipeline, bus) = pipeline();
        let mut sub = bus.subscribe(EventFilter::all());
        let signer = AnnouncementSigner::new(SecretKey::random(&mut OsRng));

        let raw = transaction(
            vec![Outpoint::new(Txid([9; 32]), 0)],
            vec![
                vec![0x6a],
                signer
                    .create_announcement(Protocol::Slap, "https://lookup.example", "ls_treasury")
                    .unwrap(),
                signer
                    .create_announcement(Protocol::Ship, "https://host.example", "tm_treasury")
                    .unwrap(),
            ],
        );

        let report = pipeline.submit(&raw).await.unwrap();
        assert_eq!(report.admitted.get("tm_ship"), Some(&vec![2]));
        assert_eq!(report.admitted.get("tm_slap"), Some(&vec![1]));
        assert!(report.spent.is_empty());
        assert!(pipeline.is_admitted("tm_ship", &Outpoint::new(report.txid, 2)));

        let first = sub.try_recv().unwrap().unwrap();
        assert_eq!(first.topic(), Some("tm_ship"));
        assert_eq!(first.outpoint(), Outpoint::new(report.txid, 2));
        let second = sub.try_recv().unwrap().unwrap();
        assert_eq!(second.topic(), Some("tm_slap"));
        assert!(sub.try_recv().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_spending_admitted_coin_publishes_spend() {
        let (pipeline, bus) = pipeline();
        let signer = AnnouncementSigner::new(SecretKey::random(&mut OsRng));
        let raw = transaction(
            vec![Outpoint::new(Txid([9; 32]), 0)],
            vec![signer
                .create_announcement(Protocol::Ship, "https://host.example", "tm_treasury")
                .unwrap()],
        );
        let admitted = pipeline.submit(&raw).await.unwrap();
        let coin = Outpoint::new(admitted.txid, 0);

        let mut sub = bus.subscribe(EventFilter::all());
        let spend = transaction(vec![coin], vec![vec![0x6a]]);
        let report = pipeline.submit(&spend).await.unwrap();

        assert_eq!(report.spent, vec![("tm_ship", coin)]);
        assert_eq!(report.admitted_count(), 0);
        assert!(!pipeline.is_admitted("tm_ship", &coin));
        assert_eq!(
            sub.try_recv().unwrap(),
            Some(LedgerEvent::OutputSpent {
                topic: "tm_ship".into(),
                outpoint: coin,
            })
        );
    }

    #[tokio::test]
    async fn test_malformed_submission_publishes_nothing() {
        let (pipeline, bus) = pipeline();
        let mut sub = bus.subscribe(EventFilter::all());

        assert!(pipeline.submit(&[0x01, 0x00]).await.is_err());
        assert!(sub.try_recv().unwrap().is_none());
        assert_eq!(bus.events_published(), 0);
    }

    #[tokio::test]
    async fn test_evict_untracks_and_publishes() {
        let (pipeline, bus) = pipeline();
        let mut sub = bus.subscribe(EventFilter::all());
        let stray = Outpoint::new(Txid([3; 32]), 1);

        assert!(!pipeline.evict(stray).await.unwrap());
        assert_eq!(
            sub.try_recv().unwrap(),
            Some(LedgerEvent::OutputEvicted { outpoint: stray })
        );
    }

    #[tokio::test]
    async fn test_concurrent_spend_waits_for_admission_to_publish() {
        let publisher = Arc::new(GatedPublisher::default());
        let pipeline = Arc::new(AdmissionPipeline::new(
            managers(),
            publisher.clone() as Arc<dyn EventPublisher>,
        ));
        let signer = AnnouncementSigner::new(SecretKey::random(&mut OsRng));
        let raw = transaction(
            vec![Outpoint::new(Txid([4; 32]), 0)],
            vec![signer
                .create_announcement(Protocol::Ship, "https://host.example", "tm_treasury")
                .unwrap()],
        );
        let coin = Outpoint::new(txid_of(&raw), 0);
        let spend = transaction(vec![coin], vec![vec![0x6a]]);

        let admit = {
            let pipeline = Arc::clone(&pipeline);
            tokio::spawn(async move { pipeline.submit(&raw).await })
        };
        // The admission holds its first publish open
        publisher.entered.notified().await;

        let spender = {
            let pipeline = Arc::clone(&pipeline);
            tokio::spawn(async move { pipeline.submit(&spend).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        publisher.gate.notify_one();

        assert_eq!(admit.await.unwrap().unwrap().admitted_count(), 1);
        assert_eq!(spender.await.unwrap().unwrap().spent, vec![("tm_ship", coin)]);
        assert_eq!(
            publisher.order.lock().as_slice(),
            &[EventKind::Admitted, EventKind::Spent]
        );
        assert!(!pipeline.is_admitted("tm_ship", &coin));
    }

    #[tokio::test]
    async fn test_closed_pipeline_refuses_work() {
        let (pipeline, bus) = pipeline();
        pipeline.close().await;

        assert!(pipeline.is_closed());
        assert!(matches!(
            pipeline.submit(&transaction(Vec::new(), vec![vec![0x6a]])).await,
            Err(SubmitError::Closed)
        ));
        assert!(matches!(
            pipeline.evict(Outpoint::new(Txid([3; 32]), 0)).await,
            Err(SubmitError::Closed)
        ));
        assert_eq!(bus.events_published(), 0);
    }
}
