//! # Test Fixtures
//!
//! Builders for signed announcements and raw transactions, plus a helper
//! that waits for the event router to catch up with the bus.

use std::time::Duration;

use discovery_runtime::DiscoveryRuntime;
use k256::SecretKey;
use od_02_signature_linkage::AnnouncementSigner;
use od_03_topic_admission::{encode_transaction, Transaction, TxInput, TxOutput};
use rand::rngs::OsRng;
use shared_types::{Outpoint, Protocol, Txid};

/// An advertiser with a fresh random identity.
pub fn advertiser() -> AnnouncementSigner {
    AnnouncementSigner::new(SecretKey::random(&mut OsRng))
}

/// A signed announcement locking script.
///
/// # Panics
/// If signing fails, which a random identity never triggers.
pub fn announcement(
    signer: &AnnouncementSigner,
    protocol: Protocol,
    uri: &str,
    name: &str,
) -> Vec<u8> {
    signer
        .create_announcement(protocol, uri, name)
        .expect("announcement signs")
}

/// A raw transaction spending `inputs` into outputs locked by `scripts`.
pub fn raw_transaction(inputs: &[Outpoint], scripts: Vec<Vec<u8>>) -> Vec<u8> {
    encode_transaction(&Transaction {
        version: 1,
        inputs: inputs
            .iter()
            .map(|&previous_output| TxInput {
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

/// A funding outpoint distinct per `n`.
pub fn funding(n: u8) -> Outpoint {
    Outpoint::new(Txid([n; 32]), 0)
}

/// Wait until the router has dispatched at least `events` events.
///
/// # Panics
/// After two seconds without progress.
pub async fn routed(runtime: &DiscoveryRuntime, events: u64) {
    let router = runtime.router();
    tokio::time::timeout(Duration::from_secs(2), async {
        while router.stats().events < events {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("router did not catch up");
}
