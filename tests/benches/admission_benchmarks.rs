//! # Overlay Discovery Benchmarks
//!
//! | Subsystem | Operation | Target |
//! |-----------|-----------|--------|
//! | od-01 Codec | decode one token | < 10μs |
//! | od-02 Linkage | derive + verify one token | < 1ms |
//! | od-03 Admission | validate one output | < 1ms |
//! | od-03 Admission | batch of transactions (rayon) | scales with cores |
//! | od-04 Lookup | filtered query over 10k records | < 10ms |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::time::Duration;

use od_01_pushdrop_codec::decode;
use od_02_signature_linkage::{is_token_signature_correctly_linked, SignatureLinkageService};
use od_03_topic_admission::{validate_output, TopicManager};
use od_04_lookup_service::{
    InMemoryAnnouncementStore, LookupQuestion, LookupService, LookupServiceApi,
};
use od_tests::fixtures::{advertiser, announcement, funding, raw_transaction};
use serde_json::json;
use shared_types::{Outpoint, Protocol, Txid};

// ============================================================================
// OD-01 / OD-02: Codec and Linkage
// ============================================================================

fn bench_token_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("od-02-linkage");
    group.measurement_time(Duration::from_secs(10));

    let signer = advertiser();
    let script = announcement(&signer, Protocol::Ship, "https://host.example", "tm_bench");
    let token = decode(&script).expect("token");

    group.bench_function("decode_token", |b| b.iter(|| black_box(decode(&script))));

    group.bench_function("verify_linkage", |b| {
        b.iter(|| {
            black_box(is_token_signature_correctly_linked(
                &token.locking_key,
                &token.fields,
            ))
        })
    });

    group.bench_function("validate_output", |b| {
        let config = Protocol::Ship.config();
        b.iter(|| black_box(validate_output(config, &SignatureLinkageService, &script).is_ok()))
    });

    // Not a token at all: the overwhelmingly common case on chain
    let p2pkh = vec![0x76, 0xa9, 0x14, 0x00, 0x88, 0xac];
    group.bench_function("reject_non_token", |b| {
        let config = Protocol::Ship.config();
        b.iter(|| black_box(validate_output(config, &SignatureLinkageService, &p2pkh).is_err()))
    });

    group.finish();
}

// ============================================================================
// OD-03: Batch Admission
// ============================================================================

fn bench_batch_admission(c: &mut Criterion) {
    let mut group = c.benchmark_group("od-03-admission");
    group.measurement_time(Duration::from_secs(10));

    let signer = advertiser();
    let manager = TopicManager::new(Protocol::Ship);

    for size in [10usize, 100, 500] {
        let transactions: Vec<Vec<u8>> = (0..size)
            .map(|n| {
                raw_transaction(
                    &[funding((n % 256) as u8)],
                    vec![
                        announcement(&signer, Protocol::Ship, "https://host.example", "tm_bench"),
                        vec![0x6a],
                    ],
                )
            })
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("admit_batch", size), &transactions, |b, txs| {
            b.iter(|| black_box(manager.admit_batch(txs)))
        });
    }

    group.finish();
}

// ============================================================================
// OD-04: Lookup
// ============================================================================

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("od-04-lookup");
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");

    let store = Arc::new(InMemoryAnnouncementStore::new());
    let service = LookupService::new(Protocol::Ship, Arc::clone(&store));
    let signer = advertiser();

    runtime.block_on(async {
        for n in 0..10_000u32 {
            let name = format!("tm_topic_{}", n % 100);
            let script = announcement(&signer, Protocol::Ship, "https://host.example", &name);
            let mut txid = [0u8; 32];
            txid[..4].copy_from_slice(&n.to_le_bytes());
            service
                .output_admitted_by_topic("tm_ship", Outpoint::new(Txid(txid), 0), &script)
                .await
                .expect("stored");
        }
    });

    let filtered = LookupQuestion::new(
        "ls_ship",
        json!({ "topics": ["tm_topic_7", "tm_topic_42"], "limit": 50 }),
    );
    group.bench_function("filtered_topics_10k", |b| {
        b.iter(|| black_box(runtime.block_on(service.lookup(&filtered))))
    });

    let page = LookupQuestion::new("ls_ship", json!({ "findAll": true, "skip": 5000, "limit": 100 }));
    group.bench_function("find_all_page_10k", |b| {
        b.iter(|| black_box(runtime.block_on(service.lookup(&page))))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_token_verification,
    bench_batch_admission,
    bench_lookup,
);

criterion_main!(benches);
