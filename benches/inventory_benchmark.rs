use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use firestore_watch::firestore::{
    DocumentKey, DocumentRecord, FirestoreValue, MapValue, OrderDirection, QueryInventory,
    Timestamp,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Documents with a random numeric `score` and a string `name`.
fn create_documents(count: usize, seed: u64) -> Vec<DocumentRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let fields: MapValue = [
                ("score".to_string(), FirestoreValue::from_double(rng.gen_range(0.0..1000.0))),
                ("name".to_string(), FirestoreValue::from_string(format!("doc-{i}"))),
            ]
            .into_iter()
            .collect();
            DocumentRecord::new(
                DocumentKey::from_string(&format!("bench/doc-{i:06}")).unwrap(),
                fields,
                Timestamp::new(1, 0),
                Timestamp::new(1, 0),
            )
        })
        .collect()
}

fn new_inventory() -> QueryInventory {
    QueryInventory::from_order_by([
        ("score", OrderDirection::Descending),
        ("name", OrderDirection::Ascending),
    ])
    .unwrap()
}

/// One commit per document versus a single commit for the whole load.
fn bench_commit_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("initial_load");

    for size in [100, 1_000, 10_000].iter() {
        let docs = create_documents(*size, 7);

        group.bench_with_input(BenchmarkId::new("incremental", size), &docs, |b, docs| {
            b.iter(|| {
                let inventory = new_inventory();
                for doc in docs {
                    inventory.stage_add(doc.clone());
                    inventory.commit(None);
                }
                black_box(inventory.len())
            });
        });

        group.bench_with_input(BenchmarkId::new("bulk", size), &docs, |b, docs| {
            b.iter(|| {
                let inventory = new_inventory();
                for doc in docs {
                    inventory.stage_add(doc.clone());
                }
                inventory.commit(None);
                black_box(inventory.len())
            });
        });
    }

    group.finish();
}

/// Small update bursts against a large, already loaded inventory.
fn bench_update_bursts(c: &mut Criterion) {
    let docs = create_documents(10_000, 11);
    let updates = create_documents(10_000, 12);
    let inventory = new_inventory();
    for doc in &docs {
        inventory.stage_add(doc.clone());
    }
    inventory.commit(None);

    let mut group = c.benchmark_group("update_burst");
    for burst in [1, 10, 100].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(burst), burst, |b, &burst| {
            let mut offset = 0;
            b.iter(|| {
                for doc in updates.iter().cycle().skip(offset).take(burst) {
                    inventory.stage_add(doc.clone());
                }
                offset = (offset + burst) % updates.len();
                black_box(inventory.to_query_snapshot(Timestamp::new(2, 0)).len())
            });
        });
    }
    group.finish();
}

fn bench_build_snapshot(c: &mut Criterion) {
    let inventory = new_inventory();
    for doc in create_documents(10_000, 13) {
        inventory.stage_add(doc);
    }
    inventory.commit(None);

    c.bench_function("build_snapshot_10k", |b| {
        b.iter(|| black_box(inventory.build_snapshot(Timestamp::new(3, 0)).len()));
    });
}

/// Reports comparator calls per strategy; the timings above hide this ratio.
fn report_comparisons(_c: &mut Criterion) {
    let docs = create_documents(10_000, 17);

    let incremental = new_inventory();
    for doc in &docs {
        incremental.stage_add(doc.clone());
        incremental.commit(None);
    }
    let bulk = new_inventory();
    for doc in &docs {
        bulk.stage_add(doc.clone());
    }
    bulk.commit(None);

    println!(
        "comparisons for 10k documents: incremental={} bulk={}",
        incremental.comparator().comparisons(),
        bulk.comparator().comparisons()
    );
}

criterion_group!(
    benches,
    bench_commit_strategies,
    bench_update_bursts,
    bench_build_snapshot,
    report_comparisons
);
criterion_main!(benches);
