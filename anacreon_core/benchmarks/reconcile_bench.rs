use anacreon_core::{apply_batch, GameState};
use anacreon_schema::decode_batch;
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use serde_json::{json, Value};

fn fleet(id: i64) -> Value {
    json!({
        "class": "fleet",
        "id": id,
        "ftlType": "jump",
        "name": format!("Fleet {id}"),
        "sovereignID": 7,
        "resources": [30, 10 + id % 50, 31, 5, 32, 1],
        "anchorObjID": null,
        "pos": [id as f64 * 0.5, 20.0],
        "dest": [10.0, 20.0],
        "destID": 1001,
        "eta": 1510
    })
}

fn synthetic_batch(size: i64) -> Vec<Value> {
    let mut batch = vec![json!({
        "class": "update",
        "nextUpdateTime": 30000,
        "sequence": 42,
        "update": 1500.5,
        "year0": 4021
    })];
    batch.extend((0..size).map(|offset| fleet(2000 + offset)));
    batch.extend(
        (0..size / 4).map(|offset| json!({ "class": "destroyedSpaceObject", "id": 2000 + offset * 4 })),
    );
    batch
}

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");

    for size in [64i64, 256, 1024, 4096] {
        group.bench_with_input(BenchmarkId::new("decode_and_apply", size), &size, |b, &size| {
            b.iter_batched(
                || synthetic_batch(size),
                |batch| {
                    let mut state = GameState::default();
                    apply_batch(&mut state, decode_batch(batch)).ok()
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(reconcile_benches, bench_reconcile);
criterion_main!(reconcile_benches);
