//! Aggregation fold benchmarks
//!
//! Measures the pure per-session fold over synthetic sweeps, separately from
//! provider fetch cost (which dominates in production and is external).
//!
//! Run with: cargo bench --bench aggregation

use std::collections::BTreeSet;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use hparam_schema::aggregate::aggregate_sessions;
use hparam_schema::schema::MetricName;
use hparam_schema::session::SessionRecord;

const SMALL_SWEEP: usize = 100;
const LARGE_SWEEP: usize = 10_000;

/// Synthetic sweep: numeric lr/batch_size, categorical model, two metrics.
fn synthetic_sessions(n: usize) -> Vec<(SessionRecord, BTreeSet<MetricName>)> {
    let mut rng = StdRng::seed_from_u64(42);
    let models = ["CNN", "LATTICE", "RNN", "MLP"];
    (0..n)
        .map(|_| {
            let record = SessionRecord::builder()
                .hparam("lr", f64::from(rng.gen_range(1..100)) / 1000.0)
                .hparam("batch_size", f64::from(rng.gen_range(1..16) * 32))
                .hparam("model_type", models[rng.gen_range(0..models.len())])
                .hparam("use_dropout", rng.gen_bool(0.5))
                .build();
            let metrics = BTreeSet::from([
                MetricName::new("", "loss"),
                MetricName::new("eval", "loss"),
            ]);
            (record, metrics)
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("schema_aggregation");

    for &size in &[SMALL_SWEEP, LARGE_SWEEP] {
        let sessions = synthetic_sessions(size);
        group.bench_with_input(
            BenchmarkId::new("fold", size),
            &sessions,
            |b, sessions| {
                b.iter(|| aggregate_sessions(10, black_box(sessions.clone())));
            },
        );
    }

    group.finish();
}

fn bench_aggregate_unbounded_domains(c: &mut Criterion) {
    let mut group = c.benchmark_group("schema_aggregation_unbounded");

    // Every session carries a unique string value: domains blow past the cap
    // early and the fold degrades to pure type tracking.
    let sessions: Vec<(SessionRecord, BTreeSet<MetricName>)> = (0..LARGE_SWEEP)
        .map(|i| {
            let record = SessionRecord::builder()
                .hparam("run_name", format!("trial_{i}"))
                .build();
            (record, BTreeSet::new())
        })
        .collect();

    group.bench_function("fold_high_cardinality", |b| {
        b.iter(|| aggregate_sessions(10, black_box(sessions.clone())));
    });

    group.finish();
}

criterion_group!(benches, bench_aggregate, bench_aggregate_unbounded_domains);
criterion_main!(benches);
