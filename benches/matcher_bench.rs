//! Trigger detection and suggestion matching benchmarks.
//!
//! Both run on every keystroke in an observed input, so they must stay far
//! below a frame (16 ms) even for large stores.
//!
//! # Groups
//!
//! | Group | What it measures |
//! |-------|-----------------|
//! | `trigger` | `detect` on short and long values |
//! | `match` | `match_suggestions` across store sizes and fragment selectivity |
//! | `filter` | `filter_entries` (key, value and tag) for the entries pane |
//!
//! # Viewing results
//!
//! ```sh
//! cargo bench --bench matcher_bench
//! open target/criterion/report/index.html
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use slashfill_core::matcher::{filter_entries, match_suggestions};
use slashfill_core::trigger::detect;
use slashfill_core::{Entry, EntryMap};
use std::hint::black_box;

fn store(size: usize) -> EntryMap {
    (0..size)
        .map(|i| {
            let tag = ["dev", "staging", "prod"][i % 3];
            Entry::new(format!("key_{i:06}"), format!("value-{i}"), tag)
        })
        .map(|e| (e.id(), e))
        .collect()
}

// ---------------------------------------------------------------------------
// Trigger detection
// ---------------------------------------------------------------------------

fn trigger_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("trigger");

    let short = "hello /tok";
    group.bench_function("short_value", |b| {
        b.iter(|| detect(black_box(short), black_box(short.len())))
    });

    let long = format!("{}/tok", "lorem ipsum dolor sit amet ".repeat(400));
    group.bench_function("long_value_10k_chars", |b| {
        b.iter(|| detect(black_box(&long), black_box(long.len())))
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

fn match_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("match");

    for size in [100usize, 1_000, 10_000] {
        let entries = store(size);
        group.throughput(Throughput::Elements(size as u64));

        // Empty fragment: every entry is a suggestion.
        group.bench_with_input(BenchmarkId::new("all", size), &entries, |b, e| {
            b.iter(|| match_suggestions(black_box(""), e.values()))
        });

        // Selective fragment: only the first hundred keys.
        group.bench_with_input(BenchmarkId::new("selective", size), &entries, |b, e| {
            b.iter(|| match_suggestions(black_box("KEY_0000"), e.values()))
        });
    }

    group.finish();
}

fn filter_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");

    for size in [1_000usize, 10_000] {
        let entries = store(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("by_tag", size), &entries, |b, e| {
            b.iter(|| filter_entries(black_box("staging"), e.iter()))
        });
    }

    group.finish();
}

criterion_group!(matcher_benches, trigger_bench, match_bench, filter_bench);
criterion_main!(matcher_benches);
