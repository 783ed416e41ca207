//! Benchmarks for decoding and encoding.
//!
//! Benchmark targets:
//! - Typed decode of 10,000 rows: <10ms
//! - Typed encode of 10,000 rows: <10ms
//!
//! Covers both the typed record path and the runtime schema path.

// Criterion macros generate items without docs - this is expected for benchmarks
// Benchmarks use expect/unwrap for simplicity - panics are acceptable in benchmarks
#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used)]

use chrono::{DateTime, FixedOffset};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use csvmap::{ColumnSpec, Decoder, DynamicSchema, Encoder, Schema};
use std::hint::black_box;
use std::time::Duration;

csvmap::record! {
    #[derive(Debug, Default, Clone)]
    struct Trade {
        #[column = "Symbol"]
        symbol: String,
        qty: u32,
        price: f64,
        buy: bool,
        #[column = "Time"]
        time: DateTime<FixedOffset>,
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Renders `rows` trades as CSV text with a header line.
fn trades_csv(rows: usize) -> String {
    let mut out = String::from("Symbol,qty,price,buy,Time\n");
    for i in 0..rows {
        out.push_str(&format!(
            "SYM{},{},{}.25,{},2020-07-03T16:39:{:02}+01:00\n",
            i % 97,
            i,
            i % 1000,
            i % 2 == 0,
            i % 60
        ));
    }
    out
}

fn trade_schema() -> DynamicSchema {
    DynamicSchema::new(
        "trades",
        &[
            ColumnSpec::new("Symbol", "string"),
            ColumnSpec::new("qty", "u32"),
            ColumnSpec::new("price", "f64"),
            ColumnSpec::new("buy", "bool"),
            ColumnSpec::new("Time", "timestamp"),
        ],
    )
    .unwrap()
}

// ============================================================================
// Decode Benchmarks
// ============================================================================

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    group.measurement_time(Duration::from_secs(5));

    for rows in [100usize, 1_000, 10_000] {
        let input = trades_csv(rows);
        group.throughput(Throughput::Elements(rows as u64));

        group.bench_with_input(BenchmarkId::new("typed", rows), &input, |b, input| {
            b.iter(|| {
                let trades: Vec<Trade> = csvmap::decode_all(black_box(input.as_bytes())).unwrap();
                trades
            });
        });

        let schema = trade_schema();
        group.bench_with_input(BenchmarkId::new("dynamic", rows), &input, |b, input| {
            b.iter(|| {
                let mut out = Vec::with_capacity(rows);
                Decoder::new(black_box(input.as_bytes()))
                    .decode_dynamic(&schema, &mut out)
                    .unwrap();
                out
            });
        });
    }

    group.finish();
}

// ============================================================================
// Encode Benchmarks
// ============================================================================

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    group.measurement_time(Duration::from_secs(5));

    for rows in [100usize, 1_000, 10_000] {
        let trades: Vec<Trade> = csvmap::decode_all(trades_csv(rows).as_bytes()).unwrap();
        group.throughput(Throughput::Elements(rows as u64));

        group.bench_with_input(BenchmarkId::new("typed", rows), &trades, |b, trades| {
            b.iter(|| {
                Encoder::new(Vec::with_capacity(rows * 48))
                    .encode(black_box(trades))
                    .unwrap()
            });
        });

        group.bench_with_input(BenchmarkId::new("crlf", rows), &trades, |b, trades| {
            b.iter(|| {
                Encoder::new(Vec::with_capacity(rows * 48))
                    .with_crlf(true)
                    .encode(black_box(trades))
                    .unwrap()
            });
        });
    }

    group.finish();
}

// ============================================================================
// Schema Benchmarks
// ============================================================================

fn bench_schema(c: &mut Criterion) {
    let mut group = c.benchmark_group("schema");

    group.bench_function("build", |b| {
        b.iter(|| Schema::<Trade>::build().unwrap());
    });

    // Warm lookups hit the process-wide cache
    group.bench_function("cached", |b| {
        b.iter(|| Schema::<Trade>::cached().unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_decode, bench_encode, bench_schema);
criterion_main!(benches);
