//! Benchmark – `jsonstack::Parser` fed in chunks of varying size.
#![allow(missing_docs)]

use std::{fmt::Write, time::Duration};

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use jsonstack::{NumberPrecision, Parser, ParserOptions, chunk_utils::produce_chunks};

/// A deterministic document of roughly `records` objects with strings,
/// numbers, literals and a nested array each.
fn make_payload(records: usize) -> String {
    let mut s = String::from("[");
    for i in 0..records {
        if i > 0 {
            s.push(',');
        }
        write!(
            s,
            r#"{{"id":{i},"name":"item-{i}","score":{}.{},"tags":["a","b\n"],"ok":{}}}"#,
            i * 7,
            i % 100,
            i % 2 == 0
        )
        .unwrap();
    }
    s.push(']');
    s
}

/// A single object holding one long string, exercising the string fast path.
fn make_string_payload(len: usize) -> String {
    let mut s = String::with_capacity(len + 12);
    s.push_str("{\"data\":\"");
    s.extend(std::iter::repeat_n('a', len));
    s.push_str("\"}");
    s
}

fn run(payload: &[u8], parts: usize, number_precision: NumberPrecision) -> usize {
    let mut parser = Parser::new(ParserOptions {
        number_precision,
        ..Default::default()
    });
    for chunk in produce_chunks(payload, parts) {
        parser.feed(chunk).unwrap();
    }
    parser.finish().unwrap();
    let value = parser.take_result().unwrap();
    value.as_array().map_or(1, jsonstack::Sequence::len)
}

fn bench_records(c: &mut Criterion) {
    let payload = make_payload(2_000);
    let mut group = c.benchmark_group("records");
    group.throughput(Throughput::Bytes(payload.len() as u64));

    for &parts in &[1usize, 100, 10_000] {
        for precision in [NumberPrecision::Exact, NumberPrecision::Accumulate] {
            let name = format!("{precision:?}").to_lowercase();
            group.bench_with_input(BenchmarkId::new(parts.to_string(), name), &precision, |b, &p| {
                b.iter(|| black_box(run(black_box(payload.as_bytes()), parts, p)));
            });
        }
    }
    group.finish();
}

fn bench_long_string(c: &mut Criterion) {
    let payload = make_string_payload(100_000);
    let mut group = c.benchmark_group("long_string");
    group.throughput(Throughput::Bytes(payload.len() as u64));

    for &parts in &[1usize, 64, 4_096] {
        group.bench_with_input(BenchmarkId::from_parameter(parts), &parts, |b, &parts| {
            b.iter(|| black_box(run(black_box(payload.as_bytes()), parts, NumberPrecision::Exact)));
        });
    }
    group.finish();
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(3))
            .measurement_time(Duration::from_secs(10));
    }
    c
}

criterion_group! { name = benches; config = criterion(); targets = bench_records, bench_long_string }
criterion_main!(benches);
