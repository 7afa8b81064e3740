//! Criterion benchmarks for ludwieg
//!
//! Run with: cargo bench

use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ludwieg::*;

const TRADE_ID: u8 = 1;

fn trade_schema() -> Schema {
    Schema::new(vec![
        FieldSchema::of(LogicalType::U32),
        FieldSchema::of(LogicalType::U64),
        FieldSchema::of(LogicalType::DynInt),
        FieldSchema::of(LogicalType::U32),
        FieldSchema::of(LogicalType::String),
        FieldSchema::of(LogicalType::String),
    ])
}

fn trade_values(symbol: Option<&str>, note: Option<&str>) -> Vec<Value> {
    vec![
        Value::u32(12345),
        Value::u64(1_700_000_000_000_000_000),
        Value::dyn_int(50_000_000),
        Value::u32(100),
        Value::String(symbol.map(|s| Bytes::copy_from_slice(s.as_bytes()))),
        Value::String(note.map(|s| Bytes::copy_from_slice(s.as_bytes()))),
    ]
}

fn registry() -> Registry {
    let mut registry = Registry::new();
    registry.register(TRADE_ID, trade_schema()).unwrap();
    registry
}

fn bench_trade_encode(c: &mut Criterion) {
    let schema = trade_schema();
    let cases = [
        ("trade_encode_minimal", trade_values(None, None)),
        ("trade_encode_with_symbol", trade_values(Some("AAPL"), None)),
        ("trade_encode_full", trade_values(Some("AAPL"), Some("Buy order"))),
    ];

    for (name, values) in &cases {
        c.bench_function(name, |b| {
            b.iter(|| {
                let bytes = serialize(black_box(values), black_box(&schema), TRADE_ID, 1).unwrap();
                black_box(bytes);
            });
        });
    }
}

fn bench_trade_decode(c: &mut Criterion) {
    let schema = trade_schema();
    let registry = registry();
    let cases = [
        ("trade_decode_minimal", trade_values(None, None)),
        ("trade_decode_full", trade_values(Some("AAPL"), Some("Buy order"))),
    ];

    for (name, values) in &cases {
        let frame = serialize(values, &schema, TRADE_ID, 1).unwrap();
        c.bench_function(name, |b| {
            let mut de = Deserializer::new();
            b.iter(|| {
                for candidate in de.feed_slice(black_box(&frame)) {
                    black_box(candidate.decode(&registry).unwrap());
                }
            });
        });
    }
}

fn bench_trade_roundtrip(c: &mut Criterion) {
    let schema = trade_schema();
    let registry = registry();
    let values = trade_values(Some("AAPL"), Some("Buy order"));

    c.bench_function("trade_roundtrip_full", |b| {
        let mut de = Deserializer::new();
        b.iter(|| {
            let frame = serialize(black_box(&values), &schema, TRADE_ID, 1).unwrap();
            for candidate in de.feed_slice(&frame) {
                black_box(candidate.decode(&registry).unwrap());
            }
        });
    });
}

fn bench_size_prefix(c: &mut Criterion) {
    let mut group = c.benchmark_group("size_prefix");

    for value in [0u64, 200, 60_000, 4_000_000_000, u64::MAX] {
        group.bench_with_input(BenchmarkId::new("encode", value), &value, |b, &value| {
            let mut buf = Vec::with_capacity(size::MAX_SIZE_LEN);
            b.iter(|| {
                buf.clear();
                black_box(size::encode(black_box(value), &mut buf));
            });
        });

        let mut encoded = Vec::new();
        size::encode(value, &mut encoded);
        group.bench_with_input(BenchmarkId::new("decode", value), &encoded, |b, encoded| {
            b.iter(|| black_box(size::decode(black_box(encoded)).unwrap()));
        });
    }

    group.finish();
}

fn bench_variable_string_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("variable_sizes");
    let schema = trade_schema();

    let symbols = [
        "A".to_string(),
        "AAPL".to_string(),
        "VERY_LONG_SYMBOL_NAME_FOR_TESTING_PERFORMANCE".to_string(),
        "X".repeat(100),
        "Y".repeat(300),
        "Z".repeat(70_000),
    ];

    for symbol in &symbols {
        let values = trade_values(Some(symbol.as_str()), None);
        group.throughput(Throughput::Bytes(symbol.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("trade_with_symbol", symbol.len()),
            &values,
            |b, values| {
                b.iter(|| black_box(serialize(black_box(values), &schema, TRADE_ID, 1).unwrap()));
            },
        );
    }

    group.finish();
}

fn bench_stream_framing(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream_framing");
    let schema = trade_schema();

    for batch_size in [10usize, 100, 1000] {
        let mut stream = Vec::new();
        for i in 0..batch_size {
            let symbol = if i % 3 == 0 { Some("AAPL") } else { None };
            let frame = serialize(&trade_values(symbol, None), &schema, TRADE_ID, i as u8).unwrap();
            stream.extend_from_slice(&frame);
        }

        group.throughput(Throughput::Bytes(stream.len() as u64));
        group.bench_with_input(BenchmarkId::new("feed", batch_size), &stream, |b, stream| {
            let mut de = Deserializer::new();
            b.iter(|| {
                let candidates = de.feed_slice(black_box(stream));
                assert_eq!(candidates.len(), batch_size);
                black_box(candidates);
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_trade_encode,
    bench_trade_decode,
    bench_trade_roundtrip,
    bench_size_prefix,
    bench_variable_string_sizes,
    bench_stream_framing
);
criterion_main!(benches);
