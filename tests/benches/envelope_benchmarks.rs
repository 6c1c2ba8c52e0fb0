//! # Envelope Benchmarks
//!
//! Every message on the bus pays for id generation, construction and, when
//! it crosses a process boundary, JSON encoding. These benchmarks track those
//! costs.

use bus_envelope::{
    decode, encode, generate_id, resource, Envelope, EnvelopeFactory, Operation,
    SequentialIdGenerator,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use serde_json::{json, Value};
use std::sync::Arc;

fn sample_request(payload_items: usize) -> Envelope {
    let mut rng = rand::thread_rng();
    let items: Vec<Value> = (0..payload_items)
        .map(|i| json!({ "name": format!("pod-{i}"), "cpu": rng.gen_range(1..64) }))
        .collect();

    Envelope::new("")
        .with_route("edgehub", "edged", resource::PODLIST, Operation::Query)
        .with_content(json!({ "items": items }))
}

fn bench_id_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("identity");

    group.bench_function("uuid_v4", |b| b.iter(|| black_box(generate_id())));

    let sequential = EnvelopeFactory::default()
        .with_id_generator(Arc::new(SequentialIdGenerator::new("bench")));
    group.bench_function("sequential", |b| b.iter(|| black_box(sequential.generate_id())));

    group.finish();
}

fn bench_construction_and_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("derivation");
    let factory = EnvelopeFactory::default();
    let request = sample_request(4);

    group.bench_function("new_envelope_with_route", |b| {
        b.iter(|| {
            black_box(
                factory
                    .new_envelope("")
                    .with_route("edgehub", "edged", resource::POD, Operation::Insert),
            )
        })
    });
    group.bench_function("clone_envelope", |b| {
        b.iter(|| black_box(factory.clone_envelope(&request)))
    });
    group.bench_function("new_response", |b| {
        b.iter(|| black_box(factory.new_response(&request, json!({ "status": "ok" }))))
    });
    group.bench_function("new_error", |b| {
        b.iter(|| {
            let error: Envelope = factory.new_error(&request, "not found");
            black_box(error)
        })
    });

    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    for items in [1usize, 16, 256] {
        let msg = sample_request(items);
        let bytes = encode(&msg).expect("encode");
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_with_input(BenchmarkId::new("encode", items), &msg, |b, msg| {
            b.iter(|| black_box(encode(msg).expect("encode")))
        });
        group.bench_with_input(BenchmarkId::new("decode", items), &bytes, |b, bytes| {
            b.iter(|| black_box(decode::<Value>(bytes).expect("decode")))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_id_generation,
    bench_construction_and_derivation,
    bench_codec
);
criterion_main!(benches);
