// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_panics_doc)]

//! Codec throughput benchmarks
//!
//! Measures:
//! - Message encode / decode+bind for a typical RPC response
//! - Dynamic decode of a large typed list
//! - Long non-ASCII string encoding (UTF-16 length path)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hessian_bridge::{
    decode_message, encode_message, Composite, Decoder, Encoder, Message, TypeRegistry,
};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Composite)]
#[hessian(java_class = "org.apache.dubbo.tests.api.EchoMultiInt64Response")]
struct EchoMultiInt64Response {
    base_resp: i64,
    list_resp: Vec<i64>,
    map_resp: HashMap<i64, i64>,
}

#[derive(Debug, Clone, PartialEq, Message)]
struct EchoMultiInt64Result {
    success: EchoMultiInt64Response,
}

fn response(len: usize) -> EchoMultiInt64Result {
    EchoMultiInt64Result {
        success: EchoMultiInt64Response {
            base_resp: 1 << 40,
            list_resp: (0..len as i64).map(|i| i * 7919).collect(),
            map_resp: (0..len as i64 / 4).map(|i| (i, -i)).collect(),
        },
    }
}

fn bench_message_roundtrip(c: &mut Criterion) {
    let registry = TypeRegistry::new();
    registry
        .register_type::<EchoMultiInt64Response>()
        .expect("register");

    let mut group = c.benchmark_group("message");
    for len in [8usize, 256, 4096] {
        let message = response(len);
        let bytes = encode_message(&message, &registry).expect("encode");
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_with_input(BenchmarkId::new("encode", len), &message, |b, m| {
            b.iter(|| encode_message(black_box(m), &registry).expect("encode"));
        });
        group.bench_with_input(BenchmarkId::new("decode_bind", len), &bytes, |b, bytes| {
            b.iter(|| {
                decode_message::<EchoMultiInt64Result>(black_box(bytes), &registry)
                    .expect("decode")
            });
        });
    }
    group.finish();
}

fn bench_dynamic_decode(c: &mut Criterion) {
    let registry = TypeRegistry::new();
    let mut encoder = Encoder::new(&registry);
    let items: Vec<i32> = (0..65_536).collect();
    encoder.encode(&items).expect("encode");
    let bytes = encoder.into_bytes();

    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("int_list_64k", |b| {
        b.iter(|| {
            Decoder::new(black_box(&bytes), &registry)
                .decode()
                .expect("decode")
        });
    });
    group.finish();
}

fn bench_string_encode(c: &mut Criterion) {
    let registry = TypeRegistry::new();
    let ascii = "hessian ".repeat(8192);
    let mixed = "h\u{e9}ssi\u{e2}n \u{1f600}".repeat(4096);

    let mut group = c.benchmark_group("string");
    for (name, text) in [("ascii", &ascii), ("mixed", &mixed)] {
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut encoder = Encoder::new(&registry);
                encoder.write_str(black_box(text));
                encoder.len()
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_message_roundtrip,
    bench_dynamic_decode,
    bench_string_encode
);
criterion_main!(benches);
