// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use hessian_bridge::{CodecConfig, Decoder, Encoder, TypeRegistry, UnknownCompositePolicy};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let registry = TypeRegistry::new();
    let config = CodecConfig::default()
        .with_max_depth(64)
        .with_max_collection_len(1 << 16)
        .with_max_replay_bytes(1 << 16)
        .with_unknown_composite(UnknownCompositePolicy::Retain);

    // Decode every value in the stream until the first error
    let mut decoder = Decoder::with_config(data, &registry, config);
    let mut values = Vec::new();
    while !decoder.is_exhausted() {
        match decoder.decode() {
            Ok(value) => values.push(value),
            Err(_) => return,
        }
    }

    // Whatever decodes must re-encode and decode to the same values
    let mut encoder = Encoder::with_config(&registry, config);
    for value in &values {
        if encoder.encode_value(value).is_err() {
            return;
        }
    }
    let bytes = encoder.into_bytes();
    let mut decoder = Decoder::with_config(&bytes, &registry, config);
    for value in &values {
        let again = decoder.decode().expect("re-encoded stream must decode");
        assert!(same(value, &again), "round trip changed {value:?} into {again:?}");
    }
});

/// Equality with NaN equal to itself.
fn same(a: &hessian_bridge::Value, b: &hessian_bridge::Value) -> bool {
    use hessian_bridge::Value;
    match (a, b) {
        (Value::Double(x), Value::Double(y)) => x == y || (x.is_nan() && y.is_nan()),
        (Value::List(x), Value::List(y)) => {
            x.type_name == y.type_name
                && x.items.len() == y.items.len()
                && x.items.iter().zip(&y.items).all(|(a, b)| same(a, b))
        }
        (Value::Map(x), Value::Map(y)) => {
            x.type_name == y.type_name
                && x.entries.len() == y.entries.len()
                && x
                    .entries
                    .iter()
                    .zip(&y.entries)
                    .all(|((ka, va), (kb, vb))| same(ka, kb) && same(va, vb))
        }
        (Value::Composite(x), Value::Composite(y)) => {
            x.type_name == y.type_name
                && x.fields.len() == y.fields.len()
                && x
                    .fields
                    .iter()
                    .zip(&y.fields)
                    .all(|((na, va), (nb, vb))| na == nb && same(va, vb))
        }
        _ => a == b,
    }
}
