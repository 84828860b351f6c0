// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use hessian_bridge::{decode_message, Composite, Message, Registration, TypeRegistry};
use libfuzzer_sys::fuzz_target;
use std::collections::HashMap;

#[derive(Debug, Composite)]
#[hessian(java_class = "org.apache.dubbo.tests.api.EchoMultiBoolResponse")]
struct EchoMultiBoolResponse {
    base_resp: bool,
    list_resp: Vec<bool>,
    map_resp: HashMap<bool, bool>,
}

#[derive(Debug, Message)]
struct EchoResult {
    success: Option<EchoMultiBoolResponse>,
    code: i32,
    note: Option<String>,
}

fuzz_target!(|data: &[u8]| {
    let registry = TypeRegistry::new();
    let _ = registry.register_all([Registration::of::<EchoMultiBoolResponse>()]);

    // Decode + bind must fail cleanly, never panic
    let _ = decode_message::<EchoResult>(data, &registry);
});
