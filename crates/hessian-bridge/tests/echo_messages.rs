// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::missing_panics_doc)]
#![allow(clippy::items_after_statements)]

//! Echo service messages exchanged with a Dubbo Java provider.
//!
//! Argument and result records are flat messages; request and response
//! payloads are registered composites.

use hessian_bridge::{
    decode_message, decode_message_into, decode_message_with, encode_message, CodecConfig,
    Composite, Decoder, Error, ErrorKind, Message, Registration, TypeRegistry,
    UnknownCompositePolicy, Value,
};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Composite)]
#[hessian(java_class = "kitex.echo.EchoRequest")]
struct EchoRequest {
    int32: i32,
}

#[derive(Debug, Clone, PartialEq, Composite)]
#[hessian(java_class = "kitex.echo.EchoResponse")]
struct EchoResponse {
    int32: i32,
}

#[derive(Debug, Clone, PartialEq, Composite)]
#[hessian(java_class = "org.apache.dubbo.tests.api.EchoMultiBoolResponse")]
struct EchoMultiBoolResponse {
    base_resp: bool,
    list_resp: Vec<bool>,
    map_resp: HashMap<bool, bool>,
}

#[derive(Debug, Clone, PartialEq, Message)]
struct TestServiceEchoArgs {
    req: EchoRequest,
}

#[derive(Debug, Clone, PartialEq, Message)]
struct TestServiceEchoResult {
    success: EchoResponse,
}

#[derive(Debug, Clone, PartialEq, Message)]
struct TestServiceEchoMultiBoolArgs {
    base_req: bool,
    list_req: Vec<bool>,
    map_req: HashMap<bool, bool>,
}

#[derive(Debug, Clone, PartialEq, Message)]
struct TestServiceEchoMultiBoolResult {
    success: EchoMultiBoolResponse,
}

#[derive(Debug, Clone, PartialEq, Message)]
struct TestServiceEchoInt64Args {
    req: i64,
}

#[derive(Debug, Clone, PartialEq, Message)]
struct TestServiceEchoInt32Args {
    req: i32,
}

fn registry() -> TypeRegistry {
    let registry = TypeRegistry::new();
    registry
        .register_all([
            Registration::of::<EchoRequest>(),
            Registration::of::<EchoResponse>(),
            Registration::of::<EchoMultiBoolResponse>(),
        ])
        .expect("register echo types");
    registry
}

fn multi_bool() -> EchoMultiBoolResponse {
    EchoMultiBoolResponse {
        base_resp: true,
        list_resp: vec![true, false, true],
        map_resp: HashMap::from([(true, false)]),
    }
}

#[test]
fn test_echo_roundtrip() {
    let registry = registry();
    let args = TestServiceEchoArgs {
        req: EchoRequest { int32: 42 },
    };
    let bytes = encode_message(&args, &registry).expect("encode");
    assert_eq!(decode_message::<TestServiceEchoArgs>(&bytes, &registry), Ok(args));

    let result = TestServiceEchoResult {
        success: EchoResponse { int32: -1 },
    };
    let bytes = encode_message(&result, &registry).expect("encode");
    assert_eq!(
        decode_message::<TestServiceEchoResult>(&bytes, &registry),
        Ok(result)
    );
}

#[test]
fn test_nested_response_leaves_no_residual_bytes() {
    let registry = registry();
    let result = TestServiceEchoMultiBoolResult {
        success: multi_bool(),
    };
    let bytes = encode_message(&result, &registry).expect("encode");

    let mut decoder = Decoder::new(&bytes, &registry);
    let value = decoder.decode().expect("decode");
    assert!(decoder.is_exhausted());
    let composite = value.as_composite().expect("composite");
    assert_eq!(
        composite.type_name,
        "org.apache.dubbo.tests.api.EchoMultiBoolResponse"
    );
    assert_eq!(
        composite.field_names().collect::<Vec<_>>(),
        ["baseResp", "listResp", "mapResp"]
    );

    let decoded = decode_message::<TestServiceEchoMultiBoolResult>(&bytes, &registry)
        .expect("decode message");
    assert_eq!(decoded, result);
    assert_eq!(decoded.success.java_class_name(), EchoMultiBoolResponse::JAVA_CLASS_NAME);
}

#[test]
fn test_flat_args_roundtrip() {
    let registry = registry();
    let args = TestServiceEchoMultiBoolArgs {
        base_req: false,
        list_req: vec![false, true],
        map_req: HashMap::from([(false, true), (true, true)]),
    };
    let bytes = encode_message(&args, &registry).expect("encode");
    assert_eq!(
        decode_message::<TestServiceEchoMultiBoolArgs>(&bytes, &registry),
        Ok(args)
    );
}

#[test]
fn test_reordered_destination_is_rejected() {
    #[derive(Debug, Message)]
    struct Reordered {
        list_req: Vec<bool>,
        base_req: bool,
        map_req: HashMap<bool, bool>,
    }

    let registry = registry();
    let args = TestServiceEchoMultiBoolArgs {
        base_req: true,
        list_req: vec![true],
        map_req: HashMap::new(),
    };
    let bytes = encode_message(&args, &registry).expect("encode");
    let err = decode_message::<Reordered>(&bytes, &registry).expect_err("order matters");
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    match err {
        Error::Field { name, position, .. } => {
            assert_eq!(name, "listReq");
            assert_eq!(position, 0);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_long_into_int_overflows() {
    let registry = registry();
    let bytes = encode_message(&TestServiceEchoInt64Args { req: i64::MAX }, &registry)
        .expect("encode");
    let err = decode_message::<TestServiceEchoInt32Args>(&bytes, &registry)
        .expect_err("out of range");
    assert_eq!(err.kind(), ErrorKind::RangeOverflow);

    let bytes = encode_message(&TestServiceEchoInt64Args { req: -5 }, &registry).expect("encode");
    assert_eq!(
        decode_message::<TestServiceEchoInt32Args>(&bytes, &registry),
        Ok(TestServiceEchoInt32Args { req: -5 })
    );
}

#[test]
fn test_unknown_composite_on_decode() {
    let sender = registry();
    let bytes = encode_message(
        &TestServiceEchoArgs {
            req: EchoRequest { int32: 7 },
        },
        &sender,
    )
    .expect("encode");

    let receiver = TypeRegistry::new();
    let err = decode_message::<TestServiceEchoArgs>(&bytes, &receiver).expect_err("unknown");
    assert_eq!(err.kind(), ErrorKind::UnknownCompositeType);

    #[derive(Debug, Message)]
    struct Opaque {
        req: Value,
    }
    let retain = CodecConfig::default().with_unknown_composite(UnknownCompositePolicy::Retain);
    let opaque: Opaque = decode_message_with(&bytes, &receiver, retain).expect("retained");
    let composite = opaque.req.as_composite().expect("composite");
    assert_eq!(composite.field("int32"), Some(&Value::Int32(7)));

    #[derive(Debug, Message)]
    struct Skipped {
        req: Option<EchoRequest>,
    }
    let skip = CodecConfig::default().with_unknown_composite(UnknownCompositePolicy::Skip);
    let skipped: Skipped = decode_message_with(&bytes, &receiver, skip).expect("skipped");
    assert!(skipped.req.is_none());
}

#[test]
fn test_encode_requires_registration() {
    let err = encode_message(
        &TestServiceEchoArgs {
            req: EchoRequest { int32: 1 },
        },
        &TypeRegistry::new(),
    )
    .expect_err("not registered");
    assert_eq!(err.kind(), ErrorKind::ReverseLookupFailed);
}

#[test]
fn test_trailing_bytes() {
    let registry = registry();
    let mut bytes = encode_message(&TestServiceEchoInt32Args { req: 1 }, &registry)
        .expect("encode");
    bytes.push(b'N');

    let err = decode_message::<TestServiceEchoInt32Args>(&bytes, &registry)
        .expect_err("trailing");
    assert_eq!(err.kind(), ErrorKind::MalformedWire);

    let lenient = CodecConfig::default().with_reject_trailing_bytes(false);
    assert_eq!(
        decode_message_with::<TestServiceEchoInt32Args>(&bytes, &registry, lenient),
        Ok(TestServiceEchoInt32Args { req: 1 })
    );
}

#[test]
fn test_decode_into_commits_only_on_success() {
    let registry = registry();
    let mut dest = TestServiceEchoMultiBoolArgs {
        base_req: true,
        list_req: vec![true],
        map_req: HashMap::new(),
    };
    let before = dest.clone();

    // Valid first two fields, then a string where the map belongs.
    let bad = [b'F', 0x79, b'F', 0x01, b'x'];
    assert!(decode_message_into(&bad, &registry, &mut dest).is_err());
    assert_eq!(dest, before);

    let good = encode_message(
        &TestServiceEchoMultiBoolArgs {
            base_req: false,
            list_req: Vec::new(),
            map_req: HashMap::from([(true, true)]),
        },
        &registry,
    )
    .expect("encode");
    decode_message_into(&good, &registry, &mut dest).expect("decode into");
    assert!(!dest.base_req);
    assert_eq!(dest.map_req.get(&true), Some(&true));
}

#[test]
fn test_registration_conflict_is_configuration_error() {
    #[derive(Debug, Clone, PartialEq, Composite)]
    #[hessian(java_class = "kitex.echo.EchoRequest")]
    struct WiderEchoRequest {
        int32: i32,
        extra: String,
    }

    let registry = registry();
    let err = Error::from(
        registry
            .register_type::<WiderEchoRequest>()
            .expect_err("conflict"),
    );
    assert_eq!(err.kind(), ErrorKind::Configuration);
    // The original entry is untouched.
    assert_eq!(
        registry
            .lookup(EchoRequest::JAVA_CLASS_NAME)
            .map(|d| d.field_count()),
        Some(1)
    );
}
