// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::*;
use crate::Composite;
use std::thread;

#[derive(Debug, Clone, PartialEq, Composite)]
#[hessian(java_class = "kitex.echo.EchoRequest")]
struct EchoRequest {
    message: String,
}

/// Same wire identifier as [`EchoRequest`], different native type.
#[derive(Debug, Clone, PartialEq, Composite)]
#[hessian(java_class = "kitex.echo.EchoRequest")]
struct ShadowEchoRequest {
    message: String,
}

#[derive(Debug, Clone, PartialEq, Composite)]
#[hessian(java_class = "kitex.echo.EchoResponse")]
struct EchoResponse {
    message: String,
}

fn point(fields: &[&str]) -> TypeDescriptor {
    fields
        .iter()
        .fold(TypeDescriptorBuilder::new("demo.Point"), |b, f| {
            b.field(*f, Shape::Int32)
        })
        .build()
}

#[test]
fn test_register_and_lookup() {
    let registry = TypeRegistry::new();
    assert!(registry.is_empty());
    registry.register([point(&["x", "y"])]).expect("register");

    let descriptor = registry.lookup("demo.Point").expect("registered");
    assert_eq!(descriptor.field_names().collect::<Vec<_>>(), ["x", "y"]);
    assert!(registry.contains("demo.Point"));
    assert!(!registry.contains("demo.Other"));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_registration_is_idempotent() {
    let registry = TypeRegistry::new();
    registry.register([point(&["x", "y"])]).expect("first");
    registry.register([point(&["x", "y"])]).expect("second");
    registry.register_type::<EchoRequest>().expect("type");
    registry.register_type::<EchoRequest>().expect("type again");
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_conflicting_descriptor_rejected() {
    let registry = TypeRegistry::new();
    registry.register([point(&["x", "y"])]).expect("register");
    let err = registry
        .register([point(&["y", "x"])])
        .expect_err("different field order");
    match err {
        RegistryError::ConflictingDescriptor {
            identifier,
            registered,
            incoming,
        } => {
            assert_eq!(identifier, "demo.Point");
            assert_ne!(registered, incoming);
        }
        other => panic!("unexpected error: {other}"),
    }
    // First registration still wins.
    let kept = registry.lookup("demo.Point").expect("kept");
    assert_eq!(kept.field_names().collect::<Vec<_>>(), ["x", "y"]);
}

#[test]
fn test_empty_identifier_rejected() {
    let registry = TypeRegistry::new();
    assert_eq!(
        registry.register([TypeDescriptor::new("", Vec::new())]),
        Err(RegistryError::EmptyIdentifier)
    );
}

#[test]
fn test_batch_is_all_or_nothing() {
    let registry = TypeRegistry::new();
    registry.register([point(&["x", "y"])]).expect("register");

    let other = TypeDescriptorBuilder::new("demo.Other").field("a", Shape::Bool).build();
    let result = registry.register([other, point(&["x"])]);
    assert!(result.is_err());
    assert!(!registry.contains("demo.Other"));
    assert_eq!(registry.len(), 1);
}

/// Collects `[registry]` log lines for the whole test binary.
struct CaptureLogger;

static CAPTURED: parking_lot::Mutex<Vec<String>> = parking_lot::const_mutex(Vec::new());
static LOGGER: CaptureLogger = CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        CAPTURED.lock().push(record.args().to_string());
    }

    fn flush(&self) {}
}

fn captured_mentions(needle: &str) -> bool {
    CAPTURED.lock().iter().any(|line| line.contains(needle))
}

#[test]
fn test_failed_batch_logs_nothing() {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(log::LevelFilter::Debug);

    let registry = TypeRegistry::new();
    registry.register([point(&["x", "y"])]).expect("register");

    let staged = TypeDescriptorBuilder::new("demo.NeverPublished")
        .field("a", Shape::Bool)
        .build();
    assert!(registry.register([staged, point(&["x"])]).is_err());
    assert!(!captured_mentions("demo.NeverPublished"));

    let published = TypeDescriptorBuilder::new("demo.Published")
        .field("a", Shape::Bool)
        .build();
    registry.register([published]).expect("register");
    assert!(captured_mentions("registered demo.Published"));
}

#[test]
fn test_reverse_lookup() {
    let registry = TypeRegistry::new();
    registry
        .register_all([Registration::of::<EchoRequest>(), Registration::of::<EchoResponse>()])
        .expect("register");

    assert_eq!(
        registry.identifier_of::<EchoRequest>().as_deref(),
        Some("kitex.echo.EchoRequest")
    );
    assert_eq!(
        registry
            .reverse_lookup(TypeId::of::<EchoResponse>())
            .as_deref(),
        Some("kitex.echo.EchoResponse")
    );
    assert!(registry.identifier_of::<String>().is_none());
}

#[test]
fn test_native_type_conflict() {
    let registry = TypeRegistry::new();
    registry.register_type::<EchoRequest>().expect("register");
    let err = registry
        .register_type::<ShadowEchoRequest>()
        .expect_err("identifier already bound");
    assert!(matches!(
        err,
        RegistryError::ConflictingNativeType { ref identifier, .. }
            if identifier == "kitex.echo.EchoRequest"
    ));
    assert_eq!(
        registry.identifier_of::<EchoRequest>().as_deref(),
        Some("kitex.echo.EchoRequest")
    );
    assert!(registry.identifier_of::<ShadowEchoRequest>().is_none());
}

#[test]
fn test_descriptor_only_entry_gains_native_type() {
    let registry = TypeRegistry::new();
    registry
        .register([EchoRequest::descriptor()])
        .expect("descriptor");
    assert!(registry.identifier_of::<EchoRequest>().is_none());

    registry.register_type::<EchoRequest>().expect("native");
    assert_eq!(registry.len(), 1);
    assert_eq!(
        registry.identifier_of::<EchoRequest>().as_deref(),
        Some("kitex.echo.EchoRequest")
    );
}

#[test]
fn test_identifiers_sorted() {
    let registry = TypeRegistry::new();
    registry
        .register_all([
            Registration::of::<EchoResponse>(),
            Registration::descriptor(point(&["x"])),
            Registration::of::<EchoRequest>(),
        ])
        .expect("register");
    let ids: Vec<String> = registry.identifiers().iter().map(|s| s.to_string()).collect();
    assert_eq!(
        ids,
        ["demo.Point", "kitex.echo.EchoRequest", "kitex.echo.EchoResponse"]
    );
}

#[test]
fn test_parallel_readers_during_registration() {
    let registry = Arc::new(TypeRegistry::new());
    registry.register([point(&["x", "y"])]).expect("register");

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for _ in 0..1000 {
                    let descriptor = registry.lookup("demo.Point").expect("always visible");
                    assert_eq!(descriptor.field_count(), 2);
                }
            })
        })
        .collect();

    let writer = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || {
            for i in 0..50 {
                let descriptor = TypeDescriptorBuilder::new(format!("demo.Type{i}"))
                    .field("v", Shape::Int64)
                    .build();
                registry.register([descriptor]).expect("register");
            }
        })
    };

    for reader in readers {
        reader.join().expect("reader");
    }
    writer.join().expect("writer");
    assert_eq!(registry.len(), 51);
}
