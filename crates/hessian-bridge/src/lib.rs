// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # hessian-bridge - Hessian 2.0 marshaling for Java/Dubbo interop
//!
//! The serialization layer of an RPC bridge that lets a Rust service exchange
//! request and response messages with Java peers. Values are written
//! byte-compatible with Java's `Hessian2Output` and read back into a dynamic
//! [`Value`] tree, then coerced into statically-typed native fields.
//!
//! ## Quick Start
//!
//! ```rust
//! use hessian_bridge::{decode_message, encode_message, Composite, Message, Result, TypeRegistry};
//!
//! #[derive(Debug, Clone, PartialEq, Composite)]
//! #[hessian(java_class = "kitex.echo.EchoRequest")]
//! struct EchoRequest {
//!     message: String,
//! }
//!
//! #[derive(Debug, PartialEq, Message)]
//! struct EchoArgs {
//!     req: EchoRequest,
//! }
//!
//! fn main() -> Result<()> {
//!     let registry = TypeRegistry::new();
//!     registry.register_type::<EchoRequest>()?;
//!
//!     let args = EchoArgs { req: EchoRequest { message: "hello".into() } };
//!     let bytes = encode_message(&args, &registry)?;
//!     assert_eq!(decode_message::<EchoArgs>(&bytes, &registry)?, args);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |   Message / Composite (derive)  ->  encode_message / decode_message |
//! +---------------------------------------------------------------------+
//! |   Encoder (native -> bytes)   |   Decoder (bytes -> Value)          |
//! |                               |   Binder  (Value -> native)         |
//! +---------------------------------------------------------------------+
//! |   TypeRegistry: wire identifier <-> descriptor <-> native type      |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Modules Overview
//!
//! - [`value`] - dynamic decoded values
//! - [`registry`] - composite descriptors and the shared type registry
//! - [`ser`] - Hessian encoder and decoder
//! - [`bind`] - coercion of values into native types
//! - [`config`] - codec limits and policies

extern crate self as hessian_bridge;

pub mod bind;
pub mod composite;
pub mod config;
pub mod error;
pub mod message;
pub mod registry;
pub mod ser;
pub mod types;
pub mod value;

pub use bind::{Bind, BindError, BindErrorKind, Binder, FieldBinder, PathSegment};
pub use composite::Composite;
pub use config::{CodecConfig, UnknownCompositePolicy};
pub use error::{Error, ErrorKind, Result};
pub use message::{
    decode_message, decode_message_into, decode_message_into_with, decode_message_with,
    encode_message, encode_message_with, FieldDecoder, FieldEncoder, Message,
};
pub use registry::{
    FieldDescriptor, Registration, RegistryError, Shape, TypeDescriptor, TypeDescriptorBuilder,
    TypeRegistry,
};
pub use ser::{DecodeError, Decoder, Encode, EncodeError, Encoder};
pub use types::{Binary, Date, Shaped};
pub use value::{CompositeValue, ListValue, MapValue, Value, ValueKind};

// Derive macros share the trait names, as serde does.
pub use hessian_bridge_codegen::{Composite, Message};
