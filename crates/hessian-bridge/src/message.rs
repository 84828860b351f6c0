// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Flat messages: argument and result records written field after field.
//!
//! RPC arguments and results are not Hessian objects. Each field is encoded as
//! a top-level value in declaration order, with no enclosing class definition,
//! and decoded back in the same order. Class and type tables are shared by all
//! fields of one message.
//!
//! ```
//! use hessian_bridge::{decode_message, encode_message, Message, TypeRegistry};
//!
//! #[derive(Debug, PartialEq, Message)]
//! struct EchoArgs {
//!     req: String,
//!     count: i32,
//! }
//!
//! let registry = TypeRegistry::new();
//! let args = EchoArgs { req: "hi".into(), count: 3 };
//! let bytes = encode_message(&args, &registry).unwrap();
//! assert_eq!(bytes, [0x02, b'h', b'i', 0x93]);
//! assert_eq!(decode_message::<EchoArgs>(&bytes, &registry).unwrap(), args);
//! ```

use crate::bind::{Bind, Binder};
use crate::config::CodecConfig;
use crate::error::Error;
use crate::registry::{TypeDescriptor, TypeRegistry};
use crate::ser::{Decoder, Encode, EncodeError, Encoder};

/// A record encoded as a sequence of top-level values.
pub trait Message: Sized {
    fn encode_fields(&self, fields: &mut FieldEncoder<'_, '_>) -> Result<(), EncodeError>;

    fn decode_fields(fields: &mut FieldDecoder<'_, '_, '_>) -> Result<Self, Error>;
}

// ---------------------------------------------------------------------------
// FieldEncoder
// ---------------------------------------------------------------------------

/// Writes the fields of one message or composite in order.
///
/// When created for a composite, every field is checked against the
/// registered descriptor so the values always match the class definition
/// already on the wire.
#[derive(Debug)]
pub struct FieldEncoder<'e, 'r> {
    encoder: &'e mut Encoder<'r>,
    descriptor: Option<&'e TypeDescriptor>,
    written: usize,
}

impl<'e, 'r> FieldEncoder<'e, 'r> {
    /// Unchecked writer for flat messages.
    pub fn new(encoder: &'e mut Encoder<'r>) -> Self {
        Self {
            encoder,
            descriptor: None,
            written: 0,
        }
    }

    pub(crate) fn for_descriptor(
        encoder: &'e mut Encoder<'r>,
        descriptor: &'e TypeDescriptor,
    ) -> Self {
        Self {
            encoder,
            descriptor: Some(descriptor),
            written: 0,
        }
    }

    /// Encode the next field.
    pub fn field<T: Encode + ?Sized>(&mut self, name: &str, value: &T) -> Result<(), EncodeError> {
        if let Some(descriptor) = self.descriptor {
            match descriptor.fields.get(self.written) {
                Some(expected) if expected.name == name => {}
                Some(expected) => {
                    return Err(EncodeError::FieldMismatch {
                        type_name: descriptor.name.clone(),
                        detail: format!(
                            "field #{} is {}, got {}",
                            self.written, expected.name, name
                        ),
                    })
                }
                None => {
                    return Err(EncodeError::FieldMismatch {
                        type_name: descriptor.name.clone(),
                        detail: format!(
                            "unexpected field {} after {} declared",
                            name,
                            descriptor.field_count()
                        ),
                    })
                }
            }
        }
        self.encoder.encode(value)?;
        self.written += 1;
        Ok(())
    }

    /// Fields written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn encoder(&mut self) -> &mut Encoder<'r> {
        self.encoder
    }

    /// Check that every declared field was written.
    pub(crate) fn finish(self) -> Result<(), EncodeError> {
        match self.descriptor {
            Some(descriptor) if descriptor.field_count() != self.written => {
                Err(EncodeError::FieldMismatch {
                    type_name: descriptor.name.clone(),
                    detail: format!(
                        "wrote {} of {} fields",
                        self.written,
                        descriptor.field_count()
                    ),
                })
            }
            _ => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// FieldDecoder
// ---------------------------------------------------------------------------

/// Reads the fields of one flat message in order.
#[derive(Debug)]
pub struct FieldDecoder<'d, 'a, 'r> {
    decoder: &'d mut Decoder<'a, 'r>,
    position: usize,
}

impl<'d, 'a, 'r> FieldDecoder<'d, 'a, 'r> {
    pub fn new(decoder: &'d mut Decoder<'a, 'r>) -> Self {
        Self {
            decoder,
            position: 0,
        }
    }

    /// Decode the next value and bind it as field `name`.
    pub fn field<T: Bind>(&mut self, name: &str) -> Result<T, Error> {
        let position = self.position;
        self.position += 1;
        let wrap = |source: Error| Error::Field {
            name: name.to_string(),
            position,
            source: Box::new(source),
        };

        let value = self.decoder.decode().map_err(|e| wrap(e.into()))?;
        Binder::new(self.decoder.registry())
            .bind(value)
            .map_err(|e| wrap(e.into()))
    }

    /// Fields read so far.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn decoder(&mut self) -> &mut Decoder<'a, 'r> {
        self.decoder
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Encode a flat message with the default limits.
pub fn encode_message<M: Message>(message: &M, registry: &TypeRegistry) -> Result<Vec<u8>, Error> {
    encode_message_with(message, registry, CodecConfig::default())
}

pub fn encode_message_with<M: Message>(
    message: &M,
    registry: &TypeRegistry,
    config: CodecConfig,
) -> Result<Vec<u8>, Error> {
    let mut encoder = Encoder::with_config(registry, config);
    message.encode_fields(&mut FieldEncoder::new(&mut encoder))?;
    log::trace!(
        "[message] encoded {} ({} bytes)",
        std::any::type_name::<M>(),
        encoder.len()
    );
    Ok(encoder.into_bytes())
}

/// Decode a flat message with the default limits.
pub fn decode_message<M: Message>(bytes: &[u8], registry: &TypeRegistry) -> Result<M, Error> {
    decode_message_with(bytes, registry, CodecConfig::default())
}

pub fn decode_message_with<M: Message>(
    bytes: &[u8],
    registry: &TypeRegistry,
    config: CodecConfig,
) -> Result<M, Error> {
    let mut decoder = Decoder::with_config(bytes, registry, config);
    let message = M::decode_fields(&mut FieldDecoder::new(&mut decoder))?;
    if config.reject_trailing_bytes {
        decoder.finish()?;
    }
    Ok(message)
}

/// Decode into an existing message; `dest` is untouched on failure.
pub fn decode_message_into<M: Message>(
    bytes: &[u8],
    registry: &TypeRegistry,
    dest: &mut M,
) -> Result<(), Error> {
    decode_message_into_with(bytes, registry, CodecConfig::default(), dest)
}

pub fn decode_message_into_with<M: Message>(
    bytes: &[u8],
    registry: &TypeRegistry,
    config: CodecConfig,
    dest: &mut M,
) -> Result<(), Error> {
    *dest = decode_message_with(bytes, registry, config)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::{BindError, FieldBinder};
    use crate::composite::Composite;
    use crate::error::ErrorKind;
    use crate::registry::{Shape, TypeDescriptorBuilder};
    use crate::types::Shaped;
    use crate::value::Value;

    /// Hand-written composite whose encoder forgets a declared field.
    #[derive(Debug)]
    struct Lossy {
        a: i32,
        b: i32,
    }

    impl Shaped for Lossy {
        fn shape() -> Shape {
            Shape::composite("demo.Lossy")
        }
    }

    impl Encode for Lossy {
        fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
            encoder.encode_composite(self)
        }
    }

    impl Bind for Lossy {
        fn bind(value: Value, binder: &Binder<'_>) -> Result<Self, BindError> {
            binder.bind_composite::<Self>(value)
        }
    }

    impl Message for Lossy {
        fn encode_fields(&self, fields: &mut FieldEncoder<'_, '_>) -> Result<(), EncodeError> {
            fields.field("a", &self.a)
        }

        fn decode_fields(fields: &mut FieldDecoder<'_, '_, '_>) -> Result<Self, Error> {
            Ok(Self {
                a: fields.field("a")?,
                b: fields.field("b")?,
            })
        }
    }

    impl Composite for Lossy {
        const JAVA_CLASS_NAME: &'static str = "demo.Lossy";

        fn descriptor() -> TypeDescriptor {
            TypeDescriptorBuilder::new("demo.Lossy")
                .field("a", Shape::Int32)
                .field("b", Shape::Int32)
                .build()
        }

        fn bind_fields(fields: &mut FieldBinder<'_, '_>) -> Result<Self, BindError> {
            Ok(Self {
                a: fields.field("a")?,
                b: fields.field("b")?,
            })
        }
    }

    #[test]
    fn test_composite_with_missing_field_rejected() {
        let registry = TypeRegistry::new();
        registry.register_type::<Lossy>().unwrap();
        let mut encoder = Encoder::new(&registry);
        let err = encoder.encode(&Lossy { a: 1, b: 2 }).unwrap_err();
        assert_eq!(
            err,
            EncodeError::FieldMismatch {
                type_name: "demo.Lossy".into(),
                detail: "wrote 1 of 2 fields".into()
            }
        );
    }

    #[test]
    fn test_descriptor_order_enforced() {
        let registry = TypeRegistry::new();
        let descriptor = Lossy::descriptor();
        let mut encoder = Encoder::new(&registry);
        let mut fields = FieldEncoder::for_descriptor(&mut encoder, &descriptor);

        assert!(matches!(
            fields.field("b", &1),
            Err(EncodeError::FieldMismatch { ref detail, .. }) if detail == "field #0 is a, got b"
        ));
        fields.field("a", &1).unwrap();
        fields.field("b", &2).unwrap();
        assert!(fields.field("c", &3).is_err());
        assert_eq!(fields.written(), 2);
        assert!(fields.finish().is_ok());
    }

    #[test]
    fn test_flat_fields_are_unchecked() {
        let registry = TypeRegistry::new();
        let mut encoder = Encoder::new(&registry);
        let mut fields = FieldEncoder::new(&mut encoder);
        fields.field("anything", &1).unwrap();
        fields.field("else", "x").unwrap();
        assert_eq!(fields.written(), 2);
        assert!(fields.finish().is_ok());
        assert_eq!(encoder.as_bytes(), [0x91, 0x01, b'x']);
    }

    #[test]
    fn test_field_decoder_wraps_failures() {
        let registry = TypeRegistry::new();
        let bytes = [0x91, 0x01, b'x'];
        let mut decoder = Decoder::new(&bytes, &registry);
        let mut fields = FieldDecoder::new(&mut decoder);

        assert_eq!(fields.field::<i32>("a"), Ok(1));
        let err = fields.field::<i32>("b").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert!(matches!(
            err,
            Error::Field { ref name, position: 1, .. } if name == "b"
        ));
        assert_eq!(fields.position(), 2);

        let err = fields.field::<i32>("c").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedWire);
        assert!(matches!(
            err.root(),
            Error::Decode(crate::ser::DecodeError::Truncated { offset: 3, .. })
        ));
    }

    #[test]
    fn test_decode_into_keeps_destination() {
        let registry = TypeRegistry::new();
        registry.register_type::<Lossy>().unwrap();
        let mut dest = Lossy { a: 5, b: 6 };
        assert!(decode_message_into(&[0x91], &registry, &mut dest).is_err());
        assert_eq!((dest.a, dest.b), (5, 6));

        decode_message_into(&[0x91, 0x92], &registry, &mut dest).unwrap();
        assert_eq!((dest.a, dest.b), (1, 2));
    }

    #[test]
    fn test_decode_into_with_applies_config() {
        let registry = TypeRegistry::new();
        registry.register_type::<Lossy>().unwrap();
        let mut dest = Lossy { a: 5, b: 6 };
        let bytes = [0x91, 0x92, 0x93];

        let err = decode_message_into(&bytes, &registry, &mut dest).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedWire);
        assert_eq!((dest.a, dest.b), (5, 6));

        let lenient = CodecConfig::default().with_reject_trailing_bytes(false);
        decode_message_into_with(&bytes, &registry, lenient, &mut dest).unwrap();
        assert_eq!((dest.a, dest.b), (1, 2));
    }
}
