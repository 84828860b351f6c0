// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Hessian 2.0 encoder.
//!
//! Output is byte-for-byte what the Java `Hessian2Output` writes for the same
//! values: the shortest compact form of every number, UTF-16 string lengths,
//! one class definition per class per stream, and type names written once
//! and referenced by index afterwards.

use super::cursor::ByteWriter;
use super::encode::Encode;
use super::{tags, text, EncodeError};
use crate::composite::Composite;
use crate::config::{CodecConfig, BINARY_CHUNK_LEN, COMPACT_CLASS_REFS, STRING_CHUNK_UNITS};
use crate::message::FieldEncoder;
use crate::registry::TypeRegistry;
use crate::value::{CompositeValue, Value};
use std::collections::HashMap;

/// Class definition already written to this stream.
#[derive(Debug)]
struct ClassDef {
    name: String,
    fields: Vec<String>,
}

/// Single-stream Hessian writer.
///
/// One encoder per message; the class and type tables it accumulates are only
/// meaningful to a decoder reading the same byte stream from the start.
#[derive(Debug)]
pub struct Encoder<'r> {
    registry: &'r TypeRegistry,
    config: CodecConfig,
    out: ByteWriter,
    classes: Vec<ClassDef>,
    types: HashMap<String, usize>,
    depth: usize,
}

impl<'r> Encoder<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self::with_config(registry, CodecConfig::default())
    }

    pub fn with_config(registry: &'r TypeRegistry, config: CodecConfig) -> Self {
        Self {
            registry,
            config,
            out: ByteWriter::with_capacity(64),
            classes: Vec::new(),
            types: HashMap::new(),
            depth: 0,
        }
    }

    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Append one native value.
    pub fn encode<T: Encode + ?Sized>(&mut self, value: &T) -> Result<(), EncodeError> {
        value.encode(self)
    }

    /// Append one dynamic value.
    pub fn encode_value(&mut self, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::Null => self.write_null(),
            Value::Bool(v) => self.write_bool(*v),
            Value::Int32(v) => self.write_i32(*v),
            Value::Int64(v) => self.write_i64(*v),
            Value::Double(v) => self.write_f64(*v),
            Value::String(v) => self.write_str(v),
            Value::Bytes(v) => self.write_bytes(v),
            Value::Date(v) => self.write_date(*v),
            Value::List(list) => return self.encode_list(list.type_name.as_deref(), &list.items),
            Value::Map(map) => {
                return self.encode_map(
                    map.type_name.as_deref(),
                    map.entries.iter().map(|(k, v)| (k, v)),
                )
            }
            Value::Composite(composite) => return self.encode_dynamic_composite(composite),
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Scalars
    // -----------------------------------------------------------------------

    pub fn write_null(&mut self) {
        self.out.write_u8(tags::NULL);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.out.write_u8(if value { tags::TRUE } else { tags::FALSE });
    }

    pub fn write_i32(&mut self, value: i32) {
        if (tags::INT_DIRECT_MIN..=tags::INT_DIRECT_MAX).contains(&value) {
            self.out.write_u8((i32::from(tags::INT_ZERO) + value) as u8);
        } else if (tags::INT_BYTE_MIN..=tags::INT_BYTE_MAX).contains(&value) {
            self.out
                .write_u8((i32::from(tags::INT_BYTE_ZERO) + (value >> 8)) as u8);
            self.out.write_u8(value as u8);
        } else if (tags::INT_SHORT_MIN..=tags::INT_SHORT_MAX).contains(&value) {
            self.out
                .write_u8((i32::from(tags::INT_SHORT_ZERO) + (value >> 16)) as u8);
            self.out.write_u8((value >> 8) as u8);
            self.out.write_u8(value as u8);
        } else {
            self.out.write_u8(tags::INT);
            self.out.write_i32_be(value);
        }
    }

    pub fn write_i64(&mut self, value: i64) {
        if (tags::LONG_DIRECT_MIN..=tags::LONG_DIRECT_MAX).contains(&value) {
            self.out.write_u8((i64::from(tags::LONG_ZERO) + value) as u8);
        } else if (tags::LONG_BYTE_MIN..=tags::LONG_BYTE_MAX).contains(&value) {
            self.out
                .write_u8((i64::from(tags::LONG_BYTE_ZERO) + (value >> 8)) as u8);
            self.out.write_u8(value as u8);
        } else if (tags::LONG_SHORT_MIN..=tags::LONG_SHORT_MAX).contains(&value) {
            self.out
                .write_u8((i64::from(tags::LONG_SHORT_ZERO) + (value >> 16)) as u8);
            self.out.write_u8((value >> 8) as u8);
            self.out.write_u8(value as u8);
        } else if let Ok(narrow) = i32::try_from(value) {
            self.out.write_u8(tags::LONG_INT);
            self.out.write_i32_be(narrow);
        } else {
            self.out.write_u8(tags::LONG);
            self.out.write_i64_be(value);
        }
    }

    /// Doubles with an integral value in `i16` range, and values that are an
    /// exact number of thousandths in `i32` range, use the short forms.
    pub fn write_f64(&mut self, value: f64) {
        let int_value = value as i32;
        if f64::from(int_value) == value {
            match int_value {
                0 => return self.out.write_u8(tags::DOUBLE_ZERO),
                1 => return self.out.write_u8(tags::DOUBLE_ONE),
                -0x80..=0x7f => {
                    self.out.write_u8(tags::DOUBLE_BYTE);
                    return self.out.write_u8(int_value as u8);
                }
                -0x8000..=0x7fff => {
                    self.out.write_u8(tags::DOUBLE_SHORT);
                    return self.out.write_u16_be(int_value as u16);
                }
                _ => {}
            }
        }

        let mills = (value * 1000.0) as i32;
        if 0.001 * f64::from(mills) == value {
            self.out.write_u8(tags::DOUBLE_MILL);
            self.out.write_i32_be(mills);
            return;
        }

        self.out.write_u8(tags::DOUBLE);
        self.out.write_f64_be(value);
    }

    pub fn write_str(&mut self, value: &str) {
        if value.is_ascii() {
            let mut rest = value.as_bytes();
            while rest.len() > STRING_CHUNK_UNITS {
                let (head, tail) = rest.split_at(STRING_CHUNK_UNITS);
                self.out.write_u8(tags::STRING_CHUNK);
                self.out.write_u16_be(head.len() as u16);
                self.out.write_bytes(head);
                rest = tail;
            }
            self.write_string_header(rest.len());
            self.out.write_bytes(rest);
            return;
        }

        let units: Vec<u16> = value.encode_utf16().collect();
        let mut rest = units.as_slice();
        while rest.len() > STRING_CHUNK_UNITS {
            let (head, tail) = rest.split_at(text::chunk_len(rest, STRING_CHUNK_UNITS));
            self.out.write_u8(tags::STRING_CHUNK);
            self.out.write_u16_be(head.len() as u16);
            text::write_units(&mut self.out, head);
            rest = tail;
        }
        self.write_string_header(rest.len());
        text::write_units(&mut self.out, rest);
    }

    fn write_string_header(&mut self, units: usize) {
        if units <= tags::STRING_DIRECT_MAX {
            self.out.write_u8(units as u8);
        } else if units <= tags::STRING_SHORT_MAX {
            self.out.write_u8(tags::STRING_SHORT + (units >> 8) as u8);
            self.out.write_u8(units as u8);
        } else {
            self.out.write_u8(tags::STRING);
            self.out.write_u16_be(units as u16);
        }
    }

    pub fn write_bytes(&mut self, value: &[u8]) {
        let mut rest = value;
        while rest.len() > BINARY_CHUNK_LEN {
            let (head, tail) = rest.split_at(BINARY_CHUNK_LEN);
            self.out.write_u8(tags::BINARY_CHUNK);
            self.out.write_u16_be(head.len() as u16);
            self.out.write_bytes(head);
            rest = tail;
        }

        let len = rest.len();
        if len <= tags::BINARY_DIRECT_MAX {
            self.out.write_u8(tags::BINARY_DIRECT + len as u8);
        } else if len <= tags::BINARY_SHORT_MAX {
            self.out.write_u8(tags::BINARY_SHORT + (len >> 8) as u8);
            self.out.write_u8(len as u8);
        } else {
            self.out.write_u8(tags::BINARY);
            self.out.write_u16_be(len as u16);
        }
        self.out.write_bytes(rest);
    }

    /// `java.util.Date` as milliseconds since the epoch.
    pub fn write_date(&mut self, millis: i64) {
        if millis % 60_000 == 0 {
            if let Ok(minutes) = i32::try_from(millis / 60_000) {
                self.out.write_u8(tags::DATE_MINUTE);
                self.out.write_i32_be(minutes);
                return;
            }
        }
        self.out.write_u8(tags::DATE);
        self.out.write_i64_be(millis);
    }

    // -----------------------------------------------------------------------
    // Containers
    // -----------------------------------------------------------------------

    /// Fixed-length list, typed when `type_name` is given.
    pub fn encode_list<'v, T, I>(
        &mut self,
        type_name: Option<&str>,
        items: I,
    ) -> Result<(), EncodeError>
    where
        T: Encode + ?Sized + 'v,
        I: IntoIterator<Item = &'v T>,
        I::IntoIter: ExactSizeIterator,
    {
        let items = items.into_iter();
        let len = wire_length(items.len(), "list")?;

        match type_name {
            Some(name) if len as usize <= tags::LIST_DIRECT_MAX => {
                self.out.write_u8(tags::LIST_DIRECT + len as u8);
                self.write_type(name);
            }
            Some(name) => {
                self.out.write_u8(tags::LIST_FIXED);
                self.write_type(name);
                self.write_i32(len);
            }
            None if len as usize <= tags::LIST_DIRECT_MAX => {
                self.out.write_u8(tags::LIST_DIRECT_UNTYPED + len as u8);
            }
            None => {
                self.out.write_u8(tags::LIST_FIXED_UNTYPED);
                self.write_i32(len);
            }
        }

        self.nested(|enc| items.into_iter().try_for_each(|item| item.encode(enc)))
    }

    /// Map terminated by `'Z'`, typed when `type_name` is given.
    pub fn encode_map<'v, K, V, I>(
        &mut self,
        type_name: Option<&str>,
        entries: I,
    ) -> Result<(), EncodeError>
    where
        K: Encode + ?Sized + 'v,
        V: Encode + ?Sized + 'v,
        I: IntoIterator<Item = (&'v K, &'v V)>,
    {
        match type_name {
            Some(name) => {
                self.out.write_u8(tags::MAP);
                self.write_type(name);
            }
            None => self.out.write_u8(tags::MAP_UNTYPED),
        }

        self.nested(|enc| {
            for (key, value) in entries {
                key.encode(enc)?;
                value.encode(enc)?;
            }
            Ok(())
        })?;
        self.out.write_u8(tags::END);
        Ok(())
    }

    /// Type name on first use, table index afterwards.
    fn write_type(&mut self, name: &str) {
        if let Some(&index) = self.types.get(name) {
            self.write_i32(index as i32);
            return;
        }
        let index = self.types.len();
        log::trace!("[encoder] type #{} {}", index, name);
        self.types.insert(name.to_string(), index);
        self.write_str(name);
    }

    // -----------------------------------------------------------------------
    // Composites
    // -----------------------------------------------------------------------

    /// Registered native composite, as a Hessian object.
    pub fn encode_composite<T: Composite>(&mut self, value: &T) -> Result<(), EncodeError> {
        let type_name = std::any::type_name::<T>();
        let descriptor = self
            .registry
            .identifier_of::<T>()
            .and_then(|identifier| self.registry.lookup(&identifier))
            .ok_or(EncodeError::ReverseLookupFailed { type_name })?;

        self.nested(|enc| {
            enc.write_object_header(&descriptor.name, descriptor.field_names());
            let mut fields = FieldEncoder::for_descriptor(enc, &descriptor);
            value.encode_fields(&mut fields)?;
            fields.finish()
        })
    }

    fn encode_dynamic_composite(&mut self, value: &CompositeValue) -> Result<(), EncodeError> {
        if value.type_name.is_empty() {
            return Err(EncodeError::UnsupportedType {
                type_name: "composite".into(),
                reason: "empty wire identifier",
            });
        }
        wire_length(value.fields.len(), "composite")?;

        self.nested(|enc| {
            enc.write_object_header(&value.type_name, value.field_names());
            value
                .fields
                .iter()
                .try_for_each(|(_, field)| enc.encode_value(field))
        })
    }

    /// Class definition (first use only) followed by the instance tag.
    fn write_object_header<'f>(
        &mut self,
        name: &str,
        fields: impl Iterator<Item = &'f str> + Clone,
    ) {
        let existing = self
            .classes
            .iter()
            .position(|def| def.name == name && def.fields.iter().map(String::as_str).eq(fields.clone()));

        let index = match existing {
            Some(index) => index,
            None => {
                let def = ClassDef {
                    name: name.to_string(),
                    fields: fields.map(str::to_string).collect(),
                };
                self.out.write_u8(tags::CLASS_DEF);
                self.write_str(&def.name);
                self.write_i32(def.fields.len() as i32);
                for field in &def.fields {
                    self.write_str(field);
                }
                let index = self.classes.len();
                log::trace!(
                    "[encoder] class #{} {} ({} fields)",
                    index,
                    def.name,
                    def.fields.len()
                );
                self.classes.push(def);
                index
            }
        };

        if index < COMPACT_CLASS_REFS {
            self.out.write_u8(tags::OBJECT_DIRECT + index as u8);
        } else {
            self.out.write_u8(tags::OBJECT);
            self.write_i32(index as i32);
        }
    }

    // -----------------------------------------------------------------------
    // Stream state
    // -----------------------------------------------------------------------

    fn nested<F>(&mut self, f: F) -> Result<(), EncodeError>
    where
        F: FnOnce(&mut Self) -> Result<(), EncodeError>,
    {
        if self.depth >= self.config.max_depth {
            return Err(EncodeError::DepthLimitExceeded {
                limit: self.config.max_depth,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.out.len()
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.out.as_slice()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.out.into_inner()
    }
}

/// Collection length as written on the wire (a Java `int`).
fn wire_length(len: usize, what: &str) -> Result<i32, EncodeError> {
    i32::try_from(len).map_err(|_| EncodeError::UnsupportedType {
        type_name: what.to_string(),
        reason: "length exceeds i32::MAX",
    })
}
