// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Hessian 2.0 decoder.
//!
//! Reads one [`Value`] per [`Decoder::decode`] call and keeps the per-stream
//! class-definition, type and back-reference tables in between.
//!
//! Back references (`'Q'`) are resolved by re-reading the referenced
//! container from its recorded byte range, which yields an independent copy
//! without keeping every decoded container alive. While replaying, the
//! stream tables are read-only so indices stay identical to the first pass.
//! Every replay is charged its byte span against
//! [`CodecConfig::max_replay_bytes`], so chains of references to references
//! cannot expand a short input into an exponentially large value.

use super::cursor::ByteReader;
use super::{tags, text, DecodeError};
use crate::config::{CodecConfig, UnknownCompositePolicy};
use crate::registry::TypeRegistry;
use crate::value::{CompositeValue, ListValue, MapValue, Value};
use std::sync::Arc;

/// Upper bound on speculative preallocation for announced lengths.
const PREALLOC_LIMIT: usize = 1024;

/// Class definition read from this stream.
#[derive(Debug)]
struct ClassDef {
    name: String,
    fields: Vec<String>,
}

/// Byte range of a list, map or object that back references may target.
///
/// `end` stays `None` until the container has been fully read.
#[derive(Debug, Clone, Copy)]
struct RefSlot {
    start: usize,
    end: Option<usize>,
}

/// Single-stream Hessian reader.
#[derive(Debug)]
pub struct Decoder<'a, 'r> {
    input: ByteReader<'a>,
    registry: &'r TypeRegistry,
    config: CodecConfig,
    classes: Vec<Arc<ClassDef>>,
    types: Vec<String>,
    refs: Vec<RefSlot>,
    replaying: usize,
    replayed_bytes: usize,
    depth: usize,
}

impl<'a, 'r> Decoder<'a, 'r> {
    pub fn new(bytes: &'a [u8], registry: &'r TypeRegistry) -> Self {
        Self::with_config(bytes, registry, CodecConfig::default())
    }

    pub fn with_config(bytes: &'a [u8], registry: &'r TypeRegistry, config: CodecConfig) -> Self {
        Self {
            input: ByteReader::new(bytes),
            registry,
            config,
            classes: Vec::new(),
            types: Vec::new(),
            refs: Vec::new(),
            replaying: 0,
            replayed_bytes: 0,
            depth: 0,
        }
    }

    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.input.offset()
    }

    pub fn remaining(&self) -> usize {
        self.input.remaining()
    }

    pub fn is_exhausted(&self) -> bool {
        self.input.is_eof()
    }

    /// Require that the whole input was consumed.
    pub fn finish(&self) -> Result<(), DecodeError> {
        match self.remaining() {
            0 => Ok(()),
            remaining => Err(DecodeError::TrailingBytes {
                offset: self.position(),
                remaining,
            }),
        }
    }

    /// Read exactly one value.
    ///
    /// Class definitions preceding the value are absorbed into the stream's
    /// class table.
    pub fn decode(&mut self) -> Result<Value, DecodeError> {
        loop {
            let offset = self.input.offset();
            let tag = self.input.read_u8()?;
            if tag == tags::CLASS_DEF {
                self.read_class_def()?;
                continue;
            }
            return self.decode_tagged(offset, tag);
        }
    }

    fn decode_tagged(&mut self, offset: usize, tag: u8) -> Result<Value, DecodeError> {
        match tag {
            tags::NULL => Ok(Value::Null),
            tags::TRUE => Ok(Value::Bool(true)),
            tags::FALSE => Ok(Value::Bool(false)),

            0x80..=0xbf | 0xc0..=0xcf | 0xd0..=0xd7 | tags::INT => {
                self.read_int_tagged(offset, tag).map(Value::Int32)
            }

            0xd8..=0xef => Ok(Value::Int64(i64::from(tag) - i64::from(tags::LONG_ZERO))),
            0xf0..=0xff => {
                let b0 = self.input.read_u8()?;
                Ok(Value::Int64(
                    ((i64::from(tag) - i64::from(tags::LONG_BYTE_ZERO)) << 8) + i64::from(b0),
                ))
            }
            0x38..=0x3f => {
                let b1 = self.input.read_u8()?;
                let b0 = self.input.read_u8()?;
                Ok(Value::Int64(
                    ((i64::from(tag) - i64::from(tags::LONG_SHORT_ZERO)) << 16)
                        + (i64::from(b1) << 8)
                        + i64::from(b0),
                ))
            }
            tags::LONG_INT => Ok(Value::Int64(i64::from(self.input.read_i32_be()?))),
            tags::LONG => Ok(Value::Int64(self.input.read_i64_be()?)),

            tags::DOUBLE_ZERO => Ok(Value::Double(0.0)),
            tags::DOUBLE_ONE => Ok(Value::Double(1.0)),
            tags::DOUBLE_BYTE => Ok(Value::Double(f64::from(self.input.read_u8()? as i8))),
            tags::DOUBLE_SHORT => Ok(Value::Double(f64::from(
                self.input.read_u16_be()? as i16,
            ))),
            tags::DOUBLE_MILL => Ok(Value::Double(
                0.001 * f64::from(self.input.read_i32_be()?),
            )),
            tags::DOUBLE => Ok(Value::Double(self.input.read_f64_be()?)),

            tags::DATE => Ok(Value::Date(self.input.read_i64_be()?)),
            tags::DATE_MINUTE => Ok(Value::Date(
                i64::from(self.input.read_i32_be()?) * 60_000,
            )),

            0x00..=0x1f | 0x30..=0x33 | tags::STRING | tags::STRING_CHUNK => {
                self.read_string_tagged(offset, tag).map(Value::String)
            }
            0x20..=0x2f | 0x34..=0x37 | tags::BINARY | tags::BINARY_CHUNK => {
                self.read_binary_tagged(offset, tag).map(Value::Bytes)
            }

            0x70..=0x77 => {
                let type_name = self.read_type()?;
                let len = usize::from(tag - tags::LIST_DIRECT);
                self.read_list(offset, Some(type_name), Some(len))
            }
            0x78..=0x7f => {
                let len = usize::from(tag - tags::LIST_DIRECT_UNTYPED);
                self.read_list(offset, None, Some(len))
            }
            tags::LIST_FIXED => {
                let type_name = self.read_type()?;
                let len = self.read_length()?;
                self.read_list(offset, Some(type_name), Some(len))
            }
            tags::LIST_FIXED_UNTYPED => {
                let len = self.read_length()?;
                self.read_list(offset, None, Some(len))
            }
            tags::LIST_VARIABLE => {
                let type_name = self.read_type()?;
                self.read_list(offset, Some(type_name), None)
            }
            tags::LIST_VARIABLE_UNTYPED => self.read_list(offset, None, None),

            tags::MAP_UNTYPED => self.read_map(offset, None),
            tags::MAP => {
                let type_name = self.read_type()?;
                self.read_map(offset, Some(type_name))
            }

            0x60..=0x6f => self.read_object(offset, usize::from(tag - tags::OBJECT_DIRECT)),
            tags::OBJECT => {
                let index = self.read_index()?;
                self.read_object(offset, index)
            }

            tags::REF => self.read_ref(offset),

            // 0x40, 'C' out of place, 'E', 'G', 'P', stray 'Z'
            _ => Err(DecodeError::MalformedTag { offset, tag }),
        }
    }

    // -----------------------------------------------------------------------
    // Scalars
    // -----------------------------------------------------------------------

    fn read_int_tagged(&mut self, offset: usize, tag: u8) -> Result<i32, DecodeError> {
        match tag {
            0x80..=0xbf => Ok(i32::from(tag) - i32::from(tags::INT_ZERO)),
            0xc0..=0xcf => {
                let b0 = self.input.read_u8()?;
                Ok(((i32::from(tag) - i32::from(tags::INT_BYTE_ZERO)) << 8) + i32::from(b0))
            }
            0xd0..=0xd7 => {
                let b1 = self.input.read_u8()?;
                let b0 = self.input.read_u8()?;
                Ok(((i32::from(tag) - i32::from(tags::INT_SHORT_ZERO)) << 16)
                    + (i32::from(b1) << 8)
                    + i32::from(b0))
            }
            tags::INT => self.input.read_i32_be(),
            _ => Err(DecodeError::MalformedTag { offset, tag }),
        }
    }

    /// Any int form, as used for lengths and table indices.
    fn read_int(&mut self) -> Result<i32, DecodeError> {
        let offset = self.input.offset();
        let tag = self.input.read_u8()?;
        self.read_int_tagged(offset, tag)
    }

    /// Non-negative int within the configured collection limit.
    fn read_length(&mut self) -> Result<usize, DecodeError> {
        let len = self.read_index()?;
        self.check_len(len)?;
        Ok(len)
    }

    fn read_index(&mut self) -> Result<usize, DecodeError> {
        let offset = self.input.offset();
        let raw = self.read_int()?;
        usize::try_from(raw).map_err(|_| DecodeError::InvalidLength {
            offset,
            length: i64::from(raw),
        })
    }

    fn check_len(&self, len: usize) -> Result<(), DecodeError> {
        if len > self.config.max_collection_len {
            return Err(DecodeError::LengthLimitExceeded {
                length: len,
                limit: self.config.max_collection_len,
            });
        }
        Ok(())
    }

    fn read_string(&mut self) -> Result<String, DecodeError> {
        let offset = self.input.offset();
        let tag = self.input.read_u8()?;
        self.read_string_tagged(offset, tag)
    }

    /// String payload, following `'R'` chunks until the final chunk.
    fn read_string_tagged(&mut self, offset: usize, tag: u8) -> Result<String, DecodeError> {
        let mut units: Vec<u16> = Vec::new();
        let mut chunk_offset = offset;
        let mut chunk_tag = tag;
        loop {
            let (len, last) = match chunk_tag {
                0x00..=0x1f => (usize::from(chunk_tag), true),
                0x30..=0x33 => {
                    let b0 = self.input.read_u8()?;
                    ((usize::from(chunk_tag - tags::STRING_SHORT) << 8) | usize::from(b0), true)
                }
                tags::STRING => (usize::from(self.input.read_u16_be()?), true),
                tags::STRING_CHUNK => (usize::from(self.input.read_u16_be()?), false),
                _ => {
                    return Err(DecodeError::MalformedTag {
                        offset: chunk_offset,
                        tag: chunk_tag,
                    })
                }
            };
            self.check_len(units.len() + len)?;
            units.reserve(len.min(self.input.remaining()));
            text::read_units(&mut self.input, len, &mut units)?;
            if last {
                break;
            }
            chunk_offset = self.input.offset();
            chunk_tag = self.input.read_u8()?;
        }
        String::from_utf16(&units).map_err(|_| DecodeError::InvalidString { offset })
    }

    /// Binary payload, following `'A'` chunks until the final chunk.
    fn read_binary_tagged(&mut self, offset: usize, tag: u8) -> Result<Vec<u8>, DecodeError> {
        let mut bytes = Vec::new();
        let mut chunk_offset = offset;
        let mut chunk_tag = tag;
        loop {
            let (len, last) = match chunk_tag {
                0x20..=0x2f => (usize::from(chunk_tag - tags::BINARY_DIRECT), true),
                0x34..=0x37 => {
                    let b0 = self.input.read_u8()?;
                    ((usize::from(chunk_tag - tags::BINARY_SHORT) << 8) | usize::from(b0), true)
                }
                tags::BINARY => (usize::from(self.input.read_u16_be()?), true),
                tags::BINARY_CHUNK => (usize::from(self.input.read_u16_be()?), false),
                _ => {
                    return Err(DecodeError::MalformedTag {
                        offset: chunk_offset,
                        tag: chunk_tag,
                    })
                }
            };
            self.check_len(bytes.len() + len)?;
            bytes.extend_from_slice(self.input.read_bytes(len)?);
            if last {
                break;
            }
            chunk_offset = self.input.offset();
            chunk_tag = self.input.read_u8()?;
        }
        Ok(bytes)
    }

    /// Type name, either inline (first use) or as a type table index.
    fn read_type(&mut self) -> Result<String, DecodeError> {
        let offset = self.input.offset();
        let tag = self.input.read_u8()?;
        match tag {
            0x00..=0x1f | 0x30..=0x33 | tags::STRING | tags::STRING_CHUNK => {
                let name = self.read_string_tagged(offset, tag)?;
                if self.replaying == 0 {
                    self.types.push(name.clone());
                }
                Ok(name)
            }
            _ => {
                let raw = self.read_int_tagged(offset, tag)?;
                usize::try_from(raw)
                    .ok()
                    .and_then(|index| self.types.get(index))
                    .cloned()
                    .ok_or(DecodeError::UndefinedType {
                        offset,
                        index: raw as usize,
                    })
            }
        }
    }

    // -----------------------------------------------------------------------
    // Containers
    // -----------------------------------------------------------------------

    fn read_list(
        &mut self,
        offset: usize,
        type_name: Option<String>,
        len: Option<usize>,
    ) -> Result<Value, DecodeError> {
        let slot = self.open_ref(offset);
        let items = self.nested(|dec| match len {
            Some(len) => {
                let mut items = Vec::with_capacity(len.min(PREALLOC_LIMIT));
                for _ in 0..len {
                    items.push(dec.decode()?);
                }
                Ok(items)
            }
            None => {
                let mut items = Vec::new();
                while !dec.consume_end()? {
                    dec.check_len(items.len() + 1)?;
                    items.push(dec.decode()?);
                }
                Ok(items)
            }
        })?;
        self.close_ref(slot);
        Ok(Value::List(ListValue { type_name, items }))
    }

    fn read_map(&mut self, offset: usize, type_name: Option<String>) -> Result<Value, DecodeError> {
        let slot = self.open_ref(offset);
        let entries = self.nested(|dec| {
            let mut entries = Vec::new();
            while !dec.consume_end()? {
                dec.check_len(entries.len() + 1)?;
                let key = dec.decode()?;
                let value = dec.decode()?;
                entries.push((key, value));
            }
            Ok(entries)
        })?;
        self.close_ref(slot);
        Ok(Value::Map(MapValue { type_name, entries }))
    }

    /// Consume `'Z'` if it is next.
    fn consume_end(&mut self) -> Result<bool, DecodeError> {
        if self.input.peek_u8()? == tags::END {
            self.input.read_u8()?;
            return Ok(true);
        }
        Ok(false)
    }

    // -----------------------------------------------------------------------
    // Objects
    // -----------------------------------------------------------------------

    fn read_class_def(&mut self) -> Result<(), DecodeError> {
        let name = self.read_string()?;
        let count = self.read_length()?;
        let mut fields = Vec::with_capacity(count.min(PREALLOC_LIMIT));
        for _ in 0..count {
            fields.push(self.read_string()?);
        }

        if self.replaying == 0 {
            log::trace!(
                "[decoder] class #{} {} ({} fields)",
                self.classes.len(),
                name,
                fields.len()
            );
            self.classes.push(Arc::new(ClassDef { name, fields }));
        }
        Ok(())
    }

    fn read_object(&mut self, offset: usize, index: usize) -> Result<Value, DecodeError> {
        let def = self
            .classes
            .get(index)
            .cloned()
            .ok_or(DecodeError::UndefinedClass { offset, index })?;

        let known = self.registry.contains(&def.name);
        if !known && self.config.unknown_composite == UnknownCompositePolicy::Fail {
            return Err(DecodeError::UnknownCompositeType {
                type_name: def.name.clone(),
            });
        }

        let slot = self.open_ref(offset);
        let fields = self.nested(|dec| {
            def.fields
                .iter()
                .map(|name| Ok((name.clone(), dec.decode()?)))
                .collect::<Result<Vec<_>, DecodeError>>()
        })?;
        self.close_ref(slot);

        if !known && self.config.unknown_composite == UnknownCompositePolicy::Skip {
            return Ok(Value::Null);
        }
        Ok(Value::Composite(CompositeValue {
            type_name: def.name.clone(),
            fields,
        }))
    }

    // -----------------------------------------------------------------------
    // Back references
    // -----------------------------------------------------------------------

    fn open_ref(&mut self, start: usize) -> Option<usize> {
        if self.replaying > 0 {
            return None;
        }
        self.refs.push(RefSlot { start, end: None });
        Some(self.refs.len() - 1)
    }

    fn close_ref(&mut self, slot: Option<usize>) {
        let end = self.input.offset();
        if let Some(slot) = slot.and_then(|index| self.refs.get_mut(index)) {
            slot.end = Some(end);
        }
    }

    fn read_ref(&mut self, offset: usize) -> Result<Value, DecodeError> {
        let index = self.read_index()?;
        let slot = *self
            .refs
            .get(index)
            .ok_or(DecodeError::InvalidReference { offset, index })?;
        let Some(end) = slot.end else {
            return Err(DecodeError::CyclicReference { offset, index });
        };

        let replayed = self.replayed_bytes.saturating_add(end - slot.start);
        if replayed > self.config.max_replay_bytes {
            log::debug!(
                "[decoder] back reference #{} at {} exceeds replay budget {}",
                index,
                offset,
                self.config.max_replay_bytes
            );
            return Err(DecodeError::LengthLimitExceeded {
                length: replayed,
                limit: self.config.max_replay_bytes,
            });
        }
        self.replayed_bytes = replayed;

        let resume = self.input.offset();
        self.input.seek(slot.start);
        self.replaying += 1;
        let value = self.nested(|dec| dec.decode());
        self.replaying -= 1;
        self.input.seek(resume);
        value
    }

    fn nested<T, F>(&mut self, f: F) -> Result<T, DecodeError>
    where
        F: FnOnce(&mut Self) -> Result<T, DecodeError>,
    {
        if self.depth >= self.config.max_depth {
            return Err(DecodeError::DepthLimitExceeded {
                limit: self.config.max_depth,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}
