// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Big-endian byte cursors for Hessian buffer manipulation.
//!
//! [`ByteWriter`] grows an owned buffer and never fails; [`ByteReader`] is a
//! bounds-checked, zero-copy view that reports how many bytes were missing
//! when the input ends early.

use super::DecodeError;

/// Generate big-endian write methods for primitive types
///
/// Each generated method converts the value via `to_be_bytes()` and appends
/// the bytes to the buffer.
macro_rules! impl_write_be {
    ($name:ident, $type:ty) => {
        pub fn $name(&mut self, value: $type) {
            self.buffer.extend_from_slice(&value.to_be_bytes());
        }
    };
}

/// Generate big-endian read methods for primitive types
///
/// Each generated method:
/// 1. Checks buffer bounds (returns `DecodeError::Truncated` if short)
/// 2. Reads N bytes from buffer
/// 3. Converts bytes to value via `from_be_bytes()`
/// 4. Advances offset
macro_rules! impl_read_be {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self) -> Result<$type, DecodeError> {
            let mut bytes = [0u8; $size];
            bytes.copy_from_slice(self.read_bytes($size)?);
            Ok(<$type>::from_be_bytes(bytes))
        }
    };
}

/// Growable output buffer.
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buffer: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    impl_write_be!(write_u16_be, u16);
    impl_write_be!(write_i32_be, i32);
    impl_write_be!(write_i64_be, i64);

    pub fn write_f64_be(&mut self, value: f64) {
        self.write_i64_be(value.to_bits() as i64);
    }

    pub fn write_bytes(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }
}

/// Immutable cursor for reading (bounds-checked, zero-copy)
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let byte = self.peek_u8()?;
        self.offset += 1;
        Ok(byte)
    }

    /// Next byte without consuming it.
    pub fn peek_u8(&self) -> Result<u8, DecodeError> {
        self.buffer
            .get(self.offset)
            .copied()
            .ok_or(DecodeError::Truncated {
                offset: self.offset,
                needed: 1,
            })
    }

    impl_read_be!(read_u16_be, u16, 2);
    impl_read_be!(read_i32_be, i32, 4);
    impl_read_be!(read_i64_be, i64, 8);

    pub fn read_f64_be(&mut self) -> Result<f64, DecodeError> {
        Ok(f64::from_bits(self.read_i64_be()? as u64))
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let available = self.remaining();
        if len > available {
            return Err(DecodeError::Truncated {
                offset: self.offset,
                needed: len - available,
            });
        }
        let slice = &self.buffer[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Reposition the cursor; clamped to the buffer length.
    pub fn seek(&mut self, offset: usize) {
        self.offset = offset.min(self.buffer.len());
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }

    pub fn is_eof(&self) -> bool {
        self.offset >= self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_is_big_endian() {
        let mut w = ByteWriter::new();
        w.write_u16_be(0x0102);
        w.write_i32_be(-2);
        w.write_i64_be(0x0102_0304_0506_0708);
        assert_eq!(
            w.as_slice(),
            &[
                0x01, 0x02, 0xff, 0xff, 0xff, 0xfe, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08
            ]
        );
    }

    #[test]
    fn test_reader_roundtrip() {
        let mut w = ByteWriter::with_capacity(16);
        w.write_u8(0xab);
        w.write_f64_be(std::f64::consts::PI);
        w.write_i32_be(i32::MIN);

        let bytes = w.into_inner();
        let mut r = ByteReader::new(&bytes);
        assert_eq!(r.read_u8().unwrap(), 0xab);
        assert_eq!(r.read_f64_be().unwrap(), std::f64::consts::PI);
        assert_eq!(r.read_i32_be().unwrap(), i32::MIN);
        assert!(r.is_eof());
    }

    #[test]
    fn test_reader_truncation_reports_missing_bytes() {
        let bytes = [0x00, 0x01];
        let mut r = ByteReader::new(&bytes);
        r.read_u8().unwrap();

        match r.read_i32_be() {
            Err(DecodeError::Truncated { offset, needed }) => {
                assert_eq!(offset, 1);
                assert_eq!(needed, 3);
            }
            other => panic!("expected Truncated, got {:?}", other),
        }
        // Failed reads do not advance.
        assert_eq!(r.offset(), 1);
        assert_eq!(r.peek_u8().unwrap(), 0x01);
    }

    #[test]
    fn test_seek_is_clamped() {
        let bytes = [1, 2, 3];
        let mut r = ByteReader::new(&bytes);
        r.seek(10);
        assert_eq!(r.offset(), 3);
        assert_eq!(r.remaining(), 0);
        r.seek(1);
        assert_eq!(r.read_u8().unwrap(), 2);
    }
}
