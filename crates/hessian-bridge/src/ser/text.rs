// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! String payload helpers.
//!
//! Hessian counts string lengths in UTF-16 code units and writes every unit
//! as 1-3 UTF-8 style bytes, so a supplementary character travels as two
//! 3-byte surrogate sequences. Readers also accept the standard 4-byte form
//! and count it as two units.

use super::cursor::{ByteReader, ByteWriter};
use super::DecodeError;

const HIGH_SURROGATES: std::ops::RangeInclusive<u16> = 0xd800..=0xdbff;

/// Append `units` using one to three bytes per unit.
pub(crate) fn write_units(out: &mut ByteWriter, units: &[u16]) {
    for &unit in units {
        if unit < 0x80 {
            out.write_u8(unit as u8);
        } else if unit < 0x800 {
            out.write_u8(0xc0 | ((unit >> 6) & 0x1f) as u8);
            out.write_u8(0x80 | (unit & 0x3f) as u8);
        } else {
            out.write_u8(0xe0 | ((unit >> 12) & 0x0f) as u8);
            out.write_u8(0x80 | ((unit >> 6) & 0x3f) as u8);
            out.write_u8(0x80 | (unit & 0x3f) as u8);
        }
    }
}

/// Length of the next chunk when at most `max` units may be written.
///
/// A chunk never ends on a high surrogate; its pair moves to the next chunk.
pub(crate) fn chunk_len(units: &[u16], max: usize) -> usize {
    if units.len() <= max {
        return units.len();
    }
    if HIGH_SURROGATES.contains(&units[max - 1]) {
        max - 1
    } else {
        max
    }
}

/// Read exactly `count` UTF-16 units and append them to `units`.
pub(crate) fn read_units(
    input: &mut ByteReader<'_>,
    count: usize,
    units: &mut Vec<u16>,
) -> Result<(), DecodeError> {
    let mut left = count;
    while left > 0 {
        let start = input.offset();
        let lead = input.read_u8()?;
        match lead {
            0x00..=0x7f => {
                units.push(u16::from(lead));
                left -= 1;
            }
            0xc0..=0xdf => {
                let b1 = continuation(input, start)?;
                units.push((u16::from(lead & 0x1f) << 6) | b1);
                left -= 1;
            }
            0xe0..=0xef => {
                let b1 = continuation(input, start)?;
                let b2 = continuation(input, start)?;
                units.push((u16::from(lead & 0x0f) << 12) | (b1 << 6) | b2);
                left -= 1;
            }
            0xf0..=0xf4 if left >= 2 => {
                let b1 = u32::from(continuation(input, start)?);
                let b2 = u32::from(continuation(input, start)?);
                let b3 = u32::from(continuation(input, start)?);
                let code = (u32::from(lead & 0x07) << 18) | (b1 << 12) | (b2 << 6) | b3;
                let ch = char::from_u32(code)
                    .filter(|c| u32::from(*c) >= 0x10000)
                    .ok_or(DecodeError::InvalidString { offset: start })?;
                let mut pair = [0u16; 2];
                units.extend_from_slice(ch.encode_utf16(&mut pair));
                left -= 2;
            }
            _ => return Err(DecodeError::InvalidString { offset: start }),
        }
    }
    Ok(())
}

fn continuation(input: &mut ByteReader<'_>, start: usize) -> Result<u16, DecodeError> {
    let byte = input.read_u8()?;
    if byte & 0xc0 != 0x80 {
        return Err(DecodeError::InvalidString { offset: start });
    }
    Ok(u16::from(byte & 0x3f))
}
