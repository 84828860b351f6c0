// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Hessian 2.0 binary encoding and decoding.
//!
//! [`Encoder`] appends native values to an owned buffer; [`Decoder`] turns a
//! byte slice back into dynamic [`Value`](crate::Value)s, one value per call.
//! Both keep the per-stream class-definition and type tables that Hessian
//! uses for reference compaction, so one instance must see a whole stream.

pub mod cursor;
mod decoder;
mod encode;
mod encoder;
pub mod tags;
mod text;

pub use decoder::Decoder;
pub use encode::Encode;
pub use encoder::Encoder;

use std::fmt;

/// Failure while writing a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The value has no Hessian representation.
    UnsupportedType {
        type_name: String,
        reason: &'static str,
    },
    /// A composite type was encoded without being registered.
    ReverseLookupFailed { type_name: &'static str },
    /// Fields written for a composite disagree with its descriptor.
    FieldMismatch { type_name: String, detail: String },
    DepthLimitExceeded { limit: usize },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::UnsupportedType { type_name, reason } => {
                write!(f, "cannot encode {}: {}", type_name, reason)
            }
            EncodeError::ReverseLookupFailed { type_name } => {
                write!(f, "type {} is not registered", type_name)
            }
            EncodeError::FieldMismatch { type_name, detail } => {
                write!(f, "field mismatch in {}: {}", type_name, detail)
            }
            EncodeError::DepthLimitExceeded { limit } => {
                write!(f, "nesting deeper than {} levels", limit)
            }
        }
    }
}

impl std::error::Error for EncodeError {}

/// Failure while reading a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The input ended `needed` bytes short of a complete value.
    Truncated { offset: usize, needed: usize },
    /// Unknown, reserved or misplaced tag byte.
    MalformedTag { offset: usize, tag: u8 },
    InvalidString { offset: usize },
    InvalidLength { offset: usize, length: i64 },
    /// Back reference to a value that was never read.
    InvalidReference { offset: usize, index: usize },
    /// Back reference to a container that is still being read.
    CyclicReference { offset: usize, index: usize },
    /// Object instance naming a class definition that was never read.
    UndefinedClass { offset: usize, index: usize },
    /// Type reference to an entry missing from the type table.
    UndefinedType { offset: usize, index: usize },
    /// Input left over after the last expected value.
    TrailingBytes { offset: usize, remaining: usize },
    /// A composite whose wire identifier has no registry entry.
    UnknownCompositeType { type_name: String },
    DepthLimitExceeded { limit: usize },
    LengthLimitExceeded { length: usize, limit: usize },
}

impl DecodeError {
    /// Whether the error describes a malformed byte stream (as opposed to a
    /// well-formed stream this process cannot or will not accept).
    pub fn is_malformed(&self) -> bool {
        !matches!(
            self,
            DecodeError::UnknownCompositeType { .. }
                | DecodeError::DepthLimitExceeded { .. }
                | DecodeError::LengthLimitExceeded { .. }
        )
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Truncated { offset, needed } => write!(
                f,
                "truncated input at offset {}: {} more byte(s) needed",
                offset, needed
            ),
            DecodeError::MalformedTag { offset, tag } => {
                write!(f, "malformed tag 0x{:02x} at offset {}", tag, offset)
            }
            DecodeError::InvalidString { offset } => {
                write!(f, "invalid string data at offset {}", offset)
            }
            DecodeError::InvalidLength { offset, length } => {
                write!(f, "invalid length {} at offset {}", length, offset)
            }
            DecodeError::InvalidReference { offset, index } => {
                write!(f, "reference to unknown value #{} at offset {}", index, offset)
            }
            DecodeError::CyclicReference { offset, index } => write!(
                f,
                "cyclic reference to value #{} at offset {}",
                index, offset
            ),
            DecodeError::UndefinedClass { offset, index } => write!(
                f,
                "object refers to undefined class #{} at offset {}",
                index, offset
            ),
            DecodeError::UndefinedType { offset, index } => write!(
                f,
                "reference to undefined type #{} at offset {}",
                index, offset
            ),
            DecodeError::TrailingBytes { offset, remaining } => write!(
                f,
                "{} trailing byte(s) at offset {}",
                remaining, offset
            ),
            DecodeError::UnknownCompositeType { type_name } => {
                write!(f, "unknown composite type {}", type_name)
            }
            DecodeError::DepthLimitExceeded { limit } => {
                write!(f, "nesting deeper than {} levels", limit)
            }
            DecodeError::LengthLimitExceeded { length, limit } => {
                write!(f, "length {} exceeds limit {}", length, limit)
            }
        }
    }
}

impl std::error::Error for DecodeError {}
