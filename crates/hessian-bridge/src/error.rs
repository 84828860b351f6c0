// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Crate-level error type.
//!
//! Each layer keeps its own error enum ([`EncodeError`], [`DecodeError`],
//! [`BindError`], [`RegistryError`]); [`Error`] wraps them for the message
//! entry points, and [`Error::kind`] classifies any of them without matching
//! on the nested variants.
//!
//! ```
//! use hessian_bridge::{decode_message, ErrorKind, Message, TypeRegistry};
//!
//! #[derive(Debug, Message)]
//! struct Args {
//!     flag: bool,
//! }
//!
//! let registry = TypeRegistry::new();
//! let err = decode_message::<Args>(&[0x91], &registry).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::TypeMismatch);
//! assert_eq!(err.to_string(), "field flag (#0): type mismatch: expected bool, found int32");
//! ```

use crate::bind::{BindError, BindErrorKind};
use crate::registry::RegistryError;
use crate::ser::{DecodeError, EncodeError};
use std::fmt;

/// Failure category shared by every layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Truncated input, unknown tag, bad UTF-8, invalid length or reference.
    MalformedWire,
    /// Composite identifier unknown to the registry (decode side).
    UnknownCompositeType,
    TypeMismatch,
    RangeOverflow,
    SchemaMismatch,
    /// Composite identifier unknown to the registry (bind side).
    UnregisteredType,
    DuplicateKey,
    /// Conflicting registry entries.
    Configuration,
    UnsupportedType,
    ReverseLookupFailed,
    /// Nesting depth or collection length over the configured limit.
    LimitExceeded,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::MalformedWire => "malformed wire",
            ErrorKind::UnknownCompositeType => "unknown composite type",
            ErrorKind::TypeMismatch => "type mismatch",
            ErrorKind::RangeOverflow => "range overflow",
            ErrorKind::SchemaMismatch => "schema mismatch",
            ErrorKind::UnregisteredType => "unregistered type",
            ErrorKind::DuplicateKey => "duplicate key",
            ErrorKind::Configuration => "configuration",
            ErrorKind::UnsupportedType => "unsupported type",
            ErrorKind::ReverseLookupFailed => "reverse lookup failed",
            ErrorKind::LimitExceeded => "limit exceeded",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Encode(EncodeError),
    Decode(DecodeError),
    Bind(BindError),
    Registry(RegistryError),
    /// Failure while reading one field of a flat message.
    Field {
        name: String,
        position: usize,
        source: Box<Error>,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Encode(e) => match e {
                EncodeError::UnsupportedType { .. } => ErrorKind::UnsupportedType,
                EncodeError::ReverseLookupFailed { .. } => ErrorKind::ReverseLookupFailed,
                EncodeError::FieldMismatch { .. } => ErrorKind::SchemaMismatch,
                EncodeError::DepthLimitExceeded { .. } => ErrorKind::LimitExceeded,
            },
            Error::Decode(e) => match e {
                DecodeError::UnknownCompositeType { .. } => ErrorKind::UnknownCompositeType,
                DecodeError::DepthLimitExceeded { .. }
                | DecodeError::LengthLimitExceeded { .. } => ErrorKind::LimitExceeded,
                _ => ErrorKind::MalformedWire,
            },
            Error::Bind(e) => match e.kind() {
                BindErrorKind::TypeMismatch { .. } => ErrorKind::TypeMismatch,
                BindErrorKind::RangeOverflow { .. } => ErrorKind::RangeOverflow,
                BindErrorKind::SchemaMismatch { .. } => ErrorKind::SchemaMismatch,
                BindErrorKind::UnregisteredType { .. } => ErrorKind::UnregisteredType,
                BindErrorKind::DuplicateKey { .. } => ErrorKind::DuplicateKey,
            },
            Error::Registry(_) => ErrorKind::Configuration,
            Error::Field { source, .. } => source.kind(),
        }
    }

    /// Innermost layer error, past any field wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::Field { source, .. } => source.root(),
            other => other,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Encode(e) => write!(f, "{}", e),
            Error::Decode(e) => write!(f, "{}", e),
            Error::Bind(e) => write!(f, "{}", e),
            Error::Registry(e) => write!(f, "{}", e),
            Error::Field {
                name,
                position,
                source,
            } => write!(f, "field {} (#{}): {}", name, position, source),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Encode(e) => Some(e),
            Error::Decode(e) => Some(e),
            Error::Bind(e) => Some(e),
            Error::Registry(e) => Some(e),
            Error::Field { source, .. } => Some(source.as_ref()),
        }
    }
}

impl From<EncodeError> for Error {
    fn from(e: EncodeError) -> Self {
        Error::Encode(e)
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Error::Decode(e)
    }
}

impl From<BindError> for Error {
    fn from(e: BindError) -> Self {
        Error::Bind(e)
    }
}

impl From<RegistryError> for Error {
    fn from(e: RegistryError) -> Self {
        Error::Registry(e)
    }
}

/// Convenient alias for results using the crate [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
