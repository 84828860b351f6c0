// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bind failures with the path to the offending value.

use crate::value::Value;
use std::borrow::Cow;
use std::fmt;

/// One step from a bind target down to a nested value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Named field of a message or composite.
    Field(String),
    /// List element.
    Index(usize),
    /// Map entry, by rendered key.
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => f.write_str(name),
            PathSegment::Index(index) => write!(f, "[{}]", index),
            PathSegment::Key(key) => write!(f, "{{{}}}", key),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindErrorKind {
    /// The value's dynamic type cannot become the destination type.
    TypeMismatch { observed: String, expected: String },
    /// The value does not fit the narrower destination type.
    RangeOverflow { value: String, target: String },
    /// Registered descriptor and native type disagree.
    SchemaMismatch { type_name: String, detail: String },
    /// Wire identifier with no registry entry.
    UnregisteredType { type_name: String },
    /// Two map entries bound to the same native key.
    DuplicateKey { key: String },
}

impl fmt::Display for BindErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindErrorKind::TypeMismatch { observed, expected } => {
                write!(f, "type mismatch: expected {}, found {}", expected, observed)
            }
            BindErrorKind::RangeOverflow { value, target } => {
                write!(f, "value {} out of range for {}", value, target)
            }
            BindErrorKind::SchemaMismatch { type_name, detail } => {
                write!(f, "schema mismatch for {}: {}", type_name, detail)
            }
            BindErrorKind::UnregisteredType { type_name } => {
                write!(f, "unregistered type {}", type_name)
            }
            BindErrorKind::DuplicateKey { key } => write!(f, "duplicate map key {}", key),
        }
    }
}

/// Failure to coerce a decoded [`Value`] into a native type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindError {
    kind: BindErrorKind,
    /// Innermost segment first; pushed while the error unwinds.
    path: Vec<PathSegment>,
}

impl BindError {
    pub fn new(kind: BindErrorKind) -> Self {
        Self {
            kind,
            path: Vec::new(),
        }
    }

    pub fn type_mismatch(observed: &Value, expected: impl Into<String>) -> Self {
        Self::new(BindErrorKind::TypeMismatch {
            observed: observed.describe(),
            expected: expected.into(),
        })
    }

    pub fn range_overflow(value: impl fmt::Display, target: Cow<'static, str>) -> Self {
        Self::new(BindErrorKind::RangeOverflow {
            value: value.to_string(),
            target: target.into_owned(),
        })
    }

    pub fn schema_mismatch(type_name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(BindErrorKind::SchemaMismatch {
            type_name: type_name.into(),
            detail: detail.into(),
        })
    }

    /// Prefix the path with an enclosing segment.
    #[must_use]
    pub fn at(mut self, segment: PathSegment) -> Self {
        self.path.push(segment);
        self
    }

    pub fn kind(&self) -> &BindErrorKind {
        &self.kind
    }

    /// Path segments, outermost first.
    pub fn path(&self) -> impl Iterator<Item = &PathSegment> {
        self.path.iter().rev()
    }

    /// Rendered path, e.g. `MapResp{true}` or `items[2].name`.
    pub fn path_string(&self) -> String {
        let mut out = String::new();
        for segment in self.path() {
            if matches!(segment, PathSegment::Field(_)) && !out.is_empty() {
                out.push('.');
            }
            out.push_str(&segment.to_string());
        }
        out
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "at {}: {}", self.path_string(), self.kind)
        }
    }
}

impl std::error::Error for BindError {}
