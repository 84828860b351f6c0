// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic value model.
//!
//! Every value the decoder produces is a [`Value`]: a closed tagged union that
//! mirrors the Hessian 2.0 wire primitives. Values carry no knowledge of the
//! native Rust type they will eventually be bound to; that is the job of
//! [`Binder`](crate::bind::Binder).

use std::fmt;

/// A decoded wire value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    /// Milliseconds since the Unix epoch (`java.util.Date`).
    Date(i64),
    List(ListValue),
    Map(MapValue),
    Composite(CompositeValue),
}

/// Ordered list, optionally tagged with its wire type (`"[int"`, a class name, ...).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListValue {
    pub type_name: Option<String>,
    pub items: Vec<Value>,
}

impl ListValue {
    /// Untyped list.
    pub fn new(items: Vec<Value>) -> Self {
        Self {
            type_name: None,
            items,
        }
    }

    /// List tagged with a wire type name.
    pub fn typed(type_name: impl Into<String>, items: Vec<Value>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            items,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }
}

/// Ordered key/value pairs.
///
/// Keys may be any value. The wire does not enforce key uniqueness, so the
/// entries are kept exactly as received; uniqueness is checked when a map is
/// bound to a native map type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapValue {
    pub type_name: Option<String>,
    pub entries: Vec<(Value, Value)>,
}

impl MapValue {
    /// Empty untyped map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Untyped map from pairs.
    pub fn from_entries(entries: Vec<(Value, Value)>) -> Self {
        Self {
            type_name: None,
            entries,
        }
    }

    /// Append a pair (no deduplication).
    pub fn insert(&mut self, key: impl Into<Value>, value: impl Into<Value>) {
        self.entries.push((key.into(), value.into()));
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Instance of a composite (class) type: wire identifier plus ordered fields.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeValue {
    pub type_name: String,
    pub fields: Vec<(String, Value)>,
}

impl CompositeValue {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Builder-style field append.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Value of the field called `name`.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn field_names(&self) -> impl ExactSizeIterator<Item = &str> + Clone {
        self.fields.iter().map(|(n, _)| n.as_str())
    }
}

/// Variant tag of a [`Value`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int32,
    Int64,
    Double,
    String,
    Bytes,
    Date,
    List,
    Map,
    Composite,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Double => "double",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Date => "date",
            Self::List => "list",
            Self::Map => "map",
            Self::Composite => "composite",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int32(_) => ValueKind::Int32,
            Self::Int64(_) => ValueKind::Int64,
            Self::Double(_) => ValueKind::Double,
            Self::String(_) => ValueKind::String,
            Self::Bytes(_) => ValueKind::Bytes,
            Self::Date(_) => ValueKind::Date,
            Self::List(_) => ValueKind::List,
            Self::Map(_) => ValueKind::Map,
            Self::Composite(_) => ValueKind::Composite,
        }
    }

    /// Dynamic type description used in mismatch errors.
    ///
    /// Composites and typed collections include their wire type name, e.g.
    /// `composite kitex.echo.EchoRequest` or `list [int`.
    pub fn describe(&self) -> String {
        match self {
            Self::Composite(c) => format!("composite {}", c.type_name),
            Self::List(ListValue {
                type_name: Some(t), ..
            })
            | Self::Map(MapValue {
                type_name: Some(t), ..
            }) => format!("{} {}", self.kind(), t),
            other => other.kind().name().to_string(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int32(v) => Some(*v),
            _ => None,
        }
    }

    /// Integer value widened to 64 bits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int32(v) => Some(i64::from(*v)),
            Self::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListValue> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapValue> {
        match self {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeValue> {
        match self {
            Self::Composite(v) => Some(v),
            _ => None,
        }
    }
}

/// Short rendering used for map keys in error paths.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int32(v) => write!(f, "{}", v),
            Self::Int64(v) => write!(f, "{}L", v),
            Self::Double(v) => write!(f, "{:?}", v),
            Self::String(v) => write!(f, "{:?}", v),
            Self::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            Self::Date(v) => write!(f, "date({})", v),
            Self::List(v) => write!(f, "[{} items]", v.len()),
            Self::Map(v) => write!(f, "{{{} entries}}", v.len()),
            Self::Composite(v) => write!(f, "{}{{..}}", v.type_name),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<ListValue> for Value {
    fn from(v: ListValue) -> Self {
        Self::List(v)
    }
}

impl From<MapValue> for Value {
    fn from(v: MapValue) -> Self {
        Self::Map(v)
    }
}

impl From<CompositeValue> for Value {
    fn from(v: CompositeValue) -> Self {
        Self::Composite(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_accessors() {
        assert_eq!(Value::from(42).as_i32(), Some(42));
        assert_eq!(Value::from(42).as_i64(), Some(42));
        assert_eq!(Value::from(42i64).as_i32(), None);
        assert_eq!(Value::from("hello").as_str(), Some("hello"));
        assert_eq!(Value::from(1.5).as_f64(), Some(1.5));
        assert!(Value::Null.is_null());
    }

    #[test]
    fn test_describe_includes_wire_type() {
        let c = Value::from(CompositeValue::new("kitex.echo.EchoRequest"));
        assert_eq!(c.describe(), "composite kitex.echo.EchoRequest");

        let l = Value::from(ListValue::typed("[int", vec![]));
        assert_eq!(l.describe(), "list [int");

        assert_eq!(Value::from("x").describe(), "string");
    }

    #[test]
    fn test_map_keeps_duplicates_in_order() {
        let mut m = MapValue::new();
        m.insert(true, false);
        m.insert(true, true);
        assert_eq!(m.len(), 2);
        assert_eq!(m.get(&Value::Bool(true)), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_composite_field_lookup() {
        let c = CompositeValue::new("demo.Point")
            .with_field("x", 1)
            .with_field("y", 2);
        assert_eq!(c.field("y"), Some(&Value::Int32(2)));
        assert_eq!(c.field_names().collect::<Vec<_>>(), ["x", "y"]);
        assert!(c.field("z").is_none());
    }

    #[test]
    fn test_display_for_keys() {
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from(7i64).to_string(), "7L");
        assert_eq!(Value::from("k").to_string(), "\"k\"");
    }
}
