// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for composite (class) types.

use std::fmt;

/// Expected wire shape of a descriptor field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Any value (`java.lang.Object`).
    Any,
    Bool,
    Int32,
    Int64,
    Double,
    String,
    Bytes,
    Date,
    List(Box<Shape>),
    Map(Box<Shape>, Box<Shape>),
    /// Nullable value of the inner shape.
    Optional(Box<Shape>),
    /// Registered composite, by wire identifier.
    Composite(String),
}

impl Shape {
    pub fn list(element: Shape) -> Self {
        Self::List(Box::new(element))
    }

    pub fn map(key: Shape, value: Shape) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }

    pub fn optional(inner: Shape) -> Self {
        Self::Optional(Box::new(inner))
    }

    pub fn composite(identifier: impl Into<String>) -> Self {
        Self::Composite(identifier.into())
    }

    /// Java type name of this shape when it is a typed-list element.
    ///
    /// `None` means lists of this shape travel untyped.
    pub fn java_type(&self) -> Option<String> {
        match self {
            Self::Bool => Some("boolean".into()),
            Self::Int32 => Some("int".into()),
            Self::Int64 => Some("long".into()),
            Self::Double => Some("double".into()),
            Self::String => Some("string".into()),
            Self::List(inner) => inner.java_type().map(|t| format!("[{t}")),
            Self::Composite(name) => Some(name.clone()),
            Self::Any | Self::Bytes | Self::Date | Self::Map(..) | Self::Optional(_) => None,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::Bool => f.write_str("bool"),
            Self::Int32 => f.write_str("int32"),
            Self::Int64 => f.write_str("int64"),
            Self::Double => f.write_str("double"),
            Self::String => f.write_str("string"),
            Self::Bytes => f.write_str("bytes"),
            Self::Date => f.write_str("date"),
            Self::List(inner) => write!(f, "list<{}>", inner),
            Self::Map(k, v) => write!(f, "map<{}, {}>", k, v),
            Self::Optional(inner) => write!(f, "option<{}>", inner),
            Self::Composite(name) => write!(f, "composite {}", name),
        }
    }
}

/// One named field of a composite type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    pub name: String,
    pub shape: Shape,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }
}

/// Wire identifier plus ordered field list of a composite type.
///
/// Two descriptors are interchangeable iff they are equal; the registry uses
/// that equality to decide whether a repeated registration is idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    /// Wire identifier (fully-qualified Java class name).
    pub name: String,
    /// Fields in wire order.
    pub fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl ExactSizeIterator<Item = &str> + Clone {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Stable 64-bit fingerprint of the descriptor, hex-rendered.
    ///
    /// MD5 over the canonical `Display` form, truncated to 8 bytes. Only used
    /// to make conflicting registrations easy to tell apart in diagnostics.
    pub fn fingerprint(&self) -> String {
        use md5::{Digest, Md5};

        let mut hasher = Md5::new();
        hasher.update(self.to_string().as_bytes());
        let digest = hasher.finalize();

        let mut out = String::with_capacity(16);
        for byte in &digest[..8] {
            out.push_str(&format!("{:02x}", byte));
        }
        out
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.name)?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, " {}: {}", field.name, field.shape)?;
        }
        f.write_str(" }")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bool_response() -> TypeDescriptor {
        TypeDescriptor::new(
            "org.apache.dubbo.tests.api.EchoMultiBoolResponse",
            vec![
                FieldDescriptor::new("baseResp", Shape::Bool),
                FieldDescriptor::new("listResp", Shape::list(Shape::Bool)),
                FieldDescriptor::new("mapResp", Shape::map(Shape::Bool, Shape::Bool)),
            ],
        )
    }

    #[test]
    fn test_java_type_names() {
        assert_eq!(Shape::Int32.java_type().as_deref(), Some("int"));
        assert_eq!(
            Shape::list(Shape::Int64).java_type().as_deref(),
            Some("[long")
        );
        assert_eq!(
            Shape::composite("kitex.echo.EchoRequest").java_type().as_deref(),
            Some("kitex.echo.EchoRequest")
        );
        assert_eq!(Shape::Any.java_type(), None);
        assert_eq!(Shape::optional(Shape::Int32).java_type(), None);
    }

    #[test]
    fn test_display_is_canonical() {
        assert_eq!(
            bool_response().to_string(),
            "org.apache.dubbo.tests.api.EchoMultiBoolResponse { baseResp: bool, \
             listResp: list<bool>, mapResp: map<bool, bool> }"
        );
    }

    #[test]
    fn test_fingerprint_tracks_structure() {
        let a = bool_response();
        let mut b = bool_response();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 16);

        b.fields[1].shape = Shape::list(Shape::Int32);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_field_lookup() {
        let d = bool_response();
        assert_eq!(d.field_index("mapResp"), Some(2));
        assert_eq!(d.field("listResp").map(|f| &f.shape), Some(&Shape::list(Shape::Bool)));
        assert!(d.field("missing").is_none());
        assert_eq!(d.field_count(), 3);
    }
}
