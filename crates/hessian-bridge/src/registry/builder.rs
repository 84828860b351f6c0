// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for TypeDescriptor.

use crate::registry::{FieldDescriptor, Shape, TypeDescriptor};

/// Builder for descriptors of classes that have no native Rust type.
///
/// ```
/// use hessian_bridge::registry::{Shape, TypeDescriptorBuilder};
///
/// let descriptor = TypeDescriptorBuilder::new("com.example.Pair")
///     .field("left", Shape::Int32)
///     .list_field("tags", Shape::String)
///     .build();
/// assert_eq!(descriptor.field_count(), 2);
/// ```
#[derive(Debug)]
pub struct TypeDescriptorBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl TypeDescriptorBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field of any shape.
    pub fn field(mut self, name: impl Into<String>, shape: Shape) -> Self {
        self.fields.push(FieldDescriptor::new(name, shape));
        self
    }

    /// Add a list field.
    pub fn list_field(self, name: impl Into<String>, element: Shape) -> Self {
        self.field(name, Shape::list(element))
    }

    /// Add a map field.
    pub fn map_field(self, name: impl Into<String>, key: Shape, value: Shape) -> Self {
        self.field(name, Shape::map(key, value))
    }

    /// Add a nullable field.
    pub fn optional_field(self, name: impl Into<String>, inner: Shape) -> Self {
        self.field(name, Shape::optional(inner))
    }

    /// Add a field holding another registered composite.
    pub fn composite_field(self, name: impl Into<String>, identifier: impl Into<String>) -> Self {
        self.field(name, Shape::composite(identifier))
    }

    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::new(self.name, self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_declaration_order() {
        let d = TypeDescriptorBuilder::new("demo.Order")
            .field("id", Shape::Int64)
            .optional_field("note", Shape::String)
            .map_field("attrs", Shape::String, Shape::Any)
            .composite_field("customer", "demo.Customer")
            .build();

        assert_eq!(d.name, "demo.Order");
        assert_eq!(
            d.field_names().collect::<Vec<_>>(),
            ["id", "note", "attrs", "customer"]
        );
        assert_eq!(d.fields[3].shape, Shape::composite("demo.Customer"));
    }
}
