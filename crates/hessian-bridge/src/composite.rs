// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Native structs that travel as Hessian objects.
//!
//! A composite is a message that also has a Java class identity: it is
//! written as a class definition plus field values, and bound back from a
//! [`Value::Composite`](crate::Value::Composite) by field name. Implement it
//! with `#[derive(Composite)]`:
//!
//! ```
//! use hessian_bridge::{Composite, TypeRegistry};
//!
//! #[derive(Debug, Clone, PartialEq, Composite)]
//! #[hessian(java_class = "demo.Point")]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! let registry = TypeRegistry::new();
//! registry.register_type::<Point>().unwrap();
//! assert_eq!(Point::JAVA_CLASS_NAME, "demo.Point");
//! ```

use crate::bind::{Bind, BindError, FieldBinder};
use crate::message::Message;
use crate::registry::TypeDescriptor;
use crate::ser::Encode;
use std::any::Any;

/// A native type bound to a Java class.
pub trait Composite: Message + Encode + Bind + Any {
    /// Fully-qualified Java class name used as the wire identifier.
    const JAVA_CLASS_NAME: &'static str;

    /// Field layout in declaration order.
    fn descriptor() -> TypeDescriptor;

    /// Build the native value from a composite's wire fields.
    fn bind_fields(fields: &mut FieldBinder<'_, '_>) -> Result<Self, BindError>;

    fn java_class_name(&self) -> &'static str {
        Self::JAVA_CLASS_NAME
    }
}
