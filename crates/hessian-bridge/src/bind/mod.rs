// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Coercion of decoded values into native types.
//!
//! The decoder knows nothing about the destination; [`Binder`] takes each
//! [`Value`] and builds the statically-typed field it is bound to, applying
//! the widening and range-checked narrowing rules Java peers rely on:
//!
//! | Wire | Native |
//! |------|--------|
//! | int32 | `i8`, `i16` (checked), `i32`, `i64`, `f32` (exact), `f64` |
//! | int64 | `i8`, `i16`, `i32` (checked), `i64`, `f32`/`f64` (exact) |
//! | double | `f64`, `f32` (exact) |
//! | null | `Option<T>` |
//! | list | `Vec<T>` |
//! | map | `HashMap`, `BTreeMap` (duplicate keys rejected) |
//! | composite | registered native composite |
//!
//! Results are assembled fresh and returned only on full success, so a failed
//! bind never leaves a half-written destination behind.

mod error;
mod impls;

pub use error::{BindError, BindErrorKind, PathSegment};

use crate::composite::Composite;
use crate::registry::TypeRegistry;
use crate::types::Shaped;
use crate::value::{CompositeValue, Value};

/// A native type that can be built from a decoded [`Value`].
pub trait Bind: Shaped + Sized {
    fn bind(value: Value, binder: &Binder<'_>) -> Result<Self, BindError>;
}

/// Registry-aware coercion entry point.
#[derive(Debug, Clone, Copy)]
pub struct Binder<'r> {
    registry: &'r TypeRegistry,
}

impl<'r> Binder<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    pub fn bind<T: Bind>(&self, value: Value) -> Result<T, BindError> {
        T::bind(value, self)
    }

    /// Bind into an existing destination; `dest` is untouched on failure.
    pub fn bind_into<T: Bind>(&self, value: Value, dest: &mut T) -> Result<(), BindError> {
        *dest = self.bind(value)?;
        Ok(())
    }

    /// Bind a composite value to the native type registered for it.
    pub fn bind_composite<T: Composite>(&self, value: Value) -> Result<T, BindError> {
        let composite = match value {
            Value::Composite(composite) => composite,
            other => return Err(BindError::type_mismatch(&other, T::type_label())),
        };

        let registered = self.registry.lookup(&composite.type_name).ok_or_else(|| {
            BindError::new(BindErrorKind::UnregisteredType {
                type_name: composite.type_name.clone(),
            })
        })?;

        let expected = self
            .registry
            .identifier_of::<T>()
            .map(|id| id.to_string())
            .unwrap_or_else(|| T::JAVA_CLASS_NAME.to_string());
        if composite.type_name != expected {
            return Err(BindError::new(BindErrorKind::TypeMismatch {
                observed: format!("composite {}", composite.type_name),
                expected: format!("composite {}", expected),
            }));
        }

        let native = T::descriptor();
        if registered.field_count() != native.field_count() {
            return Err(BindError::schema_mismatch(
                &composite.type_name,
                format!(
                    "registered descriptor has {} field(s), {} declares {}",
                    registered.field_count(),
                    std::any::type_name::<T>(),
                    native.field_count()
                ),
            ));
        }
        if let Some(missing) = registered
            .field_names()
            .find(|name| composite.field(name).is_none())
        {
            return Err(BindError::schema_mismatch(
                &composite.type_name,
                format!("field {} missing from wire", missing),
            ));
        }

        let mut fields = FieldBinder::new(self, composite);
        T::bind_fields(&mut fields)
    }
}

/// Field-by-name access to one composite value, used by
/// [`Composite::bind_fields`].
#[derive(Debug)]
pub struct FieldBinder<'b, 'r> {
    binder: &'b Binder<'r>,
    type_name: String,
    fields: Vec<Option<(String, Value)>>,
}

impl<'b, 'r> FieldBinder<'b, 'r> {
    fn new(binder: &'b Binder<'r>, composite: CompositeValue) -> Self {
        Self {
            binder,
            type_name: composite.type_name,
            fields: composite.fields.into_iter().map(Some).collect(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn binder(&self) -> &'b Binder<'r> {
        self.binder
    }

    /// Take the wire field `name` and bind it.
    pub fn field<T: Bind>(&mut self, name: &str) -> Result<T, BindError> {
        let value = self
            .fields
            .iter_mut()
            .find(|slot| matches!(slot, Some((field, _)) if field == name))
            .and_then(Option::take)
            .map(|(_, value)| value)
            .ok_or_else(|| {
                BindError::schema_mismatch(
                    &self.type_name,
                    format!("field {} missing from wire", name),
                )
            })?;
        self.binder
            .bind(value)
            .map_err(|e| e.at(PathSegment::Field(name.to_string())))
    }
}
