// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! [`Bind`] for the supported native types.

use super::{Bind, BindError, BindErrorKind, Binder, PathSegment};
use crate::types::{Binary, Date, Shaped};
use crate::value::Value;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::time::SystemTime;

/// Largest magnitude at which every integer is exactly representable.
const F64_EXACT_INT: i64 = 1 << 53;
const F32_EXACT_INT: i64 = 1 << 24;

fn mismatch<T: Shaped + ?Sized>(value: &Value) -> BindError {
    BindError::type_mismatch(value, T::type_label())
}

impl Bind for bool {
    fn bind(value: Value, _: &Binder<'_>) -> Result<Self, BindError> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

macro_rules! impl_bind_int {
    ($ty:ty) => {
        impl Bind for $ty {
            fn bind(value: Value, _: &Binder<'_>) -> Result<Self, BindError> {
                match value {
                    Value::Int32(v) => <$ty>::try_from(v)
                        .map_err(|_| BindError::range_overflow(v, Self::type_label())),
                    Value::Int64(v) => <$ty>::try_from(v)
                        .map_err(|_| BindError::range_overflow(Value::Int64(v), Self::type_label())),
                    other => Err(mismatch::<Self>(&other)),
                }
            }
        }
    };
}

impl_bind_int!(i8);
impl_bind_int!(i16);
impl_bind_int!(i32);
impl_bind_int!(i64);

impl Bind for f64 {
    fn bind(value: Value, _: &Binder<'_>) -> Result<Self, BindError> {
        match value {
            Value::Double(v) => Ok(v),
            Value::Int32(v) => Ok(f64::from(v)),
            Value::Int64(v) if v.unsigned_abs() <= F64_EXACT_INT as u64 => Ok(v as f64),
            Value::Int64(v) => Err(BindError::range_overflow(
                Value::Int64(v),
                Self::type_label(),
            )),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Bind for f32 {
    fn bind(value: Value, _: &Binder<'_>) -> Result<Self, BindError> {
        match value {
            Value::Double(v) => {
                let narrow = v as f32;
                if f64::from(narrow) == v || v.is_nan() {
                    Ok(narrow)
                } else {
                    Err(BindError::range_overflow(Value::Double(v), Self::type_label()))
                }
            }
            Value::Int32(v) if i64::from(v).abs() <= F32_EXACT_INT => Ok(v as f32),
            Value::Int64(v) if v.unsigned_abs() <= F32_EXACT_INT as u64 => Ok(v as f32),
            Value::Int32(_) | Value::Int64(_) => {
                Err(BindError::range_overflow(&value, Self::type_label()))
            }
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Bind for String {
    fn bind(value: Value, _: &Binder<'_>) -> Result<Self, BindError> {
        match value {
            Value::String(v) => Ok(v),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Bind for Binary {
    fn bind(value: Value, _: &Binder<'_>) -> Result<Self, BindError> {
        match value {
            Value::Bytes(v) => Ok(Binary(v)),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Bind for Date {
    fn bind(value: Value, _: &Binder<'_>) -> Result<Self, BindError> {
        match value {
            Value::Date(v) => Ok(Date(v)),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Bind for SystemTime {
    fn bind(value: Value, _: &Binder<'_>) -> Result<Self, BindError> {
        match value {
            Value::Date(v) => Date(v)
                .to_system_time()
                .ok_or_else(|| BindError::range_overflow(Value::Date(v), Self::type_label())),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Bind for Value {
    fn bind(value: Value, _: &Binder<'_>) -> Result<Self, BindError> {
        Ok(value)
    }
}

impl<T: Bind> Bind for Option<T> {
    fn bind(value: Value, binder: &Binder<'_>) -> Result<Self, BindError> {
        match value {
            Value::Null => Ok(None),
            other => T::bind(other, binder).map(Some),
        }
    }
}

impl<T: Bind> Bind for Box<T> {
    fn bind(value: Value, binder: &Binder<'_>) -> Result<Self, BindError> {
        T::bind(value, binder).map(Box::new)
    }
}

impl<T: Bind> Bind for Vec<T> {
    fn bind(value: Value, binder: &Binder<'_>) -> Result<Self, BindError> {
        match value {
            Value::List(list) => list
                .items
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    T::bind(item, binder).map_err(|e| e.at(PathSegment::Index(index)))
                })
                .collect(),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

/// Bind every entry of a map value, failing on the first key seen twice.
fn bind_entries<K, V, F>(
    value: Value,
    binder: &Binder<'_>,
    expected: &dyn Fn(&Value) -> BindError,
    mut insert: F,
) -> Result<(), BindError>
where
    K: Bind,
    V: Bind,
    F: FnMut(K, V) -> bool,
{
    let map = match value {
        Value::Map(map) => map,
        other => return Err(expected(&other)),
    };
    for (key, value) in map.entries {
        let rendered = key.to_string();
        let k = K::bind(key, binder).map_err(|e| e.at(PathSegment::Key(rendered.clone())))?;
        let v = V::bind(value, binder).map_err(|e| e.at(PathSegment::Key(rendered.clone())))?;
        if !insert(k, v) {
            return Err(BindError::new(BindErrorKind::DuplicateKey { key: rendered }));
        }
    }
    Ok(())
}

impl<K, V, S> Bind for HashMap<K, V, S>
where
    K: Bind + Eq + Hash,
    V: Bind,
    S: BuildHasher + Default,
{
    fn bind(value: Value, binder: &Binder<'_>) -> Result<Self, BindError> {
        let mut out = HashMap::with_hasher(S::default());
        bind_entries::<K, V, _>(value, binder, &mismatch::<Self>, |k, v| {
            out.insert(k, v).is_none()
        })?;
        Ok(out)
    }
}

impl<K, V> Bind for BTreeMap<K, V>
where
    K: Bind + Ord,
    V: Bind,
{
    fn bind(value: Value, binder: &Binder<'_>) -> Result<Self, BindError> {
        let mut out = BTreeMap::new();
        bind_entries::<K, V, _>(value, binder, &mismatch::<Self>, |k, v| {
            out.insert(k, v).is_none()
        })?;
        Ok(out)
    }
}
