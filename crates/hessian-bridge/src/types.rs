// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Native types with a fixed wire shape.
//!
//! [`Shaped`] ties a Rust type to the [`Shape`] it travels as, plus the Java
//! type name used when it is the element of a typed list. [`Binary`] and
//! [`Date`] give byte arrays and timestamps their own wire forms (a plain
//! `Vec<u8>` is a list of ints, as in Java's `List<Byte>`).

use crate::registry::Shape;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Static wire description of a native type.
pub trait Shaped {
    fn shape() -> Shape;

    /// Java type name as a typed-list element; `None` for untyped lists.
    fn java_type() -> Option<Cow<'static, str>> {
        Self::shape().java_type().map(Cow::Owned)
    }

    /// Expected type reported in bind errors.
    fn type_label() -> Cow<'static, str> {
        Cow::Owned(Self::shape().to_string())
    }
}

macro_rules! impl_shaped {
    ($ty:ty, $shape:expr, $java:expr, $label:expr) => {
        impl Shaped for $ty {
            fn shape() -> Shape {
                $shape
            }

            fn java_type() -> Option<Cow<'static, str>> {
                Some(Cow::Borrowed($java))
            }

            fn type_label() -> Cow<'static, str> {
                Cow::Borrowed($label)
            }
        }
    };
}

impl_shaped!(bool, Shape::Bool, "boolean", "bool");
impl_shaped!(i8, Shape::Int32, "byte", "int8");
impl_shaped!(i16, Shape::Int32, "short", "int16");
impl_shaped!(i32, Shape::Int32, "int", "int32");
impl_shaped!(i64, Shape::Int64, "long", "int64");
impl_shaped!(f32, Shape::Double, "float", "float32");
impl_shaped!(f64, Shape::Double, "double", "double");
impl_shaped!(String, Shape::String, "string", "string");
impl_shaped!(str, Shape::String, "string", "string");

impl Shaped for crate::value::Value {
    fn shape() -> Shape {
        Shape::Any
    }
}

impl<T: Shaped> Shaped for Option<T> {
    fn shape() -> Shape {
        Shape::optional(T::shape())
    }

    /// Nullable elements never form a typed array: Java reads `N` inside
    /// `int[]` as `0`.
    fn java_type() -> Option<Cow<'static, str>> {
        None
    }

    fn type_label() -> Cow<'static, str> {
        Cow::Owned(format!("option<{}>", T::type_label()))
    }
}

impl<T: Shaped> Shaped for Vec<T> {
    fn shape() -> Shape {
        Shape::list(T::shape())
    }

    fn java_type() -> Option<Cow<'static, str>> {
        T::java_type().map(|t| Cow::Owned(format!("[{}", t)))
    }

    fn type_label() -> Cow<'static, str> {
        Cow::Owned(format!("list<{}>", T::type_label()))
    }
}

impl<T: Shaped> Shaped for [T] {
    fn shape() -> Shape {
        Vec::<T>::shape()
    }

    fn java_type() -> Option<Cow<'static, str>> {
        Vec::<T>::java_type()
    }

    fn type_label() -> Cow<'static, str> {
        Vec::<T>::type_label()
    }
}

impl<K: Shaped, V: Shaped, S> Shaped for HashMap<K, V, S> {
    fn shape() -> Shape {
        Shape::map(K::shape(), V::shape())
    }

    fn java_type() -> Option<Cow<'static, str>> {
        None
    }

    fn type_label() -> Cow<'static, str> {
        Cow::Owned(format!("map<{}, {}>", K::type_label(), V::type_label()))
    }
}

impl<K: Shaped, V: Shaped> Shaped for BTreeMap<K, V> {
    fn shape() -> Shape {
        HashMap::<K, V>::shape()
    }

    fn java_type() -> Option<Cow<'static, str>> {
        None
    }

    fn type_label() -> Cow<'static, str> {
        HashMap::<K, V>::type_label()
    }
}

impl<T: Shaped + ?Sized> Shaped for &T {
    fn shape() -> Shape {
        T::shape()
    }

    fn java_type() -> Option<Cow<'static, str>> {
        T::java_type()
    }

    fn type_label() -> Cow<'static, str> {
        T::type_label()
    }
}

impl<T: Shaped + ?Sized> Shaped for Box<T> {
    fn shape() -> Shape {
        T::shape()
    }

    fn java_type() -> Option<Cow<'static, str>> {
        T::java_type()
    }

    fn type_label() -> Cow<'static, str> {
        T::type_label()
    }
}

// ---------------------------------------------------------------------------
// Binary
// ---------------------------------------------------------------------------

/// Byte array (`byte[]`), encoded with the Hessian binary forms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Binary(pub Vec<u8>);

impl Binary {
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Binary {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Binary {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl AsRef<[u8]> for Binary {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Shaped for Binary {
    fn shape() -> Shape {
        Shape::Bytes
    }

    fn type_label() -> Cow<'static, str> {
        Cow::Borrowed("bytes")
    }
}

// ---------------------------------------------------------------------------
// Date
// ---------------------------------------------------------------------------

/// `java.util.Date`: milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Date(pub i64);

impl Date {
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub fn millis(self) -> i64 {
        self.0
    }

    /// `None` when the instant is outside the platform's `SystemTime` range.
    pub fn to_system_time(self) -> Option<SystemTime> {
        let offset = Duration::from_millis(self.0.unsigned_abs());
        if self.0 >= 0 {
            UNIX_EPOCH.checked_add(offset)
        } else {
            UNIX_EPOCH.checked_sub(offset)
        }
    }
}

/// Truncates to whole milliseconds; saturates far outside the `i64` range.
impl From<SystemTime> for Date {
    fn from(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(after) => Self(i64::try_from(after.as_millis()).unwrap_or(i64::MAX)),
            Err(before) => Self(
                i64::try_from(before.duration().as_millis())
                    .map(|ms| -ms)
                    .unwrap_or(i64::MIN),
            ),
        }
    }
}

impl Shaped for Date {
    fn shape() -> Shape {
        Shape::Date
    }

    fn type_label() -> Cow<'static, str> {
        Cow::Borrowed("date")
    }
}

impl Shaped for SystemTime {
    fn shape() -> Shape {
        Shape::Date
    }

    fn type_label() -> Cow<'static, str> {
        Cow::Borrowed("date")
    }
}
