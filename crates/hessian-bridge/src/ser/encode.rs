// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! [`Encode`] for the supported native types.
//!
//! Widths are fixed by the Rust type: `i8`/`i16`/`i32` are Hessian ints,
//! `i64` is a long and both float types are doubles. Unsigned and
//! platform-width integers have no implementation, so passing one is a
//! compile error rather than a silent reinterpretation.

use super::{EncodeError, Encoder};
use crate::types::{Binary, Date, Shaped};
use crate::value::Value;
use std::collections::{BTreeMap, HashMap};
use std::time::SystemTime;

/// A native value with a Hessian representation.
pub trait Encode {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError>;
}

macro_rules! impl_encode_scalar {
    ($ty:ty, |$v:ident, $enc:ident| $body:expr) => {
        impl Encode for $ty {
            fn encode(&self, $enc: &mut Encoder<'_>) -> Result<(), EncodeError> {
                let $v = self;
                $body;
                Ok(())
            }
        }
    };
}

impl_encode_scalar!(bool, |v, enc| enc.write_bool(*v));
impl_encode_scalar!(i8, |v, enc| enc.write_i32(i32::from(*v)));
impl_encode_scalar!(i16, |v, enc| enc.write_i32(i32::from(*v)));
impl_encode_scalar!(i32, |v, enc| enc.write_i32(*v));
impl_encode_scalar!(i64, |v, enc| enc.write_i64(*v));
impl_encode_scalar!(f32, |v, enc| enc.write_f64(f64::from(*v)));
impl_encode_scalar!(f64, |v, enc| enc.write_f64(*v));
impl_encode_scalar!(str, |v, enc| enc.write_str(v));
impl_encode_scalar!(String, |v, enc| enc.write_str(v));
impl_encode_scalar!(Binary, |v, enc| enc.write_bytes(&v.0));
impl_encode_scalar!(Date, |v, enc| enc.write_date(v.0));
impl_encode_scalar!(SystemTime, |v, enc| enc.write_date(Date::from(*v).0));

impl Encode for Value {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        encoder.encode_value(self)
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        match self {
            Some(value) => value.encode(encoder),
            None => {
                encoder.write_null();
                Ok(())
            }
        }
    }
}

impl<T: Encode + Shaped> Encode for [T] {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        encoder.encode_list(<[T] as Shaped>::java_type().as_deref(), self)
    }
}

impl<T: Encode + Shaped> Encode for Vec<T> {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        self.as_slice().encode(encoder)
    }
}

impl<K: Encode, V: Encode, S> Encode for HashMap<K, V, S> {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        encoder.encode_map(None, self.iter())
    }
}

impl<K: Encode, V: Encode> Encode for BTreeMap<K, V> {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        encoder.encode_map(None, self.iter())
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        (**self).encode(encoder)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
        (**self).encode(encoder)
    }
}
