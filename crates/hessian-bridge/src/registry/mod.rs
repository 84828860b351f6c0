// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type registry: wire identifiers <-> descriptors <-> native types.
//!
//! The registry is filled during initialization and read by every encoder,
//! decoder and binder afterwards. Entries are append-only: once an identifier
//! is registered its descriptor never changes, and registering a *different*
//! descriptor under the same identifier is a configuration error.
//!
//! # Concurrency
//!
//! - **Lock-free reads**: lookups load an immutable snapshot through `ArcSwap`
//! - **Serialized writes**: registrations take a `parking_lot::Mutex`, build a
//!   new snapshot and publish it atomically (copy-on-write)
//! - **All-or-nothing batches**: a batch containing a conflict publishes nothing
//!
//! # Example
//!
//! ```
//! use hessian_bridge::registry::{Shape, TypeDescriptorBuilder, TypeRegistry};
//!
//! let registry = TypeRegistry::new();
//! let point = TypeDescriptorBuilder::new("demo.Point")
//!     .field("x", Shape::Int32)
//!     .field("y", Shape::Int32)
//!     .build();
//!
//! registry.register([point.clone()]).unwrap();
//! registry.register([point]).unwrap(); // idempotent
//! assert!(registry.lookup("demo.Point").is_some());
//! ```

mod builder;
mod descriptor;

pub use builder::TypeDescriptorBuilder;
pub use descriptor::{FieldDescriptor, Shape, TypeDescriptor};

use crate::composite::Composite;
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// RegistryError
// ---------------------------------------------------------------------------

/// Configuration errors raised by conflicting registrations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A descriptor with an empty wire identifier.
    EmptyIdentifier,
    /// The identifier is already bound to a different descriptor.
    ConflictingDescriptor {
        identifier: String,
        registered: String,
        incoming: String,
    },
    /// The identifier or the native type is already bound elsewhere.
    ConflictingNativeType {
        identifier: String,
        native_type: &'static str,
        bound_to: String,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyIdentifier => write!(f, "type descriptor has an empty wire identifier"),
            Self::ConflictingDescriptor {
                identifier,
                registered,
                incoming,
            } => write!(
                f,
                "conflicting descriptors for {}: registered {}, incoming {}",
                identifier, registered, incoming
            ),
            Self::ConflictingNativeType {
                identifier,
                native_type,
                bound_to,
            } => write!(
                f,
                "native type {} cannot be bound to {}: already bound to {}",
                native_type, identifier, bound_to
            ),
        }
    }
}

impl std::error::Error for RegistryError {}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct NativeType {
    id: TypeId,
    name: &'static str,
}

/// One registry entry to add: a descriptor, optionally tied to a native type.
#[derive(Debug, Clone)]
pub struct Registration {
    descriptor: TypeDescriptor,
    native: Option<NativeType>,
}

impl Registration {
    /// Descriptor and native type of a [`Composite`].
    pub fn of<T: Composite>() -> Self {
        Self {
            descriptor: T::descriptor(),
            native: Some(NativeType {
                id: TypeId::of::<T>(),
                name: std::any::type_name::<T>(),
            }),
        }
    }

    /// Descriptor only (decode-side knowledge of a peer class).
    pub fn descriptor(descriptor: TypeDescriptor) -> Self {
        Self {
            descriptor,
            native: None,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.descriptor.name
    }
}

impl From<TypeDescriptor> for Registration {
    fn from(descriptor: TypeDescriptor) -> Self {
        Self::descriptor(descriptor)
    }
}

// ---------------------------------------------------------------------------
// TypeRegistry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Entry {
    descriptor: Arc<TypeDescriptor>,
    native: Option<NativeType>,
}

#[derive(Debug, Clone, Default)]
struct Snapshot {
    by_identifier: HashMap<Arc<str>, Entry>,
    by_native: HashMap<TypeId, Arc<str>>,
}

impl Snapshot {
    /// Stage one registration. Returns whether anything changed.
    fn stage(&mut self, registration: Registration) -> Result<bool, RegistryError> {
        let Registration { descriptor, native } = registration;
        if descriptor.name.is_empty() {
            return Err(RegistryError::EmptyIdentifier);
        }

        if let Some(native) = native {
            if let Some(bound) = self.by_native.get(&native.id) {
                if **bound != *descriptor.name {
                    return Err(RegistryError::ConflictingNativeType {
                        identifier: descriptor.name,
                        native_type: native.name,
                        bound_to: bound.to_string(),
                    });
                }
            }
        }

        if let Some(existing) = self.by_identifier.get_mut(descriptor.name.as_str()) {
            if *existing.descriptor != descriptor {
                return Err(RegistryError::ConflictingDescriptor {
                    identifier: descriptor.name.clone(),
                    registered: existing.descriptor.fingerprint(),
                    incoming: descriptor.fingerprint(),
                });
            }
            return match (existing.native, native) {
                (_, None) => Ok(false),
                (Some(current), Some(new)) if current.id == new.id => Ok(false),
                (Some(current), Some(new)) => Err(RegistryError::ConflictingNativeType {
                    identifier: descriptor.name,
                    native_type: new.name,
                    bound_to: current.name.to_string(),
                }),
                // A descriptor-only entry gains its native type; the
                // identifier -> descriptor mapping itself is untouched.
                (None, Some(new)) => {
                    existing.native = Some(new);
                    let identifier: Arc<str> = Arc::from(descriptor.name.as_str());
                    self.by_native.insert(new.id, identifier);
                    Ok(true)
                }
            };
        }

        let identifier: Arc<str> = Arc::from(descriptor.name.as_str());
        if let Some(native) = native {
            self.by_native.insert(native.id, identifier.clone());
        }
        self.by_identifier.insert(
            identifier,
            Entry {
                descriptor: Arc::new(descriptor),
                native,
            },
        );
        Ok(true)
    }
}

/// Process-lifetime table of composite types.
///
/// Shared by reference (or `Arc`) between every encoder, decoder and binder.
pub struct TypeRegistry {
    snapshot: ArcSwap<Snapshot>,
    writer: Mutex<()>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(Snapshot::default()),
            writer: Mutex::new(()),
        }
    }

    /// Register plain descriptors.
    ///
    /// Idempotent for identical descriptors; fails with
    /// [`RegistryError::ConflictingDescriptor`] when an identifier is reused
    /// for a different shape.
    pub fn register<I>(&self, descriptors: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = TypeDescriptor>,
    {
        self.register_all(descriptors.into_iter().map(Registration::from))
    }

    /// Register a native composite type together with its descriptor.
    pub fn register_type<T: Composite>(&self) -> Result<(), RegistryError> {
        self.register_all([Registration::of::<T>()])
    }

    /// Register a batch atomically: either every entry is published or none.
    pub fn register_all<I>(&self, registrations: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = Registration>,
    {
        let _guard = self.writer.lock();
        let mut next = Snapshot::clone(&self.snapshot.load());

        let mut added = Vec::new();
        for registration in registrations {
            let identifier = registration.identifier().to_string();
            if next.stage(registration)? {
                added.push(identifier);
            }
        }

        if !added.is_empty() {
            let total = next.by_identifier.len();
            self.snapshot.store(Arc::new(next));
            for identifier in &added {
                log::debug!("[registry] registered {}", identifier);
            }
            log::debug!(
                "[registry] published snapshot: {} new, {} total",
                added.len(),
                total
            );
        }
        Ok(())
    }

    /// Descriptor registered under `identifier`.
    pub fn lookup(&self, identifier: &str) -> Option<Arc<TypeDescriptor>> {
        self.snapshot
            .load()
            .by_identifier
            .get(identifier)
            .map(|entry| entry.descriptor.clone())
    }

    /// Wire identifier of a registered native type.
    pub fn reverse_lookup(&self, native: TypeId) -> Option<Arc<str>> {
        self.snapshot.load().by_native.get(&native).cloned()
    }

    /// Wire identifier of `T`, if `T` was registered.
    pub fn identifier_of<T: 'static>(&self) -> Option<Arc<str>> {
        self.reverse_lookup(TypeId::of::<T>())
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.snapshot.load().by_identifier.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.snapshot.load().by_identifier.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All registered identifiers, sorted.
    pub fn identifiers(&self) -> Vec<Arc<str>> {
        let mut ids: Vec<Arc<str>> = self
            .snapshot
            .load()
            .by_identifier
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests;
