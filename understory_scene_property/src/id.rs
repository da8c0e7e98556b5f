// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property type identification.
//!
//! This module provides [`PropertyTypeId`] for runtime property type
//! identification and [`PropertyType<T>`] for type-safe compile-time keys.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

/// A runtime property type identifier.
///
/// A compact (index, generation) pair handed out by the type registry inside a
/// [`PropertyManager`](crate::PropertyManager). Deleting a type bumps the
/// generation of its slot, so a handle kept past deletion is detected as
/// expired instead of silently aliasing a newer type.
///
/// # Example
///
/// ```rust
/// use understory_scene_property::PropertyTypeId;
///
/// let id = PropertyTypeId::new(3, 1);
/// assert_eq!(id.index(), 3);
/// assert_eq!(id.generation(), 1);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyTypeId {
    index: u16,
    generation: u16,
}

impl PropertyTypeId {
    /// Creates a new property type ID from a slot index and generation.
    ///
    /// This is typically called by the manager's type registry rather than directly.
    #[must_use]
    #[inline]
    pub const fn new(index: u16, generation: u16) -> Self {
        Self { index, generation }
    }

    /// Returns the registry slot index of this type.
    #[must_use]
    #[inline]
    pub const fn index(self) -> u16 {
        self.index
    }

    /// Returns the generation of the registry slot this ID was issued for.
    #[must_use]
    #[inline]
    pub const fn generation(self) -> u16 {
        self.generation
    }
}

impl fmt::Debug for PropertyTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyTypeId({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for PropertyTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// A type-safe property type key.
///
/// This wraps a [`PropertyTypeId`] with a phantom type parameter `T` naming the
/// Rust type that carries the property's values (`f32`, [`Color`](peniko::Color),
/// [`Mat4`](glam::Mat4), ...). Typed getters and setters on the manager only
/// accept values of that type.
///
/// ```rust
/// use understory_scene_property::{PropertyManager, PropertyMetadata, PropertyType};
///
/// let mut manager = PropertyManager::new();
/// let width: PropertyType<f32> = manager
///     .define_type("LayoutWidth", PropertyMetadata::new(0.0_f32))
///     .unwrap();
///
/// // manager.set(object, width, "wide"); // Would not compile!
/// # let _ = width;
/// ```
///
/// # Memory Layout
///
/// `PropertyType<T>` is the same size as `PropertyTypeId` (4 bytes).
pub struct PropertyType<T> {
    id: PropertyTypeId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PropertyType<T> {
    /// Creates a typed key from a property type ID.
    ///
    /// Prefer [`PropertyManager::typed`](crate::PropertyManager::typed), which
    /// checks the value kind. A key built here with a mismatched `T` never finds
    /// any storage.
    #[must_use]
    #[inline]
    pub const fn from_id(id: PropertyTypeId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    /// Returns the underlying property type ID.
    #[must_use]
    #[inline]
    pub const fn id(self) -> PropertyTypeId {
        self.id
    }
}

impl<T> From<PropertyType<T>> for PropertyTypeId {
    #[inline]
    fn from(ty: PropertyType<T>) -> Self {
        ty.id
    }
}

// Manual trait implementations to avoid requiring T: Clone, etc.

impl<T> Copy for PropertyType<T> {}

impl<T> Clone for PropertyType<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for PropertyType<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for PropertyType<T> {}

impl<T> Hash for PropertyType<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for PropertyType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyType")
            .field("id", &self.id)
            .field("type", &core::any::type_name::<T>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::string::String;

    #[test]
    fn type_id_basics() {
        let id = PropertyTypeId::new(42, 0);
        assert_eq!(id.index(), 42);
        assert_eq!(id.generation(), 0);

        assert_eq!(id, PropertyTypeId::new(42, 0));
        assert_ne!(id, PropertyTypeId::new(43, 0));
        assert_ne!(id, PropertyTypeId::new(42, 1));
    }

    #[test]
    fn type_id_formatting() {
        let id = PropertyTypeId::new(42, 3);
        assert_eq!(format!("{:?}", id), "PropertyTypeId(42v3)");
        assert_eq!(format!("{}", id), "#42v3");
    }

    #[test]
    fn typed_key_shares_id() {
        let id = PropertyTypeId::new(1, 0);
        let as_float: PropertyType<f32> = PropertyType::from_id(id);
        let as_int: PropertyType<i32> = PropertyType::from_id(id);

        assert_eq!(as_float.id(), as_int.id());
        assert_eq!(PropertyTypeId::from(as_float), id);
    }

    #[test]
    fn typed_key_size() {
        use core::mem::size_of;
        assert_eq!(size_of::<PropertyTypeId>(), 4);
        assert_eq!(size_of::<PropertyType<f32>>(), 4);
        assert_eq!(size_of::<PropertyType<String>>(), 4);
    }
}
