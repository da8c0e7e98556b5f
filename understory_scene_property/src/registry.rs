// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property type registry.
//!
//! This module provides [`PropertyTypeRegistry`], which owns every
//! [`PropertyTypeInfo`] of a [`PropertyManager`](crate::PropertyManager).
//! Defining a type here does not make it visible to
//! [`PropertyManager::find_type_by_name`](crate::PropertyManager::find_type_by_name);
//! that happens on registration.

use alloc::boxed::Box;
use alloc::vec::Vec;
use hashbrown::HashMap;

use crate::error::PropertyError;
use crate::id::{PropertyType, PropertyTypeId};
use crate::value::{PropertyValue, Value, ValueKind};

/// Descriptor of a property type: name, value kind, default value and
/// inheritance flag.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyTypeInfo {
    name: Box<str>,
    default_value: Value,
    inherits: bool,
}

impl PropertyTypeInfo {
    /// Returns the property type name.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the kind of values this type stores.
    #[must_use]
    #[inline]
    pub fn kind(&self) -> ValueKind {
        self.default_value.kind()
    }

    /// Returns the authored default value.
    #[must_use]
    #[inline]
    pub fn default_value(&self) -> &Value {
        &self.default_value
    }

    /// Returns whether scene-graph nodes inherit this property from ancestors.
    #[must_use]
    #[inline]
    pub fn inherits(&self) -> bool {
        self.inherits
    }
}

#[derive(Clone, Debug)]
struct TypeSlot {
    generation: u16,
    info: Option<PropertyTypeInfo>,
}

/// Owner of all property type descriptors of a manager.
///
/// Slots are reused after [`PropertyManager::delete_type`](crate::PropertyManager::delete_type)
/// with a bumped generation, so stale [`PropertyTypeId`]s resolve to nothing.
#[derive(Clone, Default)]
pub struct PropertyTypeRegistry {
    slots: Vec<TypeSlot>,
    free_list: Vec<u16>,
    by_name: HashMap<Box<str>, PropertyTypeId>,
}

impl PropertyTypeRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn define(
        &mut self,
        name: &str,
        default_value: Value,
        inherits: bool,
    ) -> Result<PropertyTypeId, PropertyError> {
        if self.by_name.contains_key(name) {
            return Err(PropertyError::DuplicateName(name.into()));
        }
        let info = PropertyTypeInfo {
            name: name.into(),
            default_value,
            inherits,
        };

        let id = if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[usize::from(index)];
            slot.generation += 1;
            slot.info = Some(info);
            PropertyTypeId::new(index, slot.generation)
        } else {
            if self.slots.len() >= usize::from(u16::MAX) {
                return Err(PropertyError::TooManyTypes);
            }
            #[expect(clippy::cast_possible_truncation, reason = "checked above")]
            let index = self.slots.len() as u16;
            self.slots.push(TypeSlot {
                generation: 0,
                info: Some(info),
            });
            PropertyTypeId::new(index, 0)
        };

        self.by_name.insert(name.into(), id);
        Ok(id)
    }

    pub(crate) fn remove(&mut self, id: PropertyTypeId) -> Option<PropertyTypeInfo> {
        let slot = self.slots.get_mut(usize::from(id.index()))?;
        if slot.generation != id.generation() {
            return None;
        }
        let info = slot.info.take()?;
        self.by_name.remove(info.name());
        // A slot whose generation is exhausted is retired, never reused.
        if slot.generation < u16::MAX {
            self.free_list.push(id.index());
        }
        Some(info)
    }

    pub(crate) fn set_inherits(&mut self, id: PropertyTypeId, inherits: bool) -> bool {
        match self.get_mut(id) {
            Some(info) => {
                info.inherits = inherits;
                true
            }
            None => false,
        }
    }

    fn get_mut(&mut self, id: PropertyTypeId) -> Option<&mut PropertyTypeInfo> {
        self.slots
            .get_mut(usize::from(id.index()))
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.info.as_mut())
    }

    /// Returns the descriptor for `id`, or `None` if it is expired.
    #[must_use]
    pub fn get(&self, id: PropertyTypeId) -> Option<&PropertyTypeInfo> {
        self.slots
            .get(usize::from(id.index()))
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.info.as_ref())
    }

    /// Returns `true` if `id` refers to a live descriptor.
    #[must_use]
    pub fn contains(&self, id: PropertyTypeId) -> bool {
        self.get(id).is_some()
    }

    /// Looks up a defined type by name, registered or not.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<PropertyTypeId> {
        self.by_name.get(name).copied()
    }

    /// Returns the authored default of a typed property.
    ///
    /// Returns `None` if the type is expired or `T` is not its kind.
    #[must_use]
    pub fn default_of<T: PropertyValue>(&self, ty: PropertyType<T>) -> Option<T> {
        self.get(ty.id())
            .and_then(|info| T::from_value(info.default_value.clone()))
    }

    /// Returns the number of live descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns `true` if no types are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Returns an iterator over live descriptors in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (PropertyTypeId, &PropertyTypeInfo)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            #[expect(clippy::cast_possible_truncation, reason = "index < len < u16::MAX")]
            let id = PropertyTypeId::new(i as u16, slot.generation);
            slot.info.as_ref().map(|info| (id, info))
        })
    }
}

impl core::fmt::Debug for PropertyTypeRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PropertyTypeRegistry")
            .field("count", &self.len())
            .field("types", &self.by_name.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{format, vec, vec::Vec};

    #[test]
    fn registry_new() {
        let registry = PropertyTypeRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn registry_define_and_lookup() {
        let mut registry = PropertyTypeRegistry::new();
        let width = registry.define("Width", Value::Float(0.0), false).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.by_name("Width"), Some(width));
        assert_eq!(registry.by_name("Height"), None);

        let info = registry.get(width).unwrap();
        assert_eq!(info.name(), "Width");
        assert_eq!(info.kind(), ValueKind::Float);
        assert!(!info.inherits());
    }

    #[test]
    fn registry_duplicate_name() {
        let mut registry = PropertyTypeRegistry::new();
        registry.define("Width", Value::Float(0.0), false).unwrap();
        assert_eq!(
            registry.define("Width", Value::Int(0), false),
            Err(PropertyError::DuplicateName("Width".into()))
        );
    }

    #[test]
    fn registry_remove_expires_handles() {
        let mut registry = PropertyTypeRegistry::new();
        let width = registry.define("Width", Value::Float(0.0), false).unwrap();
        assert!(registry.remove(width).is_some());
        assert!(registry.get(width).is_none());
        assert!(registry.remove(width).is_none());

        // The slot is reused with a new generation; the old handle stays dead.
        let height = registry.define("Height", Value::Float(0.0), false).unwrap();
        assert_eq!(height.index(), width.index());
        assert_ne!(height, width);
        assert!(registry.get(width).is_none());
        assert!(!registry.set_inherits(width, true));

        // The name is free again.
        assert!(registry.define("Width", Value::Float(1.0), false).is_ok());
    }

    #[test]
    fn exhausted_slot_is_retired() {
        let mut registry = PropertyTypeRegistry::new();
        let first = registry.define("A", Value::Float(0.0), false).unwrap();
        registry.slots[usize::from(first.index())].generation = u16::MAX - 1;
        assert!(registry.remove(first).is_none(), "generation no longer matches");

        let last = PropertyTypeId::new(first.index(), u16::MAX - 1);
        assert!(registry.remove(last).is_some());
        let reused = registry.define("B", Value::Float(0.0), false).unwrap();
        assert_eq!(reused.index(), first.index());
        assert_eq!(reused.generation(), u16::MAX);

        // The final generation retires the slot instead of wrapping to 0.
        assert!(registry.remove(reused).is_some());
        let fresh = registry.define("C", Value::Float(0.0), false).unwrap();
        assert_ne!(fresh.index(), first.index());
        assert!(registry.get(reused).is_none());
        assert!(registry.get(PropertyTypeId::new(first.index(), 0)).is_none());
    }

    #[test]
    fn registry_default_of() {
        let mut registry = PropertyTypeRegistry::new();
        let id = registry.define("Opacity", Value::Float(1.0), true).unwrap();
        assert_eq!(registry.default_of(PropertyType::<f32>::from_id(id)), Some(1.0));
        assert_eq!(registry.default_of(PropertyType::<i32>::from_id(id)), None);
    }

    #[test]
    fn registry_iter() {
        let mut registry = PropertyTypeRegistry::new();
        registry.define("Width", Value::Float(0.0), false).unwrap();
        registry.define("Height", Value::Float(0.0), false).unwrap();

        let names: Vec<_> = registry.iter().map(|(_, info)| info.name()).collect();
        assert_eq!(names, vec!["Width", "Height"]);
    }

    #[test]
    fn registry_debug() {
        let mut registry = PropertyTypeRegistry::new();
        registry.define("Width", Value::Float(0.0), false).unwrap();

        let debug = format!("{:?}", registry);
        assert!(debug.contains("PropertyTypeRegistry"));
        assert!(debug.contains("Width"));
    }
}
