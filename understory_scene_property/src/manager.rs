// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The property manager.
//!
//! [`PropertyManager`] owns everything a scene needs to answer "what is the
//! value of property X on object Y": the type registry, one storage table per
//! registered type, the object identities, and the group attachments.

use alloc::boxed::Box;
use alloc::vec::Vec;
use hashbrown::HashMap;

use crate::error::PropertyError;
use crate::id::{PropertyType, PropertyTypeId};
use crate::metadata::PropertyMetadata;
use crate::object::{ObjectArena, ObjectId, PropertyGroup};
use crate::registry::{PropertyTypeInfo, PropertyTypeRegistry};
use crate::resolve::{Attachments, find_with_groups};
use crate::storage::{PropertyFlags, PropertyStorage, PropertyTypeStorage, Priority, StorageMap};
use crate::value::{PropertyValue, Value};

/// Property store of one scene.
///
/// # Lifecycle of a property type
///
/// 1. [`define_type`](Self::define_type) creates the descriptor.
/// 2. [`register_type`](Self::register_type), or the first write, creates its
///    storage table and makes it visible to [`find_type_by_name`](Self::find_type_by_name).
/// 3. [`unregister_type`](Self::unregister_type) drops the (empty) table.
/// 4. [`delete_type`](Self::delete_type) drops the descriptor; old handles expire.
///
/// # Resolution
///
/// Reads on an object consider its own record and the records of its attached
/// [`PropertyGroup`]s, keeping the highest priority. Among equal priorities the
/// object's own record wins, then the most recently attached group. Reads on
/// scene-graph nodes (see [`get_node`](Self::get_node)) additionally climb to
/// ancestors for inheriting types.
///
/// # Example
///
/// ```rust
/// use understory_scene_property::{Priority, PropertyManager, PropertyMetadata};
///
/// let mut manager = PropertyManager::new();
/// let visible = manager
///     .define_type("Visible", PropertyMetadata::new(true))
///     .unwrap();
///
/// let object = manager.create_object();
/// let group = manager.create_group();
/// manager.set(object, visible, false).unwrap();
/// manager.set(group.object(), visible, true).unwrap();
/// manager.add_property_group(object, group).unwrap();
///
/// // Equal priority: the object's own value wins.
/// assert_eq!(manager.get(object, visible), Some(false));
///
/// manager.set_priority(group.object(), visible, Priority::High);
/// assert_eq!(manager.get(object, visible), Some(true));
/// ```
#[derive(Debug, Default)]
pub struct PropertyManager {
    pub(crate) types: PropertyTypeRegistry,
    pub(crate) storages: HashMap<PropertyTypeId, PropertyTypeStorage>,
    /// Registered types by name. Keeps its own copy of each name.
    names: HashMap<Box<str>, PropertyTypeId>,
    pub(crate) groups: Attachments,
    objects: ObjectArena,
}

fn live_type(
    types: &PropertyTypeRegistry,
    id: PropertyTypeId,
) -> Result<&PropertyTypeInfo, PropertyError> {
    types.get(id).ok_or_else(|| {
        log::warn!("property type {id} is not defined or has been deleted");
        PropertyError::UnknownType(id)
    })
}

impl PropertyManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Objects
    // =========================================================================

    /// Issues a new object identity.
    pub fn create_object(&mut self) -> ObjectId {
        self.objects.create()
    }

    /// Issues a new object identity to be used as a property group.
    pub fn create_group(&mut self) -> PropertyGroup {
        PropertyGroup::from_object(self.objects.create())
    }

    /// Returns `true` if `object` was issued by this manager and not destroyed.
    #[must_use]
    pub fn is_alive(&self, object: ObjectId) -> bool {
        self.objects.is_alive(object)
    }

    /// Returns the number of live objects, groups included.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Destroys an object or group.
    ///
    /// Removes all of its records, its own group attachments, and its
    /// attachment to any other object, then frees the identity. Returns `false`
    /// if `object` is already stale.
    pub fn destroy_object(&mut self, object: ObjectId) -> bool {
        if !self.objects.is_alive(object) {
            return false;
        }
        let removed = self.remove_all(object);
        self.groups.remove(&object);
        let group = PropertyGroup::from_object(object);
        self.groups.retain(|_, groups| {
            groups.retain(|g| *g != group);
            !groups.is_empty()
        });
        log::trace!("destroyed {object:?} with {removed} records");
        self.objects.destroy(object)
    }

    fn check_alive(&self, object: ObjectId) -> Result<(), PropertyError> {
        if self.objects.is_alive(object) {
            Ok(())
        } else {
            log::warn!("{object:?} is not alive");
            Err(PropertyError::StaleObject(object))
        }
    }

    // =========================================================================
    // Property types
    // =========================================================================

    /// Defines a new property type.
    ///
    /// The type is not registered yet; see [`register_type`](Self::register_type).
    ///
    /// # Errors
    ///
    /// [`PropertyError::DuplicateName`] if a live type already has `name`,
    /// [`PropertyError::TooManyTypes`] if every type slot is in use.
    pub fn define_type<T: PropertyValue>(
        &mut self,
        name: &str,
        metadata: PropertyMetadata<T>,
    ) -> Result<PropertyType<T>, PropertyError> {
        let (default_value, inherits) = metadata.into_parts();
        self.define_type_value(name, default_value.into_value(), inherits)
            .map(PropertyType::from_id)
    }

    /// Defines a new property type whose kind is that of `default_value`.
    ///
    /// # Errors
    ///
    /// Same as [`define_type`](Self::define_type).
    pub fn define_type_value(
        &mut self,
        name: &str,
        default_value: Value,
        inherits: bool,
    ) -> Result<PropertyTypeId, PropertyError> {
        let kind = default_value.kind();
        let id = self
            .types
            .define(name, default_value, inherits)
            .inspect_err(|err| log::warn!("cannot define property type: {err}"))?;
        log::debug!("defined property type `{name}` ({kind}) as {id}");
        Ok(id)
    }

    /// Deletes a property type, unregistering it first.
    ///
    /// Every handle to the type expires.
    ///
    /// # Errors
    ///
    /// [`PropertyError::TypeInUse`] if records of the type remain,
    /// [`PropertyError::UnknownType`] if the handle is already expired.
    pub fn delete_type(&mut self, ty: impl Into<PropertyTypeId>) -> Result<(), PropertyError> {
        let id = ty.into();
        self.unregister_type(id)?;
        if let Some(info) = self.types.remove(id) {
            log::debug!("deleted property type `{}`", info.name());
        }
        Ok(())
    }

    /// Returns the type registry.
    #[must_use]
    #[inline]
    pub fn types(&self) -> &PropertyTypeRegistry {
        &self.types
    }

    /// Returns the descriptor of a live type.
    #[must_use]
    pub fn type_info(&self, ty: impl Into<PropertyTypeId>) -> Option<&PropertyTypeInfo> {
        self.types.get(ty.into())
    }

    /// Returns a typed handle for `id` if its kind is `T`'s kind.
    #[must_use]
    pub fn typed<T: PropertyValue>(&self, id: PropertyTypeId) -> Option<PropertyType<T>> {
        self.types
            .get(id)
            .filter(|info| info.kind() == T::KIND)
            .map(|_| PropertyType::from_id(id))
    }

    /// Changes whether a type is inherited along the scene graph.
    ///
    /// # Errors
    ///
    /// [`PropertyError::TypeInUse`] once any record of the type exists,
    /// [`PropertyError::UnknownType`] for an expired handle.
    pub fn set_type_inherited(
        &mut self,
        ty: impl Into<PropertyTypeId>,
        inherits: bool,
    ) -> Result<(), PropertyError> {
        let id = ty.into();
        let info = live_type(&self.types, id)?;
        if let Some(storage) = self.storages.get(&id)
            && !storage.is_empty()
        {
            log::warn!("cannot change inheritance of `{}` while in use", info.name());
            return Err(PropertyError::TypeInUse {
                name: info.name().into(),
                count: storage.len(),
            });
        }
        self.types.set_inherits(id, inherits);
        Ok(())
    }

    /// Registers a type: creates its empty storage table and name entry.
    ///
    /// Registering an already registered type does nothing and keeps its values.
    ///
    /// # Errors
    ///
    /// [`PropertyError::UnknownType`] for an expired handle.
    pub fn register_type(&mut self, ty: impl Into<PropertyTypeId>) -> Result<(), PropertyError> {
        self.ensure_registered(ty.into()).map(|_| ())
    }

    fn ensure_registered(
        &mut self,
        id: PropertyTypeId,
    ) -> Result<&mut PropertyTypeStorage, PropertyError> {
        let info = live_type(&self.types, id)?;
        let storage = self.storages.entry(id).or_insert_with(|| {
            log::debug!("registered property type `{}`", info.name());
            self.names.insert(info.name().into(), id);
            PropertyTypeStorage::new(id, info.kind())
        });
        Ok(storage)
    }

    /// Unregisters a type, dropping its storage table and name entry.
    ///
    /// Unregistering a type that is not registered does nothing.
    ///
    /// # Errors
    ///
    /// [`PropertyError::TypeInUse`] if records of the type remain; remove them
    /// first. [`PropertyError::UnknownType`] for an expired handle.
    pub fn unregister_type(&mut self, ty: impl Into<PropertyTypeId>) -> Result<(), PropertyError> {
        let id = ty.into();
        let info = live_type(&self.types, id)?;
        let Some(storage) = self.storages.get(&id) else {
            return Ok(());
        };
        if !storage.is_empty() {
            log::warn!(
                "cannot unregister `{}` with {} stored values",
                info.name(),
                storage.len()
            );
            return Err(PropertyError::TypeInUse {
                name: info.name().into(),
                count: storage.len(),
            });
        }
        self.storages.remove(&id);
        self.names.remove(info.name());
        log::debug!("unregistered property type `{}`", info.name());
        Ok(())
    }

    /// Returns `true` if the type has a storage table.
    #[must_use]
    pub fn is_registered(&self, ty: impl Into<PropertyTypeId>) -> bool {
        self.storages.contains_key(&ty.into())
    }

    /// Returns an iterator over registered types, in unspecified order.
    pub fn registered_types(&self) -> impl Iterator<Item = PropertyTypeId> + '_ {
        self.storages.keys().copied()
    }

    /// Looks up a registered type by name.
    #[must_use]
    pub fn find_type_by_name(&self, name: &str) -> Option<PropertyTypeId> {
        self.names.get(name).copied()
    }

    /// Looks up a registered type by name and checks that its kind is `T`'s.
    #[must_use]
    pub fn find_typed<T: PropertyValue>(&self, name: &str) -> Option<PropertyType<T>> {
        self.typed(self.find_type_by_name(name)?)
    }

    /// Returns the storage table of a registered type.
    #[must_use]
    pub fn type_storage(&self, ty: impl Into<PropertyTypeId>) -> Option<&PropertyTypeStorage> {
        self.storages.get(&ty.into())
    }

    /// Returns the authored default of `ty`.
    ///
    /// # Panics
    ///
    /// Panics if `ty` has been deleted.
    #[must_use]
    pub fn default_value<T: PropertyValue>(&self, ty: PropertyType<T>) -> T {
        match self.types.default_of(ty) {
            Some(value) => value,
            None => panic!("property type {} is not defined", ty.id()),
        }
    }

    // =========================================================================
    // Typed access
    // =========================================================================

    fn typed_map_mut<T: PropertyValue>(
        &mut self,
        object: ObjectId,
        id: PropertyTypeId,
    ) -> Result<&mut StorageMap<T>, PropertyError> {
        self.check_alive(object)?;
        let info = live_type(&self.types, id)?;
        if info.kind() != T::KIND {
            log::warn!("property type `{}` does not store {}", info.name(), T::KIND);
            return Err(PropertyError::KindMismatch {
                name: info.name().into(),
                expected: info.kind(),
                found: T::KIND,
            });
        }
        self.ensure_registered(id)?
            .map_mut::<T>()
            .ok_or(PropertyError::UnknownType(id))
    }

    /// Returns `object`'s own record of `ty`, creating it with neutral values.
    ///
    /// Registers the type if needed. A new record has priority
    /// [`Priority::Normal`] and no flags.
    ///
    /// # Errors
    ///
    /// [`PropertyError::StaleObject`] for a dead object,
    /// [`PropertyError::UnknownType`] for an expired type.
    pub fn acquire_storage<T: PropertyValue>(
        &mut self,
        object: ObjectId,
        ty: PropertyType<T>,
    ) -> Result<&mut PropertyStorage<T>, PropertyError> {
        Ok(self
            .typed_map_mut::<T>(object, ty.id())?
            .entry(object)
            .or_insert_with(PropertyStorage::neutral))
    }

    /// Sets the base value of `ty` on `object`.
    ///
    /// # Errors
    ///
    /// Same as [`acquire_storage`](Self::acquire_storage).
    pub fn set<T: PropertyValue>(
        &mut self,
        object: ObjectId,
        ty: PropertyType<T>,
        value: T,
    ) -> Result<(), PropertyError> {
        self.acquire_storage(object, ty)?.set_base(value);
        Ok(())
    }

    /// Sets the relative value of `ty` on `object`.
    ///
    /// # Errors
    ///
    /// Same as [`acquire_storage`](Self::acquire_storage).
    pub fn set_relative<T: PropertyValue>(
        &mut self,
        object: ObjectId,
        ty: PropertyType<T>,
        value: T,
    ) -> Result<(), PropertyError> {
        self.acquire_storage(object, ty)?.set_relative(value);
        Ok(())
    }

    /// Returns the record `object` resolves for `ty` among its own and its groups'.
    #[must_use]
    pub fn find_storage<T: PropertyValue>(
        &self,
        object: ObjectId,
        ty: PropertyType<T>,
    ) -> Option<&PropertyStorage<T>> {
        let storage = self.storages.get(&ty.id())?;
        let candidate = find_with_groups(storage.table(), &self.groups, object)?;
        storage.get(candidate.owner)
    }

    /// Returns the composed value of `ty` on `object`.
    ///
    /// A string record whose base was never set reads as `None`, even when it
    /// carries a priority, flags, or a relative value.
    ///
    /// ```rust
    /// use understory_scene_property::{PropertyManager, PropertyMetadata};
    ///
    /// let mut manager = PropertyManager::new();
    /// let width = manager.define_type("LayoutWidth", PropertyMetadata::new(0.0_f32)).unwrap();
    /// let object = manager.create_object();
    ///
    /// assert_eq!(manager.get(object, width), None);
    /// manager.set(object, width, 5.0).unwrap();
    /// manager.set_relative(object, width, 2.0).unwrap();
    /// assert_eq!(manager.get(object, width), Some(7.0));
    /// assert_eq!(manager.get_base(object, width), Some(5.0));
    /// ```
    #[must_use]
    pub fn get<T: PropertyValue>(&self, object: ObjectId, ty: PropertyType<T>) -> Option<T> {
        self.find_storage(object, ty)?.value()
    }

    /// Returns the base value of `ty` on `object`.
    #[must_use]
    pub fn get_base<T: PropertyValue>(&self, object: ObjectId, ty: PropertyType<T>) -> Option<T> {
        self.find_storage(object, ty)?.base()
    }

    /// Returns the relative value of `ty` on `object`.
    #[must_use]
    pub fn get_relative<T: PropertyValue>(
        &self,
        object: ObjectId,
        ty: PropertyType<T>,
    ) -> Option<T> {
        self.find_storage(object, ty)?.relative()
    }

    /// Returns the composed value of `ty` on `object`, or the type's default.
    ///
    /// # Panics
    ///
    /// Panics if `ty` has been deleted.
    #[must_use]
    pub fn get_or_default<T: PropertyValue>(&self, object: ObjectId, ty: PropertyType<T>) -> T {
        self.get(object, ty)
            .unwrap_or_else(|| self.default_value(ty))
    }

    // =========================================================================
    // Erased access
    // =========================================================================

    fn assign_value(
        &mut self,
        object: ObjectId,
        id: PropertyTypeId,
        value: Value,
        relative: bool,
    ) -> Result<(), PropertyError> {
        self.check_alive(object)?;
        let info = live_type(&self.types, id)?;
        if info.kind() != value.kind() {
            log::warn!("property type `{}` does not store {}", info.name(), value.kind());
            return Err(PropertyError::KindMismatch {
                name: info.name().into(),
                expected: info.kind(),
                found: value.kind(),
            });
        }
        let assigned = self
            .ensure_registered(id)?
            .table_mut()
            .assign(object, value, relative);
        debug_assert!(assigned, "storage table kind matches its property type");
        Ok(())
    }

    /// Sets the base value of `ty` on `object` from an erased value.
    ///
    /// # Errors
    ///
    /// [`PropertyError::KindMismatch`] if `value` is not of the type's kind,
    /// plus the errors of [`acquire_storage`](Self::acquire_storage).
    pub fn set_value(
        &mut self,
        object: ObjectId,
        ty: impl Into<PropertyTypeId>,
        value: Value,
    ) -> Result<(), PropertyError> {
        self.assign_value(object, ty.into(), value, false)
    }

    /// Sets the relative value of `ty` on `object` from an erased value.
    ///
    /// # Errors
    ///
    /// Same as [`set_value`](Self::set_value).
    pub fn set_relative_value(
        &mut self,
        object: ObjectId,
        ty: impl Into<PropertyTypeId>,
        value: Value,
    ) -> Result<(), PropertyError> {
        self.assign_value(object, ty.into(), value, true)
    }

    /// Returns the composed value of `ty` on `object` as an erased value.
    #[must_use]
    pub fn get_value(&self, object: ObjectId, ty: impl Into<PropertyTypeId>) -> Option<Value> {
        let storage = self.storages.get(&ty.into())?;
        let candidate = find_with_groups(storage.table(), &self.groups, object)?;
        storage.table().value(candidate.owner)
    }

    /// Returns the composed value of the registered type called `name`.
    #[must_use]
    pub fn get_value_by_name(&self, object: ObjectId, name: &str) -> Option<Value> {
        self.get_value(object, self.find_type_by_name(name)?)
    }

    // =========================================================================
    // Records
    // =========================================================================

    /// Removes `object`'s own record of `ty`.
    ///
    /// Group and ancestor records are untouched. Returns `false` if there was
    /// no record.
    pub fn remove(&mut self, object: ObjectId, ty: impl Into<PropertyTypeId>) -> bool {
        self.storages
            .get_mut(&ty.into())
            .is_some_and(|storage| storage.table_mut().remove(object))
    }

    /// Removes every record of `object` and returns how many there were.
    pub fn remove_all(&mut self, object: ObjectId) -> usize {
        self.storages
            .values_mut()
            .map(|storage| storage.table_mut().remove(object))
            .filter(|removed| *removed)
            .count()
    }

    /// Returns `true` if `object` has its own record of `ty`.
    ///
    /// Groups are not consulted.
    #[must_use]
    pub fn has_property(&self, object: ObjectId, ty: impl Into<PropertyTypeId>) -> bool {
        self.storages
            .get(&ty.into())
            .is_some_and(|storage| storage.table().contains(object))
    }

    /// Returns the types `object` has its own records of, in unspecified order.
    #[must_use]
    pub fn property_types(&self, object: ObjectId) -> Vec<PropertyTypeId> {
        self.storages
            .iter()
            .filter(|(_, storage)| storage.table().contains(object))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Compares the base values of `a`'s and `b`'s own records of `ty`.
    ///
    /// Two objects without a record are equal, as is any pair when the type is
    /// not registered.
    #[must_use]
    pub fn is_property_equal(
        &self,
        a: ObjectId,
        b: ObjectId,
        ty: impl Into<PropertyTypeId>,
    ) -> bool {
        self.storages
            .get(&ty.into())
            .is_none_or(|storage| storage.table().base_equal(a, b))
    }

    /// Copies `source`'s own record of `ty`, priority and flags included, to `target`.
    ///
    /// Returns `Ok(false)` if `source` has no record.
    ///
    /// # Errors
    ///
    /// [`PropertyError::StaleObject`] if `target` is dead.
    pub fn copy_property(
        &mut self,
        source: ObjectId,
        target: ObjectId,
        ty: impl Into<PropertyTypeId>,
    ) -> Result<bool, PropertyError> {
        self.check_alive(target)?;
        Ok(self
            .storages
            .get_mut(&ty.into())
            .is_some_and(|storage| storage.table_mut().copy_record(source, target)))
    }

    /// Copies every own record of `source` to `target` and returns how many.
    ///
    /// # Errors
    ///
    /// [`PropertyError::StaleObject`] if `target` is dead.
    pub fn copy_properties(
        &mut self,
        source: ObjectId,
        target: ObjectId,
    ) -> Result<usize, PropertyError> {
        self.check_alive(target)?;
        Ok(self
            .storages
            .values_mut()
            .map(|storage| storage.table_mut().copy_record(source, target))
            .filter(|copied| *copied)
            .count())
    }

    /// Sets the priority of `object`'s own record. Returns `false` if absent.
    pub fn set_priority(
        &mut self,
        object: ObjectId,
        ty: impl Into<PropertyTypeId>,
        priority: Priority,
    ) -> bool {
        self.storages
            .get_mut(&ty.into())
            .is_some_and(|storage| storage.table_mut().set_priority(object, priority))
    }

    /// Returns the priority of `object`'s own record.
    #[must_use]
    pub fn priority(&self, object: ObjectId, ty: impl Into<PropertyTypeId>) -> Option<Priority> {
        self.storages.get(&ty.into())?.table().priority(object)
    }

    /// Sets `flag` on `object`'s own record. Returns `false` if absent.
    pub fn set_flag(
        &mut self,
        object: ObjectId,
        ty: impl Into<PropertyTypeId>,
        flag: PropertyFlags,
    ) -> bool {
        self.storages.get_mut(&ty.into()).is_some_and(|storage| {
            storage
                .table_mut()
                .update_flags(object, |flags| flags.insert(flag))
        })
    }

    /// Clears `flag` on `object`'s own record. Returns `false` if absent.
    pub fn clear_flag(
        &mut self,
        object: ObjectId,
        ty: impl Into<PropertyTypeId>,
        flag: PropertyFlags,
    ) -> bool {
        self.storages.get_mut(&ty.into()).is_some_and(|storage| {
            storage
                .table_mut()
                .update_flags(object, |flags| flags.remove(flag))
        })
    }

    /// Returns whether every bit of `flag` is set on `object`'s own record.
    #[must_use]
    pub fn is_flag_set(
        &self,
        object: ObjectId,
        ty: impl Into<PropertyTypeId>,
        flag: PropertyFlags,
    ) -> Option<bool> {
        let flags = self.storages.get(&ty.into())?.table().flags(object)?;
        Some(flags.contains(flag))
    }

    // =========================================================================
    // Property groups
    // =========================================================================

    /// Attaches `group` to `object`, after any groups already attached.
    ///
    /// # Errors
    ///
    /// [`PropertyError::StaleObject`] if either is dead.
    pub fn add_property_group(
        &mut self,
        object: ObjectId,
        group: PropertyGroup,
    ) -> Result<(), PropertyError> {
        self.check_alive(object)?;
        self.check_alive(group.object())?;
        self.groups.entry(object).or_default().push(group);
        Ok(())
    }

    /// Detaches the first attachment of `group` from `object`.
    ///
    /// Returns `false` if it was not attached.
    pub fn remove_property_group(&mut self, object: ObjectId, group: PropertyGroup) -> bool {
        let Some(groups) = self.groups.get_mut(&object) else {
            return false;
        };
        let Some(index) = groups.iter().position(|g| *g == group) else {
            return false;
        };
        groups.remove(index);
        if groups.is_empty() {
            self.groups.remove(&object);
        }
        true
    }

    /// Detaches every group from `object`. Returns `false` if none were attached.
    pub fn remove_property_groups(&mut self, object: ObjectId) -> bool {
        self.groups.remove(&object).is_some()
    }

    /// Returns the groups attached to `object`, in attachment order.
    #[must_use]
    pub fn property_groups(&self, object: ObjectId) -> &[PropertyGroup] {
        self.groups
            .get(&object)
            .map(|groups| groups.as_slice())
            .unwrap_or_default()
    }

    /// Replaces `target`'s attachments with a copy of `source`'s.
    ///
    /// Does nothing and returns `Ok(false)` if `source` has no groups.
    ///
    /// # Errors
    ///
    /// [`PropertyError::StaleObject`] if `target` is dead.
    pub fn copy_property_groups(
        &mut self,
        source: ObjectId,
        target: ObjectId,
    ) -> Result<bool, PropertyError> {
        self.check_alive(target)?;
        let Some(groups) = self.groups.get(&source) else {
            return Ok(false);
        };
        let copy = groups.clone();
        self.groups.insert(target, copy);
        Ok(true)
    }
}
