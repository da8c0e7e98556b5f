// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-type storage tables.
//!
//! Each registered property type owns one [`PropertyTypeStorage`], which maps
//! object identities to that type's [`PropertyStorage`] records. A record holds
//! a base value, a relative value, a [`Priority`] and [`PropertyFlags`].
//!
//! # Implementation
//!
//! The table is a [`StorageTable`] enum with one typed `HashMap` per value
//! kind. Typed access goes straight to the matching map through
//! [`PropertyValue::table`]; erased access (priority, flags, removal, copying)
//! matches over the variants. There is never more than one record per
//! (object, type) pair because the map is keyed by object.

use alloc::string::String;
use alloc::vec::Vec;
use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};
use hashbrown::HashMap;
use peniko::Color;

use crate::id::PropertyTypeId;
use crate::object::ObjectId;
use crate::value::{OpaqueHandle, PropertyValue, ResourceHandle, Value, ValueKind};

/// Priority of a storage record, used to break ties during resolution.
///
/// Freshly acquired storage has [`Priority::Normal`]. A candidate only replaces
/// another when its priority is strictly greater.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// Lowest priority.
    Min,
    /// Below normal.
    Low,
    /// Default priority.
    #[default]
    Normal,
    /// Above normal.
    High,
    /// Highest priority.
    Max,
}

bitflags::bitflags! {
    /// Per-record flag bits.
    ///
    /// Only [`PropertyFlags::FROM_ASSET`] is named; callers may use other bits
    /// through [`PropertyFlags::from_bits_retain`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PropertyFlags: u32 {
        /// The value was loaded from a scene asset rather than set at runtime.
        const FROM_ASSET = 1 << 0;
    }
}

/// The stored value of one property type on one object.
#[derive(Clone, Debug)]
pub struct PropertyStorage<T: PropertyValue> {
    base: T::Slot,
    relative: T::Slot,
    priority: Priority,
    flags: PropertyFlags,
}

impl<T: PropertyValue> PropertyStorage<T> {
    /// Creates a record holding the kind's neutral base and relative values.
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            base: T::neutral_base(),
            relative: T::neutral_relative(),
            priority: Priority::Normal,
            flags: PropertyFlags::empty(),
        }
    }

    /// Returns the composition of base and relative.
    #[must_use]
    pub fn value(&self) -> Option<T> {
        T::compose(&self.base, &self.relative)
    }

    /// Returns the base value.
    #[must_use]
    pub fn base(&self) -> Option<T> {
        T::from_slot(&self.base)
    }

    /// Returns the relative value.
    #[must_use]
    pub fn relative(&self) -> Option<T> {
        T::from_slot(&self.relative)
    }

    /// Replaces the base value.
    pub fn set_base(&mut self, value: T) {
        self.base = value.into_slot();
    }

    /// Replaces the relative value.
    pub fn set_relative(&mut self, value: T) {
        self.relative = value.into_slot();
    }

    /// Returns the priority.
    #[must_use]
    #[inline]
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Sets the priority.
    #[inline]
    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    /// Returns the flags.
    #[must_use]
    #[inline]
    pub fn flags(&self) -> PropertyFlags {
        self.flags
    }

    /// Returns a mutable reference to the flags.
    #[inline]
    pub fn flags_mut(&mut self) -> &mut PropertyFlags {
        &mut self.flags
    }

    pub(crate) fn base_eq(&self, other: &Self) -> bool {
        T::slot_eq(&self.base, &other.base)
    }
}

/// Map from object to the storage record of one type.
pub type StorageMap<T> = HashMap<ObjectId, PropertyStorage<T>>;

/// Storage records of one property type, as one typed map per value kind.
#[derive(Clone, Debug)]
pub enum StorageTable {
    /// Records of a [`ValueKind::Float`] type.
    Float(StorageMap<f32>),
    /// Records of a [`ValueKind::Int`] type.
    Int(StorageMap<i32>),
    /// Records of a [`ValueKind::Bool`] type.
    Bool(StorageMap<bool>),
    /// Records of a [`ValueKind::Color`] type.
    Color(StorageMap<Color>),
    /// Records of a [`ValueKind::Vector2`] type.
    Vector2(StorageMap<Vec2>),
    /// Records of a [`ValueKind::Vector3`] type.
    Vector3(StorageMap<Vec3>),
    /// Records of a [`ValueKind::Vector4`] type.
    Vector4(StorageMap<Vec4>),
    /// Records of a [`ValueKind::Matrix2x2`] type.
    Matrix2x2(StorageMap<Mat2>),
    /// Records of a [`ValueKind::Matrix3x3`] type.
    Matrix3x3(StorageMap<Mat3>),
    /// Records of a [`ValueKind::Matrix4x4`] type.
    Matrix4x4(StorageMap<Mat4>),
    /// Records of a [`ValueKind::String`] type.
    String(StorageMap<String>),
    /// Records of a [`ValueKind::Pointer`] type.
    Pointer(StorageMap<OpaqueHandle>),
    /// Records of a [`ValueKind::Resource`] type.
    Resource(StorageMap<ResourceHandle>),
}

/// Runs `$body` with `$map` bound to whichever typed map `$table` holds.
macro_rules! with_table {
    ($table:expr, |$map:ident| $body:expr) => {
        match $table {
            StorageTable::Float($map) => $body,
            StorageTable::Int($map) => $body,
            StorageTable::Bool($map) => $body,
            StorageTable::Color($map) => $body,
            StorageTable::Vector2($map) => $body,
            StorageTable::Vector3($map) => $body,
            StorageTable::Vector4($map) => $body,
            StorageTable::Matrix2x2($map) => $body,
            StorageTable::Matrix3x3($map) => $body,
            StorageTable::Matrix4x4($map) => $body,
            StorageTable::String($map) => $body,
            StorageTable::Pointer($map) => $body,
            StorageTable::Resource($map) => $body,
        }
    };
}

impl StorageTable {
    /// Creates an empty table for `kind`.
    #[must_use]
    pub fn new(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Float => f32::empty_table(),
            ValueKind::Int => i32::empty_table(),
            ValueKind::Bool => bool::empty_table(),
            ValueKind::Color => Color::empty_table(),
            ValueKind::Vector2 => Vec2::empty_table(),
            ValueKind::Vector3 => Vec3::empty_table(),
            ValueKind::Vector4 => Vec4::empty_table(),
            ValueKind::Matrix2x2 => Mat2::empty_table(),
            ValueKind::Matrix3x3 => Mat3::empty_table(),
            ValueKind::Matrix4x4 => Mat4::empty_table(),
            ValueKind::String => String::empty_table(),
            ValueKind::Pointer => OpaqueHandle::empty_table(),
            ValueKind::Resource => ResourceHandle::empty_table(),
        }
    }

    /// Returns the value kind of the records in this table.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        fn kind_of<T: PropertyValue>(_: &StorageMap<T>) -> ValueKind {
            T::KIND
        }
        with_table!(self, |map| kind_of(map))
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        with_table!(self, |map| map.len())
    }

    /// Returns `true` if the table holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `object` has a record in this table.
    #[must_use]
    pub fn contains(&self, object: ObjectId) -> bool {
        with_table!(self, |map| map.contains_key(&object))
    }

    /// Returns the objects that have a record, in unspecified order.
    #[must_use]
    pub fn objects(&self) -> Vec<ObjectId> {
        with_table!(self, |map| map.keys().copied().collect())
    }

    /// Returns the priority of `object`'s record.
    #[must_use]
    pub fn priority(&self, object: ObjectId) -> Option<Priority> {
        with_table!(self, |map| map.get(&object).map(PropertyStorage::priority))
    }

    /// Returns the flags of `object`'s record.
    #[must_use]
    pub fn flags(&self, object: ObjectId) -> Option<PropertyFlags> {
        with_table!(self, |map| map.get(&object).map(PropertyStorage::flags))
    }

    /// Returns the composed value of `object`'s own record.
    #[must_use]
    pub fn value(&self, object: ObjectId) -> Option<Value> {
        fn read<T: PropertyValue>(map: &StorageMap<T>, object: ObjectId) -> Option<Value> {
            map.get(&object)
                .and_then(PropertyStorage::value)
                .map(T::into_value)
        }
        with_table!(self, |map| read(map, object))
    }

    pub(crate) fn remove(&mut self, object: ObjectId) -> bool {
        with_table!(self, |map| map.remove(&object).is_some())
    }

    pub(crate) fn set_priority(&mut self, object: ObjectId, priority: Priority) -> bool {
        with_table!(self, |map| match map.get_mut(&object) {
            Some(storage) => {
                storage.set_priority(priority);
                true
            }
            None => false,
        })
    }

    pub(crate) fn update_flags(
        &mut self,
        object: ObjectId,
        update: impl FnOnce(&mut PropertyFlags),
    ) -> bool {
        with_table!(self, |map| match map.get_mut(&object) {
            Some(storage) => {
                update(storage.flags_mut());
                true
            }
            None => false,
        })
    }

    /// Duplicates `source`'s record (values, priority and flags) onto `target`.
    pub(crate) fn copy_record(&mut self, source: ObjectId, target: ObjectId) -> bool {
        fn copy<T: PropertyValue>(map: &mut StorageMap<T>, source: ObjectId, target: ObjectId) -> bool {
            let Some(record) = map.get(&source).cloned() else {
                return false;
            };
            map.insert(target, record);
            true
        }
        with_table!(self, |map| copy(map, source, target))
    }

    /// Compares base values. Two absent records are equal.
    pub(crate) fn base_equal(&self, a: ObjectId, b: ObjectId) -> bool {
        fn compare<T: PropertyValue>(map: &StorageMap<T>, a: ObjectId, b: ObjectId) -> bool {
            match (map.get(&a), map.get(&b)) {
                (Some(a), Some(b)) => a.base_eq(b),
                (None, None) => true,
                _ => false,
            }
        }
        with_table!(self, |map| compare(map, a, b))
    }

    /// Writes an erased value into `object`'s record, creating it if needed.
    ///
    /// Returns `false` without touching the table if the kinds differ.
    pub(crate) fn assign(&mut self, object: ObjectId, value: Value, relative: bool) -> bool {
        fn assign<T: PropertyValue>(
            map: &mut StorageMap<T>,
            object: ObjectId,
            value: Value,
            relative: bool,
        ) -> bool {
            let Some(value) = T::from_value(value) else {
                return false;
            };
            let storage = map.entry(object).or_insert_with(PropertyStorage::neutral);
            if relative {
                storage.set_relative(value);
            } else {
                storage.set_base(value);
            }
            true
        }
        with_table!(self, |map| assign(map, object, value, relative))
    }
}

/// The storage table of one registered property type.
#[derive(Clone, Debug)]
pub struct PropertyTypeStorage {
    ty: PropertyTypeId,
    table: StorageTable,
}

impl PropertyTypeStorage {
    pub(crate) fn new(ty: PropertyTypeId, kind: ValueKind) -> Self {
        Self {
            ty,
            table: StorageTable::new(kind),
        }
    }

    /// Returns the property type this storage belongs to.
    #[must_use]
    #[inline]
    pub fn property_type(&self) -> PropertyTypeId {
        self.ty
    }

    /// Returns the records.
    #[must_use]
    #[inline]
    pub fn table(&self) -> &StorageTable {
        &self.table
    }

    pub(crate) fn table_mut(&mut self) -> &mut StorageTable {
        &mut self.table
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if no object has a record of this type.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the typed map, or `None` if `T` is not this type's kind.
    #[must_use]
    pub fn map<T: PropertyValue>(&self) -> Option<&StorageMap<T>> {
        T::table(&self.table)
    }

    pub(crate) fn map_mut<T: PropertyValue>(&mut self) -> Option<&mut StorageMap<T>> {
        T::table_mut(&mut self.table)
    }

    /// Returns `object`'s own typed record.
    #[must_use]
    pub fn get<T: PropertyValue>(&self, object: ObjectId) -> Option<&PropertyStorage<T>> {
        self.map::<T>()?.get(&object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectArena;
    use alloc::string::ToString;

    fn objects() -> (ObjectId, ObjectId) {
        let mut arena = ObjectArena::default();
        (arena.create(), arena.create())
    }

    #[test]
    fn priority_order() {
        assert!(Priority::Min < Priority::Low);
        assert!(Priority::Low < Priority::Normal);
        assert!(Priority::Normal < Priority::High);
        assert!(Priority::High < Priority::Max);
        assert_eq!(Priority::default(), Priority::Normal);
    }

    #[test]
    fn neutral_record() {
        let storage = PropertyStorage::<f32>::neutral();
        assert_eq!(storage.base(), Some(0.0));
        assert_eq!(storage.relative(), Some(0.0));
        assert_eq!(storage.priority(), Priority::Normal);
        assert!(storage.flags().is_empty());

        let text = PropertyStorage::<String>::neutral();
        assert_eq!(text.base(), None);
        assert_eq!(text.value(), None);
    }

    #[test]
    fn table_kind_matches() {
        for kind in ValueKind::ALL {
            let table = StorageTable::new(kind);
            assert_eq!(table.kind(), kind);
            assert!(table.is_empty());
        }
    }

    #[test]
    fn assign_checks_kind() {
        let (a, _) = objects();
        let mut table = StorageTable::new(ValueKind::Int);
        assert!(!table.assign(a, Value::Float(1.0), false));
        assert!(table.is_empty());

        assert!(table.assign(a, Value::Int(4), false));
        assert!(table.assign(a, Value::Int(3), true));
        assert_eq!(table.value(a), Some(Value::Int(7)));
    }

    #[test]
    fn copy_record_includes_priority_and_flags() {
        let (a, b) = objects();
        let mut storage = PropertyTypeStorage::new(PropertyTypeId::new(0, 0), ValueKind::String);
        assert!(storage.table_mut().assign(a, Value::String("hello".to_string()), false));
        assert!(storage.table_mut().set_priority(a, Priority::High));
        assert!(
            storage
                .table_mut()
                .update_flags(a, |f| f.insert(PropertyFlags::FROM_ASSET))
        );

        assert!(storage.table_mut().copy_record(a, b));
        let copied = storage.get::<String>(b).unwrap();
        assert_eq!(copied.base().as_deref(), Some("hello"));
        assert_eq!(copied.priority(), Priority::High);
        assert!(copied.flags().contains(PropertyFlags::FROM_ASSET));
        assert!(storage.table().base_equal(a, b));
    }

    #[test]
    fn base_equal_absent_and_mismatched() {
        let (a, b) = objects();
        let mut table = StorageTable::new(ValueKind::Float);
        assert!(table.base_equal(a, b));
        assert!(table.assign(a, Value::Float(1.0), false));
        assert!(!table.base_equal(a, b));
        assert!(table.assign(b, Value::Float(1.0), false));
        // Relative values do not take part.
        assert!(table.assign(b, Value::Float(5.0), true));
        assert!(table.base_equal(a, b));
    }

    #[test]
    fn remove_and_header_access() {
        let (a, b) = objects();
        let mut table = StorageTable::new(ValueKind::Bool);
        assert!(!table.remove(a));
        assert!(!table.set_priority(a, Priority::Max));
        assert_eq!(table.priority(a), None);

        assert!(table.assign(a, Value::Bool(true), false));
        assert!(table.contains(a));
        assert!(!table.contains(b));
        assert_eq!(table.objects(), alloc::vec![a]);
        assert!(table.remove(a));
        assert!(!table.remove(a));
        assert_eq!(table.flags(a), None);
    }
}
