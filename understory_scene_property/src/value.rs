// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Value kinds and per-kind composition rules.
//!
//! Every property type stores values of exactly one [`ValueKind`]. On the typed
//! API a kind is represented by a Rust type implementing [`PropertyValue`]:
//!
//! | Kind | Rust type | `compose(base, relative)` | Neutral base / relative |
//! |------|-----------|---------------------------|-------------------------|
//! | `Float` | `f32` | `base + relative` | `0.0` / `0.0` |
//! | `Int` | `i32` | `base + relative` (wrapping) | `0` / `0` |
//! | `Bool` | `bool` | `(base as u8 + relative as u8) != 0` | `false` / `false` |
//! | `Color` | [`Color`] | component-wise sum | transparent / transparent |
//! | `Vector2..4` | [`Vec2`], [`Vec3`], [`Vec4`] | component-wise sum | zero / zero |
//! | `Matrix2x2..4x4` | [`Mat2`], [`Mat3`], [`Mat4`] | `relative * base` | identity / identity |
//! | `String` | [`String`] | `base` | none / none |
//! | `Pointer` | [`OpaqueHandle`] | `base` | null / null |
//! | `Resource` | [`ResourceHandle`] | `base` | null / null |
//!
//! The erased [`Value`] enum carries one value of any kind. It is used for
//! authored defaults, catalogs, and by-name access from deserializers.

use alloc::string::String;
use core::fmt;

use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};
use hashbrown::HashMap;
use peniko::Color;

use crate::storage::{StorageMap, StorageTable};

/// The closed set of data kinds a property type can store.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// 32-bit float.
    Float,
    /// 32-bit signed integer.
    Int,
    /// Boolean.
    Bool,
    /// RGBA color.
    Color,
    /// Two-component float vector.
    Vector2,
    /// Three-component float vector.
    Vector3,
    /// Four-component float vector.
    Vector4,
    /// 2x2 float matrix.
    Matrix2x2,
    /// 3x3 float matrix.
    Matrix3x3,
    /// 4x4 float matrix.
    Matrix4x4,
    /// Owned string.
    String,
    /// Opaque user handle.
    Pointer,
    /// Resource handle.
    Resource,
}

impl ValueKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 13] = [
        Self::Float,
        Self::Int,
        Self::Bool,
        Self::Color,
        Self::Vector2,
        Self::Vector3,
        Self::Vector4,
        Self::Matrix2x2,
        Self::Matrix3x3,
        Self::Matrix4x4,
        Self::String,
        Self::Pointer,
        Self::Resource,
    ];

    /// Returns a short lowercase name for this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Int => "int",
            Self::Bool => "bool",
            Self::Color => "color",
            Self::Vector2 => "vector2",
            Self::Vector3 => "vector3",
            Self::Vector4 => "vector4",
            Self::Matrix2x2 => "matrix2x2",
            Self::Matrix3x3 => "matrix3x3",
            Self::Matrix4x4 => "matrix4x4",
            Self::String => "string",
            Self::Pointer => "pointer",
            Self::Resource => "resource",
        }
    }

    /// Returns the neutral base value that freshly acquired storage of this kind holds.
    ///
    /// `None` for [`ValueKind::String`], which has no value until one is assigned.
    #[must_use]
    pub fn neutral(self) -> Option<Value> {
        match self {
            Self::Float => Some(Value::Float(0.0)),
            Self::Int => Some(Value::Int(0)),
            Self::Bool => Some(Value::Bool(false)),
            Self::Color => Some(Value::Color(Color::TRANSPARENT)),
            Self::Vector2 => Some(Value::Vector2(Vec2::ZERO)),
            Self::Vector3 => Some(Value::Vector3(Vec3::ZERO)),
            Self::Vector4 => Some(Value::Vector4(Vec4::ZERO)),
            Self::Matrix2x2 => Some(Value::Matrix2x2(Mat2::IDENTITY)),
            Self::Matrix3x3 => Some(Value::Matrix3x3(Mat3::IDENTITY)),
            Self::Matrix4x4 => Some(Value::Matrix4x4(Mat4::IDENTITY)),
            Self::String => None,
            Self::Pointer => Some(Value::Pointer(OpaqueHandle::NULL)),
            Self::Resource => Some(Value::Resource(ResourceHandle::NULL)),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

macro_rules! handle_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
        pub struct $name(u64);

        impl $name {
            /// The null handle.
            pub const NULL: Self = Self(0);

            /// Wraps a raw handle value. Zero is the null handle.
            #[must_use]
            #[inline]
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Returns the raw handle value.
            #[must_use]
            #[inline]
            pub const fn raw(self) -> u64 {
                self.0
            }

            /// Returns `true` for the null handle.
            #[must_use]
            #[inline]
            pub const fn is_null(self) -> bool {
                self.0 == 0
            }
        }
    };
}

handle_type!(
    /// Opaque handle to caller-owned data.
    ///
    /// The store never interprets the handle; it only keeps and returns it.
    OpaqueHandle
);

handle_type!(
    /// Handle to a resource (texture, mesh, shader, ...) owned by a resource manager.
    ResourceHandle
);

/// A property value of any kind.
#[derive(Clone, Debug)]
pub enum Value {
    /// See [`ValueKind::Float`].
    Float(f32),
    /// See [`ValueKind::Int`].
    Int(i32),
    /// See [`ValueKind::Bool`].
    Bool(bool),
    /// See [`ValueKind::Color`].
    Color(Color),
    /// See [`ValueKind::Vector2`].
    Vector2(Vec2),
    /// See [`ValueKind::Vector3`].
    Vector3(Vec3),
    /// See [`ValueKind::Vector4`].
    Vector4(Vec4),
    /// See [`ValueKind::Matrix2x2`].
    Matrix2x2(Mat2),
    /// See [`ValueKind::Matrix3x3`].
    Matrix3x3(Mat3),
    /// See [`ValueKind::Matrix4x4`].
    Matrix4x4(Mat4),
    /// See [`ValueKind::String`].
    String(String),
    /// See [`ValueKind::Pointer`].
    Pointer(OpaqueHandle),
    /// See [`ValueKind::Resource`].
    Resource(ResourceHandle),
}

impl Value {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Float(_) => ValueKind::Float,
            Self::Int(_) => ValueKind::Int,
            Self::Bool(_) => ValueKind::Bool,
            Self::Color(_) => ValueKind::Color,
            Self::Vector2(_) => ValueKind::Vector2,
            Self::Vector3(_) => ValueKind::Vector3,
            Self::Vector4(_) => ValueKind::Vector4,
            Self::Matrix2x2(_) => ValueKind::Matrix2x2,
            Self::Matrix3x3(_) => ValueKind::Matrix3x3,
            Self::Matrix4x4(_) => ValueKind::Matrix4x4,
            Self::String(_) => ValueKind::String,
            Self::Pointer(_) => ValueKind::Pointer,
            Self::Resource(_) => ValueKind::Resource,
        }
    }

    /// Extracts the value as `T`, or `None` if the kinds differ.
    #[must_use]
    pub fn get<T: PropertyValue>(self) -> Option<T> {
        T::from_value(self)
    }
}

// Colors compare by components; `Color` itself makes no equality promise
// across color spaces.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Color(a), Self::Color(b)) => a.components == b.components,
            (Self::Vector2(a), Self::Vector2(b)) => a == b,
            (Self::Vector3(a), Self::Vector3(b)) => a == b,
            (Self::Vector4(a), Self::Vector4(b)) => a == b,
            (Self::Matrix2x2(a), Self::Matrix2x2(b)) => a == b,
            (Self::Matrix3x3(a), Self::Matrix3x3(b)) => a == b,
            (Self::Matrix4x4(a), Self::Matrix4x4(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Pointer(a), Self::Pointer(b)) => a == b,
            (Self::Resource(a), Self::Resource(b)) => a == b,
            _ => false,
        }
    }
}

/// A Rust type that carries the values of one [`ValueKind`].
///
/// Implemented for the thirteen value types listed in the [module docs](self).
/// The associated `Slot` is what a storage record keeps for the base and the
/// relative component; it equals `Self` for every kind except strings, whose
/// slot is `Option<String>` so that never-assigned storage holds no string.
///
/// The trait is sealed; the set of kinds is closed.
///
/// ```compile_fail
/// use understory_scene_property::{PropertyValue, Value, ValueKind};
///
/// #[derive(Clone)]
/// struct Meters(f32);
///
/// impl PropertyValue for Meters {
///     const KIND: ValueKind = ValueKind::Float;
///     type Slot = f32;
///     fn neutral_base() -> f32 { 0.0 }
///     fn neutral_relative() -> f32 { 0.0 }
///     fn into_slot(self) -> f32 { self.0 }
///     fn from_slot(slot: &f32) -> Option<Self> { Some(Self(*slot)) }
///     fn compose(base: &f32, relative: &f32) -> Option<Self> { Some(Self(base + relative)) }
///     fn slot_eq(a: &f32, b: &f32) -> bool { a == b }
///     fn into_value(self) -> Value { Value::Float(self.0) }
///     fn from_value(value: Value) -> Option<Self> { value.get::<f32>().map(Self) }
///     fn table(_: &understory_scene_property::StorageTable)
///         -> Option<&understory_scene_property::StorageMap<Self>> { None }
///     fn table_mut(_: &mut understory_scene_property::StorageTable)
///         -> Option<&mut understory_scene_property::StorageMap<Self>> { None }
///     fn empty_table() -> understory_scene_property::StorageTable {
///         understory_scene_property::StorageTable::new(ValueKind::Float)
///     }
/// }
/// ```
pub trait PropertyValue: sealed::Sealed + Clone + Sized + 'static {
    /// The kind this type represents.
    const KIND: ValueKind;

    /// Representation of one component inside a storage record.
    type Slot: Clone + fmt::Debug;

    /// Base value of freshly acquired storage.
    fn neutral_base() -> Self::Slot;

    /// Relative value of freshly acquired storage.
    fn neutral_relative() -> Self::Slot;

    /// Converts a value into its slot representation.
    fn into_slot(self) -> Self::Slot;

    /// Reads a single component back out of a slot.
    fn from_slot(slot: &Self::Slot) -> Option<Self>;

    /// Combines base and relative into the effective value.
    fn compose(base: &Self::Slot, relative: &Self::Slot) -> Option<Self>;

    /// Compares two slots for equality.
    fn slot_eq(a: &Self::Slot, b: &Self::Slot) -> bool;

    /// Wraps the value into the erased [`Value`].
    fn into_value(self) -> Value;

    /// Unwraps an erased [`Value`] of the same kind.
    fn from_value(value: Value) -> Option<Self>;

    /// Borrows this kind's map out of a storage table.
    #[doc(hidden)]
    fn table(table: &StorageTable) -> Option<&StorageMap<Self>>;

    /// Mutably borrows this kind's map out of a storage table.
    #[doc(hidden)]
    fn table_mut(table: &mut StorageTable) -> Option<&mut StorageMap<Self>>;

    /// Creates an empty table for this kind.
    #[doc(hidden)]
    fn empty_table() -> StorageTable;
}

mod sealed {
    #[allow(unreachable_pub, reason = "nameable only inside the crate")]
    pub trait Sealed {}
}

macro_rules! sealed {
    ($($ty:ty),*) => {
        $(impl sealed::Sealed for $ty {})*
    };
}

sealed!(
    f32,
    i32,
    bool,
    Color,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
    String,
    OpaqueHandle,
    ResourceHandle
);

macro_rules! kind_plumbing {
    ($variant:ident) => {
        const KIND: ValueKind = ValueKind::$variant;

        fn into_value(self) -> Value {
            Value::$variant(self)
        }

        fn from_value(value: Value) -> Option<Self> {
            match value {
                Value::$variant(v) => Some(v),
                _ => None,
            }
        }

        fn table(table: &StorageTable) -> Option<&StorageMap<Self>> {
            match table {
                StorageTable::$variant(map) => Some(map),
                _ => None,
            }
        }

        fn table_mut(table: &mut StorageTable) -> Option<&mut StorageMap<Self>> {
            match table {
                StorageTable::$variant(map) => Some(map),
                _ => None,
            }
        }

        fn empty_table() -> StorageTable {
            StorageTable::$variant(HashMap::new())
        }
    };
}

macro_rules! copy_slot {
    () => {
        type Slot = Self;

        #[inline]
        fn into_slot(self) -> Self {
            self
        }

        #[inline]
        fn from_slot(slot: &Self) -> Option<Self> {
            Some(*slot)
        }
    };
}

macro_rules! additive_value {
    ($ty:ty, $variant:ident, $zero:expr) => {
        impl PropertyValue for $ty {
            kind_plumbing!($variant);
            copy_slot!();

            fn neutral_base() -> Self {
                $zero
            }

            fn neutral_relative() -> Self {
                $zero
            }

            fn compose(base: &Self, relative: &Self) -> Option<Self> {
                Some(*base + *relative)
            }

            fn slot_eq(a: &Self, b: &Self) -> bool {
                a == b
            }
        }
    };
}

macro_rules! matrix_value {
    ($ty:ty, $variant:ident) => {
        impl PropertyValue for $ty {
            kind_plumbing!($variant);
            copy_slot!();

            fn neutral_base() -> Self {
                <$ty>::IDENTITY
            }

            fn neutral_relative() -> Self {
                <$ty>::IDENTITY
            }

            /// The relative transform pre-multiplies the authored one.
            fn compose(base: &Self, relative: &Self) -> Option<Self> {
                Some(*relative * *base)
            }

            fn slot_eq(a: &Self, b: &Self) -> bool {
                a == b
            }
        }
    };
}

macro_rules! base_only_value {
    ($ty:ty, $variant:ident) => {
        impl PropertyValue for $ty {
            kind_plumbing!($variant);
            copy_slot!();

            fn neutral_base() -> Self {
                <$ty>::NULL
            }

            fn neutral_relative() -> Self {
                <$ty>::NULL
            }

            fn compose(base: &Self, _relative: &Self) -> Option<Self> {
                Some(*base)
            }

            fn slot_eq(a: &Self, b: &Self) -> bool {
                a == b
            }
        }
    };
}

additive_value!(f32, Float, 0.0);
additive_value!(Vec2, Vector2, Vec2::ZERO);
additive_value!(Vec3, Vector3, Vec3::ZERO);
additive_value!(Vec4, Vector4, Vec4::ZERO);
matrix_value!(Mat2, Matrix2x2);
matrix_value!(Mat3, Matrix3x3);
matrix_value!(Mat4, Matrix4x4);
base_only_value!(OpaqueHandle, Pointer);
base_only_value!(ResourceHandle, Resource);

impl PropertyValue for i32 {
    kind_plumbing!(Int);
    copy_slot!();

    fn neutral_base() -> Self {
        0
    }

    fn neutral_relative() -> Self {
        0
    }

    fn compose(base: &Self, relative: &Self) -> Option<Self> {
        Some(base.wrapping_add(*relative))
    }

    fn slot_eq(a: &Self, b: &Self) -> bool {
        a == b
    }
}

impl PropertyValue for bool {
    kind_plumbing!(Bool);
    copy_slot!();

    fn neutral_base() -> Self {
        false
    }

    fn neutral_relative() -> Self {
        false
    }

    /// Booleans add like integers and the sum is read back as truthiness.
    fn compose(base: &Self, relative: &Self) -> Option<Self> {
        Some(u8::from(*base) + u8::from(*relative) != 0)
    }

    fn slot_eq(a: &Self, b: &Self) -> bool {
        a == b
    }
}

impl PropertyValue for Color {
    kind_plumbing!(Color);
    copy_slot!();

    fn neutral_base() -> Self {
        Self::TRANSPARENT
    }

    fn neutral_relative() -> Self {
        Self::TRANSPARENT
    }

    fn compose(base: &Self, relative: &Self) -> Option<Self> {
        let [br, bg, bb, ba] = base.components;
        let [rr, rg, rb, ra] = relative.components;
        Some(Self::new([br + rr, bg + rg, bb + rb, ba + ra]))
    }

    fn slot_eq(a: &Self, b: &Self) -> bool {
        a.components == b.components
    }
}

impl PropertyValue for String {
    kind_plumbing!(String);

    type Slot = Option<Self>;

    fn neutral_base() -> Option<Self> {
        None
    }

    fn neutral_relative() -> Option<Self> {
        None
    }

    fn into_slot(self) -> Option<Self> {
        Some(self)
    }

    fn from_slot(slot: &Option<Self>) -> Option<Self> {
        slot.clone()
    }

    fn compose(base: &Option<Self>, _relative: &Option<Self>) -> Option<Self> {
        base.clone()
    }

    fn slot_eq(a: &Option<Self>, b: &Option<Self>) -> bool {
        a == b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn float_and_int_add() {
        assert_eq!(f32::compose(&5.0, &2.0), Some(7.0));
        assert_eq!(i32::compose(&5, &-7), Some(-2));
        assert_eq!(i32::compose(&i32::MAX, &1), Some(i32::MIN));
    }

    #[test]
    fn bool_sums_then_reads_truthiness() {
        assert_eq!(bool::compose(&false, &false), Some(false));
        assert_eq!(bool::compose(&false, &true), Some(true));
        assert_eq!(bool::compose(&true, &false), Some(true));
        // 1 + 1 = 2 is still truthy.
        assert_eq!(bool::compose(&true, &true), Some(true));
    }

    #[test]
    fn color_adds_componentwise() {
        let base = Color::new([0.25, 0.5, 0.0, 1.0]);
        let relative = Color::new([0.25, -0.5, 0.125, 0.0]);
        let sum = Color::compose(&base, &relative).unwrap();
        assert_eq!(sum.components, [0.5, 0.0, 0.125, 1.0]);
    }

    #[test]
    fn vectors_add() {
        assert_eq!(
            Vec3::compose(&Vec3::new(1.0, 2.0, 3.0), &Vec3::splat(1.0)),
            Some(Vec3::new(2.0, 3.0, 4.0))
        );
    }

    #[test]
    fn matrix_relative_premultiplies() {
        let base = Mat2::from_cols_array(&[1.0, 0.0, 1.0, 1.0]);
        let relative = Mat2::from_diagonal(Vec2::new(2.0, 1.0));
        assert_ne!(relative * base, base * relative);
        assert_eq!(Mat2::compose(&base, &relative), Some(relative * base));
    }

    #[test]
    fn neutral_values_reproduce_base() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(Mat4::compose(&m, &Mat4::neutral_relative()), Some(m));
        assert_eq!(f32::compose(&3.5, &f32::neutral_relative()), Some(3.5));
        assert_eq!(String::neutral_base(), None);
        assert!(OpaqueHandle::neutral_base().is_null());
    }

    #[test]
    fn string_ignores_relative() {
        let base = Some("base".to_string());
        let relative = Some("relative".to_string());
        assert_eq!(String::compose(&base, &relative).as_deref(), Some("base"));
        assert_eq!(String::compose(&None, &relative), None);
    }

    #[test]
    fn handles_ignore_relative() {
        let base = ResourceHandle::new(7);
        assert_eq!(
            ResourceHandle::compose(&base, &ResourceHandle::new(9)),
            Some(base)
        );
        assert!(ResourceHandle::default().is_null());
    }

    #[test]
    fn value_kind_round_trip() {
        for kind in ValueKind::ALL {
            if let Some(neutral) = kind.neutral() {
                assert_eq!(neutral.kind(), kind);
            }
        }
        assert_eq!(Value::Float(1.0).get::<f32>(), Some(1.0));
        assert_eq!(Value::Float(1.0).get::<i32>(), None);
        assert_eq!(ValueKind::Matrix3x3.to_string(), "matrix3x3");
    }

    #[test]
    fn implemented_kinds_match_all_kinds() {
        let kinds = [
            f32::KIND,
            i32::KIND,
            bool::KIND,
            Color::KIND,
            Vec2::KIND,
            Vec3::KIND,
            Vec4::KIND,
            Mat2::KIND,
            Mat3::KIND,
            Mat4::KIND,
            String::KIND,
            OpaqueHandle::KIND,
            ResourceHandle::KIND,
        ];
        assert_eq!(kinds, ValueKind::ALL);
        for kind in ValueKind::ALL {
            assert_eq!(StorageTable::new(kind).kind(), kind, "{kind}");
        }
    }

    #[test]
    fn value_equality_compares_color_components() {
        let a = Value::Color(Color::new([0.1, 0.2, 0.3, 1.0]));
        let b = Value::Color(Color::new([0.1, 0.2, 0.3, 1.0]));
        assert_eq!(a, b);
        assert_ne!(a, Value::Float(0.1));
    }
}
