// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Scene Property: property storage for scene graphs.
//!
//! This crate answers "what is the value of property X on object Y" for a
//! retained scene: nodes, render passes, materials, and anything else that
//! carries named, typed properties.
//!
//! ## Core Concepts
//!
//! ### Property types
//!
//! A property type has a name, a value kind, a default, and an inheritance
//! flag. [`PropertyManager::define_type`] creates one and returns a typed
//! handle, [`PropertyType<T>`]. Handles carry a generation and expire when the
//! type is deleted.
//!
//! ### Records
//!
//! Each registered type owns one storage table mapping objects to a
//! [`PropertyStorage<T>`]: a base value, a relative value, a [`Priority`], and
//! [`PropertyFlags`]. The value read back is the base composed with the
//! relative (sum for scalars, vectors and colors; `relative * base` for
//! matrices). Handles and strings have no relative part.
//!
//! ### Resolution
//!
//! - **Groups** - an object may have [`PropertyGroup`]s attached. A group
//!   record only overrides the object's own with strictly greater priority.
//! - **Inheritance** - [`PropertyManager::get_node`] climbs to ancestors for
//!   types defined as inheriting. The scene graph is supplied by the caller
//!   through [`ParentLookup`].
//! - **Queries** - a [`PropertyQuery`] stacks objects (pass, material, scene)
//!   and reads from whichever supplies the highest-priority record.
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_scene_property::{
//!     ObjectId, Priority, PropertyManager, PropertyMetadataBuilder,
//! };
//!
//! let mut manager = PropertyManager::new();
//! let visible = manager
//!     .define_type("Visible", PropertyMetadataBuilder::new(true).inherits(true).build())
//!     .unwrap();
//!
//! let parent = manager.create_object();
//! let node = manager.create_object();
//! let graph = |n: ObjectId| (n == node).then_some(parent);
//!
//! // Inherited from the parent.
//! manager.set(parent, visible, false).unwrap();
//! assert_eq!(manager.get_node(&graph, node, visible), Some(false));
//!
//! // A high-priority group on the node wins over everything above it.
//! let group = manager.create_group();
//! manager.set(group.object(), visible, true).unwrap();
//! manager.set_priority(group.object(), visible, Priority::High);
//! manager.add_property_group(node, group).unwrap();
//! assert_eq!(manager.get_node(&graph, node, visible), Some(true));
//! ```
//!
//! ## Value kinds
//!
//! | Kind | Rust type | Neutral |
//! |------|-----------|---------|
//! | Float | `f32` | `0.0` |
//! | Int | `i32` | `0` |
//! | Bool | `bool` | `false` |
//! | Color | [`peniko::Color`] | transparent |
//! | Vector2/3/4 | [`glam::Vec2`] .. [`glam::Vec4`] | zero |
//! | Matrix2x2/3x3/4x4 | [`glam::Mat2`] .. [`glam::Mat4`] | identity |
//! | String | `String` | none |
//! | Pointer | [`OpaqueHandle`] | null |
//! | Resource | [`ResourceHandle`] | null |
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. The `std` feature (on by default)
//! only forwards to `glam` and `peniko`; enable `libm` instead for targets
//! without `std`.

#![no_std]

extern crate alloc;

mod catalog;
mod error;
mod id;
mod inherit;
mod manager;
mod metadata;
mod object;
mod query;
mod registry;
mod resolve;
mod storage;
mod value;

pub use catalog::{CatalogEntry, PropertyCatalog};
pub use error::PropertyError;
pub use id::{PropertyType, PropertyTypeId};
pub use inherit::{NoParents, ParentLookup};
pub use manager::PropertyManager;
pub use metadata::{PropertyMetadata, PropertyMetadataBuilder};
pub use object::{ObjectId, PropertyGroup};
pub use query::{PropertyQuery, QueryEntry};
pub use registry::{PropertyTypeInfo, PropertyTypeRegistry};
pub use storage::{
    Priority, PropertyFlags, PropertyStorage, PropertyTypeStorage, StorageMap, StorageTable,
};
pub use value::{OpaqueHandle, PropertyValue, ResourceHandle, Value, ValueKind};

pub use glam;
pub use peniko;
