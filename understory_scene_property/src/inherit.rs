// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inheritance along the scene graph.
//!
//! The manager does not know the scene graph. Node lookups take a
//! [`ParentLookup`] that answers "what is the parent of this node", and climb it
//! for property types that inherit.

use crate::id::{PropertyType, PropertyTypeId};
use crate::manager::PropertyManager;
use crate::object::ObjectId;
use crate::resolve::{Attachments, Candidate, find_with_groups};
use crate::storage::{PropertyStorage, StorageTable};
use crate::value::PropertyValue;

/// The parent relation of a scene graph.
///
/// Implemented for any `Fn(ObjectId) -> Option<ObjectId>`, so a closure over
/// the caller's own node storage is enough:
///
/// ```rust
/// use hashbrown::HashMap;
/// use understory_scene_property::{ObjectId, ParentLookup, PropertyManager};
///
/// let mut manager = PropertyManager::new();
/// let root = manager.create_object();
/// let child = manager.create_object();
///
/// let parents: HashMap<ObjectId, ObjectId> = [(child, root)].into_iter().collect();
/// let graph = |node: ObjectId| parents.get(&node).copied();
///
/// assert_eq!(graph.parent(child), Some(root));
/// assert_eq!(graph.parent(root), None);
/// ```
///
/// The relation must be acyclic; walks climb until a node has no parent.
pub trait ParentLookup {
    /// Returns the parent of `node`, or `None` at the root.
    fn parent(&self, node: ObjectId) -> Option<ObjectId>;
}

impl<F> ParentLookup for F
where
    F: Fn(ObjectId) -> Option<ObjectId>,
{
    #[inline]
    fn parent(&self, node: ObjectId) -> Option<ObjectId> {
        self(node)
    }
}

/// A scene graph in which every node is a root.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoParents;

impl ParentLookup for NoParents {
    #[inline]
    fn parent(&self, _node: ObjectId) -> Option<ObjectId> {
        None
    }
}

/// Result of an inheritance walk: the winning record and the node it was found at.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Found {
    pub(crate) candidate: Candidate,
    pub(crate) node: ObjectId,
}

/// Climbs from `node` to the root, resolving groups at each level.
///
/// A level only replaces the best record so far on strictly greater priority,
/// so the closest node wins ties. Types that do not inherit stop after `node`.
pub(crate) fn find_with_inheritance<G: ParentLookup + ?Sized>(
    table: &StorageTable,
    attachments: &Attachments,
    inherits: bool,
    graph: &G,
    node: ObjectId,
) -> Option<Found> {
    let mut best: Option<Found> = None;
    let mut current = Some(node);

    while let Some(level) = current {
        if let Some(candidate) = find_with_groups(table, attachments, level)
            && candidate.beats(best.map(|found| found.candidate))
        {
            best = Some(Found {
                candidate,
                node: level,
            });
        }
        if !inherits {
            break;
        }
        current = graph.parent(level);
    }

    best
}

// =============================================================================
// Node accessors
// =============================================================================

impl PropertyManager {
    pub(crate) fn find_node_source<G: ParentLookup + ?Sized>(
        &self,
        graph: &G,
        node: ObjectId,
        ty: PropertyTypeId,
    ) -> Option<Found> {
        let storage = self.storages.get(&ty)?;
        let inherits = self.types.get(ty).is_some_and(|info| info.inherits());
        find_with_inheritance(storage.table(), &self.groups, inherits, graph, node)
    }

    /// Returns the node whose record supplies `node`'s value of `ty`.
    ///
    /// This is `node` itself when the value comes from its own record or one of
    /// its groups, or the ancestor it is inherited from. Useful for tooling that
    /// explains where a value came from.
    #[must_use]
    pub fn find_highest_priority_source<G: ParentLookup + ?Sized>(
        &self,
        graph: &G,
        node: ObjectId,
        ty: impl Into<PropertyTypeId>,
    ) -> Option<ObjectId> {
        self.find_node_source(graph, node, ty.into())
            .map(|found| found.node)
    }

    /// Returns `true` if `node` resolves a value of `ty`, directly, through a
    /// group, or by inheritance.
    #[must_use]
    pub fn node_has_property<G: ParentLookup + ?Sized>(
        &self,
        graph: &G,
        node: ObjectId,
        ty: impl Into<PropertyTypeId>,
    ) -> bool {
        self.find_node_source(graph, node, ty.into()).is_some()
    }

    /// Returns the record `node` resolves for `ty` and the node it was found at.
    #[must_use]
    pub fn find_node_storage<T: PropertyValue, G: ParentLookup + ?Sized>(
        &self,
        graph: &G,
        node: ObjectId,
        ty: PropertyType<T>,
    ) -> Option<(&PropertyStorage<T>, ObjectId)> {
        let found = self.find_node_source(graph, node, ty.id())?;
        let storage = self.storages.get(&ty.id())?.get(found.candidate.owner)?;
        Some((storage, found.node))
    }

    /// Returns the composed value of `ty` for a scene-graph node.
    ///
    /// Like [`get`](Self::get), but climbs to ancestors for inheriting types.
    ///
    /// # Example
    ///
    /// ```rust
    /// use understory_scene_property::{ObjectId, PropertyManager, PropertyMetadataBuilder};
    ///
    /// let mut manager = PropertyManager::new();
    /// let opacity = manager
    ///     .define_type("Opacity", PropertyMetadataBuilder::new(1.0_f32).inherits(true).build())
    ///     .unwrap();
    ///
    /// let root = manager.create_object();
    /// let child = manager.create_object();
    /// let graph = |node: ObjectId| (node == child).then_some(root);
    ///
    /// manager.set(root, opacity, 0.5).unwrap();
    /// assert_eq!(manager.get_node(&graph, child, opacity), Some(0.5));
    /// ```
    #[must_use]
    pub fn get_node<T: PropertyValue, G: ParentLookup + ?Sized>(
        &self,
        graph: &G,
        node: ObjectId,
        ty: PropertyType<T>,
    ) -> Option<T> {
        self.find_node_storage(graph, node, ty)?.0.value()
    }

    /// Returns the base value of `ty` for a scene-graph node.
    #[must_use]
    pub fn get_node_base<T: PropertyValue, G: ParentLookup + ?Sized>(
        &self,
        graph: &G,
        node: ObjectId,
        ty: PropertyType<T>,
    ) -> Option<T> {
        self.find_node_storage(graph, node, ty)?.0.base()
    }

    /// Returns the relative value of `ty` for a scene-graph node.
    #[must_use]
    pub fn get_node_relative<T: PropertyValue, G: ParentLookup + ?Sized>(
        &self,
        graph: &G,
        node: ObjectId,
        ty: PropertyType<T>,
    ) -> Option<T> {
        self.find_node_storage(graph, node, ty)?.0.relative()
    }

    /// Returns the composed value of `ty` for a node, or the type's default.
    ///
    /// # Panics
    ///
    /// Panics if `ty` has been deleted.
    #[must_use]
    pub fn get_node_or_default<T: PropertyValue, G: ParentLookup + ?Sized>(
        &self,
        graph: &G,
        node: ObjectId,
        ty: PropertyType<T>,
    ) -> T {
        self.get_node(graph, node, ty)
            .unwrap_or_else(|| self.default_value(ty))
    }
}
