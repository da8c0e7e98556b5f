// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transient override scopes.
//!
//! A [`PropertyQuery`] layers a stack of objects ("current pass", "current
//! material", "current scene", ...) and answers property reads from whichever
//! entry supplies the highest-priority record. Nothing is written to the
//! manager.

use smallvec::SmallVec;

use crate::id::{PropertyType, PropertyTypeId};
use crate::inherit::{ParentLookup, find_with_inheritance};
use crate::manager::PropertyManager;
use crate::object::ObjectId;
use crate::resolve::{Candidate, find_with_groups};
use crate::value::{PropertyValue, Value};

/// Inline capacity of the query stack.
const INLINE_DEPTH: usize = 8;

/// One entry of a [`PropertyQuery`] stack.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum QueryEntry {
    /// An object resolved with its groups only.
    Object(ObjectId),
    /// A scene-graph node, resolved with groups and inheritance.
    Node(ObjectId),
}

impl QueryEntry {
    /// Returns the object identity of the entry.
    #[must_use]
    pub fn object(self) -> ObjectId {
        match self {
            Self::Object(id) | Self::Node(id) => id,
        }
    }
}

/// A stack of objects whose property values override each other by priority.
///
/// Entries are searched from the most recently pushed to the oldest; a later
/// (older) entry only wins with strictly greater priority. When no entry has a
/// record, [`get`](Self::get) returns the type's default.
///
/// # Example
///
/// ```rust
/// use understory_scene_property::{
///     NoParents, Priority, PropertyManager, PropertyMetadata, PropertyQuery,
/// };
///
/// let mut manager = PropertyManager::new();
/// let blend = manager.define_type("BlendIntensity", PropertyMetadata::new(1.0_f32)).unwrap();
///
/// let scene = manager.create_object();
/// let pass = manager.create_object();
/// manager.set(scene, blend, 0.25).unwrap();
///
/// let mut query = PropertyQuery::new(&manager, &NoParents);
/// query.push_object(scene);
/// assert_eq!(query.get(blend), 0.25);
///
/// query.push_object(pass);
/// assert_eq!(query.get(blend), 0.25);
/// query.pop_object();
/// query.pop_object();
/// assert_eq!(query.get(blend), 1.0);
/// ```
#[derive(Debug)]
pub struct PropertyQuery<'a, G: ?Sized> {
    manager: &'a PropertyManager,
    graph: &'a G,
    stack: SmallVec<[QueryEntry; INLINE_DEPTH]>,
}

impl<'a, G: ParentLookup + ?Sized> PropertyQuery<'a, G> {
    /// Creates an empty query over `manager`, using `graph` for node entries.
    #[must_use]
    pub fn new(manager: &'a PropertyManager, graph: &'a G) -> Self {
        Self {
            manager,
            graph,
            stack: SmallVec::new(),
        }
    }

    /// Returns the manager the query reads from.
    #[must_use]
    #[inline]
    pub fn manager(&self) -> &'a PropertyManager {
        self.manager
    }

    /// Pushes an object that is resolved with its groups only.
    pub fn push_object(&mut self, object: ObjectId) {
        self.stack.push(QueryEntry::Object(object));
    }

    /// Pushes a scene-graph node that is also resolved through inheritance.
    pub fn push_object_node(&mut self, node: ObjectId) {
        self.stack.push(QueryEntry::Node(node));
    }

    /// Pops the most recently pushed entry.
    pub fn pop_object(&mut self) -> Option<QueryEntry> {
        let entry = self.stack.pop();
        if entry.is_none() {
            log::warn!("pop on an empty property query");
        }
        entry
    }

    /// Pushes `entry`, runs `f`, and pops it again.
    pub fn scoped<R>(&mut self, entry: QueryEntry, f: impl FnOnce(&mut Self) -> R) -> R {
        let depth = self.stack.len();
        self.stack.push(entry);
        let result = f(self);
        debug_assert_eq!(self.stack.len(), depth + 1, "unbalanced push/pop in scope");
        self.stack.truncate(depth);
        result
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Returns `true` if nothing is pushed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Returns the entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[QueryEntry] {
        &self.stack
    }

    fn resolve(&self, ty: PropertyTypeId) -> Option<Candidate> {
        let storage = self.manager.storages.get(&ty)?;
        let inherits = self
            .manager
            .types
            .get(ty)
            .is_some_and(|info| info.inherits());
        let groups = &self.manager.groups;

        let mut best: Option<Candidate> = None;
        for entry in self.stack.iter().rev() {
            let found = match *entry {
                QueryEntry::Object(object) => find_with_groups(storage.table(), groups, object),
                QueryEntry::Node(node) => {
                    find_with_inheritance(storage.table(), groups, inherits, self.graph, node)
                        .map(|found| found.candidate)
                }
            };
            if let Some(candidate) = found
                && candidate.beats(best)
            {
                best = Some(candidate);
            }
        }
        best
    }

    /// Returns the object or group whose record supplies `ty`.
    #[must_use]
    pub fn find_source(&self, ty: impl Into<PropertyTypeId>) -> Option<ObjectId> {
        self.resolve(ty.into()).map(|candidate| candidate.owner)
    }

    /// Returns the composed value of `ty`, or `None` if no entry has a record.
    #[must_use]
    pub fn find<T: PropertyValue>(&self, ty: PropertyType<T>) -> Option<T> {
        let candidate = self.resolve(ty.id())?;
        self.manager
            .storages
            .get(&ty.id())?
            .get::<T>(candidate.owner)?
            .value()
    }

    /// Returns the composed value of `ty`, or the type's default.
    ///
    /// # Panics
    ///
    /// Panics if `ty` has been deleted.
    #[must_use]
    pub fn get<T: PropertyValue>(&self, ty: PropertyType<T>) -> T {
        self.find(ty)
            .unwrap_or_else(|| self.manager.default_value(ty))
    }

    /// Returns the composed value of `ty` as an erased value, falling back to the default.
    ///
    /// Returns `None` only if `ty` has been deleted.
    #[must_use]
    pub fn get_value(&self, ty: impl Into<PropertyTypeId>) -> Option<Value> {
        let ty = ty.into();
        let found = self.resolve(ty).and_then(|candidate| {
            self.manager
                .storages
                .get(&ty)?
                .table()
                .value(candidate.owner)
        });
        found.or_else(|| {
            self.manager
                .type_info(ty)
                .map(|info| info.default_value().clone())
        })
    }
}
