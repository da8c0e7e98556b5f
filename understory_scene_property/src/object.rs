// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Object identities: scene objects, scene nodes, and property groups.

use alloc::vec::Vec;
use core::fmt;

/// Identifier for an object that can carry property values.
///
/// Scene objects, scene-graph nodes, render passes, and property groups are all
/// identified by an `ObjectId` handed out by
/// [`PropertyManager::create_object`](crate::PropertyManager::create_object).
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On create, a fresh slot is allocated with generation `1`.
/// - On destroy, the slot is freed; any existing `ObjectId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `ObjectId`.
///
/// ### Liveness
///
/// Storage is keyed by the full `(slot, generation)` pair, so a stale `ObjectId`
/// never finds the values of whichever object reuses its slot. Every lookup
/// through a stale identity is an ordinary not-found.
///
/// ### Notes
///
/// - The generation increments on slot reuse and never decreases.
/// - A slot whose generation reaches `u32::MAX` is retired on destroy and never reused.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(u32, u32);

impl ObjectId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Returns the generation this identity was issued with.
    #[must_use]
    #[inline]
    pub const fn generation(self) -> u32 {
        self.1
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({}v{})", self.0, self.1)
    }
}

/// A shared bag of property values that can be attached to many objects.
///
/// A group is itself an object: values are written into it with the ordinary
/// setters through [`PropertyGroup::object`]. Attaching a group to an object
/// (see [`PropertyManager::add_property_group`](crate::PropertyManager::add_property_group))
/// makes its values candidates during resolution for that object. The manager
/// only records the attachment relation; destroying the group is up to whoever
/// created it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyGroup(ObjectId);

impl PropertyGroup {
    /// Wraps an existing object identity as a property group.
    #[must_use]
    #[inline]
    pub const fn from_object(object: ObjectId) -> Self {
        Self(object)
    }

    /// Returns the object identity that holds this group's values.
    #[must_use]
    #[inline]
    pub const fn object(self) -> ObjectId {
        self.0
    }
}

impl From<PropertyGroup> for ObjectId {
    #[inline]
    fn from(group: PropertyGroup) -> Self {
        group.0
    }
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    alive: bool,
}

/// Slot allocator for [`ObjectId`]s.
#[derive(Clone, Debug, Default)]
pub(crate) struct ObjectArena {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    live: usize,
}

impl ObjectArena {
    pub(crate) fn create(&mut self) -> ObjectId {
        self.live += 1;
        if let Some(idx) = self.free_list.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation += 1;
            slot.alive = true;
            return ObjectId::new(idx, slot.generation);
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "more than u32::MAX live objects is not supported"
        )]
        let idx = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 1,
            alive: true,
        });
        ObjectId::new(idx, 1)
    }

    /// Frees the slot of `id`. Returns `false` for stale or unknown identities.
    pub(crate) fn destroy(&mut self, id: ObjectId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let slot = &mut self.slots[id.idx()];
        slot.alive = false;
        if slot.generation < u32::MAX {
            self.free_list.push(id.0);
        }
        self.live -= 1;
        true
    }

    pub(crate) fn is_alive(&self, id: ObjectId) -> bool {
        self.slots
            .get(id.idx())
            .is_some_and(|slot| slot.alive && slot.generation == id.1)
    }

    pub(crate) fn len(&self) -> usize {
        self.live
    }
}
