// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Priority resolution across an object and its attached property groups.

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::object::{ObjectId, PropertyGroup};
use crate::storage::{Priority, StorageTable};

/// Inline capacity of an object's group attachment list.
pub(crate) const INLINE_GROUPS: usize = 4;

/// Ordered group attachments per object.
pub(crate) type Attachments = HashMap<ObjectId, SmallVec<[PropertyGroup; INLINE_GROUPS]>>;

/// A storage record that won resolution: whose record it is and at what priority.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Candidate {
    /// The object or group that owns the record.
    pub(crate) owner: ObjectId,
    pub(crate) priority: Priority,
}

impl Candidate {
    /// Keeps `current` unless `self` has strictly greater priority.
    #[inline]
    pub(crate) fn beats(self, current: Option<Self>) -> bool {
        current.is_none_or(|current| self.priority > current.priority)
    }
}

/// Finds the highest-priority record of one type among `object` and its groups.
///
/// Groups are visited most recently attached first and only replace the
/// current candidate on strictly greater priority, so among equal priorities
/// the object's own record wins, then the last attached group. Groups of
/// groups are not consulted.
pub(crate) fn find_with_groups(
    table: &StorageTable,
    attachments: &Attachments,
    object: ObjectId,
) -> Option<Candidate> {
    let mut candidate = table
        .priority(object)
        .map(|priority| Candidate { owner: object, priority });

    if let Some(groups) = attachments.get(&object) {
        for group in groups.iter().rev() {
            let owner = group.object();
            let Some(priority) = table.priority(owner) else {
                continue;
            };
            let found = Candidate { owner, priority };
            if found.beats(candidate) {
                candidate = Some(found);
            }
        }
    }

    candidate
}
