// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for fallible property manager operations.
//!
//! A missing value is never an error; lookups return `Option` or `bool`.
//! [`PropertyError`] covers misuse that can be detected at runtime.

use alloc::boxed::Box;

use crate::id::PropertyTypeId;
use crate::object::ObjectId;
use crate::value::ValueKind;

/// Errors returned by [`PropertyManager`](crate::PropertyManager) operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PropertyError {
    /// A live property type already uses this name.
    #[error("property type name `{0}` is already defined")]
    DuplicateName(Box<str>),
    /// Every property type slot is in use.
    #[error("too many property types defined")]
    TooManyTypes,
    /// The handle does not refer to a live property type.
    #[error("property type {0} is not defined or has been deleted")]
    UnknownType(PropertyTypeId),
    /// The object identity is stale or was never issued by this manager.
    #[error("object {0:?} is not alive")]
    StaleObject(ObjectId),
    /// An erased value does not match the kind of the property type.
    #[error("property type `{name}` stores {expected} values, got {found}")]
    KindMismatch {
        /// Name of the property type.
        name: Box<str>,
        /// Kind the property type stores.
        expected: ValueKind,
        /// Kind of the value that was passed.
        found: ValueKind,
    },
    /// The property type still has stored values.
    #[error("property type `{name}` still has {count} stored values")]
    TypeInUse {
        /// Name of the property type.
        name: Box<str>,
        /// Number of records left in its storage table.
        count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages_name_the_type() {
        let err = PropertyError::KindMismatch {
            name: "Opacity".into(),
            expected: ValueKind::Float,
            found: ValueKind::Bool,
        };
        assert_eq!(
            err.to_string(),
            "property type `Opacity` stores float values, got bool"
        );

        let err = PropertyError::TypeInUse {
            name: "Visible".into(),
            count: 2,
        };
        assert_eq!(
            err.to_string(),
            "property type `Visible` still has 2 stored values"
        );
    }
}
