// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property type metadata definitions.
//!
//! This module provides [`PropertyMetadata`] for the authored configuration of
//! a property type and [`PropertyMetadataBuilder`] for ergonomic construction.

use crate::value::PropertyValue;

/// Authored configuration of a property type.
///
/// The default value is what
/// [`PropertyManager::get_or_default`](crate::PropertyManager::get_or_default)
/// falls back to when no storage is found. It is not the value freshly acquired
/// storage starts with; that is the kind's neutral value.
///
/// # Example
///
/// ```rust
/// use understory_scene_property::PropertyMetadataBuilder;
///
/// let metadata = PropertyMetadataBuilder::new(true)
///     .inherits(true)
///     .build();
///
/// assert_eq!(metadata.default_value(), &true);
/// assert!(metadata.inherits());
/// ```
#[derive(Clone, Debug)]
pub struct PropertyMetadata<T: PropertyValue> {
    default_value: T,
    inherits: bool,
}

impl<T: PropertyValue> PropertyMetadata<T> {
    /// Creates new metadata with the given default value that does not inherit.
    #[must_use]
    pub fn new(default_value: T) -> Self {
        Self {
            default_value,
            inherits: false,
        }
    }

    /// Returns the default value.
    #[must_use]
    #[inline]
    pub fn default_value(&self) -> &T {
        &self.default_value
    }

    /// Returns whether scene-graph nodes inherit this property from ancestors.
    #[must_use]
    #[inline]
    pub fn inherits(&self) -> bool {
        self.inherits
    }

    pub(crate) fn into_parts(self) -> (T, bool) {
        (self.default_value, self.inherits)
    }
}

/// Builder for [`PropertyMetadata`].
#[derive(Debug)]
pub struct PropertyMetadataBuilder<T: PropertyValue> {
    metadata: PropertyMetadata<T>,
}

impl<T: PropertyValue> PropertyMetadataBuilder<T> {
    /// Starts a builder with the given default value.
    #[must_use]
    pub fn new(default_value: T) -> Self {
        Self {
            metadata: PropertyMetadata::new(default_value),
        }
    }

    /// Sets whether the property is inherited along the scene graph.
    #[must_use]
    pub fn inherits(mut self, inherits: bool) -> Self {
        self.metadata.inherits = inherits;
        self
    }

    /// Finishes the metadata.
    #[must_use]
    pub fn build(self) -> PropertyMetadata<T> {
        self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn metadata_defaults() {
        let metadata = PropertyMetadata::new(Vec2::ONE);
        assert_eq!(metadata.default_value(), &Vec2::ONE);
        assert!(!metadata.inherits());
    }

    #[test]
    fn builder_sets_inherits() {
        let metadata = PropertyMetadataBuilder::new(12.0_f32).inherits(true).build();
        assert!(metadata.inherits());
        assert_eq!(metadata.into_parts(), (12.0, true));
    }
}
