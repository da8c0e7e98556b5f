// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property catalogs.
//!
//! A [`PropertyCatalog`] lists the property types a scene starts with. It is a
//! plain value: build it once, then hand it to
//! [`PropertyManager::from_catalog`] for every scene that needs those types.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::error::PropertyError;
use crate::id::PropertyTypeId;
use crate::manager::PropertyManager;
use crate::value::{PropertyValue, Value, ValueKind};

/// One catalog entry: a property type to define and register.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogEntry {
    name: Box<str>,
    default_value: Value,
    inherits: bool,
}

impl CatalogEntry {
    /// Returns the type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value kind.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.default_value.kind()
    }

    /// Returns the authored default.
    #[must_use]
    pub fn default_value(&self) -> &Value {
        &self.default_value
    }

    /// Returns whether the type inherits along the scene graph.
    #[must_use]
    pub fn inherits(&self) -> bool {
        self.inherits
    }
}

/// An ordered list of property types to define when a manager is created.
///
/// # Example
///
/// ```rust
/// use understory_scene_property::{PropertyCatalog, PropertyManager};
///
/// let catalog = PropertyCatalog::new()
///     .with("Visible", true, true)
///     .with("LayoutWidth", 0.0_f32, false);
///
/// let manager = PropertyManager::from_catalog(&catalog).unwrap();
/// let visible = manager.find_typed::<bool>("Visible").unwrap();
/// assert!(manager.type_info(visible).unwrap().inherits());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyCatalog {
    entries: Vec<CatalogEntry>,
}

impl PropertyCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry with a typed default.
    #[must_use]
    pub fn with<T: PropertyValue>(self, name: &str, default_value: T, inherits: bool) -> Self {
        self.with_value(name, default_value.into_value(), inherits)
    }

    /// Adds an entry with an erased default.
    #[must_use]
    pub fn with_value(mut self, name: &str, default_value: Value, inherits: bool) -> Self {
        self.push(name, default_value, inherits);
        self
    }

    /// Adds an entry in place.
    pub fn push(&mut self, name: &str, default_value: Value, inherits: bool) {
        self.entries.push(CatalogEntry {
            name: name.into(),
            default_value,
            inherits,
        });
    }

    /// Returns the entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the catalog has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Defines and registers every entry in `manager`.
    ///
    /// Returns the type IDs in entry order. Stops at the first error; entries
    /// before it stay defined.
    ///
    /// # Errors
    ///
    /// [`PropertyError::DuplicateName`] if an entry's name is already defined.
    pub fn install(
        &self,
        manager: &mut PropertyManager,
    ) -> Result<Vec<PropertyTypeId>, PropertyError> {
        let ids = self
            .entries
            .iter()
            .map(|entry| {
                let id = manager.define_type_value(
                    entry.name(),
                    entry.default_value.clone(),
                    entry.inherits,
                )?;
                manager.register_type(id)?;
                Ok(id)
            })
            .collect::<Result<Vec<_>, PropertyError>>()?;
        log::debug!("installed {} catalog property types", ids.len());
        Ok(ids)
    }
}

impl PropertyManager {
    /// Creates a manager with every type of `catalog` defined and registered.
    ///
    /// # Errors
    ///
    /// [`PropertyError::DuplicateName`] if the catalog names a type twice.
    pub fn from_catalog(catalog: &PropertyCatalog) -> Result<Self, PropertyError> {
        let mut manager = Self::new();
        catalog.install(&mut manager)?;
        Ok(manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;
    use peniko::Color;

    #[test]
    fn from_catalog_registers_everything() {
        let catalog = PropertyCatalog::new()
            .with("Visible", true, true)
            .with("DiffuseColor", Color::WHITE, false)
            .with("Transform", Mat4::IDENTITY, false);
        assert_eq!(catalog.len(), 3);

        let manager = PropertyManager::from_catalog(&catalog).unwrap();
        for entry in catalog.entries() {
            let id = manager.find_type_by_name(entry.name()).unwrap();
            let info = manager.type_info(id).unwrap();
            assert_eq!(info.kind(), entry.kind());
            assert_eq!(info.inherits(), entry.inherits());
            assert!(manager.is_registered(id));
        }
        assert!(manager.find_typed::<Mat4>("Transform").is_some());
    }

    #[test]
    fn duplicate_entries_fail() {
        let catalog = PropertyCatalog::new()
            .with("Visible", true, true)
            .with("Visible", 1.0_f32, false);
        assert_eq!(
            PropertyManager::from_catalog(&catalog).unwrap_err(),
            PropertyError::DuplicateName("Visible".into())
        );
    }

    #[test]
    fn install_into_existing_manager() {
        let mut manager = PropertyManager::new();
        let mut catalog = PropertyCatalog::new();
        assert!(catalog.is_empty());
        catalog.push("Opacity", Value::Float(1.0), true);

        let ids = catalog.install(&mut manager).unwrap();
        assert_eq!(ids.len(), 1);
        assert_eq!(
            manager.type_info(ids[0]).unwrap().default_value(),
            &Value::Float(1.0)
        );
        // A second install collides with the first.
        assert!(catalog.install(&mut manager).is_err());
    }
}
