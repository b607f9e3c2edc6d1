//! Ordered registry of the properties of one configuration.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::beanmapper::Mapper;
use crate::error::{ConfigError, Result};
use crate::properties::ConfigProperty;
use crate::resource::{PropertyResource, PropertyValue};

/// The properties of a configuration, in export order.
///
/// Paths are unique, and no path is the parent of another (a node cannot be
/// both a value and a section).
#[derive(Clone, Default)]
pub struct ConfigurationData {
    properties: Vec<Arc<dyn ConfigProperty>>,
}

impl ConfigurationData {
    pub fn builder() -> ConfigurationDataBuilder {
        ConfigurationDataBuilder::default()
    }

    pub fn properties(&self) -> &[Arc<dyn ConfigProperty>] {
        &self.properties
    }

    pub fn get(&self, path: &str) -> Option<&dyn ConfigProperty> {
        self.properties
            .iter()
            .find(|property| property.path() == path)
            .map(|property| property.as_ref())
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Tree of the current value of every property, in registration order.
    pub fn build_tree(&self, resource: &dyn PropertyResource, mapper: &Mapper) -> Result<PropertyValue> {
        let mut root = PropertyValue::default();
        for property in &self.properties {
            if let Some(node) = property.export_value(resource, mapper)? {
                root.set_path(property.path(), Some(node));
            }
        }
        Ok(root)
    }

    /// Paths whose value is absent from `resource` or not convertible.
    pub fn missing_paths(
        &self,
        resource: &dyn PropertyResource,
        mapper: &Mapper,
    ) -> Result<Vec<&str>> {
        let mut missing = Vec::new();
        for property in &self.properties {
            if !property.is_present(resource, mapper)? {
                missing.push(property.path());
            }
        }
        Ok(missing)
    }

    /// Whether every property has a valid value in `resource`.
    pub fn all_present(&self, resource: &dyn PropertyResource, mapper: &Mapper) -> Result<bool> {
        Ok(self.missing_paths(resource, mapper)?.is_empty())
    }
}

impl fmt::Debug for ConfigurationData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.properties.iter().map(|property| property.path()))
            .finish()
    }
}

#[derive(Default)]
pub struct ConfigurationDataBuilder {
    properties: Vec<Arc<dyn ConfigProperty>>,
}

impl ConfigurationDataBuilder {
    pub fn add<P: ConfigProperty + 'static>(mut self, property: P) -> Self {
        self.properties.push(Arc::new(property));
        self
    }

    pub fn build(self) -> Result<ConfigurationData> {
        let mut seen = HashSet::new();
        for property in &self.properties {
            let path = property.path();
            if path.is_empty() || path.split('.').any(str::is_empty) {
                return Err(ConfigError::InvalidPath(path.to_string()));
            }
            if !seen.insert(path) {
                return Err(ConfigError::DuplicateProperty(path.to_string()));
            }
        }

        for parent in &seen {
            let prefix = format!("{parent}.");
            if let Some(child) = seen.iter().find(|other| other.starts_with(&prefix)) {
                return Err(ConfigError::PathConflict(parent.to_string(), child.to_string()));
            }
        }

        tracing::debug!(properties = self.properties.len(), "Built configuration data");
        Ok(ConfigurationData {
            properties: self.properties,
        })
    }
}
