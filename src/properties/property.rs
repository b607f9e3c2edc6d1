//! Typed properties.

use indexmap::{IndexMap, IndexSet};

use crate::beanmapper::{Mapper, MappingContext};
use crate::error::Result;
use crate::resource::{PropertyResource, PropertyValue};
use crate::typeinfo::{TypeInformation, Typed};

/// A property as seen by [`ConfigurationData`](super::ConfigurationData),
/// independent of its value type.
pub trait ConfigProperty {
    fn path(&self) -> &str;

    fn type_information(&self) -> TypeInformation;

    /// Whether the resource holds a value convertible to this property.
    fn is_present(&self, resource: &dyn PropertyResource, mapper: &Mapper) -> Result<bool>;

    /// The current value (the default when absent or invalid) as a tree node.
    fn export_value(
        &self,
        resource: &dyn PropertyResource,
        mapper: &Mapper,
    ) -> Result<Option<PropertyValue>>;
}

/// A configuration value at a fixed path, with a default.
#[derive(Debug, Clone, PartialEq)]
pub struct Property<T> {
    path: String,
    default: T,
}

pub type StringProperty = Property<String>;
pub type IntegerProperty = Property<i32>;
pub type DoubleProperty = Property<f64>;
pub type BooleanProperty = Property<bool>;
pub type StringListProperty = Property<Vec<String>>;
pub type EnumProperty<E> = Property<E>;
/// Ordered set of enum values; the tree order is kept.
pub type EnumSetProperty<E> = Property<IndexSet<E>>;
pub type MapProperty<V> = Property<IndexMap<String, V>>;
pub type OptionalProperty<T> = Property<Option<T>>;
pub type BeanProperty<B> = Property<B>;

impl<T: Typed + Clone> Property<T> {
    pub fn new(path: impl Into<String>, default: T) -> Self {
        Self {
            path: path.into(),
            default,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    /// The value held by the resource, if present and convertible.
    pub fn get_from_resource(
        &self,
        resource: &dyn PropertyResource,
        mapper: &Mapper,
    ) -> Result<Option<T>> {
        let Some(node) = resource.get_value(&self.path) else {
            return Ok(None);
        };
        let value = mapper.convert_value_at(
            node,
            &TypeInformation::of::<T>(),
            &MappingContext::at(&self.path),
        )?;
        Ok(value
            .and_then(|value| value.downcast::<T>().ok())
            .map(|value| *value))
    }

    /// The value held by the resource, or the default.
    pub fn get_value(&self, resource: &dyn PropertyResource, mapper: &Mapper) -> Result<T> {
        match self.get_from_resource(resource, mapper)? {
            Some(value) => Ok(value),
            None => {
                tracing::debug!(path = %self.path, "Property absent or invalid; using default");
                Ok(self.default.clone())
            }
        }
    }

    /// `value` as the tree node it is exported as.
    pub fn to_export_value(&self, value: &T, mapper: &Mapper) -> Result<Option<PropertyValue>> {
        Ok(mapper.convert_to_tree(value)?)
    }
}

impl<T: Typed + Clone> ConfigProperty for Property<T> {
    fn path(&self) -> &str {
        &self.path
    }

    fn type_information(&self) -> TypeInformation {
        TypeInformation::of::<T>()
    }

    fn is_present(&self, resource: &dyn PropertyResource, mapper: &Mapper) -> Result<bool> {
        Ok(self.get_from_resource(resource, mapper)?.is_some())
    }

    fn export_value(
        &self,
        resource: &dyn PropertyResource,
        mapper: &Mapper,
    ) -> Result<Option<PropertyValue>> {
        let value = self.get_value(resource, mapper)?;
        self.to_export_value(&value, mapper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::MemoryResource;

    #[test]
    fn test_default_when_absent_or_invalid() {
        let mapper = Mapper::new();
        let property = IntegerProperty::new("limits.max", 10);
        let mut resource = MemoryResource::new();

        assert_eq!(property.get_value(&resource, &mapper).unwrap(), 10);
        assert!(!property.is_present(&resource, &mapper).unwrap());

        resource.set_value("limits.max", Some("many".into()));
        assert_eq!(property.get_value(&resource, &mapper).unwrap(), 10);
        assert!(!property.is_present(&resource, &mapper).unwrap());

        resource.set_value("limits.max", Some(25.into()));
        assert_eq!(property.get_value(&resource, &mapper).unwrap(), 25);
        assert!(property.is_present(&resource, &mapper).unwrap());
    }

    #[test]
    fn test_optional_default_is_not_exported() {
        let mapper = Mapper::new();
        let property: OptionalProperty<String> = Property::new("proxy.url", None);
        let resource = MemoryResource::new();
        assert_eq!(property.export_value(&resource, &mapper).unwrap(), None);
    }

    #[test]
    fn test_string_list_export() {
        let mapper = Mapper::new();
        let property = StringListProperty::new("names", vec!["a".into(), "b".into()]);
        let node = property
            .export_value(&MemoryResource::new(), &mapper)
            .unwrap();
        assert_eq!(node, Some(vec!["a", "b"].into()));
    }
}
