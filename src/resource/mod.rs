//! Property resources: the tree that properties are read from and exported to.
//!
//! # Data Flow
//! ```text
//! storage (TOML file, memory)
//!     → PropertyResource (generic PropertyValue tree)
//!     → Property<T>::get_value via the Mapper
//!
//! On save:
//!     ConfigurationData::build_tree (current values, registration order)
//!     → PropertyResource::export_properties
//!     → storage
//! ```
//!
//! # Design Decisions
//! - Paths are dot-delimited and case-sensitive
//! - The storage format is a detail of each implementation; everything above
//!   this module sees only [`PropertyValue`]

pub mod memory;
pub mod toml_file;
pub mod value;

use indexmap::IndexMap;

use crate::beanmapper::Mapper;
use crate::error::Result;
use crate::properties::ConfigurationData;

pub use memory::MemoryResource;
pub use toml_file::TomlFileResource;
pub use value::PropertyValue;

/// Access to a property tree by path.
pub trait PropertyResource {
    fn root(&self) -> &PropertyValue;

    fn root_mut(&mut self) -> &mut PropertyValue;

    fn get_value(&self, path: &str) -> Option<&PropertyValue> {
        self.root().get_path(path)
    }

    fn get_string(&self, path: &str) -> Option<&str> {
        self.get_value(path)?.as_str()
    }

    fn get_int(&self, path: &str) -> Option<i64> {
        self.get_value(path)?.as_i64()
    }

    fn get_double(&self, path: &str) -> Option<f64> {
        self.get_value(path)?.as_f64()
    }

    fn get_bool(&self, path: &str) -> Option<bool> {
        self.get_value(path)?.as_bool()
    }

    fn get_list(&self, path: &str) -> Option<&[PropertyValue]> {
        self.get_value(path)?.as_sequence()
    }

    fn get_map(&self, path: &str) -> Option<&IndexMap<String, PropertyValue>> {
        self.get_value(path)?.as_mapping()
    }

    fn contains(&self, path: &str) -> bool {
        self.get_value(path).is_some()
    }

    /// Sets the node at `path`; `None` removes it.
    fn set_value(&mut self, path: &str, value: Option<PropertyValue>) {
        self.root_mut().set_path(path, value);
    }

    /// Replaces the tree with the current values of `data`'s properties and
    /// persists it.
    fn export_properties(&mut self, data: &ConfigurationData, mapper: &Mapper) -> Result<()>;

    /// Re-reads the tree from storage.
    fn reload(&mut self) -> Result<()>;
}
