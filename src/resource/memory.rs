use crate::beanmapper::Mapper;
use crate::error::Result;
use crate::properties::ConfigurationData;
use crate::resource::{PropertyResource, PropertyValue};

/// A resource that lives in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryResource {
    root: PropertyValue,
}

impl MemoryResource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tree(root: PropertyValue) -> Self {
        Self { root }
    }
}

impl PropertyResource for MemoryResource {
    fn root(&self) -> &PropertyValue {
        &self.root
    }

    fn root_mut(&mut self) -> &mut PropertyValue {
        &mut self.root
    }

    fn export_properties(&mut self, data: &ConfigurationData, mapper: &Mapper) -> Result<()> {
        self.root = data.build_tree(&*self, mapper)?;
        Ok(())
    }

    fn reload(&mut self) -> Result<()> {
        Ok(())
    }
}
