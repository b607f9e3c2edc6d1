//! Settings manager: the entry point tying a resource, its properties, the
//! migration service and the mapper together.
//!
//! # Lifecycle
//! ```text
//! SettingsManager::builder(resource, data).build()
//!     → MigrationService::check_and_migrate
//!     → save (export_properties) when the service asks for it
//!
//! reload()
//!     → PropertyResource::reload
//!     → migration check again, saving if needed
//! ```

use std::sync::Arc;

use crate::beanmapper::Mapper;
use crate::error::Result;
use crate::migration::MigrationService;
use crate::properties::{ConfigurationData, Property};
use crate::resource::PropertyResource;
use crate::typeinfo::Typed;

pub struct SettingsManager {
    resource: Box<dyn PropertyResource>,
    data: ConfigurationData,
    migration: Option<Box<dyn MigrationService>>,
    mapper: Arc<Mapper>,
}

impl SettingsManager {
    pub fn builder(
        resource: impl PropertyResource + 'static,
        data: ConfigurationData,
    ) -> SettingsManagerBuilder {
        SettingsManagerBuilder {
            resource: Box::new(resource),
            data,
            migration: None,
            mapper: None,
        }
    }

    /// Current value of `property`, or its default.
    pub fn get_property<T: Typed + Clone>(&self, property: &Property<T>) -> Result<T> {
        property.get_value(self.resource.as_ref(), &self.mapper)
    }

    /// Sets `property` in the resource. Not persisted until [`Self::save`].
    pub fn set_property<T: Typed + Clone>(&mut self, property: &Property<T>, value: &T) -> Result<()> {
        let node = property.to_export_value(value, &self.mapper)?;
        self.resource.set_value(property.path(), node);
        Ok(())
    }

    /// Exports all properties to the resource.
    pub fn save(&mut self) -> Result<()> {
        self.resource.export_properties(&self.data, &self.mapper)?;
        tracing::info!(properties = self.data.len(), "Settings saved");
        Ok(())
    }

    /// Re-reads the resource and runs the migration check again.
    pub fn reload(&mut self) -> Result<()> {
        self.resource.reload()?;
        self.migrate_and_save()
    }

    pub fn resource(&self) -> &dyn PropertyResource {
        self.resource.as_ref()
    }

    pub fn configuration_data(&self) -> &ConfigurationData {
        &self.data
    }

    pub fn mapper(&self) -> &Arc<Mapper> {
        &self.mapper
    }

    fn migrate_and_save(&mut self) -> Result<()> {
        let Some(migration) = &self.migration else {
            return Ok(());
        };
        if migration.check_and_migrate(self.resource.as_mut(), &self.data, &self.mapper)? {
            self.save()?;
        }
        Ok(())
    }
}

pub struct SettingsManagerBuilder {
    resource: Box<dyn PropertyResource>,
    data: ConfigurationData,
    migration: Option<Box<dyn MigrationService>>,
    mapper: Option<Arc<Mapper>>,
}

impl SettingsManagerBuilder {
    pub fn migration_service(mut self, service: impl MigrationService + 'static) -> Self {
        self.migration = Some(Box::new(service));
        self
    }

    /// Shares a mapper (and its description cache) across managers.
    pub fn mapper(mut self, mapper: Arc<Mapper>) -> Self {
        self.mapper = Some(mapper);
        self
    }

    /// Creates the manager, running the migration service first.
    pub fn build(self) -> Result<SettingsManager> {
        let mut manager = SettingsManager {
            resource: self.resource,
            data: self.data,
            migration: self.migration,
            mapper: self.mapper.unwrap_or_default(),
        };
        manager.migrate_and_save()?;
        tracing::debug!(properties = manager.data.len(), "Settings manager ready");
        Ok(manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::PlainMigrationService;
    use crate::properties::{BooleanProperty, StringProperty};
    use crate::resource::MemoryResource;

    #[test]
    fn test_get_and_set_property() {
        let enabled = BooleanProperty::new("feature.enabled", false);
        let label = StringProperty::new("feature.label", "none".to_string());
        let data = ConfigurationData::builder()
            .add(enabled.clone())
            .add(label.clone())
            .build()
            .unwrap();

        let mut manager = SettingsManager::builder(MemoryResource::new(), data)
            .build()
            .unwrap();
        assert!(!manager.get_property(&enabled).unwrap());

        manager.set_property(&enabled, &true).unwrap();
        assert!(manager.get_property(&enabled).unwrap());
        assert!(!manager.resource().contains("feature.label"));

        manager.save().unwrap();
        assert_eq!(manager.resource().get_string("feature.label"), Some("none"));
    }

    #[test]
    fn test_plain_migration_fills_defaults_at_startup() {
        let label = StringProperty::new("label", "default".to_string());
        let data = ConfigurationData::builder().add(label).build().unwrap();

        let manager = SettingsManager::builder(MemoryResource::new(), data)
            .migration_service(PlainMigrationService::new())
            .build()
            .unwrap();
        assert_eq!(manager.resource().get_string("label"), Some("default"));
    }
}
