//! Migration of outdated or incomplete configuration trees.
//!
//! The migration service runs when a settings manager is created or
//! reloaded. It may rewrite the resource (rename or drop old paths); returning
//! `true` tells the manager to export and persist the configuration again.

use crate::beanmapper::Mapper;
use crate::error::Result;
use crate::properties::ConfigurationData;
use crate::resource::PropertyResource;

pub trait MigrationService {
    /// Checks the resource against `data`, migrating it where needed.
    /// Returns whether the configuration must be saved.
    fn check_and_migrate(
        &self,
        resource: &mut dyn PropertyResource,
        data: &ConfigurationData,
        mapper: &Mapper,
    ) -> Result<bool>;
}

/// A single migration step; returns whether it changed the resource.
pub type Migration = Box<dyn Fn(&mut dyn PropertyResource, &ConfigurationData) -> bool + Send + Sync>;

/// Runs the registered migrations, then requests a save if anything was
/// migrated or any property is missing or invalid.
#[derive(Default)]
pub struct PlainMigrationService {
    migrations: Vec<Migration>,
}

impl PlainMigrationService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_migration<F>(mut self, migration: F) -> Self
    where
        F: Fn(&mut dyn PropertyResource, &ConfigurationData) -> bool + Send + Sync + 'static,
    {
        self.migrations.push(Box::new(migration));
        self
    }

    /// Runs every migration in registration order.
    pub fn perform_migrations(
        &self,
        resource: &mut dyn PropertyResource,
        data: &ConfigurationData,
    ) -> bool {
        let mut migrated = false;
        for migration in &self.migrations {
            migrated |= migration(resource, data);
        }
        migrated
    }
}

impl MigrationService for PlainMigrationService {
    fn check_and_migrate(
        &self,
        resource: &mut dyn PropertyResource,
        data: &ConfigurationData,
        mapper: &Mapper,
    ) -> Result<bool> {
        let migrated = self.perform_migrations(resource, data);
        if migrated {
            tracing::info!("Configuration migrated");
        }

        let missing = data.missing_paths(resource, mapper)?;
        if let Some(first) = missing.first() {
            tracing::info!(
                missing = missing.len(),
                first = *first,
                "Configuration incomplete; defaults will be written"
            );
        }
        Ok(migrated || !missing.is_empty())
    }
}

/// Moves the node at `from` to `to` unless `to` is already set.
/// Returns whether the resource changed.
pub fn move_value(resource: &mut dyn PropertyResource, from: &str, to: &str) -> bool {
    if resource.contains(to) {
        return false;
    }
    let Some(value) = resource.get_value(from).cloned() else {
        return false;
    };
    resource.set_value(from, None);
    resource.set_value(to, Some(value));
    tracing::debug!(from, to, "Moved property");
    true
}
