//! TOML file backed resource.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::beanmapper::Mapper;
use crate::error::{ConfigError, Result};
use crate::properties::ConfigurationData;
use crate::resource::{PropertyResource, PropertyValue};

/// A resource read from and exported to a TOML file.
///
/// A missing file reads as an empty tree; it is created on the first export.
#[derive(Debug, Clone)]
pub struct TomlFileResource {
    path: PathBuf,
    root: PropertyValue,
}

impl TomlFileResource {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let root = load_tree(&path)?;
        Ok(Self { path, root })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the current tree as is, without consulting any property list.
    pub fn save_tree(&self) -> Result<()> {
        let table = match to_toml(&self.root) {
            toml::Value::Table(table) => table,
            _ => toml::Table::new(),
        };
        let content = toml::to_string_pretty(&table)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, content).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), "Wrote property file");
        Ok(())
    }
}

impl PropertyResource for TomlFileResource {
    fn root(&self) -> &PropertyValue {
        &self.root
    }

    fn root_mut(&mut self) -> &mut PropertyValue {
        &mut self.root
    }

    fn export_properties(&mut self, data: &ConfigurationData, mapper: &Mapper) -> Result<()> {
        self.root = data.build_tree(&*self, mapper)?;
        self.save_tree()?;
        tracing::info!(
            path = %self.path.display(),
            properties = data.len(),
            "Exported properties"
        );
        Ok(())
    }

    fn reload(&mut self) -> Result<()> {
        self.root = load_tree(&self.path)?;
        tracing::info!(path = %self.path.display(), "Reloaded property file");
        Ok(())
    }
}

/// Load a TOML file into a tree; a missing file is an empty tree.
fn load_tree(path: &Path) -> Result<PropertyValue> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "Property file missing; starting empty");
        return Ok(PropertyValue::default());
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table: toml::Table = toml::from_str(&content)?;
    Ok(from_toml(toml::Value::Table(table)))
}

fn from_toml(value: toml::Value) -> PropertyValue {
    match value {
        toml::Value::String(s) => PropertyValue::String(s),
        toml::Value::Integer(i) => PropertyValue::Integer(i),
        toml::Value::Float(f) => PropertyValue::Float(f),
        toml::Value::Boolean(b) => PropertyValue::Bool(b),
        toml::Value::Datetime(d) => PropertyValue::String(d.to_string()),
        toml::Value::Array(items) => PropertyValue::Sequence(items.into_iter().map(from_toml).collect()),
        toml::Value::Table(table) => PropertyValue::Mapping(
            table
                .into_iter()
                .map(|(key, value)| (key, from_toml(value)))
                .collect::<IndexMap<_, _>>(),
        ),
    }
}

fn to_toml(value: &PropertyValue) -> toml::Value {
    match value {
        PropertyValue::Bool(b) => toml::Value::Boolean(*b),
        PropertyValue::Integer(i) => toml::Value::Integer(*i),
        PropertyValue::Float(f) => toml::Value::Float(*f),
        PropertyValue::String(s) => toml::Value::String(s.clone()),
        PropertyValue::Sequence(items) => {
            toml::Value::Array(items.iter().map(to_toml).collect())
        }
        PropertyValue::Mapping(entries) => toml::Value::Table(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), to_toml(value)))
                .collect(),
        ),
    }
}
