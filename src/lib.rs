//! configme: typed configuration properties backed by a property tree.
//!
//! # Architecture Overview
//!
//! ```text
//!   Property<T> ──┐                       ┌── Bean / BeanClass declarations
//!                 ▼                       ▼
//!   ConfigurationData ──▶ Mapper ◀── BeanDescriptionFactory (cached)
//!                 │          │
//!                 │          └── HandlerRegistry (string, bool, number, enum, user)
//!                 ▼
//!   PropertyResource (PropertyValue tree) ◀──▶ TOML file / memory
//!                 ▲
//!   SettingsManager ── MigrationService (startup / reload)
//! ```
//!
//! Reflection is replaced by explicit declarations: a type opts into mapping
//! by implementing [`typeinfo::Typed`], and beans describe their fields and
//! accessors through [`beanmapper::BeanClass::builder`].

// Type model and mapping
pub mod beanmapper;
pub mod typeinfo;

// Configuration layer
pub mod migration;
pub mod properties;
pub mod resource;
pub mod settings;

// Cross-cutting concerns
pub mod error;
pub mod observability;

pub use beanmapper::{Bean, BeanClass, BeanDescriptionFactory, BeanPropertyDescription, Mapper};
pub use error::{ConfigError, MappingError, Result};
pub use properties::{ConfigurationData, Property};
pub use resource::{MemoryResource, PropertyResource, PropertyValue, TomlFileResource};
pub use settings::SettingsManager;
pub use typeinfo::{ConfigEnum, TypeInformation, Typed};
