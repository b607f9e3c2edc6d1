//! Typed configuration properties and the registry that groups them.

pub mod data;
pub mod property;

pub use data::{ConfigurationData, ConfigurationDataBuilder};
pub use property::{
    BeanProperty, BooleanProperty, ConfigProperty, DoubleProperty, EnumProperty, EnumSetProperty,
    IntegerProperty, MapProperty, OptionalProperty, Property, StringListProperty, StringProperty,
};
