//! Error types for bean mapping and configuration handling.
//!
//! # Design Decisions
//! - `MappingError` covers everything the bean mapper can reject; it nests
//!   inside `ConfigError`, the single error family of the crate
//! - Soft failures (unparseable scalars, missing optional values) are not
//!   errors: they surface as `Ok(None)` from the conversion functions

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while describing bean types or converting values.
#[derive(Debug, Error)]
pub enum MappingError {
    /// Two properties of one bean resolve to the same export name.
    #[error("{bean}: multiple properties with name '{name}'")]
    DuplicateName { bean: &'static str, name: String },

    /// A property's resolved export name is blank.
    #[error("{bean}: export name may not be empty (property '{property}')")]
    EmptyExportName { bean: &'static str, property: String },

    /// The bean has no constructor or its constructor failed.
    #[error("cannot instantiate {bean}: {reason}")]
    Instantiation { bean: &'static str, reason: String },

    /// The tree node kind does not match the expected shape.
    #[error("expected {expected} at '{path}', found {found}")]
    StructuralMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A leaf type is not claimed by any registered type handler.
    #[error("no type handler for {type_name} at '{path}'")]
    NoHandler { type_name: &'static str, path: String },

    /// A value has no tree node: its handler declined it, or an element of a
    /// sequence or map is empty.
    #[error("cannot represent {type_name} at '{path}' in a property tree")]
    Unrepresentable { type_name: &'static str, path: String },

    /// The bean class declaration itself is malformed.
    #[error("{bean}: invalid declaration: {reason}")]
    InvalidDeclaration { bean: &'static str, reason: String },
}

/// Result type for mapping operations.
pub type MappingResult<T> = std::result::Result<T, MappingError>;

/// Errors of the configuration layer (resources, properties, settings).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Property path is empty or has empty segments.
    #[error("invalid property path '{0}'")]
    InvalidPath(String),

    #[error("duplicate property path '{0}'")]
    DuplicateProperty(String),

    /// One property path is the parent of another, so a node would be both a
    /// leaf and a container.
    #[error("property path '{0}' conflicts with '{1}'")]
    PathConflict(String, String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
