//! Bean mapping engine.
//!
//! # Responsibilities
//! - Declare bean types explicitly ([`BeanClass`])
//! - Discover and cache their mappable properties ([`BeanDescriptionFactory`])
//! - Convert between property trees and typed values ([`Mapper`])
//!
//! # Design Decisions
//! - Leaf conversion goes through an ordered [`HandlerRegistry`]; the first
//!   handler claiming a type wins
//! - Discovery errors (blank or clashing export names, malformed declarations)
//!   surface when a bean type is first described

pub mod class;
pub mod context;
pub mod description;
pub mod factory;
pub mod handler;
pub mod mapper;

pub use class::{Bean, BeanClass, BeanClassBuilder, ExportMarker, FieldDeclaration, MethodDeclaration};
pub use context::MappingContext;
pub use description::BeanPropertyDescription;
pub use factory::{BeanDescriptionFactory, BeanProperties};
pub use handler::{
    BooleanHandler, EnumHandler, HandlerRegistry, LeafHandler, NumberHandler, StringHandler,
    TypeHandler,
};
pub use mapper::Mapper;
