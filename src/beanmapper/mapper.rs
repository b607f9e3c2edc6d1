//! Conversion between property trees and typed values.
//!
//! # Responsibilities
//! - Build typed values (leaves, options, sequences, maps, beans) from tree
//!   nodes, recursively
//! - Break typed values back into tree nodes
//! - Validate bean types and everything reachable from them up front
//!
//! # Design Decisions
//! - The mapper is an explicit context object owning the handler registry and
//!   the bean description cache; there is no process-wide instance
//! - Registered handlers are consulted before the structural shapes, so a
//!   handler can take over any type, collections included
//! - Nodes of the wrong kind are a soft failure unless the mapper is strict
//! - Export never loses data: a value without a tree node is an error, and
//!   only an empty option is left out, never from a sequence or map

use std::any::Any;
use std::collections::HashSet;

use indexmap::IndexMap;

use crate::beanmapper::class::Bean;
use crate::beanmapper::context::MappingContext;
use crate::beanmapper::factory::{BeanDescriptionFactory, DescribedBean};
use crate::beanmapper::handler::HandlerRegistry;
use crate::error::{MappingError, MappingResult};
use crate::resource::PropertyValue;
use crate::typeinfo::{AnyValue, BeanShape, Shape, TypeInformation, Typed};

/// Converts between [`PropertyValue`] trees and typed values.
#[derive(Default)]
pub struct Mapper {
    handlers: HandlerRegistry,
    descriptions: BeanDescriptionFactory,
    strict: bool,
}

impl Mapper {
    /// Mapper with the default handlers, lenient about node kinds.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handlers(handlers: HandlerRegistry) -> Self {
        Self {
            handlers,
            ..Self::default()
        }
    }

    /// A strict mapper reports nodes of the wrong kind as
    /// [`MappingError::StructuralMismatch`] instead of treating them as absent.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    pub fn descriptions(&self) -> &BeanDescriptionFactory {
        &self.descriptions
    }

    /// Converts `node` to a `T`; `Ok(None)` if it does not fit.
    pub fn convert_to_bean<T: Typed>(&self, node: &PropertyValue) -> MappingResult<Option<T>> {
        let target = TypeInformation::of::<T>();
        let value = self.convert_value(node, &target)?;
        Ok(value
            .and_then(|value| value.downcast::<T>().ok())
            .map(|value| *value))
    }

    /// Converts `node` to a value of `target`.
    pub fn convert_value(
        &self,
        node: &PropertyValue,
        target: &TypeInformation,
    ) -> MappingResult<Option<AnyValue>> {
        self.to_value(node, target, &MappingContext::root())
    }

    /// Like [`Mapper::convert_value`], reporting positions below `ctx`.
    pub fn convert_value_at(
        &self,
        node: &PropertyValue,
        target: &TypeInformation,
        ctx: &MappingContext,
    ) -> MappingResult<Option<AnyValue>> {
        self.to_value(node, target, ctx)
    }

    /// Converts `value` to a tree node; `Ok(None)` for an empty option.
    ///
    /// Fails with [`MappingError::Unrepresentable`] rather than dropping
    /// anything from the exported tree.
    pub fn convert_to_tree<T: Typed>(&self, value: &T) -> MappingResult<Option<PropertyValue>> {
        self.convert_to_tree_dyn(value, &TypeInformation::of::<T>())
    }

    /// Converts a value described by `source` to a tree node.
    pub fn convert_to_tree_dyn(
        &self,
        value: &dyn Any,
        source: &TypeInformation,
    ) -> MappingResult<Option<PropertyValue>> {
        self.to_tree(value, source, &MappingContext::root())
    }

    /// Describes `B` and every type reachable from its properties, failing on
    /// the first malformed bean or leaf type without a handler.
    pub fn validate<B: Bean>(&self) -> MappingResult<()> {
        self.validate_type(&TypeInformation::bean::<B>())
    }

    pub fn validate_type(&self, root: &TypeInformation) -> MappingResult<()> {
        let mut visited = HashSet::new();
        let mut pending = vec![root.clone()];

        while let Some(ty) = pending.pop() {
            if !visited.insert(ty.type_id()) || self.handlers.find(&ty).is_some() {
                continue;
            }
            match ty.shape() {
                Shape::Leaf | Shape::Enum(_) => {
                    return Err(MappingError::NoHandler {
                        type_name: ty.name(),
                        path: String::new(),
                    });
                }
                Shape::Map(_) => pending.extend(ty.map_value_type().cloned()),
                Shape::Optional(_) | Shape::Sequence(_) => {
                    pending.extend(ty.element_type().cloned())
                }
                Shape::Bean(shape) => {
                    let described = self.describe(&ty, shape)?;
                    for property in described.properties.iter() {
                        pending.push(property.type_information().clone());
                        pending.push(property.write_type().clone());
                    }
                }
            }
        }
        Ok(())
    }

    fn to_value(
        &self,
        node: &PropertyValue,
        target: &TypeInformation,
        ctx: &MappingContext,
    ) -> MappingResult<Option<AnyValue>> {
        if let Some(handler) = self.handlers.find(target) {
            let value = handler.to_value(node, target);
            if value.is_none() {
                tracing::trace!(
                    path = %ctx,
                    type_name = target.name(),
                    node = node.kind(),
                    "Handler rejected node"
                );
            }
            return Ok(value);
        }

        match target.shape() {
            Shape::Optional(shape) => {
                let Some(inner) = target.element_type() else {
                    return Ok(None);
                };
                Ok(self.to_value(node, inner, ctx)?.and_then(shape.wrap))
            }
            Shape::Sequence(shape) => {
                let (Some(items), Some(element)) = (node.as_sequence(), target.element_type())
                else {
                    return self.mismatch(ctx, "sequence", node);
                };
                let mut values = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let item_ctx = ctx.element(index);
                    match self.to_value(item, element, &item_ctx)? {
                        Some(value) => values.push(value),
                        None => {
                            tracing::trace!(path = %item_ctx, "Sequence element not convertible");
                            return Ok(None);
                        }
                    }
                }
                let collected = (shape.collect)(values);
                if collected.is_none() {
                    tracing::trace!(path = %ctx, type_name = target.name(), "Sequence does not fit target");
                }
                Ok(collected)
            }
            Shape::Map(shape) => {
                let (Some(entries), Some(value_type)) = (node.as_mapping(), target.map_value_type())
                else {
                    return self.mismatch(ctx, "mapping", node);
                };
                let mut values = Vec::with_capacity(entries.len());
                for (key, child) in entries {
                    let child_ctx = ctx.child(key);
                    match self.to_value(child, value_type, &child_ctx)? {
                        Some(value) => values.push((key.clone(), value)),
                        None => {
                            tracing::trace!(path = %child_ctx, "Map value not convertible");
                            return Ok(None);
                        }
                    }
                }
                Ok((shape.collect)(values))
            }
            Shape::Bean(shape) => self.to_bean(node, target, shape, ctx),
            Shape::Leaf | Shape::Enum(_) => Err(MappingError::NoHandler {
                type_name: target.name(),
                path: ctx.path().to_string(),
            }),
        }
    }

    fn describe(&self, ty: &TypeInformation, shape: &BeanShape) -> MappingResult<DescribedBean> {
        self.descriptions.described(ty.type_id(), shape.class)
    }

    fn to_bean(
        &self,
        node: &PropertyValue,
        target: &TypeInformation,
        shape: &BeanShape,
        ctx: &MappingContext,
    ) -> MappingResult<Option<AnyValue>> {
        let Some(children) = node.as_mapping() else {
            return self.mismatch(ctx, "mapping", node);
        };
        let DescribedBean { class, properties } = self.describe(target, shape)?;
        let mut bean = class.instantiate()?;

        for property in properties.iter() {
            let child_ctx = ctx.child(property.name());
            let converted = match children.get(property.name()) {
                Some(child) => self.to_value(child, property.write_type(), &child_ctx)?,
                None => None,
            };
            match converted {
                Some(value) => {
                    if !property.set_value(&mut *bean, value) {
                        tracing::warn!(path = %child_ctx, bean = class.name(), "Setter rejected value");
                    }
                }
                None if property.is_mandatory() => {
                    tracing::debug!(
                        path = %child_ctx,
                        bean = class.name(),
                        "Mandatory property missing; bean not built"
                    );
                    return Ok(None);
                }
                None => {
                    tracing::trace!(path = %child_ctx, "Property keeps its default");
                }
            }
        }
        Ok(Some(bean))
    }

    fn to_tree(
        &self,
        value: &dyn Any,
        source: &TypeInformation,
        ctx: &MappingContext,
    ) -> MappingResult<Option<PropertyValue>> {
        if let Some(handler) = self.handlers.find(source) {
            return match handler.to_tree(value, source) {
                Some(node) => Ok(Some(node)),
                None => Err(unrepresentable(source, ctx)),
            };
        }

        match source.shape() {
            Shape::Optional(shape) => match ((shape.inner)(value), source.element_type()) {
                (Some(Some(inner)), Some(inner_type)) => self.to_tree(inner, inner_type, ctx),
                _ => Ok(None),
            },
            Shape::Sequence(shape) => {
                let (Some(items), Some(element)) = ((shape.elements)(value), source.element_type())
                else {
                    return Ok(None);
                };
                let mut nodes = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    nodes.push(self.required_tree(item, element, &ctx.element(index))?);
                }
                Ok(Some(PropertyValue::Sequence(nodes)))
            }
            Shape::Map(shape) => {
                let (Some(entries), Some(value_type)) = ((shape.entries)(value), source.map_value_type())
                else {
                    return Ok(None);
                };
                let mut nodes = IndexMap::with_capacity(entries.len());
                for (key, entry) in entries {
                    let node = self.required_tree(entry, value_type, &ctx.child(key))?;
                    nodes.insert(key.to_string(), node);
                }
                Ok(Some(PropertyValue::Mapping(nodes)))
            }
            Shape::Bean(shape) => {
                let described = self.describe(source, shape)?;
                let mut nodes = IndexMap::with_capacity(described.properties.len());
                for property in described.properties.iter() {
                    let Some(current) = property.get_value(value) else {
                        return Ok(None);
                    };
                    let child_ctx = ctx.child(property.name());
                    let node = if property.type_information().is_optional() {
                        self.to_tree(&*current, property.type_information(), &child_ctx)?
                    } else {
                        Some(self.required_tree(&*current, property.type_information(), &child_ctx)?)
                    };
                    if let Some(node) = node {
                        nodes.insert(property.name().to_string(), node);
                    }
                }
                Ok(Some(PropertyValue::Mapping(nodes)))
            }
            Shape::Leaf | Shape::Enum(_) => Err(MappingError::NoHandler {
                type_name: source.name(),
                path: ctx.path().to_string(),
            }),
        }
    }

    /// A node that must exist: sequence elements, map values and
    /// non-optional bean properties.
    fn required_tree(
        &self,
        value: &dyn Any,
        source: &TypeInformation,
        ctx: &MappingContext,
    ) -> MappingResult<PropertyValue> {
        self.to_tree(value, source, ctx)?
            .ok_or_else(|| unrepresentable(source, ctx))
    }

    fn mismatch<T>(
        &self,
        ctx: &MappingContext,
        expected: &'static str,
        node: &PropertyValue,
    ) -> MappingResult<Option<T>> {
        if self.strict {
            return Err(MappingError::StructuralMismatch {
                path: ctx.path().to_string(),
                expected,
                found: node.kind(),
            });
        }
        tracing::trace!(path = %ctx, expected, found = node.kind(), "Node kind mismatch");
        Ok(None)
    }
}

fn unrepresentable(source: &TypeInformation, ctx: &MappingContext) -> MappingError {
    MappingError::Unrepresentable {
        type_name: source.name(),
        path: ctx.path().to_string(),
    }
}
