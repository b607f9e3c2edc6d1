//! Leaf type handlers and their ordered registry.
//!
//! # Responsibilities
//! - Convert single tree nodes to typed leaf values and back
//! - Resolve the handler for a type by first match in registration order
//!
//! # Design Decisions
//! - Handlers claim raw type families; `claims` can be overridden for
//!   predicates that are not a plain membership test (enums)
//! - A handler that cannot convert a node returns `None`; the mapper treats
//!   that as a soft failure

use std::any::{Any, TypeId};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::resource::PropertyValue;
use crate::typeinfo::{AnyValue, RawType, Shape, TypeInformation};

/// Converts leaf values of the raw types it claims.
pub trait TypeHandler: Send + Sync {
    /// Raw type families handled.
    fn raw_types(&self) -> &[RawType];

    fn claims(&self, type_info: &TypeInformation) -> bool {
        self.raw_types().contains(&type_info.raw_type())
    }

    /// Tree node to a value of `target`; `None` if the node does not fit.
    fn to_value(&self, node: &PropertyValue, target: &TypeInformation) -> Option<AnyValue>;

    /// Value of type `source` to a tree node; `None` if `value` is not one.
    fn to_tree(&self, value: &dyn Any, source: &TypeInformation) -> Option<PropertyValue>;
}

/// Ordered handler list; the first handler claiming a type wins.
#[derive(Clone)]
pub struct HandlerRegistry {
    handlers: Vec<Arc<dyn TypeHandler>>,
}

impl HandlerRegistry {
    /// A registry without any handler.
    pub fn empty() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Appends a handler. Handlers registered earlier take precedence.
    pub fn register(&mut self, handler: impl TypeHandler + 'static) -> &mut Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    /// Inserts a handler ahead of all registered ones.
    pub fn register_first(&mut self, handler: impl TypeHandler + 'static) -> &mut Self {
        self.handlers.insert(0, Arc::new(handler));
        self
    }

    pub fn find(&self, type_info: &TypeInformation) -> Option<&dyn TypeHandler> {
        self.handlers
            .iter()
            .find(|handler| handler.claims(type_info))
            .map(|handler| handler.as_ref())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for HandlerRegistry {
    /// String, boolean, number and enum handlers, in that order.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register(StringHandler)
            .register(BooleanHandler)
            .register(NumberHandler)
            .register(EnumHandler);
        registry
    }
}

pub struct StringHandler;

impl TypeHandler for StringHandler {
    fn raw_types(&self) -> &[RawType] {
        &[RawType::String]
    }

    fn to_value(&self, node: &PropertyValue, _target: &TypeInformation) -> Option<AnyValue> {
        node.as_str().map(|value| Box::new(value.to_string()) as AnyValue)
    }

    fn to_tree(&self, value: &dyn Any, _source: &TypeInformation) -> Option<PropertyValue> {
        value
            .downcast_ref::<String>()
            .map(|value| PropertyValue::String(value.clone()))
    }
}

pub struct BooleanHandler;

impl TypeHandler for BooleanHandler {
    fn raw_types(&self) -> &[RawType] {
        &[RawType::Bool]
    }

    fn to_value(&self, node: &PropertyValue, _target: &TypeInformation) -> Option<AnyValue> {
        node.as_bool().map(|value| Box::new(value) as AnyValue)
    }

    fn to_tree(&self, value: &dyn Any, _source: &TypeInformation) -> Option<PropertyValue> {
        value.downcast_ref::<bool>().copied().map(PropertyValue::Bool)
    }
}

/// All primitive integers and floats.
///
/// Integers are range-checked against the target; integer nodes widen into
/// float targets, float nodes never narrow into integer targets.
pub struct NumberHandler;

const NUMBER_TYPES: &[RawType] = &[
    RawType::I8,
    RawType::I16,
    RawType::I32,
    RawType::I64,
    RawType::U8,
    RawType::U16,
    RawType::U32,
    RawType::U64,
    RawType::F32,
    RawType::F64,
];

fn integer<T: TryFrom<i64> + Any>(node: &PropertyValue) -> Option<AnyValue> {
    let value = T::try_from(node.as_i64()?).ok()?;
    Some(Box::new(value))
}

/// Finite values outside the `f32` range are rejected, not turned into
/// infinity.
fn narrow_f32(value: f64) -> Option<f32> {
    let narrowed = value as f32;
    (narrowed.is_finite() || !value.is_finite()).then_some(narrowed)
}

fn integer_tree<T: Copy + TryInto<i64> + Any>(value: &dyn Any) -> Option<PropertyValue> {
    let value = (*value.downcast_ref::<T>()?).try_into().ok()?;
    Some(PropertyValue::Integer(value))
}

impl TypeHandler for NumberHandler {
    fn raw_types(&self) -> &[RawType] {
        NUMBER_TYPES
    }

    fn to_value(&self, node: &PropertyValue, target: &TypeInformation) -> Option<AnyValue> {
        match target.raw_type() {
            RawType::I8 => integer::<i8>(node),
            RawType::I16 => integer::<i16>(node),
            RawType::I32 => integer::<i32>(node),
            RawType::I64 => integer::<i64>(node),
            RawType::U8 => integer::<u8>(node),
            RawType::U16 => integer::<u16>(node),
            RawType::U32 => integer::<u32>(node),
            RawType::U64 => integer::<u64>(node),
            RawType::F32 => node
                .as_f64()
                .and_then(narrow_f32)
                .map(|value| Box::new(value) as AnyValue),
            RawType::F64 => node.as_f64().map(|value| Box::new(value) as AnyValue),
            _ => None,
        }
    }

    fn to_tree(&self, value: &dyn Any, source: &TypeInformation) -> Option<PropertyValue> {
        match source.raw_type() {
            RawType::I8 => integer_tree::<i8>(value),
            RawType::I16 => integer_tree::<i16>(value),
            RawType::I32 => integer_tree::<i32>(value),
            RawType::I64 => integer_tree::<i64>(value),
            RawType::U8 => integer_tree::<u8>(value),
            RawType::U16 => integer_tree::<u16>(value),
            RawType::U32 => integer_tree::<u32>(value),
            // Values above i64::MAX have no tree representation.
            RawType::U64 => integer_tree::<u64>(value),
            RawType::F32 => value
                .downcast_ref::<f32>()
                .map(|value| PropertyValue::Float(f64::from(*value))),
            RawType::F64 => value.downcast_ref::<f64>().copied().map(PropertyValue::Float),
            _ => None,
        }
    }
}

/// Enums by exact, case-sensitive variant name.
pub struct EnumHandler;

impl TypeHandler for EnumHandler {
    fn raw_types(&self) -> &[RawType] {
        &[]
    }

    fn claims(&self, type_info: &TypeInformation) -> bool {
        type_info.is_enum()
    }

    fn to_value(&self, node: &PropertyValue, target: &TypeInformation) -> Option<AnyValue> {
        match target.shape() {
            Shape::Enum(shape) => (shape.from_name)(node.as_str()?),
            _ => None,
        }
    }

    fn to_tree(&self, value: &dyn Any, source: &TypeInformation) -> Option<PropertyValue> {
        match source.shape() {
            Shape::Enum(shape) => (shape.to_name)(value).map(PropertyValue::from),
            _ => None,
        }
    }
}

type ReadFn<T> = Box<dyn Fn(&PropertyValue) -> Option<T> + Send + Sync>;
type WriteFn<T> = Box<dyn Fn(&T) -> Option<PropertyValue> + Send + Sync>;

/// Handler for a single user type, built from two closures.
///
/// ```ignore
/// registry.register(LeafHandler::<Port>::new(
///     |node| node.as_i64().and_then(|n| u16::try_from(n).ok()).map(Port),
///     |port| Some(PropertyValue::Integer(port.0.into())),
/// ));
/// ```
pub struct LeafHandler<T> {
    raw: [RawType; 1],
    read: ReadFn<T>,
    write: WriteFn<T>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any> LeafHandler<T> {
    pub fn new<R, W>(read: R, write: W) -> Self
    where
        R: Fn(&PropertyValue) -> Option<T> + Send + Sync + 'static,
        W: Fn(&T) -> Option<PropertyValue> + Send + Sync + 'static,
    {
        Self {
            raw: [RawType::Scalar(TypeId::of::<T>())],
            read: Box::new(read),
            write: Box::new(write),
            _marker: PhantomData,
        }
    }
}

impl<T: Any> TypeHandler for LeafHandler<T> {
    fn raw_types(&self) -> &[RawType] {
        &self.raw
    }

    /// Claims `T` itself, whatever raw family it was described with.
    fn claims(&self, type_info: &TypeInformation) -> bool {
        type_info.type_id() == TypeId::of::<T>()
    }

    fn to_value(&self, node: &PropertyValue, _target: &TypeInformation) -> Option<AnyValue> {
        (self.read)(node).map(|value| Box::new(value) as AnyValue)
    }

    fn to_tree(&self, value: &dyn Any, _source: &TypeInformation) -> Option<PropertyValue> {
        (self.write)(value.downcast_ref::<T>()?)
    }
}
