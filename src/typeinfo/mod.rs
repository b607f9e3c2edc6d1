//! Type descriptors for the bean mapper.
//!
//! # Responsibilities
//! - Describe a (possibly generic) Rust type: its family, generic arguments
//!   and how values of it are built from / broken into parts
//! - Answer subtype, collection, map and array questions
//!
//! # Design Decisions
//! - Explicit `Typed` implementations replace runtime reflection; every
//!   descriptor carries function pointers ("shapes") that let the mapper build
//!   and inspect values behind `dyn Any`
//! - Bean shapes hold a function producing the class declaration, so
//!   recursive bean types never recurse while describing themselves

mod impls;
pub mod raw;

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::beanmapper::class::{Bean, BeanClass};

pub use raw::RawType;

/// A type-erased value produced or consumed by the mapper.
pub type AnyValue = Box<dyn Any>;

/// Types the mapper knows how to describe.
pub trait Typed: Any {
    fn type_information() -> TypeInformation;
}

/// Enums mapped by variant name.
pub trait ConfigEnum: Any + Clone {
    /// All variants, in declaration order.
    fn variants() -> &'static [Self];

    /// The name used in the property tree.
    fn name(&self) -> &'static str;
}

#[derive(Clone, Copy)]
pub(crate) struct EnumShape {
    pub(crate) from_name: fn(&str) -> Option<AnyValue>,
    pub(crate) to_name: fn(&dyn Any) -> Option<&'static str>,
}

#[derive(Clone, Copy)]
pub(crate) struct OptionalShape {
    pub(crate) wrap: fn(AnyValue) -> Option<AnyValue>,
    pub(crate) inner: fn(&dyn Any) -> Option<Option<&dyn Any>>,
}

#[derive(Clone, Copy)]
pub(crate) struct SequenceShape {
    pub(crate) collect: fn(Vec<AnyValue>) -> Option<AnyValue>,
    pub(crate) elements: fn(&dyn Any) -> Option<Vec<&dyn Any>>,
}

#[derive(Clone, Copy)]
pub(crate) struct MapShape {
    pub(crate) collect: fn(Vec<(String, AnyValue)>) -> Option<AnyValue>,
    pub(crate) entries: fn(&dyn Any) -> Option<Vec<(&str, &dyn Any)>>,
}

#[derive(Clone, Copy)]
pub(crate) struct BeanShape {
    pub(crate) class: fn() -> BeanClass,
}

/// How values of a type are assembled and taken apart.
#[derive(Clone, Copy)]
pub(crate) enum Shape {
    Leaf,
    Enum(EnumShape),
    Optional(OptionalShape),
    Sequence(SequenceShape),
    Map(MapShape),
    Bean(BeanShape),
}

/// Descriptor of a possibly generic type.
///
/// Two descriptors are equal when they describe the same concrete type.
#[derive(Clone)]
pub struct TypeInformation {
    id: TypeId,
    name: &'static str,
    raw: RawType,
    generics: Vec<TypeInformation>,
    shape: Shape,
}

impl TypeInformation {
    /// Descriptor of `T`.
    pub fn of<T: Typed>() -> Self {
        T::type_information()
    }

    /// Descriptor of a user scalar type, converted by a registered handler.
    pub fn scalar<T: Any>() -> Self {
        Self::leaf::<T>(RawType::Scalar(TypeId::of::<T>()))
    }

    /// Descriptor of an enum mapped by variant name.
    pub fn enumeration<E: ConfigEnum>() -> Self {
        Self::new::<E>(
            RawType::Enum(TypeId::of::<E>()),
            Vec::new(),
            Shape::Enum(EnumShape {
                from_name: enum_from_name::<E>,
                to_name: enum_to_name::<E>,
            }),
        )
    }

    /// Descriptor of a bean type.
    pub fn bean<B: Bean>() -> Self {
        Self::new::<B>(
            RawType::Bean(TypeId::of::<B>()),
            Vec::new(),
            Shape::Bean(BeanShape {
                class: B::bean_class,
            }),
        )
    }

    pub(crate) fn leaf<T: Any>(raw: RawType) -> Self {
        Self::new::<T>(raw, Vec::new(), Shape::Leaf)
    }

    pub(crate) fn new<T: Any>(raw: RawType, generics: Vec<TypeInformation>, shape: Shape) -> Self {
        debug_assert_eq!(raw.parameter_count(), generics.len());
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            raw,
            generics,
            shape,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Full type name, for diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn raw_type(&self) -> RawType {
        self.raw
    }

    pub fn generics(&self) -> &[TypeInformation] {
        &self.generics
    }

    /// Generic argument at `index`, or `None` when out of range.
    pub fn generic_type(&self, index: usize) -> Option<&TypeInformation> {
        self.generics.get(index)
    }

    /// Whether a value of `self` can stand in for `other`: identical types,
    /// lossless numeric widening, or containers of the same family whose
    /// arguments are subtypes (covariance).
    pub fn is_subtype_of(&self, other: &TypeInformation) -> bool {
        if self.id == other.id {
            return true;
        }
        if self.raw.is_number() && other.raw.is_number() {
            return self.raw.widens_to(other.raw);
        }
        if self.raw != other.raw
            || self.generics.is_empty()
            || self.generics.len() != other.generics.len()
        {
            return false;
        }
        self.generics
            .iter()
            .zip(&other.generics)
            .all(|(mine, theirs)| mine.is_subtype_of(theirs))
    }

    /// Growable collections (`Vec`, `VecDeque` and the set types).
    pub fn is_collection(&self) -> bool {
        use RawType::*;
        matches!(self.raw, Vec | VecDeque | BTreeSet | HashSet | IndexSet)
    }

    pub fn is_array(&self) -> bool {
        matches!(self.raw, RawType::Array(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self.shape, Shape::Map(_))
    }

    pub fn is_optional(&self) -> bool {
        matches!(self.shape, Shape::Optional(_))
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.shape, Shape::Enum(_))
    }

    pub fn is_bean(&self) -> bool {
        matches!(self.shape, Shape::Bean(_))
    }

    /// Element type of a collection, array or option.
    pub fn element_type(&self) -> Option<&TypeInformation> {
        match self.shape {
            Shape::Sequence(_) | Shape::Optional(_) => self.generic_type(0),
            _ => None,
        }
    }

    /// Value type of a map.
    pub fn map_value_type(&self) -> Option<&TypeInformation> {
        match self.shape {
            Shape::Map(_) => self.generic_type(1),
            _ => None,
        }
    }

    /// Declared class of a bean type.
    pub fn bean_class(&self) -> Option<BeanClass> {
        match self.shape {
            Shape::Bean(shape) => Some((shape.class)()),
            _ => None,
        }
    }

    pub(crate) fn shape(&self) -> &Shape {
        &self.shape
    }
}

impl PartialEq for TypeInformation {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInformation {}

impl Hash for TypeInformation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInformation")
            .field("name", &self.name)
            .field("raw", &self.raw)
            .finish()
    }
}

impl fmt::Display for TypeInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

fn enum_from_name<E: ConfigEnum>(name: &str) -> Option<AnyValue> {
    E::variants()
        .iter()
        .find(|variant| variant.name() == name)
        .map(|variant| Box::new(variant.clone()) as AnyValue)
}

fn enum_to_name<E: ConfigEnum>(value: &dyn Any) -> Option<&'static str> {
    value.downcast_ref::<E>().map(|variant| variant.name())
}

/// Implements [`Typed`] for bean types through [`TypeInformation::bean`].
#[macro_export]
macro_rules! typed_bean {
    ($($bean:ty),+ $(,)?) => {
        $(
            impl $crate::typeinfo::Typed for $bean {
                fn type_information() -> $crate::typeinfo::TypeInformation {
                    $crate::typeinfo::TypeInformation::bean::<Self>()
                }
            }
        )+
    };
}

/// Implements [`Typed`] for enums through [`TypeInformation::enumeration`].
#[macro_export]
macro_rules! typed_enum {
    ($($enum:ty),+ $(,)?) => {
        $(
            impl $crate::typeinfo::Typed for $enum {
                fn type_information() -> $crate::typeinfo::TypeInformation {
                    $crate::typeinfo::TypeInformation::enumeration::<Self>()
                }
            }
        )+
    };
}
