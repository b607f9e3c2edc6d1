//! `Typed` implementations for primitives and standard containers.

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::Hash;

use indexmap::{IndexMap, IndexSet};

use super::{AnyValue, MapShape, OptionalShape, RawType, SequenceShape, Shape, TypeInformation, Typed};

macro_rules! leaf_types {
    ($($ty:ty => $raw:ident),+ $(,)?) => {
        $(
            impl Typed for $ty {
                fn type_information() -> TypeInformation {
                    TypeInformation::leaf::<$ty>(RawType::$raw)
                }
            }
        )+
    };
}

leaf_types! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => String,
}

fn collect_items<T: Any, C: FromIterator<T> + Any>(items: Vec<AnyValue>) -> Option<AnyValue> {
    items
        .into_iter()
        .map(|item| item.downcast::<T>().ok().map(|item| *item))
        .collect::<Option<C>>()
        .map(|collected| Box::new(collected) as AnyValue)
}

fn collect_entries<V: Any, C: FromIterator<(String, V)> + Any>(
    entries: Vec<(String, AnyValue)>,
) -> Option<AnyValue> {
    entries
        .into_iter()
        .map(|(key, value)| value.downcast::<V>().ok().map(|value| (key, *value)))
        .collect::<Option<C>>()
        .map(|collected| Box::new(collected) as AnyValue)
}

fn sequence<C: Any, T: Typed>(
    raw: RawType,
    collect: fn(Vec<AnyValue>) -> Option<AnyValue>,
    elements: fn(&dyn Any) -> Option<Vec<&dyn Any>>,
) -> TypeInformation {
    TypeInformation::new::<C>(
        raw,
        vec![T::type_information()],
        Shape::Sequence(SequenceShape { collect, elements }),
    )
}

fn map<C: Any, V: Typed>(
    raw: RawType,
    collect: fn(Vec<(String, AnyValue)>) -> Option<AnyValue>,
    entries: fn(&dyn Any) -> Option<Vec<(&str, &dyn Any)>>,
) -> TypeInformation {
    TypeInformation::new::<C>(
        raw,
        vec![String::type_information(), V::type_information()],
        Shape::Map(MapShape { collect, entries }),
    )
}

impl<T: Typed> Typed for Vec<T> {
    fn type_information() -> TypeInformation {
        fn elements<T: Any>(value: &dyn Any) -> Option<Vec<&dyn Any>> {
            let items = value.downcast_ref::<Vec<T>>()?;
            Some(items.iter().map(|item| item as &dyn Any).collect())
        }
        sequence::<Self, T>(RawType::Vec, collect_items::<T, Self>, elements::<T>)
    }
}

impl<T: Typed> Typed for VecDeque<T> {
    fn type_information() -> TypeInformation {
        fn elements<T: Any>(value: &dyn Any) -> Option<Vec<&dyn Any>> {
            let items = value.downcast_ref::<VecDeque<T>>()?;
            Some(items.iter().map(|item| item as &dyn Any).collect())
        }
        sequence::<Self, T>(RawType::VecDeque, collect_items::<T, Self>, elements::<T>)
    }
}

impl<T: Typed + Ord> Typed for BTreeSet<T> {
    fn type_information() -> TypeInformation {
        fn elements<T: Any + Ord>(value: &dyn Any) -> Option<Vec<&dyn Any>> {
            let items = value.downcast_ref::<BTreeSet<T>>()?;
            Some(items.iter().map(|item| item as &dyn Any).collect())
        }
        sequence::<Self, T>(RawType::BTreeSet, collect_items::<T, Self>, elements::<T>)
    }
}

impl<T: Typed + Hash + Eq> Typed for HashSet<T> {
    fn type_information() -> TypeInformation {
        fn elements<T: Any + Hash + Eq>(value: &dyn Any) -> Option<Vec<&dyn Any>> {
            let items = value.downcast_ref::<HashSet<T>>()?;
            Some(items.iter().map(|item| item as &dyn Any).collect())
        }
        sequence::<Self, T>(RawType::HashSet, collect_items::<T, Self>, elements::<T>)
    }
}

impl<T: Typed + Hash + Eq> Typed for IndexSet<T> {
    fn type_information() -> TypeInformation {
        fn elements<T: Any + Hash + Eq>(value: &dyn Any) -> Option<Vec<&dyn Any>> {
            let items = value.downcast_ref::<IndexSet<T>>()?;
            Some(items.iter().map(|item| item as &dyn Any).collect())
        }
        sequence::<Self, T>(RawType::IndexSet, collect_items::<T, Self>, elements::<T>)
    }
}

impl<T: Typed, const N: usize> Typed for [T; N] {
    fn type_information() -> TypeInformation {
        fn collect<T: Any, const N: usize>(items: Vec<AnyValue>) -> Option<AnyValue> {
            let items = items
                .into_iter()
                .map(|item| item.downcast::<T>().ok().map(|item| *item))
                .collect::<Option<Vec<T>>>()?;
            let array: [T; N] = items.try_into().ok()?;
            Some(Box::new(array))
        }
        fn elements<T: Any, const N: usize>(value: &dyn Any) -> Option<Vec<&dyn Any>> {
            let items = value.downcast_ref::<[T; N]>()?;
            Some(items.iter().map(|item| item as &dyn Any).collect())
        }
        sequence::<Self, T>(RawType::Array(N), collect::<T, N>, elements::<T, N>)
    }
}

impl<V: Typed> Typed for IndexMap<String, V> {
    fn type_information() -> TypeInformation {
        fn entries<V: Any>(value: &dyn Any) -> Option<Vec<(&str, &dyn Any)>> {
            let map = value.downcast_ref::<IndexMap<String, V>>()?;
            Some(map.iter().map(|(k, v)| (k.as_str(), v as &dyn Any)).collect())
        }
        map::<Self, V>(RawType::IndexMap, collect_entries::<V, Self>, entries::<V>)
    }
}

impl<V: Typed> Typed for BTreeMap<String, V> {
    fn type_information() -> TypeInformation {
        fn entries<V: Any>(value: &dyn Any) -> Option<Vec<(&str, &dyn Any)>> {
            let map = value.downcast_ref::<BTreeMap<String, V>>()?;
            Some(map.iter().map(|(k, v)| (k.as_str(), v as &dyn Any)).collect())
        }
        map::<Self, V>(RawType::BTreeMap, collect_entries::<V, Self>, entries::<V>)
    }
}

impl<V: Typed> Typed for HashMap<String, V> {
    fn type_information() -> TypeInformation {
        fn entries<V: Any>(value: &dyn Any) -> Option<Vec<(&str, &dyn Any)>> {
            let map = value.downcast_ref::<HashMap<String, V>>()?;
            Some(map.iter().map(|(k, v)| (k.as_str(), v as &dyn Any)).collect())
        }
        map::<Self, V>(RawType::HashMap, collect_entries::<V, Self>, entries::<V>)
    }
}

impl<T: Typed> Typed for Option<T> {
    fn type_information() -> TypeInformation {
        fn wrap<T: Any>(value: AnyValue) -> Option<AnyValue> {
            let value = value.downcast::<T>().ok()?;
            Some(Box::new(Some(*value)))
        }
        fn inner<T: Any>(value: &dyn Any) -> Option<Option<&dyn Any>> {
            let value = value.downcast_ref::<Option<T>>()?;
            Some(value.as_ref().map(|inner| inner as &dyn Any))
        }
        TypeInformation::new::<Self>(
            RawType::Option,
            vec![T::type_information()],
            Shape::Optional(OptionalShape {
                wrap: wrap::<T>,
                inner: inner::<T>,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape_of(ty: &TypeInformation) -> SequenceShape {
        match ty.shape() {
            Shape::Sequence(shape) => *shape,
            _ => panic!("{ty} is not a sequence"),
        }
    }

    #[test]
    fn test_sequence_shape_builds_and_inspects() {
        let ty = TypeInformation::of::<Vec<i32>>();
        let shape = shape_of(&ty);

        let built = (shape.collect)(vec![Box::new(1i32) as AnyValue, Box::new(2i32) as AnyValue]).unwrap();
        let built = built.downcast::<Vec<i32>>().unwrap();
        assert_eq!(*built, vec![1, 2]);

        let elements = (shape.elements)(&*built).unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[1].downcast_ref::<i32>(), Some(&2));
    }

    #[test]
    fn test_sequence_shape_rejects_wrong_element_type() {
        let shape = shape_of(&TypeInformation::of::<Vec<i32>>());
        assert!((shape.collect)(vec![Box::new("text".to_string()) as AnyValue]).is_none());
    }

    #[test]
    fn test_array_requires_exact_length() {
        let shape = shape_of(&TypeInformation::of::<[u8; 2]>());
        assert!((shape.collect)(vec![Box::new(1u8) as AnyValue]).is_none());
        let built = (shape.collect)(vec![Box::new(1u8) as AnyValue, Box::new(2u8) as AnyValue]).unwrap();
        assert_eq!(*built.downcast::<[u8; 2]>().unwrap(), [1, 2]);
    }

    #[test]
    fn test_set_keeps_first_occurrence_order() {
        let shape = shape_of(&TypeInformation::of::<IndexSet<String>>());
        let built = (shape.collect)(vec![
            Box::new("b".to_string()) as AnyValue,
            Box::new("a".to_string()) as AnyValue,
            Box::new("b".to_string()) as AnyValue,
        ])
        .unwrap();
        let set = built.downcast::<IndexSet<String>>().unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["b", "a"]);
    }
}
