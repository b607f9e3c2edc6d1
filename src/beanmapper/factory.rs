//! Discovery of a bean's mappable properties.
//!
//! # Responsibilities
//! - Pair getters and setters declared on a bean class (and its ancestors)
//! - Correlate properties with declared fields for ordering and exclusion
//! - Resolve export names and reject blank or clashing names
//! - Memoize the result per bean type
//!
//! # Naming Rules
//! - `get_x()` and `x()` are getters for `x`; `is_x()` is a getter for `x`
//!   only when it returns exactly `bool`, otherwise it is excluded entirely
//! - `set_x(value)` is the setter for `x`
//! - Static methods are never accessors
//! - Getter precedence for one property: `is_x` > `get_x` > `x`
//!
//! # Ordering
//! Properties backed by a non-static field with the same name come first, in
//! field order (ancestor fields first; a field redeclared in a subclass
//! replaces the ancestor's in place). The others follow in method declaration
//! order.

use std::any::TypeId;
use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use indexmap::IndexMap;

use crate::beanmapper::class::{Accessor, Bean, BeanClass, FieldDeclaration, MethodDeclaration};
use crate::beanmapper::description::BeanPropertyDescription;
use crate::error::{MappingError, MappingResult};
use crate::typeinfo::{RawType, Shape, TypeInformation};

/// Ordered property descriptions of one bean type.
pub type BeanProperties = Arc<[BeanPropertyDescription]>;

/// A bean type's declaration together with its described properties.
#[derive(Clone)]
pub(crate) struct DescribedBean {
    pub(crate) class: Arc<BeanClass>,
    pub(crate) properties: BeanProperties,
}

/// Builds and caches [`BeanPropertyDescription`] lists per bean type.
///
/// The declaration is kept next to the properties, so a cache hit never
/// rebuilds the bean class.
#[derive(Default)]
pub struct BeanDescriptionFactory {
    cache: DashMap<TypeId, DescribedBean>,
}

impl BeanDescriptionFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// All mappable properties of `B`.
    pub fn get_all_properties<B: Bean>(&self) -> MappingResult<BeanProperties> {
        self.described(TypeId::of::<B>(), B::bean_class)
            .map(|described| described.properties)
    }

    /// All mappable properties of the type; empty for non-bean types.
    pub fn get_all_properties_of(&self, type_info: &TypeInformation) -> MappingResult<BeanProperties> {
        match type_info.shape() {
            Shape::Bean(shape) => self
                .described(type_info.type_id(), shape.class)
                .map(|described| described.properties),
            _ => Ok(Arc::from(Vec::new())),
        }
    }

    /// Describes a declared class, computing it at most once per type.
    ///
    /// Errors are not cached: describing a faulty class fails every time.
    pub fn describe(&self, class: &BeanClass) -> MappingResult<BeanProperties> {
        self.described(class.type_id(), || class.clone())
            .map(|described| described.properties)
    }

    /// Cached description of the bean type `type_id`; `declare` only runs on
    /// a miss.
    pub(crate) fn described(
        &self,
        type_id: TypeId,
        declare: impl FnOnce() -> BeanClass,
    ) -> MappingResult<DescribedBean> {
        if let Some(cached) = self.cache.get(&type_id) {
            return Ok(cached.value().clone());
        }

        let class = declare();
        let properties: BeanProperties = collect_properties(&class)?.into();
        tracing::debug!(
            bean = class.name(),
            properties = properties.len(),
            "Described bean class"
        );
        // A concurrent fill for the same type computes an identical entry.
        let entry = self.cache.entry(type_id).or_insert(DescribedBean {
            class: Arc::new(class),
            properties,
        });
        Ok(entry.value().clone())
    }

    /// Number of bean types described so far.
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum GetterStyle {
    Bare,
    Get,
    Is,
}

enum Role<'a> {
    Getter(&'a str, GetterStyle),
    Setter(&'a str),
}

#[derive(Default)]
struct Candidate<'a> {
    getter: Option<(&'a MethodDeclaration, GetterStyle)>,
    setter: Option<&'a MethodDeclaration>,
}

struct Resolved {
    ordinal: Option<usize>,
    description: BeanPropertyDescription,
}

/// Role of an accessor method; methods declared by signature only have none.
fn classify(method: &MethodDeclaration) -> Option<Role<'_>> {
    if method.is_static {
        return None;
    }
    let name = method.name.as_str();
    match (&method.accessor, method.parameters.len(), &method.returns) {
        (Accessor::Getter(_), 0, Some(returns)) => {
            if let Some(property) = name.strip_prefix("is_") {
                // `is_` is reserved for plain booleans; `Option<bool>` and
                // friends are ambiguous and never matched.
                return (returns.raw_type() == RawType::Bool && !property.is_empty())
                    .then_some(Role::Getter(property, GetterStyle::Is));
            }
            if let Some(property) = name.strip_prefix("get_") {
                return (!property.is_empty()).then_some(Role::Getter(property, GetterStyle::Get));
            }
            if name.starts_with("set_") {
                return None;
            }
            Some(Role::Getter(name, GetterStyle::Bare))
        }
        (Accessor::Setter(_), 1, None) => name
            .strip_prefix("set_")
            .filter(|property| !property.is_empty())
            .map(Role::Setter),
        _ => None,
    }
}

fn collect_properties(class: &BeanClass) -> MappingResult<Vec<BeanPropertyDescription>> {
    if let Some(reason) = class.declaration_errors().first() {
        return Err(MappingError::InvalidDeclaration {
            bean: class.name(),
            reason: reason.clone(),
        });
    }

    let hierarchy = class.hierarchy();

    let mut fields: IndexMap<&str, &FieldDeclaration> = IndexMap::new();
    let mut methods: IndexMap<&str, &MethodDeclaration> = IndexMap::new();
    for declared in &hierarchy {
        // Redeclared fields keep the ancestor's position.
        for field in declared.fields() {
            fields.insert(field.name(), field);
        }
        for method in declared.methods() {
            methods.insert(method.name(), method);
        }
    }
    fields.retain(|_, field| !field.is_static());

    let mut candidates: IndexMap<&str, Candidate<'_>> = IndexMap::new();
    for &method in methods.values() {
        match classify(method) {
            Some(Role::Getter(property, style)) => {
                let candidate = candidates.entry(property).or_default();
                if candidate.getter.map_or(true, |(_, current)| style > current) {
                    candidate.getter = Some((method, style));
                }
            }
            Some(Role::Setter(property)) => {
                candidates.entry(property).or_default().setter = Some(method);
            }
            None => {}
        }
    }

    let mut resolved = Vec::new();
    for (property, candidate) in candidates {
        let (Some((getter, _)), Some(setter)) = (candidate.getter, candidate.setter) else {
            continue;
        };
        let (Accessor::Getter(read), Accessor::Setter(write)) = (&getter.accessor, &setter.accessor)
        else {
            continue;
        };
        let (Some(read_type), Some(write_type)) = (getter.returns(), setter.parameters().first())
        else {
            continue;
        };
        if !read_type.is_subtype_of(write_type) {
            tracing::warn!(
                bean = class.name(),
                property,
                getter = %read_type,
                setter = %write_type,
                "Getter and setter types are incompatible; property skipped"
            );
            continue;
        }

        let field = fields.get_full(property);
        let excluded = getter.marker.excludes()
            || setter.marker.excludes()
            || field.is_some_and(|(_, _, field)| field.marker.excludes());
        if excluded {
            tracing::trace!(bean = class.name(), property, "Property excluded by marker");
            continue;
        }

        let export_name = getter
            .marker
            .name
            .as_deref()
            .or(setter.marker.name.as_deref())
            .or_else(|| field.and_then(|(_, _, field)| field.marker.name.as_deref()))
            .unwrap_or(property);
        if export_name.trim().is_empty() {
            return Err(MappingError::EmptyExportName {
                bean: class.name(),
                property: property.to_string(),
            });
        }

        let mandatory = getter.marker.mandatory
            || setter.marker.mandatory
            || field.is_some_and(|(_, _, field)| field.marker.mandatory);

        resolved.push(Resolved {
            ordinal: field.map(|(index, _, _)| index),
            description: BeanPropertyDescription::new(
                export_name.to_string(),
                read_type.clone(),
                write_type.clone(),
                mandatory,
                read.clone(),
                write.clone(),
            ),
        });
    }

    // Stable: unmatched properties keep their encounter order.
    resolved.sort_by_key(|property| property.ordinal.unwrap_or(usize::MAX));

    let mut names = HashSet::new();
    for property in &resolved {
        if !names.insert(property.description.name()) {
            return Err(MappingError::DuplicateName {
                bean: class.name(),
                name: property.description.name().to_string(),
            });
        }
    }

    Ok(resolved.into_iter().map(|property| property.description).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Flags {
        verbose: bool,
        level: i32,
    }

    impl Bean for Flags {
        fn bean_class() -> BeanClass {
            BeanClass::builder::<Self>()
                .constructor(Flags::default)
                .field::<bool>("verbose")
                .field::<i32>("level")
                .getter("level", |f: &Flags| f.level)
                .setter("set_level", |f: &mut Flags, v: i32| f.level = v)
                .getter("get_verbose", |f: &Flags| f.verbose)
                .getter("is_verbose", |f: &Flags| f.verbose)
                .setter("set_verbose", |f: &mut Flags, v: bool| f.verbose = v)
                .build()
        }
    }

    #[test]
    fn test_getter_precedence_and_field_order() {
        let factory = BeanDescriptionFactory::new();
        let properties = factory.get_all_properties::<Flags>().unwrap();
        let names: Vec<_> = properties.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["verbose", "level"]);
    }

    #[test]
    fn test_results_are_cached() {
        let factory = BeanDescriptionFactory::new();
        let first = factory.get_all_properties::<Flags>().unwrap();
        let second = factory.get_all_properties::<Flags>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(factory.cached_count(), 1);
    }

    #[test]
    fn test_widening_setter_is_accepted() {
        #[derive(Default)]
        struct Wide {
            count: i64,
        }

        impl Bean for Wide {
            fn bean_class() -> BeanClass {
                BeanClass::builder::<Self>()
                    .constructor(Wide::default)
                    .getter("get_count", |w: &Wide| w.count as i32)
                    .setter("set_count", |w: &mut Wide, v: i64| w.count = v)
                    .build()
            }
        }

        let factory = BeanDescriptionFactory::new();
        let properties = factory.get_all_properties::<Wide>().unwrap();
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].type_information(), &TypeInformation::of::<i32>());
        assert_eq!(properties[0].write_type(), &TypeInformation::of::<i64>());
    }

    #[test]
    fn test_incompatible_pair_is_skipped() {
        #[derive(Default)]
        struct Mismatch {
            count: i64,
        }

        impl Bean for Mismatch {
            fn bean_class() -> BeanClass {
                BeanClass::builder::<Self>()
                    .getter("get_count", |m: &Mismatch| m.count)
                    .setter("set_count", |m: &mut Mismatch, v: i32| m.count = v.into())
                    .build()
            }
        }

        let factory = BeanDescriptionFactory::new();
        assert!(factory.get_all_properties::<Mismatch>().unwrap().is_empty());
    }

    #[test]
    fn test_signature_only_method_is_not_a_getter() {
        #[derive(Default)]
        struct Switch {
            on: bool,
        }

        impl Bean for Switch {
            fn bean_class() -> BeanClass {
                BeanClass::builder::<Self>()
                    .constructor(Switch::default)
                    .field::<bool>("on")
                    .method("is_on", Vec::new(), Some(TypeInformation::of::<bool>()))
                    .getter("get_on", |s: &Switch| s.on)
                    .setter("set_on", |s: &mut Switch, v: bool| s.on = v)
                    .build()
            }
        }

        let factory = BeanDescriptionFactory::new();
        let properties = factory.get_all_properties::<Switch>().unwrap();
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].name(), "on");

        let mut switch = Switch::default();
        assert!(properties[0].set_value(&mut switch, Box::new(true)));
        assert!(switch.on);
    }

    #[test]
    fn test_invalid_declaration_is_reported() {
        struct Broken;

        impl Bean for Broken {
            fn bean_class() -> BeanClass {
                BeanClass::builder::<Self>()
                    .field::<i32>("a")
                    .field::<i32>("a")
                    .build()
            }
        }

        let factory = BeanDescriptionFactory::new();
        let err = factory.get_all_properties::<Broken>().unwrap_err();
        assert!(matches!(err, MappingError::InvalidDeclaration { .. }));
        assert_eq!(factory.cached_count(), 0);
    }
}
