//! Explicit bean class declarations.
//!
//! A bean declares what reflection would otherwise discover: its fields (in
//! declaration order), its methods (accessors carry closures, other methods
//! only a signature), markers attached to either, a constructor and an
//! optional parent class.
//!
//! ```ignore
//! impl Bean for Server {
//!     fn bean_class() -> BeanClass {
//!         BeanClass::builder::<Self>()
//!             .constructor(Server::default)
//!             .field::<String>("host")
//!             .field::<u16>("port")
//!             .export_as("listen-port")
//!             .getter("get_host", |s: &Server| s.host.clone())
//!             .setter("set_host", |s: &mut Server, v: String| s.host = v)
//!             .getter("get_port", |s: &Server| s.port)
//!             .setter("set_port", |s: &mut Server, v: u16| s.port = v)
//!             .build()
//!     }
//! }
//! ```

use std::any::{Any, TypeId};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{MappingError, MappingResult};
use crate::typeinfo::{AnyValue, TypeInformation, Typed};

/// A type whose properties are mapped to and from a property tree.
pub trait Bean: Any {
    fn bean_class() -> BeanClass;
}

pub(crate) type Getter = Arc<dyn Fn(&dyn Any) -> Option<AnyValue> + Send + Sync>;
pub(crate) type Setter = Arc<dyn Fn(&mut dyn Any, AnyValue) -> bool + Send + Sync>;
type Constructor = Arc<dyn Fn() -> Result<AnyValue, String> + Send + Sync>;

/// Declarative flags attached to a field or accessor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportMarker {
    /// Explicit export name, overriding the derived property name.
    pub name: Option<String>,
    /// Never export this member.
    pub ignore: bool,
    pub transient: bool,
    /// A bean missing this property is not built at all.
    pub mandatory: bool,
}

impl ExportMarker {
    pub fn excludes(&self) -> bool {
        self.ignore || self.transient
    }
}

#[derive(Clone)]
pub struct FieldDeclaration {
    pub(crate) name: String,
    pub(crate) type_info: TypeInformation,
    pub(crate) is_static: bool,
    pub(crate) marker: ExportMarker,
}

impl FieldDeclaration {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_information(&self) -> &TypeInformation {
        &self.type_info
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn marker(&self) -> &ExportMarker {
        &self.marker
    }
}

#[derive(Clone)]
pub(crate) enum Accessor {
    Getter(Getter),
    Setter(Setter),
    None,
}

#[derive(Clone)]
pub struct MethodDeclaration {
    pub(crate) name: String,
    pub(crate) is_static: bool,
    pub(crate) parameters: Vec<TypeInformation>,
    pub(crate) returns: Option<TypeInformation>,
    pub(crate) marker: ExportMarker,
    pub(crate) accessor: Accessor,
}

impl MethodDeclaration {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Static methods have no receiver and are never accessors.
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn parameters(&self) -> &[TypeInformation] {
        &self.parameters
    }

    pub fn returns(&self) -> Option<&TypeInformation> {
        self.returns.as_ref()
    }

    pub fn marker(&self) -> &ExportMarker {
        &self.marker
    }
}

/// The declared shape of a bean type.
#[derive(Clone)]
pub struct BeanClass {
    type_id: TypeId,
    name: &'static str,
    constructor: Option<Constructor>,
    fields: Vec<FieldDeclaration>,
    methods: Vec<MethodDeclaration>,
    parent: Option<Box<BeanClass>>,
    errors: Vec<String>,
}

impl BeanClass {
    pub fn builder<B: Any>() -> BeanClassBuilder<B> {
        BeanClassBuilder {
            class: BeanClass {
                type_id: TypeId::of::<B>(),
                name: short_type_name(std::any::type_name::<B>()),
                constructor: None,
                fields: Vec::new(),
                methods: Vec::new(),
                parent: None,
                errors: Vec::new(),
            },
            last: None,
            _marker: PhantomData,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[FieldDeclaration] {
        &self.fields
    }

    pub fn methods(&self) -> &[MethodDeclaration] {
        &self.methods
    }

    /// Parent class, with accessors already rebound to this class's type.
    pub fn parent(&self) -> Option<&BeanClass> {
        self.parent.as_deref()
    }

    /// This class and its ancestors, root ancestor first.
    pub fn hierarchy(&self) -> Vec<&BeanClass> {
        let mut chain = Vec::new();
        let mut current = Some(self);
        while let Some(class) = current {
            chain.push(class);
            current = class.parent();
        }
        chain.reverse();
        chain
    }

    pub(crate) fn declaration_errors(&self) -> &[String] {
        &self.errors
    }

    pub(crate) fn instantiate(&self) -> MappingResult<AnyValue> {
        let constructor = self
            .constructor
            .as_ref()
            .ok_or_else(|| MappingError::Instantiation {
                bean: self.name,
                reason: "no constructor declared".to_string(),
            })?;
        constructor().map_err(|reason| MappingError::Instantiation {
            bean: self.name,
            reason,
        })
    }

    /// Rebinds every accessor of this class (and its ancestors) so it operates
    /// on a `B` that embeds `Self` as a `P`.
    fn rebind<B: Any, P: Any>(self, up: fn(&B) -> &P, up_mut: fn(&mut B) -> &mut P) -> BeanClass {
        let methods = self
            .methods
            .into_iter()
            .map(|method| MethodDeclaration {
                accessor: match method.accessor {
                    Accessor::Getter(inner) => Accessor::Getter(Arc::new(move |obj: &dyn Any| {
                        obj.downcast_ref::<B>()
                            .and_then(|bean| inner(up(bean) as &dyn Any))
                    })),
                    Accessor::Setter(inner) => {
                        Accessor::Setter(Arc::new(move |obj: &mut dyn Any, value: AnyValue| {
                            match obj.downcast_mut::<B>() {
                                Some(bean) => inner(up_mut(bean) as &mut dyn Any, value),
                                None => false,
                            }
                        }))
                    }
                    Accessor::None => Accessor::None,
                },
                ..method
            })
            .collect();
        BeanClass {
            methods,
            parent: self.parent.map(|parent| Box::new(parent.rebind(up, up_mut))),
            ..self
        }
    }
}

enum Member {
    Field(usize),
    Method(usize),
}

/// Fluent builder for a [`BeanClass`].
///
/// Marker methods (`export_as`, `ignored`, `transient`, `mandatory`) apply to
/// the most recently declared field or method.
pub struct BeanClassBuilder<B> {
    class: BeanClass,
    last: Option<Member>,
    _marker: PhantomData<fn() -> B>,
}

impl<B: Any> BeanClassBuilder<B> {
    /// No-argument constructor used to instantiate the bean.
    pub fn constructor(mut self, constructor: fn() -> B) -> Self {
        self.class.constructor = Some(Arc::new(move || Ok(Box::new(constructor()) as AnyValue)));
        self
    }

    /// Constructor that may fail.
    pub fn try_constructor<F>(mut self, constructor: F) -> Self
    where
        F: Fn() -> Result<B, String> + Send + Sync + 'static,
    {
        self.class.constructor =
            Some(Arc::new(move || constructor().map(|bean| Box::new(bean) as AnyValue)));
        self
    }

    /// Embeds a parent bean: its fields and methods are inherited, and any
    /// redeclared here replace the parent's.
    pub fn extends<P: Bean>(mut self, up: fn(&B) -> &P, up_mut: fn(&mut B) -> &mut P) -> Self {
        self.class.parent = Some(Box::new(P::bean_class().rebind(up, up_mut)));
        self
    }

    pub fn field<T: Typed>(self, name: &str) -> Self {
        self.push_field(name, TypeInformation::of::<T>(), false)
    }

    pub fn static_field<T: Typed>(self, name: &str) -> Self {
        self.push_field(name, TypeInformation::of::<T>(), true)
    }

    /// Zero-argument method returning a value.
    pub fn getter<T, F>(self, name: &str, getter: F) -> Self
    where
        T: Typed,
        F: Fn(&B) -> T + Send + Sync + 'static,
    {
        let erased: Getter = Arc::new(move |obj: &dyn Any| {
            obj.downcast_ref::<B>()
                .map(|bean| Box::new(getter(bean)) as AnyValue)
        });
        self.push_method(MethodDeclaration {
            name: name.to_string(),
            is_static: false,
            parameters: Vec::new(),
            returns: Some(TypeInformation::of::<T>()),
            marker: ExportMarker::default(),
            accessor: Accessor::Getter(erased),
        })
    }

    /// One-argument method returning nothing.
    pub fn setter<T, F>(self, name: &str, setter: F) -> Self
    where
        T: Typed,
        F: Fn(&mut B, T) + Send + Sync + 'static,
    {
        let erased: Setter = Arc::new(move |obj: &mut dyn Any, value: AnyValue| {
            match (obj.downcast_mut::<B>(), value.downcast::<T>()) {
                (Some(bean), Ok(value)) => {
                    setter(bean, *value);
                    true
                }
                _ => false,
            }
        });
        self.push_method(MethodDeclaration {
            name: name.to_string(),
            is_static: false,
            parameters: vec![TypeInformation::of::<T>()],
            returns: None,
            marker: ExportMarker::default(),
            accessor: Accessor::Setter(erased),
        })
    }

    /// Associated function without receiver, returning `R`.
    pub fn static_method<R: Typed>(self, name: &str) -> Self {
        self.push_method(MethodDeclaration {
            name: name.to_string(),
            is_static: true,
            parameters: Vec::new(),
            returns: Some(TypeInformation::of::<R>()),
            marker: ExportMarker::default(),
            accessor: Accessor::None,
        })
    }

    /// Any other instance method, declared by signature only.
    pub fn method(
        self,
        name: &str,
        parameters: Vec<TypeInformation>,
        returns: Option<TypeInformation>,
    ) -> Self {
        self.push_method(MethodDeclaration {
            name: name.to_string(),
            is_static: false,
            parameters,
            returns,
            marker: ExportMarker::default(),
            accessor: Accessor::None,
        })
    }

    pub fn export_as(self, name: &str) -> Self {
        let name = name.to_string();
        self.mark("export_as", move |marker| marker.name = Some(name))
    }

    pub fn ignored(self) -> Self {
        self.mark("ignored", |marker| marker.ignore = true)
    }

    pub fn transient(self) -> Self {
        self.mark("transient", |marker| marker.transient = true)
    }

    pub fn mandatory(self) -> Self {
        self.mark("mandatory", |marker| marker.mandatory = true)
    }

    pub fn build(self) -> BeanClass {
        self.class
    }

    fn push_field(mut self, name: &str, type_info: TypeInformation, is_static: bool) -> Self {
        if self.class.fields.iter().any(|field| field.name == name) {
            self.class.errors.push(format!("field '{name}' declared twice"));
        }
        self.class.fields.push(FieldDeclaration {
            name: name.to_string(),
            type_info,
            is_static,
            marker: ExportMarker::default(),
        });
        self.last = Some(Member::Field(self.class.fields.len() - 1));
        self
    }

    fn push_method(mut self, method: MethodDeclaration) -> Self {
        if self.class.methods.iter().any(|existing| existing.name == method.name) {
            self.class
                .errors
                .push(format!("method '{}' declared twice", method.name));
        }
        self.class.methods.push(method);
        self.last = Some(Member::Method(self.class.methods.len() - 1));
        self
    }

    fn mark(mut self, what: &str, apply: impl FnOnce(&mut ExportMarker)) -> Self {
        match self.last {
            Some(Member::Field(index)) => apply(&mut self.class.fields[index].marker),
            Some(Member::Method(index)) => apply(&mut self.class.methods[index].marker),
            None => self
                .class
                .errors
                .push(format!("'{what}' used before any field or method")),
        }
        self
    }
}

fn short_type_name(full: &'static str) -> &'static str {
    // Keep generic arguments intact: only strip the module path of the outer type.
    let outer = full.split('<').next().unwrap_or(full);
    match outer.rfind("::") {
        Some(index) => &full[index + 2..],
        None => full,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Base {
        id: i64,
    }

    impl Bean for Base {
        fn bean_class() -> BeanClass {
            BeanClass::builder::<Self>()
                .constructor(Base::default)
                .field::<i64>("id")
                .getter("get_id", |b: &Base| b.id)
                .setter("set_id", |b: &mut Base, v: i64| b.id = v)
                .build()
        }
    }

    #[derive(Default)]
    struct Derived {
        base: Base,
        label: String,
    }

    impl Bean for Derived {
        fn bean_class() -> BeanClass {
            BeanClass::builder::<Self>()
                .constructor(Derived::default)
                .extends::<Base>(|d| &d.base, |d| &mut d.base)
                .field::<String>("label")
                .export_as("the-label")
                .getter("get_label", |d: &Derived| d.label.clone())
                .setter("set_label", |d: &mut Derived, v: String| d.label = v)
                .build()
        }
    }

    #[test]
    fn test_builder_records_declarations() {
        let class = Derived::bean_class();
        assert_eq!(class.name(), "Derived");
        assert_eq!(class.fields().len(), 1);
        assert_eq!(class.fields()[0].marker().name.as_deref(), Some("the-label"));
        assert_eq!(class.methods().len(), 2);
        assert!(class.declaration_errors().is_empty());

        let hierarchy: Vec<_> = class.hierarchy().iter().map(|c| c.name()).collect();
        assert_eq!(hierarchy, vec!["Base", "Derived"]);
    }

    #[test]
    fn test_parent_accessors_are_rebound() {
        let class = Derived::bean_class();
        let parent = class.parent().unwrap();
        let (getter, setter) = match (&parent.methods()[0].accessor, &parent.methods()[1].accessor) {
            (Accessor::Getter(g), Accessor::Setter(s)) => (g.clone(), s.clone()),
            _ => panic!("unexpected accessors"),
        };

        let mut bean = class.instantiate().unwrap();
        assert!(setter(&mut *bean, Box::new(42i64) as AnyValue));
        let id = getter(&*bean).unwrap();
        assert_eq!(id.downcast_ref::<i64>(), Some(&42));
        assert_eq!(bean.downcast_ref::<Derived>().unwrap().base.id, 42);
    }

    #[test]
    fn test_marker_without_member_is_recorded() {
        let class = BeanClass::builder::<Base>().transient().build();
        assert_eq!(class.declaration_errors().len(), 1);
    }

    #[test]
    fn test_missing_constructor() {
        let class = BeanClass::builder::<Base>().build();
        let err = class.instantiate().err().unwrap();
        assert!(matches!(err, MappingError::Instantiation { .. }));
    }
}
