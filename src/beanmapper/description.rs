//! Description of a single mappable bean property.

use std::any::Any;
use std::fmt;

use crate::beanmapper::class::{Getter, Setter};
use crate::typeinfo::{AnyValue, TypeInformation};

/// A property discovered on a bean class: export name, type and the
/// accessor pair used to read and write it.
#[derive(Clone)]
pub struct BeanPropertyDescription {
    name: String,
    type_info: TypeInformation,
    write_type: TypeInformation,
    mandatory: bool,
    getter: Getter,
    setter: Setter,
}

impl BeanPropertyDescription {
    pub(crate) fn new(
        name: String,
        type_info: TypeInformation,
        write_type: TypeInformation,
        mandatory: bool,
        getter: Getter,
        setter: Setter,
    ) -> Self {
        Self {
            name,
            type_info,
            write_type,
            mandatory,
            getter,
            setter,
        }
    }

    /// Name of the property in the tree.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type returned by the getter.
    pub fn type_information(&self) -> &TypeInformation {
        &self.type_info
    }

    /// Type accepted by the setter. The getter type is a subtype of it.
    pub fn write_type(&self) -> &TypeInformation {
        &self.write_type
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    /// Reads the property from `bean`; `None` if `bean` is of another type.
    pub fn get_value(&self, bean: &dyn Any) -> Option<AnyValue> {
        (self.getter)(bean)
    }

    /// Writes `value` (of the write type) to `bean`. Returns false when
    /// either does not have the expected type.
    pub fn set_value(&self, bean: &mut dyn Any, value: AnyValue) -> bool {
        (self.setter)(bean, value)
    }
}

impl fmt::Debug for BeanPropertyDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanPropertyDescription")
            .field("name", &self.name)
            .field("type", &self.type_info.name())
            .field("mandatory", &self.mandatory)
            .finish()
    }
}
