//! Raw type families (a type without its generic arguments).

use std::any::TypeId;

/// The family of a type, ignoring generic arguments.
///
/// Standard library types get their own variant; enums, beans and user scalar
/// types are nominal and identified by their `TypeId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
    Vec,
    VecDeque,
    BTreeSet,
    HashSet,
    IndexSet,
    BTreeMap,
    HashMap,
    IndexMap,
    /// Fixed-size array `[T; N]`.
    Array(usize),
    Option,
    Enum(TypeId),
    Bean(TypeId),
    Scalar(TypeId),
}

impl RawType {
    pub fn is_integer(self) -> bool {
        use RawType::*;
        matches!(self, I8 | I16 | I32 | I64 | U8 | U16 | U32 | U64)
    }

    pub fn is_float(self) -> bool {
        matches!(self, RawType::F32 | RawType::F64)
    }

    pub fn is_number(self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Number of generic parameters the family declares.
    pub fn parameter_count(self) -> usize {
        use RawType::*;
        match self {
            Vec | VecDeque | BTreeSet | HashSet | IndexSet | Array(_) | Option => 1,
            BTreeMap | HashMap | IndexMap => 2,
            _ => 0,
        }
    }

    /// Lossless numeric widening, following the `From` conversions the
    /// standard library provides between primitive numbers.
    pub fn widens_to(self, target: RawType) -> bool {
        use RawType::*;
        if self == target {
            return true;
        }
        matches!(
            (self, target),
            (I8, I16 | I32 | I64 | F32 | F64)
                | (I16, I32 | I64 | F32 | F64)
                | (I32, I64 | F64)
                | (U8, U16 | U32 | U64 | I16 | I32 | I64 | F32 | F64)
                | (U16, U32 | U64 | I32 | I64 | F32 | F64)
                | (U32, U64 | I64 | F64)
                | (F32, F64)
        )
    }
}
