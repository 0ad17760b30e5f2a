//! The system type table.
//!
//! Primitive types form a closed enum with two pure predicates each: does a
//! constant kind fit the type, and does a literal's raw text parse as a
//! value of the type. User-defined struct types are registered dynamically
//! in a [`TypeRegistry`] under their fully qualified names; they accept no
//! kind and no value, so a custom-typed member can never carry a constant
//! initializer.
//!
//! The value predicate checks literal leaves only; folded constant
//! expressions are never range-checked. That gap is deliberate and the test
//! suite pins it.

use hashbrown::HashSet;

use crate::ast::{ConstantKind, NameId};

/// The fixed set of primitive member types. Each integer width has two
/// source spellings (`short`/`int16`, `long`/`int32`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    Int16,
    Int32,
    Int64,
    UInt16,
    UInt32,
    UInt64,
    Float,
    Double,
    LongDouble,
    Char,
    String,
    Boolean,
}

impl PrimitiveType {
    pub fn from_spelling(text: &str) -> Option<Self> {
        let ty = match text {
            "short" | "int16" => PrimitiveType::Int16,
            "long" | "int32" => PrimitiveType::Int32,
            "longlong" | "int64" => PrimitiveType::Int64,
            "unsignedshort" | "uint16" => PrimitiveType::UInt16,
            "unsignedlong" | "uint32" => PrimitiveType::UInt32,
            "unsignedlonglong" | "uint64" => PrimitiveType::UInt64,
            "float" => PrimitiveType::Float,
            "double" => PrimitiveType::Double,
            "longdouble" => PrimitiveType::LongDouble,
            "char" => PrimitiveType::Char,
            "string" => PrimitiveType::String,
            "boolean" => PrimitiveType::Boolean,
            _ => return None,
        };
        Some(ty)
    }

    /// Does a constant of `kind` fit this type?
    pub fn accepts_kind(self, kind: ConstantKind) -> bool {
        let expected = match self {
            PrimitiveType::Int16
            | PrimitiveType::Int32
            | PrimitiveType::Int64
            | PrimitiveType::UInt16
            | PrimitiveType::UInt32
            | PrimitiveType::UInt64 => ConstantKind::Integer,
            PrimitiveType::Float | PrimitiveType::Double | PrimitiveType::LongDouble => {
                ConstantKind::Float
            }
            PrimitiveType::Char => ConstantKind::Char,
            PrimitiveType::String => ConstantKind::String,
            PrimitiveType::Boolean => ConstantKind::Boolean,
        };
        kind == expected
    }

    /// Does this literal's raw source text parse as a value of this type?
    /// Quotes and suffixes are part of the raw text and stripped here.
    pub fn accepts_value(self, text: &str) -> bool {
        match self {
            PrimitiveType::Int16 => text.parse::<i16>().is_ok(),
            PrimitiveType::Int32 => text.parse::<i32>().is_ok(),
            PrimitiveType::Int64 => text.parse::<i64>().is_ok(),
            PrimitiveType::UInt16 => text.parse::<u16>().is_ok(),
            PrimitiveType::UInt32 => text.parse::<u32>().is_ok(),
            PrimitiveType::UInt64 => text.parse::<u64>().is_ok(),
            PrimitiveType::Float => text.trim_end_matches('f').parse::<f32>().is_ok(),
            PrimitiveType::Double => text.trim_end_matches('d').parse::<f64>().is_ok(),
            PrimitiveType::LongDouble => text.trim_end_matches('d').parse::<f64>().is_ok(),
            PrimitiveType::Char => {
                let inner = text.trim_matches('\'');
                inner.chars().count() == 1
            }
            PrimitiveType::String => true,
            PrimitiveType::Boolean => {
                text.eq_ignore_ascii_case("true") || text.eq_ignore_ascii_case("false")
            }
        }
    }
}

/// A resolved member type: a fixed primitive or a registered struct type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemType {
    Primitive(PrimitiveType),
    Custom(NameId),
}

impl SystemType {
    pub fn accepts_kind(self, kind: ConstantKind) -> bool {
        match self {
            SystemType::Primitive(p) => p.accepts_kind(kind),
            SystemType::Custom(_) => false,
        }
    }

    pub fn accepts_value(self, text: &str) -> bool {
        match self {
            SystemType::Primitive(p) => p.accepts_value(text),
            SystemType::Custom(_) => false,
        }
    }
}

/// Known types for one translation unit: the closed primitive set plus the
/// struct types pass 1 registered under their fully qualified names. An
/// explicit output of pass 1, threaded into pass 2.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    customs: HashSet<NameId>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        TypeRegistry::default()
    }

    pub fn register_custom(&mut self, qualified_name: NameId) {
        self.customs.insert(qualified_name);
    }

    pub fn contains_custom(&self, qualified_name: NameId) -> bool {
        self.customs.contains(&qualified_name)
    }

    /// Resolve a type spelling: primitives first, then registered struct
    /// types by fully qualified name.
    pub fn lookup(&self, text: &str) -> Option<SystemType> {
        if let Some(primitive) = PrimitiveType::from_spelling(text) {
            return Some(SystemType::Primitive(primitive));
        }
        let name = NameId::new(text);
        if self.customs.contains(&name) {
            return Some(SystemType::Custom(name));
        }
        None
    }
}
