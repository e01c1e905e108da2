//! # Primitive Types
//!
//! The four primitive types `uxncle` programs can be typed with, plus the
//! conversion rules the code generator uses when an expression of one type
//! flows into a context that expects another.

/// Maximum number of variables a single scope may declare.
pub const MAX_LOCALS: usize = 128;

/// Maximum number of scopes that may be simultaneously active (nested).
pub const MAX_SCOPES: usize = 32;

/// A primitive Uxncle type. `None` is an internal sentinel — it is never
/// spelled in source and never the declared type of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    Int,
    Char,
    Bool,
    None,
}

impl PrimitiveType {
    /// Size of a value of this type in bytes, as stored in the uxncle heap.
    pub fn size(self) -> u16 {
        match self {
            PrimitiveType::Int => 2,
            PrimitiveType::Char | PrimitiveType::Bool => 1,
            PrimitiveType::None => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Int => "int",
            PrimitiveType::Char => "char",
            PrimitiveType::Bool => "bool",
            PrimitiveType::None => "none",
        }
    }
}

impl std::fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
