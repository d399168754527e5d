//! Common types used throughout the compiler
//!
//! This module defines data types that are shared across multiple
//! compiler phases: the static type universe, symbols, and literals.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Symbol identifier, assigned by the Scope Table in declaration order
pub type SymbolId = u32;

/// The Slate type universe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Int,
    Float,
    Boolean,
    Void,
}

impl Type {
    /// Types that support the arithmetic operators
    pub fn is_arithmetic(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::Boolean => write!(f, "boolean"),
            Type::Void => write!(f, "void"),
        }
    }
}

/// Storage classes for declared symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageClass {
    /// Class fields: `.comm` storage, addressed by symbol name
    Global,
    /// Parameters, locals and temporaries: addressed relative to `%ebp`
    Local,
}

impl fmt::Display for StorageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageClass::Global => write!(f, "global"),
            StorageClass::Local => write!(f, "local"),
        }
    }
}

/// A literal constant value
///
/// Carried by literal expressions and, for the tree-walking interpreter
/// only, by symbols. Code generation never reads the symbol copy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LiteralValue {
    Int(i32),
    Float(f32),
    Bool(bool),
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Int(v) => write!(f, "{}", v),
            LiteralValue::Float(v) => write!(f, "{:?}", v),
            LiteralValue::Bool(v) => write!(f, "{}", v),
        }
    }
}

/// The shape of a declared symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SymbolKind {
    /// A scalar variable
    Scalar,
    /// An array with a fixed, positive capacity
    Array { capacity: u32 },
    /// A method; `params` drives arity and argument-type checks
    Method { params: Vec<Type> },
    /// A class name (a namespace for fields and methods)
    Class,
}

/// Symbol table entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: String,
    /// Declared type; the return type for methods
    pub ty: Type,
    pub kind: SymbolKind,
    pub storage: StorageClass,
    /// Frame offset relative to `%ebp`, filled in by the IR generator.
    /// Undefined until the owning declaration has been visited there.
    pub offset: Option<i32>,
    /// Interpreter-path current value; unused by code generation
    pub value: Option<LiteralValue>,
}

impl Symbol {
    pub fn new(id: SymbolId, name: String, ty: Type) -> Self {
        Self {
            id,
            name,
            ty,
            kind: SymbolKind::Scalar,
            storage: StorageClass::Local,
            offset: None,
            value: None,
        }
    }

    pub fn with_kind(mut self, kind: SymbolKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_storage(mut self, storage: StorageClass) -> Self {
        self.storage = storage;
        self
    }

    /// The array capacity, if this is an array symbol
    pub fn capacity(&self) -> Option<u32> {
        match self.kind {
            SymbolKind::Array { capacity } => Some(capacity),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, SymbolKind::Array { .. })
    }

    pub fn is_method(&self) -> bool {
        matches!(self.kind, SymbolKind::Method { .. })
    }
}
