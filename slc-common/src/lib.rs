//! Slate Compiler - Common Types and Utilities
//!
//! This crate contains shared types, error definitions, and utilities
//! used across all components of the Slate compiler.

pub mod error;
pub mod scope;
pub mod source_loc;
pub mod types;

pub use error::{CompilerError, ErrorReporter};
pub use scope::{ScopeTable, SymbolMap};
pub use source_loc::{SourceLocation, SourceSpan};
pub use types::*;
