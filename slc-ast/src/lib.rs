//! Slate Compiler - Abstract Syntax Tree
//!
//! Node types for the fully parsed program tree handed to the middle end
//! by the external parser. Every node carries a source span; locations and
//! method calls carry a `symbol_id` slot filled by the Declaration
//! Resolver, and expressions carry an `expr_type` slot filled by the Type
//! Checker. The serde form of [`Program`] is the parser hand-off format.

pub mod decls;
pub mod expressions;
pub mod ops;
pub mod statements;

pub use decls::{Block, ClassDecl, MethodDecl, Parameter, Program, VarDecl};
pub use expressions::{Expression, ExpressionKind, Location, MethodCall};
pub use ops::{AssignOp, BinaryOp, UnaryOp};
pub use statements::{Statement, StatementKind};
