//! Semantic analysis error definitions
//!
//! All variants convert into [`CompilerError`] so the passes can hand the
//! driver one homogeneous error list.

use slc_ast::{AssignOp, BinaryOp, UnaryOp};
use slc_common::{CompilerError, SourceLocation, Type};

/// Errors found by the Declaration Resolver and the Type Checker
#[derive(Debug, Clone, PartialEq)]
pub enum SemanticError {
    // Declaration-phase errors
    DuplicateDeclaration {
        name: String,
        location: SourceLocation,
    },
    UndeclaredVariable {
        name: String,
        location: SourceLocation,
    },
    UndeclaredArray {
        name: String,
        location: SourceLocation,
    },
    UndeclaredClass {
        name: String,
        location: SourceLocation,
    },
    UndeclaredMethod {
        name: String,
        location: SourceLocation,
    },
    ArgumentCountMismatch {
        method: String,
        expected: usize,
        found: usize,
        location: SourceLocation,
    },
    MissingReturn {
        method: String,
        location: SourceLocation,
    },
    UnexpectedReturn {
        method: String,
        location: SourceLocation,
    },
    BreakOutsideLoop {
        location: SourceLocation,
    },
    ContinueOutsideLoop {
        location: SourceLocation,
    },
    InvalidArrayCapacity {
        name: String,
        location: SourceLocation,
    },
    NoMainMethod,
    MultipleMainMethods {
        count: usize,
    },

    // Type-phase errors
    OperandTypeMismatch {
        op: BinaryOp,
        left: Type,
        right: Type,
        location: SourceLocation,
    },
    InvalidOperator {
        op: BinaryOp,
        operand: Type,
        location: SourceLocation,
    },
    InvalidUnaryOperator {
        op: UnaryOp,
        operand: Type,
        location: SourceLocation,
    },
    InvalidCompoundAssign {
        op: AssignOp,
        target: Type,
        location: SourceLocation,
    },
    AssignTypeMismatch {
        target: Type,
        value: Type,
        location: SourceLocation,
    },
    NonBooleanCondition {
        found: Type,
        location: SourceLocation,
    },
    NonIntForControl {
        found: Type,
        location: SourceLocation,
    },
    NonIntIndex {
        found: Type,
        location: SourceLocation,
    },
    ReturnTypeMismatch {
        expected: Type,
        found: Type,
        location: SourceLocation,
    },
    ArgumentTypeMismatch {
        method: String,
        position: usize,
        expected: Type,
        found: Type,
        location: SourceLocation,
    },
    VoidCallInExpression {
        method: String,
        location: SourceLocation,
    },
}

impl From<SemanticError> for CompilerError {
    fn from(err: SemanticError) -> Self {
        match err {
            SemanticError::DuplicateDeclaration { name, location } => {
                CompilerError::declaration_error(
                    format!("duplicate declaration of '{name}'"),
                    location,
                )
            }
            SemanticError::UndeclaredVariable { name, location } => {
                CompilerError::declaration_error(format!("variable '{name}' not declared"), location)
            }
            SemanticError::UndeclaredArray { name, location } => {
                CompilerError::declaration_error(format!("array '{name}' not declared"), location)
            }
            SemanticError::UndeclaredClass { name, location } => {
                CompilerError::declaration_error(format!("class '{name}' not declared"), location)
            }
            SemanticError::UndeclaredMethod { name, location } => {
                CompilerError::declaration_error(format!("method '{name}' not declared"), location)
            }
            SemanticError::ArgumentCountMismatch {
                method,
                expected,
                found,
                location,
            } => CompilerError::declaration_error(
                format!("method '{method}' expects {expected} argument(s), found {found}"),
                location,
            ),
            SemanticError::MissingReturn { method, location } => {
                CompilerError::declaration_error(
                    format!("non-void method '{method}' has no return statement"),
                    location,
                )
            }
            SemanticError::UnexpectedReturn { method, location } => {
                CompilerError::declaration_error(
                    format!("void method '{method}' must not contain a return statement"),
                    location,
                )
            }
            SemanticError::BreakOutsideLoop { location } => {
                CompilerError::declaration_error("break used outside a loop".to_string(), location)
            }
            SemanticError::ContinueOutsideLoop { location } => CompilerError::declaration_error(
                "continue used outside a loop".to_string(),
                location,
            ),
            SemanticError::InvalidArrayCapacity { name, location } => {
                CompilerError::declaration_error(
                    format!("array '{name}' must have a positive capacity"),
                    location,
                )
            }
            SemanticError::NoMainMethod => CompilerError::declaration_error(
                "program declares no 'main' method".to_string(),
                SourceLocation::dummy(),
            ),
            SemanticError::MultipleMainMethods { count } => CompilerError::declaration_error(
                format!("program declares {count} 'main' methods, expected exactly one"),
                SourceLocation::dummy(),
            ),

            SemanticError::OperandTypeMismatch {
                op,
                left,
                right,
                location,
            } => CompilerError::type_error(
                format!("operator '{op}' applied to mismatched types {left} and {right}"),
                location,
            ),
            SemanticError::InvalidOperator {
                op,
                operand,
                location,
            } => CompilerError::type_error(
                format!("operator '{op}' is not defined for type {operand}"),
                location,
            ),
            SemanticError::InvalidUnaryOperator {
                op,
                operand,
                location,
            } => CompilerError::type_error(
                format!("operator '{op}' is not defined for type {operand}"),
                location,
            ),
            SemanticError::InvalidCompoundAssign {
                op,
                target,
                location,
            } => CompilerError::type_error(
                format!("operator '{op}' requires an arithmetic target, found {target}"),
                location,
            ),
            SemanticError::AssignTypeMismatch {
                target,
                value,
                location,
            } => CompilerError::type_error(
                format!("cannot assign {value} to a location of type {target}"),
                location,
            ),
            SemanticError::NonBooleanCondition { found, location } => CompilerError::type_error(
                format!("condition must be boolean, found {found}"),
                location,
            ),
            SemanticError::NonIntForControl { found, location } => CompilerError::type_error(
                format!("for-loop control expression must be int, found {found}"),
                location,
            ),
            SemanticError::NonIntIndex { found, location } => CompilerError::type_error(
                format!("array index must be int, found {found}"),
                location,
            ),
            SemanticError::ReturnTypeMismatch {
                expected,
                found,
                location,
            } => CompilerError::type_error(
                format!("return type mismatch: expected {expected}, found {found}"),
                location,
            ),
            SemanticError::ArgumentTypeMismatch {
                method,
                position,
                expected,
                found,
                location,
            } => CompilerError::type_error(
                format!(
                    "argument {position} of '{method}' expects {expected}, found {found}"
                ),
                location,
            ),
            SemanticError::VoidCallInExpression { method, location } => CompilerError::type_error(
                format!("void method '{method}' used in an expression"),
                location,
            ),
        }
    }
}
