//! Expression AST nodes

use crate::ops::{BinaryOp, UnaryOp};
use serde::{Deserialize, Serialize};
use slc_common::{SourceSpan, SymbolId, Type};
use std::fmt;

/// AST expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: SourceSpan,
    /// Filled during type checking
    #[serde(default)]
    pub expr_type: Option<Type>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpressionKind {
    /// Integer literal
    IntLiteral(i32),

    /// Floating-point literal
    FloatLiteral(f32),

    /// Boolean literal
    BoolLiteral(bool),

    /// Storage reference: a scalar variable or an array element
    Location(Location),

    /// Binary operation
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// Unary operation
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },

    /// Method call in expression position (non-void callee)
    Call(MethodCall),
}

impl Expression {
    pub fn new(kind: ExpressionKind, span: SourceSpan) -> Self {
        Self {
            kind,
            span,
            expr_type: None,
        }
    }

    pub fn int(value: i32, span: SourceSpan) -> Self {
        Self::new(ExpressionKind::IntLiteral(value), span)
    }

    pub fn float(value: f32, span: SourceSpan) -> Self {
        Self::new(ExpressionKind::FloatLiteral(value), span)
    }

    pub fn boolean(value: bool, span: SourceSpan) -> Self {
        Self::new(ExpressionKind::BoolLiteral(value), span)
    }

    pub fn location(location: Location) -> Self {
        let span = location.span;
        Self::new(ExpressionKind::Location(location), span)
    }

    pub fn binary(op: BinaryOp, left: Expression, right: Expression) -> Self {
        let span = left.span.extend(&right.span);
        Self::new(
            ExpressionKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    pub fn unary(op: UnaryOp, operand: Expression) -> Self {
        let span = operand.span;
        Self::new(
            ExpressionKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        )
    }

    pub fn call(call: MethodCall) -> Self {
        let span = call.span;
        Self::new(ExpressionKind::Call(call), span)
    }

    /// Whether lowering this expression needs no temporary
    pub fn is_free(&self) -> bool {
        matches!(
            self.kind,
            ExpressionKind::IntLiteral(_)
                | ExpressionKind::FloatLiteral(_)
                | ExpressionKind::BoolLiteral(_)
                | ExpressionKind::Location(_)
        )
    }
}

/// An expression denoting storage: `id`, `id[index]`, `Class.id` or
/// `Class.id[index]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Qualifier for the `Class.id` form
    #[serde(default)]
    pub class_name: Option<String>,
    pub name: String,
    /// Present for array-element access
    #[serde(default)]
    pub index: Option<Box<Expression>>,
    pub span: SourceSpan,
    /// Filled during declaration resolution
    #[serde(default)]
    pub symbol_id: Option<SymbolId>,
}

impl Location {
    pub fn scalar(name: &str, span: SourceSpan) -> Self {
        Self {
            class_name: None,
            name: name.to_string(),
            index: None,
            span,
            symbol_id: None,
        }
    }

    pub fn indexed(name: &str, index: Expression, span: SourceSpan) -> Self {
        Self {
            class_name: None,
            name: name.to_string(),
            index: Some(Box::new(index)),
            span,
            symbol_id: None,
        }
    }

    pub fn qualified(class_name: &str, name: &str, span: SourceSpan) -> Self {
        Self {
            class_name: Some(class_name.to_string()),
            name: name.to_string(),
            index: None,
            span,
            symbol_id: None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(class) = &self.class_name {
            write!(f, "{}.", class)?;
        }
        write!(f, "{}", self.name)?;
        if self.index.is_some() {
            write!(f, "[..]")?;
        }
        Ok(())
    }
}

/// A method invocation: `name(args)` or `Class.name(args)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    #[serde(default)]
    pub class_name: Option<String>,
    pub name: String,
    pub arguments: Vec<Expression>,
    pub span: SourceSpan,
    /// Filled during declaration resolution
    #[serde(default)]
    pub symbol_id: Option<SymbolId>,
}

impl MethodCall {
    pub fn new(name: &str, arguments: Vec<Expression>, span: SourceSpan) -> Self {
        Self {
            class_name: None,
            name: name.to_string(),
            arguments,
            span,
            symbol_id: None,
        }
    }
}
