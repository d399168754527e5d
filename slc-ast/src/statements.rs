//! Statement AST nodes

use crate::decls::Block;
use crate::expressions::{Expression, Location, MethodCall};
use crate::ops::AssignOp;
use serde::{Deserialize, Serialize};
use slc_common::SourceSpan;

/// AST statement node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatementKind {
    /// `target = value`, `target += value`, `target -= value`
    Assign {
        target: Location,
        op: AssignOp,
        value: Expression,
    },

    /// Method call in statement position
    Call(MethodCall),

    /// `if (condition) block [else block]`
    If {
        condition: Expression,
        then_block: Block,
        else_block: Option<Block>,
    },

    /// `while (condition) block`
    While { condition: Expression, body: Block },

    /// `for var = from, to block` — counts `var` from `from` to `to`
    /// inclusive, stepping by one
    For {
        var: Location,
        from: Expression,
        to: Expression,
        body: Block,
    },

    Break,

    Continue,

    /// `return [expression]`
    Return(Option<Expression>),

    /// Nested block with its own scope level
    Block(Block),
}

impl Statement {
    pub fn new(kind: StatementKind, span: SourceSpan) -> Self {
        Self { kind, span }
    }

    pub fn assign(target: Location, value: Expression, span: SourceSpan) -> Self {
        Self::new(
            StatementKind::Assign {
                target,
                op: AssignOp::Assign,
                value,
            },
            span,
        )
    }

    pub fn compound_assign(
        target: Location,
        op: AssignOp,
        value: Expression,
        span: SourceSpan,
    ) -> Self {
        Self::new(StatementKind::Assign { target, op, value }, span)
    }

    pub fn ret(value: Option<Expression>, span: SourceSpan) -> Self {
        Self::new(StatementKind::Return(value), span)
    }
}
