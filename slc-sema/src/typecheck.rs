//! The Type Checker
//!
//! Second traversal over the resolved tree. Assigns a static type to
//! every expression in post-order and validates operator, assignment,
//! condition and return-type rules. Expression checking returns
//! `Option<Type>`: `None` means a sub-expression already produced an
//! error, and the enclosing construct stops descending instead of piling
//! cascaded diagnostics on top.
//!
//! Requires the Declaration Resolver to have completed without error; the
//! driver skips this pass otherwise.

use crate::errors::SemanticError;
use slc_ast::*;
use slc_common::{CompilerError, SymbolKind, SymbolMap, Type};

/// Type checking pass
pub struct TypeChecker<'a> {
    symbols: &'a SymbolMap,
    current_return: Type,
    errors: Vec<CompilerError>,
}

impl<'a> TypeChecker<'a> {
    pub fn new(symbols: &'a SymbolMap) -> Self {
        Self {
            symbols,
            current_return: Type::Void,
            errors: Vec::new(),
        }
    }

    /// Check a whole program, returning every type error found
    pub fn run(&mut self, program: &mut Program) -> Vec<CompilerError> {
        for class in &mut program.classes {
            for method in &mut class.methods {
                self.current_return = method.return_type;
                self.check_block(&mut method.body);
            }
        }
        std::mem::take(&mut self.errors)
    }

    fn error(&mut self, err: SemanticError) {
        self.errors.push(err.into());
    }

    fn check_block(&mut self, block: &mut Block) {
        for statement in &mut block.statements {
            self.check_statement(statement);
        }
    }

    fn check_statement(&mut self, statement: &mut Statement) {
        let span = statement.span;
        match &mut statement.kind {
            StatementKind::Assign { target, op, value } => {
                let op = *op;
                let target_type = self.check_location(target);
                let value_type = self.check_expression(value);
                let (Some(target_type), Some(value_type)) = (target_type, value_type) else {
                    return;
                };

                if op != AssignOp::Assign && !target_type.is_arithmetic() {
                    self.error(SemanticError::InvalidCompoundAssign {
                        op,
                        target: target_type,
                        location: span.start,
                    });
                    return;
                }
                if target_type != value_type {
                    self.error(SemanticError::AssignTypeMismatch {
                        target: target_type,
                        value: value_type,
                        location: span.start,
                    });
                }
            }
            StatementKind::Call(call) => {
                // Statement position accepts any return type; the result
                // of a non-void callee is simply discarded.
                self.check_call(call);
            }
            StatementKind::If {
                condition,
                then_block,
                else_block,
            } => {
                self.check_condition(condition);
                self.check_block(then_block);
                if let Some(else_block) = else_block {
                    self.check_block(else_block);
                }
            }
            StatementKind::While { condition, body } => {
                self.check_condition(condition);
                self.check_block(body);
            }
            StatementKind::For {
                var,
                from,
                to,
                body,
            } => {
                if let Some(var_type) = self.check_location(var) {
                    if var_type != Type::Int {
                        self.error(SemanticError::NonIntForControl {
                            found: var_type,
                            location: var.span.start,
                        });
                    }
                }
                for bound in [from, to] {
                    let bound_span = bound.span;
                    if let Some(bound_type) = self.check_expression(bound) {
                        if bound_type != Type::Int {
                            self.error(SemanticError::NonIntForControl {
                                found: bound_type,
                                location: bound_span.start,
                            });
                        }
                    }
                }
                self.check_block(body);
            }
            StatementKind::Break | StatementKind::Continue => {}
            StatementKind::Return(value) => {
                let found = match value {
                    Some(value) => match self.check_expression(value) {
                        Some(found) => found,
                        None => return,
                    },
                    None => Type::Void,
                };
                if found != self.current_return {
                    self.error(SemanticError::ReturnTypeMismatch {
                        expected: self.current_return,
                        found,
                        location: span.start,
                    });
                }
            }
            StatementKind::Block(block) => self.check_block(block),
        }
    }

    fn check_condition(&mut self, condition: &mut Expression) {
        let span = condition.span;
        if let Some(found) = self.check_expression(condition) {
            if found != Type::Boolean {
                self.error(SemanticError::NonBooleanCondition {
                    found,
                    location: span.start,
                });
            }
        }
    }

    fn check_expression(&mut self, expression: &mut Expression) -> Option<Type> {
        let span = expression.span;
        let ty = match &mut expression.kind {
            ExpressionKind::IntLiteral(_) => Some(Type::Int),
            ExpressionKind::FloatLiteral(_) => Some(Type::Float),
            ExpressionKind::BoolLiteral(_) => Some(Type::Boolean),
            ExpressionKind::Location(location) => self.check_location(location),
            ExpressionKind::Binary { op, left, right } => {
                let op = *op;
                let left_type = self.check_expression(left);
                let right_type = self.check_expression(right);
                let (left_type, right_type) = (left_type?, right_type?);

                if left_type != right_type {
                    self.error(SemanticError::OperandTypeMismatch {
                        op,
                        left: left_type,
                        right: right_type,
                        location: span.start,
                    });
                    None
                } else if !operator_defined(op, left_type) {
                    self.error(SemanticError::InvalidOperator {
                        op,
                        operand: left_type,
                        location: span.start,
                    });
                    None
                } else if op.is_arithmetic() {
                    Some(left_type)
                } else {
                    Some(Type::Boolean)
                }
            }
            ExpressionKind::Unary { op, operand } => {
                let op = *op;
                let operand_type = self.check_expression(operand)?;
                let valid = match op {
                    UnaryOp::Minus => operand_type.is_arithmetic(),
                    UnaryOp::Not => operand_type == Type::Boolean,
                };
                if valid {
                    Some(operand_type)
                } else {
                    self.error(SemanticError::InvalidUnaryOperator {
                        op,
                        operand: operand_type,
                        location: span.start,
                    });
                    None
                }
            }
            ExpressionKind::Call(call) => {
                let name = call.name.clone();
                let ty = self.check_call(call)?;
                if ty == Type::Void {
                    self.error(SemanticError::VoidCallInExpression {
                        method: name,
                        location: span.start,
                    });
                    None
                } else {
                    Some(ty)
                }
            }
        };

        expression.expr_type = ty;
        ty
    }

    /// Check a call's argument types against the callee's parameter list
    /// and produce the callee's return type
    fn check_call(&mut self, call: &mut MethodCall) -> Option<Type> {
        let symbol = self.symbols.expect(call.symbol_id?);
        let return_type = symbol.ty;
        let params = match &symbol.kind {
            SymbolKind::Method { params } => params.clone(),
            _ => return None,
        };

        for (position, (argument, expected)) in
            call.arguments.iter_mut().zip(params.iter()).enumerate()
        {
            let argument_span = argument.span;
            if let Some(found) = self.check_expression(argument) {
                if found != *expected {
                    self.error(SemanticError::ArgumentTypeMismatch {
                        method: call.name.clone(),
                        position: position + 1,
                        expected: *expected,
                        found,
                        location: argument_span.start,
                    });
                }
            }
        }

        Some(return_type)
    }

    /// A location's type is its resolved symbol's declared type; array
    /// index expressions must type to int
    fn check_location(&mut self, location: &mut Location) -> Option<Type> {
        let ty = self.symbols.expect(location.symbol_id?).ty;

        if let Some(index) = &mut location.index {
            let index_span = index.span;
            if let Some(index_type) = self.check_expression(index) {
                if index_type != Type::Int {
                    self.error(SemanticError::NonIntIndex {
                        found: index_type,
                        location: index_span.start,
                    });
                }
            }
        }

        Some(ty)
    }
}

/// The operator table: which binary operators exist for which operand type
fn operator_defined(op: BinaryOp, operand: Type) -> bool {
    match operand {
        Type::Int => !op.is_logical(),
        Type::Float => !op.is_logical() && op != BinaryOp::Mod,
        Type::Boolean => op.is_equality() || op.is_logical(),
        Type::Void => false,
    }
}
