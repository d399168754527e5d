//! Statement lowering
//!
//! Structured control flow becomes label/branch pairs with forward
//! targets back-patched as each construct closes; `break`/`continue`
//! resolve against the loop-context stack pushed on loop entry.

use super::{IrGenerator, LoopLabels};
use crate::instr::{BinOp, Instr, Operand};
use slc_ast::{AssignOp, Expression, Location, Statement, StatementKind};
use slc_common::Type;

impl IrGenerator {
    pub(crate) fn lower_statement(&mut self, statement: &Statement) {
        match &statement.kind {
            StatementKind::Assign { target, op, value } => {
                self.lower_assign(target, *op, value)
            }
            StatementKind::Call(call) => {
                // Statement position: a non-void result is computed into
                // a temporary and simply never read again.
                self.lower_call(call);
            }
            StatementKind::If {
                condition,
                then_block,
                else_block,
            } => self.lower_if(condition, then_block, else_block.as_ref()),
            StatementKind::While { condition, body } => self.lower_while(condition, body),
            StatementKind::For {
                var,
                from,
                to,
                body,
            } => self.lower_for(var, from, to, body),
            StatementKind::Break => {
                let labels = self.innermost_loop();
                self.program.push(Instr::Jump {
                    target: labels.break_to,
                });
            }
            StatementKind::Continue => {
                let labels = self.innermost_loop();
                self.program.push(Instr::Jump {
                    target: labels.continue_to,
                });
            }
            StatementKind::Return(value) => {
                let value = value.as_ref().map(|value| self.lower_expression(value));
                self.program.push(Instr::Return { value });
            }
            StatementKind::Block(block) => self.lower_block(block),
        }
    }

    fn innermost_loop(&self) -> LoopLabels {
        *self
            .loop_stack
            .last()
            .expect("resolver rejects break/continue outside loops")
    }

    fn lower_assign(&mut self, target: &Location, op: AssignOp, value: &Expression) {
        let src = self.lower_expression(value);
        let dest = self.lower_location(target);

        match op {
            AssignOp::Assign => {
                self.program.push(Instr::Assign { src, dest });
            }
            AssignOp::AddAssign | AssignOp::SubAssign => {
                // target op= value lowers to a binary op into a fresh
                // temporary, then a copy back into the target.
                let float = dest.ty == Type::Float;
                let bin_op = match (op, float) {
                    (AssignOp::AddAssign, false) => BinOp::AddI,
                    (AssignOp::AddAssign, true) => BinOp::AddF,
                    (AssignOp::SubAssign, false) => BinOp::SubI,
                    (AssignOp::SubAssign, true) => BinOp::SubF,
                    (AssignOp::Assign, _) => unreachable!(),
                };
                let temp = self.new_temp(dest.ty);
                self.program.push(Instr::Binary {
                    op: bin_op,
                    left: Operand::Location(dest.clone()),
                    right: src,
                    dest: temp.clone(),
                });
                self.program.push(Instr::Assign {
                    src: Operand::Location(temp),
                    dest,
                });
            }
        }
    }

    fn lower_if(
        &mut self,
        condition: &Expression,
        then_block: &slc_ast::Block,
        else_block: Option<&slc_ast::Block>,
    ) {
        let cond = self.lower_expression(condition);
        let skip_then = self.program.new_label();
        self.program.push(Instr::JumpFalse {
            cond,
            target: skip_then,
        });

        self.lower_block(then_block);

        match else_block {
            Some(else_block) => {
                let skip_else = self.program.new_label();
                self.program.push(Instr::Jump { target: skip_else });
                self.program.bind(skip_then);
                self.lower_block(else_block);
                self.program.bind(skip_else);
            }
            None => self.program.bind(skip_then),
        }
    }

    fn lower_while(&mut self, condition: &Expression, body: &slc_ast::Block) {
        let entry = self.program.new_label();
        self.program.bind(entry);

        let cond = self.lower_expression(condition);
        let exit = self.program.new_label();
        self.program.push(Instr::JumpFalse { cond, target: exit });

        self.loop_stack.push(LoopLabels {
            continue_to: entry,
            break_to: exit,
        });
        self.lower_block(body);
        self.loop_stack.pop();

        self.program.push(Instr::Jump { target: entry });
        self.program.bind(exit);
    }

    /// `for var = from, to block` desugars to while-style wiring: assign
    /// `from`, test `var <= to` at the top, run the body, add one, jump
    /// back. `continue` targets the increment so it is never skipped.
    fn lower_for(
        &mut self,
        var: &Location,
        from: &Expression,
        to: &Expression,
        body: &slc_ast::Block,
    ) {
        let induction = self.lower_location(var);
        let from = self.lower_expression(from);
        self.program.push(Instr::Assign {
            src: from,
            dest: induction.clone(),
        });

        let entry = self.program.new_label();
        self.program.bind(entry);

        let limit = self.lower_expression(to);
        let cond = self.new_temp(Type::Boolean);
        self.program.push(Instr::Binary {
            op: BinOp::LeI,
            left: Operand::Location(induction.clone()),
            right: limit,
            dest: cond.clone(),
        });
        let exit = self.program.new_label();
        self.program.push(Instr::JumpFalse {
            cond: Operand::Location(cond),
            target: exit,
        });

        let increment = self.program.new_label();
        self.loop_stack.push(LoopLabels {
            continue_to: increment,
            break_to: exit,
        });
        self.lower_block(body);
        self.loop_stack.pop();

        self.program.bind(increment);
        let bumped = self.new_temp(Type::Int);
        self.program.push(Instr::Binary {
            op: BinOp::AddI,
            left: Operand::Location(induction.clone()),
            right: Operand::IntConst(1),
            dest: bumped.clone(),
        });
        self.program.push(Instr::Assign {
            src: Operand::Location(bumped),
            dest: induction,
        });
        self.program.push(Instr::Jump { target: entry });
        self.program.bind(exit);
    }
}
