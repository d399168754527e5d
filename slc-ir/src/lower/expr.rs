//! Expression lowering
//!
//! Every sub-expression that is not already a literal or a bare location
//! gets a temporary and a statement computing it; free expressions pass
//! through as operands without a redundant copy.

use super::IrGenerator;
use crate::instr::{BinOp, Instr, IrLocation, IrStorage, Operand, UnOp};
use slc_ast::{BinaryOp, Expression, ExpressionKind, Location, MethodCall, UnaryOp};
use slc_common::{StorageClass, Type};

impl IrGenerator {
    /// Lower an expression to the operand holding its value
    pub(crate) fn lower_expression(&mut self, expression: &Expression) -> Operand {
        match &expression.kind {
            ExpressionKind::IntLiteral(value) => Operand::IntConst(*value),
            ExpressionKind::FloatLiteral(value) => Operand::FloatConst(*value),
            ExpressionKind::BoolLiteral(value) => Operand::BoolConst(*value),
            ExpressionKind::Location(location) => {
                Operand::Location(self.lower_location(location))
            }
            ExpressionKind::Binary { op, left, right } => {
                let operand_type = left.expr_type.expect("type-checked operand");
                let result_type = expression.expr_type.expect("type-checked expression");
                let left = self.lower_expression(left);
                let right = self.lower_expression(right);
                let dest = self.new_temp(result_type);
                self.program.push(Instr::Binary {
                    op: select_binary(*op, operand_type),
                    left,
                    right,
                    dest: dest.clone(),
                });
                Operand::Location(dest)
            }
            ExpressionKind::Unary { op, operand } => {
                let operand_type = operand.expr_type.expect("type-checked operand");
                let src = self.lower_expression(operand);
                let dest = self.new_temp(operand_type);
                self.program.push(Instr::Unary {
                    op: select_unary(*op, operand_type),
                    src,
                    dest: dest.clone(),
                });
                Operand::Location(dest)
            }
            ExpressionKind::Call(call) => {
                let dest = self
                    .lower_call(call)
                    .expect("non-void call in expression position");
                Operand::Location(dest)
            }
        }
    }

    /// Lower a storage reference to a self-contained IR location
    pub(crate) fn lower_location(&mut self, location: &Location) -> IrLocation {
        let symbol = self.symbols.expect(self.resolved(location.symbol_id));
        let name = symbol.name.clone();
        let ty = symbol.ty;
        let capacity = symbol.capacity();
        let storage = match symbol.storage {
            StorageClass::Global => IrStorage::Global,
            StorageClass::Local => IrStorage::Frame {
                offset: symbol.offset.expect("offset assigned at declaration"),
            },
        };

        let index = location
            .index
            .as_ref()
            .map(|index| Box::new(self.lower_expression(index)));

        IrLocation {
            name,
            ty,
            storage,
            capacity,
            index,
        }
    }

    /// Lower a call: push arguments rightmost-first, then emit the call,
    /// returning the result temporary for non-void callees
    pub(crate) fn lower_call(&mut self, call: &MethodCall) -> Option<IrLocation> {
        for argument in call.arguments.iter().rev() {
            let value = self.lower_expression(argument);
            self.program.push(Instr::Push { value });
        }

        let args = call.arguments.len() as u32;
        let return_type = self.symbols.expect(self.resolved(call.symbol_id)).ty;
        if return_type == Type::Void {
            self.program.push(Instr::Call {
                name: call.name.clone(),
                args,
            });
            None
        } else {
            let dest = self.new_temp(return_type);
            self.program.push(Instr::CallAssign {
                name: call.name.clone(),
                args,
                dest: dest.clone(),
            });
            Some(dest)
        }
    }
}

/// Pick the IR opcode for a binary operator applied at an operand type
pub(crate) fn select_binary(op: BinaryOp, operand: Type) -> BinOp {
    let float = operand == Type::Float;
    match op {
        BinaryOp::Add if float => BinOp::AddF,
        BinaryOp::Add => BinOp::AddI,
        BinaryOp::Sub if float => BinOp::SubF,
        BinaryOp::Sub => BinOp::SubI,
        BinaryOp::Mul if float => BinOp::MulF,
        BinaryOp::Mul => BinOp::MulI,
        BinaryOp::Div if float => BinOp::DivF,
        BinaryOp::Div => BinOp::DivI,
        BinaryOp::Mod => BinOp::ModI,
        BinaryOp::And => BinOp::And,
        BinaryOp::Or => BinOp::Or,
        BinaryOp::Less if float => BinOp::LtF,
        BinaryOp::Less => BinOp::LtI,
        BinaryOp::LessEqual if float => BinOp::LeF,
        BinaryOp::LessEqual => BinOp::LeI,
        BinaryOp::Greater if float => BinOp::GtF,
        BinaryOp::Greater => BinOp::GtI,
        BinaryOp::GreaterEqual if float => BinOp::GeF,
        BinaryOp::GreaterEqual => BinOp::GeI,
        // Boolean equality compares the 0/1 representation.
        BinaryOp::Equal if float => BinOp::EqF,
        BinaryOp::Equal => BinOp::EqI,
        BinaryOp::NotEqual if float => BinOp::NeF,
        BinaryOp::NotEqual => BinOp::NeI,
    }
}

pub(crate) fn select_unary(op: UnaryOp, operand: Type) -> UnOp {
    match (op, operand) {
        (UnaryOp::Minus, Type::Float) => UnOp::NegF,
        (UnaryOp::Minus, _) => UnOp::NegI,
        (UnaryOp::Not, _) => UnOp::Not,
    }
}
