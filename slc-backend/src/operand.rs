//! Operand addressing
//!
//! Renders IR operands as AT&T addressing expressions. Array-element
//! forms need a scaled index in `%esi`; the setup instructions are
//! emitted here, immediately before the caller uses the returned
//! expression, so `%esi` is always live-for-one-instruction.

use crate::emit::Emitter;
use slc_ir::{IrLocation, IrStorage, Operand};

impl Emitter {
    /// Render an operand, emitting any index setup it needs first
    pub(crate) fn operand(&mut self, operand: &Operand) -> String {
        match operand {
            Operand::IntConst(value) => format!("${}", value),
            Operand::BoolConst(true) => "$1".to_string(),
            Operand::BoolConst(false) => "$0".to_string(),
            // x87 loads want memory, so float literals live in the pool.
            Operand::FloatConst(value) => self.pool_float(*value),
            Operand::Location(location) => self.location(location),
        }
    }

    /// Render a location as a memory operand
    pub(crate) fn location(&mut self, location: &IrLocation) -> String {
        match (location.storage, &location.index) {
            (IrStorage::Global, None) => location.name.clone(),
            (IrStorage::Frame { offset }, None) => format!("{}(%ebp)", offset),
            (IrStorage::Global, Some(index)) => {
                let index = self.operand(index);
                self.line(&format!("movl {},%esi", index));
                self.line("imull $4,%esi");
                format!("{}+0(%esi)", location.name)
            }
            (IrStorage::Frame { offset }, Some(index)) => {
                let index = self.operand(index);
                self.line(&format!("movl {},%esi", index));
                // The declared offset addresses the last element; back up
                // to element 0 and let the scaled index walk forward.
                let capacity = location.capacity.expect("indexed location is an array") as i32;
                let base = offset - 4 * (capacity - 1);
                format!("{}(%ebp,%esi,4)", base)
            }
        }
    }

    /// Mint a pool entry for `value`; every occurrence gets its own label
    pub(crate) fn pool_float(&mut self, value: f32) -> String {
        let label = self.fresh_label();
        self.pool.push((label, value));
        format!("L{}", label)
    }
}
