//! The IR Generator
//!
//! Lowers a type-checked program into the flat IR statement list. The
//! traversal assumes clean resolution and type checking: every location
//! and call carries a symbol id, every expression a type. Violations are
//! generator bugs and fail fast instead of becoming diagnostics.
//!
//! Frame offsets are assigned here, in visitation order within each
//! method; the per-method `RESERVE` size and all jump labels are
//! back-patched before the program is handed out.

mod expr;
mod stmt;

use crate::frame::FrameAllocator;
use crate::instr::{Instr, IrLocation, IrStorage};
use crate::program::{IrProgram, Label};
use log::debug;
use slc_ast::{Block, ClassDecl, MethodDecl, Program, VarDecl};
use slc_common::{SymbolId, SymbolMap, Type};

/// Exit and re-entry targets of the innermost active loop
#[derive(Debug, Clone, Copy)]
pub(crate) struct LoopLabels {
    /// Where `continue` goes: the condition label of a `while`, the
    /// implicit increment of a `for`
    pub continue_to: Label,
    /// Where `break` goes: just past the loop
    pub break_to: Label,
}

/// IR generation pass
pub struct IrGenerator {
    pub(crate) program: IrProgram,
    pub(crate) symbols: SymbolMap,
    pub(crate) frame: FrameAllocator,
    pub(crate) temp_count: u32,
    pub(crate) loop_stack: Vec<LoopLabels>,
}

/// Lower a type-checked program to IR.
///
/// Returns the finished statement list together with the symbol map, now
/// carrying frame offsets for every local, parameter and temporary.
pub fn generate(program: &Program, symbols: SymbolMap) -> (IrProgram, SymbolMap) {
    let mut generator = IrGenerator::new(symbols);
    generator.run(program);
    generator.finish()
}

impl IrGenerator {
    pub fn new(symbols: SymbolMap) -> Self {
        Self {
            program: IrProgram::new(),
            symbols,
            frame: FrameAllocator::new(),
            temp_count: 0,
            loop_stack: Vec::new(),
        }
    }

    /// Lower every class in program order
    pub fn run(&mut self, program: &Program) {
        for class in &program.classes {
            self.lower_class(class);
        }
    }

    /// Verify label totality and hand out the results
    pub fn finish(self) -> (IrProgram, SymbolMap) {
        self.program.assert_all_bound();
        (self.program, self.symbols)
    }

    fn lower_class(&mut self, class: &ClassDecl) {
        debug!("lowering class '{}'", class.name);
        for field in &class.fields {
            let symbol = self.symbols.expect(self.resolved(field.symbol_id));
            self.program.push(Instr::Global {
                name: symbol.name.clone(),
                capacity: symbol.capacity(),
            });
        }
        for method in &class.methods {
            self.lower_method(method);
        }
    }

    fn lower_method(&mut self, method: &MethodDecl) {
        debug!("lowering method '{}'", method.name);
        self.frame = FrameAllocator::new();
        self.temp_count = 0;

        self.program.push(Instr::MethodEntry {
            name: method.name.clone(),
        });
        let reserve_at = self.program.push(Instr::Reserve { bytes: 0 });

        for (position, param) in method.parameters.iter().enumerate() {
            let id = self.resolved(param.symbol_id);
            self.symbols
                .get_mut(id)
                .expect("parameter symbol in arena")
                .offset = Some(FrameAllocator::param_offset(position));
        }

        self.lower_block(&method.body);

        // Implicit bare return: gives void methods their exit and
        // guarantees a landing statement for loop-exit labels.
        self.program.push(Instr::Return { value: None });

        let bytes = self.frame.reserve_bytes();
        if let Instr::Reserve { bytes: slot } = self.program.instr_mut(reserve_at) {
            *slot = bytes;
        }
    }

    pub(crate) fn lower_block(&mut self, block: &Block) {
        for decl in &block.decls {
            self.alloc_local(decl);
        }
        for statement in &block.statements {
            self.lower_statement(statement);
        }
    }

    fn alloc_local(&mut self, decl: &VarDecl) {
        let offset = match decl.capacity {
            None => self.frame.alloc_scalar(),
            Some(capacity) => self.frame.alloc_array(capacity),
        };
        let id = self.resolved(decl.symbol_id);
        self.symbols
            .get_mut(id)
            .expect("local symbol in arena")
            .offset = Some(offset);
    }

    /// A fresh frame-allocated temporary
    pub(crate) fn new_temp(&mut self, ty: Type) -> IrLocation {
        let name = format!("t{}", self.temp_count);
        self.temp_count += 1;
        IrLocation {
            name,
            ty,
            storage: IrStorage::Frame {
                offset: self.frame.alloc_scalar(),
            },
            capacity: None,
            index: None,
        }
    }

    /// Unwrap an annotation the earlier passes guarantee
    pub(crate) fn resolved(&self, id: Option<SymbolId>) -> SymbolId {
        id.expect("IR generation requires a cleanly resolved tree")
    }
}
