//! Statement-at-a-time assembly emission
//!
//! Position labels (`L<n>:`) appear in the output only where some jump
//! actually lands; a prescan collects the referenced targets. Fresh
//! labels minted during emission (boolean materialization, the float
//! constant pool) are numbered from the end of the statement list so the
//! two families share one namespace without colliding.

use log::debug;
use slc_ir::{BinOp, Instr, IrLocation, IrProgram, Operand, UnOp};
use std::collections::HashSet;
use std::fmt::Write as _;

/// Emit a complete assembly module for an IR program
pub fn emit_program(program: &IrProgram) -> String {
    let mut emitter = Emitter::new(program);
    emitter.run(program);
    emitter.finish()
}

/// Assembly emission state
pub struct Emitter {
    pub(crate) out: String,
    /// IR positions some jump lands on; only these get `L<n>:` lines
    referenced: HashSet<usize>,
    /// Float constants awaiting their `.long` pool entries
    pub(crate) pool: Vec<(usize, f32)>,
    pub(crate) next_label: usize,
}

impl Emitter {
    pub fn new(program: &IrProgram) -> Self {
        let mut referenced = HashSet::new();
        for instr in program.instrs() {
            match instr {
                Instr::Jump { target } | Instr::JumpFalse { target, .. } => {
                    referenced.insert(program.target(*target));
                }
                _ => {}
            }
        }
        Self {
            out: String::new(),
            referenced,
            pool: Vec::new(),
            next_label: program.len(),
        }
    }

    pub fn run(&mut self, program: &IrProgram) {
        debug!("emitting {} IR statements", program.len());
        self.line(".text");
        for (at, instr) in program.instrs().iter().enumerate() {
            if self.referenced.contains(&at) {
                self.label(at);
            }
            self.emit_instr(program, instr);
        }
    }

    /// Append the float constant pool and hand out the module text
    pub fn finish(mut self) -> String {
        for (label, value) in std::mem::take(&mut self.pool) {
            let _ = writeln!(self.out, "L{}: .long {}", label, value.to_bits());
        }
        self.out
    }

    fn emit_instr(&mut self, program: &IrProgram, instr: &Instr) {
        match instr {
            Instr::Binary {
                op,
                left,
                right,
                dest,
            } => match op {
                BinOp::DivI => self.divide(left, right, dest, "%eax"),
                BinOp::ModI => self.divide(left, right, dest, "%edx"),
                op if op.is_float() && op.is_comparison() => {
                    self.float_compare(*op, left, right, dest)
                }
                op if op.is_float() => self.float_arith(*op, left, right, dest),
                op if op.is_comparison() => self.int_compare(*op, left, right, dest),
                op => self.int_arith(*op, left, right, dest),
            },

            Instr::Unary { op, src, dest } => match op {
                UnOp::NegI => {
                    let src = self.operand(src);
                    self.line(&format!("movl {},%ebx", src));
                    self.line("negl %ebx");
                    let dest = self.location(dest);
                    self.line(&format!("movl %ebx,{}", dest));
                }
                UnOp::NegF => {
                    let src = self.operand(src);
                    self.line(&format!("flds {}", src));
                    self.line("fchs");
                    let dest = self.location(dest);
                    self.line(&format!("fstps {}", dest));
                }
                // Complement then shift the low bit into the carry flag:
                // for a 0/1 source the carry is set exactly when the
                // source was 0.
                UnOp::Not => {
                    let src = self.operand(src);
                    self.line(&format!("movl {},%ebx", src));
                    self.line("notl %ebx");
                    self.line("shrl $1,%ebx");
                    self.store_flag("jc", dest);
                }
            },

            Instr::Assign { src, dest } => match src {
                Operand::IntConst(_) | Operand::BoolConst(_) => {
                    let src = self.operand(src);
                    let dest = self.location(dest);
                    self.line(&format!("movl {},{}", src, dest));
                }
                Operand::FloatConst(_) | Operand::Location(_) => {
                    let src = self.operand(src);
                    self.line(&format!("movl {},%ebx", src));
                    let dest = self.location(dest);
                    self.line(&format!("movl %ebx,{}", dest));
                }
            },

            Instr::Jump { target } => {
                self.line(&format!("jmp L{}", program.target(*target)));
            }

            Instr::JumpFalse { cond, target } => {
                let cond = self.operand(cond);
                self.line(&format!("movl {},%ebx", cond));
                self.line("cmpl $0,%ebx");
                self.line(&format!("je L{}", program.target(*target)));
            }

            Instr::Push { value } => {
                let value = self.operand(value);
                self.line(&format!("pushl {}", value));
            }

            Instr::Call { name, args } => {
                self.line(&format!("call {}", name));
                self.pop_arguments(*args);
            }

            Instr::CallAssign { name, args, dest } => {
                self.line(&format!("call {}", name));
                self.pop_arguments(*args);
                let dest = self.location(dest);
                self.line(&format!("movl %eax,{}", dest));
            }

            Instr::Return { value } => {
                if let Some(value) = value {
                    let value = self.operand(value);
                    self.line(&format!("movl {},%eax", value));
                }
                self.line("leave");
                self.line("ret");
            }

            Instr::Global { name, capacity } => {
                // Scalars get word alignment; arrays get the 32-byte
                // alignment the loader rounds .comm blocks to anyway.
                match capacity {
                    None => self.line(&format!(".comm {},4,4", name)),
                    Some(capacity) => self.line(&format!(".comm {},{},32", name, 4 * capacity)),
                }
            }

            Instr::MethodEntry { name } => {
                self.line(&format!(".globl {}", name));
                self.line(&format!(".type {}, @function", name));
                let _ = writeln!(self.out, "{}:", name);
                self.line("pushl %ebp");
                self.line("movl %esp,%ebp");
            }

            Instr::Reserve { bytes } => {
                self.line(&format!("subl ${},%esp", bytes));
            }
        }
    }

    fn int_arith(&mut self, op: BinOp, left: &Operand, right: &Operand, dest: &IrLocation) {
        let mnemonic = match op {
            BinOp::AddI => "addl",
            BinOp::SubI => "subl",
            BinOp::MulI => "imull",
            BinOp::And => "andl",
            BinOp::Or => "orl",
            other => unreachable!("not an int arithmetic opcode: {}", other),
        };
        let left = self.operand(left);
        self.line(&format!("movl {},%ebx", left));
        let right = self.operand(right);
        self.line(&format!("{} {},%ebx", mnemonic, right));
        let dest = self.location(dest);
        self.line(&format!("movl %ebx,{}", dest));
    }

    /// Signed division through `idivl`; `result` picks quotient (`%eax`)
    /// or remainder (`%edx`)
    fn divide(&mut self, left: &Operand, right: &Operand, dest: &IrLocation, result: &str) {
        let left = self.operand(left);
        self.line(&format!("movl {},%eax", left));
        self.line("movl $0,%edx");
        let right = self.operand(right);
        self.line(&format!("movl {},%ecx", right));
        self.line("idivl %ecx");
        let dest = self.location(dest);
        self.line(&format!("movl {},{}", result, dest));
    }

    fn float_arith(&mut self, op: BinOp, left: &Operand, right: &Operand, dest: &IrLocation) {
        let mnemonic = match op {
            BinOp::AddF => "fadds",
            BinOp::SubF => "fsubs",
            BinOp::MulF => "fmuls",
            BinOp::DivF => "fdivs",
            other => unreachable!("not a float arithmetic opcode: {}", other),
        };
        let left = self.operand(left);
        self.line(&format!("flds {}", left));
        let right = self.operand(right);
        self.line(&format!("{} {}", mnemonic, right));
        let dest = self.location(dest);
        self.line(&format!("fstps {}", dest));
    }

    fn int_compare(&mut self, op: BinOp, left: &Operand, right: &Operand, dest: &IrLocation) {
        let jump = match op {
            BinOp::LtI => "jl",
            BinOp::LeI => "jle",
            BinOp::GtI => "jg",
            BinOp::GeI => "jge",
            BinOp::EqI => "je",
            BinOp::NeI => "jne",
            other => unreachable!("not an int comparison opcode: {}", other),
        };
        let left = self.operand(left);
        self.line(&format!("movl {},%ebx", left));
        let right = self.operand(right);
        self.line(&format!("cmpl {},%ebx", right));
        self.store_flag(jump, dest);
    }

    /// x87 compare: the status word travels through `%ax` into the CPU
    /// flags, after which the unsigned condition codes order the floats
    fn float_compare(&mut self, op: BinOp, left: &Operand, right: &Operand, dest: &IrLocation) {
        let jump = match op {
            BinOp::LtF => "jb",
            BinOp::LeF => "jbe",
            BinOp::GtF => "ja",
            BinOp::GeF => "jae",
            BinOp::EqF => "je",
            BinOp::NeF => "jne",
            other => unreachable!("not a float comparison opcode: {}", other),
        };
        let left = self.operand(left);
        self.line(&format!("flds {}", left));
        let right = self.operand(right);
        self.line(&format!("fcomps {}", right));
        self.line("fnstsw %ax");
        self.line("sahf");
        self.store_flag(jump, dest);
    }

    /// Materialize the current flags as 0/1 in `%ebx` and store it:
    /// `jump` taken means true
    fn store_flag(&mut self, jump: &str, dest: &IrLocation) {
        let yes = self.fresh_label();
        let done = self.fresh_label();
        self.line(&format!("{} L{}", jump, yes));
        self.line("movl $0,%ebx");
        self.line(&format!("jmp L{}", done));
        self.label(yes);
        self.line("movl $1,%ebx");
        self.label(done);
        let dest = self.location(dest);
        self.line(&format!("movl %ebx,{}", dest));
    }

    /// Caller-side stack cleanup after a call
    fn pop_arguments(&mut self, args: u32) {
        if args > 0 {
            self.line(&format!("addl ${},%esp", 4 * args));
        }
    }

    pub(crate) fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "    {}", text);
    }

    pub(crate) fn label(&mut self, at: usize) {
        let _ = writeln!(self.out, "L{}:", at);
    }

    pub(crate) fn fresh_label(&mut self) -> usize {
        let label = self.next_label;
        self.next_label += 1;
        label
    }
}
