//! The IR statement list and its label arena
//!
//! A [`Label`] is an index into an arena of target slots owned by the
//! program. The IR generator creates labels before their targets are
//! known and binds each one exactly once; [`IrProgram::assert_all_bound`]
//! turns a forgotten bind into a hard failure instead of a silent bad
//! jump. After generation labels are immutable.

use crate::instr::Instr;
use std::fmt;
use std::fmt::Write as _;

/// A jump target: an index into the program's label arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label(usize);

/// The ordered IR statement list
#[derive(Debug, Clone, Default)]
pub struct IrProgram {
    instrs: Vec<Instr>,
    labels: Vec<Option<usize>>,
}

impl IrProgram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a statement, returning its position (= its own label)
    pub fn push(&mut self, instr: Instr) -> usize {
        self.instrs.push(instr);
        self.instrs.len() - 1
    }

    pub fn len(&self) -> usize {
        self.instrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }

    pub fn instrs(&self) -> &[Instr] {
        &self.instrs
    }

    /// Mutable access for generator-internal back-patching (reserve sizes)
    pub(crate) fn instr_mut(&mut self, at: usize) -> &mut Instr {
        &mut self.instrs[at]
    }

    /// Allocate a fresh, unbound label
    pub fn new_label(&mut self) -> Label {
        self.labels.push(None);
        Label(self.labels.len() - 1)
    }

    /// Bind a label to the position of the next statement to be pushed
    pub fn bind(&mut self, label: Label) {
        self.labels[label.0] = Some(self.instrs.len());
    }

    /// Resolve a label's target position.
    ///
    /// Panics when the label was never bound: that is a generator bug,
    /// not a user diagnostic.
    pub fn target(&self, label: Label) -> usize {
        self.labels[label.0].expect("jump label was never bound")
    }

    /// Verify that every allocated label has been bound
    pub fn assert_all_bound(&self) {
        for (i, slot) in self.labels.iter().enumerate() {
            assert!(slot.is_some(), "label arena slot {} was never bound", i);
        }
    }

    /// The debug/interop text form: `L<n>: <OPCODE> [operands…]`
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (at, instr) in self.instrs.iter().enumerate() {
            let _ = write!(out, "L{}:", at);
            self.write_instr(&mut out, instr);
            out.push('\n');
        }
        out
    }

    fn write_instr(&self, out: &mut String, instr: &Instr) {
        let _ = match instr {
            Instr::Binary {
                op,
                left,
                right,
                dest,
            } => write!(out, " {} {} {} {}", op, left, right, dest),
            Instr::Unary { op, src, dest } => write!(out, " {} {} {}", op, src, dest),
            Instr::Assign { src, dest } => write!(out, " ASSIGN {} {}", src, dest),
            Instr::Jump { target } => write!(out, " GOTO L{}", self.target(*target)),
            Instr::JumpFalse { cond, target } => {
                write!(out, " IFF {} L{}", cond, self.target(*target))
            }
            Instr::Push { value } => write!(out, " PUSH {}", value),
            Instr::Call { name, .. } => write!(out, " CALL {}", name),
            Instr::CallAssign { name, dest, .. } => write!(out, " CALLA {} {}", name, dest),
            Instr::Return { value: Some(value) } => write!(out, " RETV {}", value),
            Instr::Return { value: None } => write!(out, " RET"),
            Instr::Global {
                name,
                capacity: Some(capacity),
            } => write!(out, " GLOBAL {}[{}]", name, capacity),
            Instr::Global {
                name,
                capacity: None,
            } => write!(out, " GLOBAL {}", name),
            Instr::MethodEntry { name } => write!(out, " INITML {}", name),
            Instr::Reserve { bytes } => write!(out, " RESERVE {}", bytes),
        };
    }
}

impl fmt::Display for IrProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}
