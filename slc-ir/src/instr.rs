//! IR statement and operand definitions
//!
//! One enum variant per instruction-family and arity, so the assembly
//! emitter matches exhaustively instead of testing shapes at runtime.
//! Operands are self-contained: an [`IrLocation`] carries the storage
//! class, frame offset and array capacity the emitter needs, so the IR
//! list alone fully determines the output.

use crate::program::Label;
use slc_common::Type;
use std::fmt;

/// Three-operand binary operators, split by operand type where the
/// emitter selects different instructions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    AddI,
    SubI,
    MulI,
    DivI,
    ModI,
    AddF,
    SubF,
    MulF,
    DivF,
    And,
    Or,
    LtI,
    LeI,
    GtI,
    GeI,
    EqI,
    NeI,
    LtF,
    LeF,
    GtF,
    GeF,
    EqF,
    NeF,
}

impl BinOp {
    /// Opcode mnemonic in the IR text form
    pub fn mnemonic(&self) -> &'static str {
        match self {
            BinOp::AddI => "ADDI",
            BinOp::SubI => "SUBI",
            BinOp::MulI => "MULI",
            BinOp::DivI => "DIVI",
            BinOp::ModI => "MODI",
            BinOp::AddF => "ADDF",
            BinOp::SubF => "SUBF",
            BinOp::MulF => "MULF",
            BinOp::DivF => "DIVF",
            BinOp::And => "AND",
            BinOp::Or => "OR",
            BinOp::LtI => "LTI",
            BinOp::LeI => "LEI",
            BinOp::GtI => "GTI",
            BinOp::GeI => "GEI",
            BinOp::EqI => "EQI",
            BinOp::NeI => "NEI",
            BinOp::LtF => "LTF",
            BinOp::LeF => "LEF",
            BinOp::GtF => "GTF",
            BinOp::GeF => "GEF",
            BinOp::EqF => "EQF",
            BinOp::NeF => "NEF",
        }
    }

    /// Operators lowered through the x87 float stack
    pub fn is_float(&self) -> bool {
        matches!(
            self,
            BinOp::AddF
                | BinOp::SubF
                | BinOp::MulF
                | BinOp::DivF
                | BinOp::LtF
                | BinOp::LeF
                | BinOp::GtF
                | BinOp::GeF
                | BinOp::EqF
                | BinOp::NeF
        )
    }

    /// Operators producing a boolean via compare-and-branch
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinOp::LtI
                | BinOp::LeI
                | BinOp::GtI
                | BinOp::GeI
                | BinOp::EqI
                | BinOp::NeI
                | BinOp::LtF
                | BinOp::LeF
                | BinOp::GtF
                | BinOp::GeF
                | BinOp::EqF
                | BinOp::NeF
        )
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

/// Two-operand unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnOp {
    NegI,
    NegF,
    Not,
}

impl UnOp {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            UnOp::NegI => "NEGI",
            UnOp::NegF => "NEGF",
            UnOp::Not => "NOT",
        }
    }
}

impl fmt::Display for UnOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

/// Where a location's storage lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrStorage {
    /// `.comm` storage addressed by symbol name
    Global,
    /// Frame storage addressed relative to `%ebp`. For arrays the offset
    /// is the declared offset: the address of the *last* element.
    Frame { offset: i32 },
}

/// A storage reference operand: scalar variable, temporary, or array
/// element with an index operand
#[derive(Debug, Clone, PartialEq)]
pub struct IrLocation {
    pub name: String,
    pub ty: Type,
    pub storage: IrStorage,
    /// Array capacity; present exactly when the symbol is an array
    pub capacity: Option<u32>,
    /// Present for array-element access; always a simple operand
    pub index: Option<Box<Operand>>,
}

impl fmt::Display for IrLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.index {
            Some(index) => write!(f, "{}[{}]", self.name, index),
            None => write!(f, "{}", self.name),
        }
    }
}

/// An IR operand: a literal constant or a location
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    IntConst(i32),
    FloatConst(f32),
    BoolConst(bool),
    Location(IrLocation),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::IntConst(v) => write!(f, "{}", v),
            // {:?} keeps the decimal point so the text form stays typed
            Operand::FloatConst(v) => write!(f, "{:?}", v),
            Operand::BoolConst(v) => write!(f, "{}", v),
            Operand::Location(loc) => write!(f, "{}", loc),
        }
    }
}

/// One IR statement
///
/// The variant fixes both the instruction kind and its operand shape;
/// destinations are locations by construction.
#[derive(Debug, Clone, PartialEq)]
pub enum Instr {
    /// `dest = left op right`
    Binary {
        op: BinOp,
        left: Operand,
        right: Operand,
        dest: IrLocation,
    },

    /// `dest = op src`
    Unary {
        op: UnOp,
        src: Operand,
        dest: IrLocation,
    },

    /// `dest = src`
    Assign { src: Operand, dest: IrLocation },

    /// Unconditional jump
    Jump { target: Label },

    /// Jump taken when `cond` is false
    JumpFalse { cond: Operand, target: Label },

    /// Push an argument for an upcoming call
    Push { value: Operand },

    /// Call a void method; `args` is the number of pushed arguments
    Call { name: String, args: u32 },

    /// Call a non-void method and store its result
    CallAssign {
        name: String,
        args: u32,
        dest: IrLocation,
    },

    /// Return, with the value for non-void methods
    Return { value: Option<Operand> },

    /// Storage request for a global field
    Global { name: String, capacity: Option<u32> },

    /// Method prologue
    MethodEntry { name: String },

    /// Stack reservation for the method's locals and temporaries;
    /// the byte count is patched once the method has been fully lowered
    Reserve { bytes: u32 },
}
