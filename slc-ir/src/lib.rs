//! Slate Compiler - Intermediate Representation
//!
//! A flat, labeled list of IR statements between the type-checked tree
//! and the assembly emitter. Every statement's label is its own position
//! in the list; jump targets are indices into a label arena that the IR
//! generator back-patches as it closes control-flow constructs. The
//! textual form (`L<n>: <OPCODE> [operands…]`) is a debug/interop format
//! with a lossless re-parser in [`text`].

pub mod frame;
pub mod instr;
pub mod lower;
pub mod program;
pub mod text;

pub use frame::FrameAllocator;
pub use instr::{BinOp, Instr, IrLocation, IrStorage, Operand, UnOp};
pub use lower::{generate, IrGenerator};
pub use program::{IrProgram, Label};
