//! Slate Compiler - x86 Assembly Emitter
//!
//! Translates the IR statement list into 32-bit x86 assembly in AT&T
//! syntax for `as --32`. The translation is statement-at-a-time with a
//! fixed register discipline: `%ebx` holds the working value, `%esi`
//! holds a scaled array index, `%eax`/`%edx`/`%ecx` serve division and
//! the return-value convention. No values stay in registers across IR
//! statements, so every statement is independently correct.

pub mod emit;
pub mod operand;

pub use emit::{emit_program, Emitter};
