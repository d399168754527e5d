//! Parser for the IR text form
//!
//! Reads `L<n>: <OPCODE> [operands…]` lines back into (label, opcode,
//! operands) tuples. The parse is purely lexical: operands keep their
//! printed spelling, which is exactly what the lossless round-trip
//! property needs.

use crate::program::IrProgram;
use std::fmt;
use thiserror::Error;

/// One re-parsed IR statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStatement {
    pub label: usize,
    pub opcode: String,
    pub operands: Vec<String>,
}

impl fmt::Display for ParsedStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}: {}", self.label, self.opcode)?;
        for operand in &self.operands {
            write!(f, " {}", operand)?;
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    #[error("line {line}: missing 'L<n>:' statement label")]
    MissingLabel { line: usize },

    #[error("line {line}: missing instruction opcode")]
    MissingOpcode { line: usize },
}

/// Parse a whole IR text dump; blank lines are skipped
pub fn parse_program(text: &str) -> Result<Vec<ParsedStatement>, TextError> {
    let mut statements = Vec::new();
    for (at, raw) in text.lines().enumerate() {
        let line = at + 1;
        if raw.trim().is_empty() {
            continue;
        }

        let mut tokens = raw.split_whitespace();
        let label = tokens
            .next()
            .and_then(parse_label)
            .ok_or(TextError::MissingLabel { line })?;
        let opcode = tokens
            .next()
            .ok_or(TextError::MissingOpcode { line })?
            .to_string();
        let operands = tokens.map(str::to_string).collect();

        statements.push(ParsedStatement {
            label,
            opcode,
            operands,
        });
    }
    Ok(statements)
}

fn parse_label(token: &str) -> Option<usize> {
    token
        .strip_prefix('L')?
        .strip_suffix(':')?
        .parse::<usize>()
        .ok()
}

impl IrProgram {
    /// The program's statements as (label, opcode, operands) tuples,
    /// the structural view the round-trip property compares against
    pub fn statement_tuples(&self) -> Vec<ParsedStatement> {
        // to_text is the single source of truth for spelling; deriving
        // the tuples from it keeps the two views from drifting apart.
        parse_program(&self.to_text()).expect("own text form always re-parses")
    }
}
