//! Source location tracking for error reporting
//!
//! The external parser stamps every AST node with the position it came
//! from; diagnostics print these as `line:column` prefixes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A location in the source program (line and column are 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Create a dummy location for testing
    pub fn dummy() -> Self {
        Self::new(0, 0)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span in the source program (from start to end location)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceSpan {
    pub fn new(start: SourceLocation, end: SourceLocation) -> Self {
        Self { start, end }
    }

    /// Create a span from a single location
    pub fn from_location(location: SourceLocation) -> Self {
        Self {
            start: location,
            end: location,
        }
    }

    /// Create a dummy span for testing
    pub fn dummy() -> Self {
        Self::from_location(SourceLocation::dummy())
    }

    /// Extend this span to include another span
    pub fn extend(&self, other: &SourceSpan) -> SourceSpan {
        let start = if self.start.line < other.start.line
            || (self.start.line == other.start.line && self.start.column <= other.start.column)
        {
            self.start
        } else {
            other.start
        };

        let end = if self.end.line > other.end.line
            || (self.end.line == other.end.line && self.end.column >= other.end.column)
        {
            self.end
        } else {
            other.end
        };

        SourceSpan::new(start, end)
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Diagnostics only ever show the start of the offending construct.
        write!(f, "{}", self.start)
    }
}
