//! Error handling for the Slate compiler
//!
//! This module defines the common error type and the accumulating error
//! reporter used by the checking passes. Declaration and type errors are
//! non-fatal: each pass collects everything it can find before the driver
//! decides whether to continue.

use crate::source_loc::SourceLocation;
use std::fmt;
use thiserror::Error;

/// Main compiler error type that encompasses all phases of compilation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompilerError {
    #[error("{location}: declaration error: {message}")]
    DeclarationError {
        location: SourceLocation,
        message: String,
    },

    #[error("{location}: type error: {message}")]
    TypeError {
        location: SourceLocation,
        message: String,
    },

    #[error("{location}: code generation error: {message}")]
    CodegenError {
        location: SourceLocation,
        message: String,
    },

    #[error("IO error: {message}")]
    IoError { message: String },

    #[error("internal compiler error: {message}")]
    InternalError { message: String },
}

impl CompilerError {
    /// Create a declaration-phase error
    pub fn declaration_error(message: String, location: SourceLocation) -> Self {
        CompilerError::DeclarationError { location, message }
    }

    /// Create a type-checking error
    pub fn type_error(message: String, location: SourceLocation) -> Self {
        CompilerError::TypeError { location, message }
    }

    /// Create a codegen error
    pub fn codegen_error(message: String, location: SourceLocation) -> Self {
        CompilerError::CodegenError { location, message }
    }
}

impl From<std::io::Error> for CompilerError {
    fn from(err: std::io::Error) -> Self {
        CompilerError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<String> for CompilerError {
    fn from(message: String) -> Self {
        CompilerError::InternalError { message }
    }
}

/// Error reporter for collecting and displaying diagnostics
#[derive(Debug, Default)]
pub struct ErrorReporter {
    errors: Vec<CompilerError>,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record a single error
    pub fn report(&mut self, error: CompilerError) {
        self.errors.push(error);
    }

    /// Record everything a pass collected
    pub fn extend(&mut self, errors: Vec<CompilerError>) {
        self.errors.extend(errors);
    }

    /// Check if any errors have been reported
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get the number of errors
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Get all collected errors
    pub fn errors(&self) -> &[CompilerError] {
        &self.errors
    }

    /// Print all errors to stderr, one per line
    pub fn print_all(&self) {
        for error in &self.errors {
            eprintln!("{}", error);
        }
    }

    /// Create a summary string
    pub fn summary(&self) -> String {
        match self.errors.len() {
            0 => "no errors".to_string(),
            1 => "1 error".to_string(),
            n => format!("{} errors", n),
        }
    }
}

impl fmt::Display for ErrorReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.errors {
            writeln!(f, "{}", error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_has_location_prefix() {
        let err = CompilerError::declaration_error(
            "duplicate declaration of 'x'".to_string(),
            SourceLocation::new(3, 7),
        );
        assert_eq!(
            format!("{}", err),
            "3:7: declaration error: duplicate declaration of 'x'"
        );
    }

    #[test]
    fn test_reporter_accumulates() {
        let mut reporter = ErrorReporter::new();
        assert!(!reporter.has_errors());
        assert_eq!(reporter.summary(), "no errors");

        reporter.report(CompilerError::type_error(
            "operand mismatch".to_string(),
            SourceLocation::new(1, 1),
        ));
        reporter.report(CompilerError::type_error(
            "non-boolean condition".to_string(),
            SourceLocation::new(2, 1),
        ));

        assert!(reporter.has_errors());
        assert_eq!(reporter.error_count(), 2);
        assert_eq!(reporter.summary(), "2 errors");
    }
}
