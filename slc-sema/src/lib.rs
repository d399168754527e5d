//! Slate Compiler - Declaration Resolution and Type Checking
//!
//! Two accumulating passes over the parsed tree: the Declaration Resolver
//! registers every class, field, method and local in the Scope Table and
//! attaches resolved symbol ids to the AST; the Type Checker assigns a
//! static type to every expression and validates operator, condition,
//! assignment and return-type rules. Each pass collects every error it can
//! find; the Type Checker assumes a clean resolution and is skipped by the
//! driver otherwise.

pub mod errors;
pub mod resolve;
pub mod typecheck;

pub use errors::SemanticError;
pub use resolve::{check_single_main, Resolver};
pub use typecheck::TypeChecker;

use slc_ast::Program;
use slc_common::{CompilerError, SymbolMap};

/// Run the full semantic front half: `main` precondition check,
/// declaration resolution, then type checking.
///
/// Returns the symbol map on success, or every error the passes could
/// accumulate. Type checking does not run when resolution reported errors.
pub fn analyze(program: &mut Program) -> Result<SymbolMap, Vec<CompilerError>> {
    let mut errors = check_single_main(program);

    let mut resolver = Resolver::new();
    errors.extend(resolver.run(program));
    if !errors.is_empty() {
        return Err(errors);
    }
    let symbols = resolver.into_symbols();

    let mut checker = TypeChecker::new(&symbols);
    let type_errors = checker.run(program);
    if !type_errors.is_empty() {
        return Err(type_errors);
    }

    Ok(symbols)
}
