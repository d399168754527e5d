//! The Declaration Resolver
//!
//! A single depth-first traversal mirroring program structure: each class
//! name goes into scope level 0, its fields into level 1, each method name
//! into level 2, and parameters/locals into level 3 and up, one level per
//! nested block. Every location and method-call node that resolves gets
//! its `symbol_id` attached in place. All errors are accumulated; nothing
//! here is fatal.
//!
//! Bodies are resolved in the same traversal that registers declarations,
//! so references to classes, fields or methods declared later in the
//! program are unresolved-identifier errors.

use crate::errors::SemanticError;
use log::debug;
use slc_ast::*;
use slc_common::scope::{LEVEL_CLASSES, LEVEL_FIELDS, LEVEL_METHODS};
use slc_common::{
    CompilerError, ScopeTable, StorageClass, SymbolId, SymbolKind, SymbolMap, Type,
};
use std::collections::HashMap;

/// The fields and methods registered under one class name
#[derive(Debug, Default)]
struct ClassMembers {
    fields: HashMap<String, SymbolId>,
    methods: HashMap<String, SymbolId>,
}

/// Declaration resolution pass
pub struct Resolver {
    scopes: ScopeTable,
    classes: HashMap<String, ClassMembers>,
    errors: Vec<CompilerError>,
    loop_depth: u32,
}

impl Resolver {
    pub fn new() -> Self {
        Self {
            scopes: ScopeTable::new(),
            classes: HashMap::new(),
            errors: Vec::new(),
            loop_depth: 0,
        }
    }

    /// Resolve a whole program, returning every declaration error found
    pub fn run(&mut self, program: &mut Program) -> Vec<CompilerError> {
        for class in &mut program.classes {
            self.resolve_class(class);
        }
        std::mem::take(&mut self.errors)
    }

    /// Hand the symbol arena to the downstream passes
    pub fn into_symbols(self) -> SymbolMap {
        self.scopes.into_symbols()
    }

    fn error(&mut self, err: SemanticError) {
        self.errors.push(err.into());
    }

    fn resolve_class(&mut self, class: &mut ClassDecl) {
        debug!("resolving class '{}'", class.name);
        if self
            .scopes
            .insert_at(
                LEVEL_CLASSES,
                &class.name,
                Type::Void,
                SymbolKind::Class,
                StorageClass::Global,
            )
            .is_none()
        {
            self.error(SemanticError::DuplicateDeclaration {
                name: class.name.clone(),
                location: class.span.start,
            });
        }
        self.classes.entry(class.name.clone()).or_default();

        for field in &mut class.fields {
            self.resolve_field(&class.name, field);
        }
        for method in &mut class.methods {
            self.resolve_method(&class.name, method);
        }
    }

    fn resolve_field(&mut self, class_name: &str, field: &mut VarDecl) {
        let Some(kind) = self.shape_of(field) else {
            return;
        };
        match self.scopes.insert_at(
            LEVEL_FIELDS,
            &field.name,
            field.decl_type,
            kind,
            StorageClass::Global,
        ) {
            Some(id) => {
                field.symbol_id = Some(id);
                if let Some(members) = self.classes.get_mut(class_name) {
                    members.fields.insert(field.name.clone(), id);
                }
            }
            None => self.error(SemanticError::DuplicateDeclaration {
                name: field.name.clone(),
                location: field.span.start,
            }),
        }
    }

    /// The symbol shape for a declaration, rejecting zero-capacity arrays
    fn shape_of(&mut self, decl: &VarDecl) -> Option<SymbolKind> {
        match decl.capacity {
            None => Some(SymbolKind::Scalar),
            Some(0) => {
                self.error(SemanticError::InvalidArrayCapacity {
                    name: decl.name.clone(),
                    location: decl.span.start,
                });
                None
            }
            Some(capacity) => Some(SymbolKind::Array { capacity }),
        }
    }

    fn resolve_method(&mut self, class_name: &str, method: &mut MethodDecl) {
        debug!("resolving method '{}'", method.name);
        let params = method.parameters.iter().map(|p| p.param_type).collect();
        match self.scopes.insert_at(
            LEVEL_METHODS,
            &method.name,
            method.return_type,
            SymbolKind::Method { params },
            StorageClass::Global,
        ) {
            Some(id) => {
                method.symbol_id = Some(id);
                if let Some(members) = self.classes.get_mut(class_name) {
                    members.methods.insert(method.name.clone(), id);
                }
            }
            None => self.error(SemanticError::DuplicateDeclaration {
                name: method.name.clone(),
                location: method.span.start,
            }),
        }

        self.scopes.push_level();
        for param in &mut method.parameters {
            match self.scopes.insert(
                &param.name,
                param.param_type,
                SymbolKind::Scalar,
                StorageClass::Local,
            ) {
                Some(id) => param.symbol_id = Some(id),
                None => self.error(SemanticError::DuplicateDeclaration {
                    name: param.name.clone(),
                    location: param.span.start,
                }),
            }
        }
        self.resolve_block_items(&mut method.body);
        self.scopes.pop_level();

        self.check_return_presence(method);
    }

    /// Non-void methods need at least one return statement anywhere in the
    /// body; void methods must not contain any. A declaration-phase rule,
    /// independent of the returned expression's type.
    fn check_return_presence(&mut self, method: &MethodDecl) {
        let returns = count_returns(&method.body);
        if method.return_type == Type::Void {
            if returns > 0 {
                self.error(SemanticError::UnexpectedReturn {
                    method: method.name.clone(),
                    location: method.span.start,
                });
            }
        } else if returns == 0 {
            self.error(SemanticError::MissingReturn {
                method: method.name.clone(),
                location: method.span.start,
            });
        }
    }

    /// Resolve a nested block in a fresh scope level
    fn resolve_block(&mut self, block: &mut Block) {
        self.scopes.push_level();
        self.resolve_block_items(block);
        self.scopes.pop_level();
    }

    /// Resolve a block's declarations and statements in the current level
    /// (the method body shares its level with the parameters)
    fn resolve_block_items(&mut self, block: &mut Block) {
        for decl in &mut block.decls {
            let Some(kind) = self.shape_of(decl) else {
                continue;
            };
            match self
                .scopes
                .insert(&decl.name, decl.decl_type, kind, StorageClass::Local)
            {
                Some(id) => decl.symbol_id = Some(id),
                None => self.error(SemanticError::DuplicateDeclaration {
                    name: decl.name.clone(),
                    location: decl.span.start,
                }),
            }
        }
        for statement in &mut block.statements {
            self.resolve_statement(statement);
        }
    }

    fn resolve_statement(&mut self, statement: &mut Statement) {
        let span = statement.span;
        match &mut statement.kind {
            StatementKind::Assign { target, value, .. } => {
                self.resolve_location(target);
                self.resolve_expression(value);
            }
            StatementKind::Call(call) => self.resolve_call(call),
            StatementKind::If {
                condition,
                then_block,
                else_block,
            } => {
                self.resolve_expression(condition);
                self.resolve_block(then_block);
                if let Some(else_block) = else_block {
                    self.resolve_block(else_block);
                }
            }
            StatementKind::While { condition, body } => {
                self.resolve_expression(condition);
                self.loop_depth += 1;
                self.resolve_block(body);
                self.loop_depth -= 1;
            }
            StatementKind::For {
                var,
                from,
                to,
                body,
            } => {
                self.resolve_location(var);
                self.resolve_expression(from);
                self.resolve_expression(to);
                self.loop_depth += 1;
                self.resolve_block(body);
                self.loop_depth -= 1;
            }
            StatementKind::Break => {
                if self.loop_depth == 0 {
                    self.error(SemanticError::BreakOutsideLoop {
                        location: span.start,
                    });
                }
            }
            StatementKind::Continue => {
                if self.loop_depth == 0 {
                    self.error(SemanticError::ContinueOutsideLoop {
                        location: span.start,
                    });
                }
            }
            StatementKind::Return(value) => {
                if let Some(value) = value {
                    self.resolve_expression(value);
                }
            }
            StatementKind::Block(block) => self.resolve_block(block),
        }
    }

    fn resolve_expression(&mut self, expression: &mut Expression) {
        match &mut expression.kind {
            ExpressionKind::IntLiteral(_)
            | ExpressionKind::FloatLiteral(_)
            | ExpressionKind::BoolLiteral(_) => {}
            ExpressionKind::Location(location) => self.resolve_location(location),
            ExpressionKind::Binary { left, right, .. } => {
                self.resolve_expression(left);
                self.resolve_expression(right);
            }
            ExpressionKind::Unary { operand, .. } => self.resolve_expression(operand),
            ExpressionKind::Call(call) => self.resolve_call(call),
        }
    }

    /// Resolve a storage reference and record its symbol.
    ///
    /// A lookup that finds a symbol of the wrong shape (indexing a scalar,
    /// bare use of an array) reports a not-declared error, not a type
    /// error: the name as used does not denote a declared entity.
    fn resolve_location(&mut self, location: &mut Location) {
        if let Some(index) = &mut location.index {
            self.resolve_expression(index);
        }

        let found = match &location.class_name {
            Some(class_name) => {
                let Some(members) = self.classes.get(class_name) else {
                    self.error(SemanticError::UndeclaredClass {
                        name: class_name.clone(),
                        location: location.span.start,
                    });
                    return;
                };
                members
                    .fields
                    .get(&location.name)
                    .and_then(|id| self.scopes.symbol(*id))
            }
            None => self.scopes.lookup_variable(&location.name),
        };
        let found = found.map(|symbol| (symbol.id, symbol.is_array()));

        match found {
            Some((id, is_array)) if is_array == location.index.is_some() => {
                location.symbol_id = Some(id);
            }
            _ if location.index.is_some() => self.error(SemanticError::UndeclaredArray {
                name: location.name.clone(),
                location: location.span.start,
            }),
            _ => self.error(SemanticError::UndeclaredVariable {
                name: location.name.clone(),
                location: location.span.start,
            }),
        }
    }

    fn resolve_call(&mut self, call: &mut MethodCall) {
        for argument in &mut call.arguments {
            self.resolve_expression(argument);
        }

        let found = match &call.class_name {
            Some(class_name) => {
                let Some(members) = self.classes.get(class_name) else {
                    self.error(SemanticError::UndeclaredClass {
                        name: class_name.clone(),
                        location: call.span.start,
                    });
                    return;
                };
                members
                    .methods
                    .get(&call.name)
                    .and_then(|id| self.scopes.symbol(*id))
            }
            None => self.scopes.lookup(&call.name, LEVEL_METHODS),
        };

        let Some(symbol) = found else {
            self.error(SemanticError::UndeclaredMethod {
                name: call.name.clone(),
                location: call.span.start,
            });
            return;
        };

        if let SymbolKind::Method { params } = &symbol.kind {
            if params.len() != call.arguments.len() {
                self.errors.push(
                    SemanticError::ArgumentCountMismatch {
                        method: call.name.clone(),
                        expected: params.len(),
                        found: call.arguments.len(),
                        location: call.span.start,
                    }
                    .into(),
                );
                return;
            }
            call.symbol_id = Some(symbol.id);
        }
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Count the return statements anywhere inside a block
fn count_returns(block: &Block) -> usize {
    block.statements.iter().map(count_returns_in).sum()
}

fn count_returns_in(statement: &Statement) -> usize {
    match &statement.kind {
        StatementKind::Return(_) => 1,
        StatementKind::If {
            then_block,
            else_block,
            ..
        } => {
            count_returns(then_block)
                + else_block.as_ref().map(count_returns).unwrap_or(0)
        }
        StatementKind::While { body, .. } => count_returns(body),
        StatementKind::For { body, .. } => count_returns(body),
        StatementKind::Block(block) => count_returns(block),
        _ => 0,
    }
}

/// Precondition check run before resolution: exactly one method named
/// `main` must exist across the whole program. This is a dedicated
/// count-only traversal, deliberately separate from the resolver.
pub fn check_single_main(program: &Program) -> Vec<CompilerError> {
    let count = program
        .classes
        .iter()
        .flat_map(|class| class.methods.iter())
        .filter(|method| method.name == "main")
        .count();

    match count {
        1 => Vec::new(),
        0 => vec![SemanticError::NoMainMethod.into()],
        n => vec![SemanticError::MultipleMainMethods { count: n }.into()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slc_common::SourceSpan;

    fn sp() -> SourceSpan {
        SourceSpan::dummy()
    }

    fn void_method(name: &str, body: Block) -> MethodDecl {
        MethodDecl {
            name: name.to_string(),
            return_type: Type::Void,
            parameters: vec![],
            body,
            span: sp(),
            symbol_id: None,
        }
    }

    fn single_class(fields: Vec<VarDecl>, methods: Vec<MethodDecl>) -> Program {
        Program::new(vec![ClassDecl {
            name: "Main".to_string(),
            fields,
            methods,
            span: sp(),
        }])
    }

    fn empty_block() -> Block {
        Block::new(vec![], vec![], sp())
    }

    #[test]
    fn test_duplicate_method_reports_exactly_one_error() {
        let mut program = single_class(
            vec![],
            vec![
                void_method("main", empty_block()),
                void_method("f", empty_block()),
                void_method("f", empty_block()),
            ],
        );

        let mut resolver = Resolver::new();
        let errors = resolver.run(&mut program);
        assert_eq!(errors.len(), 1);
        assert!(format!("{}", errors[0]).contains("duplicate declaration of 'f'"));
    }

    #[test]
    fn test_field_resolution_through_local_fallback() {
        let mut program = single_class(
            vec![VarDecl::scalar("x", Type::Int, sp())],
            vec![void_method(
                "main",
                Block::new(
                    vec![],
                    vec![Statement::assign(
                        Location::scalar("x", sp()),
                        Expression::int(1, sp()),
                        sp(),
                    )],
                    sp(),
                ),
            )],
        );

        let mut resolver = Resolver::new();
        assert!(resolver.run(&mut program).is_empty());

        let field_id = program.classes[0].fields[0].symbol_id.unwrap();
        match &program.classes[0].methods[0].body.statements[0].kind {
            StatementKind::Assign { target, .. } => {
                assert_eq!(target.symbol_id, Some(field_id));
            }
            _ => panic!("expected assignment"),
        }
    }

    #[test]
    fn test_indexing_a_scalar_is_not_declared() {
        let mut program = single_class(
            vec![VarDecl::scalar("x", Type::Int, sp())],
            vec![void_method(
                "main",
                Block::new(
                    vec![],
                    vec![Statement::assign(
                        Location::indexed("x", Expression::int(0, sp()), sp()),
                        Expression::int(1, sp()),
                        sp(),
                    )],
                    sp(),
                ),
            )],
        );

        let mut resolver = Resolver::new();
        let errors = resolver.run(&mut program);
        assert_eq!(errors.len(), 1);
        assert!(format!("{}", errors[0]).contains("array 'x' not declared"));
    }

    #[test]
    fn test_missing_return_in_int_method() {
        let mut f = void_method("f", empty_block());
        f.return_type = Type::Int;
        let mut program =
            single_class(vec![], vec![void_method("main", empty_block()), f]);

        let mut resolver = Resolver::new();
        let errors = resolver.run(&mut program);
        assert_eq!(errors.len(), 1);
        assert!(format!("{}", errors[0]).contains("no return statement"));
    }

    #[test]
    fn test_return_in_void_method_rejected() {
        let body = Block::new(vec![], vec![Statement::ret(None, sp())], sp());
        let mut program = single_class(vec![], vec![void_method("main", body)]);

        let mut resolver = Resolver::new();
        let errors = resolver.run(&mut program);
        assert_eq!(errors.len(), 1);
        assert!(format!("{}", errors[0]).contains("must not contain a return"));
    }

    #[test]
    fn test_break_outside_loop_rejected() {
        let body = Block::new(
            vec![],
            vec![Statement::new(StatementKind::Break, sp())],
            sp(),
        );
        let mut program = single_class(vec![], vec![void_method("main", body)]);

        let mut resolver = Resolver::new();
        let errors = resolver.run(&mut program);
        assert_eq!(errors.len(), 1);
        assert!(format!("{}", errors[0]).contains("break used outside"));
    }

    #[test]
    fn test_check_single_main() {
        let none = single_class(vec![], vec![void_method("f", empty_block())]);
        assert_eq!(check_single_main(&none).len(), 1);

        let one = single_class(vec![], vec![void_method("main", empty_block())]);
        assert!(check_single_main(&one).is_empty());

        let two = single_class(
            vec![],
            vec![
                void_method("main", empty_block()),
                void_method("main", empty_block()),
            ],
        );
        let errors = check_single_main(&two);
        assert_eq!(errors.len(), 1);
        assert!(format!("{}", errors[0]).contains("2 'main' methods"));
    }

    #[test]
    fn test_arity_mismatch_is_declaration_error() {
        let mut f = void_method("f", empty_block());
        f.parameters = vec![Parameter::new("a", Type::Int, sp())];
        let call_stmt = Statement::new(
            StatementKind::Call(MethodCall::new("f", vec![], sp())),
            sp(),
        );
        let main = void_method("main", Block::new(vec![], vec![call_stmt], sp()));
        // f declared before main so the call resolves
        let mut program = single_class(vec![], vec![f, main]);

        let mut resolver = Resolver::new();
        let errors = resolver.run(&mut program);
        assert_eq!(errors.len(), 1);
        assert!(format!("{}", errors[0]).contains("expects 1 argument(s), found 0"));
    }
}
