//! Declaration AST nodes: programs, classes, fields, methods, blocks

use crate::statements::Statement;
use serde::{Deserialize, Serialize};
use slc_common::{SourceSpan, SymbolId, Type};

/// A complete parsed program: an ordered sequence of class declarations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub classes: Vec<ClassDecl>,
}

impl Program {
    pub fn new(classes: Vec<ClassDecl>) -> Self {
        Self { classes }
    }
}

/// A class declaration: a namespace of fields and methods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    pub fields: Vec<VarDecl>,
    pub methods: Vec<MethodDecl>,
    pub span: SourceSpan,
}

/// A variable declaration: a class field or a method/block local
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub name: String,
    pub decl_type: Type,
    /// Present for array declarations; positive and fixed at declaration
    #[serde(default)]
    pub capacity: Option<u32>,
    pub span: SourceSpan,
    /// Filled during declaration resolution
    #[serde(default)]
    pub symbol_id: Option<SymbolId>,
}

impl VarDecl {
    pub fn scalar(name: &str, decl_type: Type, span: SourceSpan) -> Self {
        Self {
            name: name.to_string(),
            decl_type,
            capacity: None,
            span,
            symbol_id: None,
        }
    }

    pub fn array(name: &str, decl_type: Type, capacity: u32, span: SourceSpan) -> Self {
        Self {
            name: name.to_string(),
            decl_type,
            capacity: Some(capacity),
            span,
            symbol_id: None,
        }
    }
}

/// A method parameter (always scalar)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub param_type: Type,
    pub span: SourceSpan,
    /// Filled during declaration resolution
    #[serde(default)]
    pub symbol_id: Option<SymbolId>,
}

impl Parameter {
    pub fn new(name: &str, param_type: Type, span: SourceSpan) -> Self {
        Self {
            name: name.to_string(),
            param_type,
            span,
            symbol_id: None,
        }
    }
}

/// A method declaration with its body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    pub return_type: Type,
    pub parameters: Vec<Parameter>,
    pub body: Block,
    pub span: SourceSpan,
    /// Filled during declaration resolution
    #[serde(default)]
    pub symbol_id: Option<SymbolId>,
}

/// A block: local declarations followed by statements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub decls: Vec<VarDecl>,
    pub statements: Vec<Statement>,
    pub span: SourceSpan,
}

impl Block {
    pub fn new(decls: Vec<VarDecl>, statements: Vec<Statement>, span: SourceSpan) -> Self {
        Self {
            decls,
            statements,
            span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expressions::{Expression, Location};
    use crate::ops::BinaryOp;
    use crate::statements::Statement;
    use slc_common::SourceSpan;

    fn sp() -> SourceSpan {
        SourceSpan::dummy()
    }

    #[test]
    fn test_program_round_trips_through_json() {
        let program = Program::new(vec![ClassDecl {
            name: "Main".to_string(),
            fields: vec![VarDecl::scalar("x", Type::Int, sp())],
            methods: vec![MethodDecl {
                name: "main".to_string(),
                return_type: Type::Void,
                parameters: vec![],
                body: Block::new(
                    vec![],
                    vec![Statement::assign(
                        Location::scalar("x", sp()),
                        Expression::binary(
                            BinaryOp::Add,
                            Expression::int(3, sp()),
                            Expression::int(4, sp()),
                        ),
                        sp(),
                    )],
                    sp(),
                ),
                span: sp(),
                symbol_id: None,
            }],
            span: sp(),
        }]);

        let json = serde_json::to_string(&program).unwrap();
        let back: Program = serde_json::from_str(&json).unwrap();
        assert_eq!(program, back);
    }

    #[test]
    fn test_annotation_slots_default_to_none() {
        // A parser that knows nothing about resolution can omit the slots.
        let json = r#"{
            "name": "x",
            "decl_type": "Int",
            "span": { "start": { "line": 1, "column": 1 },
                      "end":   { "line": 1, "column": 6 } }
        }"#;
        let decl: VarDecl = serde_json::from_str(json).unwrap();
        assert_eq!(decl.symbol_id, None);
        assert_eq!(decl.capacity, None);
    }
}
