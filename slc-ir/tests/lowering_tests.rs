//! End-to-end lowering tests: build a tree, run it through resolution
//! and type checking, lower it, and compare the printed statement list.

use pretty_assertions::assert_eq;
use slc_ast::{
    AssignOp, BinaryOp, Block, ClassDecl, Expression, Location, MethodCall, MethodDecl,
    Parameter, Program, Statement, StatementKind, VarDecl,
};
use slc_common::{SourceSpan, Symbol, SymbolMap, Type};
use slc_ir::IrProgram;

fn sp() -> SourceSpan {
    SourceSpan::dummy()
}

fn stmt(kind: StatementKind) -> Statement {
    Statement::new(kind, sp())
}

fn method(name: &str, return_type: Type, parameters: Vec<Parameter>, body: Block) -> MethodDecl {
    MethodDecl {
        name: name.to_string(),
        return_type,
        parameters,
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

fn main_only(decls: Vec<VarDecl>, statements: Vec<Statement>) -> Program {
    single_class(
        vec![],
        vec![method(
            "main",
            Type::Void,
            vec![],
            Block::new(decls, statements, sp()),
        )],
    )
}

fn lower(mut program: Program) -> (IrProgram, SymbolMap) {
    let symbols = slc_sema::analyze(&mut program).expect("test program is semantically clean");
    slc_ir::generate(&program, symbols)
}

fn named<'a>(symbols: &'a SymbolMap, name: &str) -> &'a Symbol {
    symbols
        .iter()
        .find(|symbol| symbol.name == name)
        .expect("symbol registered")
}

#[test]
fn test_addition_into_local() {
    let program = main_only(
        vec![VarDecl::scalar("x", Type::Int, sp())],
        vec![Statement::assign(
            Location::scalar("x", sp()),
            Expression::binary(
                BinaryOp::Add,
                Expression::int(3, sp()),
                Expression::int(4, sp()),
            ),
            sp(),
        )],
    );

    let (ir, _) = lower(program);
    assert_eq!(
        ir.to_text(),
        "L0: INITML main\n\
         L1: RESERVE 8\n\
         L2: ADDI 3 4 t0\n\
         L3: ASSIGN t0 x\n\
         L4: RET\n"
    );
}

#[test]
fn test_addition_into_global_field() {
    let program = single_class(
        vec![VarDecl::scalar("x", Type::Int, sp())],
        vec![method(
            "main",
            Type::Void,
            vec![],
            Block::new(
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
        )],
    );

    let (ir, _) = lower(program);
    assert_eq!(
        ir.to_text(),
        "L0: GLOBAL x\n\
         L1: INITML main\n\
         L2: RESERVE 4\n\
         L3: ADDI 3 4 t0\n\
         L4: ASSIGN t0 x\n\
         L5: RET\n"
    );
}

#[test]
fn test_literal_assign_needs_no_temporary() {
    let program = main_only(
        vec![VarDecl::scalar("x", Type::Int, sp())],
        vec![Statement::assign(
            Location::scalar("x", sp()),
            Expression::int(7, sp()),
            sp(),
        )],
    );

    let (ir, _) = lower(program);
    assert_eq!(
        ir.to_text(),
        "L0: INITML main\n\
         L1: RESERVE 4\n\
         L2: ASSIGN 7 x\n\
         L3: RET\n"
    );
}

#[test]
fn test_compound_assign_reads_then_writes_target() {
    let program = main_only(
        vec![VarDecl::scalar("x", Type::Int, sp())],
        vec![Statement::compound_assign(
            Location::scalar("x", sp()),
            AssignOp::AddAssign,
            Expression::int(2, sp()),
            sp(),
        )],
    );

    let (ir, _) = lower(program);
    assert_eq!(
        ir.to_text(),
        "L0: INITML main\n\
         L1: RESERVE 8\n\
         L2: ADDI x 2 t0\n\
         L3: ASSIGN t0 x\n\
         L4: RET\n"
    );
}

#[test]
fn test_if_else_branch_wiring() {
    let cond = Expression::location(Location::scalar("flag", sp()));
    let program = main_only(
        vec![
            VarDecl::scalar("flag", Type::Boolean, sp()),
            VarDecl::scalar("x", Type::Int, sp()),
        ],
        vec![stmt(StatementKind::If {
            condition: cond,
            then_block: Block::new(
                vec![],
                vec![Statement::assign(
                    Location::scalar("x", sp()),
                    Expression::int(1, sp()),
                    sp(),
                )],
                sp(),
            ),
            else_block: Some(Block::new(
                vec![],
                vec![Statement::assign(
                    Location::scalar("x", sp()),
                    Expression::int(2, sp()),
                    sp(),
                )],
                sp(),
            )),
        })],
    );

    let (ir, _) = lower(program);
    assert_eq!(
        ir.to_text(),
        "L0: INITML main\n\
         L1: RESERVE 8\n\
         L2: IFF flag L5\n\
         L3: ASSIGN 1 x\n\
         L4: GOTO L6\n\
         L5: ASSIGN 2 x\n\
         L6: RET\n"
    );
}

#[test]
fn test_while_loop_tests_at_the_top() {
    let program = main_only(
        vec![
            VarDecl::scalar("flag", Type::Boolean, sp()),
            VarDecl::scalar("x", Type::Int, sp()),
        ],
        vec![stmt(StatementKind::While {
            condition: Expression::location(Location::scalar("flag", sp())),
            body: Block::new(
                vec![],
                vec![Statement::assign(
                    Location::scalar("x", sp()),
                    Expression::int(1, sp()),
                    sp(),
                )],
                sp(),
            ),
        })],
    );

    let (ir, _) = lower(program);
    assert_eq!(
        ir.to_text(),
        "L0: INITML main\n\
         L1: RESERVE 8\n\
         L2: IFF flag L5\n\
         L3: ASSIGN 1 x\n\
         L4: GOTO L2\n\
         L5: RET\n"
    );
}

#[test]
fn test_break_jumps_past_the_loop() {
    let program = main_only(
        vec![VarDecl::scalar("flag", Type::Boolean, sp())],
        vec![stmt(StatementKind::While {
            condition: Expression::location(Location::scalar("flag", sp())),
            body: Block::new(vec![], vec![stmt(StatementKind::Break)], sp()),
        })],
    );

    let (ir, _) = lower(program);
    assert_eq!(
        ir.to_text(),
        "L0: INITML main\n\
         L1: RESERVE 4\n\
         L2: IFF flag L5\n\
         L3: GOTO L5\n\
         L4: GOTO L2\n\
         L5: RET\n"
    );
}

#[test]
fn test_for_continue_runs_the_increment() {
    let program = main_only(
        vec![VarDecl::scalar("i", Type::Int, sp())],
        vec![stmt(StatementKind::For {
            var: Location::scalar("i", sp()),
            from: Expression::int(1, sp()),
            to: Expression::int(10, sp()),
            body: Block::new(vec![], vec![stmt(StatementKind::Continue)], sp()),
        })],
    );

    let (ir, _) = lower(program);
    // continue lands on the increment (L6), never back on the test
    // directly, so the induction variable always advances.
    assert_eq!(
        ir.to_text(),
        "L0: INITML main\n\
         L1: RESERVE 12\n\
         L2: ASSIGN 1 i\n\
         L3: LEI i 10 t0\n\
         L4: IFF t0 L9\n\
         L5: GOTO L6\n\
         L6: ADDI i 1 t1\n\
         L7: ASSIGN t1 i\n\
         L8: GOTO L3\n\
         L9: RET\n"
    );
}

#[test]
fn test_call_pushes_arguments_right_to_left() {
    let add = method(
        "add",
        Type::Int,
        vec![
            Parameter::new("a", Type::Int, sp()),
            Parameter::new("b", Type::Int, sp()),
        ],
        Block::new(
            vec![],
            vec![Statement::ret(
                Some(Expression::binary(
                    BinaryOp::Add,
                    Expression::location(Location::scalar("a", sp())),
                    Expression::location(Location::scalar("b", sp())),
                )),
                sp(),
            )],
            sp(),
        ),
    );
    let main = method(
        "main",
        Type::Void,
        vec![],
        Block::new(
            vec![VarDecl::scalar("x", Type::Int, sp())],
            vec![Statement::assign(
                Location::scalar("x", sp()),
                Expression::call(MethodCall::new(
                    "add",
                    vec![Expression::int(1, sp()), Expression::int(2, sp())],
                    sp(),
                )),
                sp(),
            )],
            sp(),
        ),
    );

    let (ir, symbols) = lower(single_class(vec![], vec![add, main]));
    assert_eq!(
        ir.to_text(),
        "L0: INITML add\n\
         L1: RESERVE 4\n\
         L2: ADDI a b t0\n\
         L3: RETV t0\n\
         L4: RET\n\
         L5: INITML main\n\
         L6: RESERVE 8\n\
         L7: PUSH 2\n\
         L8: PUSH 1\n\
         L9: CALLA add t0\n\
         L10: ASSIGN t0 x\n\
         L11: RET\n"
    );

    // Arguments read upward from +8 in declaration order.
    assert_eq!(named(&symbols, "a").offset, Some(8));
    assert_eq!(named(&symbols, "b").offset, Some(12));
}

#[test]
fn test_void_call_in_statement_position() {
    let ping = method("ping", Type::Void, vec![], Block::new(vec![], vec![], sp()));
    let main = method(
        "main",
        Type::Void,
        vec![],
        Block::new(
            vec![],
            vec![stmt(StatementKind::Call(MethodCall::new(
                "ping",
                vec![],
                sp(),
            )))],
            sp(),
        ),
    );

    let (ir, _) = lower(single_class(vec![], vec![ping, main]));
    assert_eq!(
        ir.to_text(),
        "L0: INITML ping\n\
         L1: RESERVE 0\n\
         L2: RET\n\
         L3: INITML main\n\
         L4: RESERVE 0\n\
         L5: CALL ping\n\
         L6: RET\n"
    );
}

#[test]
fn test_fields_become_globals() {
    let program = single_class(
        vec![
            VarDecl::scalar("g", Type::Int, sp()),
            VarDecl::array("arr", Type::Float, 10, sp()),
        ],
        vec![method(
            "main",
            Type::Void,
            vec![],
            Block::new(vec![], vec![], sp()),
        )],
    );

    let (ir, symbols) = lower(program);
    assert_eq!(
        ir.to_text(),
        "L0: GLOBAL g\n\
         L1: GLOBAL arr[10]\n\
         L2: INITML main\n\
         L3: RESERVE 0\n\
         L4: RET\n"
    );

    // Globals carry no frame offset.
    assert_eq!(named(&symbols, "g").offset, None);
}

#[test]
fn test_array_frame_layout_and_distinct_offsets() {
    let program = main_only(
        vec![
            VarDecl::scalar("a", Type::Int, sp()),
            VarDecl::array("arr", Type::Int, 3, sp()),
            VarDecl::scalar("b", Type::Int, sp()),
        ],
        vec![Statement::assign(
            Location::indexed(
                "arr",
                Expression::location(Location::scalar("a", sp())),
                sp(),
            ),
            Expression::int(5, sp()),
            sp(),
        )],
    );

    let (ir, symbols) = lower(program);
    assert_eq!(
        ir.to_text(),
        "L0: INITML main\n\
         L1: RESERVE 20\n\
         L2: ASSIGN 5 arr[a]\n\
         L3: RET\n"
    );

    // The declared offset addresses the array's last element; the
    // scalars on either side do not overlap its slots.
    assert_eq!(named(&symbols, "a").offset, Some(-4));
    assert_eq!(named(&symbols, "arr").offset, Some(-8));
    assert_eq!(named(&symbols, "b").offset, Some(-20));
}

#[test]
fn test_float_operands_select_float_opcodes() {
    let program = main_only(
        vec![
            VarDecl::scalar("f", Type::Float, sp()),
            VarDecl::scalar("cmp", Type::Boolean, sp()),
        ],
        vec![
            Statement::assign(
                Location::scalar("f", sp()),
                Expression::binary(
                    BinaryOp::Mul,
                    Expression::float(2.0, sp()),
                    Expression::float(1.5, sp()),
                ),
                sp(),
            ),
            Statement::assign(
                Location::scalar("cmp", sp()),
                Expression::binary(
                    BinaryOp::Less,
                    Expression::location(Location::scalar("f", sp())),
                    Expression::float(4.0, sp()),
                ),
                sp(),
            ),
        ],
    );

    let (ir, _) = lower(program);
    assert_eq!(
        ir.to_text(),
        "L0: INITML main\n\
         L1: RESERVE 16\n\
         L2: MULF 2.0 1.5 t0\n\
         L3: ASSIGN t0 f\n\
         L4: LTF f 4.0 t1\n\
         L5: ASSIGN t1 cmp\n\
         L6: RET\n"
    );
}
