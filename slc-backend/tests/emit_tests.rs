//! Assembly emission tests: hand-built IR statements against the exact
//! text the emitter must produce.

use pretty_assertions::assert_eq;
use slc_backend::emit_program;
use slc_common::Type;
use slc_ir::{BinOp, Instr, IrLocation, IrProgram, IrStorage, Operand, UnOp};

fn frame(name: &str, offset: i32) -> IrLocation {
    IrLocation {
        name: name.to_string(),
        ty: Type::Int,
        storage: IrStorage::Frame { offset },
        capacity: None,
        index: None,
    }
}

fn global(name: &str) -> IrLocation {
    IrLocation {
        name: name.to_string(),
        ty: Type::Int,
        storage: IrStorage::Global,
        capacity: None,
        index: None,
    }
}

fn emit(instrs: Vec<Instr>) -> String {
    let mut program = IrProgram::new();
    for instr in instrs {
        program.push(instr);
    }
    emit_program(&program)
}

#[test]
fn test_addition_into_global() {
    let asm = emit(vec![
        Instr::Binary {
            op: BinOp::AddI,
            left: Operand::IntConst(3),
            right: Operand::IntConst(4),
            dest: frame("t0", -4),
        },
        Instr::Assign {
            src: Operand::Location(frame("t0", -4)),
            dest: global("x"),
        },
    ]);

    assert_eq!(
        asm,
        "    .text\n\
         \x20   movl $3,%ebx\n\
         \x20   addl $4,%ebx\n\
         \x20   movl %ebx,-4(%ebp)\n\
         \x20   movl -4(%ebp),%ebx\n\
         \x20   movl %ebx,x\n"
    );
}

#[test]
fn test_literal_assign_is_one_instruction() {
    let asm = emit(vec![Instr::Assign {
        src: Operand::IntConst(7),
        dest: frame("x", -4),
    }]);

    assert_eq!(asm, "    .text\n    movl $7,-4(%ebp)\n");
}

#[test]
fn test_method_prologue_and_epilogue() {
    let asm = emit(vec![
        Instr::MethodEntry {
            name: "main".to_string(),
        },
        Instr::Reserve { bytes: 8 },
        Instr::Return { value: None },
    ]);

    assert_eq!(
        asm,
        "    .text\n\
         \x20   .globl main\n\
         \x20   .type main, @function\n\
         main:\n\
         \x20   pushl %ebp\n\
         \x20   movl %esp,%ebp\n\
         \x20   subl $8,%esp\n\
         \x20   leave\n\
         \x20   ret\n"
    );
}

#[test]
fn test_return_value_travels_in_eax() {
    let asm = emit(vec![Instr::Return {
        value: Some(Operand::Location(frame("t0", -4))),
    }]);

    assert_eq!(
        asm,
        "    .text\n\
         \x20   movl -4(%ebp),%eax\n\
         \x20   leave\n\
         \x20   ret\n"
    );
}

#[test]
fn test_globals_become_comm_blocks() {
    let asm = emit(vec![
        Instr::Global {
            name: "g".to_string(),
            capacity: None,
        },
        Instr::Global {
            name: "arr".to_string(),
            capacity: Some(10),
        },
    ]);

    assert_eq!(
        asm,
        "    .text\n\
         \x20   .comm g,4,4\n\
         \x20   .comm arr,40,32\n"
    );
}

#[test]
fn test_labels_appear_only_where_jumps_land() {
    let mut program = IrProgram::new();
    let entry = program.new_label();
    program.bind(entry);
    let exit = program.new_label();
    program.push(Instr::JumpFalse {
        cond: Operand::BoolConst(true),
        target: exit,
    });
    program.push(Instr::Jump { target: entry });
    program.bind(exit);
    program.push(Instr::Return { value: None });

    assert_eq!(
        emit_program(&program),
        "    .text\n\
         L0:\n\
         \x20   movl $1,%ebx\n\
         \x20   cmpl $0,%ebx\n\
         \x20   je L2\n\
         \x20   jmp L0\n\
         L2:\n\
         \x20   leave\n\
         \x20   ret\n"
    );
}

#[test]
fn test_int_comparison_materializes_a_flag() {
    // One statement, so fresh labels start at L1.
    let asm = emit(vec![Instr::Binary {
        op: BinOp::LtI,
        left: Operand::Location(frame("x", -4)),
        right: Operand::IntConst(10),
        dest: frame("t0", -8),
    }]);

    assert_eq!(
        asm,
        "    .text\n\
         \x20   movl -4(%ebp),%ebx\n\
         \x20   cmpl $10,%ebx\n\
         \x20   jl L1\n\
         \x20   movl $0,%ebx\n\
         \x20   jmp L2\n\
         L1:\n\
         \x20   movl $1,%ebx\n\
         L2:\n\
         \x20   movl %ebx,-8(%ebp)\n"
    );
}

#[test]
fn test_modulo_takes_the_remainder_register() {
    let asm = emit(vec![Instr::Binary {
        op: BinOp::ModI,
        left: Operand::Location(frame("x", -4)),
        right: Operand::IntConst(3),
        dest: frame("t0", -8),
    }]);

    assert_eq!(
        asm,
        "    .text\n\
         \x20   movl -4(%ebp),%eax\n\
         \x20   movl $0,%edx\n\
         \x20   movl $3,%ecx\n\
         \x20   idivl %ecx\n\
         \x20   movl %edx,-8(%ebp)\n"
    );
}

#[test]
fn test_not_flips_through_the_carry_flag() {
    let asm = emit(vec![Instr::Unary {
        op: UnOp::Not,
        src: Operand::Location(frame("b", -4)),
        dest: frame("t0", -8),
    }]);

    assert_eq!(
        asm,
        "    .text\n\
         \x20   movl -4(%ebp),%ebx\n\
         \x20   notl %ebx\n\
         \x20   shrl $1,%ebx\n\
         \x20   jc L1\n\
         \x20   movl $0,%ebx\n\
         \x20   jmp L2\n\
         L1:\n\
         \x20   movl $1,%ebx\n\
         L2:\n\
         \x20   movl %ebx,-8(%ebp)\n"
    );

    // The trick itself: complementing a 0/1 value and shifting the low
    // bit out leaves the carry set exactly for a false source.
    for source in [0u32, 1u32] {
        let carry = (!source) & 1 == 1;
        assert_eq!(carry, source == 0);
    }
}

#[test]
fn test_call_cleans_up_pushed_arguments() {
    let asm = emit(vec![
        Instr::Push {
            value: Operand::IntConst(2),
        },
        Instr::Push {
            value: Operand::IntConst(1),
        },
        Instr::CallAssign {
            name: "add".to_string(),
            args: 2,
            dest: frame("t0", -4),
        },
    ]);

    assert_eq!(
        asm,
        "    .text\n\
         \x20   pushl $2\n\
         \x20   pushl $1\n\
         \x20   call add\n\
         \x20   addl $8,%esp\n\
         \x20   movl %eax,-4(%ebp)\n"
    );
}

#[test]
fn test_void_call_without_arguments_skips_cleanup() {
    let asm = emit(vec![Instr::Call {
        name: "ping".to_string(),
        args: 0,
    }]);

    assert_eq!(asm, "    .text\n    call ping\n");
}

#[test]
fn test_frame_array_element_addressing() {
    // Declared offset -8 with capacity 3: element 0 sits at -16.
    let dest = IrLocation {
        name: "arr".to_string(),
        ty: Type::Int,
        storage: IrStorage::Frame { offset: -8 },
        capacity: Some(3),
        index: Some(Box::new(Operand::Location(frame("i", -20)))),
    };
    let asm = emit(vec![Instr::Assign {
        src: Operand::IntConst(5),
        dest,
    }]);

    assert_eq!(
        asm,
        "    .text\n\
         \x20   movl -20(%ebp),%esi\n\
         \x20   movl $5,-16(%ebp,%esi,4)\n"
    );
}

#[test]
fn test_global_array_element_addressing() {
    let src = IrLocation {
        name: "table".to_string(),
        ty: Type::Int,
        storage: IrStorage::Global,
        capacity: Some(10),
        index: Some(Box::new(Operand::IntConst(2))),
    };
    let asm = emit(vec![Instr::Assign {
        src: Operand::Location(src),
        dest: frame("x", -4),
    }]);

    assert_eq!(
        asm,
        "    .text\n\
         \x20   movl $2,%esi\n\
         \x20   imull $4,%esi\n\
         \x20   movl table+0(%esi),%ebx\n\
         \x20   movl %ebx,-4(%ebp)\n"
    );
}

#[test]
fn test_float_arithmetic_through_the_x87_stack() {
    let f = IrLocation {
        name: "f".to_string(),
        ty: Type::Float,
        storage: IrStorage::Frame { offset: -4 },
        capacity: None,
        index: None,
    };
    let asm = emit(vec![Instr::Binary {
        op: BinOp::MulF,
        left: Operand::FloatConst(2.0),
        right: Operand::Location(f.clone()),
        dest: frame("t0", -8),
    }]);

    assert_eq!(
        asm,
        format!(
            "    .text\n\
             \x20   flds L1\n\
             \x20   fmuls -4(%ebp)\n\
             \x20   fstps -8(%ebp)\n\
             L1: .long {}\n",
            2.0f32.to_bits()
        )
    );
}

#[test]
fn test_float_comparison_orders_through_the_status_word() {
    let asm = emit(vec![Instr::Binary {
        op: BinOp::LtF,
        left: Operand::Location(frame("f", -4)),
        right: Operand::FloatConst(4.0),
        dest: frame("t0", -8),
    }]);

    assert_eq!(
        asm,
        format!(
            "    .text\n\
             \x20   flds -4(%ebp)\n\
             \x20   fcomps L1\n\
             \x20   fnstsw %ax\n\
             \x20   sahf\n\
             \x20   jb L2\n\
             \x20   movl $0,%ebx\n\
             \x20   jmp L3\n\
             L2:\n\
             \x20   movl $1,%ebx\n\
             L3:\n\
             \x20   movl %ebx,-8(%ebp)\n\
             L1: .long {}\n",
            4.0f32.to_bits()
        )
    );
}

#[test]
fn test_each_float_occurrence_gets_its_own_pool_entry() {
    let asm = emit(vec![
        Instr::Assign {
            src: Operand::FloatConst(2.5),
            dest: frame("a", -4),
        },
        Instr::Assign {
            src: Operand::FloatConst(2.5),
            dest: frame("b", -8),
        },
    ]);

    let pool_lines = asm.lines().filter(|line| line.contains(".long")).count();
    assert_eq!(pool_lines, 2);
    assert!(asm.contains("movl L2,%ebx"));
    assert!(asm.contains("movl L3,%ebx"));
}
