//! Compiler Tests
//!
//! Covers the full pipeline from infix string to task list: the task shapes
//! produced for representative expressions, the dependency wiring, and the
//! complete error table.

use super::{compile, CompileError};
use crate::config::OpTimes;
use crate::scheduler::types::{BinaryOp, ExpressionId, Operand, TaskKind};

fn compile_ok(expression: &str) -> Vec<crate::scheduler::types::Task> {
    compile(&ExpressionId::new(), expression, &OpTimes::default())
        .unwrap_or_else(|e| panic!("expected {:?} to compile, got {}", expression, e))
}

fn compile_err(expression: &str) -> CompileError {
    compile(&ExpressionId::new(), expression, &OpTimes::default())
        .err()
        .unwrap_or_else(|| panic!("expected {:?} to fail", expression))
}

// ============================================================
// Task shapes for representative expressions
// ============================================================

#[test]
fn test_simple_addition() {
    let tasks = compile_ok("2 + 3");

    assert_eq!(tasks.len(), 1);
    match &tasks[0].kind {
        TaskKind::Binary { op, args } => {
            assert_eq!(*op, BinaryOp::Add);
            assert_eq!(args[0], Operand::Literal(2.0));
            assert_eq!(args[1], Operand::Literal(3.0));
        }
        other => panic!("expected binary task, got {:?}", other),
    }
}

#[test]
fn test_multiplication_then_subtraction() {
    let tasks = compile_ok("5 * 4 - 1");

    assert_eq!(tasks.len(), 2);
    match &tasks[0].kind {
        TaskKind::Binary { op, args } => {
            assert_eq!(*op, BinaryOp::Multiply);
            assert_eq!(args[0], Operand::Literal(5.0));
            assert_eq!(args[1], Operand::Literal(4.0));
        }
        other => panic!("expected binary task, got {:?}", other),
    }
    match &tasks[1].kind {
        TaskKind::Binary { op, args } => {
            assert_eq!(*op, BinaryOp::Subtract);
            assert_eq!(args[0], Operand::TaskResult(tasks[0].id.clone()));
            assert_eq!(args[1], Operand::Literal(1.0));
        }
        other => panic!("expected binary task, got {:?}", other),
    }
}

#[test]
fn test_parentheses_and_power() {
    let tasks = compile_ok("(2 + 3) ^ 2");

    assert_eq!(tasks.len(), 2);
    match &tasks[0].kind {
        TaskKind::Binary { op, .. } => assert_eq!(*op, BinaryOp::Add),
        other => panic!("expected binary task, got {:?}", other),
    }
    match &tasks[1].kind {
        TaskKind::Binary { op, args } => {
            assert_eq!(*op, BinaryOp::Power);
            assert_eq!(args[0], Operand::TaskResult(tasks[0].id.clone()));
            assert_eq!(args[1], Operand::Literal(2.0));
        }
        other => panic!("expected binary task, got {:?}", other),
    }
}

#[test]
fn test_unary_minus() {
    let tasks = compile_ok("-5 + 3");

    assert_eq!(tasks.len(), 2);
    match &tasks[0].kind {
        TaskKind::Negate { arg } => assert_eq!(*arg, Operand::Literal(5.0)),
        other => panic!("expected unary task, got {:?}", other),
    }
    match &tasks[1].kind {
        TaskKind::Binary { op, args } => {
            assert_eq!(*op, BinaryOp::Add);
            assert_eq!(args[0], Operand::TaskResult(tasks[0].id.clone()));
            assert_eq!(args[1], Operand::Literal(3.0));
        }
        other => panic!("expected binary task, got {:?}", other),
    }
}

#[test]
fn test_precedence_multiplication_first() {
    let tasks = compile_ok("2 + 3 * 4");

    assert_eq!(tasks.len(), 2);
    match &tasks[0].kind {
        TaskKind::Binary { op, args } => {
            assert_eq!(*op, BinaryOp::Multiply);
            assert_eq!(args[0], Operand::Literal(3.0));
            assert_eq!(args[1], Operand::Literal(4.0));
        }
        other => panic!("expected binary task, got {:?}", other),
    }
    match &tasks[1].kind {
        TaskKind::Binary { op, args } => {
            assert_eq!(*op, BinaryOp::Add);
            assert_eq!(args[0], Operand::Literal(2.0));
            assert_eq!(args[1], Operand::TaskResult(tasks[0].id.clone()));
        }
        other => panic!("expected binary task, got {:?}", other),
    }
}

#[test]
fn test_unary_minus_binds_tighter_than_power() {
    // -2^2 negates the base first: tasks are u-(2) then (^ dep 2).
    let tasks = compile_ok("-2^2");

    assert_eq!(tasks.len(), 2);
    assert!(matches!(&tasks[0].kind, TaskKind::Negate { .. }));
    match &tasks[1].kind {
        TaskKind::Binary { op, args } => {
            assert_eq!(*op, BinaryOp::Power);
            assert_eq!(args[0], Operand::TaskResult(tasks[0].id.clone()));
        }
        other => panic!("expected binary task, got {:?}", other),
    }
}

#[test]
fn test_unary_minus_after_paren_and_operator() {
    // Both minuses here are unary: one after `(`, one after `*`.
    let tasks = compile_ok("(-1) * -2");

    assert_eq!(tasks.len(), 3);
    assert!(matches!(&tasks[0].kind, TaskKind::Negate { .. }));
    assert!(matches!(&tasks[1].kind, TaskKind::Negate { .. }));
    assert!(matches!(
        &tasks[2].kind,
        TaskKind::Binary {
            op: BinaryOp::Multiply,
            ..
        }
    ));
}

// ============================================================
// Structural properties
// ============================================================

#[test]
fn test_task_count_equals_operator_count() {
    for (expression, operators) in [
        ("1+2", 1),
        ("1+2*3", 2),
        ("(1+2)*(3+4)", 3),
        ("-1+2-3", 3),
        ("((1+1)+1)+1", 3),
    ] {
        let tasks = compile_ok(expression);
        assert_eq!(tasks.len(), operators, "for {:?}", expression);
    }
}

#[test]
fn test_dependencies_point_to_earlier_tasks() {
    let tasks = compile_ok("((1+2)*(3+4))^2 - -5");

    for (i, task) in tasks.iter().enumerate() {
        for dep in task.kind.dependencies() {
            let producer = tasks
                .iter()
                .position(|other| other.id == *dep)
                .unwrap_or_else(|| panic!("dependency {:?} not found", dep));
            assert!(producer < i, "task {} depends on later task {}", i, producer);
        }
    }
}

#[test]
fn test_operation_times_are_applied() {
    let op_times = OpTimes {
        addition_ms: 100,
        multiplication_ms: 200,
        unary_minus_ms: 300,
        ..OpTimes::default()
    };
    let tasks = compile(&ExpressionId::new(), "-1 * 2 + 3", &op_times)
        .expect("expression should compile");

    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks[0].op_time_ms, 300); // u-
    assert_eq!(tasks[1].op_time_ms, 200); // *
    assert_eq!(tasks[2].op_time_ms, 100); // +
}

// ============================================================
// Error table
// ============================================================

#[test]
fn test_unopened_parenthesis() {
    assert_eq!(compile_err("2 + 3)"), CompileError::UnopenedParen);
}

#[test]
fn test_unclosed_parenthesis() {
    assert_eq!(compile_err("(2 + 3"), CompileError::UnclosedParen);
}

#[test]
fn test_invalid_syntax() {
    assert_eq!(compile_err("2 + a"), CompileError::InvalidSyntax);
}

#[test]
fn test_invalid_number_token() {
    // `1.2.3` survives tokenizing as one token and fails float parsing.
    assert_eq!(compile_err("1.2.3 + 1"), CompileError::InvalidSyntax);
}

#[test]
fn test_lonely_unary_minus() {
    assert_eq!(compile_err("-+1"), CompileError::UnaryMinus);
}

#[test]
fn test_not_enough_operands() {
    assert_eq!(compile_err("3+"), CompileError::NotEnoughOperands);
}

#[test]
fn test_single_operand_rejected() {
    assert_eq!(compile_err("42"), CompileError::OneOperand);
}

#[test]
fn test_empty_input() {
    assert_eq!(compile_err(""), CompileError::EmptyInput);
    assert_eq!(compile_err("   "), CompileError::EmptyInput);
}

#[test]
fn test_adjacent_operands_rejected() {
    // "1 2 +" style RPN leftovers: more than one stack entry at the end.
    assert_eq!(compile_err("(1)(2)"), CompileError::Rpn);
}

#[test]
fn test_empty_parentheses_rejected() {
    assert_eq!(compile_err("()"), CompileError::Rpn);
}
