//! Worker Tests
//!
//! Covers the arithmetic evaluation a worker performs on a dispatched task,
//! including the failure cases it reports back to the orchestrator.

use super::compute::{evaluate, ComputeError};
use crate::scheduler::types::Operation;

fn both(a: f64, b: f64) -> [Option<f64>; 2] {
    [Some(a), Some(b)]
}

// ============================================================
// Arithmetic
// ============================================================

#[test]
fn test_binary_operations() {
    assert_eq!(evaluate(Operation::Add, both(2.0, 3.0)), Ok(5.0));
    assert_eq!(evaluate(Operation::Subtract, both(20.0, 1.0)), Ok(19.0));
    assert_eq!(evaluate(Operation::Multiply, both(5.0, 4.0)), Ok(20.0));
    assert_eq!(evaluate(Operation::Divide, both(9.0, 3.0)), Ok(3.0));
    assert_eq!(evaluate(Operation::Power, both(5.0, 2.0)), Ok(25.0));
}

#[test]
fn test_unary_minus() {
    assert_eq!(evaluate(Operation::UnaryMinus, [Some(5.0), None]), Ok(-5.0));
    assert_eq!(evaluate(Operation::UnaryMinus, [Some(-2.5), None]), Ok(2.5));
}

#[test]
fn test_fractional_power() {
    assert_eq!(evaluate(Operation::Power, both(9.0, 0.5)), Ok(3.0));
}

// ============================================================
// Failures reported to the orchestrator
// ============================================================

#[test]
fn test_division_by_zero() {
    let err = evaluate(Operation::Divide, both(1.0, 0.0)).unwrap_err();
    assert_eq!(err, ComputeError::DivisionByZero);
    assert!(err.to_string().contains("division by zero"));
}

#[test]
fn test_missing_first_operand() {
    assert_eq!(
        evaluate(Operation::Add, [None, Some(1.0)]),
        Err(ComputeError::MissingFirstOperand)
    );
}

#[test]
fn test_missing_second_operand() {
    assert_eq!(
        evaluate(Operation::Multiply, [Some(1.0), None]),
        Err(ComputeError::MissingSecondOperand)
    );
}

#[test]
fn test_positive_overflow() {
    let err = evaluate(Operation::Multiply, both(f64::MAX, 2.0)).unwrap_err();
    assert_eq!(err, ComputeError::PositiveInfinity);
    assert_eq!(err.to_string(), "result is +Inf");
}

#[test]
fn test_negative_overflow() {
    let err = evaluate(Operation::Multiply, both(f64::MAX, -2.0)).unwrap_err();
    assert_eq!(err, ComputeError::NegativeInfinity);
    assert_eq!(err.to_string(), "result is -Inf");
}

#[test]
fn test_power_overflow() {
    let err = evaluate(Operation::Power, both(10.0, 1000.0)).unwrap_err();
    assert_eq!(err, ComputeError::PositiveInfinity);
}
