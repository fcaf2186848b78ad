use crate::scheduler::types::Operation;
use thiserror::Error;

/// Operator-level failures a worker reports back through the completion
/// `error` field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComputeError {
    #[error("division by zero not allowed")]
    DivisionByZero,

    #[error("first operand cannot be empty")]
    MissingFirstOperand,

    #[error("second operand cannot be empty")]
    MissingSecondOperand,

    #[error("result is +Inf")]
    PositiveInfinity,

    #[error("result is -Inf")]
    NegativeInfinity,
}

/// Performs one elementary operation. Slot 1 is `None` only for unary
/// minus; a missing slot anywhere else is a malformed dispatch.
pub fn evaluate(op: Operation, args: [Option<f64>; 2]) -> Result<f64, ComputeError> {
    let a = args[0].ok_or(ComputeError::MissingFirstOperand)?;

    let result = match op {
        Operation::UnaryMinus => -a,
        binary => {
            let b = args[1].ok_or(ComputeError::MissingSecondOperand)?;
            match binary {
                Operation::Add => a + b,
                Operation::Subtract => a - b,
                Operation::Multiply => a * b,
                Operation::Divide => {
                    if b == 0.0 {
                        return Err(ComputeError::DivisionByZero);
                    }
                    a / b
                }
                Operation::Power => a.powf(b),
                Operation::UnaryMinus => unreachable!("handled above"),
            }
        }
    };

    if result.is_infinite() {
        return Err(if result > 0.0 {
            ComputeError::PositiveInfinity
        } else {
            ComputeError::NegativeInfinity
        });
    }

    Ok(result)
}
