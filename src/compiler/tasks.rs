use super::error::CompileError;
use super::rpn::RpnToken;
use crate::config::OpTimes;
use crate::scheduler::types::{ExpressionId, Operand, Operation, Task, TaskKind};

/// Walks an RPN sequence and emits one task per operator, wiring dependency
/// edges through the operand stack.
///
/// Stack entries are either literals or the ids of already-created tasks, so
/// a popped operand directly becomes a task input slot. Tasks come out in
/// creation order (post-order of the expression tree): the last task is the
/// root whose result is the expression result.
pub fn rpn_to_tasks(
    expr_id: &ExpressionId,
    rpn: &[RpnToken],
    op_times: &OpTimes,
) -> Result<Vec<Task>, CompileError> {
    let mut tasks: Vec<Task> = Vec::new();
    let mut stack: Vec<Operand> = Vec::new();

    for token in rpn {
        match token {
            RpnToken::Number(value) => stack.push(Operand::Literal(*value)),
            RpnToken::Binary(op) => {
                let (Some(b), Some(a)) = (stack.pop(), stack.pop()) else {
                    return Err(CompileError::NotEnoughOperands);
                };
                let task = Task::new(
                    expr_id.clone(),
                    TaskKind::Binary { op: *op, args: [a, b] },
                    op_times.for_op((*op).into()),
                );
                stack.push(Operand::TaskResult(task.id.clone()));
                tasks.push(task);
            }
            RpnToken::UnaryMinus => {
                let Some(arg) = stack.pop() else {
                    return Err(CompileError::UnaryMinus);
                };
                let task = Task::new(
                    expr_id.clone(),
                    TaskKind::Negate { arg },
                    op_times.for_op(Operation::UnaryMinus),
                );
                stack.push(Operand::TaskResult(task.id.clone()));
                tasks.push(task);
            }
        }
    }

    if stack.len() != 1 {
        return Err(CompileError::Rpn);
    }
    // A single literal and no operators: nothing to schedule.
    if tasks.is_empty() {
        return Err(CompileError::OneOperand);
    }

    Ok(tasks)
}
