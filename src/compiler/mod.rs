//! Infix-to-task-graph compiler.
//!
//! Turns a user-submitted arithmetic string into the flat task list the
//! scheduler stores. Three stages, each its own submodule:
//! 1. **`tokenizer`**: splits the string into numbers, operators and
//!    parentheses.
//! 2. **`rpn`**: shunting-yard conversion to postfix, with unary-minus
//!    disambiguation.
//! 3. **`tasks`**: one task per operator, with dependency edges wired
//!    through the operand stack. The last task created is the root.
//!
//! Per-operation latencies are injected via [`OpTimes`]; the compiler has no
//! global configuration.

pub mod error;
pub mod rpn;
pub mod tasks;
pub mod tokenizer;

#[cfg(test)]
mod tests;

use crate::config::OpTimes;
use crate::scheduler::types::{ExpressionId, Task};
pub use error::CompileError;

/// Compiles an infix expression into its task list.
///
/// The input should already be trimmed; interior whitespace is stripped
/// here before tokenizing.
pub fn compile(
    expr_id: &ExpressionId,
    expression: &str,
    op_times: &OpTimes,
) -> Result<Vec<Task>, CompileError> {
    let expression: String = expression.chars().filter(|c| !c.is_whitespace()).collect();
    if expression.is_empty() {
        return Err(CompileError::EmptyInput);
    }

    let tokens = tokenizer::tokenize(&expression);
    let rpn = rpn::infix_to_rpn(&tokens)?;
    tasks::rpn_to_tasks(expr_id, &rpn, op_times)
}
