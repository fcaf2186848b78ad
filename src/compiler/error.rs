use thiserror::Error;

/// Everything that can go wrong between an infix string and a task list.
/// All of these surface to the client as 422 with the message below.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("empty input")]
    EmptyInput,

    #[error("unopened parenthesis")]
    UnopenedParen,

    #[error("unclosed parenthesis")]
    UnclosedParen,

    #[error("invalid syntax")]
    InvalidSyntax,

    #[error("not enough operands")]
    NotEnoughOperands,

    #[error("not enough operands for the unary minus")]
    UnaryMinus,

    #[error("expression must contain at least one operation")]
    OneOperand,

    #[error("error during converting to RPN")]
    Rpn,
}
