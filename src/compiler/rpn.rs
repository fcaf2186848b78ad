use super::error::CompileError;
use super::tokenizer::Token;
use crate::scheduler::types::BinaryOp;

/// A token of the postfix form. Numbers are parsed here, so downstream code
/// never re-parses strings.
#[derive(Debug, Clone, PartialEq)]
pub enum RpnToken {
    Number(f64),
    Binary(BinaryOp),
    UnaryMinus,
}

/// `u-` binds tighter than everything else so `-2^2` negates the base.
fn precedence(op: &RpnToken) -> u8 {
    match op {
        RpnToken::Binary(BinaryOp::Add) | RpnToken::Binary(BinaryOp::Subtract) => 1,
        RpnToken::Binary(BinaryOp::Multiply) | RpnToken::Binary(BinaryOp::Divide) => 2,
        RpnToken::Binary(BinaryOp::Power) => 3,
        RpnToken::UnaryMinus => 4,
        RpnToken::Number(_) => 0,
    }
}

/// A minus is unary when it cannot be an infix operator: at the start of the
/// expression, after `(`, or after another operator.
fn is_unary_minus(tokens: &[Token], i: usize) -> bool {
    if i == 0 {
        return true;
    }
    let prev = &tokens[i - 1];
    *prev == Token::LParen || prev.is_operator()
}

/// Shunting-yard: infix tokens to reverse Polish notation.
///
/// All operators are treated as left-associative (the stack is popped on
/// equal precedence). Minus tokens are relabelled `u-` per `is_unary_minus`
/// before any precedence comparison.
pub fn infix_to_rpn(tokens: &[Token]) -> Result<Vec<RpnToken>, CompileError> {
    let mut output: Vec<RpnToken> = Vec::new();
    // Operator stack; `None` marks an open parenthesis.
    let mut stack: Vec<Option<RpnToken>> = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        let op = match token {
            Token::Number(text) => {
                let value: f64 = text.parse().map_err(|_| CompileError::InvalidSyntax)?;
                output.push(RpnToken::Number(value));
                continue;
            }
            Token::LParen => {
                stack.push(None);
                continue;
            }
            Token::RParen => {
                loop {
                    match stack.pop() {
                        Some(Some(op)) => output.push(op),
                        Some(None) => break,
                        None => return Err(CompileError::UnopenedParen),
                    }
                }
                continue;
            }
            Token::Plus => RpnToken::Binary(BinaryOp::Add),
            Token::Minus => {
                if is_unary_minus(tokens, i) {
                    RpnToken::UnaryMinus
                } else {
                    RpnToken::Binary(BinaryOp::Subtract)
                }
            }
            Token::Star => RpnToken::Binary(BinaryOp::Multiply),
            Token::Slash => RpnToken::Binary(BinaryOp::Divide),
            Token::Caret => RpnToken::Binary(BinaryOp::Power),
            Token::Unknown(_) => return Err(CompileError::InvalidSyntax),
        };

        while let Some(Some(top)) = stack.last() {
            if precedence(&op) > precedence(top) {
                break;
            }
            if let Some(Some(popped)) = stack.pop() {
                output.push(popped);
            }
        }
        stack.push(Some(op));
    }

    while let Some(entry) = stack.pop() {
        match entry {
            Some(op) => output.push(op),
            None => return Err(CompileError::UnclosedParen),
        }
    }

    Ok(output)
}
