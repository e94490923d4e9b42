//! Textual activation syntax
//!
//! ```text
//! or      := and ("||" and)*
//! and     := unary ("&&" unary)*
//! unary   := "!" unary | "(" or ")" | "true" | "false" | operand cmp operand
//! operand := "x" digits | "sum" | digits
//! cmp     := "==" | "!=" | ">=" | "<=" | ">" | "<"
//! ```

use std::iter::Peekable;
use std::str::CharIndices;

use super::expr::{Activation, CmpOp, Operand};
use super::ActivationError;

type Chars<'a> = Peekable<CharIndices<'a>>;

/// Parse an activation such as `x0 > 0 && (x1 == 0 || sum >= 3)`
pub fn parse_activation(input: &str) -> Result<Activation, ActivationError> {
    let mut chars = input.char_indices().peekable();
    let expr = parse_or(&mut chars, input)?;

    consume_whitespace(&mut chars);
    match chars.peek() {
        None => Ok(expr),
        Some(&(offset, c)) => Err(syntax(offset, format!("unexpected '{}'", c))),
    }
}

fn parse_or(chars: &mut Chars, input: &str) -> Result<Activation, ActivationError> {
    let mut left = parse_and(chars, input)?;
    loop {
        consume_whitespace(chars);
        if !eat(chars, "||") {
            return Ok(left);
        }
        let right = parse_and(chars, input)?;
        left = Activation::Or(Box::new(left), Box::new(right));
    }
}

fn parse_and(chars: &mut Chars, input: &str) -> Result<Activation, ActivationError> {
    let mut left = parse_unary(chars, input)?;
    loop {
        consume_whitespace(chars);
        if !eat(chars, "&&") {
            return Ok(left);
        }
        let right = parse_unary(chars, input)?;
        left = Activation::And(Box::new(left), Box::new(right));
    }
}

fn parse_unary(chars: &mut Chars, input: &str) -> Result<Activation, ActivationError> {
    consume_whitespace(chars);

    if eat(chars, "!") {
        return Ok(Activation::Not(Box::new(parse_unary(chars, input)?)));
    }

    if eat(chars, "(") {
        let inner = parse_or(chars, input)?;
        consume_whitespace(chars);
        if !eat(chars, ")") {
            return Err(syntax(offset(chars, input), "expected ')'".to_string()));
        }
        return Ok(inner);
    }

    if eat_word(chars, "true") {
        return Ok(Activation::Const(true));
    }
    if eat_word(chars, "false") {
        return Ok(Activation::Const(false));
    }

    let left = parse_operand(chars, input)?;
    consume_whitespace(chars);
    let op = parse_cmp(chars, input)?;
    let right = parse_operand(chars, input)?;

    Ok(Activation::Compare { left, op, right })
}

fn parse_operand(chars: &mut Chars, input: &str) -> Result<Operand, ActivationError> {
    consume_whitespace(chars);
    let start = offset(chars, input);

    if eat_word(chars, "sum") {
        return Ok(Operand::Sum);
    }

    if eat(chars, "x") {
        let digits = take_digits(chars);
        return digits
            .parse::<usize>()
            .map(Operand::Count)
            .map_err(|_| syntax(start, "expected a path index after 'x'".to_string()));
    }

    let digits = take_digits(chars);
    if digits.is_empty() {
        return Err(syntax(
            start,
            "expected an operand (x<index>, sum or a number)".to_string(),
        ));
    }
    digits
        .parse::<u64>()
        .map(Operand::Literal)
        .map_err(|e| syntax(start, format!("bad number {:?}: {}", digits, e)))
}

fn parse_cmp(chars: &mut Chars, input: &str) -> Result<CmpOp, ActivationError> {
    // Two-character operators first so ">=" is not read as ">"
    let operators = [
        (">=", CmpOp::Gte),
        ("<=", CmpOp::Lte),
        ("==", CmpOp::Eq),
        ("!=", CmpOp::NotEq),
        (">", CmpOp::Gt),
        ("<", CmpOp::Lt),
    ];

    for (token, op) in operators {
        if eat(chars, token) {
            return Ok(op);
        }
    }

    Err(syntax(
        offset(chars, input),
        "expected a comparison operator".to_string(),
    ))
}

/// Consume `token` if the input continues with it
fn eat(chars: &mut Chars, token: &str) -> bool {
    let mut probe = chars.clone();
    for expected in token.chars() {
        match probe.next() {
            Some((_, c)) if c == expected => {}
            _ => return false,
        }
    }
    *chars = probe;
    true
}

/// Like [`eat`], but `word` must not run on into further identifier characters
fn eat_word(chars: &mut Chars, word: &str) -> bool {
    let mut probe = chars.clone();
    if !eat(&mut probe, word) {
        return false;
    }
    if matches!(probe.peek(), Some(&(_, c)) if c.is_alphanumeric() || c == '_') {
        return false;
    }
    *chars = probe;
    true
}

fn take_digits(chars: &mut Chars) -> String {
    let mut digits = String::new();
    while let Some(&(_, c)) = chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        chars.next();
    }
    digits
}

fn consume_whitespace(chars: &mut Chars) {
    while let Some(&(_, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else {
            break;
        }
    }
}

fn offset(chars: &mut Chars, input: &str) -> usize {
    chars.peek().map_or(input.len(), |&(i, _)| i)
}

fn syntax(offset: usize, message: String) -> ActivationError {
    ActivationError::Syntax { offset, message }
}
