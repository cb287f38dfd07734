use itertools::{Itertools, PeekingNext};

use super::{FormatErrorType, Result};

#[derive(PartialEq, Debug)]
pub enum Token {
    Or,
    Symbol(String)
}

// Everything from the first `#` on is a comment, even inside a symbol
pub fn strip_comment(line: &str) -> &str {
    match line.split_once('#') {
        Some((code, _)) => code,
        None => line
    }
}

// Splits a rule line into the text either side of its only `->`
pub fn split_rule(line: &str) -> Result<(&str, &str)> {
    let mut sides = line.split("->");
    match (sides.next(), sides.next(), sides.next()) {
        (Some(lhs), Some(rhs), None) => Ok((lhs, rhs)),
        (_, None, _) => Err(FormatErrorType::MissingSeparator),
        _ => Err(FormatErrorType::UnexpectedSeparator)
    }
}

fn is_symbol_char(c: char) -> bool {
    !c.is_whitespace() && c != '|'
}

pub fn lex_symbol(line: &mut impl PeekingNext<Item = char>) -> Result<Token> {
    Ok(Token::Symbol(line.peeking_take_while(|&c| is_symbol_char(c)).collect()))
}

// Lexes the right side of a rule
pub fn lex_line(line: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();

    let mut line_chars = line.chars().peekable();

    while let Some(&c) = line_chars.peek() {
        if c == '|' {
            line_chars.next();
            tokens.push(Token::Or);
        } else if is_symbol_char(c) {
            tokens.push(lex_symbol(&mut line_chars)?);
        } else {
            line_chars.next();
        }
    }

    return Ok(tokens);
}
