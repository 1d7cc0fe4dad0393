use std::fmt::{self, Display, Formatter};

/// A classified lexeme. Symbols are not checked against the operator table
/// here; the parser is the only place an unknown symbol is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Number(String),
    Identifier(String),
    Symbol(char),
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(text) | Token::Identifier(text) => write!(f, "{}", text),
            Token::Symbol(symbol) => write!(f, "{}", symbol),
        }
    }
}

fn is_number_start(ch: char) -> bool {
    ch.is_ascii_digit() || ch == '.'
}

/// Splits `input` into tokens. Never fails.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
        } else if is_number_start(ch) {
            let mut end = start;
            let mut seen_dot = false;
            while let Some(&(i, c)) = chars.peek() {
                if c.is_ascii_digit() || (c == '.' && !seen_dot) {
                    seen_dot |= c == '.';
                    end = i + c.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(Token::Number(input[start..end].to_string()));
        } else if ch.is_alphabetic() {
            let mut end = start;
            while let Some(&(i, c)) = chars.peek() {
                if !c.is_alphabetic() {
                    break;
                }
                end = i + c.len_utf8();
                chars.next();
            }
            tokens.push(Token::Identifier(input[start..end].to_string()));
        } else {
            tokens.push(Token::Symbol(ch));
            chars.next();
        }
    }

    tokens
}
