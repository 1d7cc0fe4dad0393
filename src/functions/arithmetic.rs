use crate::ast::{Parser, Precedence};
use crate::error::ConfigError;

pub fn register(parser: &mut Parser) -> Result<(), ConfigError> {
    parser.add_operator('+', |left, right| left + right, Precedence::Addition)?;
    parser.add_operator('-', |left, right| left - right, Precedence::Addition)?;
    parser.add_operator('*', |left, right| left * right, Precedence::Multiplication)?;
    // IEEE semantics: dividing by zero yields an infinity or NaN.
    parser.add_operator('/', |left, right| left / right, Precedence::Multiplication)?;
    parser.add_operator('^', f64::powf, Precedence::Exponentiation)
}
