pub mod ast;
pub mod error;
pub mod functions;

use ast::Parser;
pub use error::{ConfigError, EvalError, Expected, Error, ParseError};

/// Parses `expression` with the standard operators and functions and
/// evaluates it with the variable `x` bound to `x`.
pub fn evaluate_expression(expression: &str, x: f64) -> Result<f64, Error> {
    let ast = Parser::standard()?.parse(expression)?;
    Ok(ast.eval(x)?)
}
