use std::fmt::{self, Display, Formatter};
use thiserror::Error;

/// Raised synchronously by the registration calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid name: empty string")]
    EmptyName,
    #[error("invalid name '{0}': contains non-alphabetic character")]
    NonAlphabeticName(String),
    #[error("invalid variable name '{0}': a function already exists with that name")]
    FunctionNameTaken(String),
    #[error("invalid function name '{0}': same as the variable name")]
    VariableNameTaken(String),
    #[error("invalid operator symbol {symbol:?}: an operator cannot be {reason}")]
    InvalidOperatorSymbol { symbol: char, reason: &'static str },
}

/// What the parser was looking for when it hit an unexpected token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Value,
    Operator,
}

impl Display for Expected {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Value => write!(f, "number or function"),
            Expected::Operator => write!(f, "operator"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty expression")]
    EmptyExpression,
    #[error("expected {expected}, but got '{found}'")]
    UnexpectedToken { expected: Expected, found: String },
    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),
    #[error("unrecognized operation: {0}")]
    UnknownOperator(char),
    #[error("unrecognized function: {0}")]
    UnknownFunction(String),
    #[error("unmatched open parentheses")]
    UnmatchedOpenParenthesis,
    #[error("unmatched closed parentheses")]
    UnmatchedClosedParenthesis,
    #[error("too many operators (exhausted result stack)")]
    ResultStackExhausted,
    /// Kept as a final stack check. Values and operators alternate, so a
    /// token sequence that gets this far always has one value more than it
    /// has binary operators and the parser never returns this.
    #[error("too many values ({0} left on the result stack)")]
    ExcessValues(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("evaluation failed: uninitialized child node")]
    UninitializedNode,
}

/// Umbrella error for callers that go from text straight to a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}
