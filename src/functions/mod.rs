pub mod arithmetic;
pub mod elementary;

use crate::ast::Parser;
use crate::error::ConfigError;

/// Installs the standard operators and functions on `parser`.
pub fn register(parser: &mut Parser) -> Result<(), ConfigError> {
    arithmetic::register(parser)?;
    elementary::register(parser)
}
