use crate::ast::Parser;
use crate::error::ConfigError;

pub fn register(parser: &mut Parser) -> Result<(), ConfigError> {
    parser.add_function("sqrt", f64::sqrt)?;
    parser.add_function("cos", f64::cos)?;
    parser.add_function("sin", f64::sin)?;
    parser.add_function("tan", f64::tan)?;
    parser.add_function("exp", f64::exp)?;
    parser.add_function("ln", f64::ln)
}
