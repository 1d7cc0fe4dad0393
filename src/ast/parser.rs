use crate::ast::{tokenize, BinaryFn, ExprNode, Precedence, Registry, Token, UnaryFn};
use crate::error::{ConfigError, Expected, ParseError};
use crate::functions;
use log::{debug, trace};
use std::sync::Arc;

/// An operator-stack entry waiting for its operands.
enum Pending {
    Unary { name: String, func: UnaryFn },
    Binary { symbol: char, func: BinaryFn },
    Group,
}

struct StackEntry {
    precedence: Precedence,
    pending: Pending,
}

impl StackEntry {
    fn is_group(&self) -> bool {
        matches!(self.pending, Pending::Group)
    }
}

/// Operator-precedence parser for single-variable expressions.
///
/// Each parser owns its own [`Registry`]; mutate it between calls to
/// [`Parser::parse`], never during one.
#[derive(Clone, Default)]
pub struct Parser {
    registry: Registry,
}

impl Parser {
    /// A parser with variable `x` and nothing else registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// A parser with the standard operators and functions installed.
    pub fn standard() -> Result<Self, ConfigError> {
        let mut parser = Self::new();
        functions::register(&mut parser)?;
        Ok(parser)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn variable_name(&self) -> &str {
        self.registry.variable_name()
    }

    pub fn set_variable_name(&mut self, name: &str) -> Result<(), ConfigError> {
        self.registry.set_variable_name(name)
    }

    pub fn add_operator<F>(
        &mut self,
        symbol: char,
        func: F,
        precedence: Precedence,
    ) -> Result<(), ConfigError>
    where
        F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        self.registry.add_operator(symbol, func, precedence)
    }

    pub fn remove_operator(&mut self, symbol: char) -> bool {
        self.registry.remove_operator(symbol)
    }

    pub fn add_function<F>(&mut self, name: &str, func: F) -> Result<(), ConfigError>
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        self.registry.add_function(name, func)
    }

    pub fn remove_function(&mut self, name: &str) -> bool {
        self.registry.remove_function(name)
    }

    /// Parses `input` into a complete expression tree.
    pub fn parse(&self, input: &str) -> Result<ExprNode, ParseError> {
        debug!("Parsing expression: {}", input);
        let tokens = tokenize(input);
        if tokens.is_empty() {
            return Err(ParseError::EmptyExpression);
        }

        let mut state = ParseState::default();
        let mut expect_operator = false;
        for token in tokens {
            trace!("token {:?} (expect_operator: {})", token, expect_operator);
            expect_operator = if expect_operator {
                self.on_operator(&mut state, token)?
            } else {
                self.on_value(&mut state, token)?
            };
        }

        let root = state.finish()?;
        debug!("Parse result: {}", root);
        Ok(root)
    }

    /// Handles a token where a value is expected. Returns whether the
    /// parser now expects an operator.
    fn on_value(&self, state: &mut ParseState, token: Token) -> Result<bool, ParseError> {
        match token {
            Token::Number(text) => {
                let value = text
                    .parse::<f64>()
                    .map_err(|_| ParseError::InvalidNumber(text.clone()))?;
                state.results.push(ExprNode::Constant(value));
                Ok(true)
            }
            Token::Identifier(name) if name == self.registry.variable_name() => {
                state.results.push(ExprNode::Variable(name));
                Ok(true)
            }
            Token::Identifier(name) => {
                let func = self
                    .registry
                    .function(&name)
                    .cloned()
                    .ok_or_else(|| ParseError::UnknownFunction(name.clone()))?;
                state.operators.push(StackEntry {
                    precedence: Precedence::Application,
                    pending: Pending::Unary { name, func },
                });
                Ok(false)
            }
            Token::Symbol('-') => {
                state.operators.push(StackEntry {
                    precedence: Precedence::Multiplication,
                    pending: Pending::Unary {
                        name: "-".to_string(),
                        func: Arc::new(|v: f64| -v),
                    },
                });
                Ok(false)
            }
            Token::Symbol('(') => {
                state.operators.push(StackEntry {
                    precedence: Precedence::Grouping,
                    pending: Pending::Group,
                });
                Ok(false)
            }
            Token::Symbol(_) => Err(ParseError::UnexpectedToken {
                expected: Expected::Value,
                found: token.to_string(),
            }),
        }
    }

    /// Handles a token where an operator is expected. Returns whether the
    /// parser still expects an operator.
    fn on_operator(&self, state: &mut ParseState, token: Token) -> Result<bool, ParseError> {
        match token {
            Token::Number(_) | Token::Identifier(_) | Token::Symbol('(') => {
                Err(ParseError::UnexpectedToken {
                    expected: Expected::Operator,
                    found: token.to_string(),
                })
            }
            Token::Symbol(')') => {
                state.close_group()?;
                Ok(true)
            }
            Token::Symbol(symbol) => {
                let entry = self
                    .registry
                    .operator(symbol)
                    .ok_or(ParseError::UnknownOperator(symbol))?;
                state.reduce_above(entry.precedence)?;
                state.operators.push(StackEntry {
                    precedence: entry.precedence,
                    pending: Pending::Binary {
                        symbol,
                        func: entry.func.clone(),
                    },
                });
                Ok(false)
            }
        }
    }
}

/// The two stacks of one parse call.
#[derive(Default)]
struct ParseState {
    operators: Vec<StackEntry>,
    results: Vec<ExprNode>,
}

impl ParseState {
    fn pop_result(&mut self) -> Result<ExprNode, ParseError> {
        self.results.pop().ok_or(ParseError::ResultStackExhausted)
    }

    /// Builds the node for `pending` from the top of the result stack.
    /// Groups are handled by the callers.
    fn resolve(&mut self, pending: Pending) -> Result<(), ParseError> {
        let node = match pending {
            Pending::Unary { name, func } => {
                let inner = self.pop_result()?;
                ExprNode::unary(name, func, inner)
            }
            Pending::Binary { symbol, func } => {
                let right = self.pop_result()?;
                let left = self.pop_result()?;
                ExprNode::binary(symbol, func, left, right)
            }
            Pending::Group => return Ok(()),
        };
        trace!("resolved {}", node);
        self.results.push(node);
        Ok(())
    }

    /// Resolves every pending entry that binds at least as tightly as an
    /// incoming operator of `precedence`, stopping at a group. Only a
    /// strictly higher precedence may defer, which makes equal levels
    /// associate to the left.
    fn reduce_above(&mut self, precedence: Precedence) -> Result<(), ParseError> {
        while let Some(top) = self.operators.last() {
            if top.is_group() || precedence > top.precedence {
                break;
            }
            if let Some(top) = self.operators.pop() {
                self.resolve(top.pending)?;
            }
        }
        Ok(())
    }

    /// Resolves everything back to the innermost open group and drops it.
    fn close_group(&mut self) -> Result<(), ParseError> {
        loop {
            let top = self
                .operators
                .pop()
                .ok_or(ParseError::UnmatchedClosedParenthesis)?;
            if top.is_group() {
                return Ok(());
            }
            self.resolve(top.pending)?;
        }
    }

    fn finish(mut self) -> Result<ExprNode, ParseError> {
        while let Some(top) = self.operators.pop() {
            if top.is_group() {
                return Err(ParseError::UnmatchedOpenParenthesis);
            }
            self.resolve(top.pending)?;
        }

        let root = self.pop_result()?;
        if !self.results.is_empty() {
            return Err(ParseError::ExcessValues(self.results.len() + 1));
        }
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn standard() -> Parser {
        Parser::standard().unwrap()
    }

    fn eval(input: &str, x: f64) -> f64 {
        standard().parse(input).unwrap().eval(x).unwrap()
    }

    fn printed(input: &str) -> String {
        standard().parse(input).unwrap().to_string()
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("2+3*4", 0.0), 14.0);
        assert_eq!(eval("2*3+4", 0.0), 10.0);
        assert_eq!(printed("2+3*4"), "(2+(3*4))");
    }

    #[test]
    fn test_grouping() {
        assert_eq!(eval("(2+3)*4", 0.0), 20.0);
        assert_eq!(eval("((2))", 0.0), 2.0);
        assert_eq!(eval("2*(3+(4-1))", 0.0), 12.0);
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(eval("8-3-2", 0.0), 3.0);
        assert_eq!(eval("64/4/2", 0.0), 8.0);
        assert_eq!(eval("2^3^2", 0.0), 64.0);
        assert_eq!(printed("8-3-2"), "((8-3)-2)");
    }

    #[test]
    fn test_mixed_levels_reduce_fully() {
        // The pending `-` must be resolved before `+` is pushed.
        assert_eq!(eval("1-2*3+4", 0.0), -1.0);
        assert_eq!(eval("2^2*3-1", 0.0), 11.0);
        assert_eq!(printed("1-2*3+4"), "((1-(2*3))+4)");
        assert_eq!(printed("2*3^2+1"), "((2*(3^2))+1)");
        // Negation stays below `^` even behind a function application.
        assert_eq!(printed("-sin x ^ 2"), "-((sin(x)^2))");
    }

    #[test]
    fn test_function_application() {
        assert_eq!(eval("sin x + 1", 0.0), 0f64.sin() + 1.0);
        assert_eq!(eval("sqrt 16 * 2", 0.0), 8.0);
        assert_eq!(eval("sqrt(9+7)", 0.0), 4.0);
        assert_eq!(eval("exp ln x", 5.0), 5f64.ln().exp());
        assert_eq!(printed("sin x + 1"), "(sin(x)+1)");
        assert_eq!(printed("cos sin x"), "cos(sin(x))");
    }

    #[test]
    fn test_unary_negation() {
        assert_eq!(eval("-cos x", 0.0), -1.0);
        assert_eq!(eval("-x+1", 3.0), -2.0);
        assert_eq!(eval("2*-x", 3.0), -6.0);
        assert_eq!(eval("--x", 3.0), 3.0);
        // Negation sits at the multiplication level, below `^`.
        assert_eq!(eval("-x^2", 3.0), -9.0);
        assert_eq!(eval("-sin x ^ 2", 1.0), -(1f64.sin().powf(2.0)));
        assert_eq!(printed("-cos x"), "-(cos(x))");
        assert_eq!(printed("-x*2"), "(-(x)*2)");
    }

    #[test]
    fn test_variable_substitution() {
        assert_eq!(eval("x^2", 3.0), 9.0);
        assert_eq!(eval("x*x - 2*x + 1", 1.0), 0.0);
    }

    #[test]
    fn test_renamed_variable() {
        let mut parser = standard();
        parser.set_variable_name("t").unwrap();
        let tree = parser.parse("t*2").unwrap();
        assert_eq!(tree.eval(4.0).unwrap(), 8.0);
        assert_eq!(tree.to_string(), "(t*2)");
        assert_eq!(
            parser.parse("x*2").unwrap_err(),
            ParseError::UnknownFunction("x".to_string())
        );
    }

    #[test]
    fn test_decimal_literals() {
        assert_eq!(eval("1.5*2", 0.0), 3.0);
        assert_eq!(eval(".5+.25", 0.0), 0.75);
        assert_eq!(
            standard().parse(".").err(),
            Some(ParseError::InvalidNumber(".".to_string()))
        );
    }

    #[test]
    fn test_empty_expression() {
        assert_eq!(standard().parse("").err(), Some(ParseError::EmptyExpression));
        assert_eq!(standard().parse("   ").err(), Some(ParseError::EmptyExpression));
    }

    #[test]
    fn test_unmatched_parentheses() {
        let parser = standard();
        assert_eq!(parser.parse("(2+3").err(), Some(ParseError::UnmatchedOpenParenthesis));
        assert_eq!(parser.parse("2+3)").err(), Some(ParseError::UnmatchedClosedParenthesis));
        assert_eq!(parser.parse("((x)").err(), Some(ParseError::UnmatchedOpenParenthesis));
        assert_eq!(parser.parse("(x))").err(), Some(ParseError::UnmatchedClosedParenthesis));
    }

    #[test]
    fn test_unexpected_tokens() {
        let parser = standard();
        assert_eq!(
            parser.parse("2 3").err(),
            Some(ParseError::UnexpectedToken {
                expected: Expected::Operator,
                found: "3".to_string()
            })
        );
        assert_eq!(
            parser.parse("x sin").err(),
            Some(ParseError::UnexpectedToken {
                expected: Expected::Operator,
                found: "sin".to_string()
            })
        );
        assert_eq!(
            parser.parse("2(3)").err(),
            Some(ParseError::UnexpectedToken {
                expected: Expected::Operator,
                found: "(".to_string()
            })
        );
        assert_eq!(
            parser.parse("*2").err(),
            Some(ParseError::UnexpectedToken {
                expected: Expected::Value,
                found: "*".to_string()
            })
        );
        assert_eq!(
            parser.parse("()").err(),
            Some(ParseError::UnexpectedToken {
                expected: Expected::Value,
                found: ")".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_names() {
        let parser = standard();
        assert_eq!(parser.parse("2 @ 3").err(), Some(ParseError::UnknownOperator('@')));
        assert_eq!(
            parser.parse("foo x").err(),
            Some(ParseError::UnknownFunction("foo".to_string()))
        );
    }

    #[test]
    fn test_dangling_operators() {
        let parser = standard();
        assert_eq!(parser.parse("2+").err(), Some(ParseError::ResultStackExhausted));
        assert_eq!(parser.parse("-").err(), Some(ParseError::ResultStackExhausted));
        assert_eq!(parser.parse("sin").err(), Some(ParseError::ResultStackExhausted));
    }

    #[test]
    fn test_parsed_trees_are_complete() {
        let parser = standard();
        for input in ["x", "-(x+1)*sin x", "((2))^x/3-ln(x)"] {
            assert!(parser.parse(input).unwrap().is_complete(), "{}", input);
        }
    }

    #[test]
    fn test_custom_operator_between_levels() {
        let mut parser = standard();
        // Modulo binding between multiplication and exponentiation.
        parser
            .add_operator('%', |a, b| a % b, Precedence::MulExp)
            .unwrap();
        let tree = parser.parse("2*7%4").unwrap();
        assert_eq!(tree.to_string(), "(2*(7%4))");
        assert_eq!(tree.eval(0.0).unwrap(), 6.0);
        assert_eq!(parser.parse("2^3%5").unwrap().eval(0.0).unwrap(), 3.0);
    }

    #[test]
    fn test_operator_above_application_defers() {
        let mut parser = standard();
        parser
            .add_operator('#', |a, b| a * 10.0 + b, Precedence::Grouping)
            .unwrap();
        assert_eq!(parser.parse("sqrt 1#6").unwrap().to_string(), "sqrt((1#6))");
    }

    #[test]
    fn test_removed_entries_are_unknown() {
        let mut parser = standard();
        assert!(parser.remove_operator('+'));
        assert!(parser.remove_function("sin"));
        assert_eq!(parser.parse("1+2").err(), Some(ParseError::UnknownOperator('+')));
        assert_eq!(
            parser.parse("sin x").err(),
            Some(ParseError::UnknownFunction("sin".to_string()))
        );
    }

    #[test]
    fn test_registration_errors() {
        let mut parser = standard();
        assert!(matches!(
            parser.add_operator('1', |a, b| a + b, Precedence::Addition),
            Err(ConfigError::InvalidOperatorSymbol { symbol: '1', .. })
        ));
        assert_eq!(
            parser.add_function("x", f64::abs),
            Err(ConfigError::VariableNameTaken("x".to_string()))
        );
        assert_eq!(
            parser.set_variable_name("sin"),
            Err(ConfigError::FunctionNameTaken("sin".to_string()))
        );
    }

    #[test]
    fn test_independent_instances() {
        let mut first = Parser::new();
        let mut second = Parser::new();
        first.add_operator('~', |a, b| a + b, Precedence::Addition).unwrap();
        second.add_operator('~', |a, b| a * b, Precedence::Addition).unwrap();

        assert_eq!(first.parse("3~4").unwrap().eval(0.0).unwrap(), 7.0);
        assert_eq!(second.parse("3~4").unwrap().eval(0.0).unwrap(), 12.0);
        assert!(!Parser::new().registry().has_operator('~'));
    }

    #[test]
    fn test_parallel_instances() {
        let handles: Vec<_> = (1..=4)
            .map(|factor| {
                std::thread::spawn(move || {
                    let mut parser = Parser::new();
                    let scaled = move |a: f64, b: f64| a * b * factor as f64;
                    parser
                        .add_operator('*', scaled, Precedence::Multiplication)
                        .unwrap();
                    parser.parse("x*2").unwrap().eval(3.0).unwrap()
                })
            })
            .collect();
        let results: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results, vec![6.0, 12.0, 18.0, 24.0]);
    }

    #[test]
    fn test_large_expression() {
        let input = (0..200).map(|i| i.to_string()).collect::<Vec<_>>().join(" + ");
        assert_eq!(eval(&input, 0.0), (0..200).sum::<i32>() as f64);
    }

    /// Random `+ - * /` arithmetic over small integers and `x`.
    fn random_expression(rng: &mut StdRng, depth: u32) -> String {
        if depth == 0 || rng.random_range(0..4) == 0 {
            return if rng.random_bool(0.3) {
                "x".to_string()
            } else {
                rng.random_range(1..10).to_string()
            };
        }
        let op = ["+", "-", "*", "/"][rng.random_range(0..4)];
        let left = random_expression(rng, depth - 1);
        let right = random_expression(rng, depth - 1);
        if rng.random_bool(0.3) {
            format!("({} {} {})", left, op, right)
        } else {
            format!("{} {} {}", left, op, right)
        }
    }

    fn close(a: f64, b: f64) -> bool {
        a == b || (a.is_nan() && b.is_nan()) || (a - b).abs() <= 1e-9 * a.abs().max(b.abs())
    }

    #[test]
    fn test_matches_meval_on_random_arithmetic() {
        let parser = standard();
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..300 {
            let input = random_expression(&mut rng, 5);
            let x = rng.random_range(-5.0..5.0);

            let ours = parser.parse(&input).unwrap().eval(x).unwrap();
            let reference = input
                .parse::<meval::Expr>()
                .unwrap()
                .bind("x")
                .unwrap()(x);
            assert!(close(ours, reference), "{}: {} != {}", input, ours, reference);
        }
    }
}
