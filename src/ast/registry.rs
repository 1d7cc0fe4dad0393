use crate::ast::{BinaryFn, Precedence, UnaryFn};
use crate::error::ConfigError;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

/// A registered binary operator.
#[derive(Clone)]
pub struct OperatorEntry {
    pub precedence: Precedence,
    pub func: BinaryFn,
}

/// Variable name, operators and functions known to one parser.
///
/// Registering an existing symbol or name replaces the previous entry.
#[derive(Clone)]
pub struct Registry {
    variable: String,
    operators: HashMap<char, OperatorEntry>,
    functions: HashMap<String, UnaryFn>,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            variable: "x".to_string(),
            operators: HashMap::new(),
            functions: HashMap::new(),
        }
    }
}

fn verify_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::EmptyName);
    }
    if !name.chars().all(char::is_alphabetic) {
        return Err(ConfigError::NonAlphabeticName(name.to_string()));
    }
    Ok(())
}

fn verify_symbol(symbol: char) -> Result<(), ConfigError> {
    let reason = if symbol.is_whitespace() {
        "whitespace"
    } else if symbol.is_ascii_digit() {
        "a digit"
    } else if symbol == '.' {
        "a decimal point"
    } else if symbol.is_alphabetic() {
        "a letter"
    } else if symbol == '(' || symbol == ')' {
        "a parenthesis"
    } else {
        return Ok(());
    };
    Err(ConfigError::InvalidOperatorSymbol { symbol, reason })
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variable_name(&self) -> &str {
        &self.variable
    }

    /// Renames the variable. Fails if the name is not purely alphabetic or a
    /// function is already registered under it.
    pub fn set_variable_name(&mut self, name: &str) -> Result<(), ConfigError> {
        verify_name(name)?;
        if self.functions.contains_key(name) {
            return Err(ConfigError::FunctionNameTaken(name.to_string()));
        }
        debug!("Variable renamed: {} -> {}", self.variable, name);
        self.variable = name.to_string();
        Ok(())
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
        verify_symbol(symbol)?;
        debug!("Registering operator {:?} at {:?}", symbol, precedence);
        self.operators.insert(
            symbol,
            OperatorEntry {
                precedence,
                func: Arc::new(func),
            },
        );
        Ok(())
    }

    /// Returns whether an operator was registered under `symbol`.
    pub fn remove_operator(&mut self, symbol: char) -> bool {
        self.operators.remove(&symbol).is_some()
    }

    pub fn add_function<F>(&mut self, name: &str, func: F) -> Result<(), ConfigError>
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        verify_name(name)?;
        if name == self.variable {
            return Err(ConfigError::VariableNameTaken(name.to_string()));
        }
        debug!("Registering function {}", name);
        self.functions.insert(name.to_string(), Arc::new(func));
        Ok(())
    }

    /// Returns whether a function was registered under `name`.
    pub fn remove_function(&mut self, name: &str) -> bool {
        self.functions.remove(name).is_some()
    }

    pub fn operator(&self, symbol: char) -> Option<&OperatorEntry> {
        self.operators.get(&symbol)
    }

    pub fn function(&self, name: &str) -> Option<&UnaryFn> {
        self.functions.get(name)
    }

    pub fn has_operator(&self, symbol: char) -> bool {
        self.operators.contains_key(&symbol)
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered operator symbols, sorted.
    pub fn operator_symbols(&self) -> Vec<char> {
        let mut symbols: Vec<char> = self.operators.keys().copied().collect();
        symbols.sort_unstable();
        symbols
    }

    /// Registered function names, sorted.
    pub fn function_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
