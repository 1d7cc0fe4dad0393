use crate::ast::{ExprNode, Parser, Precedence, Registry};
use crate::error::{ConfigError, ParseError};
use log::debug;
use lru::LruCache;
use std::num::NonZeroUsize;

/// A [`Parser`] that remembers the trees of recently parsed inputs.
///
/// Any registry change drops the whole cache.
pub struct CachedParser {
    parser: Parser,
    cache: LruCache<String, ExprNode>,
}

impl CachedParser {
    /// Wraps `parser` with room for `max_cache_size` trees (at least one).
    pub fn new(parser: Parser, max_cache_size: usize) -> Self {
        let capacity = NonZeroUsize::new(max_cache_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            parser,
            cache: LruCache::new(capacity),
        }
    }

    pub fn parse(&mut self, input: &str) -> Result<ExprNode, ParseError> {
        if let Some(tree) = self.cache.get(input) {
            debug!("Cache hit: {}", input);
            return Ok(tree.clone());
        }
        debug!("Cache miss: {}", input);
        let tree = self.parser.parse(input)?;
        self.cache.put(input.to_string(), tree.clone());
        Ok(tree)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn registry(&self) -> &Registry {
        self.parser.registry()
    }

    pub fn into_inner(self) -> Parser {
        self.parser
    }

    fn invalidate(&mut self) {
        if !self.cache.is_empty() {
            debug!("Dropping {} cached trees", self.cache.len());
            self.cache.clear();
        }
    }

    pub fn set_variable_name(&mut self, name: &str) -> Result<(), ConfigError> {
        self.parser.set_variable_name(name)?;
        self.invalidate();
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
        self.parser.add_operator(symbol, func, precedence)?;
        self.invalidate();
        Ok(())
    }

    pub fn remove_operator(&mut self, symbol: char) -> bool {
        self.invalidate();
        self.parser.remove_operator(symbol)
    }

    pub fn add_function<F>(&mut self, name: &str, func: F) -> Result<(), ConfigError>
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        self.parser.add_function(name, func)?;
        self.invalidate();
        Ok(())
    }

    pub fn remove_function(&mut self, name: &str) -> bool {
        self.invalidate();
        self.parser.remove_function(name)
    }
}
