use crate::error::EvalError;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::Arc;

mod batch;
mod cache;
mod parser;
mod precedence;
mod registry;
mod tokenizer;

pub use cache::CachedParser;
pub use parser::Parser;
pub use precedence::Precedence;
pub use registry::{OperatorEntry, Registry};
pub use tokenizer::{tokenize, Token};

/// Combining rule of a function (or of the built-in negation).
pub type UnaryFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Combining rule of a binary operator.
pub type BinaryFn = Arc<dyn Fn(f64, f64) -> f64 + Send + Sync>;

/// A node of a parsed expression. Nodes are built complete, children first,
/// and never change afterwards.
#[derive(Clone)]
pub enum ExprNode {
    Constant(f64),
    /// The single variable. The name is only kept for printing; evaluation
    /// always substitutes the supplied value.
    Variable(String),
    Unary {
        name: String,
        func: UnaryFn,
        inner: Box<ExprNode>,
    },
    Binary {
        symbol: char,
        func: BinaryFn,
        left: Box<ExprNode>,
        right: Box<ExprNode>,
    },
    /// A slot that was never filled. The parser does not produce it.
    Placeholder,
}

impl ExprNode {
    pub fn unary(name: impl Into<String>, func: UnaryFn, inner: ExprNode) -> Self {
        ExprNode::Unary {
            name: name.into(),
            func,
            inner: Box::new(inner),
        }
    }

    pub fn binary(symbol: char, func: BinaryFn, left: ExprNode, right: ExprNode) -> Self {
        ExprNode::Binary {
            symbol,
            func,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Evaluates the tree with the variable bound to `x`.
    pub fn eval(&self, x: f64) -> Result<f64, EvalError> {
        match self {
            ExprNode::Constant(value) => Ok(*value),
            ExprNode::Variable(_) => Ok(x),
            ExprNode::Unary { func, inner, .. } => Ok(func(inner.eval(x)?)),
            ExprNode::Binary {
                func, left, right, ..
            } => {
                let left_value = left.eval(x)?;
                let right_value = right.eval(x)?;
                Ok(func(left_value, right_value))
            }
            ExprNode::Placeholder => Err(EvalError::UninitializedNode),
        }
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        match self {
            ExprNode::Constant(_) | ExprNode::Variable(_) | ExprNode::Placeholder => 1,
            ExprNode::Unary { inner, .. } => 1 + inner.depth(),
            ExprNode::Binary { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// `true` when no `Placeholder` is reachable from this node.
    pub fn is_complete(&self) -> bool {
        match self {
            ExprNode::Constant(_) | ExprNode::Variable(_) => true,
            ExprNode::Unary { inner, .. } => inner.is_complete(),
            ExprNode::Binary { left, right, .. } => left.is_complete() && right.is_complete(),
            ExprNode::Placeholder => false,
        }
    }
}

impl Display for ExprNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ExprNode::Constant(value) => write!(f, "{}", value),
            ExprNode::Variable(name) => write!(f, "{}", name),
            ExprNode::Unary { name, inner, .. } => write!(f, "{}({})", name, inner),
            ExprNode::Binary {
                symbol,
                left,
                right,
                ..
            } => write!(f, "({}{}{})", left, symbol, right),
            ExprNode::Placeholder => write!(f, "?"),
        }
    }
}

// Combining rules are opaque closures, so they are left out.
impl Debug for ExprNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ExprNode::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            ExprNode::Variable(name) => f.debug_tuple("Variable").field(name).finish(),
            ExprNode::Unary { name, inner, .. } => f
                .debug_struct("Unary")
                .field("name", name)
                .field("inner", inner)
                .finish_non_exhaustive(),
            ExprNode::Binary {
                symbol,
                left,
                right,
                ..
            } => f
                .debug_struct("Binary")
                .field("symbol", symbol)
                .field("left", left)
                .field("right", right)
                .finish_non_exhaustive(),
            ExprNode::Placeholder => write!(f, "Placeholder"),
        }
    }
}
