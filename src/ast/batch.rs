use crate::ast::ExprNode;
use crate::error::EvalError;
use rayon::prelude::*;

impl ExprNode {
    /// Evaluates the tree at every point of `xs` in parallel. The output keeps
    /// the order of `xs`.
    pub fn eval_batch(&self, xs: &[f64]) -> Result<Vec<f64>, EvalError> {
        xs.par_iter().map(|&x| self.eval(x)).collect()
    }

    /// Evaluates the tree on `steps` evenly spaced points from `start` to
    /// `end` inclusive, returning `(x, y)` pairs.
    pub fn sample(&self, start: f64, end: f64, steps: usize) -> Result<Vec<(f64, f64)>, EvalError> {
        let xs: Vec<f64> = match steps {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let step = (end - start) / (steps - 1) as f64;
                (0..steps).map(|i| start + step * i as f64).collect()
            }
        };
        let ys = self.eval_batch(&xs)?;
        Ok(xs.into_iter().zip(ys).collect())
    }
}
