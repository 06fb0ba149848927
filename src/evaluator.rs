//! Formula compilation and grid evaluation.
//!
//! This module provides the [`Formula`] type: a textual math expression in
//! the variables `x` and `y`, parsed once into the crate's arithmetic AST
//! and then evaluated element-wise over coordinate grids. Parsing goes
//! through the allow-list in [`crate::convert`], so a `Formula` can only
//! ever compute arithmetic over the two grid variables — there is no path
//! from expression text to anything else.
//!
//! # Example
//!
//! ```
//! use meshgrad::evaluator::Formula;
//! use ndarray::arr2;
//!
//! let f = Formula::parse("sin(x)*cos(y)").unwrap();
//! let x = arr2(&[[0.0, 1.0]]);
//! let y = arr2(&[[0.5, 0.5]]);
//! let z = f.eval_grid(&x, &y).unwrap();
//! assert_eq!(z[[0, 1]], 1.0_f64.sin() * 0.5_f64.cos());
//! ```
//!
//! Non-finite results (`NaN`, `Infinity`) are legitimate outputs that
//! propagate into the returned array unchanged; they are never errors.

use ndarray::Array2;

use crate::convert::build_ast;
use crate::errors::{EvaluationError, InvalidExpressionError, PipelineError};
use crate::expr::Expr;
use evalexpr::build_operator_tree;

/// A compiled two-variable formula.
///
/// Holds the original source string alongside the constant-folded AST.
/// Compilation is the only fallible step; evaluation is pure and total,
/// and evaluating the same formula over the same grid twice yields
/// bit-identical results.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    source: String,
    ast: Expr,
}

impl Formula {
    /// Parses and compiles an expression string.
    ///
    /// # Errors
    /// Returns [`InvalidExpressionError`] if the string is not a single
    /// well-formed expression or references anything outside the allow-list
    /// (`x`, `y`, `pi`, `e`, and the fixed function set).
    pub fn parse(source: &str) -> Result<Self, InvalidExpressionError> {
        let node = build_operator_tree(source)?;
        let ast = build_ast(&node)?.fold_constants();
        Ok(Self {
            source: source.to_string(),
            ast,
        })
    }

    /// The original expression text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluates the formula at a single coordinate pair.
    pub fn eval(&self, x: f64, y: f64) -> f64 {
        self.ast.eval(x, y)
    }

    /// Evaluates the formula element-wise over a pair of coordinate grids.
    ///
    /// The output matches the shape of `x`. Non-finite values propagate.
    ///
    /// # Errors
    /// Returns [`EvaluationError::ShapeMismatch`] if `x` and `y` disagree
    /// in shape.
    pub fn eval_grid(
        &self,
        x: &Array2<f64>,
        y: &Array2<f64>,
    ) -> Result<Array2<f64>, EvaluationError> {
        if x.dim() != y.dim() {
            return Err(EvaluationError::ShapeMismatch {
                expected: x.dim(),
                got: y.dim(),
            });
        }
        Ok(Array2::from_shape_fn(x.dim(), |idx| {
            self.ast.eval(x[idx], y[idx])
        }))
    }
}

impl std::fmt::Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// Parses `expr` and evaluates it over the coordinate grids in one call.
///
/// Convenience wrapper combining [`Formula::parse`] and
/// [`Formula::eval_grid`]; pipelines that evaluate the same expression more
/// than once should compile a [`Formula`] instead.
pub fn evaluate(expr: &str, x: &Array2<f64>, y: &Array2<f64>) -> Result<Array2<f64>, PipelineError> {
    let formula = Formula::parse(expr)?;
    Ok(formula.eval_grid(x, y)?)
}
