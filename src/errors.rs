//! Error types for the meshgrad crate.
//!
//! This module defines the various error types that can occur during mesh
//! construction, expression parsing, grid evaluation, and the derivative
//! pipeline. The main error types are:
//!
//! - `InvalidDomainError`: Rejected domain bounds or mesh point counts
//! - `InvalidExpressionError`: Syntax errors or identifiers outside the allow-list
//! - `EvaluationError`: Runtime failures while evaluating over a grid
//! - `PipelineError`: High-level errors when computing a full example
//!
//! Non-finite floating point values are never errors anywhere in the crate:
//! `NaN` and infinities are legitimate field values that propagate through
//! the stencil and are handled at the validation and serialization stages.

use evalexpr::{DefaultNumericTypes, EvalexprError};
use thiserror::Error;

/// Errors raised when a rectangular domain or mesh specification is rejected.
///
/// The mesh builder requires non-empty ranges on both axes and at least two
/// points per axis so that every edge point has an interior neighbor.
#[derive(Error, Debug)]
pub enum InvalidDomainError {
    /// The x range is empty or reversed
    #[error("empty x range: x_min ({min}) must be less than x_max ({max})")]
    EmptyXRange { min: f64, max: f64 },
    /// The y range is empty or reversed
    #[error("empty y range: y_min ({min}) must be less than y_max ({max})")]
    EmptyYRange { min: f64, max: f64 },
    /// Fewer than two mesh points were requested along an axis
    #[error("too few mesh points along {axis}: got {got}, need at least 2")]
    TooFewPoints { axis: char, got: usize },
}

/// Errors raised when an expression string is rejected before evaluation.
///
/// Expressions are parsed with evalexpr and then converted into the crate's
/// own arithmetic AST. Conversion enforces a hard allow-list: the variables
/// `x` and `y`, the constants `pi` and `e`, and the functions `sin`, `cos`,
/// `tan`, `exp`, `log`, `ln`, `sqrt`, `abs`. Everything else — assignments,
/// chains, tuples, comparisons, unknown names — ends up here.
#[derive(Error, Debug)]
pub enum InvalidExpressionError {
    /// The expression string failed to parse as a single expression
    #[error("failed to parse expression")]
    Parse(#[from] EvalexprError<DefaultNumericTypes>),
    /// Error when a variable or constant is not on the allow-list
    #[error("unknown identifier: {0}")]
    UnknownIdentifier(String),
    /// Error when a function is not on the allow-list
    #[error("unknown function: {0}")]
    UnknownFunction(String),
    /// Error when encountering an operator outside plain arithmetic
    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),
    /// Error when a function is called with the wrong number of arguments
    #[error("function {name} expects {expected} argument(s), got {got}")]
    WrongArity {
        name: String,
        expected: usize,
        got: usize,
    },
    /// Error when the parse tree does not contain exactly one expression
    #[error("expected a single expression, got {0} top-level nodes")]
    MultipleExpressions(usize),
}

/// Errors raised while evaluating a compiled formula over grids.
///
/// A compiled formula is a pure interpreter over a small arithmetic AST, so
/// the only runtime failure mode is a structural one: the coordinate grids
/// handed to it (or the fields handed to the validator) disagree in shape.
/// Division by zero, logarithms of negative numbers and similar produce
/// `NaN`/`Infinity` field values, not errors.
#[derive(Error, Debug)]
pub enum EvaluationError {
    /// Two arrays that must share a shape do not
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },
}

/// High-level errors when running the derivative pipeline for one example.
///
/// Wraps the lower-level errors from mesh construction, expression parsing
/// and grid evaluation, plus JSON encoding failures from the serialization
/// guard. The `Display` chain identifies the failing stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The example's domain or mesh specification was rejected
    #[error("invalid domain")]
    Domain(#[from] InvalidDomainError),
    /// One of the example's expressions was rejected
    #[error("invalid expression")]
    Expression(#[from] InvalidExpressionError),
    /// Grid evaluation or validation failed
    #[error("evaluation failed")]
    Evaluation(#[from] EvaluationError),
    /// The serialization guard could not encode the example
    #[error("serialization failed")]
    Serialization(#[from] serde_json::Error),
}
