//! Central finite-difference partial derivatives with analytical validation.
//!
//! This crate numerically estimates ∂f/∂x and ∂f/∂y of a scalar function of
//! two variables over a uniform rectangular mesh and certifies the estimate
//! against user-supplied exact derivatives. It builds on top of the
//! [evalexpr](https://github.com/ISibboI/evalexpr) crate for parsing and
//! interprets expressions over a small, allow-listed arithmetic AST.
//!
//! # Features
//!
//! - Sandboxed evaluation of textual math expressions over full grids
//! - Second-order central-difference stencil with an explicit
//!   duplicate-neighbor boundary policy
//! - Absolute/relative error metrics, RMSE and L2 norm per direction
//! - A precomputed, immutable example catalog with parallel construction
//! - A JSON serialization guard that survives non-finite field values
//!
//! # Example
//!
//! ```rust
//! use meshgrad::catalog::{builtin_examples, Catalog};
//!
//! // Compute the built-in catalog once, at startup
//! let catalog = Catalog::precompute(&builtin_examples()).unwrap();
//! let paraboloid = catalog.get(2).unwrap();
//!
//! // Interior truncation error is O(h²) for the 100x100 mesh
//! assert!(paraboloid.validation_dx.rmse < 0.05);
//! ```

pub use catalog::Catalog;
pub use evaluator::Formula;
pub use pipeline::Example;

pub mod prelude {
    pub use crate::catalog::{builtin_examples, Catalog};
    pub use crate::evaluator::{evaluate, Formula};
    pub use crate::json::to_json_safe;
    pub use crate::mesh::{build_mesh, Domain, Grid, MeshSpec};
    pub use crate::pipeline::{calculate_derivatives, Example, ExampleSpec};
    pub use crate::stencil::partial_derivatives;
    pub use crate::validate::{validate, ValidationReport};
}

/// Precomputed example catalog and startup summary reporting
pub mod catalog;
/// Conversion from parsed expressions to the allow-listed AST
pub mod convert;
/// Error types for the various failure modes
pub mod errors;
/// Formula compilation and grid evaluation
pub mod evaluator;
/// Expression tree representation and interpretation
pub mod expr;
/// JSON serialization guard for non-finite values
pub mod json;
/// Uniform rectangular meshes
pub mod mesh;
/// The per-example derivative pipeline
pub mod pipeline;
/// Central-difference stencil
pub mod stencil;
/// Error metrics against analytical derivatives
pub mod validate;
