//! The derivative pipeline for a single example.
//!
//! [`calculate_derivatives`] sequences the whole computation for one catalog
//! entry: build the mesh, sample the function and both analytical
//! derivatives, run the central-difference stencil, validate each direction,
//! and assemble the immutable [`Example`] record. Any failure in mesh
//! construction or expression handling aborts the example with the
//! originating error — there is no partial record.
//!
//! # Example
//!
//! ```
//! use meshgrad::mesh::{Domain, MeshSpec};
//! use meshgrad::pipeline::{calculate_derivatives, ExampleSpec};
//!
//! let spec = ExampleSpec {
//!     id: 1,
//!     name: "Tilted plane".to_string(),
//!     description: String::new(),
//!     function: "2*x + 3*y".to_string(),
//!     analytical_dx: "2".to_string(),
//!     analytical_dy: "3".to_string(),
//!     domain: Domain { x_min: -3.0, x_max: 3.0, y_min: -3.0, y_max: 3.0 },
//!     mesh: MeshSpec { nx: 5, ny: 5 },
//! };
//! let example = calculate_derivatives(&spec).unwrap();
//! assert!(example.validation_dx.max_abs_error < 1e-12);
//! ```

use ndarray::Array2;
use serde::Serialize;

use crate::errors::PipelineError;
use crate::evaluator::Formula;
use crate::mesh::{build_mesh, Domain, Grid, MeshSpec};
use crate::stencil::partial_derivatives;
use crate::validate::{validate, ValidationReport};

/// One entry of the example catalog: everything needed to run the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExampleSpec {
    pub id: u32,
    pub name: String,
    pub description: String,
    /// The function f(x, y) to differentiate, e.g. `"sin(x)*cos(y)"`
    pub function: String,
    /// Exact ∂f/∂x, e.g. `"cos(x)*cos(y)"`
    pub analytical_dx: String,
    /// Exact ∂f/∂y, e.g. `"-sin(x)*sin(y)"`
    pub analytical_dy: String,
    pub domain: Domain,
    pub mesh: MeshSpec,
}

/// Min/max summary of the sampled field and its numerical derivatives,
/// computed over finite entries only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldStats {
    pub f_min: f64,
    pub f_max: f64,
    pub df_dx_min: f64,
    pub df_dx_max: f64,
    pub df_dy_min: f64,
    pub df_dy_max: f64,
}

/// The computed record for one example.
///
/// Constructed once by [`calculate_derivatives`], immutable thereafter, and
/// safe to share read-only across threads (all data is owned).
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    pub spec: ExampleSpec,
    pub grid: Grid,
    /// The sampled values of f over the grid; may contain non-finite entries
    pub z: Array2<f64>,
    pub numerical_dx: Array2<f64>,
    pub numerical_dy: Array2<f64>,
    pub analytical_dx: Array2<f64>,
    pub analytical_dy: Array2<f64>,
    pub validation_dx: ValidationReport,
    pub validation_dy: ValidationReport,
    pub stats: FieldStats,
}

fn finite_min_max(field: &Array2<f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in field.iter() {
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if min > max {
        // no finite entry at all
        (f64::NAN, f64::NAN)
    } else {
        (min, max)
    }
}

/// Runs the full pipeline for one example specification.
///
/// # Errors
/// Propagates [`PipelineError`] from mesh construction, expression parsing,
/// grid evaluation, or validation. A failed example produces no record.
pub fn calculate_derivatives(spec: &ExampleSpec) -> Result<Example, PipelineError> {
    let grid = build_mesh(&spec.domain, &spec.mesh)?;

    let f = Formula::parse(&spec.function)?;
    let dx_exact = Formula::parse(&spec.analytical_dx)?;
    let dy_exact = Formula::parse(&spec.analytical_dy)?;

    let z = f.eval_grid(&grid.x, &grid.y)?;
    let analytical_dx = dx_exact.eval_grid(&grid.x, &grid.y)?;
    let analytical_dy = dy_exact.eval_grid(&grid.x, &grid.y)?;

    let (numerical_dx, numerical_dy) = partial_derivatives(&z, grid.hx, grid.hy);

    let validation_dx = validate(&numerical_dx, &analytical_dx)?;
    let validation_dy = validate(&numerical_dy, &analytical_dy)?;

    let (f_min, f_max) = finite_min_max(&z);
    let (df_dx_min, df_dx_max) = finite_min_max(&numerical_dx);
    let (df_dy_min, df_dy_max) = finite_min_max(&numerical_dy);

    Ok(Example {
        spec: spec.clone(),
        grid,
        z,
        numerical_dx,
        numerical_dy,
        analytical_dx,
        analytical_dy,
        validation_dx,
        validation_dy,
        stats: FieldStats {
            f_min,
            f_max,
            df_dx_min,
            df_dx_max,
            df_dy_min,
            df_dy_max,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paraboloid_spec() -> ExampleSpec {
        ExampleSpec {
            id: 1,
            name: "Paraboloid".to_string(),
            description: String::new(),
            function: "x^2 + y^2".to_string(),
            analytical_dx: "2*x".to_string(),
            analytical_dy: "2*y".to_string(),
            domain: Domain {
                x_min: -3.0,
                x_max: 3.0,
                y_min: -3.0,
                y_max: 3.0,
            },
            mesh: MeshSpec { nx: 5, ny: 5 },
        }
    }

    #[test]
    fn test_end_to_end_paraboloid_interior_exact() {
        // f = x² + y² on [-3,3]², 5×5: central differences are exact for
        // quadratics, so the interior error vanishes to rounding. The
        // duplicated boundary columns carry the documented policy error of
        // exactly 2*hx against the linear analytical derivative.
        use ndarray::s;
        let example = calculate_derivatives(&paraboloid_spec()).unwrap();

        let interior_dx = validate(
            &example.numerical_dx.slice(s![1..4, 1..4]).to_owned(),
            &example.analytical_dx.slice(s![1..4, 1..4]).to_owned(),
        )
        .unwrap();
        let interior_dy = validate(
            &example.numerical_dy.slice(s![1..4, 1..4]).to_owned(),
            &example.analytical_dy.slice(s![1..4, 1..4]).to_owned(),
        )
        .unwrap();
        assert!(interior_dx.max_abs_error < 1e-9);
        assert!(interior_dy.max_abs_error < 1e-9);
        assert!(interior_dx.rmse < 1e-9);
        assert!(interior_dy.rmse < 1e-9);

        // full-grid aggregates include the boundary policy error: 2*hx = 3
        assert!((example.validation_dx.max_abs_error - 3.0).abs() < 1e-9);
        assert!((example.validation_dy.max_abs_error - 3.0).abs() < 1e-9);
        assert!(!example.validation_dx.degenerate);
    }

    #[test]
    fn test_end_to_end_plane_exact_everywhere() {
        // constant derivatives survive the boundary duplication unchanged,
        // so the plane validates exactly over the whole grid
        let spec = ExampleSpec {
            id: 2,
            name: "Tilted plane".to_string(),
            description: String::new(),
            function: "2*x + 3*y".to_string(),
            analytical_dx: "2".to_string(),
            analytical_dy: "3".to_string(),
            domain: Domain {
                x_min: -3.0,
                x_max: 3.0,
                y_min: -3.0,
                y_max: 3.0,
            },
            mesh: MeshSpec { nx: 5, ny: 5 },
        };
        let example = calculate_derivatives(&spec).unwrap();
        assert!(example.validation_dx.max_abs_error < 1e-12);
        assert!(example.validation_dy.max_abs_error < 1e-12);
        assert!(example.validation_dx.rmse < 1e-12);
    }

    #[test]
    fn test_record_shapes_and_stats() {
        let example = calculate_derivatives(&paraboloid_spec()).unwrap();
        assert_eq!(example.z.dim(), (5, 5));
        assert_eq!(example.numerical_dx.dim(), (5, 5));
        assert_eq!(example.analytical_dy.dim(), (5, 5));
        assert_eq!(example.stats.f_min, 0.0);
        assert_eq!(example.stats.f_max, 18.0);
        // numerical ∂f/∂x spans the interior range only, since the
        // boundary columns are copies of interior values
        assert_eq!(example.stats.df_dx_min, -3.0);
        assert_eq!(example.stats.df_dx_max, 3.0);
    }

    #[test]
    fn test_bad_expression_aborts_example() {
        let mut spec = paraboloid_spec();
        spec.function = "import(x)".to_string();
        let err = calculate_derivatives(&spec).unwrap_err();
        assert!(matches!(err, PipelineError::Expression(_)));
    }

    #[test]
    fn test_bad_domain_aborts_example() {
        let mut spec = paraboloid_spec();
        spec.mesh = MeshSpec { nx: 1, ny: 5 };
        let err = calculate_derivatives(&spec).unwrap_err();
        assert!(matches!(err, PipelineError::Domain(_)));
    }

    #[test]
    fn test_non_finite_fields_still_produce_a_record() {
        // 1/x is singular on the x = 0 column; the record still assembles,
        // with the singular points excluded from validation
        let spec = ExampleSpec {
            id: 99,
            name: "Reciprocal".to_string(),
            description: String::new(),
            function: "1/x".to_string(),
            analytical_dx: "-1/x^2".to_string(),
            analytical_dy: "0*x".to_string(),
            domain: Domain {
                x_min: -1.0,
                x_max: 1.0,
                y_min: -1.0,
                y_max: 1.0,
            },
            mesh: MeshSpec { nx: 5, ny: 5 },
        };
        let example = calculate_derivatives(&spec).unwrap();
        assert!(example.z.iter().any(|v| !v.is_finite()));
        assert!(!example.validation_dx.degenerate);
    }
}
