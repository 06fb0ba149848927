//! Error metrics between numerical and analytical derivative fields.
//!
//! The validator compares a numerically estimated field against the exact
//! analytical one and aggregates pointwise absolute errors into the usual
//! certification metrics. Two exclusion policies apply:
//!
//! - Points where the ANALYTICAL field is non-finite are excluded from every
//!   aggregate (they are not treated as infinite error). If no finite point
//!   remains, all metrics are `NaN` and the report is flagged degenerate —
//!   a warning condition, not a failure.
//! - Relative error is undefined near zero crossings of the analytical
//!   field: points with `|analytical| <= REL_EPS` are excluded from the
//!   relative-error aggregates only.

use ndarray::Array2;
use serde::Serialize;

use crate::errors::EvaluationError;

/// Magnitude below which the analytical value is considered a zero crossing
/// and the point is excluded from relative-error aggregation.
pub const REL_EPS: f64 = 1e-12;

/// Aggregated error metrics for one derivative direction.
///
/// All metrics are non-negative (or `NaN` when `degenerate` is set).
/// `l2_norm` is deliberately unnormalized — it grows with grid resolution,
/// so comparing it across differently sized grids surfaces the resolution
/// dependence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValidationReport {
    pub max_abs_error: f64,
    pub mean_abs_error: f64,
    pub max_rel_error: f64,
    pub mean_rel_error: f64,
    pub rmse: f64,
    pub l2_norm: f64,
    /// Set when the analytical field had no finite entries; every metric is
    /// `NaN` then. A warning condition for the caller, never an error.
    pub degenerate: bool,
}

/// Computes error metrics between a numerical field and its analytical
/// reference.
///
/// # Errors
/// Returns [`EvaluationError::ShapeMismatch`] if the two fields disagree in
/// shape.
pub fn validate(
    numerical: &Array2<f64>,
    analytical: &Array2<f64>,
) -> Result<ValidationReport, EvaluationError> {
    if numerical.dim() != analytical.dim() {
        return Err(EvaluationError::ShapeMismatch {
            expected: numerical.dim(),
            got: analytical.dim(),
        });
    }

    let mut count = 0_usize;
    let mut abs_sum = 0.0;
    let mut abs_max = 0.0_f64;
    let mut sq_sum = 0.0;
    let mut rel_count = 0_usize;
    let mut rel_sum = 0.0;
    let mut rel_max = 0.0_f64;

    for (&num, &exact) in numerical.iter().zip(analytical.iter()) {
        if !exact.is_finite() {
            continue;
        }
        let abs_error = (num - exact).abs();
        count += 1;
        abs_sum += abs_error;
        // f64::max drops NaN operands; a NaN pointwise error (non-finite
        // numerical value at a finite analytical point) must poison the max
        // just like it poisons the sums
        abs_max = if abs_error.is_nan() || abs_max.is_nan() {
            f64::NAN
        } else {
            abs_max.max(abs_error)
        };
        sq_sum += abs_error * abs_error;
        if exact.abs() > REL_EPS {
            rel_count += 1;
            let rel_error = abs_error / exact.abs();
            rel_sum += rel_error;
            rel_max = if rel_error.is_nan() || rel_max.is_nan() {
                f64::NAN
            } else {
                rel_max.max(rel_error)
            };
        }
    }

    if count == 0 {
        return Ok(ValidationReport {
            max_abs_error: f64::NAN,
            mean_abs_error: f64::NAN,
            max_rel_error: f64::NAN,
            mean_rel_error: f64::NAN,
            rmse: f64::NAN,
            l2_norm: f64::NAN,
            degenerate: true,
        });
    }

    let (max_rel_error, mean_rel_error) = if rel_count == 0 {
        (f64::NAN, f64::NAN)
    } else {
        (rel_max, rel_sum / rel_count as f64)
    };

    Ok(ValidationReport {
        max_abs_error: abs_max,
        mean_abs_error: abs_sum / count as f64,
        max_rel_error,
        mean_rel_error,
        rmse: (sq_sum / count as f64).sqrt(),
        l2_norm: sq_sum.sqrt(),
        degenerate: false,
    })
}
