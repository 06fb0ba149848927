//! Uniform rectangular meshes.
//!
//! A [`Grid`] holds the 2-D coordinate matrices and the 1-D axis vectors for
//! a uniformly spaced mesh over a rectangular [`Domain`]. Row index varies
//! `y`, column index varies `x`, so every array in the crate has shape
//! `(ny, nx)` — the same convention as numpy's `meshgrid`.

use ndarray::{Array1, Array2};
use serde::Serialize;

use crate::errors::InvalidDomainError;

/// Rectangular domain bounds. Invariant: `x_min < x_max`, `y_min < y_max`,
/// enforced by [`build_mesh`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Domain {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// Number of mesh points along each axis. Both counts must be at least 2 so
/// that every edge point has an interior neighbor to duplicate from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MeshSpec {
    pub nx: usize,
    pub ny: usize,
}

/// A uniformly spaced 2-D coordinate grid.
///
/// `x[[i, j]] == x_vector[j]` and `y[[i, j]] == y_vector[i]` for all points;
/// `hx` and `hy` are the constant spacings, both strictly positive.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub x: Array2<f64>,
    pub y: Array2<f64>,
    pub x_vector: Array1<f64>,
    pub y_vector: Array1<f64>,
    pub hx: f64,
    pub hy: f64,
}

impl Grid {
    /// Shape of the coordinate matrices as `(ny, nx)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.y_vector.len(), self.x_vector.len())
    }
}

/// Builds a uniformly spaced grid over `domain` with `spec.nx` × `spec.ny`
/// points, inclusive of all four domain edges.
///
/// Pure function: the same inputs always produce the same grid.
///
/// # Errors
/// Returns [`InvalidDomainError`] for reversed/empty bounds or fewer than
/// two points along either axis.
///
/// # Example
/// ```
/// use meshgrad::mesh::{build_mesh, Domain, MeshSpec};
///
/// let domain = Domain { x_min: -1.0, x_max: 1.0, y_min: -1.0, y_max: 1.0 };
/// let grid = build_mesh(&domain, &MeshSpec { nx: 3, ny: 3 }).unwrap();
/// assert_eq!(grid.x_vector.as_slice().unwrap(), &[-1.0, 0.0, 1.0]);
/// assert_eq!(grid.hx, 1.0);
/// ```
pub fn build_mesh(domain: &Domain, spec: &MeshSpec) -> Result<Grid, InvalidDomainError> {
    if domain.x_min >= domain.x_max {
        return Err(InvalidDomainError::EmptyXRange {
            min: domain.x_min,
            max: domain.x_max,
        });
    }
    if domain.y_min >= domain.y_max {
        return Err(InvalidDomainError::EmptyYRange {
            min: domain.y_min,
            max: domain.y_max,
        });
    }
    if spec.nx < 2 {
        return Err(InvalidDomainError::TooFewPoints {
            axis: 'x',
            got: spec.nx,
        });
    }
    if spec.ny < 2 {
        return Err(InvalidDomainError::TooFewPoints {
            axis: 'y',
            got: spec.ny,
        });
    }

    let x_vector = Array1::linspace(domain.x_min, domain.x_max, spec.nx);
    let y_vector = Array1::linspace(domain.y_min, domain.y_max, spec.ny);
    let hx = (domain.x_max - domain.x_min) / (spec.nx - 1) as f64;
    let hy = (domain.y_max - domain.y_min) / (spec.ny - 1) as f64;

    // Outer-product broadcast: rows repeat x_vector, columns repeat y_vector
    let x = Array2::from_shape_fn((spec.ny, spec.nx), |(_, j)| x_vector[j]);
    let y = Array2::from_shape_fn((spec.ny, spec.nx), |(i, _)| y_vector[i]);

    Ok(Grid {
        x,
        y,
        x_vector,
        y_vector,
        hx,
        hy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_invariants() {
        let domain = Domain {
            x_min: -1.0,
            x_max: 1.0,
            y_min: -1.0,
            y_max: 1.0,
        };
        let grid = build_mesh(&domain, &MeshSpec { nx: 3, ny: 3 }).unwrap();
        assert_eq!(grid.x_vector.as_slice().unwrap(), &[-1.0, 0.0, 1.0]);
        assert_eq!(grid.y_vector.as_slice().unwrap(), &[-1.0, 0.0, 1.0]);
        assert_eq!(grid.hx, 1.0);
        assert_eq!(grid.hy, 1.0);
        assert_eq!(grid.shape(), (3, 3));
    }

    #[test]
    fn test_meshgrid_broadcast() {
        let domain = Domain {
            x_min: 0.0,
            x_max: 2.0,
            y_min: 0.0,
            y_max: 1.0,
        };
        let grid = build_mesh(&domain, &MeshSpec { nx: 3, ny: 2 }).unwrap();
        // X repeats x_vector along rows, Y repeats y_vector along columns
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(grid.x[[i, j]], grid.x_vector[j]);
                assert_eq!(grid.y[[i, j]], grid.y_vector[i]);
            }
        }
    }

    #[test]
    fn test_endpoints_inclusive() {
        let domain = Domain {
            x_min: -2.5,
            x_max: 4.5,
            y_min: 1.0,
            y_max: 3.0,
        };
        let grid = build_mesh(&domain, &MeshSpec { nx: 7, ny: 5 }).unwrap();
        assert_eq!(grid.x_vector[0], -2.5);
        assert_eq!(grid.x_vector[6], 4.5);
        assert_eq!(grid.y_vector[0], 1.0);
        assert_eq!(grid.y_vector[4], 3.0);
    }

    #[test]
    fn test_rejects_bad_bounds() {
        let spec = MeshSpec { nx: 10, ny: 10 };
        let reversed = Domain {
            x_min: 1.0,
            x_max: -1.0,
            y_min: 0.0,
            y_max: 1.0,
        };
        assert!(matches!(
            build_mesh(&reversed, &spec),
            Err(InvalidDomainError::EmptyXRange { .. })
        ));
        let flat = Domain {
            x_min: 0.0,
            x_max: 1.0,
            y_min: 2.0,
            y_max: 2.0,
        };
        assert!(matches!(
            build_mesh(&flat, &spec),
            Err(InvalidDomainError::EmptyYRange { .. })
        ));
    }

    #[test]
    fn test_rejects_too_few_points() {
        let domain = Domain {
            x_min: 0.0,
            x_max: 1.0,
            y_min: 0.0,
            y_max: 1.0,
        };
        assert!(matches!(
            build_mesh(&domain, &MeshSpec { nx: 1, ny: 10 }),
            Err(InvalidDomainError::TooFewPoints { axis: 'x', got: 1 })
        ));
        assert!(matches!(
            build_mesh(&domain, &MeshSpec { nx: 10, ny: 0 }),
            Err(InvalidDomainError::TooFewPoints { axis: 'y', got: 0 })
        ));
    }
}
