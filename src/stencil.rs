//! Central-difference stencil for discrete partial derivatives.
//!
//! Interior points use the second-order central-difference formula; error
//! scales as O(hx²)/O(hy²) for smooth fields. Boundary rows and columns do
//! NOT use one-sided differences — they duplicate the value of the nearest
//! interior neighbor. That is a deliberate design choice of this engine:
//! boundary derivative values carry lower accuracy than interior ones, and
//! callers must not rely on them to the same tolerance.

use ndarray::Array2;

/// Computes the discrete partial derivatives ∂f/∂x and ∂f/∂y of a sampled
/// field `z` of shape `(ny, nx)` with uniform spacings `hx`, `hy`.
///
/// Interior rule:
/// `df_dx[i, j] = (z[i, j+1] - z[i, j-1]) / (2 hx)` for `0 < j < nx-1`, and
/// `df_dy[i, j] = (z[i+1, j] - z[i-1, j]) / (2 hy)` for `0 < i < ny-1`.
///
/// Boundary rule: the first and last column of `df_dx` copy their adjacent
/// interior column; the first and last row of `df_dy` copy their adjacent
/// interior row.
///
/// Degenerate meshes with `nx == 2` (`ny == 2`) have no interior column
/// (row); both columns (rows) then take the two-point difference
/// `(z[:,1] - z[:,0]) / hx`, keeping the function total for every valid
/// mesh size ≥ 2.
///
/// Pure and deterministic; allocates nothing beyond the two output arrays.
/// Non-finite entries in `z` propagate through the stencil arithmetic.
pub fn partial_derivatives(z: &Array2<f64>, hx: f64, hy: f64) -> (Array2<f64>, Array2<f64>) {
    let (ny, nx) = z.dim();
    let mut df_dx = Array2::zeros((ny, nx));
    let mut df_dy = Array2::zeros((ny, nx));

    // ∂f/∂x: central difference across columns
    if nx > 2 {
        for i in 0..ny {
            for j in 1..nx - 1 {
                df_dx[[i, j]] = (z[[i, j + 1]] - z[[i, j - 1]]) / (2.0 * hx);
            }
            // duplicate-neighbor boundary policy, not a one-sided difference
            df_dx[[i, 0]] = df_dx[[i, 1]];
            df_dx[[i, nx - 1]] = df_dx[[i, nx - 2]];
        }
    } else {
        // nx == 2: two-point difference duplicated across both columns
        for i in 0..ny {
            let d = (z[[i, 1]] - z[[i, 0]]) / hx;
            df_dx[[i, 0]] = d;
            df_dx[[i, 1]] = d;
        }
    }

    // ∂f/∂y: central difference across rows
    if ny > 2 {
        for i in 1..ny - 1 {
            for j in 0..nx {
                df_dy[[i, j]] = (z[[i + 1, j]] - z[[i - 1, j]]) / (2.0 * hy);
            }
        }
        for j in 0..nx {
            df_dy[[0, j]] = df_dy[[1, j]];
            df_dy[[ny - 1, j]] = df_dy[[ny - 2, j]];
        }
    } else {
        for j in 0..nx {
            let d = (z[[1, j]] - z[[0, j]]) / hy;
            df_dy[[0, j]] = d;
            df_dy[[1, j]] = d;
        }
    }

    (df_dx, df_dy)
}
