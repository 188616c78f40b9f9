//! Matrix utilities for the mle-rs library.
//!
//! Public APIs use ndarray containers; nalgebra does the decompositions.
//! This module converts between the two and provides the inversion and
//! normalisation steps used to turn a Fisher information matrix into
//! covariances, correlations and standard errors.

use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

use crate::error::{MleError, Result};

/// Matrices whose smallest to largest singular value ratio falls below this
/// are treated as singular.
pub const RCOND_TOLERANCE: f64 = 1e-12;

/// Convert an ndarray Array2 to a nalgebra DMatrix.
pub fn ndarray_to_nalgebra(arr: &Array2<f64>) -> DMatrix<f64> {
    let (rows, cols) = arr.dim();
    DMatrix::from_fn(rows, cols, |i, j| arr[[i, j]])
}

/// Convert a nalgebra DMatrix to an ndarray Array2.
pub fn nalgebra_to_ndarray(mat: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((mat.nrows(), mat.ncols()), |(i, j)| mat[(i, j)])
}

/// Reciprocal condition number (smallest / largest singular value).
pub fn reciprocal_condition(matrix: &Array2<f64>) -> f64 {
    let singular_values = ndarray_to_nalgebra(matrix).singular_values();
    let max = singular_values.iter().cloned().fold(0.0_f64, f64::max);
    let min = singular_values.iter().cloned().fold(f64::INFINITY, f64::min);
    if max > 0.0 {
        min / max
    } else {
        0.0
    }
}

/// Invert a symmetric matrix, refusing singular or non-finite input.
///
/// The matrix is first checked for non-finite entries (`DomainError`) and for
/// numerical rank deficiency via its singular values (`SingularMatrix`).
/// Positive-definite matrices are inverted through a Cholesky factorisation;
/// anything else falls back to LU.
pub fn invert_symmetric(matrix: &Array2<f64>) -> Result<Array2<f64>> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(MleError::DimensionMismatch(format!(
            "Expected a square matrix, got {}x{}",
            rows, cols
        )));
    }
    if rows == 0 {
        return Err(MleError::InvalidInput("Cannot invert an empty matrix".to_string()));
    }
    if matrix.iter().any(|v| !v.is_finite()) {
        return Err(MleError::DomainError(
            "Matrix contains non-finite entries".to_string(),
        ));
    }

    let rcond = reciprocal_condition(matrix);
    if rcond < RCOND_TOLERANCE {
        return Err(MleError::SingularMatrix(format!(
            "reciprocal condition number {:.3e} is below {:.0e}",
            rcond, RCOND_TOLERANCE
        )));
    }

    let mat = ndarray_to_nalgebra(matrix);
    let inverse = match mat.clone().cholesky() {
        Some(chol) => chol.inverse(),
        None => mat.try_inverse().ok_or_else(|| {
            MleError::SingularMatrix("LU factorisation failed".to_string())
        })?,
    };

    Ok(nalgebra_to_ndarray(&inverse))
}

/// Calculate correlation matrix from covariance matrix.
///
/// The correlation matrix is calculated as:
///   correl[i,j] = covar[i,j] / sqrt(covar[i,i] * covar[j,j])
///
/// Diagonal elements are 1.0; pairs involving a non-positive variance get 0.0.
pub fn calculate_correlation(covar: &Array2<f64>) -> Array2<f64> {
    let n = covar.nrows();
    let mut correl = Array2::zeros((n, n));

    for i in 0..n {
        for j in 0..n {
            if i == j {
                correl[[i, j]] = 1.0;
            } else {
                let denom = (covar[[i, i]] * covar[[j, j]]).sqrt();
                correl[[i, j]] = if denom > 0.0 { covar[[i, j]] / denom } else { 0.0 };
            }
        }
    }

    correl
}

/// Extract standard errors (square roots of the diagonal) from a covariance matrix.
///
/// A negative variance can only come from an indefinite input and is
/// reported as a `DomainError` rather than turned into NaN.
pub fn standard_errors_from_covariance(covar: &Array2<f64>) -> Result<Array1<f64>> {
    covar
        .diag()
        .iter()
        .enumerate()
        .map(|(i, &var)| {
            if var >= 0.0 {
                Ok(var.sqrt())
            } else {
                Err(MleError::DomainError(format!(
                    "Variance of parameter {} is negative ({:e})",
                    i, var
                )))
            }
        })
        .collect()
}
