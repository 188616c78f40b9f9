//! Numerical gradients for objectives without exact derivatives.
//!
//! Losses that call an opaque `f64` model, such as [`L1Norm`](crate::loss::L1Norm),
//! cannot be differentiated with dual numbers. L-BFGS still needs a
//! gradient for them, which [`gradient`] approximates.

use crate::error::Result;
use ndarray::Array1;

/// Relative step for the central differences.
const STEP: f64 = 1e-6;

/// Central-difference gradient of `f` at `params`.
///
/// Each coordinate is moved by `STEP * max(1, |p_j|)` in both directions, so
/// the step follows the scale of large parameters. Errors from `f` are
/// returned as they are.
pub fn gradient<F>(f: F, params: &Array1<f64>) -> Result<Array1<f64>>
where
    F: Fn(&Array1<f64>) -> Result<f64>,
{
    let mut shifted = params.clone();
    params
        .iter()
        .enumerate()
        .map(|(j, &p)| {
            let h = STEP * p.abs().max(1.0);
            shifted[j] = p + h;
            let up = f(&shifted)?;
            shifted[j] = p - h;
            let down = f(&shifted)?;
            shifted[j] = p;
            Ok((up - down) / (2.0 * h))
        })
        .collect()
}
