//! Fisher information assembly shared by the likelihoods.
//!
//! For a model `m(θ)` with outputs `m_k`, the expected information is
//!
//! ```text
//! F[i, j] = w * Σ_k (∂m_k/∂θ_i) (∂m_k/∂θ_j) / m_k
//! ```
//!
//! where `w` is the total count for a multinomial and 1 for independent
//! Poisson counts. Every per-parameter derivative is built and evaluated
//! before the pairwise loop; the loop fills the upper triangle and mirrors
//! each entry, so the result is symmetric bit for bit.

use log::debug;
use ndarray::{Array1, Array2};

use crate::autodiff::{partial, Model, Partial};
use crate::error::{MleError, Result};

/// Expected Fisher information of `model` at `params`, scaled by `weight`.
///
/// Non-positive model outputs make the corresponding terms infinite or NaN;
/// those values are returned as computed and rejected later by inversion.
pub fn fisher_information<M: Model + ?Sized>(
    model: &M,
    params: &[f64],
    weight: f64,
) -> Result<Array2<f64>> {
    let n_params = params.len();
    if n_params == 0 {
        return Err(MleError::InvalidInput(
            "Fisher information needs at least one parameter".to_string(),
        ));
    }

    let values = model.eval_f64(params);

    let partials: Vec<Partial<'_, M>> = (0..n_params).map(|i| partial(model, i)).collect();
    let gradients: Vec<Array1<f64>> = partials
        .iter()
        .map(|d| d.at(params))
        .collect::<Result<_>>()?;

    for (i, grad) in gradients.iter().enumerate() {
        if grad.len() != values.len() {
            return Err(MleError::DimensionMismatch(format!(
                "Derivative with respect to parameter {} has {} entries, model has {} outputs",
                i,
                grad.len(),
                values.len()
            )));
        }
    }

    let mut fisher = Array2::zeros((n_params, n_params));
    for i in 0..n_params {
        for j in i..n_params {
            let entry = (&gradients[i] * &gradients[j] / &values).sum();
            fisher[[i, j]] = weight * entry;
            fisher[[j, i]] = fisher[[i, j]];
        }
    }

    debug!(
        "Assembled {}x{} Fisher information over {} outputs (weight {})",
        n_params,
        n_params,
        values.len(),
        weight
    );

    Ok(fisher)
}
