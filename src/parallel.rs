//! Fitting many independent likelihoods at once.
//!
//! Likelihood instances share no state, so a batch of them (bootstrap
//! replicas, per-channel fits, simulated datasets) can be fit concurrently.
//! The batch runs on the global rayon thread pool.

use ndarray::{Array1, Array2};
use rayon::prelude::*;

use crate::error::Result;
use crate::likelihood::Likelihood;
use crate::optimizer::{FitOptions, FitResult, Method};

/// Fit every likelihood in `items` from the same initial guess, in parallel.
///
/// Results come back in the order of `items`; each instance also stores its
/// own result as a sequential [`Likelihood::fit`] would.
///
/// # Arguments
///
/// * `items` - The likelihoods to fit
/// * `x0` - Initial guess shared by all fits
/// * `method` - The solver to use
/// * `options` - Solver settings
pub fn fit_all<L>(
    items: &mut [L],
    x0: &Array1<f64>,
    method: Method,
    options: &FitOptions,
) -> Vec<Result<FitResult>>
where
    L: Likelihood + Send,
{
    items
        .par_iter_mut()
        .map(|item| item.fit(x0, method, options))
        .collect()
}

/// Fisher information at the stored fit of every likelihood, in parallel.
pub fn fisher_all<L>(items: &[L]) -> Vec<Result<Array2<f64>>>
where
    L: Likelihood + Sync,
{
    items
        .par_iter()
        .map(|item| item.fisher_information_matrix())
        .collect()
}

/// Parameter uncertainties at the stored fit of every likelihood, in parallel.
pub fn uncertainties_all<L>(items: &[L]) -> Vec<Result<Array1<f64>>>
where
    L: Likelihood + Sync,
{
    items.par_iter().map(|item| item.uncertainties()).collect()
}
