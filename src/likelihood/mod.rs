//! Maximum likelihood estimation.
//!
//! This module defines the [`Likelihood`] contract and its two concrete
//! distributions:
//!
//! - [`MultinomialLikelihood`]: category counts with a model for the
//!   per-category probabilities
//! - [`PoissonLikelihood`]: independent counts with a model for their means
//!
//! A likelihood is built from observed data and a [`Model`](crate::autodiff::Model),
//! fit by minimizing its negative log-likelihood, and then queried for the
//! Fisher information, the parameter covariance and the parameter
//! uncertainties at the fitted point.
//!
//! ```
//! use mle_rs::prelude::*;
//! use ndarray::array;
//!
//! let pmf = model_fn(|p: &[Dual64]| vec![p[0], Dual64::from(1.0) - p[0]]);
//! let mut logl = MultinomialLikelihood::new(array![20.0, 30.0], pmf).unwrap();
//!
//! let fit = logl.fit_with(&array![0.5]).unwrap();
//! assert!(fit.success);
//! assert!((fit.params[0] - 0.4).abs() < 1e-4);
//!
//! let unc = logl.uncertainties().unwrap();
//! assert!((unc[0] - (0.4f64 * 0.6 / 50.0).sqrt()).abs() < 1e-4);
//! ```

mod fisher;
mod multinomial;
mod poisson;

pub use fisher::fisher_information;
pub use multinomial::MultinomialLikelihood;
pub use poisson::PoissonLikelihood;

use log::warn;
use ndarray::{Array1, Array2};

use crate::error::{MleError, Result};
use crate::optimizer::{minimize, FitOptions, FitResult, Method, Objective};
use crate::utils::{calculate_correlation, invert_symmetric, standard_errors_from_covariance};

/// A likelihood whose negative logarithm is the [`Objective`] to minimize.
///
/// Implementors provide the negative log-likelihood (`Objective::evaluate`),
/// the Fisher information at a given point, and storage for the last fit.
/// Fitting, the fitted-point Fisher matrix, covariance and uncertainties are
/// provided on top of those.
///
/// Quantities at the fitted point require a stored fit that converged:
/// without one they fail with [`MleError::NotFitted`], and after an
/// unsuccessful fit with [`MleError::UnsuccessfulFit`].
pub trait Likelihood: Objective {
    /// Fisher information matrix at `params`, without any fit checks.
    fn fisher_information_matrix_at(&self, params: &Array1<f64>) -> Result<Array2<f64>>;

    /// The stored result of the last `fit`, if any.
    fn fit_result(&self) -> Option<&FitResult>;

    /// Replace the stored fit result.
    fn set_fit_result(&mut self, result: FitResult);

    /// Find the maximum likelihood estimate by minimizing the negative
    /// log-likelihood from `x0`.
    ///
    /// The result is stored (replacing any previous one) and returned, also
    /// when the solver did not converge; check `success` before relying on it.
    fn fit(&mut self, x0: &Array1<f64>, method: Method, options: &FitOptions) -> Result<FitResult> {
        let result = minimize(&*self, x0, method, options)?;
        self.set_fit_result(result.clone());
        Ok(result)
    }

    /// [`fit`](Likelihood::fit) with the default method and options.
    fn fit_with(&mut self, x0: &Array1<f64>) -> Result<FitResult> {
        self.fit(x0, Method::default(), &FitOptions::default())
    }

    /// Parameters of the stored fit, provided it converged.
    fn fitted_params(&self) -> Result<&Array1<f64>> {
        match self.fit_result() {
            None => Err(MleError::NotFitted),
            Some(result) if !result.success => {
                warn!(
                    "Refusing to use parameters of an unsuccessful fit ({})",
                    result.message
                );
                Err(MleError::UnsuccessfulFit(result.message.clone()))
            }
            Some(result) => Ok(&result.params),
        }
    }

    /// Fisher information matrix at the fitted parameters.
    fn fisher_information_matrix(&self) -> Result<Array2<f64>> {
        let params = self.fitted_params()?;
        self.fisher_information_matrix_at(params)
    }

    /// Asymptotic covariance of the estimate: the inverse Fisher matrix.
    ///
    /// Fails with [`MleError::SingularMatrix`] when the model is not
    /// identifiable at the fitted point.
    fn covariance(&self) -> Result<Array2<f64>> {
        invert_symmetric(&self.fisher_information_matrix()?)
    }

    /// Parameter correlations derived from [`covariance`](Likelihood::covariance).
    fn correlation(&self) -> Result<Array2<f64>> {
        Ok(calculate_correlation(&self.covariance()?))
    }

    /// Uncertainties of the fitted parameters: square roots of the diagonal
    /// of the inverse Fisher matrix, in parameter order.
    fn uncertainties(&self) -> Result<Array1<f64>> {
        standard_errors_from_covariance(&self.covariance()?)
    }

    /// Log-likelihood at `params` (the negated objective).
    fn log_likelihood(&self, params: &Array1<f64>) -> Result<f64> {
        Ok(-self.evaluate(params)?)
    }
}

/// Ensure a model produced one output per observation.
pub(crate) fn check_output_len(what: &str, outputs: usize, observations: usize) -> Result<()> {
    if outputs != observations {
        return Err(MleError::DimensionMismatch(format!(
            "{} returned {} values for {} observations",
            what, outputs, observations
        )));
    }
    Ok(())
}
