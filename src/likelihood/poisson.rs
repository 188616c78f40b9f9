//! Likelihood of independent counts under Poisson distributions.

use ndarray::{Array1, Array2};

use super::{check_output_len, fisher_information, Likelihood};
use crate::autodiff::{self, Dual64, Model, Scalar};
use crate::error::{MleError, Result};
use crate::optimizer::{FitResult, Objective};

/// Poisson likelihood of observed counts.
///
/// `mean` maps the parameters to the expected count of every observation.
/// The negative log-likelihood is `Σ_k μ_k(θ) - y_k ln μ_k(θ)`, dropping the
/// data-only `ln y_k!` term, and the Fisher information is
/// `Σ_k (∂μ_k/∂θ_i)(∂μ_k/∂θ_j) / μ_k`.
#[derive(Debug, Clone)]
pub struct PoissonLikelihood<M> {
    data: Array1<f64>,
    mean: M,
    fit_result: Option<FitResult>,
}

impl<M: Model> PoissonLikelihood<M> {
    /// Create a likelihood from observed counts and a mean model.
    pub fn new(data: Array1<f64>, mean: M) -> Result<Self> {
        if data.is_empty() {
            return Err(MleError::InvalidInput(
                "Poisson likelihood needs at least one observation".to_string(),
            ));
        }
        Ok(Self {
            data,
            mean,
            fit_result: None,
        })
    }

    /// Observed counts.
    pub fn data(&self) -> &Array1<f64> {
        &self.data
    }

    /// The mean model.
    pub fn mean(&self) -> &M {
        &self.mean
    }

    fn negative_log_likelihood<S: Scalar>(&self, params: &[S]) -> Result<S> {
        let means = self.mean.eval(params);
        check_output_len("Mean model", means.len(), self.data.len())?;

        Ok(self
            .data
            .iter()
            .zip(means)
            .fold(S::zero(), |acc, (&y, mu)| acc + mu - S::from(y) * mu.ln()))
    }
}

impl<M: Model> Objective for PoissonLikelihood<M> {
    fn evaluate(&self, params: &Array1<f64>) -> Result<f64> {
        self.negative_log_likelihood(&params.to_vec())
    }

    fn gradient(&self, params: &Array1<f64>) -> Result<Array1<f64>> {
        let params = params.to_vec();
        self.negative_log_likelihood(&params)?;

        let grad = autodiff::gradient(
            |p: &[Dual64]| {
                self.negative_log_likelihood(p)
                    .unwrap_or(Dual64::from(f64::NAN))
            },
            &params,
        );
        Ok(Array1::from_vec(grad))
    }
}

impl<M: Model> Likelihood for PoissonLikelihood<M> {
    fn fisher_information_matrix_at(&self, params: &Array1<f64>) -> Result<Array2<f64>> {
        let params = params.to_vec();
        check_output_len("Mean model", self.mean.eval_f64(&params).len(), self.data.len())?;
        fisher_information(&self.mean, &params, 1.0)
    }

    fn fit_result(&self) -> Option<&FitResult> {
        self.fit_result.as_ref()
    }

    fn set_fit_result(&mut self, result: FitResult) {
        self.fit_result = Some(result);
    }
}
