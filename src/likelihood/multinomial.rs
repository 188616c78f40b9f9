//! Likelihood of category counts under a multinomial distribution.

use ndarray::{Array1, Array2};

use super::{check_output_len, fisher_information, Likelihood};
use crate::autodiff::{self, Dual64, Model, Scalar};
use crate::error::{MleError, Result};
use crate::optimizer::{FitResult, Objective};

/// Multinomial likelihood of observed category counts.
///
/// `pmf` maps the parameters to one probability per category. The negative
/// log-likelihood is `-Σ_k n_k ln p_k(θ)` and the Fisher information is
/// `N Σ_k (∂p_k/∂θ_i)(∂p_k/∂θ_j) / p_k` with `N = Σ_k n_k`.
///
/// Counts are expected to be non-negative and the probabilities strictly
/// positive; neither is checked, and values outside that domain come back
/// as NaN or infinity from [`evaluate`](Objective::evaluate).
///
/// # Examples
///
/// ```
/// use mle_rs::prelude::*;
/// use ndarray::array;
///
/// // p(class 1) = 1 - p(class 2) = p
/// let pmf = model_fn(|p: &[Dual64]| vec![p[0], Dual64::from(1.0) - p[0]]);
/// let mut logl = MultinomialLikelihood::new(array![20.0, 30.0], pmf).unwrap();
/// assert_eq!(logl.n_counts(), 50.0);
///
/// let fit = logl.fit_with(&array![0.5]).unwrap();
/// let fisher = logl.fisher_information_matrix().unwrap();
/// assert!((fisher[[0, 0]] - 50.0 / (0.4 * 0.6)).abs() < 1.0);
/// # assert!(fit.success);
/// ```
#[derive(Debug, Clone)]
pub struct MultinomialLikelihood<M> {
    data: Array1<f64>,
    pmf: M,
    fit_result: Option<FitResult>,
}

impl<M: Model> MultinomialLikelihood<M> {
    /// Create a likelihood from category counts and a probability model.
    pub fn new(data: Array1<f64>, pmf: M) -> Result<Self> {
        if data.is_empty() {
            return Err(MleError::InvalidInput(
                "Multinomial likelihood needs at least one category".to_string(),
            ));
        }
        Ok(Self {
            data,
            pmf,
            fit_result: None,
        })
    }

    /// Observed category counts.
    pub fn data(&self) -> &Array1<f64> {
        &self.data
    }

    /// The probability model.
    pub fn pmf(&self) -> &M {
        &self.pmf
    }

    /// Total number of observations, `Σ_k n_k`.
    pub fn n_counts(&self) -> f64 {
        self.data.sum()
    }

    fn negative_log_likelihood<S: Scalar>(&self, params: &[S]) -> Result<S> {
        let probs = self.pmf.eval(params);
        check_output_len("Probability model", probs.len(), self.data.len())?;

        let log_l = self
            .data
            .iter()
            .zip(probs)
            .fold(S::zero(), |acc, (&n, p)| acc + S::from(n) * p.ln());
        Ok(-log_l)
    }
}

impl<M: Model> Objective for MultinomialLikelihood<M> {
    fn evaluate(&self, params: &Array1<f64>) -> Result<f64> {
        self.negative_log_likelihood(&params.to_vec())
    }

    fn gradient(&self, params: &Array1<f64>) -> Result<Array1<f64>> {
        let params = params.to_vec();
        // Surface a length mismatch before differentiating.
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

impl<M: Model> Likelihood for MultinomialLikelihood<M> {
    fn fisher_information_matrix_at(&self, params: &Array1<f64>) -> Result<Array2<f64>> {
        check_output_len(
            "Probability model",
            self.pmf.eval_f64(&params.to_vec()).len(),
            self.data.len(),
        )?;
        fisher_information(&self.pmf, &params.to_vec(), self.n_counts())
    }

    fn fit_result(&self) -> Option<&FitResult> {
        self.fit_result.as_ref()
    }

    fn set_fit_result(&mut self, result: FitResult) {
        self.fit_result = Some(result);
    }
}
