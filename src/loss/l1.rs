//! L1 norm loss with optional weighted regularization.

use ndarray::Array1;
use std::fmt;

use super::LossFunction;
use crate::error::{MleError, Result};
use crate::optimizer::{FitResult, Objective};

type Penalty = Box<dyn Fn(&[f64]) -> f64 + Send + Sync>;

/// Regularization added to an [`L1Norm`].
///
/// Chosen when the loss is built and fixed afterwards.
pub enum Regularization {
    /// Plain sum of absolute residuals.
    None,

    /// Adds `w * penalty(θ)` to every residual term, where the weight `w`
    /// is the last entry of the parameter vector and `θ` the entries before
    /// it. The model only sees `θ`.
    Weighted(Penalty),
}

impl Regularization {
    /// Weighted regularization with the given penalty function.
    pub fn weighted<F>(penalty: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        Regularization::Weighted(Box::new(penalty))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Regularization::None)
    }
}

impl fmt::Debug for Regularization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regularization::None => f.write_str("None"),
            Regularization::Weighted(_) => f.write_str("Weighted(..)"),
        }
    }
}

/// Sum of absolute residuals between data and a model.
///
/// Residual terms that are NaN are skipped, so missing observations can be
/// encoded as NaN in `data`.
///
/// # Examples
///
/// ```
/// use mle_rs::loss::{L1Norm, LossFunction};
/// use ndarray::{array, Array1};
///
/// // A constant model: the L1 fit is the median, unaffected by the outlier.
/// let data = array![1.0, 2.0, 3.0, 4.0, 90.0];
/// let level = |p: &[f64]| Array1::from_elem(5, p[0]);
///
/// let mut loss = L1Norm::new(data, level);
/// let fit = loss.fit_with(&array![20.0]).unwrap();
/// assert!((fit.params[0] - 3.0).abs() < 1e-3);
/// ```
pub struct L1Norm<F> {
    data: Array1<f64>,
    model: F,
    regularization: Regularization,
    fit_result: Option<FitResult>,
}

impl<F> L1Norm<F>
where
    F: Fn(&[f64]) -> Array1<f64>,
{
    /// Unregularized L1 loss.
    pub fn new(data: Array1<f64>, model: F) -> Self {
        Self::with_regularization(data, model, Regularization::None)
    }

    /// L1 loss with the given regularization.
    pub fn with_regularization(
        data: Array1<f64>,
        model: F,
        regularization: Regularization,
    ) -> Self {
        Self {
            data,
            model,
            regularization,
            fit_result: None,
        }
    }

    pub fn data(&self) -> &Array1<f64> {
        &self.data
    }

    pub fn model(&self) -> &F {
        &self.model
    }

    pub fn regularization(&self) -> &Regularization {
        &self.regularization
    }

    fn residuals(&self, params: &[f64]) -> Result<Array1<f64>> {
        let predicted = (self.model)(params);
        if predicted.len() != self.data.len() {
            return Err(MleError::DimensionMismatch(format!(
                "Model returned {} values for {} observations",
                predicted.len(),
                self.data.len()
            )));
        }
        Ok((&self.data - &predicted).mapv(f64::abs))
    }
}

fn nansum(values: impl Iterator<Item = f64>) -> f64 {
    values.filter(|v| !v.is_nan()).sum()
}

impl<F> Objective for L1Norm<F>
where
    F: Fn(&[f64]) -> Array1<f64>,
{
    fn evaluate(&self, params: &Array1<f64>) -> Result<f64> {
        let params = params.to_vec();
        match &self.regularization {
            Regularization::None => Ok(nansum(self.residuals(&params)?.iter().copied())),
            Regularization::Weighted(penalty) => {
                let (weight, theta) = params.split_last().ok_or_else(|| {
                    MleError::InvalidInput(
                        "Weighted regularization needs the weight as last parameter".to_string(),
                    )
                })?;
                let term = weight * penalty(theta);
                Ok(nansum(self.residuals(theta)?.iter().map(|r| r + term)))
            }
        }
    }
}

impl<F> LossFunction for L1Norm<F>
where
    F: Fn(&[f64]) -> Array1<f64>,
{
    fn fit_result(&self) -> Option<&FitResult> {
        self.fit_result.as_ref()
    }

    fn set_fit_result(&mut self, result: FitResult) {
        self.fit_result = Some(result);
    }
}

impl<F> fmt::Debug for L1Norm<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("L1Norm")
            .field("data", &self.data)
            .field("regularization", &self.regularization)
            .field("fit_result", &self.fit_result)
            .finish()
    }
}
