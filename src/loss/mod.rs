//! Loss functions minimized directly, without a probabilistic model.
//!
//! A [`LossFunction`] is an [`Objective`] that remembers its last fit. The
//! only loss provided is [`L1Norm`], the sum of absolute residuals, which is
//! less sensitive to outliers than a quadratic loss.

mod l1;

pub use l1::{L1Norm, Regularization};

use ndarray::Array1;

use crate::error::Result;
use crate::optimizer::{minimize, FitOptions, FitResult, Method, Objective};

/// An objective that stores the result of its last fit.
pub trait LossFunction: Objective {
    /// The stored result of the last `fit`, if any.
    fn fit_result(&self) -> Option<&FitResult>;

    /// Replace the stored fit result.
    fn set_fit_result(&mut self, result: FitResult);

    /// Minimize the loss from `x0`, storing and returning the result.
    fn fit(&mut self, x0: &Array1<f64>, method: Method, options: &FitOptions) -> Result<FitResult> {
        let result = minimize(&*self, x0, method, options)?;
        self.set_fit_result(result.clone());
        Ok(result)
    }

    /// [`fit`](LossFunction::fit) with the default method and options.
    fn fit_with(&mut self, x0: &Array1<f64>) -> Result<FitResult> {
        self.fit(x0, Method::default(), &FitOptions::default())
    }
}
