//! # mle-rs
//!
//! `mle-rs` is a small statistical estimation toolkit: given observed data
//! and a model, it finds the parameters that maximize a likelihood (or
//! minimize a loss) and reports their uncertainties from the Fisher
//! information matrix.
//!
//! The library provides:
//! - Multinomial and Poisson likelihoods behind a common [`Likelihood`] trait
//! - Fisher information, covariance and uncertainties computed with exact
//!   derivatives of the user model (forward-mode dual numbers from `num-dual`)
//! - Nelder-Mead and L-BFGS minimization through `argmin`
//! - An L1 norm loss with optional weighted regularization
//! - Parallel fitting of many independent likelihoods (feature `parallel`)
//!
//! ## Basic Usage
//!
//! ```
//! use mle_rs::prelude::*;
//! use ndarray::array;
//!
//! // Two categories with probabilities p and 1 - p.
//! let pmf = model_fn(|p: &[Dual64]| vec![p[0], Dual64::from(1.0) - p[0]]);
//! let mut logl = MultinomialLikelihood::new(array![20.0, 30.0], pmf).unwrap();
//!
//! let fit = logl.fit_with(&array![0.5]).unwrap();
//! assert!(fit.success);
//!
//! let p_hat = fit.params[0];
//! let sigma = logl.uncertainties().unwrap()[0];
//! assert!((p_hat - 0.4).abs() < 1e-4);
//! assert!((sigma - 0.0693).abs() < 1e-3);
//! ```
//!
//! Models can also implement [`Model`](autodiff::Model) directly, writing the
//! computation once against the [`Scalar`](autodiff::Scalar) trait:
//!
//! ```
//! use mle_rs::prelude::*;
//! use ndarray::array;
//!
//! struct Decay {
//!     t: Vec<f64>,
//! }
//!
//! impl Model for Decay {
//!     fn eval<S: Scalar>(&self, p: &[S]) -> Vec<S> {
//!         self.t.iter().map(|&t| p[0] * (-p[1] * S::from(t)).exp()).collect()
//!     }
//! }
//!
//! let model = Decay { t: vec![0.0, 1.0, 2.0, 3.0] };
//! let logl = PoissonLikelihood::new(array![100.0, 61.0, 37.0, 22.0], model).unwrap();
//! let fisher = logl.fisher_information_matrix_at(&array![100.0, 0.5]).unwrap();
//! assert_eq!(fisher[[0, 1]], fisher[[1, 0]]);
//! ```

pub mod autodiff;
pub mod error;
pub mod likelihood;
pub mod loss;
pub mod optimizer;
pub mod utils;

#[cfg(feature = "parallel")]
pub mod parallel;

// Re-exports for convenience
pub use error::{MleError, Result};
pub use likelihood::{Likelihood, MultinomialLikelihood, PoissonLikelihood};
pub use loss::{L1Norm, LossFunction, Regularization};
pub use optimizer::{minimize, FitOptions, FitResult, Method, Objective};

/// Common imports for building and fitting likelihoods.
pub mod prelude {
    pub use crate::autodiff::{model_fn, partial, Dual64, DualNum, Model, Scalar};
    pub use crate::error::{MleError, Result};
    pub use crate::likelihood::{Likelihood, MultinomialLikelihood, PoissonLikelihood};
    pub use crate::loss::{L1Norm, LossFunction, Regularization};
    pub use crate::optimizer::{FitOptions, FitResult, Method, Objective};
}

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
