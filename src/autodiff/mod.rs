//! Automatic differentiation for user models.
//!
//! This module provides the exact derivatives the likelihoods need:
//!
//! - [`Dual64`] numbers from `num-dual` for forward-mode differentiation
//! - the [`Scalar`] trait, so a model is written once and evaluated both in
//!   `f64` and in `Dual64`
//! - the [`Model`] trait and the [`model_fn`] closure adapter
//! - [`partial`], which turns a model into the function computing its
//!   derivative with respect to one parameter slot, and [`jacobian`]
//!
//! Derivatives are exact up to floating point rounding; there is no step
//! size to tune.

mod model;

pub use model::{jacobian, model_fn, partial, FnModel, Model, Partial, Scalar};
pub use num_dual::{Dual64, DualNum};

/// Gradient of a scalar function written against [`Scalar`], by one
/// forward pass per parameter.
pub fn gradient<F>(f: F, params: &[f64]) -> Vec<f64>
where
    F: Fn(&[Dual64]) -> Dual64,
{
    let mut seeded: Vec<Dual64> = params.iter().map(|&p| Dual64::from(p)).collect();
    let mut grad = Vec::with_capacity(params.len());

    for i in 0..params.len() {
        seeded[i].eps = 1.0;
        grad.push(f(&seeded).eps);
        seeded[i].eps = 0.0;
    }

    grad
}
