//! Integration tests for MultinomialLikelihood

use approx::assert_relative_eq;
use mle_rs::prelude::*;
use ndarray::array;

use crate::test_helpers::{matrix_approx_eq, Softmax3};

#[test]
fn test_bernoulli_estimate_and_uncertainty() {
    let pmf = model_fn(|p: &[Dual64]| vec![p[0], Dual64::from(1.0) - p[0]]);
    let mut logl = MultinomialLikelihood::new(array![20.0, 30.0], pmf).unwrap();

    let p_hat = logl.fit_with(&array![0.5]).unwrap();
    assert!(p_hat.success, "{}", p_hat);
    assert_relative_eq!(p_hat.params[0], 0.4, epsilon = 1e-5);

    let unc = logl.uncertainties().unwrap();
    assert_relative_eq!(unc[0], 0.069282032302755, epsilon = 1e-5);
}

#[test]
fn test_three_categories_softmax() {
    // MLE of the softmax logits: p_k = n_k / N, so logit_k = ln(n_k / n_2)
    let counts = array![30.0, 50.0, 20.0];
    let mut logl = MultinomialLikelihood::new(counts, Softmax3).unwrap();

    let fit = logl.fit_with(&array![0.0, 0.0]).unwrap();
    assert!(fit.success, "{}", fit);
    assert_relative_eq!(fit.params[0], 1.5f64.ln(), epsilon = 1e-4);
    assert_relative_eq!(fit.params[1], 2.5f64.ln(), epsilon = 1e-4);

    // For softmax logits F = N (diag(p) - p p^T) over the free categories
    let (p0, p1) = (0.3, 0.5);
    let expected = array![
        [100.0 * p0 * (1.0 - p0), -100.0 * p0 * p1],
        [-100.0 * p0 * p1, 100.0 * p1 * (1.0 - p1)]
    ];
    let fisher = logl.fisher_information_matrix().unwrap();
    assert!(matrix_approx_eq(&fisher, &expected, 1e-2), "{}", fisher);
    assert_eq!(fisher[[0, 1]].to_bits(), fisher[[1, 0]].to_bits());

    let corr = logl.correlation().unwrap();
    assert_relative_eq!(corr[[0, 0]], 1.0, epsilon = 1e-12);
    assert!(corr[[0, 1]] > 0.0 && corr[[0, 1]] < 1.0);
}

#[test]
fn test_lbfgs_agrees_with_nelder_mead() {
    let counts = array![30.0, 50.0, 20.0];

    let mut simplex = MultinomialLikelihood::new(counts.clone(), Softmax3).unwrap();
    let mut quasi_newton = MultinomialLikelihood::new(counts, Softmax3).unwrap();

    let a = simplex.fit_with(&array![0.0, 0.0]).unwrap();
    let b = quasi_newton
        .fit(&array![0.0, 0.0], Method::Lbfgs, &FitOptions::default())
        .unwrap();

    assert!(a.success && b.success);
    assert_eq!(b.method, Method::Lbfgs);
    assert_relative_eq!(a.params[0], b.params[0], epsilon = 1e-4);
    assert_relative_eq!(a.params[1], b.params[1], epsilon = 1e-4);
    assert_relative_eq!(a.objective, b.objective, epsilon = 1e-8);
}

#[test]
fn test_log_likelihood_at_optimum() {
    let pmf = model_fn(|p: &[Dual64]| vec![p[0], Dual64::from(1.0) - p[0]]);
    let mut logl = MultinomialLikelihood::new(array![20.0, 30.0], pmf).unwrap();
    let fit = logl.fit_with(&array![0.5]).unwrap();

    let at_optimum = logl.log_likelihood(&fit.params).unwrap();
    assert_relative_eq!(at_optimum, -fit.objective, epsilon = 1e-12);
    assert!(logl.log_likelihood(&array![0.3]).unwrap() < at_optimum);
    assert!(logl.log_likelihood(&array![0.5]).unwrap() < at_optimum);
}

#[test]
fn test_accessors() {
    let pmf = model_fn(|p: &[Dual64]| vec![p[0], Dual64::from(1.0) - p[0]]);
    let logl = MultinomialLikelihood::new(array![3.0, 4.0], pmf).unwrap();
    assert_eq!(logl.data(), &array![3.0, 4.0]);
    assert_eq!(logl.n_counts(), 7.0);
    assert_eq!(logl.pmf().eval_f64(&[0.25]).to_vec(), vec![0.25, 0.75]);
    assert!(logl.fit_result().is_none());
}
