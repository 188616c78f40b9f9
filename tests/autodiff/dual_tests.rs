//! Integration tests for derivatives taken through `Dual64`

use approx::assert_relative_eq;
use mle_rs::autodiff::{gradient, Dual64, DualNum, Model, Scalar};

/// Derivative of `f` at `x` by a single forward pass.
fn derivative(f: impl Fn(Dual64) -> Dual64, x: f64) -> f64 {
    f(Dual64::new(x, 1.0)).eps
}

#[test]
fn test_elementary_derivatives() {
    let x = 0.7;
    assert_relative_eq!(derivative(|d| d.ln(), x), 1.0 / x, epsilon = 1e-12);
    assert_relative_eq!(derivative(|d| d.exp(), x), x.exp(), epsilon = 1e-12);
    assert_relative_eq!(derivative(|d| d.sqrt(), x), 0.5 / x.sqrt(), epsilon = 1e-12);
    assert_relative_eq!(derivative(|d| d.sin(), x), x.cos(), epsilon = 1e-12);
    assert_relative_eq!(derivative(|d| d.cos(), x), -x.sin(), epsilon = 1e-12);
    assert_relative_eq!(
        derivative(|d| d.tanh(), x),
        1.0 - x.tanh().powi(2),
        epsilon = 1e-12
    );
    assert_relative_eq!(derivative(|d| d.powi(3), x), 3.0 * x * x, epsilon = 1e-12);
    assert_relative_eq!(
        derivative(|d| d.powf(2.5), x),
        2.5 * x.powf(1.5),
        epsilon = 1e-12
    );
}

#[test]
fn test_chain_and_quotient_rules() {
    // f(x) = ln(1 + x^2) / x
    let f = |d: Dual64| (Dual64::from(1.0) + d * d).ln() / d;
    let x = 1.3f64;
    let expected = (2.0 * x * x / (1.0 + x * x) - (1.0 + x * x).ln()) / (x * x);
    assert_relative_eq!(derivative(f, x), expected, epsilon = 1e-12);
}

#[test]
fn test_log_of_non_positive_values() {
    assert!(Dual64::new(0.0, 1.0).ln().re.is_infinite());
    assert!(Dual64::new(-1.0, 1.0).ln().re.is_nan());
}

#[test]
fn test_scalar_functions_agree_between_f64_and_dual() {
    fn f<S: Scalar>(x: S) -> S {
        (x * x + S::one()).sqrt() * x.exp() - x.ln()
    }

    let x = 2.2;
    assert_relative_eq!(f(x), f(Dual64::new(x, 1.0)).re, epsilon = 1e-12);
}

#[test]
fn test_gradient_of_negative_log_likelihood() {
    // -Σ n_k ln p_k with p = [a, b, 1 - a - b]
    let counts = [10.0, 20.0, 70.0];
    let nll = |p: &[Dual64]| {
        let probs = [p[0], p[1], Dual64::from(1.0) - p[0] - p[1]];
        -counts
            .iter()
            .zip(probs.iter())
            .fold(Dual64::from(0.0), |acc, (&n, &q)| acc + Dual64::from(n) * q.ln())
    };

    let grad = gradient(nll, &[0.1, 0.2]);
    assert_relative_eq!(grad[0], 0.0, epsilon = 1e-10);
    assert_relative_eq!(grad[1], 0.0, epsilon = 1e-10);

    let grad = gradient(nll, &[0.2, 0.2]);
    assert_relative_eq!(grad[0], -10.0 / 0.2 + 70.0 / 0.6, epsilon = 1e-10);
    assert_relative_eq!(grad[1], -20.0 / 0.2 + 70.0 / 0.6, epsilon = 1e-10);
}

#[test]
fn test_scalar_conversions() {
    let d = Dual64::new(1.5, 2.0);
    assert_eq!(f64::from_dual(d), 1.5);
    assert_eq!(1.5f64.to_dual(), Dual64::from(1.5));
    assert_eq!(d.to_dual(), d);
}

#[test]
fn test_models_see_both_scalar_types() {
    struct Square;

    impl Model for Square {
        fn eval<S: Scalar>(&self, params: &[S]) -> Vec<S> {
            vec![params[0] * params[0], params[0].powi(3)]
        }
    }

    assert_eq!(Square.eval_f64(&[2.0]).to_vec(), vec![4.0, 8.0]);
    let duals = Square.eval(&[Dual64::new(2.0, 1.0)]);
    assert_eq!(duals[0].eps, 4.0);
    assert_eq!(duals[1].eps, 12.0);
}
