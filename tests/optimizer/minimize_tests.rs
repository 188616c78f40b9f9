//! Integration tests for minimize

use approx::assert_relative_eq;
use mle_rs::{minimize, FitOptions, Method, MleError, Objective, Result};
use ndarray::{array, Array1};
use std::time::Duration;

/// Rosenbrock function with minimum 0 at (1, 1)
struct Rosenbrock;

impl Objective for Rosenbrock {
    fn evaluate(&self, p: &Array1<f64>) -> Result<f64> {
        Ok((1.0 - p[0]).powi(2) + 100.0 * (p[1] - p[0] * p[0]).powi(2))
    }

    fn gradient(&self, p: &Array1<f64>) -> Result<Array1<f64>> {
        Ok(array![
            -2.0 * (1.0 - p[0]) - 400.0 * p[0] * (p[1] - p[0] * p[0]),
            200.0 * (p[1] - p[0] * p[0])
        ])
    }
}

/// Objective that rejects every point
struct Failing;

impl Objective for Failing {
    fn evaluate(&self, _: &Array1<f64>) -> Result<f64> {
        Err(MleError::DomainError("model undefined".to_string()))
    }
}

#[test]
fn test_rosenbrock_lbfgs() {
    let result = minimize(&Rosenbrock, &array![-1.2, 1.0], Method::Lbfgs, &FitOptions::default())
        .unwrap();
    assert!(result.success, "{}", result);
    assert_relative_eq!(result.params[0], 1.0, epsilon = 1e-4);
    assert_relative_eq!(result.params[1], 1.0, epsilon = 1e-4);
    assert!(result.objective < 1e-8);
}

#[test]
fn test_rosenbrock_nelder_mead() {
    let options = FitOptions::default().with_max_iters(2000);
    let result = minimize(&Rosenbrock, &array![-1.2, 1.0], Method::NelderMead, &options).unwrap();
    assert!(result.success, "{}", result);
    assert_relative_eq!(result.params[0], 1.0, epsilon = 1e-3);
    assert_relative_eq!(result.params[1], 1.0, epsilon = 1e-3);
    assert!(result.func_evals > result.iterations);
}

#[test]
fn test_method_names() {
    for (name, method) in [
        ("Nelder-Mead", Method::NelderMead),
        ("nelder_mead", Method::NelderMead),
        ("L-BFGS", Method::Lbfgs),
    ] {
        assert_eq!(name.parse::<Method>().unwrap(), method);
    }
    assert_eq!(Method::default(), Method::NelderMead);
}

#[test]
fn test_objective_errors_propagate() {
    let err = minimize(&Failing, &array![1.0], Method::NelderMead, &FitOptions::default())
        .unwrap_err();
    assert!(matches!(err, MleError::DomainError(_)), "{:?}", err);
}

#[test]
fn test_generous_timeout_does_not_interfere() {
    let options = FitOptions::default().with_timeout(Duration::from_secs(60));
    let result = minimize(&Rosenbrock, &array![0.0, 0.0], Method::Lbfgs, &options).unwrap();
    assert!(result.success, "{}", result);
}

#[test]
fn test_options_serialize() {
    let options = FitOptions::default()
        .with_max_iters(50)
        .with_timeout(Duration::from_millis(250));
    let json = serde_json::to_string(&options).unwrap();
    let back: FitOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(back, options);
}
