//! Integration tests for partial derivatives of models

use approx::assert_relative_eq;
use mle_rs::autodiff::{jacobian, model_fn, partial, Dual64, Model};
use mle_rs::MleError;

use crate::test_helpers::{ExponentialDecay, Softmax3};

#[test]
fn test_partials_of_exponential_decay() {
    let model = ExponentialDecay::new(5, 4.0);
    let params = [50.0, 0.3];

    let d_amplitude = partial(&model, 0);
    let d_rate = partial(&model, 1);
    assert_eq!(d_amplitude.argnum(), 0);
    assert_eq!(d_rate.argnum(), 1);

    let da = d_amplitude.at(&params).unwrap();
    let dr = d_rate.at(&params).unwrap();
    for (k, &t) in model.t.iter().enumerate() {
        let decay = (-0.3 * t).exp();
        assert_relative_eq!(da[k], decay, epsilon = 1e-12);
        assert_relative_eq!(dr[k], -50.0 * t * decay, epsilon = 1e-10);
    }
}

#[test]
fn test_jacobian_columns_match_partials() {
    let model = ExponentialDecay::new(4, 3.0);
    let params = [10.0, 0.8];
    let jac = jacobian(&model, &params).unwrap();
    assert_eq!(jac.shape(), &[4, 2]);

    for i in 0..2 {
        let column = partial(&model, i).at(&params).unwrap();
        assert_eq!(jac.column(i), column);
    }
}

#[test]
fn test_softmax_partials_sum_to_zero() {
    // Probabilities sum to one, so every partial derivative sums to zero.
    let params = [0.4, -1.2];
    for i in 0..2 {
        let d = partial(&Softmax3, i).at(&params).unwrap();
        assert_relative_eq!(d.sum(), 0.0, epsilon = 1e-14);
    }
    assert_relative_eq!(Softmax3.eval_f64(&params).sum(), 1.0, epsilon = 1e-14);
}

#[test]
fn test_closure_model_with_captured_data() {
    let x = vec![1.0, 2.0, 3.0];
    let model = model_fn(move |p: &[Dual64]| x.iter().map(|&x| p[0] * x + p[1]).collect());

    let jac = jacobian(&model, &[2.0, 1.0]).unwrap();
    assert_eq!(jac.column(0).to_vec(), vec![1.0, 2.0, 3.0]);
    assert_eq!(jac.column(1).to_vec(), vec![1.0, 1.0, 1.0]);
    assert_eq!(model.eval_f64(&[2.0, 1.0]).to_vec(), vec![3.0, 5.0, 7.0]);
}

#[test]
fn test_out_of_range_argument() {
    let err = partial(&Softmax3, 2).at(&[0.0, 0.0]).unwrap_err();
    assert!(matches!(err, MleError::InvalidInput(_)));
}
