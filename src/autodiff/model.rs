//! User model functions and their exact partial derivatives.
//!
//! A model maps a parameter vector to a vector of outputs (category
//! probabilities, expected counts, predictions). Parameters are passed
//! positionally, one slot per parameter, and derivatives are taken with
//! respect to one slot at a time.

use ndarray::{Array1, Array2};
use num_dual::{Dual64, DualNum};

use crate::error::{MleError, Result};

/// Number types a [`Model`] is evaluated in: `f64` for plain values and
/// [`Dual64`] for values carrying a derivative.
///
/// All arithmetic and elementary functions come from [`DualNum`]; this trait
/// only adds the conversions [`FnModel`] needs to move between the two.
pub trait Scalar: DualNum<f64> + Copy {
    /// Lift into a dual number; a plain `f64` becomes a constant.
    fn to_dual(self) -> Dual64;

    /// Project a dual number back; `f64` keeps only the real part.
    fn from_dual(d: Dual64) -> Self;
}

impl Scalar for f64 {
    fn to_dual(self) -> Dual64 {
        Dual64::from(self)
    }

    fn from_dual(d: Dual64) -> Self {
        d.re
    }
}

impl Scalar for Dual64 {
    fn to_dual(self) -> Dual64 {
        self
    }

    fn from_dual(d: Dual64) -> Self {
        d
    }
}

/// A vector-valued function of the parameters, differentiable by [`partial`].
///
/// Implementations must be built from [`Scalar`] operations only; anything
/// computed through `re()` is a constant as far as derivatives go.
pub trait Model {
    /// Evaluate the model at `params`.
    fn eval<S: Scalar>(&self, params: &[S]) -> Vec<S>;

    /// Evaluate the model in plain `f64` arithmetic.
    fn eval_f64(&self, params: &[f64]) -> Array1<f64> {
        Array1::from_vec(self.eval::<f64>(params))
    }
}

impl<M: Model + ?Sized> Model for &M {
    fn eval<S: Scalar>(&self, params: &[S]) -> Vec<S> {
        (**self).eval(params)
    }
}

/// Adapter turning a closure over dual numbers into a [`Model`].
///
/// Plain evaluation lifts the parameters into constants, so the closure is
/// the single definition of the model.
#[derive(Clone)]
pub struct FnModel<F> {
    f: F,
}

impl<F> FnModel<F>
where
    F: Fn(&[Dual64]) -> Vec<Dual64>,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Model for FnModel<F>
where
    F: Fn(&[Dual64]) -> Vec<Dual64>,
{
    fn eval<S: Scalar>(&self, params: &[S]) -> Vec<S> {
        let lifted: Vec<Dual64> = params.iter().map(|p| p.to_dual()).collect();
        (self.f)(&lifted).into_iter().map(S::from_dual).collect()
    }
}

impl<F> std::fmt::Debug for FnModel<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnModel")
    }
}

/// Wrap a closure as a [`Model`].
///
/// ```
/// use mle_rs::autodiff::{model_fn, Dual64, Model};
///
/// let bernoulli = model_fn(|p: &[Dual64]| vec![p[0], Dual64::from(1.0) - p[0]]);
/// assert_eq!(bernoulli.eval_f64(&[0.25]).to_vec(), vec![0.25, 0.75]);
/// ```
pub fn model_fn<F>(f: F) -> FnModel<F>
where
    F: Fn(&[Dual64]) -> Vec<Dual64>,
{
    FnModel::new(f)
}

/// The partial derivative of a model with respect to one parameter slot.
///
/// Returned by [`partial`]; evaluating it at a point gives the vector
/// `∂model/∂params[argnum]`, one entry per model output.
#[derive(Debug, Clone, Copy)]
pub struct Partial<'a, M: ?Sized> {
    model: &'a M,
    argnum: usize,
}

impl<'a, M: Model + ?Sized> Partial<'a, M> {
    /// The parameter slot this derivative is taken with respect to.
    pub fn argnum(&self) -> usize {
        self.argnum
    }

    /// Evaluate the partial derivative at `params`.
    pub fn at(&self, params: &[f64]) -> Result<Array1<f64>> {
        if self.argnum >= params.len() {
            return Err(MleError::InvalidInput(format!(
                "Cannot differentiate with respect to argument {} of a {}-parameter model",
                self.argnum,
                params.len()
            )));
        }

        let seeded: Vec<Dual64> = params
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                if i == self.argnum {
                    Dual64::new(p, 1.0)
                } else {
                    Dual64::from(p)
                }
            })
            .collect();

        Ok(self.model.eval(&seeded).iter().map(|d| d.eps).collect())
    }
}

/// Build the derivative function of `model` with respect to argument `argnum`.
pub fn partial<M: Model + ?Sized>(model: &M, argnum: usize) -> Partial<'_, M> {
    Partial { model, argnum }
}

/// Compute the full Jacobian `J[k, i] = ∂model_k/∂params[i]` at `params`.
pub fn jacobian<M: Model + ?Sized>(model: &M, params: &[f64]) -> Result<Array2<f64>> {
    let columns = (0..params.len())
        .map(|i| partial(model, i).at(params))
        .collect::<Result<Vec<_>>>()?;

    let n_outputs = columns.first().map_or(0, |c| c.len());
    let mut jac = Array2::zeros((n_outputs, params.len()));
    for (i, column) in columns.iter().enumerate() {
        if column.len() != n_outputs {
            return Err(MleError::DimensionMismatch(format!(
                "Model returned {} outputs for argument {} but {} for argument 0",
                column.len(),
                i,
                n_outputs
            )));
        }
        jac.column_mut(i).assign(column);
    }

    Ok(jac)
}
