//! Bridge between an [`Objective`] and argmin's problem traits.
//!
//! argmin works on `Vec<f64>` parameters; objectives see `Array1<f64>`.
//! Non-finite objective values are reported to the solver as `+inf`, so the
//! simplex ordering never compares a NaN.

use argmin::core::{CostFunction, Error, Gradient};
use ndarray::Array1;

use super::Objective;
use crate::error::MleError;

pub(crate) struct ArgminProblem<'a, O: ?Sized> {
    objective: &'a O,
}

impl<'a, O: Objective + ?Sized> ArgminProblem<'a, O> {
    pub(crate) fn new(objective: &'a O) -> Self {
        Self { objective }
    }
}

impl<'a, O: Objective + ?Sized> CostFunction for ArgminProblem<'a, O> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, Error> {
        let value = self.objective.evaluate(&Array1::from_vec(param.clone()))?;
        Ok(if value.is_finite() { value } else { f64::INFINITY })
    }
}

impl<'a, O: Objective + ?Sized> Gradient for ArgminProblem<'a, O> {
    type Param = Vec<f64>;
    type Gradient = Vec<f64>;

    fn gradient(&self, param: &Self::Param) -> Result<Self::Gradient, Error> {
        let grad = self.objective.gradient(&Array1::from_vec(param.clone()))?;
        if grad.iter().any(|g| !g.is_finite()) {
            return Err(MleError::DomainError(format!(
                "Objective gradient is not finite at {:?}",
                param
            ))
            .into());
        }
        Ok(grad.to_vec())
    }
}
