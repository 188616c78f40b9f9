//! Outcome of one minimization.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::config::Method;

/// Result of a `fit` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    /// The best parameters found
    pub params: Array1<f64>,

    /// Objective value at `params`
    pub objective: f64,

    /// Whether the solver reported convergence at a finite objective value
    pub success: bool,

    /// Termination status reported by the solver
    pub message: String,

    /// The number of iterations performed
    pub iterations: u64,

    /// The number of objective evaluations
    pub func_evals: u64,

    /// Algorithm that produced this result
    pub method: Method,
}

impl fmt::Display for FitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Fit Result ({}):", self.method)?;
        writeln!(f, "  Success: {}", self.success)?;
        writeln!(f, "  Objective: {:.6e}", self.objective)?;
        writeln!(f, "  Iterations: {}", self.iterations)?;
        writeln!(f, "  Function evaluations: {}", self.func_evals)?;
        writeln!(f, "  Message: {}", self.message)?;
        writeln!(f, "  Parameters: {}", self.params)?;
        Ok(())
    }
}
