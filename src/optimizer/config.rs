//! Configuration options for the optimizer.
//!
//! This module defines the minimization method and the solver settings
//! (iteration limits, tolerances, initial simplex shape) passed through to
//! the argmin backend.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{MleError, Result};

/// Minimization algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Method {
    /// Derivative-free downhill simplex.
    #[default]
    NelderMead,

    /// Limited-memory BFGS with More-Thuente line search; uses the objective gradient.
    Lbfgs,
}

impl FromStr for Method {
    type Err = MleError;

    /// Parse a method name, ignoring case and `-`/`_` separators
    /// (`"Nelder-Mead"`, `"neldermead"`, `"L-BFGS"`, `"lbfgs"`).
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_' && !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "neldermead" | "simplex" => Ok(Method::NelderMead),
            "lbfgs" => Ok(Method::Lbfgs),
            _ => Err(MleError::InvalidInput(format!(
                "Unknown optimization method '{}'; valid options are 'Nelder-Mead' and 'L-BFGS'",
                s
            ))),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::NelderMead => write!(f, "Nelder-Mead"),
            Method::Lbfgs => write!(f, "L-BFGS"),
        }
    }
}

/// Solver settings passed through to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    /// Maximum number of iterations. Default: `200 * n_params` for
    /// Nelder-Mead, 1000 for L-BFGS. For Nelder-Mead the limit applies to
    /// each simplex run, restarts included.
    pub max_iters: Option<u64>,

    /// Wall-clock limit for one fit. Default: none
    pub timeout: Option<Duration>,

    /// Nelder-Mead stops when the standard deviation of the simplex costs
    /// falls below this. Default: 1e-12
    pub sd_tolerance: f64,

    /// Nelder-Mead restarts from the best point after convergence. A fit is
    /// only reported as converged once a restart stops lowering the cost by
    /// more than `sd_tolerance` (relative to the cost). 0 accepts the first
    /// converged simplex. Default: 20
    pub max_restarts: u32,

    /// L-BFGS gradient norm tolerance. Default: 1e-8
    pub tol_grad: f64,

    /// L-BFGS relative cost change tolerance. Default: 1e-12
    pub tol_cost: f64,

    /// L-BFGS history size. Default: 7
    pub lbfgs_memory: usize,

    /// Relative perturbation of non-zero coordinates for the initial simplex. Default: 0.05
    pub nonzero_delta: f64,

    /// Value given to zero coordinates for the initial simplex. Default: 0.00025
    pub zero_delta: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iters: None,
            timeout: None,
            sd_tolerance: 1e-12,
            max_restarts: 20,
            tol_grad: 1e-8,
            tol_cost: 1e-12,
            lbfgs_memory: 7,
            nonzero_delta: 0.05,
            zero_delta: 0.00025,
        }
    }
}

impl FitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iters(mut self, max_iters: u64) -> Self {
        self.max_iters = Some(max_iters);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_sd_tolerance(mut self, sd_tolerance: f64) -> Self {
        self.sd_tolerance = sd_tolerance;
        self
    }

    pub fn with_max_restarts(mut self, max_restarts: u32) -> Self {
        self.max_restarts = max_restarts;
        self
    }

    pub fn with_tol_grad(mut self, tol_grad: f64) -> Self {
        self.tol_grad = tol_grad;
        self
    }

    pub fn with_tol_cost(mut self, tol_cost: f64) -> Self {
        self.tol_cost = tol_cost;
        self
    }

    pub fn with_lbfgs_memory(mut self, lbfgs_memory: usize) -> Self {
        self.lbfgs_memory = lbfgs_memory;
        self
    }

    /// Iteration limit for a problem with `n_params` parameters.
    pub fn max_iters_for(&self, method: Method, n_params: usize) -> u64 {
        self.max_iters.unwrap_or(match method {
            Method::NelderMead => 200 * n_params.max(1) as u64,
            Method::Lbfgs => 1000,
        })
    }

    /// Check that every setting is usable.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("sd_tolerance", self.sd_tolerance),
            ("tol_grad", self.tol_grad),
            ("tol_cost", self.tol_cost),
            ("nonzero_delta", self.nonzero_delta),
            ("zero_delta", self.zero_delta),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(MleError::InvalidInput(format!(
                    "{} must be finite and positive, got {}",
                    name, value
                )));
            }
        }
        if self.max_iters == Some(0) {
            return Err(MleError::InvalidInput(
                "max_iters must be greater than zero".to_string(),
            ));
        }
        if self.lbfgs_memory == 0 {
            return Err(MleError::InvalidInput(
                "lbfgs_memory must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
