//! Minimization of scalar objectives.
//!
//! This module provides the optimizer every estimator delegates to:
//!
//! - the [`Objective`] trait (a scalar function of the parameter vector,
//!   with an optional gradient)
//! - [`minimize`], which runs an argmin solver from an initial guess and
//!   normalises the outcome into a [`FitResult`]
//! - [`Method`] and [`FitOptions`] to pick and tune the solver
//!
//! A run that ends without convergence (iteration limit, timeout, a simplex
//! that keeps improving after every restart) is not an error: it comes back
//! as a `FitResult` with `success == false` and the solver's diagnostics.
//! Only solver failures (line search errors, errors raised by the objective)
//! are returned as `Err`.

mod adapter;
mod config;
mod result;

pub use config::{FitOptions, Method};
pub use result::FitResult;

use argmin::core::{Executor, IterState, State, TerminationReason, TerminationStatus};
use argmin::solver::linesearch::MoreThuenteLineSearch;
use argmin::solver::neldermead::NelderMead;
use argmin::solver::quasinewton::LBFGS;
use log::{debug, warn};
use ndarray::Array1;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::error::{MleError, Result};
use crate::utils::finite_difference;
use adapter::ArgminProblem;

/// A scalar function of the parameter vector to be minimized.
pub trait Objective {
    /// Evaluate the objective at `params`.
    ///
    /// Values outside the model's support (NaN, ±inf) are returned as they
    /// are; callers decide how to treat them.
    fn evaluate(&self, params: &Array1<f64>) -> Result<f64>;

    /// Gradient of the objective at `params`.
    ///
    /// The default uses central finite differences; objectives with exact
    /// derivatives override it.
    fn gradient(&self, params: &Array1<f64>) -> Result<Array1<f64>> {
        finite_difference::gradient(|p| self.evaluate(p), params)
    }
}

/// Minimize `objective` starting from `x0`.
///
/// # Arguments
///
/// * `objective` - The function to minimize
/// * `x0` - Initial guess; its length fixes the number of parameters
/// * `method` - The solver to use
/// * `options` - Solver settings
///
/// # Returns
///
/// * The best point found with its diagnostics, or an error if the options
///   are invalid or the solver failed
pub fn minimize<O: Objective + ?Sized>(
    objective: &O,
    x0: &Array1<f64>,
    method: Method,
    options: &FitOptions,
) -> Result<FitResult> {
    if x0.is_empty() {
        return Err(MleError::InvalidInput("Initial guess is empty".to_string()));
    }
    if x0.iter().any(|v| !v.is_finite()) {
        return Err(MleError::InvalidInput(format!(
            "Initial guess must be finite, got {}",
            x0
        )));
    }
    options.validate()?;

    let max_iters = options.max_iters_for(method, x0.len());
    debug!(
        "Starting {} minimization of {} parameters from {} (max {} iterations)",
        method,
        x0.len(),
        x0,
        max_iters
    );

    let result = match method {
        Method::NelderMead => run_nelder_mead(objective, x0, options, max_iters)?,
        Method::Lbfgs => run_lbfgs(objective, x0, options, max_iters)?,
    };

    if result.success {
        debug!(
            "{} converged after {} iterations: objective {:.6e} at {}",
            method, result.iterations, result.objective, result.params
        );
    } else {
        warn!(
            "{} did not converge after {} iterations ({}); objective {:.6e}",
            method, result.iterations, result.message, result.objective
        );
    }

    Ok(result)
}

/// Initial simplex: `x0` plus one vertex per coordinate, perturbed by a
/// relative `nonzero_delta`, or set to `zero_delta` where the coordinate is 0.
fn initial_simplex(x0: &Array1<f64>, options: &FitOptions) -> Vec<Vec<f64>> {
    let base = x0.to_vec();
    let mut simplex = vec![base.clone()];
    for i in 0..base.len() {
        let mut vertex = base.clone();
        if vertex[i] != 0.0 {
            vertex[i] *= 1.0 + options.nonzero_delta;
        } else {
            vertex[i] = options.zero_delta;
        }
        simplex.push(vertex);
    }
    simplex
}

/// Nelder-Mead with restarts.
///
/// A simplex can stop on equal costs without surrounding the minimum, for
/// example on a piecewise-linear loss where two vertices straddle a kink.
/// Each converged run is therefore restarted from its best point with a
/// fresh simplex, and the fit only counts as converged once a restart no
/// longer lowers the cost.
fn run_nelder_mead<O: Objective + ?Sized>(
    objective: &O,
    x0: &Array1<f64>,
    options: &FitOptions,
    max_iters: u64,
) -> Result<FitResult> {
    let started = Instant::now();
    let mut start = x0.clone();
    let mut last: Option<FitResult> = None;
    let mut timed_out = false;
    let mut iterations = 0;
    let mut func_evals = 0;

    for restart in 0..=options.max_restarts {
        let timeout = options.timeout.map(|limit| limit.saturating_sub(started.elapsed()));
        if last.is_some() && timeout.map_or(false, |left| left.is_zero()) {
            timed_out = true;
            break;
        }

        let mut run = nelder_mead_once(objective, &start, options, max_iters, timeout)?;
        iterations += run.iterations;
        func_evals += run.func_evals;
        run.iterations = iterations;
        run.func_evals = func_evals;

        if !run.success {
            return Ok(run);
        }
        let settled = match last.as_ref() {
            Some(prev) => {
                let tol = options.sd_tolerance * (1.0 + prev.objective.abs());
                prev.objective - run.objective <= tol
            }
            None => options.max_restarts == 0,
        };
        if settled {
            return Ok(run);
        }

        debug!(
            "Nelder-Mead restart {} from {} (objective {:.6e})",
            restart + 1,
            run.params,
            run.objective
        );
        start = run.params.clone();
        last = Some(run);
    }

    let mut fit = last.ok_or_else(|| {
        MleError::OptimizationFailure("Nelder-Mead finished without a result".to_string())
    })?;
    fit.success = false;
    fit.message = if timed_out {
        format!("{:?}", TerminationReason::Timeout)
    } else {
        format!("Cost still decreasing after {} restarts", options.max_restarts)
    };
    Ok(fit)
}

fn nelder_mead_once<O: Objective + ?Sized>(
    objective: &O,
    start: &Array1<f64>,
    options: &FitOptions,
    max_iters: u64,
    timeout: Option<Duration>,
) -> Result<FitResult> {
    let simplex = initial_simplex(start, options);

    // argmin unwraps the costs of the initial vertices; report errors here.
    for vertex in &simplex {
        objective.evaluate(&Array1::from_vec(vertex.clone()))?;
    }
    let checked = simplex.len() as u64;

    let solver = NelderMead::new(simplex).with_sd_tolerance(options.sd_tolerance)?;
    let mut executor = Executor::new(ArgminProblem::new(objective), solver)
        .configure(|state: IterState<Vec<f64>, (), (), (), (), f64>| state.max_iters(max_iters));
    if let Some(timeout) = timeout {
        executor = executor.timeout(timeout);
    }

    let result = executor.run()?;
    let state = result.state();
    let mut fit = finish(
        Method::NelderMead,
        state.get_best_param(),
        state.get_best_cost(),
        state.get_iter(),
        state.get_termination_status(),
        state.get_func_counts(),
    )?;
    fit.func_evals += checked;
    Ok(fit)
}

fn run_lbfgs<O: Objective + ?Sized>(
    objective: &O,
    x0: &Array1<f64>,
    options: &FitOptions,
    max_iters: u64,
) -> Result<FitResult> {
    let linesearch = MoreThuenteLineSearch::new();
    let solver = LBFGS::new(linesearch, options.lbfgs_memory)
        .with_tolerance_grad(options.tol_grad)?
        .with_tolerance_cost(options.tol_cost)?;

    let init = x0.to_vec();
    let mut executor = Executor::new(ArgminProblem::new(objective), solver).configure(
        |state: IterState<Vec<f64>, Vec<f64>, (), (), (), f64>| {
            state.param(init).max_iters(max_iters)
        },
    );
    if let Some(timeout) = options.timeout {
        executor = executor.timeout(timeout);
    }

    let result = executor.run()?;
    let state = result.state();
    finish(
        Method::Lbfgs,
        state.get_best_param(),
        state.get_best_cost(),
        state.get_iter(),
        state.get_termination_status(),
        state.get_func_counts(),
    )
}

fn finish(
    method: Method,
    best_param: Option<&Vec<f64>>,
    best_cost: f64,
    iterations: u64,
    status: &TerminationStatus,
    func_counts: &HashMap<String, u64>,
) -> Result<FitResult> {
    let params = best_param
        .cloned()
        .map(Array1::from_vec)
        .ok_or_else(|| {
            MleError::OptimizationFailure(format!("{}: no best parameter found", method))
        })?;

    let converged = matches!(
        status,
        TerminationStatus::Terminated(TerminationReason::SolverConverged)
            | TerminationStatus::Terminated(TerminationReason::TargetCostReached)
    );
    let message = match status {
        TerminationStatus::NotTerminated => "Not terminated".to_string(),
        TerminationStatus::Terminated(reason) => format!("{:?}", reason),
    };

    Ok(FitResult {
        params,
        objective: best_cost,
        success: converged && best_cost.is_finite(),
        message,
        iterations,
        func_evals: func_counts.get("cost_count").copied().unwrap_or(0),
        method,
    })
}
