//! Utility functions and helpers for the mle-rs library.

pub mod finite_difference;
pub mod matrix_convert;

pub use matrix_convert::{
    calculate_correlation, invert_symmetric, nalgebra_to_ndarray, ndarray_to_nalgebra,
    standard_errors_from_covariance,
};
