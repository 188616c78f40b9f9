use thiserror::Error;

/// Error types for the mle-rs library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MleError {
    /// A fitted quantity was requested before `fit` was called.
    #[error("Likelihood has not been fit yet")]
    NotFitted,

    /// The stored fit did not converge, so fitted quantities are not trusted.
    #[error("Last fit was unsuccessful: {0}")]
    UnsuccessfulFit(String),

    /// Error indicating optimization failed.
    #[error("Optimization failed: {0}")]
    OptimizationFailure(String),

    /// Error indicating a singular matrix was encountered.
    #[error("Singular matrix encountered: {0}")]
    SingularMatrix(String),

    /// A value fell outside the domain of `log`, division or `sqrt`.
    #[error("Domain error: {0}")]
    DomainError(String),

    /// Error indicating a mismatch in array dimensions.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Invalid input data or configuration.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl MleError {
    /// Whether this error means a fitted quantity was requested without a usable fit.
    pub fn is_precondition(&self) -> bool {
        matches!(self, MleError::NotFitted | MleError::UnsuccessfulFit(_))
    }
}

impl From<argmin::core::Error> for MleError {
    fn from(err: argmin::core::Error) -> Self {
        // Errors raised by our own objective travel through argmin unchanged.
        match err.downcast::<MleError>() {
            Ok(inner) => inner,
            Err(other) => MleError::OptimizationFailure(other.to_string()),
        }
    }
}

/// Result type alias for mle-rs operations.
pub type Result<T> = std::result::Result<T, MleError>;
