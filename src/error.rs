// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the dynamics core.
//!
//! Two families matter to callers: [`Error::Configuration`] for invalid
//! construction parameters (never retried) and [`Error::Numerical`] for
//! quadrature or eigensolver failures, which carry the tolerance and
//! iteration budget that was attempted so the caller can retry with
//! relaxed settings.

use thiserror::Error;

/// Result type alias for dynamics operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid construction parameters.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// Numerical failure during quadrature or eigendecomposition.
    #[error("Numerical error: {0}")]
    Numerical(#[from] NumericalError),
    /// IO error while reading configuration.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Configuration file could not be parsed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Shorthand for a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    /// Whether this error is a numerical failure the caller may retry.
    pub fn is_numerical(&self) -> bool {
        matches!(self, Error::Numerical(_))
    }
}

/// Numerical failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumericalError {
    /// Adaptive quadrature exhausted its subdivision budget.
    #[error(
        "quadrature on [{lower}, {upper}] did not converge after {subdivisions} subdivisions: \
         estimate {estimate:.6e} ± {error:.3e} (abs_tol {abs_tol:.1e}, rel_tol {rel_tol:.1e})"
    )]
    QuadratureDiverged {
        lower: f64,
        upper: f64,
        estimate: f64,
        error: f64,
        abs_tol: f64,
        rel_tol: f64,
        subdivisions: usize,
    },
    /// The integrand returned NaN or ±∞.
    #[error("integrand is not finite at x = {at}")]
    NonFiniteIntegrand { at: f64 },
    /// The spectrum cannot be resolved at the principal-value pole.
    #[error("principal value integral is singular at ω = {pole}: spectrum value {value}")]
    SingularPrincipalValue { pole: f64, value: f64 },
    /// A matrix handed to the eigensolver contains NaN or ±∞.
    #[error("matrix contains non-finite entries")]
    NonFiniteMatrix,
    /// A matrix handed to the eigensolver is not Hermitian.
    #[error("matrix is not Hermitian: max deviation {deviation:.3e} exceeds {tolerance:.1e}")]
    NotHermitian { deviation: f64, tolerance: f64 },
    /// The eigensolver did not converge.
    #[error("eigendecomposition did not converge within {max_iterations} iterations (eps {tolerance:.1e})")]
    EigenNotConverged { tolerance: f64, max_iterations: usize },
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
