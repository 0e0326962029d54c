//! Errors for scalar root finding.
//!
//! `OptError` covers option validation, bracket search, non-finite
//! evaluations, and non-convergence of the Brent solve, plus a mapping of
//! every `argmin` error kind so solver failures keep their category.

use argmin::core::{ArgminError, Error};

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- RootOptions ----
    /// Tolerance needs to be positive and finite.
    InvalidTolerance {
        tol: f64,
        reason: &'static str,
    },
    /// Initial bracket step needs to be positive and finite.
    InvalidInitialStep {
        step: f64,
        reason: &'static str,
    },
    /// Bracket growth factor needs to exceed 1.
    InvalidGrowth {
        growth: f64,
        reason: &'static str,
    },
    /// Maximum iterations needs to be positive.
    InvalidMaxIter {
        max_iter: u64,
        reason: &'static str,
    },

    // ---- Bracketing ----
    /// The initial guess itself is not finite.
    InvalidInitialGuess {
        value: f64,
    },
    /// The equation evaluated to NaN/inf and no bracket could be formed.
    NonFiniteEvaluation {
        x: f64,
        value: f64,
    },
    /// No sign change was found around the initial guess.
    BracketNotFound {
        initial_guess: f64,
        expansions: usize,
    },

    // ---- Solver outcome ----
    /// The solver stopped without meeting its tolerance.
    NonConvergence {
        iterations: u64,
        status: String,
    },
    /// The solver finished without a parameter in its state.
    MissingRoot,

    // ---- Argmin ---
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter {
        text: String,
    },
    /// Wrapper for argmin::NotImplemented
    NotImplemented {
        text: String,
    },
    /// Wrapper for argmin::NotInitialized
    NotInitialized {
        text: String,
    },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated {
        text: String,
    },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound {
        text: String,
    },
    /// Wrapper for argmin::PotentialBug
    PotentialBug {
        text: String,
    },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError {
        text: String,
    },
    /// Wrapper for other argmin::Error types
    BackendError {
        text: String,
    },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- RootOptions ----
            OptError::InvalidTolerance { tol, reason } => {
                write!(f, "Invalid root tolerance {tol}: {reason}")
            }
            OptError::InvalidInitialStep { step, reason } => {
                write!(f, "Invalid initial bracket step {step}: {reason}")
            }
            OptError::InvalidGrowth { growth, reason } => {
                write!(f, "Invalid bracket growth factor {growth}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }

            // ---- Bracketing ----
            OptError::InvalidInitialGuess { value } => {
                write!(f, "Invalid initial guess {value}: must be finite")
            }
            OptError::NonFiniteEvaluation { x, value } => {
                write!(f, "Equation is non-finite ({value}) at x = {x}")
            }
            OptError::BracketNotFound { initial_guess, expansions } => write!(
                f,
                "No sign change found around {initial_guess} after {expansions} expansions"
            ),

            // ---- Solver outcome ----
            OptError::NonConvergence { iterations, status } => {
                write!(f, "Root finder did not converge after {iterations} iterations: {status}")
            }
            OptError::MissingRoot => write!(f, "Root finder returned no parameter"),

            // ---- Argmin ----
            OptError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            OptError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            OptError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            OptError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            OptError::CheckPointNotFound { text } => {
                write!(f, "Checkpoint not found: {text}")
            }
            OptError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            OptError::ImpossibleError { text } => {
                write!(f, "Impossible error: {text}")
            }
            OptError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Fallback ----
            OptError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        match original_err.downcast() {
            Ok(opt_err) => match opt_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<OptError> for PyErr {
    fn from(err: OptError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
