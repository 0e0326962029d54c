//! Errors for the labor-market economics layer.
//!
//! [`EconError`] covers domain violations of the closed-form formulas
//! (each carrying the quantity name, the period, and the offending value),
//! root-finding failures tagged with the period that failed, and shape
//! mismatches between the per-period inputs.
use crate::{optimization::errors::OptError, series::errors::SeriesError};
use chrono::NaiveDate;

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type EconResult<T> = Result<T, EconError>;

#[derive(Debug, Clone, PartialEq)]
pub enum EconError {
    // ---- Inputs ----
    /// A quantity is outside the domain of the formula at `index`.
    Domain { quantity: &'static str, index: usize, value: f64, reason: &'static str },

    /// A scalar parameter is out of range.
    InvalidParameter { name: &'static str, value: f64, reason: &'static str },

    /// Per-period inputs disagree in length (length-1 inputs broadcast).
    LengthMismatch { quantity: &'static str, expected: usize, actual: usize },

    /// Two level series are not observed on the same dates.
    DateMismatch { index: usize, left: NaiveDate, right: NaiveDate },

    // ---- Solver ----
    /// The per-period root finder failed.
    NonConvergence { period: usize, source: OptError },

    // ---- Wrapped ----
    Series(SeriesError),
}

impl std::error::Error for EconError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EconError::NonConvergence { source, .. } => Some(source),
            EconError::Series(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for EconError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Inputs ----
            EconError::Domain { quantity, index, value, reason } => {
                write!(f, "Domain error: {quantity} = {value} at index {index} ({reason})")
            }
            EconError::InvalidParameter { name, value, reason } => {
                write!(f, "Invalid parameter {name} = {value}: {reason}")
            }
            EconError::LengthMismatch { quantity, expected, actual } => write!(
                f,
                "Length mismatch for {quantity}: expected 1 or {expected} values, found {actual}"
            ),
            EconError::DateMismatch { index, left, right } => {
                write!(f, "Series dates differ at index {index}: {left} vs {right}")
            }

            // ---- Solver ----
            EconError::NonConvergence { period, source } => {
                write!(f, "Root finding failed in period {period}: {source}")
            }

            // ---- Wrapped ----
            EconError::Series(err) => write!(f, "{err}"),
        }
    }
}

impl From<SeriesError> for EconError {
    fn from(err: SeriesError) -> EconError {
        EconError::Series(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<EconError> for PyErr {
    fn from(err: EconError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn domain_message_names_quantity_and_period() {
        let err = EconError::Domain {
            quantity: "u",
            index: 3,
            value: 1.5,
            reason: "must lie in (0, 1)",
        };

        let msg = err.to_string();

        assert!(msg.contains("u = 1.5") && msg.contains("index 3"));
    }

    #[test]
    // Purpose
    // -------
    // The period tag is added without losing the solver error.
    fn non_convergence_keeps_solver_error_as_source() {
        let err = EconError::NonConvergence {
            period: 7,
            source: OptError::BracketNotFound { initial_guess: 0.0, expansions: 50 },
        };

        assert!(err.to_string().contains("period 7"));
        assert!(err.source().is_some());
    }
}
