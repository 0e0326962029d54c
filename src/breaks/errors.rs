//! Errors for the structural-break engine (options, partition search,
//! breakpoint validation, and segment refits).
//!
//! [`BreakError`] is the error of everything under `breaks`: option
//! validation, infeasible `(L, k)` combinations, malformed breakpoint lists,
//! and failures bubbling up from the series and regression layers. Wrapped
//! errors keep their own type so callers can match on the original cause.
//!
//! ## Conventions
//! - Breakpoint positions are **0-based row offsets**; `0` and `T` are the
//!   outer boundaries of every list.
//! - `InfeasibleConfiguration` carries the numbers that made the search
//!   impossible so the message is actionable without a debugger.
use crate::{inference::errors::InferenceError, series::errors::SeriesError};

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for break-search operations.
pub type BreakResult<T> = Result<T, BreakError>;

#[derive(Debug, Clone, PartialEq)]
pub enum BreakError {
    // ---- Configuration ----
    /// No partition with `n_breaks + 1` segments of at least `min_size`
    /// rows fits into `n_obs` rows, or a diagnostic denominator df would be
    /// non-positive.
    InfeasibleConfiguration {
        n_obs: usize,
        min_size: usize,
        n_breaks: usize,
        reason: &'static str,
    },

    /// An option value is out of range, or conflicts with the defaults flag.
    InvalidOptions { field: &'static str, reason: &'static str },

    // ---- Breakpoints ----
    /// A breakpoint list violates `0 = b₀ < … < b_{k+1} = T` or a gap is
    /// shorter than the minimum segment size.
    InvalidBreakpoints { index: usize, reason: &'static str },

    /// A partition or segment cost evaluated to NaN/inf.
    NonFiniteCost { start: usize, end: usize, value: f64 },

    // ---- Wrapped ----
    Series(SeriesError),
    Inference(InferenceError),
}

impl std::error::Error for BreakError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BreakError::Series(err) => Some(err),
            BreakError::Inference(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for BreakError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration ----
            BreakError::InfeasibleConfiguration { n_obs, min_size, n_breaks, reason } => write!(
                f,
                "Infeasible break configuration (T = {n_obs}, min size = {min_size}, \
                 breaks = {n_breaks}): {reason}"
            ),
            BreakError::InvalidOptions { field, reason } => {
                write!(f, "Invalid break-search option '{field}': {reason}")
            }

            // ---- Breakpoints ----
            BreakError::InvalidBreakpoints { index, reason } => {
                write!(f, "Invalid breakpoints at position {index}: {reason}")
            }
            BreakError::NonFiniteCost { start, end, value } => {
                write!(f, "Segment cost on rows [{start}, {end}) is non-finite: {value}")
            }

            // ---- Wrapped ----
            BreakError::Series(err) => write!(f, "{err}"),
            BreakError::Inference(err) => write!(f, "{err}"),
        }
    }
}

impl From<SeriesError> for BreakError {
    fn from(err: SeriesError) -> BreakError {
        BreakError::Series(err)
    }
}

impl From<InferenceError> for BreakError {
    fn from(err: InferenceError) -> BreakError {
        BreakError::Inference(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<BreakError> for PyErr {
    fn from(err: BreakError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    // Purpose
    // -------
    // A regression-size failure in a segment refit keeps its original type
    // and is reachable through `source()`.
    fn inference_errors_are_wrapped_with_source() {
        let inner = InferenceError::RegressionSize { n_obs: 1, n_regressors: 2 };

        let err = BreakError::from(inner.clone());

        assert_eq!(err, BreakError::Inference(inner));
        assert!(err.source().is_some());
    }

    #[test]
    fn infeasible_message_names_the_numbers() {
        let err = BreakError::InfeasibleConfiguration {
            n_obs: 20,
            min_size: 5,
            n_breaks: 4,
            reason: "(k+1)·L exceeds T",
        };

        let msg = err.to_string();

        assert!(msg.contains("T = 20") && msg.contains("min size = 5"));
        assert!(msg.contains("breaks = 4"));
    }
}
