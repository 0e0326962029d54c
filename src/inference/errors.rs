//! Unified error handling for regression and robust-inference routines.
//!
//! This module defines `InferenceError`, the error type used by segment OLS
//! fits, HAC score covariance, sandwich standard errors, and plug-in
//! bandwidth selection. The regression-size variant is the one the break
//! search surfaces when a segment is shorter than its regressor count. An
//! alias `InferenceResult<T>` standardizes the return type across
//! inference code.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Unified error type for inference routines.
///
/// Covers regression shape failures, degenerate designs, plug-in bandwidth
/// failures, and passthrough errors from the AR(1) fit (via `anyhow`).
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceError {
    // ---- Regression ----
    /// A regression has fewer observations than regressors.
    RegressionSize {
        n_obs: usize,
        n_regressors: usize,
    },

    /// A regression has exactly as many observations as regressors, so the
    /// residual variance has zero degrees of freedom.
    NoResidualDegreesOfFreedom {
        n_obs: usize,
        n_regressors: usize,
    },

    /// Two arrays that must agree in length or shape do not.
    DimensionMismatch {
        expected: usize,
        actual: usize,
    },

    /// The least-squares or pseudo-inverse solve failed.
    SingularDesign {
        reason: &'static str,
    },

    /// An estimated coefficient or standard error is NaN or infinite.
    NonFiniteEstimate {
        index: usize,
        value: f64,
    },

    // ---- HAC ----
    /// Score matrix has no rows.
    EmptyScores,

    // ---- Bandwidth selection ----
    /// Stationarity is violated in an AR(1) process.
    StationarityViolated {
        phi: f64,
    },

    /// Denominator is too close to zero in bandwidth calculation.
    DenominatorTooSmall {
        denominator: f64,
    },

    /// Order not supported for bandwidth calculation.
    OrderNotSupported {
        ord: usize,
    },

    // ---- Anyhow catchall ----
    Anyhow(String),
}

pub type InferenceResult<T> = Result<T, InferenceError>;

impl std::error::Error for InferenceError {}

impl From<anyhow::Error> for InferenceError {
    fn from(err: anyhow::Error) -> Self {
        InferenceError::Anyhow(err.to_string())
    }
}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Regression ----
            InferenceError::RegressionSize { n_obs, n_regressors } => write!(
                f,
                "Regression size error: {n_obs} observations for {n_regressors} regressors"
            ),
            InferenceError::NoResidualDegreesOfFreedom { n_obs, n_regressors } => write!(
                f,
                "Inference Error: no residual degrees of freedom ({n_obs} observations for \
                 {n_regressors} regressors)"
            ),
            InferenceError::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "Inference Error: dimension mismatch (expected {expected}, found {actual})"
                )
            }
            InferenceError::SingularDesign { reason } => {
                write!(f, "Inference Error: singular design ({reason})")
            }
            InferenceError::NonFiniteEstimate { index, value } => {
                write!(f, "Inference Error: non-finite estimate {value} at index {index}")
            }

            // ---- HAC ----
            InferenceError::EmptyScores => {
                write!(f, "Inference Error: score matrix must have at least one row")
            }

            // ---- Bandwidth selection ----
            InferenceError::StationarityViolated { phi } => {
                write!(f, "Inference Error: Stationarity violated (phi = {})", phi)
            }
            InferenceError::DenominatorTooSmall { denominator } => write!(
                f,
                "Inference Error: Denominator too small ({}) in bandwidth calculation",
                denominator
            ),
            InferenceError::OrderNotSupported { ord } => {
                write!(f, "Inference Error: Order {} not supported for bandwidth calculation", ord)
            }

            // ---- Anyhow catchall ----
            InferenceError::Anyhow(msg) => write!(f, "Inference Error: {}", msg),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<InferenceError> for PyErr {
    fn from(err: InferenceError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // The regression-size message names both counts so callers can see
    // which segment was too short.
    fn regression_size_display_mentions_counts() {
        let err = InferenceError::RegressionSize { n_obs: 1, n_regressors: 2 };

        let msg = err.to_string();

        assert!(msg.contains("1 observations"));
        assert!(msg.contains("2 regressors"));
    }

    #[test]
    fn exactly_identified_fit_reports_missing_degrees_of_freedom() {
        let err = InferenceError::NoResidualDegreesOfFreedom { n_obs: 2, n_regressors: 2 };

        let msg = err.to_string();

        assert!(msg.contains("no residual degrees of freedom"));
        assert!(msg.contains("2 observations for 2 regressors"));
    }

    #[test]
    fn anyhow_errors_convert_to_catchall_variant() {
        let err: InferenceError = anyhow::anyhow!("ar fit failed").into();

        assert_eq!(err, InferenceError::Anyhow("ar fit failed".to_string()));
    }
}
