//! inference — least squares, HAC, and sandwich covariance for segment fits.
//!
//! Purpose
//! -------
//! Provide the regression layer beneath the structural-break engine: an OLS
//! fit that doubles as the segment cost, plus Newey–West standard errors for
//! the final segment coefficients.
//!
//! Key behaviors
//! -------------
//! - Define a unified error and result type, [`InferenceError`] and
//!   [`InferenceResult`], including the regression-size error raised when a
//!   block has fewer rows than regressors.
//! - Fit OLS via [`fit_ols`] and read coefficients, residuals, and RSS from
//!   [`OlsFit`].
//! - Configure HAC behavior via [`HACOptions`] (kernel, bandwidth, centering,
//!   degrees-of-freedom correction) and choose per-segment lag truncation
//!   with [`HacLagPolicy`].
//! - Build HAC covariance matrices of average scores with
//!   [`calculate_avg_scores_cov`] and turn them into parameter covariance
//!   with [`sandwich_covariance`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Regressor blocks are `n × p` with rows = time; the intercept, if any,
//!   is an explicit column.
//! - HAC bandwidths are truncated to `n − 1`.
//! - All routines return [`InferenceError`] on failure rather than
//!   panicking.
//!
//! Conventions
//! -----------
//! - Scores are `sₜ = xₜ·eₜ`; the HAC matrix is on the average-score scale
//!   and the sandwich multiplies it back by `n`.
//! - Kernel implementations follow standard econometric definitions.
//!
//! Downstream usage
//! ----------------
//! - `breaks` calls [`fit_ols`] for every candidate segment (RSS as cost)
//!   and [`OlsFit::robust_standard_errors`] once per final segment.
//!
//! Testing notes
//! -------------
//! - Unit tests cover kernel weights, HAC aggregation against hand sums,
//!   the sandwich with identity Gram matrices, pseudo-inverses of rank
//!   deficient matrices, and OLS recovery/size errors.

pub mod errors;
pub mod hac;
pub mod kernel;
pub mod ols;
pub mod sandwich;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::errors::{InferenceError, InferenceResult};
pub use self::hac::{HACOptions, HacLagPolicy, calculate_avg_scores_cov, rule_of_thumb_lags};
pub use self::kernel::KernelType;
pub use self::ols::{OlsFit, fit_ols};
pub use self::sandwich::{sandwich_covariance, standard_errors};

// ---- Optional convenience prelude for downstream crates ------------------

pub mod prelude {
    pub use super::errors::{InferenceError, InferenceResult};
    pub use super::hac::{HACOptions, HacLagPolicy, calculate_avg_scores_cov};
    pub use super::kernel::KernelType;
    pub use super::ols::{OlsFit, fit_ols};
}
