//! breaks::model — the per-segment regression seam.
//!
//! Purpose
//! -------
//! Decouple the partition search from the statistics of a segment. A
//! [`SegmentModel`] scores a half-open row range of a [`Signal`] (cost used
//! by the search) and, once the partition is fixed, fits it with robust
//! standard errors. Both go through the same fitting routine, so the cost
//! that selected a partition and the coefficients reported for it agree.
//!
//! Key behaviors
//! -------------
//! - [`LinearSegmentModel`] regresses column 0 on the remaining columns by
//!   OLS; the cost is the residual sum of squares.
//! - Final fits attach Newey–West standard errors whose lag truncation
//!   follows a [`HacLagPolicy`].
//!
//! Invariants & assumptions
//! ------------------------
//! - `start < end ≤ T`; a segment with fewer rows than regressors fails
//!   with the regression-size error of `inference`, wrapped in
//!   [`BreakError::Inference`](crate::breaks::BreakError).
use crate::{
    breaks::{errors::BreakResult, options::CostModelKind},
    inference::{HACOptions, HacLagPolicy, fit_ols},
    series::Signal,
};
use ndarray::{Array1, Axis};

/// Cost of a segment plus the coefficients that produced it.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentScore {
    pub coefficients: Array1<f64>,
    pub cost: f64,
}

/// Final fit of a segment.
///
/// - `coefficients`: one per regressor column of the signal.
/// - `std_errors`: robust standard errors, aligned with `coefficients`.
/// - `rss`: residual sum of squares.
/// - `lags`: HAC truncation actually used.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentFit {
    pub coefficients: Array1<f64>,
    pub std_errors: Array1<f64>,
    pub rss: f64,
    pub lags: usize,
}

/// SegmentModel — cost and final fit on rows `[start, end)` of a signal.
pub trait SegmentModel {
    /// Cost used by the partition search.
    fn score(&self, signal: &Signal, start: usize, end: usize) -> BreakResult<SegmentScore>;

    /// Coefficients, robust standard errors, and RSS for a final segment.
    fn fit(&self, signal: &Signal, start: usize, end: usize) -> BreakResult<SegmentFit>;
}

/// OLS segment model with Newey–West standard errors.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinearSegmentModel {
    pub hac: HACOptions,
    pub lag_policy: HacLagPolicy,
}

impl LinearSegmentModel {
    pub fn new(hac: HACOptions, lag_policy: HacLagPolicy) -> LinearSegmentModel {
        LinearSegmentModel { hac, lag_policy }
    }
}

impl SegmentModel for LinearSegmentModel {
    fn score(&self, signal: &Signal, start: usize, end: usize) -> BreakResult<SegmentScore> {
        let fit =
            fit_ols(signal.dependent_range(start, end), signal.regressors_range(start, end))?;
        Ok(SegmentScore { coefficients: fit.coefficients, cost: fit.rss })
    }

    fn fit(&self, signal: &Signal, start: usize, end: usize) -> BreakResult<SegmentFit> {
        let x = signal.regressors_range(start, end);
        let ols = fit_ols(signal.dependent_range(start, end), x)?;

        let n = end - start;
        let lags = match self.lag_policy.bandwidth(n, signal.n_obs()) {
            Some(lags) => lags,
            None => {
                let scores = &x * &ols.residuals.view().insert_axis(Axis(1));
                self.hac.kernel.optimal_bandwidth(&scores)
            }
        }
        .min(n.saturating_sub(1));

        let hac = self.hac.with_bandwidth(Some(lags));
        let std_errors = ols.robust_standard_errors(x, &hac)?;
        Ok(SegmentFit { coefficients: ols.coefficients, std_errors, rss: ols.rss, lags })
    }
}

impl CostModelKind {
    /// Segment model implementing this cost family.
    pub fn build(&self, hac: HACOptions, lag_policy: HacLagPolicy) -> LinearSegmentModel {
        match self {
            CostModelKind::Linear => LinearSegmentModel::new(hac, lag_policy),
        }
    }
}
