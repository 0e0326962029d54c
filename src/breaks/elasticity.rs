//! breaks::elasticity — time-varying Beveridge elasticity with robust bands.
//!
//! Purpose
//! -------
//! Run the full pipeline from raw unemployment and vacancy rates to a
//! per-period elasticity table: preprocessing, break search (or externally
//! supplied breakpoints), segment-wise OLS of `log v` on `[log u, 1]`, and
//! Newey–West standard errors.
//!
//! Key behaviors
//! -------------
//! - The reported elasticity is the **negated** slope on `log u`, so a
//!   downward-sloping Beveridge curve has a positive elasticity.
//! - Bands are `elasticity ∓ 1.96·SE` (normal approximation).
//! - Every row of a segment carries that segment's estimate, SE and band.
//! - [`segment_fitted_values`] rebuilds the fitted segment lines
//!   `log v = −e·log u + intercept` for plotting.
//!
//! Invariants & assumptions
//! ------------------------
//! - The last regressor column of the signal is the intercept.
//! - External breakpoints are validated against the aligned length with a
//!   minimum gap of one row; segments shorter than the regressor count fail
//!   with the regression-size error of `inference`.
use crate::{
    breaks::{
        dynp::DynamicProgram,
        errors::{BreakError, BreakResult},
        model::SegmentModel,
        options::BreakSearchOptions,
        partition::Breakpoints,
        selection::search_breakpoints,
    },
    inference::{HACOptions, HacLagPolicy},
    series::{PreprocessOptions, SeriesError, Signal, TimeSeries, prepare_log_rates},
};
use chrono::NaiveDate;
use ndarray::{Array1, s};
use tracing::{debug, info};

/// Two-sided 95% normal quantile used for the bands.
pub const NORMAL_95: f64 = 1.96;

/// ElasticityOptions — configuration of [`compute_beveridge_elasticity`].
///
/// Fields
/// ------
/// - `preprocess`: frequency and minimum aligned length.
/// - `search`: break-search configuration (ignored when `breakpoints` is
///   set).
/// - `breakpoints`: full boundary list `[0, …, T]` that bypasses the search.
/// - `hac`: kernel and degrees-of-freedom settings for the standard errors.
/// - `lag_policy`: HAC lag truncation per segment.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElasticityOptions {
    pub preprocess: PreprocessOptions,
    pub search: BreakSearchOptions,
    pub breakpoints: Option<Vec<usize>>,
    pub hac: HACOptions,
    pub lag_policy: HacLagPolicy,
}

/// Coefficients and band of one regime.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentElasticity {
    pub start: usize,
    pub end: usize,
    pub elasticity: f64,
    pub std_error: f64,
    pub intercept: f64,
    pub lags: usize,
    pub lower: f64,
    pub upper: f64,
}

impl SegmentElasticity {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// ElasticityTable — per-period elasticity with its regime structure.
///
/// `estimate`, `std_error`, `lower` and `upper` have one entry per date and
/// are constant within each segment.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ElasticityTable {
    pub dates: Vec<NaiveDate>,
    pub estimate: Array1<f64>,
    pub std_error: Array1<f64>,
    pub lower: Array1<f64>,
    pub upper: Array1<f64>,
    pub breakpoints: Breakpoints,
    pub segments: Vec<SegmentElasticity>,
}

impl ElasticityTable {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Time-varying Beveridge elasticity from unemployment and vacancy rates.
///
/// Parameters
/// ----------
/// - `u`, `v`: unemployment and vacancy rates (rates or percentages).
/// - `opts`: see [`ElasticityOptions`].
///
/// Errors
/// ------
/// - `BreakError::Series` for alignment problems.
/// - `BreakError::InvalidBreakpoints` for malformed external breakpoints.
/// - `BreakError::InfeasibleConfiguration` if the search cannot fit.
/// - `BreakError::Inference` if a segment regression fails.
pub fn compute_beveridge_elasticity(
    u: &TimeSeries, v: &TimeSeries, opts: &ElasticityOptions,
) -> BreakResult<ElasticityTable> {
    let rates = prepare_log_rates(u, v, &opts.preprocess)?;
    let signal = rates.signal()?;
    let dp = DynamicProgram::new(opts.search.model.build(opts.hac.clone(), opts.lag_policy));

    let breakpoints = match &opts.breakpoints {
        Some(positions) => Breakpoints::new(positions.clone(), signal.n_obs(), 1)?,
        None => search_breakpoints(&dp, &signal, &opts.search)?,
    };
    let segments = estimate_segments(dp.model(), &signal, &breakpoints)?;
    info!(
        n_obs = signal.n_obs(),
        breakpoints = ?breakpoints.as_slice(),
        "beveridge elasticity estimated"
    );
    Ok(elasticity_table(rates.dates, breakpoints, segments))
}

/// Fit every segment of `breakpoints` and report elasticities.
pub fn estimate_segments<M: SegmentModel>(
    model: &M, signal: &Signal, breakpoints: &Breakpoints,
) -> BreakResult<Vec<SegmentElasticity>> {
    if breakpoints.n_obs() != signal.n_obs() {
        return Err(SeriesError::LengthMismatch {
            expected: signal.n_obs(),
            actual: breakpoints.n_obs(),
        }
        .into());
    }
    let intercept_col = signal.n_regressors() - 1;
    breakpoints
        .segments()
        .map(|(start, end)| {
            let fit = model.fit(signal, start, end)?;
            let elasticity = -fit.coefficients[0];
            let std_error = fit.std_errors[0];
            debug!(start, end, elasticity, std_error, lags = fit.lags, "segment refit");
            Ok(SegmentElasticity {
                start,
                end,
                elasticity,
                std_error,
                intercept: fit.coefficients[intercept_col],
                lags: fit.lags,
                lower: elasticity - NORMAL_95 * std_error,
                upper: elasticity + NORMAL_95 * std_error,
            })
        })
        .collect()
}

/// Spread segment results over the date index.
pub fn elasticity_table(
    dates: Vec<NaiveDate>, breakpoints: Breakpoints, segments: Vec<SegmentElasticity>,
) -> ElasticityTable {
    let n = dates.len();
    let mut estimate = Array1::<f64>::from_elem(n, f64::NAN);
    let mut std_error = Array1::<f64>::from_elem(n, f64::NAN);
    let mut lower = Array1::<f64>::from_elem(n, f64::NAN);
    let mut upper = Array1::<f64>::from_elem(n, f64::NAN);
    for seg in &segments {
        let end = seg.end.min(n);
        for (column, value) in [
            (&mut estimate, seg.elasticity),
            (&mut std_error, seg.std_error),
            (&mut lower, seg.lower),
            (&mut upper, seg.upper),
        ] {
            column.slice_mut(s![seg.start..end]).fill(value);
        }
    }
    ElasticityTable { dates, estimate, std_error, lower, upper, breakpoints, segments }
}

/// Fitted segment lines `−elasticity·log u + intercept`, one array per
/// segment.
///
/// Errors
/// ------
/// - `BreakError::Series(LengthMismatch)` if `log_u` does not cover the
///   breakpoints or the segment count differs.
pub fn segment_fitted_values(
    log_u: &Array1<f64>, breakpoints: &Breakpoints, segments: &[SegmentElasticity],
) -> BreakResult<Vec<Array1<f64>>> {
    if log_u.len() != breakpoints.n_obs() {
        return Err(BreakError::Series(SeriesError::LengthMismatch {
            expected: breakpoints.n_obs(),
            actual: log_u.len(),
        }));
    }
    if segments.len() != breakpoints.n_segments() {
        return Err(BreakError::Series(SeriesError::LengthMismatch {
            expected: breakpoints.n_segments(),
            actual: segments.len(),
        }));
    }
    Ok(breakpoints
        .segments()
        .zip(segments)
        .map(|((start, end), seg)| {
            log_u.slice(s![start..end]).mapv(|x| -seg.elasticity * x + seg.intercept)
        })
        .collect())
}
