//! series::preprocess — from raw rate series to aligned log rates.
//!
//! Purpose
//! -------
//! Turn an unemployment-rate series `u` and a vacancy-rate series `v`, as
//! published (rates or percentages, monthly or quarterly, with ragged
//! edges), into two aligned log-rate arrays ready for the break search.
//!
//! Key behaviors
//! -------------
//! - Detect percentages (any value `> 1`) and rescale them to rates.
//! - Optionally aggregate to quarterly means.
//! - Inner-join on dates and trim to the common valid window
//!   `[max(first valid), min(last valid)]`.
//! - Take natural logs and enforce a caller-supplied minimum length.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are never mutated; each step returns a fresh series.
//! - After trimming, no missing value may remain inside the window; a hole
//!   there is reported as [`SeriesError::InteriorGap`] instead of being
//!   interpolated or dropped.
//! - Non-positive rates inside the window are an error, not a `-inf`.
//!
//! Downstream usage
//! ----------------
//! - [`prepare_log_rates`] feeds [`LogRates::signal`], which builds the
//!   `[log_v, log_u, 1]` table used by `breaks`.

use crate::series::{
    errors::{SeriesError, SeriesResult},
    signal::Signal,
    time_series::TimeSeries,
};
use chrono::NaiveDate;
use ndarray::Array1;
use tracing::debug;

/// Options for [`prepare_log_rates`].
///
/// - `quarterly`: aggregate both series to quarterly means before aligning.
/// - `min_length`: smallest acceptable aligned length (the feasibility
///   floor of the downstream break search). Must be at least 1.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessOptions {
    pub quarterly: bool,
    pub min_length: usize,
}

impl PreprocessOptions {
    pub fn new(quarterly: bool, min_length: usize) -> PreprocessOptions {
        PreprocessOptions { quarterly, min_length: min_length.max(1) }
    }
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        PreprocessOptions { quarterly: false, min_length: 1 }
    }
}

/// Aligned log unemployment and log vacancy rates on a shared date index.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LogRates {
    pub dates: Vec<NaiveDate>,
    pub log_u: Array1<f64>,
    pub log_v: Array1<f64>,
}

impl LogRates {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// The `[log_v, log_u, 1]` regression table.
    pub fn signal(&self) -> SeriesResult<Signal> {
        Signal::beveridge(&self.log_v, &self.log_u)
    }
}

/// `true` if any finite value exceeds 1, i.e. the series is in percent.
pub fn is_percent(values: &Array1<f64>) -> bool {
    values.iter().any(|&x| x > 1.0)
}

/// Rescale a percentage series to rates; rate series are returned unchanged.
pub fn normalize_rates(series: &TimeSeries) -> TimeSeries {
    if is_percent(series.values()) { series.map_values(|x| x / 100.0) } else { series.clone() }
}

/// Inner-join two series on their dates and trim to the common valid window.
///
/// Returns
/// -------
/// `(dates, a_values, b_values)` restricted to rows where both series are
/// observed, from the latest first-valid date to the earliest last-valid
/// date.
///
/// Errors
/// ------
/// - `SeriesError::NoOverlap` if no joined row has both values finite.
/// - `SeriesError::InteriorGap` if a joined row inside the window has a
///   missing value.
pub fn align_pair(
    a: &TimeSeries, b: &TimeSeries,
) -> SeriesResult<(Vec<NaiveDate>, Array1<f64>, Array1<f64>)> {
    let (mut i, mut j) = (0, 0);
    let mut dates = Vec::new();
    let mut a_vals = Vec::new();
    let mut b_vals = Vec::new();
    while i < a.len() && j < b.len() {
        let (da, db) = (a.dates()[i], b.dates()[j]);
        if da < db {
            i += 1;
        } else if db < da {
            j += 1;
        } else {
            dates.push(da);
            a_vals.push(a.values()[i]);
            b_vals.push(b.values()[j]);
            i += 1;
            j += 1;
        }
    }

    let both_valid = |k: usize| a_vals[k].is_finite() && b_vals[k].is_finite();
    let first = (0..dates.len()).find(|&k| both_valid(k)).ok_or(SeriesError::NoOverlap)?;
    let last = (0..dates.len()).rfind(|&k| both_valid(k)).ok_or(SeriesError::NoOverlap)?;
    if let Some(k) = (first..=last).find(|&k| !both_valid(k)) {
        return Err(SeriesError::InteriorGap { index: k, date: dates[k] });
    }

    Ok((
        dates[first..=last].to_vec(),
        Array1::from(a_vals[first..=last].to_vec()),
        Array1::from(b_vals[first..=last].to_vec()),
    ))
}

/// Normalize, optionally aggregate, align, and log two rate series.
///
/// Parameters
/// ----------
/// - `u`: unemployment rate (rates or percentages).
/// - `v`: vacancy rate (rates or percentages).
/// - `opts`: see [`PreprocessOptions`].
///
/// Errors
/// ------
/// - Any alignment error from [`align_pair`].
/// - `SeriesError::NonPositiveValue` if a rate in the window is `<= 0`.
/// - `SeriesError::TooShort` if the aligned length is below
///   `opts.min_length`.
pub fn prepare_log_rates(
    u: &TimeSeries, v: &TimeSeries, opts: &PreprocessOptions,
) -> SeriesResult<LogRates> {
    if u.is_empty() || v.is_empty() {
        return Err(SeriesError::EmptySeries);
    }
    let (mut u, mut v) = (normalize_rates(u), normalize_rates(v));
    if opts.quarterly {
        u = u.quarterly_mean();
        v = v.quarterly_mean();
    }

    let (dates, u_vals, v_vals) = align_pair(&u, &v)?;
    let log_u = log_positive(&u_vals)?;
    let log_v = log_positive(&v_vals)?;

    if dates.len() < opts.min_length {
        return Err(SeriesError::TooShort { length: dates.len(), required: opts.min_length });
    }
    debug!(n_obs = dates.len(), quarterly = opts.quarterly, "aligned log rates");
    Ok(LogRates { dates, log_u, log_v })
}

// ---- Helper methods ----

fn log_positive(values: &Array1<f64>) -> SeriesResult<Array1<f64>> {
    if let Some((index, &value)) = values.iter().enumerate().find(|(_, x)| **x <= 0.0) {
        return Err(SeriesError::NonPositiveValue { index, value });
    }
    Ok(values.mapv(f64::ln))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Percent auto-detection (divide iff any value > 1).
    // - Join + trim to the common valid window, including ragged edges.
    // - Error paths: no overlap, interior gaps, non-positive rates, and the
    //   minimum-length floor.
    // - Quarterly aggregation before alignment.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // A series with any value above 1 is treated as percent and divided by
    // 100; a series in [0, 1] is untouched.
    //
    // Given
    // -----
    // - A percent series [5.0, 0.5] and a rate series [0.05, 1.0].
    //
    // Expect
    // ------
    // - [0.05, 0.005] and [0.05, 1.0] respectively.
    fn normalize_rates_divides_only_percent_series() {
        // Arrange
        let pct = TimeSeries::monthly(2000, 1, array![5.0, 0.5]).unwrap();
        let rate = TimeSeries::monthly(2000, 1, array![0.05, 1.0]).unwrap();

        // Act
        let pct_n = normalize_rates(&pct);
        let rate_n = normalize_rates(&rate);

        // Assert
        assert_relative_eq!(pct_n.values()[0], 0.05);
        assert_relative_eq!(pct_n.values()[1], 0.005);
        assert_eq!(rate_n, rate);
    }

    #[test]
    // Purpose
    // -------
    // Alignment keeps only shared dates and trims ragged leading/trailing
    // gaps to the common valid window.
    //
    // Given
    // -----
    // - `u` starts one month earlier and has a trailing NaN.
    // - `v` has a leading NaN on the first shared month.
    //
    // Expect
    // ------
    // - The window covers Mar..May, the months where both are observed.
    fn align_pair_trims_to_common_valid_window() {
        // Arrange
        let nan = f64::NAN;
        let u = TimeSeries::monthly(2000, 1, array![0.04, 0.05, 0.06, 0.07, 0.08, nan]).unwrap();
        let v = TimeSeries::monthly(2000, 2, array![nan, 0.03, 0.02, 0.01, 0.02, 0.03]).unwrap();

        // Act
        let (dates, a, b) = align_pair(&u, &v).unwrap();

        // Assert
        assert_eq!(dates.len(), 3);
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2000, 3, 1).unwrap());
        assert_eq!(a.to_vec(), vec![0.06, 0.07, 0.08]);
        assert_eq!(b.to_vec(), vec![0.03, 0.02, 0.01]);
    }

    #[test]
    fn align_pair_reports_interior_gap() {
        let nan = f64::NAN;
        let u = TimeSeries::monthly(2000, 1, array![0.04, nan, 0.06]).unwrap();
        let v = TimeSeries::monthly(2000, 1, array![0.03, 0.02, 0.01]).unwrap();

        let res = align_pair(&u, &v);

        assert!(matches!(res, Err(SeriesError::InteriorGap { index: 1, .. })));
    }

    #[test]
    fn align_pair_without_shared_valid_dates_is_no_overlap() {
        let u = TimeSeries::monthly(2000, 1, array![0.04, 0.05]).unwrap();
        let v = TimeSeries::monthly(2001, 1, array![0.03, 0.02]).unwrap();

        assert_eq!(align_pair(&u, &v), Err(SeriesError::NoOverlap));
    }

    #[test]
    // Purpose
    // -------
    // `prepare_log_rates` normalizes percent input, logs, and enforces the
    // minimum-length floor.
    fn prepare_log_rates_logs_normalized_rates_and_checks_floor() {
        let u = TimeSeries::quarterly(1960, 1, array![5.0, 6.0, 4.0]).unwrap();
        let v = TimeSeries::quarterly(1960, 1, array![0.03, 0.02, 0.04]).unwrap();

        let ok = prepare_log_rates(&u, &v, &PreprocessOptions::new(false, 3)).unwrap();
        let short = prepare_log_rates(&u, &v, &PreprocessOptions::new(false, 4));

        assert_eq!(ok.len(), 3);
        assert_relative_eq!(ok.log_u[1], 0.06_f64.ln(), epsilon = 1e-12);
        assert_relative_eq!(ok.log_v[2], 0.04_f64.ln(), epsilon = 1e-12);
        assert_eq!(short, Err(SeriesError::TooShort { length: 3, required: 4 }));
    }

    #[test]
    fn prepare_log_rates_rejects_zero_rate() {
        let u = TimeSeries::quarterly(1960, 1, array![0.05, 0.0]).unwrap();
        let v = TimeSeries::quarterly(1960, 1, array![0.03, 0.02]).unwrap();

        let res = prepare_log_rates(&u, &v, &PreprocessOptions::default());

        assert_eq!(res, Err(SeriesError::NonPositiveValue { index: 1, value: 0.0 }));
    }

    #[test]
    // Purpose
    // -------
    // With `quarterly = true`, monthly inputs are averaged per quarter
    // before alignment.
    fn prepare_log_rates_quarterly_averages_months() {
        let u = TimeSeries::monthly(1990, 1, array![0.04, 0.05, 0.06, 0.07, 0.08, 0.09]).unwrap();
        let v = TimeSeries::monthly(1990, 1, array![0.02, 0.02, 0.02, 0.03, 0.03, 0.03]).unwrap();

        let rates = prepare_log_rates(&u, &v, &PreprocessOptions::new(true, 1)).unwrap();

        assert_eq!(rates.len(), 2);
        assert_relative_eq!(rates.log_u[0], 0.05_f64.ln(), epsilon = 1e-12);
        assert_relative_eq!(rates.log_v[1], 0.03_f64.ln(), epsilon = 1e-12);
    }
}
