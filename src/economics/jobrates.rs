//! economics::jobrates — job-finding and job-separation rates from
//! unemployment stocks (Shimer, 2012).
//!
//! Purpose
//! -------
//! Measure monthly worker flows from three level series: total
//! unemployment `uₜ`, short-term unemployment `uˢₜ` (less than five weeks),
//! and the labor force `hₜ`.
//!
//! Key behaviors
//! -------------
//! - Job-finding probability `Fₜ = 1 − (u_{t+1} − uˢ_{t+1})/uₜ` and rate
//!   `fₜ = −ln(1 − Fₜ)`; the last month has no successor and is missing.
//! - Job-separation rate `λₜ` solving, per month,
//!   `(1 − e^{−(f+λ)})·λ/(f+λ)·hₜ + e^{−(f+λ)}·uₜ − u_{t+1} = 0`
//!   with the bracketed Brent solver started at `λ = 0`.
//! - Optional quarterly aggregation by summing the three monthly rates of a
//!   quarter; a quarter with any missing month is missing.
//! - Short-term unemployment after the 1994 survey redesign is scaled by
//!   [`ShortTermAdjustment`] (×1.1 from January 1994 by default).
//!
//! Invariants & assumptions
//! ------------------------
//! - All level series share the same dates; mismatches are errors.
//! - NaN inputs yield NaN outputs for the affected months; finite inputs
//!   outside the domain (non-positive stocks, `u_{t+1} ≤ uˢ_{t+1}`) are
//!   [`EconError::Domain`].
use crate::{
    economics::errors::{EconError, EconResult},
    optimization::{RootOptions, find_root},
    series::TimeSeries,
};
use chrono::NaiveDate;
use ndarray::Array1;
use tracing::debug;

/// Scaling of short-term unemployment from a cutoff date onwards.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShortTermAdjustment {
    pub cutoff: NaiveDate,
    pub factor: f64,
}

impl ShortTermAdjustment {
    /// Errors
    /// ------
    /// - `EconError::InvalidParameter` unless `factor` is finite and > 0.
    pub fn new(cutoff: NaiveDate, factor: f64) -> EconResult<ShortTermAdjustment> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(EconError::InvalidParameter {
                name: "factor",
                value: factor,
                reason: "must be positive and finite",
            });
        }
        Ok(ShortTermAdjustment { cutoff, factor })
    }

    /// Copy of `short_term` with dates on or after the cutoff scaled.
    pub fn apply(&self, short_term: &TimeSeries) -> EconResult<TimeSeries> {
        let scaled = short_term
            .dates()
            .iter()
            .zip(short_term.values())
            .map(|(date, &x)| if *date >= self.cutoff { x * self.factor } else { x })
            .collect::<Array1<f64>>();
        Ok(short_term.with_values(scaled)?)
    }
}

impl Default for ShortTermAdjustment {
    /// January 1994, factor 1.1.
    fn default() -> Self {
        let cutoff = NaiveDate::from_ymd_opt(1994, 1, 1).unwrap_or(NaiveDate::MIN);
        ShortTermAdjustment { cutoff, factor: 1.1 }
    }
}

/// Options for [`job_finding_rate`] and [`job_separation_rate`].
///
/// - `quarterly`: sum monthly rates within calendar quarters.
/// - `short_term_adjustment`: scaling of short-term unemployment, or `None`.
/// - `root`: solver settings for the separation equation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct JobRateOptions {
    pub quarterly: bool,
    pub short_term_adjustment: Option<ShortTermAdjustment>,
    pub root: RootOptions,
}

impl JobRateOptions {
    pub fn new(
        quarterly: bool, short_term_adjustment: Option<ShortTermAdjustment>, root: RootOptions,
    ) -> JobRateOptions {
        JobRateOptions { quarterly, short_term_adjustment, root }
    }
}

impl Default for JobRateOptions {
    fn default() -> Self {
        JobRateOptions {
            quarterly: true,
            short_term_adjustment: Some(ShortTermAdjustment::default()),
            root: RootOptions::default(),
        }
    }
}

/// Job-finding rate from unemployment and short-term unemployment levels.
///
/// Returns
/// -------
/// Monthly rates `fₜ = −ln(1 − Fₜ)` on the input dates (last month NaN), or
/// their quarterly sums when `opts.quarterly` is set.
///
/// Errors
/// ------
/// - `EconError::DateMismatch` / `EconError::Series` if the series are not
///   on the same dates.
/// - `EconError::Domain` for non-positive `uₜ` or `u_{t+1} − uˢ_{t+1}`.
pub fn job_finding_rate(
    unemployment: &TimeSeries, short_term: &TimeSeries, opts: &JobRateOptions,
) -> EconResult<TimeSeries> {
    let monthly = monthly_job_finding_rate(unemployment, short_term, opts)?;
    Ok(if opts.quarterly { monthly.quarterly_sum() } else { monthly })
}

/// Job-separation rate from unemployment, short-term unemployment, and
/// labor-force levels.
///
/// Errors
/// ------
/// - Every error of [`job_finding_rate`].
/// - `EconError::Domain` for a non-positive labor force.
/// - `EconError::NonConvergence` tagged with the month that failed.
pub fn job_separation_rate(
    unemployment: &TimeSeries, short_term: &TimeSeries, labor_force: &TimeSeries,
    opts: &JobRateOptions,
) -> EconResult<TimeSeries> {
    check_same_dates(unemployment, labor_force)?;
    let finding = monthly_job_finding_rate(unemployment, short_term, opts)?;
    let (u, h, f) = (unemployment.values(), labor_force.values(), finding.values());

    let n = u.len();
    let mut rates = Array1::<f64>::from_elem(n, f64::NAN);
    for t in 0..n.saturating_sub(1) {
        let (f_t, u_t, u_next, h_t) = (f[t], u[t], u[t + 1], h[t]);
        if [f_t, u_t, u_next, h_t].iter().any(|x| x.is_nan()) {
            continue;
        }
        if !(h_t > 0.0 && h_t.is_finite()) {
            return Err(EconError::Domain {
                quantity: "labor_force",
                index: t,
                value: h_t,
                reason: "must be positive and finite",
            });
        }
        let equation = |lam: f64| separation_equation(lam, f_t, u_t, u_next, h_t);
        let outcome = find_root(equation, 0.0, &opts.root).map_err(|source| {
            debug!(period = t, %source, "job-separation solve failed");
            EconError::NonConvergence { period: t, source }
        })?;
        rates[t] = outcome.root;
    }
    let monthly = unemployment.with_values(rates)?;
    Ok(if opts.quarterly { monthly.quarterly_sum() } else { monthly })
}

/// Residual of the monthly stock-flow equation at separation rate `lam`.
pub fn separation_equation(lam: f64, f: f64, u: f64, u_next: f64, h: f64) -> f64 {
    let x = f + lam;
    let stay = (-x).exp();
    lam * one_minus_exp_over(x) * h + stay * u - u_next
}

// ---- Helper methods ----

/// `(1 − e^{−x})/x`, continuous at `x = 0`.
fn one_minus_exp_over(x: f64) -> f64 {
    if x.abs() < 1e-12 { 1.0 - 0.5 * x } else { -(-x).exp_m1() / x }
}

fn monthly_job_finding_rate(
    unemployment: &TimeSeries, short_term: &TimeSeries, opts: &JobRateOptions,
) -> EconResult<TimeSeries> {
    check_same_dates(unemployment, short_term)?;
    let short_term = match &opts.short_term_adjustment {
        Some(adj) => adj.apply(short_term)?,
        None => short_term.clone(),
    };
    let (u, us) = (unemployment.values(), short_term.values());

    let n = u.len();
    let mut rates = Array1::<f64>::from_elem(n, f64::NAN);
    for t in 0..n.saturating_sub(1) {
        let (u_t, stayers) = (u[t], u[t + 1] - us[t + 1]);
        if u_t.is_nan() || stayers.is_nan() {
            continue;
        }
        if u_t <= 0.0 || !u_t.is_finite() {
            return Err(EconError::Domain {
                quantity: "unemployment",
                index: t,
                value: u_t,
                reason: "must be positive and finite",
            });
        }
        if stayers <= 0.0 || !stayers.is_finite() {
            return Err(EconError::Domain {
                quantity: "unemployment - short_term",
                index: t + 1,
                value: stayers,
                reason: "long-term unemployment must be positive",
            });
        }
        // f = −ln(1 − F) with 1 − F = stayers / u_t.
        rates[t] = -(stayers / u_t).ln();
    }
    Ok(unemployment.with_values(rates)?)
}

fn check_same_dates(a: &TimeSeries, b: &TimeSeries) -> EconResult<()> {
    if a.len() != b.len() {
        return Err(EconError::LengthMismatch {
            quantity: "level series",
            expected: a.len(),
            actual: b.len(),
        });
    }
    match a.dates().iter().zip(b.dates()).position(|(x, y)| x != y) {
        Some(index) => {
            Err(EconError::DateMismatch { index, left: a.dates()[index], right: b.dates()[index] })
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Job-finding and job-separation rates recovered from stocks simulated
    // with known monthly flows, the short-term adjustment, quarterly sums,
    // and error paths.
    // -------------------------------------------------------------------------

    const F: f64 = 0.45;
    const LAMBDA: f64 = 0.025;
    const H: f64 = 150.0;

    /// Twelve months from `start`, with stocks generated by the
    /// continuous-time flow model at constant `F` and `LAMBDA`.
    fn simulated(start_year: i32) -> (TimeSeries, TimeSeries, TimeSeries) {
        let n = 12;
        let x = F + LAMBDA;
        let mut u = Array1::<f64>::zeros(n);
        let mut us = Array1::<f64>::zeros(n);
        u[0] = 9.0;
        us[0] = 3.0;
        for t in 0..n - 1 {
            u[t + 1] = (1.0 - (-x).exp()) * LAMBDA / x * H + (-x).exp() * u[t];
            us[t + 1] = u[t + 1] - (-F).exp() * u[t];
        }
        let h = Array1::from_elem(n, H);
        (
            TimeSeries::monthly(start_year, 1, u).unwrap(),
            TimeSeries::monthly(start_year, 1, us).unwrap(),
            TimeSeries::monthly(start_year, 1, h).unwrap(),
        )
    }

    fn monthly_unadjusted() -> JobRateOptions {
        JobRateOptions::new(false, None, RootOptions::default())
    }

    #[test]
    // Purpose
    // -------
    // Stocks generated with a constant finding rate return that rate every
    // month, and the final month is missing.
    fn finding_rate_recovers_simulated_flow() {
        let (u, us, _) = simulated(1980);

        let f = job_finding_rate(&u, &us, &monthly_unadjusted()).unwrap();

        for t in 0..11 {
            assert_relative_eq!(f.values()[t], F, epsilon = 1e-12);
        }
        assert!(f.values()[11].is_nan());
    }

    #[test]
    // Purpose
    // -------
    // The separation equation is solved month by month from λ = 0 and
    // recovers the rate that generated the stocks.
    fn separation_rate_recovers_simulated_flow() {
        let (u, us, h) = simulated(1980);

        let lam = job_separation_rate(&u, &us, &h, &monthly_unadjusted()).unwrap();

        for t in 0..11 {
            assert_relative_eq!(lam.values()[t], LAMBDA, epsilon = 1e-9);
        }
        assert!(lam.values()[11].is_nan());
    }

    #[test]
    // Purpose
    // -------
    // Only months on or after the cutoff are scaled.
    fn short_term_adjustment_respects_cutoff() {
        let series = TimeSeries::monthly(1993, 11, Array1::from_elem(4, 2.0)).unwrap();

        let adjusted = ShortTermAdjustment::default().apply(&series).unwrap();

        assert_eq!(adjusted.values().to_vec(), vec![2.0, 2.0, 2.2, 2.2]);
    }

    #[test]
    fn adjustment_rejects_bad_factor() {
        let cutoff = NaiveDate::from_ymd_opt(1994, 1, 1).unwrap();

        assert!(ShortTermAdjustment::new(cutoff, 0.0).is_err());
        assert!(ShortTermAdjustment::new(cutoff, f64::NAN).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Quarterly output sums three monthly rates; the last quarter contains
    // the missing final month and is missing itself.
    fn quarterly_rates_sum_months() {
        let (u, us, _) = simulated(1980);
        let opts = JobRateOptions::new(true, None, RootOptions::default());

        let f = job_finding_rate(&u, &us, &opts).unwrap();

        assert_eq!(f.len(), 4);
        assert_relative_eq!(f.values()[0], 3.0 * F, epsilon = 1e-11);
        assert!(f.values()[3].is_nan());
    }

    #[test]
    fn mismatched_dates_are_rejected() {
        let (u, _, _) = simulated(1980);
        let (_, us_late, _) = simulated(1981);

        let res = job_finding_rate(&u, &us_late, &monthly_unadjusted());

        assert!(matches!(res, Err(EconError::DateMismatch { index: 0, .. })));
    }

    #[test]
    fn short_term_exceeding_total_is_a_domain_error() {
        let u = TimeSeries::monthly(1980, 1, Array1::from_vec(vec![5.0, 4.0])).unwrap();
        let us = TimeSeries::monthly(1980, 1, Array1::from_vec(vec![1.0, 4.5])).unwrap();

        let res = job_finding_rate(&u, &us, &monthly_unadjusted());

        assert!(matches!(res, Err(EconError::Domain { index: 1, .. })));
    }

    #[test]
    fn one_minus_exp_over_is_continuous_at_zero() {
        assert_relative_eq!(one_minus_exp_over(1e-13), 1.0, epsilon = 1e-12);
        let naive = (1.0 - (-1e-6f64).exp()) / 1e-6;

        assert_relative_eq!(one_minus_exp_over(1e-6), naive, epsilon = 1e-9);
    }
}
