//! breaks::selection — information criteria, Chow-style F-tests, and the
//! choice of the number of breaks.
//!
//! Purpose
//! -------
//! Compare segmentations with `m = 0..=max_breaks` breaks, all taken from a
//! single dynamic-programming sweep, and turn the comparison into a break
//! count when the caller does not fix one.
//!
//! Key behaviors
//! -------------
//! - For every `m`: total SSR, BIC, LWZ, the breakpoints, the per-segment
//!   fitted values, and two F-tests (against `0` breaks and against `m − 1`
//!   breaks). Results live in [`BreakDiagnostics`], indexed by `m`.
//! - [`BreakDiagnostics::select`] applies a [`SelectionCriterion`].
//! - [`search_breakpoints`] is the single entry used by the elasticity
//!   pipeline: fixed `k` goes straight to the partitioner, otherwise the
//!   diagnostics choose `k`.
//!
//! Invariants & assumptions
//! ------------------------
//! - With `q` regressors (intercept included) the parameter count of an
//!   `m`-break model is `p(m) = q(m+1) + m`.
//! - `BIC(m) = ln(SSR/T) + p(m)·ln(T)/T` and
//!   `LWZ(m) = ln(SSR/(T − p(m))) + 0.299·(p(m)/T)·ln(T)^2.1`. LWZ is NaN
//!   when `T ≤ p(m)`; NaN criteria are never selected.
//! - F-tests use `df₁ = q` and `df₂ = T − (m+1)·2·q`; a non-positive `df₂`
//!   for any `m ≤ max_breaks` is rejected up front.
//! - p-values are upper tails of `F(df₁, df₂)` from `statrs`.
use crate::{
    breaks::{
        dynp::{DynamicProgram, PartitionSweep},
        errors::{BreakError, BreakResult},
        model::{LinearSegmentModel, SegmentModel},
        options::{
            BreakCount, BreakSearchOptions, DEFAULT_MAX_BREAKS, MinSegmentSize, SelectionCriterion,
            check_feasible,
        },
        partition::{Breakpoints, Partitioner},
    },
    series::Signal,
};
use ndarray::Array1;
use statrs::distribution::{ContinuousCDF, FisherSnedecor};
use tracing::{debug, info};

/// LWZ penalty constant.
const LWZ_C0: f64 = 0.299;

/// LWZ penalty exponent on `ln T`.
const LWZ_DELTA: f64 = 2.1;

/// Options for [`evaluate_num_breaks`].
///
/// - `max_breaks`: largest break count evaluated.
/// - `min_size`: minimum segment length.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticsOptions {
    pub max_breaks: usize,
    pub min_size: MinSegmentSize,
}

impl DiagnosticsOptions {
    pub fn new(max_breaks: usize, min_size: MinSegmentSize) -> BreakResult<DiagnosticsOptions> {
        min_size.validate()?;
        Ok(DiagnosticsOptions { max_breaks, min_size })
    }
}

impl Default for DiagnosticsOptions {
    fn default() -> Self {
        DiagnosticsOptions { max_breaks: DEFAULT_MAX_BREAKS, min_size: MinSegmentSize::default() }
    }
}

/// One Chow-style F-test between two nested break counts.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct FTestOutcome {
    pub statistic: f64,
    pub p_value: f64,
    pub df_num: usize,
    pub df_den: usize,
    pub null_breaks: usize,
    pub alt_breaks: usize,
}

impl FTestOutcome {
    /// Does the test reject the null at level `alpha`?
    pub fn rejects(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// BreakDiagnostics — model comparison across break counts `0..=max`.
///
/// Fields
/// ------
/// Every vector is indexed by the break count `m`.
/// - `ssr`, `bic`, `lwz`: criteria described in the module docs.
/// - `breakpoints`: optimal boundaries for `m` breaks.
/// - `fitted`: per-segment fitted values of the dependent column.
/// - `f_vs_zero`, `f_sequential`: `None` at `m = 0`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct BreakDiagnostics {
    pub n_obs: usize,
    pub n_regressors: usize,
    pub min_size: usize,
    pub ssr: Vec<f64>,
    pub bic: Vec<f64>,
    pub lwz: Vec<f64>,
    pub breakpoints: Vec<Breakpoints>,
    pub fitted: Vec<Vec<Array1<f64>>>,
    pub f_vs_zero: Vec<Option<FTestOutcome>>,
    pub f_sequential: Vec<Option<FTestOutcome>>,
}

impl BreakDiagnostics {
    pub fn max_breaks(&self) -> usize {
        self.ssr.len() - 1
    }

    /// Break count chosen by `criterion`.
    ///
    /// - `Bic` / `Lwz`: argmin, ties to the smaller `m`, NaN skipped
    ///   (falls back to 0 if every value is NaN).
    /// - `SequentialF { alpha }`: the largest `m` such that the sequential
    ///   tests for `1..=m` all reject.
    pub fn select(&self, criterion: SelectionCriterion) -> usize {
        match criterion {
            SelectionCriterion::Bic => argmin_skip_nan(&self.bic),
            SelectionCriterion::Lwz => argmin_skip_nan(&self.lwz),
            SelectionCriterion::SequentialF { alpha } => self
                .f_sequential
                .iter()
                .skip(1)
                .take_while(|test| test.as_ref().is_some_and(|t| t.rejects(alpha)))
                .count(),
        }
    }
}

/// Evaluate every break count `0..=max_breaks` on `signal`.
///
/// Errors
/// ------
/// - `BreakError::InfeasibleConfiguration` if `(max+1)·L > T` or if
///   `T − (max+1)·2·q ≤ 0` with `max ≥ 1`.
/// - Errors from the segment fits.
pub fn evaluate_num_breaks(
    signal: &Signal, opts: &DiagnosticsOptions,
) -> BreakResult<BreakDiagnostics> {
    let dp = DynamicProgram::new(LinearSegmentModel::default());
    evaluate_with(&dp, signal, opts)
}

/// [`evaluate_num_breaks`] with an arbitrary segment model.
pub fn evaluate_with<M: SegmentModel>(
    dp: &DynamicProgram<M>, signal: &Signal, opts: &DiagnosticsOptions,
) -> BreakResult<BreakDiagnostics> {
    let n = signal.n_obs();
    let q = signal.n_regressors();
    let min_size = opts.min_size.resolve(n)?;
    check_feasible(n, min_size, opts.max_breaks)?;
    if opts.max_breaks >= 1 && f_denominator_df(n, q, opts.max_breaks).is_none() {
        return Err(BreakError::InfeasibleConfiguration {
            n_obs: n,
            min_size,
            n_breaks: opts.max_breaks,
            reason: "F-test denominator degrees of freedom T − (m+1)·2·q must stay positive",
        });
    }

    let sweep = dp.sweep(signal, min_size, opts.max_breaks)?;
    let diagnostics = assemble(signal, &sweep)?;
    info!(
        n_obs = n,
        max_breaks = opts.max_breaks,
        bic_choice = diagnostics.select(SelectionCriterion::Bic),
        lwz_choice = diagnostics.select(SelectionCriterion::Lwz),
        "break-count diagnostics computed"
    );
    Ok(diagnostics)
}

/// Breakpoints for `signal` under `opts`.
///
/// Fixed counts run the partitioner directly; selection rules evaluate the
/// diagnostics and return the partition of the chosen count.
pub fn search_breakpoints<M: SegmentModel>(
    dp: &DynamicProgram<M>, signal: &Signal, opts: &BreakSearchOptions,
) -> BreakResult<Breakpoints> {
    match opts.n_breaks {
        BreakCount::Fixed(k) => {
            let min_size = opts.min_size.resolve(signal.n_obs())?;
            dp.optimal_partition(signal, min_size, k)
        }
        BreakCount::Select { max_breaks, criterion } => {
            let diag_opts = DiagnosticsOptions { max_breaks, min_size: opts.min_size };
            let mut diagnostics = evaluate_with(dp, signal, &diag_opts)?;
            let chosen = diagnostics.select(criterion);
            debug!(chosen, ?criterion, "break count selected");
            Ok(diagnostics.breakpoints.swap_remove(chosen))
        }
    }
}

/// Chow-style F-test of `rss_null` (fewer breaks) against `rss_alt`.
///
/// `F = ((RSS_null − RSS_alt)/df₁) / (RSS_alt/df₂)`, p-value `1 − CDF(F)`.
/// A minimum segment size can force `RSS_alt > RSS_null`; the statistic is
/// then negative and its p-value is 1.
///
/// Errors
/// ------
/// - `BreakError::InvalidOptions` if either degree of freedom is zero.
pub fn f_test(
    rss_null: f64, rss_alt: f64, df_num: usize, df_den: usize, null_breaks: usize,
    alt_breaks: usize,
) -> BreakResult<FTestOutcome> {
    if df_num == 0 || df_den == 0 {
        return Err(BreakError::InvalidOptions {
            field: "df",
            reason: "F-test degrees of freedom must be positive",
        });
    }
    let dist = FisherSnedecor::new(df_num as f64, df_den as f64).map_err(|_| {
        BreakError::InvalidOptions { field: "df", reason: "invalid F distribution parameters" }
    })?;
    let statistic = ((rss_null - rss_alt) / df_num as f64) / (rss_alt / df_den as f64);
    let p_value = if statistic.is_nan() {
        f64::NAN
    } else if statistic <= 0.0 {
        1.0
    } else {
        1.0 - dist.cdf(statistic)
    };
    Ok(FTestOutcome { statistic, p_value, df_num, df_den, null_breaks, alt_breaks })
}

/// Number of parameters of an `m`-break model with `q` regressors.
pub fn parameter_count(n_regressors: usize, n_breaks: usize) -> usize {
    n_regressors * (n_breaks + 1) + n_breaks
}

/// `ln(SSR/T) + p·ln(T)/T`.
pub fn bic(ssr: f64, n_obs: usize, n_params: usize) -> f64 {
    let t = n_obs as f64;
    (ssr / t).ln() + n_params as f64 * t.ln() / t
}

/// `ln(SSR/(T−p)) + 0.299·(p/T)·ln(T)^2.1`.
pub fn lwz(ssr: f64, n_obs: usize, n_params: usize) -> f64 {
    let t = n_obs as f64;
    let p = n_params as f64;
    if n_obs <= n_params {
        return f64::NAN;
    }
    (ssr / (t - p)).ln() + LWZ_C0 * (p / t) * t.ln().powf(LWZ_DELTA)
}

// ---- Helper methods ----

/// `T − (m+1)·2·q`, or `None` when not positive.
fn f_denominator_df(n_obs: usize, n_regressors: usize, n_breaks: usize) -> Option<usize> {
    let used = (n_breaks + 1).checked_mul(2 * n_regressors)?;
    n_obs.checked_sub(used).filter(|df| *df > 0)
}

fn argmin_skip_nan(values: &[f64]) -> usize {
    let mut best: Option<(usize, f64)> = None;
    for (m, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        if best.is_none_or(|(_, b)| value < b) {
            best = Some((m, value));
        }
    }
    best.map_or(0, |(m, _)| m)
}

fn assemble(signal: &Signal, sweep: &PartitionSweep) -> BreakResult<BreakDiagnostics> {
    let n = signal.n_obs();
    let q = signal.n_regressors();
    let max_breaks = sweep.max_breaks();
    let ssr: Vec<f64> = sweep.partitions.iter().map(|p| p.cost).collect();

    let mut bic_vals = Vec::with_capacity(max_breaks + 1);
    let mut lwz_vals = Vec::with_capacity(max_breaks + 1);
    let mut fitted = Vec::with_capacity(max_breaks + 1);
    let mut f_vs_zero = Vec::with_capacity(max_breaks + 1);
    let mut f_sequential = Vec::with_capacity(max_breaks + 1);

    for (m, partition) in sweep.partitions.iter().enumerate() {
        let n_params = parameter_count(q, m);
        bic_vals.push(bic(ssr[m], n, n_params));
        lwz_vals.push(lwz(ssr[m], n, n_params));

        let segment_fits: Vec<Array1<f64>> = partition
            .breakpoints
            .segments()
            .zip(&partition.coefficients)
            .map(|((start, end), beta)| signal.regressors_range(start, end).dot(beta))
            .collect();
        fitted.push(segment_fits);

        if m == 0 {
            f_vs_zero.push(None);
            f_sequential.push(None);
            continue;
        }
        let df_den = f_denominator_df(n, q, m).ok_or(BreakError::InfeasibleConfiguration {
            n_obs: n,
            min_size: sweep.min_size,
            n_breaks: m,
            reason: "F-test denominator degrees of freedom must stay positive",
        })?;
        f_vs_zero.push(Some(f_test(ssr[0], ssr[m], q, df_den, 0, m)?));
        f_sequential.push(Some(f_test(ssr[m - 1], ssr[m], q, df_den, m - 1, m)?));
    }

    Ok(BreakDiagnostics {
        n_obs: n,
        n_regressors: q,
        min_size: sweep.min_size,
        ssr,
        bic: bic_vals,
        lwz: lwz_vals,
        breakpoints: sweep.partitions.iter().map(|p| p.breakpoints.clone()).collect(),
        fitted,
        f_vs_zero,
        f_sequential,
    })
}
