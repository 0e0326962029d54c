//! inference::hac — HAC score covariance for Newey–West standard errors.
//!
//! Purpose
//! -------
//! Build HAC (Heteroskedasticity & Autocorrelation Consistent) covariance
//! matrices of *average* regression scores `sₜ = xₜ·eₜ`, the "meat" of the
//! OLS sandwich. The estimator has the form
//!
//! ```text
//! S̄  =  Γ₀  +  ∑_{k=1}^{L} w_k ( Γ_k + Γ_kᵀ ),
//! Γ_k = (1/n) · S_{k:}ᵀ S_{:n−k},
//! ```
//!
//! where `S` is the `n×p` score matrix (rows=time, cols=regressors), `w_k`
//! are kernel weights, and `L` is the lag truncation (bandwidth).
//!
//! Key behaviors
//! -------------
//! - Aggregate per-observation scores into a symmetric `p×p` matrix on the
//!   *average-score* scale. Multiplying by `n` gives the summed meat used by
//!   textbook Newey–West formulas.
//! - Configure kernel, bandwidth, centering, and the degrees-of-freedom
//!   correction through [`HACOptions`].
//! - Resolve the lag truncation of a regression segment through
//!   [`HacLagPolicy`], whose default is the per-segment rule
//!   `⌊(0.15·n)^{1/4}⌋`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `raw_scores` must have at least one row; zero-row input returns
//!   [`InferenceError::EmptyScores`].
//! - The bandwidth is always truncated to `L ≤ n−1`.
//! - `small_sample_correction` is applied by the sandwich step
//!   (`n/(n−p)`), not here; this module always scales lags by `1/n`.
//!
//! Downstream usage
//! ----------------
//! - `inference::ols` builds scores from residuals, calls
//!   [`calculate_avg_scores_cov`], and hands the result to
//!   `inference::sandwich`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover option defaults, symmetry, the `L = 0` reduction to
//!   the outer product of scores, centering invariance for mean-zero
//!   scores, a hand-computed Bartlett example, and the lag policies.
use crate::inference::{
    errors::{InferenceError, InferenceResult},
    kernel::KernelType,
};
use ndarray::{Array2, Axis, s};
use std::{borrow::Cow, cmp::min};

/// HACOptions — configuration for HAC score covariance estimation.
///
/// Fields
/// ------
/// - `kernel`: [`KernelType`]
///   Kernel family for the lag weights.
/// - `bandwidth`: `Option<usize>`
///   Fixed lag truncation `L` (truncated to `n−1` at compute time) or
///   `None` for the plug-in rule [`KernelType::optimal_bandwidth`].
/// - `center`: `bool`
///   Demean score columns before bandwidth selection and aggregation.
/// - `small_sample_correction`: `bool`
///   Scale the final parameter covariance by `n/(n−p)`.
///
/// Notes
/// -----
/// - The `Default` is Bartlett, plug-in bandwidth, no centering, with the
///   degrees-of-freedom correction: the convention behind the published
///   Beveridge elasticities.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct HACOptions {
    pub kernel: KernelType,
    pub bandwidth: Option<usize>,
    pub center: bool,
    pub small_sample_correction: bool,
}

impl HACOptions {
    /// Construct a `HACOptions` value from explicit settings.
    ///
    /// No validation is performed; the bandwidth is clamped to `n−1` in
    /// [`calculate_avg_scores_cov`].
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use rust_beveridge::inference::{HACOptions, KernelType};
    /// let opts = HACOptions::new(Some(3), KernelType::Bartlett, false, true);
    /// assert_eq!(opts.bandwidth, Some(3));
    /// ```
    pub fn new(
        bandwidth: Option<usize>, kernel: KernelType, center: bool, small_sample_correction: bool,
    ) -> HACOptions {
        HACOptions { bandwidth, kernel, center, small_sample_correction }
    }

    /// Copy of `self` with a different bandwidth.
    pub fn with_bandwidth(&self, bandwidth: Option<usize>) -> HACOptions {
        HACOptions { bandwidth, ..self.clone() }
    }
}

impl Default for HACOptions {
    fn default() -> Self {
        Self {
            bandwidth: None,
            kernel: KernelType::Bartlett,
            center: false,
            small_sample_correction: true,
        }
    }
}

/// How many HAC lags a regression segment uses.
///
/// - `PerSegment`: `⌊(0.15·n_seg)^{1/4}⌋` from the segment's own length.
/// - `FullSample`: the same rule applied to the full aligned sample, so
///   every segment shares one lag count.
/// - `Fixed(L)`: a fixed truncation.
/// - `PlugIn`: Andrews' AR(1) plug-in on the segment scores.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HacLagPolicy {
    #[default]
    PerSegment,
    FullSample,
    Fixed(usize),
    PlugIn,
}

impl HacLagPolicy {
    /// Bandwidth for a segment of `segment_len` rows out of `full_len`.
    /// `None` defers to the plug-in rule.
    pub fn bandwidth(&self, segment_len: usize, full_len: usize) -> Option<usize> {
        match self {
            HacLagPolicy::PerSegment => Some(rule_of_thumb_lags(segment_len)),
            HacLagPolicy::FullSample => Some(rule_of_thumb_lags(full_len)),
            HacLagPolicy::Fixed(lags) => Some(*lags),
            HacLagPolicy::PlugIn => None,
        }
    }
}

/// `⌊(0.15·n)^{1/4}⌋`, the lag truncation used for Beveridge-curve segments.
pub fn rule_of_thumb_lags(n: usize) -> usize {
    (0.15 * n as f64).powf(0.25).floor() as usize
}

/// Build a `p×p` HAC covariance matrix of average per-observation scores.
///
/// Parameters
/// ----------
/// - `hac_opts`: `&HACOptions`
///   Kernel, bandwidth and centering policy. `small_sample_correction` is
///   ignored here.
/// - `raw_scores`: `&Array2<f64>`
///   `n×p` matrix of per-observation scores.
///
/// Returns
/// -------
/// `InferenceResult<Array2<f64>>`
///   A symmetric `p×p` matrix `S̄`. With `L = 0` this is `(1/n) SᵀS`.
///
/// Errors
/// ------
/// - `InferenceError::EmptyScores` if `raw_scores` has no rows.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use rust_beveridge::inference::{HACOptions, KernelType, calculate_avg_scores_cov};
/// let scores = array![[1.0, -1.0], [0.5, -0.5], [1.5, -1.5]];
/// let opts = HACOptions::new(Some(1), KernelType::Bartlett, false, true);
/// let s = calculate_avg_scores_cov(&opts, &scores).unwrap();
/// assert_eq!(s.shape(), &[2, 2]);
/// ```
pub fn calculate_avg_scores_cov(
    hac_opts: &HACOptions, raw_scores: &Array2<f64>,
) -> InferenceResult<Array2<f64>> {
    let n = raw_scores.nrows();
    let p = raw_scores.ncols();
    let col_means = raw_scores.mean_axis(Axis(0)).ok_or(InferenceError::EmptyScores)?;

    let scores: Cow<'_, Array2<f64>> = if hac_opts.center {
        Cow::Owned(raw_scores - &col_means)
    } else {
        Cow::Borrowed(raw_scores)
    };

    let bandwidth = match hac_opts.bandwidth {
        Some(bw) => min(bw, n - 1),
        None => min(hac_opts.kernel.optimal_bandwidth(scores.as_ref()), n - 1),
    };

    let mut avg_scores = Array2::<f64>::zeros((p, p));
    for lag in 0..=bandwidth {
        add_hac_component(&mut avg_scores, scores.as_ref(), lag, bandwidth, hac_opts.kernel);
    }
    Ok(avg_scores)
}

// ---- Helper methods ----

/// Add lag `k`'s weighted, symmetrized autocovariance `w_k (Γ_k + Γ_kᵀ)`
/// to `avg_scores` (or `Γ₀` when `lag == 0`). Requires `lag < n`.
fn add_hac_component(
    avg_scores: &mut Array2<f64>, scores: &Array2<f64>, lag: usize, bandwidth: usize,
    kernel: KernelType,
) {
    let n = scores.nrows();
    let inv_n = 1.0 / n as f64;
    if lag == 0 {
        avg_scores.scaled_add(inv_n, &scores.t().dot(scores));
        return;
    }
    let weight = kernel.weight(lag as f64 / (bandwidth + 1) as f64);
    let gamma_k = scores.slice(s![lag.., ..]).t().dot(&scores.slice(s![..n - lag, ..])) * inv_n;
    avg_scores.scaled_add(weight, &gamma_k);
    avg_scores.scaled_add(weight, &gamma_k.t());
}
