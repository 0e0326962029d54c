//! Kernel taps and plug-in bandwidths for HAC estimation.
//!
//! This module provides:
//! - A `KernelType` enum with common HAC tapers (IID, Bartlett/Newey–West, Parzen, QS).
//!   Regression standard errors in this crate use Bartlett, matching the
//!   Newey–West convention of the Beveridge-curve literature.
//! - Per-lag weights `w(x)` where `x = k/(L+1)`.
//! - An Andrews-style plug-in bandwidth `optimal_bandwidth` that fits an AR(1)
//!   column-wise to the score matrix (`q=1` for Bartlett, `q=2` for Parzen and
//!   QS). If the plug-in fails (near-unit root, tiny denominator, AR fit
//!   error) it falls back to the rule-of-thumb `⌊n^{1/4}⌉`.
//!
//! Conventions:
//! - Input `series_mat` is `n×p` (rows=time, cols=regression scores `xₜ·eₜ`).
//! - The plug-in uses the **same** scores that HAC will aggregate.
use crate::inference::errors::{InferenceError, InferenceResult};
use arima::estimate;
use ndarray::Array2;
use tracing::debug;

/// Buffer keeping the AR(1) coefficient strictly inside the unit circle.
const STATIONARITY_MARGIN: f64 = 1e-6;

/// Smallest admissible denominator in the plug-in ratio.
const PLUG_IN_TOL: f64 = 1e-12;

/// HAC taper family.
///
/// - `IID`: no serial correlation; only `k=0` contributes.
/// - `Bartlett`: triangular (Newey–West) kernel, compact support on |x|≤1.
/// - `Parzen`: smoother compact-support kernel.
/// - `QuadraticSpectral`: infinite-support taper.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelType {
    IID,
    Bartlett,
    Parzen,
    QuadraticSpectral,
}

impl KernelType {
    /// Parse a kernel name (`"iid"`, `"bartlett"`, `"parzen"`, `"qs"`),
    /// case-insensitively.
    pub fn from_name(name: &str) -> Option<KernelType> {
        match name.to_ascii_lowercase().as_str() {
            "iid" => Some(KernelType::IID),
            "bartlett" | "newey-west" | "nw" => Some(KernelType::Bartlett),
            "parzen" => Some(KernelType::Parzen),
            "qs" | "quadratic_spectral" | "quadraticspectral" => {
                Some(KernelType::QuadraticSpectral)
            }
            _ => None,
        }
    }

    /// Kernel weight `w(x)` at taper argument `x = k/(L+1)`.
    pub fn weight(&self, input: f64) -> f64 {
        let x = input.abs();
        match self {
            KernelType::IID => {
                if x == 0.0 { 1.0 } else { 0.0 }
            }
            KernelType::Bartlett if x <= 1.0 => 1.0 - x,
            KernelType::Parzen if x <= 0.5 => 1.0 - 6.0 * x * x + 6.0 * x * x * x,
            KernelType::Parzen if x <= 1.0 => 2.0 * (1.0 - x).powi(3),
            KernelType::Bartlett | KernelType::Parzen => 0.0,
            KernelType::QuadraticSpectral => {
                if x == 0.0 {
                    return 1.0;
                }
                let pi_x = std::f64::consts::PI * x;
                let z = 6.0 * pi_x / 5.0;
                (25.0 / (12.0 * pi_x * pi_x)) * (z.sin() / z - z.cos())
            }
        }
    }

    /// Plug-in bandwidth with the `⌊n^{1/4}⌉` fallback.
    ///
    /// Never fails: any error from [`KernelType::plug_in_bandwidth`] is
    /// logged at debug level and replaced by the rule of thumb.
    pub fn optimal_bandwidth(&self, series_mat: &Array2<f64>) -> usize {
        match self.plug_in_bandwidth(series_mat) {
            Ok(bw) => bw,
            Err(err) => {
                let fallback = (series_mat.nrows() as f64).powf(0.25).round() as usize;
                debug!(%err, fallback, "plug-in bandwidth failed, using n^(1/4)");
                fallback
            }
        }
    }

    /// Andrews (1991) AR(1) plug-in bandwidth.
    ///
    /// Errors
    /// ------
    /// - `InferenceError::StationarityViolated` if a column's AR(1)
    ///   coefficient is within `STATIONARITY_MARGIN` of the unit circle.
    /// - `InferenceError::DenominatorTooSmall` if the aggregated variance
    ///   term vanishes.
    /// - `InferenceError::Anyhow` if the AR(1) fit itself fails.
    pub fn plug_in_bandwidth(&self, series_mat: &Array2<f64>) -> InferenceResult<usize> {
        let n = series_mat.nrows() as f64;
        let (ord, constant, exponent) = match self {
            KernelType::IID => return Ok(0),
            KernelType::Bartlett => (1, 1.1447, 1.0 / 3.0),
            KernelType::Parzen => (2, 2.6614, 1.0 / 5.0),
            KernelType::QuadraticSpectral => (2, 1.3221, 1.0 / 5.0),
        };
        let alpha = calc_opt_bandwidth_param(series_mat, ord)?;
        if !alpha.is_finite() {
            return Err(InferenceError::DenominatorTooSmall { denominator: alpha });
        }
        Ok((constant * (n * alpha).powf(exponent)).round() as usize)
    }
}

fn calc_opt_bandwidth_param(series_mat: &Array2<f64>, ord: usize) -> InferenceResult<f64> {
    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for col in series_mat.columns() {
        let col_vec = col.to_vec();
        let coeff = estimate::fit(&col_vec, 1, 0, 0)?;
        let (intercept, phi) = (coeff[0], coeff[1]);
        if phi.abs() >= 1.0 - STATIONARITY_MARGIN {
            return Err(InferenceError::StationarityViolated { phi });
        }
        let residuals = estimate::residuals(&col_vec, intercept, Some(&[phi]), None)?;
        let sigma2 = residuals.iter().map(|&e| e * e).sum::<f64>() / ((residuals.len() - 1) as f64);
        let sigma4 = sigma2 * sigma2;
        let phi_squared = phi * phi;
        denominator += sigma4 / (1.0 - phi_squared).powi(4);
        numerator += match ord {
            1 => 4.0 * phi_squared * sigma4 / ((1.0 - phi).powi(6) * (1.0 + phi).powi(2)),
            2 => 4.0 * phi_squared * sigma4 / (1.0 - phi).powi(8),
            _ => return Err(InferenceError::OrderNotSupported { ord }),
        };
    }
    if !denominator.is_finite() || denominator < PLUG_IN_TOL {
        return Err(InferenceError::DenominatorTooSmall { denominator });
    }
    Ok(numerator / denominator)
}
