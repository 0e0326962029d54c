//! inference::ols — least squares with classical and HAC standard errors.
//!
//! Purpose
//! -------
//! Fit `y = Xβ + e` on a block of rows and report the coefficients, the
//! residual sum of squares, and (on request) Newey–West standard errors.
//! The same routine scores candidate segments in the break search and
//! describes the final segments, so costs and coefficients always agree.
//!
//! Key behaviors
//! -------------
//! - Solve through a thin SVD of `X`, yielding the minimum-norm solution
//!   when `X` is rank deficient (the `lstsq` convention).
//! - Compute residuals and RSS from the fitted coefficients.
//! - Build scores `sₜ = xₜ·eₜ`, aggregate them with `inference::hac`, and
//!   wrap them in the sandwich of `inference::sandwich`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `y.len() == X.nrows()`; mismatches are `DimensionMismatch`.
//! - `X.nrows() ≥ X.ncols()`; otherwise `RegressionSize` is returned and
//!   nothing is fitted.
//! - An exactly identified fit (`n = p`) succeeds, but standard errors that
//!   divide by `n − p` return `NoResidualDegreesOfFreedom`.
//! - Coefficients are always finite on success.
//!
//! Conventions
//! -----------
//! - `X` already contains the intercept column if one is wanted.
//! - The robust covariance uses the degrees-of-freedom correction
//!   `n/(n−p)` when `HACOptions::small_sample_correction` is set.
//!
//! Testing notes
//! -------------
//! - Exact-fit recovery, RSS on a hand example, the rank-deficient
//!   minimum-norm path, the size error, and a Newey–West SE computed by
//!   hand for a two-parameter regression.
use crate::inference::{
    errors::{InferenceError, InferenceResult},
    hac::{HACOptions, calculate_avg_scores_cov},
    sandwich::{classical_covariance, residual_dof, sandwich_covariance, standard_errors},
};
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Relative singular-value cutoff for the least-squares solve.
const SVD_EPS: f64 = 1e-12;

/// Outcome of a least-squares fit on one block of rows.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct OlsFit {
    pub coefficients: Array1<f64>,
    pub residuals: Array1<f64>,
    pub rss: f64,
}

impl OlsFit {
    pub fn n_obs(&self) -> usize {
        self.residuals.len()
    }

    /// `Xβ̂` for an arbitrary regressor block.
    pub fn predict(&self, x: ArrayView2<'_, f64>) -> Array1<f64> {
        x.dot(&self.coefficients)
    }

    /// Newey–West (sandwich) covariance of the coefficients.
    ///
    /// `x` must be the regressor block the fit was computed on.
    pub fn robust_covariance(
        &self, x: ArrayView2<'_, f64>, hac: &HACOptions,
    ) -> InferenceResult<Array2<f64>> {
        let scores = &x * &self.residuals.view().insert_axis(Axis(1));
        let avg_scores_cov = calculate_avg_scores_cov(hac, &scores)?;
        let gram = x.t().dot(&x);
        sandwich_covariance(&gram, &avg_scores_cov, self.n_obs(), hac.small_sample_correction)
    }

    /// Standard errors from [`OlsFit::robust_covariance`].
    pub fn robust_standard_errors(
        &self, x: ArrayView2<'_, f64>, hac: &HACOptions,
    ) -> InferenceResult<Array1<f64>> {
        standard_errors(&self.robust_covariance(x, hac)?)
    }

    /// Homoskedastic standard errors `sqrt(σ̂² (XᵀX)⁺)`, `σ̂² = RSS/(n−p)`.
    pub fn classical_standard_errors(
        &self, x: ArrayView2<'_, f64>,
    ) -> InferenceResult<Array1<f64>> {
        let dof = residual_dof(x.nrows(), x.ncols())?;
        let sigma2 = self.rss / dof as f64;
        standard_errors(&classical_covariance(&x.t().dot(&x), sigma2))
    }
}

/// Ordinary least squares of `y` on `x`.
///
/// Errors
/// ------
/// - `InferenceError::DimensionMismatch` if `y.len() != x.nrows()`.
/// - `InferenceError::RegressionSize` if `x.nrows() < x.ncols()`.
/// - `InferenceError::SingularDesign` if the SVD solve fails.
/// - `InferenceError::NonFiniteEstimate` if a coefficient is not finite.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use rust_beveridge::inference::fit_ols;
/// let x = array![[0.0, 1.0], [1.0, 1.0], [2.0, 1.0]];
/// let y = array![1.0, 3.0, 5.0];
/// let fit = fit_ols(y.view(), x.view()).unwrap();
/// assert!((fit.coefficients[0] - 2.0).abs() < 1e-10);
/// ```
pub fn fit_ols(y: ArrayView1<'_, f64>, x: ArrayView2<'_, f64>) -> InferenceResult<OlsFit> {
    let (n, p) = (x.nrows(), x.ncols());
    if y.len() != n {
        return Err(InferenceError::DimensionMismatch { expected: n, actual: y.len() });
    }
    if n < p || n == 0 {
        return Err(InferenceError::RegressionSize { n_obs: n, n_regressors: p });
    }

    let x_nalg = DMatrix::<f64>::from_fn(n, p, |i, j| x[[i, j]]);
    let y_nalg = DVector::<f64>::from_iterator(n, y.iter().cloned());
    let svd = x_nalg.svd(true, true);
    let eps = SVD_EPS * svd.singular_values.max();
    let beta = svd.solve(&y_nalg, eps).map_err(|reason| InferenceError::SingularDesign { reason })?;

    let coefficients = Array1::from_iter(beta.iter().cloned());
    if let Some((index, &value)) = coefficients.iter().enumerate().find(|(_, b)| !b.is_finite()) {
        return Err(InferenceError::NonFiniteEstimate { index, value });
    }
    let residuals = &y - &x.dot(&coefficients);
    let rss = residuals.dot(&residuals);
    Ok(OlsFit { coefficients, residuals, rss })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::kernel::KernelType;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Coefficient recovery on exact and noisy linear data.
    // - RSS and residuals on a hand-computable example.
    // - Rank-deficient designs (minimum-norm solution).
    // - The regression-size error.
    // - Robust standard errors against a hand evaluation of the Newey–West
    //   sandwich with the n/(n−p) correction.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Exact linear data is recovered with zero RSS.
    fn fit_ols_recovers_exact_line() {
        let x = array![[0.0, 1.0], [1.0, 1.0], [2.0, 1.0], [3.0, 1.0]];
        let y = array![1.0, 3.0, 5.0, 7.0];

        let fit = fit_ols(y.view(), x.view()).unwrap();

        assert_relative_eq!(fit.coefficients[0], 2.0, epsilon = 1e-10);
        assert_relative_eq!(fit.coefficients[1], 1.0, epsilon = 1e-10);
        assert_relative_eq!(fit.rss, 0.0, epsilon = 1e-18);
    }

    #[test]
    // Purpose
    // -------
    // RSS matches a hand computation.
    //
    // Given
    // -----
    // - x = [0, 1, 2], y = [0, 2, 1] with intercept.
    //
    // Expect
    // ------
    // - slope 0.5, intercept 0.5, residuals [−0.5, 1, −0.5], RSS 1.5.
    fn fit_ols_rss_matches_hand_value() {
        let x = array![[0.0, 1.0], [1.0, 1.0], [2.0, 1.0]];
        let y = array![0.0, 2.0, 1.0];

        let fit = fit_ols(y.view(), x.view()).unwrap();

        assert_relative_eq!(fit.coefficients[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(fit.coefficients[1], 0.5, epsilon = 1e-12);
        assert_relative_eq!(fit.residuals[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(fit.rss, 1.5, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Duplicated columns yield the minimum-norm solution, splitting the
    // effect evenly, instead of failing.
    fn fit_ols_rank_deficient_returns_minimum_norm() {
        let x = array![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
        let y = array![2.0, 4.0, 6.0];

        let fit = fit_ols(y.view(), x.view()).unwrap();

        assert_relative_eq!(fit.coefficients[0], 1.0, epsilon = 1e-10);
        assert_relative_eq!(fit.coefficients[1], 1.0, epsilon = 1e-10);
        assert_relative_eq!(fit.rss, 0.0, epsilon = 1e-18);
    }

    #[test]
    fn fit_ols_rejects_fewer_rows_than_regressors() {
        let x = array![[1.0, 1.0]];
        let y = array![2.0];
        let x3 = array![[1.0, 1.0, 1.0], [2.0, 1.0, 0.0]];

        assert_eq!(
            fit_ols(y.view(), x.view()),
            Err(InferenceError::RegressionSize { n_obs: 1, n_regressors: 2 })
        );
        assert_eq!(
            fit_ols(array![1.0, 2.0].view(), x3.view()),
            Err(InferenceError::RegressionSize { n_obs: 2, n_regressors: 3 })
        );
    }

    #[test]
    // Purpose
    // -------
    // An exactly identified design fits with zero residuals, but neither
    // standard-error formula has residual degrees of freedom.
    //
    // Given
    // -----
    // - Two rows, intercept and slope: the line through (0, 1) and (1, 3).
    //
    // Expect
    // ------
    // - β̂ = [2, 1], RSS = 0.
    // - Classical and corrected robust SEs: `NoResidualDegreesOfFreedom`.
    fn exactly_identified_fit_has_no_residual_degrees_of_freedom() {
        // Arrange
        let x = array![[0.0, 1.0], [1.0, 1.0]];
        let y = array![1.0, 3.0];
        let hac = HACOptions::new(Some(0), KernelType::Bartlett, false, true);
        let expected = InferenceError::NoResidualDegreesOfFreedom { n_obs: 2, n_regressors: 2 };

        // Act
        let fit = fit_ols(y.view(), x.view()).unwrap();

        // Assert
        assert_relative_eq!(fit.coefficients[0], 2.0, epsilon = 1e-10);
        assert_relative_eq!(fit.coefficients[1], 1.0, epsilon = 1e-10);
        assert_relative_eq!(fit.rss, 0.0, epsilon = 1e-18);
        assert_eq!(fit.classical_standard_errors(x.view()), Err(expected.clone()));
        assert_eq!(fit.robust_standard_errors(x.view(), &hac), Err(expected));
    }

    #[test]
    fn fit_ols_rejects_length_mismatch() {
        let x = array![[1.0, 1.0], [2.0, 1.0]];
        let y = array![1.0, 2.0, 3.0];

        assert_eq!(
            fit_ols(y.view(), x.view()),
            Err(InferenceError::DimensionMismatch { expected: 2, actual: 3 })
        );
    }

    #[test]
    // Purpose
    // -------
    // With an intercept-only design and L = 1, the robust variance of the
    // mean is the Newey–West long-run variance over n² times n/(n−1).
    //
    // Given
    // -----
    // - y = [1, 3, 2, 6], X = ones: β̂ = 3, e = [−2, 0, −1, 3].
    // - Bartlett, L = 1: meat = Σe² + 2·(1/2)·Σ e_t e_{t−1} = 14 − 3 = 11.
    //
    // Expect
    // ------
    // - Var = 11 / 16 · 4/3, SE = sqrt of that.
    fn robust_standard_errors_match_hand_newey_west() {
        // Arrange
        let x = Array2::<f64>::ones((4, 1));
        let y = array![1.0, 3.0, 2.0, 6.0];
        let hac = HACOptions::new(Some(1), KernelType::Bartlett, false, true);

        // Act
        let fit = fit_ols(y.view(), x.view()).unwrap();
        let se = fit.robust_standard_errors(x.view(), &hac).unwrap();

        // Assert
        assert_relative_eq!(fit.coefficients[0], 3.0, epsilon = 1e-12);
        let expected = (11.0 / 16.0 * 4.0 / 3.0_f64).sqrt();
        assert_relative_eq!(se[0], expected, epsilon = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Classical SEs follow σ̂²(XᵀX)⁻¹ with σ̂² = RSS/(n−p).
    fn classical_standard_errors_match_formula() {
        let x = array![[0.0, 1.0], [1.0, 1.0], [2.0, 1.0]];
        let y = array![0.0, 2.0, 1.0];
        let fit = fit_ols(y.view(), x.view()).unwrap();

        let se = fit.classical_standard_errors(x.view()).unwrap();

        // XᵀX = [[5, 3], [3, 3]], inverse diag = [0.5, 5/6], σ̂² = 1.5.
        assert_relative_eq!(se[0], (1.5_f64 * 0.5).sqrt(), epsilon = 1e-10);
        assert_relative_eq!(se[1], (1.5_f64 * 5.0 / 6.0).sqrt(), epsilon = 1e-10);
    }

    #[test]
    fn predict_applies_coefficients() {
        let fit = OlsFit {
            coefficients: array![2.0, -1.0],
            residuals: Array1::zeros(2),
            rss: 0.0,
        };

        let yhat = fit.predict(array![[1.0, 1.0], [3.0, 1.0]].view());

        assert_eq!(yhat.to_vec(), vec![1.0, 5.0]);
    }
}
