//! Parameter covariance for least-squares fits: classical and HAC sandwich.
//!
//! The bread is the Moore–Penrose inverse of the Gram matrix `XᵀX`, taken
//! through a symmetric eigendecomposition that drops eigenvalues below
//! `EIGEN_EPS · λ_max`. The robust estimator is
//!
//! ```text
//! V = (XᵀX)⁺ · (n · S̄) · (XᵀX)⁺ · c,     c = n/(n−p) or 1,
//! ```
//!
//! with `S̄` the average-score HAC matrix from `inference::hac`.
use crate::inference::errors::{InferenceError, InferenceResult};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Relative eigenvalue cutoff for the pseudo-inverse.
const EIGEN_EPS: f64 = 1e-12;

/// Robust (sandwich) covariance of OLS coefficients.
///
/// Parameters
/// ----------
/// - `gram`: `p×p` matrix `XᵀX`.
/// - `avg_scores_cov`: `p×p` HAC matrix of average scores.
/// - `n_obs`: number of rows `n` behind both matrices.
/// - `dof_correction`: multiply by `n/(n−p)`.
///
/// Errors
/// ------
/// - `InferenceError::DimensionMismatch` if the two matrices disagree.
/// - `InferenceError::RegressionSize` if `dof_correction` and `n < p`.
/// - `InferenceError::NoResidualDegreesOfFreedom` if `dof_correction` and
///   `n = p`.
pub fn sandwich_covariance(
    gram: &Array2<f64>, avg_scores_cov: &Array2<f64>, n_obs: usize, dof_correction: bool,
) -> InferenceResult<Array2<f64>> {
    let p = gram.nrows();
    if avg_scores_cov.nrows() != p || avg_scores_cov.ncols() != p || gram.ncols() != p {
        return Err(InferenceError::DimensionMismatch {
            expected: p,
            actual: avg_scores_cov.nrows(),
        });
    }
    if dof_correction {
        residual_dof(n_obs, p)?;
    }
    let bread = pseudo_inverse_sym(gram);
    let meat = avg_scores_cov * n_obs as f64;
    let scale = if dof_correction { n_obs as f64 / (n_obs - p) as f64 } else { 1.0 };
    Ok(bread.dot(&meat).dot(&bread) * scale)
}

/// `n − p`, rejecting designs that leave no residual degrees of freedom.
pub fn residual_dof(n_obs: usize, n_regressors: usize) -> InferenceResult<usize> {
    match n_obs.checked_sub(n_regressors) {
        None => Err(InferenceError::RegressionSize { n_obs, n_regressors }),
        Some(0) => Err(InferenceError::NoResidualDegreesOfFreedom { n_obs, n_regressors }),
        Some(dof) => Ok(dof),
    }
}

/// Classical OLS covariance `σ² (XᵀX)⁺`.
pub fn classical_covariance(gram: &Array2<f64>, sigma2: f64) -> Array2<f64> {
    pseudo_inverse_sym(gram) * sigma2
}

/// Square roots of the covariance diagonal.
///
/// Tiny negative diagonals from round-off are clamped to zero; anything
/// non-finite is an error.
pub fn standard_errors(cov: &Array2<f64>) -> InferenceResult<Array1<f64>> {
    let diag = cov.diag();
    let mut se = Array1::<f64>::zeros(diag.len());
    for (i, &v) in diag.iter().enumerate() {
        if !v.is_finite() {
            return Err(InferenceError::NonFiniteEstimate { index: i, value: v });
        }
        se[i] = v.max(0.0).sqrt();
    }
    Ok(se)
}

/// Moore–Penrose inverse of a symmetric positive semi-definite matrix.
pub fn pseudo_inverse_sym(mat: &Array2<f64>) -> Array2<f64> {
    let p = mat.nrows();
    let mut mat_nalg = DMatrix::<f64>::zeros(p, p);
    fill_dmatrix(mat, &mut mat_nalg);
    let eigen_decomp = mat_nalg.symmetric_eigen();
    let q = eigen_decomp.eigenvectors;
    let eigenvals = eigen_decomp.eigenvalues;
    let cutoff = EIGEN_EPS * eigenvals.iter().cloned().fold(0.0_f64, f64::max);

    let mut inv = Array2::<f64>::zeros((p, p));
    for (k, &lambda) in eigenvals.iter().enumerate() {
        if lambda > cutoff {
            for i in 0..p {
                let coeff = q[(i, k)] / lambda;
                for j in 0..p {
                    inv[[i, j]] += coeff * q[(j, k)];
                }
            }
        }
    }
    inv
}

// ---- Helper methods ----

/// Copy a symmetric ndarray matrix into a nalgebra matrix, mirroring the
/// lower triangle so the eigensolver sees an exactly symmetric input.
fn fill_dmatrix(src: &Array2<f64>, dst: &mut DMatrix<f64>) {
    let n = src.ncols();
    for j in 0..n {
        for i in j..n {
            dst[(i, j)] = src[[i, j]];
            dst[(j, i)] = src[[i, j]];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn fill_dmatrix_mirrors_lower_triangle() {
        let src: Array2<f64> = array![[2.0, 0.5], [0.5, 1.0]];
        let mut dst = DMatrix::<f64>::zeros(2, 2);

        fill_dmatrix(&src, &mut dst);

        assert_eq!(dst[(0, 0)], 2.0);
        assert_eq!(dst[(0, 1)], 0.5);
        assert_eq!(dst[(1, 0)], 0.5);
        assert_eq!(dst[(1, 1)], 1.0);
    }

    #[test]
    // Purpose
    // -------
    // For an invertible matrix the pseudo-inverse is the ordinary inverse.
    fn pseudo_inverse_matches_inverse_for_full_rank() {
        let m = array![[4.0, 1.0], [1.0, 3.0]];

        let inv = pseudo_inverse_sym(&m);
        let eye = m.dot(&inv);

        assert_relative_eq!(eye[[0, 0]], 1.0, epsilon = 1e-12);
        assert_relative_eq!(eye[[0, 1]], 0.0, epsilon = 1e-12);
        assert_relative_eq!(eye[[1, 1]], 1.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // A rank-one Gram matrix has a finite pseudo-inverse instead of a
    // blow-up: pinv([[1,1],[1,1]]) = [[1,1],[1,1]]/4.
    fn pseudo_inverse_handles_rank_deficiency() {
        let m = array![[1.0, 1.0], [1.0, 1.0]];

        let inv = pseudo_inverse_sym(&m);

        for v in inv.iter() {
            assert_relative_eq!(*v, 0.25, epsilon = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // With an identity Gram matrix the sandwich reduces to n·S̄ scaled by
    // the dof factor n/(n−p).
    //
    // Given
    // -----
    // - gram = I₂, S̄ = diag(0.5, 2), n = 10, p = 2.
    //
    // Expect
    // ------
    // - V = diag(5, 20) · 10/8.
    fn sandwich_with_identity_gram_scales_meat() {
        let gram = Array2::<f64>::eye(2);
        let meat = array![[0.5, 0.0], [0.0, 2.0]];

        let v = sandwich_covariance(&gram, &meat, 10, true).unwrap();
        let v_raw = sandwich_covariance(&gram, &meat, 10, false).unwrap();

        assert_relative_eq!(v[[0, 0]], 5.0 * 1.25, epsilon = 1e-12);
        assert_relative_eq!(v[[1, 1]], 20.0 * 1.25, epsilon = 1e-12);
        assert_relative_eq!(v_raw[[1, 1]], 20.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // The n/(n−p) correction is undefined at n = p and below; the two cases
    // carry different errors, and skipping the correction accepts n = p.
    //
    // Given
    // -----
    // - Identity Gram and meat with p = 2.
    //
    // Expect
    // ------
    // - n = 2: `NoResidualDegreesOfFreedom`; n = 1: `RegressionSize`.
    // - n = 2 without correction: V = 2·I.
    fn sandwich_dof_correction_needs_residual_degrees_of_freedom() {
        // Arrange
        let gram = Array2::<f64>::eye(2);
        let meat = Array2::<f64>::eye(2);

        // Act
        let exact = sandwich_covariance(&gram, &meat, 2, true);
        let short = sandwich_covariance(&gram, &meat, 1, true);
        let raw = sandwich_covariance(&gram, &meat, 2, false).unwrap();

        // Assert
        assert_eq!(
            exact,
            Err(InferenceError::NoResidualDegreesOfFreedom { n_obs: 2, n_regressors: 2 })
        );
        assert_eq!(short, Err(InferenceError::RegressionSize { n_obs: 1, n_regressors: 2 }));
        assert_relative_eq!(raw[[0, 0]], 2.0, epsilon = 1e-12);
        assert_relative_eq!(raw[[1, 1]], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn standard_errors_clamp_round_off_and_reject_nan() {
        let cov = array![[4.0, 0.0], [0.0, -1e-18]];
        let bad = array![[f64::NAN]];

        let se = standard_errors(&cov).unwrap();

        assert_relative_eq!(se[0], 2.0);
        assert_eq!(se[1], 0.0);
        assert!(matches!(standard_errors(&bad), Err(InferenceError::NonFiniteEstimate { .. })));
    }

    #[test]
    fn classical_covariance_scales_inverse_gram() {
        let gram = array![[2.0, 0.0], [0.0, 4.0]];

        let v = classical_covariance(&gram, 3.0);

        assert_relative_eq!(v[[0, 0]], 1.5, epsilon = 1e-12);
        assert_relative_eq!(v[[1, 1]], 0.75, epsilon = 1e-12);
    }
}
