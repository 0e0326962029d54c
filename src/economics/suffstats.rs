//! Sufficient-statistic formulas for efficient unemployment.
//!
//! The efficient tightness is `θ* = (1 − ζ)/(κ·ε)`, where `ε` is the
//! Beveridge elasticity, `κ` the recruiting cost (in units of a worker's
//! output) and `ζ` the social value of non-work. Moving along a Beveridge
//! curve `v·u^ε = const` to that tightness gives
//!
//! ```text
//! u* = (κ·ε·v·u^ε/(1 − ζ))^{1/(1+ε)}
//! ```
//!
//! and the unemployment gap `u − u*`. Each identity can be inverted for one
//! of `ε`, `κ`, `ζ` given the observed tightness and the other two.
use crate::economics::{
    errors::{EconError, EconResult},
    validation::{at, period_count, positive, unit_interval},
};
use ndarray::{Array1, ArrayView1};

/// Default social value of non-work.
pub const DEFAULT_ZETA: f64 = 0.26;
/// Default recruiting cost.
pub const DEFAULT_KAPPA: f64 = 0.92;

/// Calibration of the sufficient-statistic formulas.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SufficientStatistics {
    pub zeta: f64,
    pub kappa: f64,
}

impl SufficientStatistics {
    /// Validated constructor: `ζ < 1` and `κ > 0`, both finite.
    pub fn new(zeta: f64, kappa: f64) -> EconResult<Self> {
        if !zeta.is_finite() || zeta >= 1.0 {
            return Err(EconError::InvalidParameter {
                name: "zeta",
                value: zeta,
                reason: "must be finite and below 1",
            });
        }
        if !kappa.is_finite() || kappa <= 0.0 {
            return Err(EconError::InvalidParameter {
                name: "kappa",
                value: kappa,
                reason: "must be positive and finite",
            });
        }
        Ok(SufficientStatistics { zeta, kappa })
    }

    /// Efficient tightness `(1 − ζ)/(κ·ε)` per period.
    pub fn efficient_tightness(&self, epsilon: ArrayView1<'_, f64>) -> EconResult<Array1<f64>> {
        (0..epsilon.len())
            .map(|t| {
                let eps = positive("epsilon", t, epsilon[t])?;
                Ok((1.0 - self.zeta) / (self.kappa * eps))
            })
            .collect()
    }

    /// Efficient unemployment rate `(κ·ε·v·u^ε/(1 − ζ))^{1/(1+ε)}`.
    ///
    /// `u` and `v` are rates in `(0, 1)`; length-1 inputs broadcast.
    pub fn efficient_unemployment(
        &self, epsilon: ArrayView1<'_, f64>, u: ArrayView1<'_, f64>, v: ArrayView1<'_, f64>,
    ) -> EconResult<Array1<f64>> {
        let n = period_count(&[("epsilon", epsilon.len()), ("u", u.len()), ("v", v.len())])?;
        (0..n)
            .map(|t| {
                let eps = positive("epsilon", t, at(&epsilon, t))?;
                let u_t = unit_interval("u", t, at(&u, t))?;
                let v_t = unit_interval("v", t, at(&v, t))?;
                let level = self.kappa * eps * v_t * u_t.powf(eps) / (1.0 - self.zeta);
                Ok(level.powf(1.0 / (1.0 + eps)))
            })
            .collect()
    }

    /// Unemployment gap `u − u*`.
    pub fn unemployment_gap(
        &self, epsilon: ArrayView1<'_, f64>, u: ArrayView1<'_, f64>, v: ArrayView1<'_, f64>,
    ) -> EconResult<Array1<f64>> {
        let u_star = self.efficient_unemployment(epsilon, u, v)?;
        Ok(Array1::from_shape_fn(u_star.len(), |t| at(&u, t) - u_star[t]))
    }

    /// Beveridge elasticity that makes `θ` efficient: `(1 − ζ)/(κ·θ)`.
    pub fn beveridge_inverse(&self, theta: ArrayView1<'_, f64>) -> EconResult<Array1<f64>> {
        (0..theta.len())
            .map(|t| {
                let theta_t = positive("theta", t, theta[t])?;
                Ok((1.0 - self.zeta) / (self.kappa * theta_t))
            })
            .collect()
    }

    /// Recruiting cost that makes `θ` efficient given `ε`: `(1 − ζ)/(ε·θ)`.
    pub fn recruiting_inverse(
        &self, theta: ArrayView1<'_, f64>, epsilon: ArrayView1<'_, f64>,
    ) -> EconResult<Array1<f64>> {
        let n = period_count(&[("theta", theta.len()), ("epsilon", epsilon.len())])?;
        (0..n)
            .map(|t| {
                let theta_t = positive("theta", t, at(&theta, t))?;
                let eps = positive("epsilon", t, at(&epsilon, t))?;
                Ok((1.0 - self.zeta) / (eps * theta_t))
            })
            .collect()
    }

    /// Value of non-work that makes `θ` efficient given `ε`: `1 − κ·ε·θ`.
    pub fn nonwork_inverse(
        &self, theta: ArrayView1<'_, f64>, epsilon: ArrayView1<'_, f64>,
    ) -> EconResult<Array1<f64>> {
        let n = period_count(&[("theta", theta.len()), ("epsilon", epsilon.len())])?;
        (0..n)
            .map(|t| {
                let theta_t = positive("theta", t, at(&theta, t))?;
                let eps = positive("epsilon", t, at(&epsilon, t))?;
                Ok(1.0 - self.kappa * eps * theta_t)
            })
            .collect()
    }
}

impl Default for SufficientStatistics {
    fn default() -> Self {
        SufficientStatistics { zeta: DEFAULT_ZETA, kappa: DEFAULT_KAPPA }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Parameter validation, the efficient-tightness identity along the
    // Beveridge curve, and consistency of the three inverse formulas.
    // -------------------------------------------------------------------------

    #[test]
    fn constructor_rejects_out_of_range_parameters() {
        assert!(SufficientStatistics::new(1.0, 0.92).is_err());
        assert!(SufficientStatistics::new(0.26, 0.0).is_err());
        assert_eq!(SufficientStatistics::new(0.26, 0.92), Ok(SufficientStatistics::default()));
    }

    #[test]
    // Purpose
    // -------
    // The efficient point lies on the same Beveridge curve and has the
    // efficient tightness.
    //
    // Given
    // -----
    // - ε = 1.2, u = 0.06, v = 0.04 with default ζ, κ.
    //
    // Expect
    // ------
    // - v*·u*^ε = v·u^ε and v*/u* = (1 − ζ)/(κ·ε).
    fn efficient_point_is_on_the_curve_at_efficient_tightness() {
        let stats = SufficientStatistics::default();
        let (eps, u, v) = (1.2, 0.06, 0.04);

        let u_star =
            stats.efficient_unemployment(array![eps].view(), array![u].view(), array![v].view());
        let theta_star = stats.efficient_tightness(array![eps].view()).unwrap();

        let u_star = u_star.unwrap()[0];
        let v_star = theta_star[0] * u_star;
        assert_relative_eq!(v_star * u_star.powf(eps), v * u.powf(eps), max_relative = 1e-12);
    }

    #[test]
    fn gap_is_unemployment_minus_efficient_rate() {
        let stats = SufficientStatistics::default();
        let eps = array![0.8, 1.0];
        let u = array![0.05, 0.07];
        let v = array![0.03];

        let gap = stats.unemployment_gap(eps.view(), u.view(), v.view()).unwrap();
        let u_star = stats.efficient_unemployment(eps.view(), u.view(), v.view()).unwrap();

        for t in 0..2 {
            assert_relative_eq!(gap[t], u[t] - u_star[t], epsilon = 1e-15);
        }
    }

    #[test]
    // Purpose
    // -------
    // Inverting at the efficient tightness recovers every calibration input.
    fn inverses_recover_calibration() {
        let stats = SufficientStatistics::new(0.3, 0.5).unwrap();
        let eps = array![0.9];

        let theta = stats.efficient_tightness(eps.view()).unwrap();

        let eps_back = stats.beveridge_inverse(theta.view()).unwrap();
        let kappa_back = stats.recruiting_inverse(theta.view(), eps.view()).unwrap();
        let zeta_back = stats.nonwork_inverse(theta.view(), eps.view()).unwrap();
        assert_relative_eq!(eps_back[0], 0.9, epsilon = 1e-12);
        assert_relative_eq!(kappa_back[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(zeta_back[0], 0.3, epsilon = 1e-12);
    }

    #[test]
    fn non_positive_elasticity_is_a_domain_error() {
        let stats = SufficientStatistics::default();

        let res = stats.efficient_tightness(array![1.0, 0.0].view());

        assert!(matches!(res, Err(EconError::Domain { quantity: "epsilon", index: 1, .. })));
    }
}
