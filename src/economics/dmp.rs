//! economics::dmp — identities and efficiency conditions of the
//! Diamond–Mortensen–Pissarides model.
//!
//! Purpose
//! -------
//! Map observed labor-market quantities into DMP primitives (matching
//! elasticity, efficacies) and compute the efficient unemployment rate and
//! tightness, either from the sufficient-statistic condition with an
//! endogenous Beveridge elasticity or from the Hosios condition.
//!
//! Key behaviors
//! -------------
//! - Closed forms, evaluated period by period:
//!   - Beveridgean unemployment `u = λ/(λ + f)` and its inverse
//!     `f = λ(1 − u)/u`.
//!   - Matching elasticity `η = (ε − u/(1 − u))/(1 + ε)`.
//!   - Separation–efficacy ratio `λ/ω = θ^{1−η}·u/(1 − u)`.
//!   - Matching efficacy `ω = f/θ^{1−η}`.
//! - Efficiency conditions are solved in `ln θ` with the bracketed Brent
//!   root finder, one independent solve per period:
//!   - endogenous: `c·θ·ε(θ) = 1 − z` with `u(θ) = l/(l + θ^{1−η})`,
//!     `l = λ/ω`, and `ε(θ) = [1 − (1−η)(1−u)]/[(1−η)(1−u)]`;
//!   - Hosios: `(1−η)(1−z)/(r + λ + η·ω·θ^{1−η}) = c·θ^η/ω`, started from
//!     the tightness implied by `u₀`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are 1-D arrays; length-1 inputs broadcast over periods.
//! - Domain: rates in `(0, 1)` where they are shares, `η ∈ (0, 1)`,
//!   `z < 1`, positive costs, efficacies, and tightness. Violations are
//!   [`EconError::Domain`] with the period index.
//! - With `r = 0` and `l = λ/ω` the Hosios and endogenous conditions are
//!   the same equation, so both solvers agree.
use crate::{
    economics::{
        errors::{EconError, EconResult},
        validation::{at, non_negative, period_count, positive, require, unit_interval},
    },
    optimization::{RootOptions, find_root},
};
use ndarray::{Array1, ArrayView1};
use tracing::debug;

/// Efficient unemployment rate and tightness per period.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Efficiency {
    pub u_star: Array1<f64>,
    pub theta_star: Array1<f64>,
}

/// Beveridgean unemployment `λ/(λ + f)`.
pub fn beveridgean_unemployment(
    f: ArrayView1<'_, f64>, lambda: ArrayView1<'_, f64>,
) -> EconResult<Array1<f64>> {
    let n = period_count(&[("f", f.len()), ("lambda", lambda.len())])?;
    (0..n)
        .map(|t| {
            let f_t = non_negative("f", t, at(&f, t))?;
            let lam = non_negative("lambda", t, at(&lambda, t))?;
            require("lambda + f", t, lam + f_t, |x| x > 0.0, "must be positive")?;
            Ok(lam / (lam + f_t))
        })
        .collect()
}

/// Job-finding rate implied by Beveridgean unemployment, `λ(1 − u)/u`.
pub fn job_finding_from_unemployment(
    u: ArrayView1<'_, f64>, lambda: ArrayView1<'_, f64>,
) -> EconResult<Array1<f64>> {
    let n = period_count(&[("u", u.len()), ("lambda", lambda.len())])?;
    (0..n)
        .map(|t| {
            let u_t = unit_interval("u", t, at(&u, t))?;
            let lam = non_negative("lambda", t, at(&lambda, t))?;
            Ok(lam * (1.0 - u_t) / u_t)
        })
        .collect()
}

/// Matching elasticity `η = (ε − u/(1 − u))/(1 + ε)`.
pub fn matching_elasticity(
    u: ArrayView1<'_, f64>, epsilon: ArrayView1<'_, f64>,
) -> EconResult<Array1<f64>> {
    let n = period_count(&[("u", u.len()), ("epsilon", epsilon.len())])?;
    (0..n)
        .map(|t| {
            let u_t = unit_interval("u", t, at(&u, t))?;
            let eps = require("epsilon", t, at(&epsilon, t), |x| x > -1.0, "must exceed -1")?;
            Ok((eps - u_t / (1.0 - u_t)) / (1.0 + eps))
        })
        .collect()
}

/// Separation–efficacy ratio `λ/ω = θ^{1−η}·u/(1 − u)`.
pub fn separation_efficacy(
    u: ArrayView1<'_, f64>, eta: ArrayView1<'_, f64>, theta: ArrayView1<'_, f64>,
) -> EconResult<Array1<f64>> {
    let n = period_count(&[("u", u.len()), ("eta", eta.len()), ("theta", theta.len())])?;
    (0..n)
        .map(|t| {
            let u_t = unit_interval("u", t, at(&u, t))?;
            let eta_t = finite("eta", t, at(&eta, t))?;
            let theta_t = positive("theta", t, at(&theta, t))?;
            Ok(theta_t.powf(1.0 - eta_t) * u_t / (1.0 - u_t))
        })
        .collect()
}

/// Matching efficacy `ω = f/θ^{1−η}`.
pub fn matching_efficacy(
    f: ArrayView1<'_, f64>, theta: ArrayView1<'_, f64>, eta: ArrayView1<'_, f64>,
) -> EconResult<Array1<f64>> {
    let n = period_count(&[("f", f.len()), ("theta", theta.len()), ("eta", eta.len())])?;
    (0..n)
        .map(|t| {
            let f_t = non_negative("f", t, at(&f, t))?;
            let theta_t = positive("theta", t, at(&theta, t))?;
            let eta_t = finite("eta", t, at(&eta, t))?;
            Ok(f_t / theta_t.powf(1.0 - eta_t))
        })
        .collect()
}

/// Efficient allocation from the sufficient-statistic condition with an
/// endogenous Beveridge elasticity.
///
/// Parameters
/// ----------
/// - `eta`: matching elasticity, in `(0, 1)`.
/// - `z`: relative productivity of unemployed workers, `< 1`.
/// - `c`: recruiting cost, `> 0`.
/// - `lo`: separation–efficacy ratio `λ/ω`, `> 0`.
/// - `opts`: root-finder settings; the search starts at `θ = 1`.
///
/// Errors
/// ------
/// - `EconError::Domain` for inputs outside their domain.
/// - `EconError::NonConvergence` with the failing period.
pub fn efficiency_endogenous(
    eta: ArrayView1<'_, f64>, z: ArrayView1<'_, f64>, c: ArrayView1<'_, f64>,
    lo: ArrayView1<'_, f64>, opts: &RootOptions,
) -> EconResult<Efficiency> {
    let n = period_count(&[("eta", eta.len()), ("z", z.len()), ("c", c.len()), ("lo", lo.len())])?;
    let solved = (0..n)
        .map(|t| {
            let eta_t = unit_interval("eta", t, at(&eta, t))?;
            let z_t = below_one("z", t, at(&z, t))?;
            let c_t = positive("c", t, at(&c, t))?;
            let lo_t = positive("lo", t, at(&lo, t))?;

            // c·θ^η·(l + η·θ^{1−η})/(1 − η) − (1 − z), in x = ln θ.
            let condition = |x: f64| {
                let theta = x.exp();
                let a = theta.powf(1.0 - eta_t);
                c_t * theta.powf(eta_t) * (lo_t + eta_t * a) / (1.0 - eta_t) - (1.0 - z_t)
            };
            let theta = solve_log_tightness(t, condition, 0.0, opts)?;
            Ok((lo_t / (lo_t + theta.powf(1.0 - eta_t)), theta))
        })
        .collect::<EconResult<Vec<(f64, f64)>>>()?;
    Ok(collect_efficiency(solved))
}

/// Efficient allocation from the Hosios condition.
///
/// Parameters
/// ----------
/// - `eta`, `z`, `c`: as in [`efficiency_endogenous`].
/// - `lambda`: job-separation rate, `> 0`.
/// - `omega`: matching efficacy, `> 0`.
/// - `r`: discount rate, `≥ 0`.
/// - `u0`: unemployment rate used to seed the tightness search, in `(0, 1)`.
///
/// Returns
/// -------
/// `u* = λ/(λ + ω·θ*^{1−η})` and `θ*` per period.
pub fn efficiency_hosios(
    eta: ArrayView1<'_, f64>, z: ArrayView1<'_, f64>, c: ArrayView1<'_, f64>,
    lambda: ArrayView1<'_, f64>, omega: ArrayView1<'_, f64>, r: ArrayView1<'_, f64>, u0: f64,
    opts: &RootOptions,
) -> EconResult<Efficiency> {
    let n = period_count(&[
        ("eta", eta.len()),
        ("z", z.len()),
        ("c", c.len()),
        ("lambda", lambda.len()),
        ("omega", omega.len()),
        ("r", r.len()),
    ])?;
    let u0 = unit_interval("u0", 0, u0)?;
    let solved = (0..n)
        .map(|t| {
            let eta_t = unit_interval("eta", t, at(&eta, t))?;
            let z_t = below_one("z", t, at(&z, t))?;
            let c_t = positive("c", t, at(&c, t))?;
            let lam = positive("lambda", t, at(&lambda, t))?;
            let omega_t = positive("omega", t, at(&omega, t))?;
            let r_t = non_negative("r", t, at(&r, t))?;

            // Tightness at which Beveridgean unemployment equals u0.
            let x0 = (lam * (1.0 - u0) / (u0 * omega_t)).ln() / (1.0 - eta_t);
            let condition = |x: f64| {
                let theta = x.exp();
                let surplus = (1.0 - eta_t) * (1.0 - z_t)
                    / (r_t + lam + eta_t * omega_t * theta.powf(1.0 - eta_t));
                surplus - c_t * theta.powf(eta_t) / omega_t
            };
            let theta = solve_log_tightness(t, condition, x0, opts)?;
            Ok((lam / (lam + omega_t * theta.powf(1.0 - eta_t)), theta))
        })
        .collect::<EconResult<Vec<(f64, f64)>>>()?;
    Ok(collect_efficiency(solved))
}

// ---- Helper methods ----

fn finite(quantity: &'static str, index: usize, value: f64) -> EconResult<f64> {
    require(quantity, index, value, f64::is_finite, "must be finite")
}

fn below_one(quantity: &'static str, index: usize, value: f64) -> EconResult<f64> {
    require(quantity, index, value, |x| x < 1.0 && x.is_finite(), "must be finite and below 1")
}

fn solve_log_tightness<G: Fn(f64) -> f64>(
    period: usize, condition: G, x0: f64, opts: &RootOptions,
) -> EconResult<f64> {
    let outcome = find_root(condition, x0, opts).map_err(|source| {
        debug!(period, %source, "efficiency solve failed");
        EconError::NonConvergence { period, source }
    })?;
    Ok(outcome.root.exp())
}

fn collect_efficiency(solved: Vec<(f64, f64)>) -> Efficiency {
    let (u_star, theta_star): (Vec<f64>, Vec<f64>) = solved.into_iter().unzip();
    Efficiency { u_star: Array1::from_vec(u_star), theta_star: Array1::from_vec(theta_star) }
}
