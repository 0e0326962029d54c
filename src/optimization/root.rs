//! optimization::root — bracketed scalar root finding with Brent's method.
//!
//! Purpose
//! -------
//! Solve `g(x) = 0` for the implicit per-period equations of the economics
//! layer (job-separation rates, DMP efficiency conditions). The solver starts
//! from an explicit initial guess, grows a bracket around it until `g`
//! changes sign, and then runs `argmin`'s `BrentRoot` inside the bracket.
//!
//! Key behaviors
//! -------------
//! - Geometric, two-sided bracket expansion from the initial guess.
//! - Exact zeros found while bracketing are returned immediately.
//! - Non-convergence (iteration budget exhausted) and bracket failure are
//!   reported as errors; no stale value is ever returned.
//!
//! Invariants & assumptions
//! ------------------------
//! - `g` is continuous on the bracket; Brent's method then converges.
//! - Trial points where `g` is NaN/inf stop expansion in that direction. If no
//!   bracket is found and such a point was seen, the error is
//!   [`OptError::NonFiniteEvaluation`].
//!
//! Conventions
//! -----------
//! - `tol` is the absolute tolerance on `x` handed to `BrentRoot`.
//! - Iteration counts refer to Brent iterations, not bracketing evaluations.
use crate::optimization::errors::{OptError, OptResult};
use argmin::{
    core::{ArgminError, CostFunction, Error, Executor, State, TerminationReason, TerminationStatus},
    solver::brent::BrentRoot,
};
use tracing::debug;

/// RootOptions — bracket growth and Brent settings.
///
/// Fields
/// ------
/// - `initial_step`: first half-width tried around the initial guess.
/// - `growth`: factor applied to the half-width after each failed expansion.
/// - `max_expansions`: maximum number of half-widths tried.
/// - `tol`: absolute `x` tolerance for Brent.
/// - `max_iter`: Brent iteration budget.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RootOptions {
    pub initial_step: f64,
    pub growth: f64,
    pub max_expansions: usize,
    pub tol: f64,
    pub max_iter: u64,
}

impl RootOptions {
    /// Validated constructor.
    ///
    /// Errors
    /// ------
    /// - `OptError::InvalidInitialStep` unless `initial_step` is finite and > 0.
    /// - `OptError::InvalidGrowth` unless `growth` is finite and > 1.
    /// - `OptError::InvalidTolerance` unless `tol` is finite and > 0.
    /// - `OptError::InvalidMaxIter` if `max_iter == 0`.
    pub fn new(
        initial_step: f64, growth: f64, max_expansions: usize, tol: f64, max_iter: u64,
    ) -> OptResult<RootOptions> {
        if !initial_step.is_finite() || initial_step <= 0.0 {
            return Err(OptError::InvalidInitialStep {
                step: initial_step,
                reason: "must be finite and > 0",
            });
        }
        if !growth.is_finite() || growth <= 1.0 {
            return Err(OptError::InvalidGrowth { growth, reason: "must be finite and > 1" });
        }
        if !tol.is_finite() || tol <= 0.0 {
            return Err(OptError::InvalidTolerance { tol, reason: "must be finite and > 0" });
        }
        if max_iter == 0 {
            return Err(OptError::InvalidMaxIter { max_iter, reason: "must be positive" });
        }
        Ok(RootOptions { initial_step, growth, max_expansions, tol, max_iter })
    }
}

impl Default for RootOptions {
    fn default() -> Self {
        RootOptions {
            initial_step: 0.05,
            growth: 2.0,
            max_expansions: 50,
            tol: 1e-12,
            max_iter: 200,
        }
    }
}

/// A converged root.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RootOutcome {
    pub root: f64,
    pub value: f64,
    pub iterations: u64,
}

/// Solve `g(x) = 0` starting from `initial_guess`.
///
/// Parameters
/// ----------
/// - `g`: the equation; evaluated many times, must be pure.
/// - `initial_guess`: centre of the bracket search.
/// - `opts`: see [`RootOptions`].
///
/// Returns
/// -------
/// `OptResult<RootOutcome>` with the root, `g(root)`, and the number of
/// Brent iterations (0 if a trial point hit an exact zero).
///
/// Errors
/// ------
/// - `OptError::InvalidInitialGuess` if the guess is not finite.
/// - `OptError::NonFiniteEvaluation` / `OptError::BracketNotFound` if no
///   sign change is found.
/// - `OptError::NonConvergence` if Brent stops for any reason other than
///   meeting its tolerance.
/// - Any `argmin` failure, mapped through `From<argmin::core::Error>`.
///
/// Examples
/// --------
/// ```rust
/// # use rust_beveridge::optimization::{RootOptions, find_root};
/// let out = find_root(|x| x * x - 2.0, 1.0, &RootOptions::default()).unwrap();
/// assert!((out.root - 2f64.sqrt()).abs() < 1e-10);
/// ```
pub fn find_root<G>(g: G, initial_guess: f64, opts: &RootOptions) -> OptResult<RootOutcome>
where
    G: Fn(f64) -> f64,
{
    let (lo, hi) = match bracket_root(&g, initial_guess, opts)? {
        Bracket::Exact(root) => return Ok(RootOutcome { root, value: 0.0, iterations: 0 }),
        Bracket::Interval(lo, hi) => (lo, hi),
    };

    let solver = BrentRoot::new(lo, hi, opts.tol);
    let max_iter = opts.max_iter;
    let result = Executor::new(ScalarEquation { g: &g }, solver)
        .configure(|state| state.max_iters(max_iter))
        .run()?;
    let state = result.state();
    let iterations = state.get_iter();
    let status = state.get_termination_status();
    if *status != TerminationStatus::Terminated(TerminationReason::SolverConverged) {
        debug!(lo, hi, iterations, ?status, "brent root finder stopped early");
        return Err(OptError::NonConvergence { iterations, status: format!("{status:?}") });
    }
    let root = *state.get_param().ok_or(OptError::MissingRoot)?;
    Ok(RootOutcome { root, value: g(root), iterations })
}

/// Outcome of the bracket search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bracket {
    /// A trial point landed exactly on a root.
    Exact(f64),
    /// `g(lo)` and `g(hi)` have opposite signs.
    Interval(f64, f64),
}

/// Grow `[x0 − h, x0 + h]` geometrically until `g` changes sign relative
/// to `g(x0)`.
pub fn bracket_root<G>(g: &G, initial_guess: f64, opts: &RootOptions) -> OptResult<Bracket>
where
    G: Fn(f64) -> f64,
{
    if !initial_guess.is_finite() {
        return Err(OptError::InvalidInitialGuess { value: initial_guess });
    }
    let g0 = g(initial_guess);
    if !g0.is_finite() {
        return Err(OptError::NonFiniteEvaluation { x: initial_guess, value: g0 });
    }
    if g0 == 0.0 {
        return Ok(Bracket::Exact(initial_guess));
    }

    let mut last_non_finite = None;
    let (mut up_open, mut down_open) = (true, true);
    let mut step = opts.initial_step;
    for _ in 0..opts.max_expansions {
        for (direction, open) in [(1.0, &mut up_open), (-1.0, &mut down_open)] {
            if !*open {
                continue;
            }
            let x = initial_guess + direction * step;
            let gx = g(x);
            if !gx.is_finite() {
                *open = false;
                last_non_finite = Some((x, gx));
                continue;
            }
            if gx == 0.0 {
                return Ok(Bracket::Exact(x));
            }
            if gx.signum() != g0.signum() {
                let (lo, hi) =
                    if x < initial_guess { (x, initial_guess) } else { (initial_guess, x) };
                return Ok(Bracket::Interval(lo, hi));
            }
        }
        if !up_open && !down_open {
            break;
        }
        step *= opts.growth;
    }

    match last_non_finite {
        Some((x, value)) => Err(OptError::NonFiniteEvaluation { x, value }),
        None => Err(OptError::BracketNotFound {
            initial_guess,
            expansions: opts.max_expansions,
        }),
    }
}

// ---- Helper methods ----

/// Adapter exposing a scalar closure as an `argmin` cost function.
struct ScalarEquation<'a, G> {
    g: &'a G,
}

impl<G> CostFunction for ScalarEquation<'_, G>
where
    G: Fn(f64) -> f64,
{
    type Param = f64;
    type Output = f64;

    fn cost(&self, x: &f64) -> Result<f64, Error> {
        let value = (self.g)(*x);
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ArgminError::ConditionViolated {
                text: format!("equation is non-finite ({value}) at x = {x}"),
            }
            .into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Option validation.
    // - Bracket search in both directions and exact-zero shortcuts.
    // - Convergence of the Brent solve on smooth equations.
    // - Error paths: no sign change, non-finite equations, tiny budgets.
    // -------------------------------------------------------------------------

    #[test]
    fn root_options_reject_invalid_settings() {
        assert!(matches!(
            RootOptions::new(0.0, 2.0, 10, 1e-10, 10),
            Err(OptError::InvalidInitialStep { .. })
        ));
        assert!(matches!(
            RootOptions::new(0.1, 1.0, 10, 1e-10, 10),
            Err(OptError::InvalidGrowth { .. })
        ));
        assert!(matches!(
            RootOptions::new(0.1, 2.0, 10, -1.0, 10),
            Err(OptError::InvalidTolerance { .. })
        ));
        assert!(matches!(
            RootOptions::new(0.1, 2.0, 10, 1e-10, 0),
            Err(OptError::InvalidMaxIter { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // A root far above the initial guess is bracketed by upward growth.
    //
    // Given
    // -----
    // - g(x) = x − 10, guess 0, step 0.05, growth 2.
    //
    // Expect
    // ------
    // - An interval [0, hi] with hi ≥ 10.
    fn bracket_root_expands_upward() {
        let g = |x: f64| x - 10.0;

        let bracket = bracket_root(&g, 0.0, &RootOptions::default()).unwrap();

        match bracket {
            Bracket::Interval(lo, hi) => {
                assert_eq!(lo, 0.0);
                assert!(hi >= 10.0);
            }
            Bracket::Exact(_) => panic!("expected an interval"),
        }
    }

    #[test]
    fn bracket_root_expands_downward() {
        let g = |x: f64| x + 3.0;

        let bracket = bracket_root(&g, 0.0, &RootOptions::default()).unwrap();

        assert!(matches!(bracket, Bracket::Interval(lo, hi) if lo <= -3.0 && hi == 0.0));
    }

    #[test]
    fn bracket_root_returns_exact_zero_at_guess() {
        let g = |x: f64| x * (x - 1.0);

        assert_eq!(bracket_root(&g, 0.0, &RootOptions::default()), Ok(Bracket::Exact(0.0)));
    }

    #[test]
    // Purpose
    // -------
    // Brent converges to √2 from a guess of 1.
    fn find_root_solves_quadratic() {
        let out = find_root(|x| x * x - 2.0, 1.0, &RootOptions::default()).unwrap();

        assert_relative_eq!(out.root, 2f64.sqrt(), epsilon = 1e-10);
        assert!(out.value.abs() < 1e-9);
    }

    #[test]
    fn find_root_solves_transcendental_equation() {
        // x = cos(x) has its root near 0.739085.
        let out = find_root(|x| x - x.cos(), 0.0, &RootOptions::default()).unwrap();

        assert_relative_eq!(out.root, 0.739_085_133_215_160_6, epsilon = 1e-9);
    }

    #[test]
    fn find_root_without_sign_change_fails() {
        let opts = RootOptions::new(0.1, 2.0, 10, 1e-10, 100).unwrap();

        let res = find_root(|x| x * x + 1.0, 0.0, &opts);

        assert_eq!(res, Err(OptError::BracketNotFound { initial_guess: 0.0, expansions: 10 }));
    }

    #[test]
    fn find_root_reports_non_finite_equation() {
        let g = |x: f64| if x.abs() > 0.5 { f64::NAN } else { 1.0 };

        let res = find_root(g, 0.0, &RootOptions::default());

        assert!(matches!(res, Err(OptError::NonFiniteEvaluation { .. })));
    }

    #[test]
    // Purpose
    // -------
    // A one-iteration budget is not enough on a wide bracket; the failure
    // must surface as non-convergence, not as a stale value.
    fn find_root_with_tiny_budget_reports_non_convergence() {
        let opts = RootOptions::new(100.0, 2.0, 5, 1e-14, 1).unwrap();

        let res = find_root(|x| x.powi(3) - 2.0 * x - 5.0, 0.0, &opts);

        assert!(matches!(res, Err(OptError::NonConvergence { .. })));
    }
}
