//! optimization — scalar root finding and its unified error surface.
//!
//! Purpose
//! -------
//! Provide the one-dimensional solver behind the economics layer: every
//! implicit per-period equation (job-separation rates, efficient tightness
//! under the endogenous-elasticity and Hosios conditions) is handed to
//! [`find_root`] with an explicit initial guess.
//!
//! Key behaviors
//! -------------
//! - Grow a bracket geometrically around the initial guess until the
//!   equation changes sign ([`bracket_root`]), then run `argmin`'s Brent
//!   root finder inside it.
//! - Normalize configuration issues, bracketing failures, non-finite
//!   evaluations, non-convergence, and backend solver errors into a single
//!   enum ([`OptError`]) with a common result alias ([`OptResult`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Equations are pure `Fn(f64) -> f64` closures, continuous on the
//!   bracket that is eventually found.
//! - A root is only returned when Brent reports convergence; any other
//!   termination is an error, never a stale estimate.
//!
//! Conventions
//! -----------
//! - Solver settings live in [`RootOptions`] (validated constructor plus a
//!   documented `Default`).
//! - Public entrypoints that can fail return `OptResult<T>`; callers never see
//!   raw `argmin` errors.
//!
//! Downstream usage
//! ----------------
//! - `economics::jobrates` and `economics::dmp` call [`find_root`] once per
//!   period and wrap failures with the period index.
//!
//! Testing notes
//! -------------
//! - `root`: bracket growth in both directions, exact zeros, known roots
//!   (`√2`, the fixed point of `cos`), bracket and budget failures.
//! - `errors`: conversions from `argmin` errors into `OptError`.

pub mod errors;
pub mod root;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::errors::{OptError, OptResult};
pub use self::root::{Bracket, RootOptions, RootOutcome, bracket_root, find_root};

// ---- Optional convenience prelude for downstream crates ------------------

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::root::{RootOptions, RootOutcome, find_root};
}
