//! economics — labor-market quantities derived from the Beveridge curve.
//!
//! Purpose
//! -------
//! Turn observed unemployment, vacancy and worker-flow series, together with
//! estimated Beveridge elasticities, into the quantities used to judge
//! whether unemployment is efficient.
//!
//! Key behaviors
//! -------------
//! - [`jobrates`]: job-finding and job-separation rates from unemployment
//!   levels (Shimer 2012), with an explicit [`ShortTermAdjustment`] and
//!   optional quarterly aggregation.
//! - [`dmp`]: DMP identities and the efficient allocation under the
//!   sufficient-statistic and Hosios conditions.
//! - [`suffstats`]: efficient tightness, efficient unemployment, the
//!   unemployment gap and the inverse-optimum formulas.
//!
//! Invariants & assumptions
//! ------------------------
//! - All functions are pure; per-period inputs are 1-D arrays and length-1
//!   inputs broadcast.
//! - Domain violations fail with [`EconError::Domain`] naming the quantity
//!   and period; per-period root-finding failures carry the period index.
//!
//! Conventions
//! -----------
//! - Rates are fractions, not percent.
//! - Job rates at `t` use levels at `t` and `t + 1`; the last month has no
//!   rate and is NaN.
//!
//! Testing notes
//! -------------
//! - Simulated flows with known rates for job rates; algebraic identities
//!   and inverses for DMP and sufficient statistics; agreement of the Hosios
//!   and endogenous efficiency at zero discounting.

pub mod dmp;
pub mod errors;
pub mod jobrates;
pub mod suffstats;
pub mod validation;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::dmp::{
    Efficiency, beveridgean_unemployment, efficiency_endogenous, efficiency_hosios,
    job_finding_from_unemployment, matching_efficacy, matching_elasticity, separation_efficacy,
};
pub use self::errors::{EconError, EconResult};
pub use self::jobrates::{
    JobRateOptions, ShortTermAdjustment, job_finding_rate, job_separation_rate,
    separation_equation,
};
pub use self::suffstats::{DEFAULT_KAPPA, DEFAULT_ZETA, SufficientStatistics};

// ---- Optional convenience prelude for downstream crates ------------------

pub mod prelude {
    pub use super::dmp::{Efficiency, efficiency_endogenous, efficiency_hosios};
    pub use super::errors::{EconError, EconResult};
    pub use super::jobrates::{JobRateOptions, job_finding_rate, job_separation_rate};
    pub use super::suffstats::SufficientStatistics;
}
