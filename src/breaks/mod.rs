//! breaks — structural-break search and segment-wise Beveridge elasticities.
//!
//! Purpose
//! -------
//! Locate regime changes in the Beveridge curve `log v = a − e·log u` and
//! report the elasticity `e` of every regime with Newey–West bands. This is
//! the core of the crate: everything in `series` and `inference` exists to
//! feed it.
//!
//! Key behaviors
//! -------------
//! - Configure the search through [`BreakSearchOptions`] (cost family,
//!   minimum segment size, fixed or selected break count, reference
//!   defaults) with validation at construction.
//! - Find globally optimal partitions by dynamic programming
//!   ([`DynamicProgram`]) over a swappable [`SegmentModel`]; the
//!   [`Partitioner`] trait is the seam for alternative searches.
//! - Compare break counts through BIC, LWZ and Chow-style F-tests
//!   ([`evaluate_num_breaks`], [`BreakDiagnostics`]).
//! - Assemble the per-period elasticity table
//!   ([`compute_beveridge_elasticity`], [`ElasticityTable`]) and rebuild the
//!   fitted segment lines ([`segment_fitted_values`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Every breakpoint list is a validated [`Breakpoints`]: starts at 0, ends
//!   at `T`, strictly increasing, gaps at least the minimum size.
//! - Infeasible `(L, k)` combinations fail early with
//!   [`BreakError::InfeasibleConfiguration`]; no partial results are
//!   returned.
//!
//! Conventions
//! -----------
//! - Rows are time; the signal layout is `[log v, log u, 1]`.
//! - The reported elasticity is the negated slope on `log u`.
//!
//! Downstream usage
//! ----------------
//! - Rust callers usually only need [`compute_beveridge_elasticity`] and
//!   [`evaluate_num_breaks`]; the Python bindings expose both.
//!
//! Testing notes
//! -------------
//! - Unit tests cover DP exactness against brute force, tie-breaking, the
//!   options rules, criterion formulas, F p-values, and the elasticity
//!   table. `tests/` holds the 276-quarter regime fixture and proptest
//!   invariants of breakpoint lists.

pub mod dynp;
pub mod elasticity;
pub mod errors;
pub mod model;
pub mod options;
pub mod partition;
pub mod selection;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::dynp::{CostCache, DynamicProgram, Partition, PartitionSweep};
pub use self::elasticity::{
    ElasticityOptions, ElasticityTable, NORMAL_95, SegmentElasticity, compute_beveridge_elasticity,
    elasticity_table, estimate_segments, segment_fitted_values,
};
pub use self::errors::{BreakError, BreakResult};
pub use self::model::{LinearSegmentModel, SegmentFit, SegmentModel, SegmentScore};
pub use self::options::{
    BreakCount, BreakSearchOptions, CostModelKind, MinSegmentSize, SelectionCriterion,
    check_feasible,
};
pub use self::partition::{Breakpoints, Partitioner};
pub use self::selection::{
    BreakDiagnostics, DiagnosticsOptions, FTestOutcome, evaluate_num_breaks, evaluate_with, f_test,
    search_breakpoints,
};

// ---- Optional convenience prelude for downstream crates ------------------

pub mod prelude {
    pub use super::elasticity::{ElasticityOptions, ElasticityTable, compute_beveridge_elasticity};
    pub use super::errors::{BreakError, BreakResult};
    pub use super::options::{BreakCount, BreakSearchOptions, MinSegmentSize, SelectionCriterion};
    pub use super::partition::Breakpoints;
    pub use super::selection::{BreakDiagnostics, DiagnosticsOptions, evaluate_num_breaks};
}
