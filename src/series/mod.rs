//! series — dated rate series, alignment, and the regression signal.
//!
//! Purpose
//! -------
//! Prepare published unemployment and vacancy rates for the structural-break
//! engine: validate dated observations, normalize percentages, aggregate to
//! quarters, align two series on their common valid window, and take logs.
//!
//! Key behaviors
//! -------------
//! - [`TimeSeries`] stores strictly increasing dates with NaN-encoded gaps
//!   and provides quarterly mean/sum aggregation.
//! - [`prepare_log_rates`] runs the full normalize → aggregate → align → log
//!   pipeline and returns [`LogRates`].
//! - [`Signal`] is the `[dependent, regressors…]` table consumed by `breaks`.
//!
//! Invariants & assumptions
//! ------------------------
//! - No function here mutates its inputs.
//! - A [`Signal`] contains only finite entries.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule; the end-to-end pipeline is
//!   exercised by the crate's integration tests.

pub mod errors;
pub mod preprocess;
pub mod signal;
pub mod time_series;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::errors::{SeriesError, SeriesResult};
pub use self::preprocess::{
    LogRates, PreprocessOptions, align_pair, is_percent, normalize_rates, prepare_log_rates,
};
pub use self::signal::Signal;
pub use self::time_series::{TimeSeries, quarter_end};
