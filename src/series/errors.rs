//! Errors raised while building, aggregating, and aligning rate series.
//!
//! Purpose
//! -------
//! Collect every failure that can occur before a [`Signal`](crate::series::Signal)
//! exists: malformed date/value pairs, series that share no usable window,
//! interior holes inside the common window, and rates that cannot be logged.
//! Together these form the "alignment error" family of the crate; they are
//! wrapped by the break-search and economics error types further downstream.
//!
//! Conventions
//! -----------
//! - Indices reported in variants refer to positions in the series the
//!   caller passed in (or in the joined series for alignment variants).
//! - `SeriesResult<T>` is the standard return type of the `series` module.

use chrono::NaiveDate;

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type SeriesResult<T> = Result<T, SeriesError>;

/// SeriesError — failures in series construction and preprocessing.
///
/// Variants
/// --------
/// - `LengthMismatch`: dates and values (or two paired arrays) differ in length.
/// - `UnsortedDates`: dates are not strictly increasing at `index`.
/// - `InvalidDate`: a calendar date could not be formed.
/// - `EmptySeries`: the input has no observations.
/// - `NoOverlap`: the two series share no date where both values are valid.
/// - `InteriorGap`: a missing value sits strictly inside the common window.
/// - `TooShort`: the aligned length is below the caller's feasibility floor.
/// - `NonPositiveValue`: a rate is `<= 0` and cannot be logged.
/// - `NonFiniteValue`: a signal entry is NaN or infinite.
/// - `TooFewColumns`: a signal has no regressor column.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesError {
    // ---- Construction ----
    LengthMismatch { expected: usize, actual: usize },
    UnsortedDates { index: usize },
    InvalidDate { year: i32, month: u32 },
    EmptySeries,

    // ---- Alignment ----
    NoOverlap,
    InteriorGap { index: usize, date: NaiveDate },
    TooShort { length: usize, required: usize },

    // ---- Values ----
    NonPositiveValue { index: usize, value: f64 },
    NonFiniteValue { row: usize, col: usize, value: f64 },
    TooFewColumns { ncols: usize },
}

impl std::error::Error for SeriesError {}

impl std::fmt::Display for SeriesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Construction ----
            SeriesError::LengthMismatch { expected, actual } => {
                write!(f, "Length mismatch: expected {expected}, found {actual}")
            }
            SeriesError::UnsortedDates { index } => {
                write!(f, "Dates must be strictly increasing (violated at index {index})")
            }
            SeriesError::InvalidDate { year, month } => {
                write!(f, "Invalid calendar date: year {year}, month {month}")
            }
            SeriesError::EmptySeries => write!(f, "Series must contain at least one observation"),

            // ---- Alignment ----
            SeriesError::NoOverlap => {
                write!(f, "Alignment error: series share no overlapping valid range")
            }
            SeriesError::InteriorGap { index, date } => write!(
                f,
                "Alignment error: missing value inside the common range at index {index} ({date})"
            ),
            SeriesError::TooShort { length, required } => write!(
                f,
                "Alignment error: aligned length {length} is below the required minimum {required}"
            ),

            // ---- Values ----
            SeriesError::NonPositiveValue { index, value } => {
                write!(f, "Cannot take the log of non-positive rate {value} at index {index}")
            }
            SeriesError::NonFiniteValue { row, col, value } => {
                write!(f, "Non-finite signal entry {value} at ({row}, {col})")
            }
            SeriesError::TooFewColumns { ncols } => write!(
                f,
                "Signal needs a dependent column and at least one regressor, found {ncols} columns"
            ),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<SeriesError> for PyErr {
    fn from(err: SeriesError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
