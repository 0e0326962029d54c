//! series::time_series — dated observations with NaN-encoded gaps.
//!
//! Purpose
//! -------
//! Hold one labor-market series (an unemployment rate, a vacancy rate, a
//! level of unemployed persons, …) as strictly increasing calendar dates
//! paired with `f64` values. Missing observations are stored as `NaN` so
//! that leading and trailing gaps survive until alignment trims them.
//!
//! Key behaviors
//! -------------
//! - Validate date ordering and length agreement at construction.
//! - Build monthly or quarterly series from a start period.
//! - Aggregate monthly data to calendar quarters (mean or sum), labelling
//!   each quarter by its last day.
//! - Locate the first/last valid (finite) observation.
//!
//! Invariants & assumptions
//! ------------------------
//! - `dates.len() == values.len()` and dates are strictly increasing.
//! - A value is "valid" iff it is finite.
//! - A `TimeSeries` is never mutated in place by library code; every
//!   transformation returns a fresh series.
//!
//! Conventions
//! -----------
//! - Monthly observations are dated on the first day of the month.
//! - Quarterly observations are dated on the last day of the quarter
//!   (`03-31`, `06-30`, `09-30`, `12-31`).

use crate::series::errors::{SeriesError, SeriesResult};
use chrono::{Datelike, Months, NaiveDate};
use ndarray::Array1;

/// TimeSeries — strictly increasing dates paired with `f64` observations.
///
/// Fields are private so the ordering invariant cannot be broken after
/// construction; use [`TimeSeries::dates`] and [`TimeSeries::values`] for
/// read access.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    dates: Vec<NaiveDate>,
    values: Array1<f64>,
}

impl TimeSeries {
    /// Build a validated series.
    ///
    /// Errors
    /// ------
    /// - `SeriesError::LengthMismatch` if the two inputs differ in length.
    /// - `SeriesError::UnsortedDates` if dates are not strictly increasing.
    pub fn new(dates: Vec<NaiveDate>, values: Array1<f64>) -> SeriesResult<Self> {
        if dates.len() != values.len() {
            return Err(SeriesError::LengthMismatch {
                expected: dates.len(),
                actual: values.len(),
            });
        }
        if let Some(pos) = dates.windows(2).position(|w| w[0] >= w[1]) {
            return Err(SeriesError::UnsortedDates { index: pos + 1 });
        }
        Ok(TimeSeries { dates, values })
    }

    /// Build a monthly series whose first observation falls in
    /// `start_year`-`start_month`. Dates are first-of-month.
    pub fn monthly(start_year: i32, start_month: u32, values: Array1<f64>) -> SeriesResult<Self> {
        let start = NaiveDate::from_ymd_opt(start_year, start_month, 1)
            .ok_or(SeriesError::InvalidDate { year: start_year, month: start_month })?;
        let dates = (0..values.len())
            .map(|i| {
                start.checked_add_months(Months::new(i as u32)).ok_or(SeriesError::InvalidDate {
                    year: start_year,
                    month: start_month + i as u32,
                })
            })
            .collect::<SeriesResult<Vec<_>>>()?;
        TimeSeries::new(dates, values)
    }

    /// Build a quarterly series starting in `start_year`Q`start_quarter`.
    /// Dates are quarter-end.
    pub fn quarterly(
        start_year: i32, start_quarter: u32, values: Array1<f64>,
    ) -> SeriesResult<Self> {
        if !(1..=4).contains(&start_quarter) {
            return Err(SeriesError::InvalidDate { year: start_year, month: start_quarter * 3 });
        }
        let first_month = (start_quarter - 1) * 3 + 1;
        let start = NaiveDate::from_ymd_opt(start_year, first_month, 1)
            .ok_or(SeriesError::InvalidDate { year: start_year, month: first_month })?;
        let dates = (0..values.len())
            .map(|i| {
                start
                    .checked_add_months(Months::new(3 * i as u32))
                    .map(quarter_end)
                    .ok_or(SeriesError::InvalidDate { year: start_year, month: first_month })
            })
            .collect::<SeriesResult<Vec<_>>>()?;
        TimeSeries::new(dates, values)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// Index of the first finite observation, if any.
    pub fn first_valid_index(&self) -> Option<usize> {
        self.values.iter().position(|v| v.is_finite())
    }

    /// Index of the last finite observation, if any.
    pub fn last_valid_index(&self) -> Option<usize> {
        self.values.iter().rposition(|v| v.is_finite())
    }

    /// Apply `f` elementwise, keeping the dates.
    pub fn map_values<F: Fn(f64) -> f64>(&self, f: F) -> TimeSeries {
        TimeSeries { dates: self.dates.clone(), values: self.values.mapv(f) }
    }

    /// Replace the values, keeping the dates.
    pub fn with_values(&self, values: Array1<f64>) -> SeriesResult<TimeSeries> {
        TimeSeries::new(self.dates.clone(), values)
    }

    /// Average of the finite observations in each calendar quarter.
    ///
    /// A quarter with no finite observation is `NaN`.
    pub fn quarterly_mean(&self) -> TimeSeries {
        self.aggregate_quarters(|valid, _| {
            if valid.is_empty() { f64::NAN } else { valid.iter().sum::<f64>() / valid.len() as f64 }
        })
    }

    /// Sum of the observations in each calendar quarter.
    ///
    /// Notes
    /// -----
    /// - A quarter containing any missing observation is `NaN`.
    pub fn quarterly_sum(&self) -> TimeSeries {
        self.aggregate_quarters(|valid, total| {
            if valid.is_empty() || valid.len() != total {
                f64::NAN
            } else {
                valid.iter().sum::<f64>()
            }
        })
    }

    // ---- Helper methods ----

    /// Group consecutive observations by calendar quarter and reduce each
    /// group with `reduce(finite_values, group_len)`.
    fn aggregate_quarters<F>(&self, reduce: F) -> TimeSeries
    where
        F: Fn(&[f64], usize) -> f64,
    {
        let mut dates = Vec::new();
        let mut values = Vec::new();
        let mut start = 0;
        while start < self.len() {
            let label = quarter_end(self.dates[start]);
            let mut end = start + 1;
            while end < self.len() && quarter_end(self.dates[end]) == label {
                end += 1;
            }
            let valid: Vec<f64> =
                (start..end).map(|i| self.values[i]).filter(|v| v.is_finite()).collect();
            dates.push(label);
            values.push(reduce(&valid, end - start));
            start = end;
        }
        TimeSeries { dates, values: Array1::from(values) }
    }
}

/// Last calendar day of the quarter containing `date`.
pub fn quarter_end(date: NaiveDate) -> NaiveDate {
    let quarter_first_month = (date.month0() / 3) * 3 + 1;
    NaiveDate::from_ymd_opt(date.year(), quarter_first_month, 1)
        .and_then(|first| first.checked_add_months(Months::new(3)))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}
