//! series::signal — the regression table consumed by the break search.
//!
//! A [`Signal`] is a `T×(q+1)` matrix: column 0 is the dependent variable and
//! columns `1..=q` are regressors. For the Beveridge curve the layout is
//! `[log_v, log_u, 1]`. Every entry is finite; missing data has already been
//! trimmed away by preprocessing.

use crate::series::errors::{SeriesError, SeriesResult};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, s};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    data: Array2<f64>,
}

impl Signal {
    /// Wrap an existing table, checking it has at least one regressor and
    /// only finite entries.
    pub fn new(data: Array2<f64>) -> SeriesResult<Self> {
        if data.ncols() < 2 {
            return Err(SeriesError::TooFewColumns { ncols: data.ncols() });
        }
        if data.nrows() == 0 {
            return Err(SeriesError::EmptySeries);
        }
        if let Some(((row, col), &value)) = data.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(SeriesError::NonFiniteValue { row, col, value });
        }
        Ok(Signal { data })
    }

    /// Build the Beveridge layout `[log_v, log_u, 1]`.
    pub fn beveridge(log_v: &Array1<f64>, log_u: &Array1<f64>) -> SeriesResult<Self> {
        if log_v.len() != log_u.len() {
            return Err(SeriesError::LengthMismatch { expected: log_v.len(), actual: log_u.len() });
        }
        let mut data = Array2::<f64>::ones((log_v.len(), 3));
        data.column_mut(0).assign(log_v);
        data.column_mut(1).assign(log_u);
        Signal::new(data)
    }

    /// Number of observations `T`.
    pub fn n_obs(&self) -> usize {
        self.data.nrows()
    }

    /// Number of regressors `q` (intercept included).
    pub fn n_regressors(&self) -> usize {
        self.data.ncols() - 1
    }

    pub fn dependent(&self) -> ArrayView1<'_, f64> {
        self.data.column(0)
    }

    pub fn regressors(&self) -> ArrayView2<'_, f64> {
        self.data.slice(s![.., 1..])
    }

    /// Dependent values on rows `[start, end)`.
    pub fn dependent_range(&self, start: usize, end: usize) -> ArrayView1<'_, f64> {
        self.data.slice(s![start..end, 0])
    }

    /// Regressor rows `[start, end)`.
    pub fn regressors_range(&self, start: usize, end: usize) -> ArrayView2<'_, f64> {
        self.data.slice(s![start..end, 1..])
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // The Beveridge layout places log_v first, log_u second, ones last.
    fn beveridge_layout_matches_dependent_then_regressors() {
        let sig = Signal::beveridge(&array![-3.0, -2.5], &array![-2.9, -3.1]).unwrap();

        assert_eq!(sig.n_obs(), 2);
        assert_eq!(sig.n_regressors(), 2);
        assert_eq!(sig.dependent().to_vec(), vec![-3.0, -2.5]);
        assert_eq!(sig.regressors(), array![[-2.9, 1.0], [-3.1, 1.0]]);
    }

    #[test]
    fn new_rejects_non_finite_entries() {
        let res = Signal::new(array![[1.0, 1.0], [f64::NAN, 1.0]]);
        assert!(matches!(res, Err(SeriesError::NonFiniteValue { row: 1, col: 0, .. })));
    }

    #[test]
    fn new_rejects_single_column() {
        let res = Signal::new(array![[1.0], [2.0]]);
        assert_eq!(res, Err(SeriesError::TooFewColumns { ncols: 1 }));
    }

    #[test]
    fn range_views_select_half_open_rows() {
        let sig = Signal::beveridge(&array![1.0, 2.0, 3.0, 4.0], &array![5.0, 6.0, 7.0, 8.0])
            .unwrap();

        assert_eq!(sig.dependent_range(1, 3).to_vec(), vec![2.0, 3.0]);
        assert_eq!(sig.regressors_range(2, 4), array![[7.0, 1.0], [8.0, 1.0]]);
    }
}
