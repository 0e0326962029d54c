//! rust_beveridge — structural breaks in the Beveridge curve, with Python
//! bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the breakpoint search and its diagnostics to Python via the
//! `_rust_beveridge` extension module.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules: `series` (alignment and log rates),
//!   `inference` (OLS with HAC standard errors), `optimization` (scalar root
//!   finding), `breaks` (changepoint search, diagnostics, elasticity table),
//!   and `economics` (job rates, DMP, sufficient statistics).
//! - Define `#[pyclass]` wrappers, `#[pyfunction]`s and the `#[pymodule]`
//!   initializer for the `_rust_beveridge` Python extension.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner Rust modules; this file performs
//!   only FFI glue, input conversion and error mapping.
//! - Python entry points take already aligned `log v` and `log u` arrays;
//!   date handling stays on the Python side.
//!
//! Conventions
//! -----------
//! - Python-exposed items live under `_rust_beveridge.breaks` and are
//!   wrapped by thin pure-Python facades.
//! - Errors from core Rust code are converted to `ValueError` at the PyO3
//!   boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code depends directly on the inner modules and can ignore
//!   the items guarded by the `python-bindings` feature.
//!
//! Testing notes
//! -------------
//! - Core behavior is covered by unit tests in the inner modules and by the
//!   integration tests under `tests/`.

pub mod breaks;
pub mod economics;
pub mod inference;
pub mod optimization;
pub mod series;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::prelude::*;

#[cfg(feature = "python-bindings")]
use crate::{
    breaks::{
        BreakDiagnostics, BreakSearchOptions, Breakpoints, CostModelKind, DiagnosticsOptions,
        DynamicProgram, LinearSegmentModel, SegmentElasticity, estimate_segments,
        evaluate_num_breaks, search_breakpoints,
    },
    utils::{
        extract_break_count, extract_criterion, extract_hac_options, extract_lag_policy,
        extract_min_size, extract_signal,
    },
};

/// BreakDiagnostics — Python-facing view of the break-count diagnostics.
///
/// Every list is indexed by the number of breaks `m = 0..=max_breaks`.
/// F-test entries are `None` at `m = 0` and otherwise
/// `(statistic, p_value)` pairs.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "BreakDiagnostics", module = "rust_beveridge.breaks")]
pub struct PyBreakDiagnostics {
    inner: BreakDiagnostics,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyBreakDiagnostics {
    #[getter]
    pub fn max_breaks(&self) -> usize {
        self.inner.max_breaks()
    }

    #[getter]
    pub fn ssr(&self) -> Vec<f64> {
        self.inner.ssr.clone()
    }

    #[getter]
    pub fn bic(&self) -> Vec<f64> {
        self.inner.bic.clone()
    }

    #[getter]
    pub fn lwz(&self) -> Vec<f64> {
        self.inner.lwz.clone()
    }

    #[getter]
    pub fn breakpoints(&self) -> Vec<Vec<usize>> {
        self.inner.breakpoints.iter().map(|b| b.as_slice().to_vec()).collect()
    }

    #[getter]
    pub fn f_vs_zero(&self) -> Vec<Option<(f64, f64)>> {
        self.inner.f_vs_zero.iter().map(|t| t.as_ref().map(|t| (t.statistic, t.p_value))).collect()
    }

    #[getter]
    pub fn f_sequential(&self) -> Vec<Option<(f64, f64)>> {
        self.inner
            .f_sequential
            .iter()
            .map(|t| t.as_ref().map(|t| (t.statistic, t.p_value)))
            .collect()
    }

    /// Break count chosen by `criterion` (`"bic"`, `"lwz"` or `"f"`).
    #[pyo3(signature = (criterion = "bic", alpha = 0.05))]
    pub fn select(&self, criterion: &str, alpha: f64) -> PyResult<usize> {
        Ok(self.inner.select(extract_criterion(criterion, alpha)?))
    }
}

/// SegmentEstimates — per-segment elasticities as parallel columns.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "SegmentEstimates", module = "rust_beveridge.breaks")]
pub struct PySegmentEstimates {
    inner: Vec<SegmentElasticity>,
}

#[cfg(feature = "python-bindings")]
impl PySegmentEstimates {
    fn column<T, F: Fn(&SegmentElasticity) -> T>(&self, f: F) -> Vec<T> {
        self.inner.iter().map(f).collect()
    }
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PySegmentEstimates {
    #[getter]
    pub fn start(&self) -> Vec<usize> {
        self.column(|s| s.start)
    }

    #[getter]
    pub fn end(&self) -> Vec<usize> {
        self.column(|s| s.end)
    }

    #[getter]
    pub fn elasticity(&self) -> Vec<f64> {
        self.column(|s| s.elasticity)
    }

    #[getter]
    pub fn std_error(&self) -> Vec<f64> {
        self.column(|s| s.std_error)
    }

    #[getter]
    pub fn intercept(&self) -> Vec<f64> {
        self.column(|s| s.intercept)
    }

    #[getter]
    pub fn lags(&self) -> Vec<usize> {
        self.column(|s| s.lags)
    }

    #[getter]
    pub fn lower(&self) -> Vec<f64> {
        self.column(|s| s.lower)
    }

    #[getter]
    pub fn upper(&self) -> Vec<f64> {
        self.column(|s| s.upper)
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }
}

/// Optimal breakpoints `[0, b₁, …, T]` of the Beveridge regression.
///
/// With `use_defaults=True` (the default) the reference configuration
/// applies: `L = ⌊0.15·T⌋` and 5 breaks. Otherwise `min_size` or
/// `min_fraction` is required and the count is either `n_breaks` or chosen
/// by `criterion` among `0..=max_breaks`.
#[cfg(feature = "python-bindings")]
#[pyfunction(name = "search_breakpoints")]
#[pyo3(signature = (
    log_v, log_u, min_size = None, min_fraction = None, n_breaks = None, max_breaks = 5,
    criterion = None, alpha = 0.05, use_defaults = true
))]
#[allow(clippy::too_many_arguments)]
pub fn py_search_breakpoints<'py>(
    py: Python<'py>, log_v: &Bound<'py, PyAny>, log_u: &Bound<'py, PyAny>,
    min_size: Option<usize>, min_fraction: Option<f64>, n_breaks: Option<usize>,
    max_breaks: usize, criterion: Option<&str>, alpha: f64, use_defaults: bool,
) -> PyResult<Vec<usize>> {
    let signal = extract_signal(py, log_v, log_u)?;
    let opts = BreakSearchOptions::new(
        CostModelKind::Linear,
        extract_min_size(min_size, min_fraction)?,
        extract_break_count(n_breaks, max_breaks, criterion, alpha)?,
        use_defaults,
    )?;
    let dp = DynamicProgram::new(LinearSegmentModel::default());
    let breakpoints = search_breakpoints(&dp, &signal, &opts)?;
    Ok(breakpoints.into_vec())
}

/// SSR, BIC, LWZ and F-tests for every break count up to `max_breaks`.
#[cfg(feature = "python-bindings")]
#[pyfunction(name = "evaluate_num_breaks")]
#[pyo3(signature = (log_v, log_u, max_breaks = 5, min_size = None, min_fraction = None))]
pub fn py_evaluate_num_breaks<'py>(
    py: Python<'py>, log_v: &Bound<'py, PyAny>, log_u: &Bound<'py, PyAny>, max_breaks: usize,
    min_size: Option<usize>, min_fraction: Option<f64>,
) -> PyResult<PyBreakDiagnostics> {
    let signal = extract_signal(py, log_v, log_u)?;
    let min_size = extract_min_size(min_size, min_fraction)?.unwrap_or_default();
    let opts = DiagnosticsOptions::new(max_breaks, min_size)?;
    let inner = evaluate_num_breaks(&signal, &opts)?;
    Ok(PyBreakDiagnostics { inner })
}

/// Segment-wise elasticities with HAC bands for given breakpoints.
#[cfg(feature = "python-bindings")]
#[pyfunction(name = "segment_elasticities")]
#[pyo3(signature = (log_v, log_u, breakpoints, kernel = None, lag_policy = None, lags = None))]
pub fn py_segment_elasticities<'py>(
    py: Python<'py>, log_v: &Bound<'py, PyAny>, log_u: &Bound<'py, PyAny>,
    breakpoints: Vec<usize>, kernel: Option<&str>, lag_policy: Option<&str>,
    lags: Option<usize>,
) -> PyResult<PySegmentEstimates> {
    let signal = extract_signal(py, log_v, log_u)?;
    let hac = extract_hac_options(kernel, None, None, None)?;
    let model = LinearSegmentModel::new(hac, extract_lag_policy(lag_policy, lags)?);
    let breakpoints = Breakpoints::new(breakpoints, signal.n_obs(), 1)?;
    let inner = estimate_segments(&model, &signal, &breakpoints)?;
    Ok(PySegmentEstimates { inner })
}

/// _rust_beveridge — PyO3 module initializer for the Python extension.
///
/// Creates the `breaks` submodule, attaches it to the parent module and
/// registers it in `sys.modules` so that dotted imports work.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_beveridge<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let breaks_mod = PyModule::new(_py, "breaks")?;
    breaks(_py, m, &breaks_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?.getattr("modules")?.set_item("rust_beveridge.breaks", breaks_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn breaks<'py>(
    _py: Python, rust_beveridge: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<PyBreakDiagnostics>()?;
    m.add_class::<PySegmentEstimates>()?;
    m.add_function(wrap_pyfunction!(py_search_breakpoints, m)?)?;
    m.add_function(wrap_pyfunction!(py_evaluate_num_breaks, m)?)?;
    m.add_function(wrap_pyfunction!(py_segment_elasticities, m)?)?;
    rust_beveridge.add_submodule(m)?;
    Ok(())
}
