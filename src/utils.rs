//! Conversion helpers for the PyO3 boundary.
//!
//! Python callers pass array-likes and string/number options; these helpers
//! turn them into the validated Rust option types so that `lib.rs` only
//! dispatches.
#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    breaks::{BreakCount, MinSegmentSize, SelectionCriterion},
    inference::{HACOptions, HacLagPolicy, KernelType},
    series::Signal,
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Copy a Python array-like into an owned `Array1<f64>`.
#[cfg(feature = "python-bindings")]
pub fn extract_array1<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>, name: &str,
) -> PyResult<Array1<f64>> {
    let arr = extract_f64_array(py, raw_data)?;
    let slice = arr.as_slice().map_err(|_| {
        PyValueError::new_err(format!("{name} must be a 1-D contiguous float64 array or sequence"))
    })?;
    Ok(Array1::from(slice.to_vec()))
}

/// Build the Beveridge signal `[log_v, log_u, 1]` from aligned log arrays.
#[cfg(feature = "python-bindings")]
pub fn extract_signal<'py>(
    py: Python<'py>, log_v: &Bound<'py, PyAny>, log_u: &Bound<'py, PyAny>,
) -> PyResult<Signal> {
    let log_v = extract_array1(py, log_v, "log_v")?;
    let log_u = extract_array1(py, log_u, "log_u")?;
    Ok(Signal::beveridge(&log_v, &log_u)?)
}

/// `min_size` as an absolute count when given, else `min_fraction`, else
/// `None` so the caller's defaults apply.
#[cfg(feature = "python-bindings")]
pub fn extract_min_size(
    min_size: Option<usize>, min_fraction: Option<f64>,
) -> PyResult<Option<MinSegmentSize>> {
    match (min_size, min_fraction) {
        (Some(_), Some(_)) => {
            Err(PyValueError::new_err("pass at most one of min_size and min_fraction"))
        }
        (Some(size), None) => Ok(Some(MinSegmentSize::Absolute(size))),
        (None, Some(fraction)) => Ok(Some(MinSegmentSize::Fraction(fraction))),
        (None, None) => Ok(None),
    }
}

/// Parse a selection criterion name (`"bic"`, `"lwz"`, `"f"`).
#[cfg(feature = "python-bindings")]
pub fn extract_criterion(name: &str, alpha: f64) -> PyResult<SelectionCriterion> {
    match name.to_ascii_lowercase().as_str() {
        "bic" => Ok(SelectionCriterion::Bic),
        "lwz" => Ok(SelectionCriterion::Lwz),
        "f" | "sequential_f" | "supf" => Ok(SelectionCriterion::SequentialF { alpha }),
        other => Err(PyValueError::new_err(format!(
            "invalid criterion {:?} (expected 'bic', 'lwz', or 'f')",
            other
        ))),
    }
}

/// Fixed count when `n_breaks` is given, otherwise selection by `criterion`
/// when one is named, otherwise `None`.
#[cfg(feature = "python-bindings")]
pub fn extract_break_count(
    n_breaks: Option<usize>, max_breaks: usize, criterion: Option<&str>, alpha: f64,
) -> PyResult<Option<BreakCount>> {
    match (n_breaks, criterion) {
        (Some(_), Some(_)) => {
            Err(PyValueError::new_err("pass either n_breaks or criterion, not both"))
        }
        (Some(k), None) => Ok(Some(BreakCount::Fixed(k))),
        (None, Some(name)) => {
            let criterion = extract_criterion(name, alpha)?;
            Ok(Some(BreakCount::Select { max_breaks, criterion }))
        }
        (None, None) => Ok(None),
    }
}

#[cfg(feature = "python-bindings")]
pub fn extract_hac_options(
    kernel: Option<&str>, bandwidth: Option<usize>, center: Option<bool>,
    small_sample_correction: Option<bool>,
) -> PyResult<HACOptions> {
    let kernel_str = kernel.unwrap_or("bartlett");
    let kernel_type = KernelType::from_name(kernel_str).ok_or_else(|| {
        PyValueError::new_err(format!(
            "invalid HAC kernel {:?} (expected 'iid', 'bartlett', 'parzen', or 'qs')",
            kernel_str
        ))
    })?;

    let center_val = center.unwrap_or(false);
    let ssc_val = small_sample_correction.unwrap_or(true);

    Ok(HACOptions::new(bandwidth, kernel_type, center_val, ssc_val))
}

/// Parse a lag policy name; `"fixed"` requires `lags`.
#[cfg(feature = "python-bindings")]
pub fn extract_lag_policy(policy: Option<&str>, lags: Option<usize>) -> PyResult<HacLagPolicy> {
    let policy_str = policy.unwrap_or("per_segment").to_lowercase();
    match policy_str.as_str() {
        "per_segment" | "segment" => Ok(HacLagPolicy::PerSegment),
        "full_sample" | "full" => Ok(HacLagPolicy::FullSample),
        "plug_in" | "plugin" | "andrews" => Ok(HacLagPolicy::PlugIn),
        "fixed" => {
            let lags = lags.ok_or_else(|| {
                PyValueError::new_err("lags must be provided when lag_policy='fixed'")
            })?;
            Ok(HacLagPolicy::Fixed(lags))
        }
        other => Err(PyValueError::new_err(format!(
            "invalid lag policy {:?} (expected 'per_segment', 'full_sample', 'plug_in' or 'fixed')",
            other
        ))),
    }
}
