//! Shape and domain checks shared by the economics formulas.
//!
//! Every formula takes per-period inputs as 1-D arrays. An input of length
//! 1 is broadcast over the periods; any other length must equal the common
//! period count.
use crate::economics::errors::{EconError, EconResult};
use ndarray::ArrayView1;

/// Common period count of named input lengths, with length-1 broadcasting.
pub fn period_count(lengths: &[(&'static str, usize)]) -> EconResult<usize> {
    let n = lengths.iter().map(|&(_, len)| len).max().unwrap_or(0);
    for &(quantity, len) in lengths {
        if len != 1 && len != n {
            return Err(EconError::LengthMismatch { quantity, expected: n, actual: len });
        }
    }
    Ok(n)
}

/// Value of a (possibly broadcast) input in period `t`.
#[inline]
pub fn at(values: &ArrayView1<'_, f64>, t: usize) -> f64 {
    if values.len() == 1 { values[0] } else { values[t] }
}

/// Reject `value` unless `ok(value)` holds; NaN never passes.
pub fn require(
    quantity: &'static str, index: usize, value: f64, ok: impl Fn(f64) -> bool,
    reason: &'static str,
) -> EconResult<f64> {
    if value.is_nan() || !ok(value) {
        return Err(EconError::Domain { quantity, index, value, reason });
    }
    Ok(value)
}

/// `value ∈ (0, 1)`.
pub fn unit_interval(quantity: &'static str, index: usize, value: f64) -> EconResult<f64> {
    require(quantity, index, value, |x| x > 0.0 && x < 1.0, "must lie in (0, 1)")
}

/// `value > 0` and finite.
pub fn positive(quantity: &'static str, index: usize, value: f64) -> EconResult<f64> {
    require(quantity, index, value, |x| x > 0.0 && x.is_finite(), "must be positive and finite")
}

/// `value ≥ 0` and finite.
pub fn non_negative(quantity: &'static str, index: usize, value: f64) -> EconResult<f64> {
    let ok = |x: f64| x >= 0.0 && x.is_finite();
    require(quantity, index, value, ok, "must be non-negative and finite")
}
