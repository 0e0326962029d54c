//! breaks::options — configuration of the structural-break search.
//!
//! Purpose
//! -------
//! Explicit, validated settings for the break search: which segment cost
//! to use, how long a segment must be, and how the number of breaks is
//! chosen. The published elasticities use the reference configuration.
//!
//! Key behaviors
//! -------------
//! - [`BreakSearchOptions::new`] validates every field at construction.
//! - The `use_defaults` flag fills unspecified fields with the reference
//!   configuration (`L = ⌊0.15·T⌋`, `k = 5`, linear cost). It never
//!   overrides an explicit value: an explicit value that disagrees with the
//!   default is rejected as [`BreakError::InvalidOptions`].
//! - Without the flag, an unspecified break count falls back to selection by
//!   [`SelectionCriterion::Bic`] over `0..=DEFAULT_MAX_BREAKS`.
//!
//! Conventions
//! -----------
//! - Minimum sizes expressed as a fraction are resolved against the aligned
//!   sample length `T` with `⌊fraction·T⌋`.
use crate::breaks::errors::{BreakError, BreakResult};

/// Reference trimming fraction for the minimum segment size.
pub const DEFAULT_MIN_FRACTION: f64 = 0.15;

/// Reference number of breaks.
pub const DEFAULT_N_BREAKS: usize = 5;

/// Upper bound of the selection range when no break count is given.
pub const DEFAULT_MAX_BREAKS: usize = 5;

/// Segment cost family.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CostModelKind {
    /// RSS of an OLS fit of column 0 on the remaining columns.
    #[default]
    Linear,
}

/// Minimum number of rows per segment.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MinSegmentSize {
    /// `⌊fraction·T⌋`, with `0 < fraction < 1`.
    Fraction(f64),
    /// A fixed row count `≥ 1`.
    Absolute(usize),
}

impl MinSegmentSize {
    /// Resolve to a row count for a sample of `n_obs` rows.
    ///
    /// Errors
    /// ------
    /// - `BreakError::InfeasibleConfiguration` if the resolved size is 0.
    pub fn resolve(&self, n_obs: usize) -> BreakResult<usize> {
        let size = match *self {
            MinSegmentSize::Fraction(frac) => (frac * n_obs as f64).floor() as usize,
            MinSegmentSize::Absolute(size) => size,
        };
        if size == 0 {
            return Err(BreakError::InfeasibleConfiguration {
                n_obs,
                min_size: size,
                n_breaks: 0,
                reason: "minimum segment size resolves to zero rows",
            });
        }
        Ok(size)
    }

    pub(crate) fn validate(&self) -> BreakResult<()> {
        match *self {
            MinSegmentSize::Fraction(frac) if !(frac > 0.0 && frac < 1.0) => {
                Err(BreakError::InvalidOptions {
                    field: "min_size",
                    reason: "fraction must be in (0, 1)",
                })
            }
            MinSegmentSize::Absolute(0) => {
                Err(BreakError::InvalidOptions { field: "min_size", reason: "must be at least 1" })
            }
            _ => Ok(()),
        }
    }
}

impl Default for MinSegmentSize {
    fn default() -> Self {
        MinSegmentSize::Fraction(DEFAULT_MIN_FRACTION)
    }
}

/// Rule used to pick the number of breaks from the diagnostics.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SelectionCriterion {
    /// Break count minimizing BIC.
    #[default]
    Bic,
    /// Break count minimizing the Liu–Wu–Zidek criterion.
    Lwz,
    /// Largest `m` such that every sequential test `ℓ vs ℓ−1`, `ℓ = 1..=m`,
    /// rejects at level `alpha`.
    SequentialF { alpha: f64 },
}

/// Fixed or data-driven number of breaks.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BreakCount {
    Fixed(usize),
    Select { max_breaks: usize, criterion: SelectionCriterion },
}

impl BreakCount {
    /// Largest break count the search has to consider.
    pub fn max_breaks(&self) -> usize {
        match *self {
            BreakCount::Fixed(k) => k,
            BreakCount::Select { max_breaks, .. } => max_breaks,
        }
    }

    pub(crate) fn validate(&self) -> BreakResult<()> {
        match *self {
            BreakCount::Select { criterion: SelectionCriterion::SequentialF { alpha }, .. }
                if !(alpha > 0.0 && alpha < 1.0) =>
            {
                Err(BreakError::InvalidOptions {
                    field: "criterion",
                    reason: "alpha must be in (0, 1)",
                })
            }
            _ => Ok(()),
        }
    }
}

/// BreakSearchOptions — validated configuration of the break search.
///
/// Fields
/// ------
/// - `model`: segment cost family.
/// - `min_size`: minimum segment length `L`.
/// - `n_breaks`: fixed `k` or a selection rule.
/// - `use_defaults`: whether unspecified fields took the reference values.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct BreakSearchOptions {
    pub model: CostModelKind,
    pub min_size: MinSegmentSize,
    pub n_breaks: BreakCount,
    pub use_defaults: bool,
}

impl BreakSearchOptions {
    /// Build and validate search options.
    ///
    /// Parameters
    /// ----------
    /// - `model`: segment cost family.
    /// - `min_size`: explicit minimum size, or `None`.
    /// - `n_breaks`: explicit break count or selection rule, or `None`.
    /// - `use_defaults`: fill `None` fields with the reference configuration.
    ///
    /// Errors
    /// ------
    /// - `BreakError::InvalidOptions` if a value is out of range, if
    ///   `use_defaults` is set together with an explicit value that differs
    ///   from the reference one, or if `min_size` is missing while
    ///   `use_defaults` is off.
    pub fn new(
        model: CostModelKind, min_size: Option<MinSegmentSize>, n_breaks: Option<BreakCount>,
        use_defaults: bool,
    ) -> BreakResult<BreakSearchOptions> {
        let (min_size, n_breaks) = if use_defaults {
            let reference_size = MinSegmentSize::default();
            let reference_count = BreakCount::Fixed(DEFAULT_N_BREAKS);
            if min_size.is_some_and(|size| size != reference_size) {
                return Err(BreakError::InvalidOptions {
                    field: "min_size",
                    reason: "conflicts with the reference defaults",
                });
            }
            if n_breaks.is_some_and(|count| count != reference_count) {
                return Err(BreakError::InvalidOptions {
                    field: "n_breaks",
                    reason: "conflicts with the reference defaults",
                });
            }
            (reference_size, reference_count)
        } else {
            let min_size = min_size.ok_or(BreakError::InvalidOptions {
                field: "min_size",
                reason: "required when reference defaults are off",
            })?;
            let n_breaks = n_breaks.unwrap_or(BreakCount::Select {
                max_breaks: DEFAULT_MAX_BREAKS,
                criterion: SelectionCriterion::Bic,
            });
            (min_size, n_breaks)
        };
        min_size.validate()?;
        n_breaks.validate()?;
        Ok(BreakSearchOptions { model, min_size, n_breaks, use_defaults })
    }
}

impl Default for BreakSearchOptions {
    /// The reference configuration: linear cost, `L = ⌊0.15·T⌋`, `k = 5`.
    fn default() -> Self {
        BreakSearchOptions {
            model: CostModelKind::Linear,
            min_size: MinSegmentSize::default(),
            n_breaks: BreakCount::Fixed(DEFAULT_N_BREAKS),
            use_defaults: true,
        }
    }
}

/// Check that `n_breaks` breaks with segments of at least `min_size` rows
/// fit into `n_obs` rows, i.e. `(k+1)·L ≤ T`.
pub fn check_feasible(n_obs: usize, min_size: usize, n_breaks: usize) -> BreakResult<()> {
    let required = (n_breaks + 1).saturating_mul(min_size);
    if min_size == 0 || required > n_obs {
        return Err(BreakError::InfeasibleConfiguration {
            n_obs,
            min_size,
            n_breaks,
            reason: "(k+1)·L exceeds the number of observations",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Construction rules of BreakSearchOptions, size resolution, and the
    // feasibility rule shared by the search and the diagnostics.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // With the defaults flag and nothing explicit, the reference setup is used.
    fn defaults_flag_fills_reference_configuration() {
        let opts = BreakSearchOptions::new(CostModelKind::Linear, None, None, true).unwrap();

        assert_eq!(opts, BreakSearchOptions::default());
        assert_eq!(opts.min_size.resolve(276).unwrap(), 41);
    }

    #[test]
    // Purpose
    // -------
    // The flag never silently overrides an explicit, different value.
    fn defaults_flag_rejects_conflicting_explicit_values() {
        let res = BreakSearchOptions::new(
            CostModelKind::Linear,
            Some(MinSegmentSize::Absolute(10)),
            None,
            true,
        );
        let res_k =
            BreakSearchOptions::new(CostModelKind::Linear, None, Some(BreakCount::Fixed(3)), true);

        assert!(matches!(res, Err(BreakError::InvalidOptions { field: "min_size", .. })));
        assert!(matches!(res_k, Err(BreakError::InvalidOptions { field: "n_breaks", .. })));
    }

    #[test]
    fn explicit_values_equal_to_defaults_are_accepted_with_flag() {
        let res = BreakSearchOptions::new(
            CostModelKind::Linear,
            Some(MinSegmentSize::Fraction(0.15)),
            Some(BreakCount::Fixed(5)),
            true,
        );

        assert!(res.is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Without the flag, a missing break count means BIC selection and a
    // missing minimum size is an error.
    fn without_flag_break_count_defaults_to_bic_selection() {
        let opts = BreakSearchOptions::new(
            CostModelKind::Linear,
            Some(MinSegmentSize::Absolute(8)),
            None,
            false,
        )
        .unwrap();
        let missing = BreakSearchOptions::new(CostModelKind::Linear, None, None, false);

        assert_eq!(
            opts.n_breaks,
            BreakCount::Select {
                max_breaks: DEFAULT_MAX_BREAKS,
                criterion: SelectionCriterion::Bic,
            }
        );
        assert!(matches!(missing, Err(BreakError::InvalidOptions { field: "min_size", .. })));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let build = |size| BreakSearchOptions::new(CostModelKind::Linear, Some(size), None, false);

        let frac = build(MinSegmentSize::Fraction(1.5));
        let zero = build(MinSegmentSize::Absolute(0));
        let alpha = BreakSearchOptions::new(
            CostModelKind::Linear,
            Some(MinSegmentSize::Absolute(5)),
            Some(BreakCount::Select {
                max_breaks: 3,
                criterion: SelectionCriterion::SequentialF { alpha: 0.0 },
            }),
            false,
        );

        assert!(frac.is_err());
        assert!(zero.is_err());
        assert!(matches!(alpha, Err(BreakError::InvalidOptions { field: "criterion", .. })));
    }

    #[test]
    // Purpose
    // -------
    // (k+1)·L ≤ T is the boundary: 3 segments of 5 fit into 15 rows, not 14.
    fn feasibility_boundary() {
        assert!(check_feasible(15, 5, 2).is_ok());
        assert!(matches!(
            check_feasible(14, 5, 2),
            Err(BreakError::InfeasibleConfiguration { n_obs: 14, min_size: 5, n_breaks: 2, .. })
        ));
    }

    #[test]
    fn fraction_resolving_to_zero_rows_is_infeasible() {
        let res = MinSegmentSize::Fraction(0.15).resolve(6);

        assert!(matches!(res, Err(BreakError::InfeasibleConfiguration { .. })));
    }
}
