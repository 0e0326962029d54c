//! breaks::partition — breakpoint lists and the partitioning seam.
//!
//! A [`Breakpoints`] value is the only way the crate passes a segmentation
//! around: `0 = b₀ < b₁ < … < b_{k+1} = T`, every gap at least the minimum
//! segment size. Segment `j` covers rows `[b_j, b_{j+1})`.
use crate::{
    breaks::errors::{BreakError, BreakResult},
    series::Signal,
};

/// Validated, strictly increasing segment boundaries.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakpoints {
    positions: Vec<usize>,
}

impl Breakpoints {
    /// Validate a full boundary list (including `0` and `n_obs`).
    ///
    /// Errors
    /// ------
    /// - `BreakError::InvalidBreakpoints` if the list has fewer than two
    ///   entries, does not start at 0, does not end at `n_obs`, or has a gap
    ///   smaller than `max(min_size, 1)`. `index` is the offending position.
    pub fn new(positions: Vec<usize>, n_obs: usize, min_size: usize) -> BreakResult<Breakpoints> {
        if positions.len() < 2 {
            return Err(BreakError::InvalidBreakpoints {
                index: positions.len(),
                reason: "need at least the boundaries 0 and T",
            });
        }
        if positions[0] != 0 {
            return Err(BreakError::InvalidBreakpoints { index: 0, reason: "must start at 0" });
        }
        let last = positions.len() - 1;
        if positions[last] != n_obs {
            return Err(BreakError::InvalidBreakpoints {
                index: last,
                reason: "must end at the number of observations",
            });
        }
        let min_gap = min_size.max(1);
        for (i, pair) in positions.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(BreakError::InvalidBreakpoints {
                    index: i + 1,
                    reason: "must be strictly increasing",
                });
            }
            if pair[1] - pair[0] < min_gap {
                return Err(BreakError::InvalidBreakpoints {
                    index: i + 1,
                    reason: "segment shorter than the minimum size",
                });
            }
        }
        Ok(Breakpoints { positions })
    }

    /// The single-segment partition `[0, n_obs]`.
    pub fn whole(n_obs: usize) -> BreakResult<Breakpoints> {
        Breakpoints::new(vec![0, n_obs], n_obs, 1)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.positions
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.positions
    }

    /// Number of interior breaks `k`.
    pub fn n_breaks(&self) -> usize {
        self.positions.len() - 2
    }

    pub fn n_segments(&self) -> usize {
        self.positions.len() - 1
    }

    /// Total number of rows `T`.
    pub fn n_obs(&self) -> usize {
        self.positions[self.positions.len() - 1]
    }

    /// Interior break positions `b₁ … b_k`.
    pub fn interior(&self) -> &[usize] {
        &self.positions[1..self.positions.len() - 1]
    }

    /// `(start, end)` of every segment, half-open.
    pub fn segments(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.positions.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

/// Partitioner — finds the cost-minimizing segmentation with exactly
/// `n_breaks` interior breaks.
///
/// Implementors must return boundaries satisfying the [`Breakpoints`]
/// invariants for `min_size`, or an error; never a partial answer.
pub trait Partitioner {
    fn optimal_partition(
        &self, signal: &Signal, min_size: usize, n_breaks: usize,
    ) -> BreakResult<Breakpoints>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_list_exposes_segments() {
        let bkps = Breakpoints::new(vec![0, 4, 9, 12], 12, 3).unwrap();

        let segs: Vec<_> = bkps.segments().collect();

        assert_eq!(segs, vec![(0, 4), (4, 9), (9, 12)]);
        assert_eq!(bkps.n_breaks(), 2);
        assert_eq!(bkps.n_segments(), 3);
        assert_eq!(bkps.interior(), &[4, 9]);
        assert_eq!(bkps.n_obs(), 12);
    }

    #[test]
    // Purpose
    // -------
    // Each broken invariant is reported at the position that breaks it.
    fn invalid_lists_are_rejected_with_position() {
        let cases: Vec<(Vec<usize>, usize)> = vec![
            (vec![0], 1),
            (vec![1, 12], 0),
            (vec![0, 6, 11], 2),
            (vec![0, 6, 6, 12], 2),
            (vec![0, 2, 12], 1),
        ];

        for (positions, expected_index) in cases {
            let res = Breakpoints::new(positions.clone(), 12, 3);

            match res {
                Err(BreakError::InvalidBreakpoints { index, .. }) => {
                    assert_eq!(index, expected_index, "positions {positions:?}")
                }
                other => panic!("expected InvalidBreakpoints for {positions:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn whole_sample_has_no_breaks() {
        let bkps = Breakpoints::whole(7).unwrap();

        assert_eq!(bkps.as_slice(), &[0, 7]);
        assert_eq!(bkps.n_breaks(), 0);
    }
}
