//! breaks::dynp — exact optimal partitioning by dynamic programming.
//!
//! Purpose
//! -------
//! Find, for every break count `m = 0..=max_breaks`, the segmentation of
//! `T` ordered rows into `m + 1` contiguous segments of at least `L` rows
//! that minimizes the summed segment cost of a [`SegmentModel`].
//!
//! Key behaviors
//! -------------
//! - Recursion: `D₀(j) = c(0, j)` and
//!   `D_m(j) = min_{i} D_{m−1}(i) + c(i, j)` over `m·L ≤ i ≤ j − L`.
//!   Back-pointers reconstruct the boundaries.
//! - One sweep serves every `m ≤ max_breaks`; [`PartitionSweep`] keeps the
//!   optimum for each of them.
//! - Segment scores are memoized in a [`CostCache`] keyed by `(start, end)`,
//!   so each regression runs at most once per sweep and the cached
//!   coefficients describe exactly the fit that produced the cost.
//!
//! Invariants & assumptions
//! ------------------------
//! - `(m+1)·L ≤ T` for the largest requested `m`; otherwise
//!   [`BreakError::InfeasibleConfiguration`] is returned before any fit.
//! - Ties resolve to the earliest admissible breakpoint (strict `<` while
//!   scanning `i` upward).
//! - A non-finite segment cost aborts the sweep with
//!   [`BreakError::NonFiniteCost`].
//!
//! Performance
//! -----------
//! - `O(T²)` segment fits in the worst case and `O(max_breaks · T²)`
//!   additions; the last layer is only evaluated at `j = T`.
use crate::{
    breaks::{
        errors::{BreakError, BreakResult},
        model::{SegmentModel, SegmentScore},
        options::check_feasible,
        partition::{Breakpoints, Partitioner},
    },
    series::Signal,
};
use ndarray::Array1;
use std::collections::{HashMap, hash_map::Entry};
use tracing::{debug, info};

/// Memoized segment scores keyed by `(start, end)`.
#[derive(Debug, Clone, Default)]
pub struct CostCache {
    scores: HashMap<(usize, usize), SegmentScore>,
}

impl CostCache {
    pub fn new() -> CostCache {
        CostCache::default()
    }

    /// Score of rows `[start, end)`, fitting it on first use.
    pub fn score<M: SegmentModel>(
        &mut self, model: &M, signal: &Signal, start: usize, end: usize,
    ) -> BreakResult<&SegmentScore> {
        match self.scores.entry((start, end)) {
            Entry::Occupied(entry) => Ok(&*entry.into_mut()),
            Entry::Vacant(entry) => {
                let score = model.score(signal, start, end)?;
                if !score.cost.is_finite() {
                    return Err(BreakError::NonFiniteCost { start, end, value: score.cost });
                }
                Ok(&*entry.insert(score))
            }
        }
    }

    /// Cost of rows `[start, end)`, fitting it on first use.
    pub fn cost<M: SegmentModel>(
        &mut self, model: &M, signal: &Signal, start: usize, end: usize,
    ) -> BreakResult<f64> {
        Ok(self.score(model, signal, start, end)?.cost)
    }

    /// Number of distinct segments fitted so far.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Optimal segmentation for one break count.
///
/// - `breakpoints`: the boundaries.
/// - `cost`: summed segment cost (total RSS for the linear model).
/// - `coefficients`: cached coefficients of each segment, in order.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub breakpoints: Breakpoints,
    pub cost: f64,
    pub coefficients: Vec<Array1<f64>>,
}

/// Optimal partitions for `m = 0..=max_breaks`, indexed by `m`.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionSweep {
    pub min_size: usize,
    pub partitions: Vec<Partition>,
}

impl PartitionSweep {
    pub fn max_breaks(&self) -> usize {
        self.partitions.len() - 1
    }

    /// Optimum with exactly `n_breaks` breaks, if it was part of the sweep.
    pub fn get(&self, n_breaks: usize) -> Option<&Partition> {
        self.partitions.get(n_breaks)
    }
}

/// DynamicProgram — exact partition search over a [`SegmentModel`].
#[derive(Debug, Clone, Default)]
pub struct DynamicProgram<M> {
    model: M,
}

impl<M: SegmentModel> DynamicProgram<M> {
    pub fn new(model: M) -> DynamicProgram<M> {
        DynamicProgram { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Optimal partitions for every break count `0..=max_breaks`.
    ///
    /// Errors
    /// ------
    /// - `BreakError::InfeasibleConfiguration` if `(max_breaks+1)·min_size > T`.
    /// - `BreakError::NonFiniteCost` or a wrapped regression error from the
    ///   segment model.
    pub fn sweep(
        &self, signal: &Signal, min_size: usize, max_breaks: usize,
    ) -> BreakResult<PartitionSweep> {
        let n = signal.n_obs();
        check_feasible(n, min_size, max_breaks)?;
        let mut cache = CostCache::new();

        // best[m][j]: minimal cost of rows [0, j) split into m + 1 segments.
        let mut best = vec![vec![f64::INFINITY; n + 1]; max_breaks + 1];
        let mut back = vec![vec![0usize; n + 1]; max_breaks + 1];

        for j in min_size..=n {
            best[0][j] = cache.cost(&self.model, signal, 0, j)?;
        }
        for m in 1..=max_breaks {
            let first_end = if m == max_breaks { n } else { (m + 1) * min_size };
            for j in first_end..=n {
                let mut best_cost = f64::INFINITY;
                let mut best_start = 0;
                for i in m * min_size..=j - min_size {
                    let total = best[m - 1][i] + cache.cost(&self.model, signal, i, j)?;
                    if total < best_cost {
                        best_cost = total;
                        best_start = i;
                    }
                }
                best[m][j] = best_cost;
                back[m][j] = best_start;
            }
        }
        debug!(n_obs = n, min_size, max_breaks, fitted_segments = cache.len(), "dynp sweep done");

        let mut partitions = Vec::with_capacity(max_breaks + 1);
        for m in 0..=max_breaks {
            let mut positions = vec![n];
            let mut end = n;
            for layer in (1..=m).rev() {
                end = back[layer][end];
                positions.push(end);
            }
            positions.push(0);
            positions.reverse();

            let breakpoints = Breakpoints::new(positions, n, min_size)?;
            let coefficients = breakpoints
                .segments()
                .map(|(start, end)| {
                    cache.score(&self.model, signal, start, end).map(|s| s.coefficients.clone())
                })
                .collect::<BreakResult<Vec<_>>>()?;
            partitions.push(Partition { breakpoints, cost: best[m][n], coefficients });
        }
        Ok(PartitionSweep { min_size, partitions })
    }
}

impl<M: SegmentModel> Partitioner for DynamicProgram<M> {
    fn optimal_partition(
        &self, signal: &Signal, min_size: usize, n_breaks: usize,
    ) -> BreakResult<Breakpoints> {
        let mut sweep = self.sweep(signal, min_size, n_breaks)?;
        let partition = sweep.partitions.swap_remove(n_breaks);
        info!(
            n_breaks,
            breakpoints = ?partition.breakpoints.as_slice(),
            cost = partition.cost,
            "optimal partition found"
        );
        Ok(partition.breakpoints)
    }
}
