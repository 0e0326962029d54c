//! Property tests for breakpoint lists and the partition sweep.
//!
//! Purpose
//! -------
//! - Check that every optimum returned by the dynamic program is a valid
//!   breakpoint list for its minimum segment size.
//! - Check that the optimal cost does not increase with the break count
//!   whenever the previous optimum has a segment long enough to split.
//! - Check that `Breakpoints::new` accepts exactly the well-formed lists.
use ndarray::Array1;
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use rust_beveridge::{
    breaks::{BreakError, Breakpoints, DynamicProgram, LinearSegmentModel},
    series::Signal,
};

const MIN_PROPTEST_CASES: u32 = 64;

fn proptest_cases() -> u32 {
    std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .map(|parsed| parsed.max(MIN_PROPTEST_CASES))
        .unwrap_or(MIN_PROPTEST_CASES)
}

/// Beveridge signal with a non-degenerate `log u` and arbitrary `log v`.
fn make_signal(log_v: &[f64]) -> Signal {
    let n = log_v.len();
    let log_u = Array1::from_shape_fn(n, |t| -3.0 + 0.3 * (1.3 * t as f64).sin());
    Signal::beveridge(&Array1::from(log_v.to_vec()), &log_u).unwrap()
}

fn is_well_formed(positions: &[usize], n_obs: usize, min_size: usize) -> bool {
    positions.len() >= 2
        && positions[0] == 0
        && positions[positions.len() - 1] == n_obs
        && positions.windows(2).all(|w| w[1] > w[0] && w[1] - w[0] >= min_size)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: proptest_cases(),
        ..ProptestConfig::default()
    })]

    #[test]
    fn sweep_returns_valid_breakpoints_with_splittable_monotone_cost(
        log_v in prop::collection::vec(-4.0f64..0.0, 12..40),
        min_size in 3usize..6,
    ) {
        let n = log_v.len();
        let max_breaks = (n / min_size - 1).min(4);
        let signal = make_signal(&log_v);
        let dp = DynamicProgram::new(LinearSegmentModel::default());

        let sweep = dp.sweep(&signal, min_size, max_breaks).unwrap();

        prop_assert_eq!(sweep.max_breaks(), max_breaks);
        for (m, partition) in sweep.partitions.iter().enumerate() {
            let positions = partition.breakpoints.as_slice();
            prop_assert_eq!(partition.breakpoints.n_breaks(), m);
            prop_assert!(is_well_formed(positions, n, min_size));
            prop_assert_eq!(partition.coefficients.len(), m + 1);
            prop_assert!(partition.cost >= -1e-12);
        }
        // Splitting a segment of length ≥ 2L keeps the fit and adds a break,
        // so only then is the next optimum bounded by the current one.
        for pair in sweep.partitions.windows(2) {
            let splittable =
                pair[0].breakpoints.segments().any(|(start, end)| end - start >= 2 * min_size);
            if splittable {
                prop_assert!(pair[1].cost <= pair[0].cost + 1e-9);
            }
        }
    }

    #[test]
    fn breakpoints_new_accepts_exactly_well_formed_lists(
        interior in prop::collection::vec(1usize..30, 0..5),
        n_obs in 10usize..30,
        min_size in 1usize..5,
    ) {
        let mut positions = vec![0];
        positions.extend(interior);
        positions.push(n_obs);
        let expected = is_well_formed(&positions, n_obs, min_size);

        let result = Breakpoints::new(positions.clone(), n_obs, min_size);

        prop_assert_eq!(result.is_ok(), expected);
        if let Err(err) = result {
            let is_invalid_breakpoints = matches!(err, BreakError::InvalidBreakpoints { .. });
            prop_assert!(is_invalid_breakpoints);
        }
    }

    #[test]
    fn infeasible_requests_fail_without_partial_results(
        n in 8usize..20,
        min_size in 3usize..6,
    ) {
        let log_v: Vec<f64> = (0..n).map(|t| -2.0 + 0.01 * t as f64).collect();
        let signal = make_signal(&log_v);
        let dp = DynamicProgram::new(LinearSegmentModel::default());
        let too_many = n / min_size;

        let result = dp.sweep(&signal, min_size, too_many);

        let is_infeasible = matches!(result, Err(BreakError::InfeasibleConfiguration { .. }));
        prop_assert!(is_infeasible);
    }
}
