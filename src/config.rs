//! Runtime-configurable parameters for the group and the harnesses.
//!
//! All values have sensible defaults. Override via environment variables
//! (prefixed `RINGTREE_`) or by constructing a custom `RingtreeConfig`.

use crate::error::{Result, RingtreeError};
use std::time::Duration;

/// Vector lengths exercised by the correctness suite. The last one is
/// large enough to span many transport frames on a real interconnect.
pub const DEFAULT_CHECK_COUNTS: [usize; 4] = [1, 3, 12, 1024 * 1024 + 1];

/// Parameters for the in-process group, the correctness suite and the
/// benchmark.
#[derive(Debug, Clone)]
pub struct RingtreeConfig {
    /// Number of ranks in the process group.
    pub world_size: u32,

    /// Vector lengths run by the correctness suite, crossed with every
    /// reduce op.
    pub check_counts: Vec<usize>,

    /// Reference allreduce calls used to calibrate the benchmark.
    pub calibration_iters: u32,

    /// Target wall-clock time per benchmarked algorithm.
    pub bench_budget: Duration,

    /// Repeat count used when calibration rounds down to zero.
    pub min_repeats: u32,

    /// Messages buffered per (source, destination) lane before a send waits.
    pub lane_capacity: usize,
}

impl Default for RingtreeConfig {
    fn default() -> Self {
        Self {
            world_size: 4,
            check_counts: DEFAULT_CHECK_COUNTS.to_vec(),
            calibration_iters: 250,
            bench_budget: Duration::from_secs(2),
            min_repeats: 4,
            lane_capacity: 64,
        }
    }
}

impl RingtreeConfig {
    /// Load config from environment variables, falling back to defaults.
    ///
    /// Recognized variables:
    /// - `RINGTREE_WORLD_SIZE`
    /// - `RINGTREE_CHECK_COUNTS` (comma separated, e.g. `1,3,12`)
    /// - `RINGTREE_CALIBRATION_ITERS`
    /// - `RINGTREE_BENCH_BUDGET_MS`
    /// - `RINGTREE_MIN_REPEATS`
    /// - `RINGTREE_LANE_CAPACITY`
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("RINGTREE_WORLD_SIZE") {
            if let Ok(n) = v.parse::<u32>() {
                cfg.world_size = n;
            }
        }
        if let Ok(v) = std::env::var("RINGTREE_CHECK_COUNTS") {
            if let Some(counts) = parse_counts(&v) {
                cfg.check_counts = counts;
            }
        }
        if let Ok(v) = std::env::var("RINGTREE_CALIBRATION_ITERS") {
            if let Ok(n) = v.parse::<u32>() {
                cfg.calibration_iters = n;
            }
        }
        if let Ok(v) = std::env::var("RINGTREE_BENCH_BUDGET_MS") {
            if let Ok(ms) = v.parse::<u64>() {
                cfg.bench_budget = Duration::from_millis(ms);
            }
        }
        if let Ok(v) = std::env::var("RINGTREE_MIN_REPEATS") {
            if let Ok(n) = v.parse::<u32>() {
                cfg.min_repeats = n;
            }
        }
        if let Ok(v) = std::env::var("RINGTREE_LANE_CAPACITY") {
            if let Ok(n) = v.parse::<usize>() {
                cfg.lane_capacity = n;
            }
        }

        cfg
    }

    /// Reject values no run can make sense of.
    pub fn validate(&self) -> Result<()> {
        if self.world_size == 0 {
            return Err(RingtreeError::Config("world size must be at least 1".into()));
        }
        if self.check_counts.is_empty() || self.check_counts.contains(&0) {
            return Err(RingtreeError::Config(
                "check counts must be a non-empty list of positive lengths".into(),
            ));
        }
        if self.calibration_iters == 0 {
            return Err(RingtreeError::Config(
                "calibration iterations must be at least 1".into(),
            ));
        }
        if self.min_repeats == 0 {
            return Err(RingtreeError::Config("minimum repeats must be at least 1".into()));
        }
        Ok(())
    }

    /// Number of test cases the correctness suite will report.
    pub fn total_check_cases(&self) -> usize {
        self.check_counts.len() * crate::types::ReduceOp::ALL.len()
    }
}

/// Parse a comma separated list of positive lengths. `None` if any entry is
/// malformed or zero.
fn parse_counts(s: &str) -> Option<Vec<usize>> {
    let counts: Vec<usize> = s
        .split(',')
        .map(|part| part.trim().parse::<usize>().ok().filter(|&n| n > 0))
        .collect::<Option<_>>()?;
    (!counts.is_empty()).then_some(counts)
}
