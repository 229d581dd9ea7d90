//! Drivers for the allreduce algorithms: a TAP correctness suite and a
//! calibrated latency benchmark.

mod bench;
mod check;

pub use bench::{BenchReport, bench_allreduce, calibrated_repeats};
pub use check::{CheckSummary, TestCase, check_allreduce, check_input, verify_case};
