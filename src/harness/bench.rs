use crate::collective::{barrier, ring_allreduce, tree_allreduce};
use crate::comm::Communicator;
use crate::config::RingtreeConfig;
use crate::error::Result;
use crate::output::Output;
use crate::reduce::alloc_vector;
use crate::types::{Element, ReduceOp};
use std::future::Future;
use std::time::{Duration, Instant};

/// Mean seconds per call for one vector length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchReport {
    pub count: usize,
    pub repeats: u32,
    pub ring: f64,
    pub tree: f64,
    pub reference: f64,
}

impl std::fmt::Display for BenchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {:e} {:e} {:e}",
            self.count, self.repeats, self.ring, self.tree, self.reference
        )
    }
}

/// Repeat count that makes each timed algorithm run for roughly
/// `config.bench_budget`, given that `config.calibration_iters` reference
/// calls took `elapsed`. Falls back to `config.min_repeats` when the
/// estimate rounds down to zero.
pub fn calibrated_repeats(elapsed: Duration, config: &RingtreeConfig) -> u32 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return config.min_repeats;
    }
    let target = config.bench_budget.as_secs_f64() * f64::from(config.calibration_iters);
    // `as` saturates; keep it representable as an `Element` for the MAX
    // reduction below.
    let repeats = ((target / secs) as u32).min(Element::MAX as u32);
    if repeats == 0 {
        config.min_repeats
    } else {
        repeats
    }
}

/// Time ring, tree and reference allreduce (sum) on `count` elements.
///
/// Calibrates a repeat count from the reference allreduce, agrees on the
/// group-wide maximum so every rank runs the same number of calls, then
/// times each algorithm over that many calls. Rank 0 writes
/// `<count> <repeats> <ring> <tree> <reference>` to `out`.
pub async fn bench_allreduce(
    comm: &Communicator,
    config: &RingtreeConfig,
    count: usize,
    out: &Output,
) -> Result<BenchReport> {
    let rank = comm.rank();
    let mut send = alloc_vector(count)?;
    send.fill(rank as Element);
    let send = send.as_slice();

    let start = Instant::now();
    for _ in 0..config.calibration_iters {
        comm.reference_allreduce(send, ReduceOp::Sum).await?;
    }
    let local = calibrated_repeats(start.elapsed(), config);
    let repeats = comm
        .allreduce_scalar(local as Element, ReduceOp::Max)
        .await? as u32;
    tracing::debug!(rank, count, local, repeats, "benchmark calibrated");

    barrier(comm).await?;
    let ring = time_per_call(repeats, move || ring_allreduce(comm, send, ReduceOp::Sum)).await?;
    barrier(comm).await?;
    let tree = time_per_call(repeats, move || tree_allreduce(comm, send, ReduceOp::Sum)).await?;
    barrier(comm).await?;
    let reference =
        time_per_call(repeats, move || comm.reference_allreduce(send, ReduceOp::Sum)).await?;

    let report = BenchReport {
        count,
        repeats,
        ring,
        tree,
        reference,
    };
    if rank == 0 {
        out.line(&report.to_string())?;
    }
    Ok(report)
}

async fn time_per_call<F, Fut>(repeats: u32, mut call: F) -> Result<f64>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Vec<Element>>>,
{
    let start = Instant::now();
    for _ in 0..repeats {
        call().await?;
    }
    Ok(start.elapsed().as_secs_f64() / f64::from(repeats.max(1)))
}
