use crate::collective::tree_allreduce;
use crate::comm::Communicator;
use crate::config::RingtreeConfig;
use crate::error::Result;
use crate::output::Output;
use crate::reduce::{alloc_vector, first_mismatch};
use crate::sync_print::sync_print;
use crate::types::{Element, Rank, ReduceOp};

/// One (length, op) entry of the correctness matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestCase {
    /// 1-based TAP test number.
    pub number: usize,
    pub op: ReduceOp,
    pub count: usize,
}

/// Outcome of a correctness run, identical on every rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSummary {
    pub total: usize,
    /// TAP numbers of the cases that failed on at least one rank.
    pub failed: Vec<usize>,
}

impl CheckSummary {
    pub fn passed(&self) -> usize {
        self.total - self.failed.len()
    }

    pub fn all_passed(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Deterministic input for `rank`: `(rank + 5)` at even indices and its
/// negation at odd ones.
pub fn check_input(rank: Rank, count: usize) -> Result<Vec<Element>> {
    let mut send = alloc_vector(count)?;
    let base = rank as Element + 5;
    for (i, x) in send.iter_mut().enumerate() {
        *x = if i % 2 == 0 { base } else { -base };
    }
    Ok(send)
}

/// Run the tree allreduce over every configured length and every op,
/// comparing each result with the reference allreduce.
///
/// Rank 0 writes a Test Anything Protocol stream to `out`: a `1..total`
/// plan, then one `ok` / `not ok` line per case. Failing cases are followed
/// by one diagnostic line per rank, in rank order. A mismatch is reported,
/// never returned as an error.
pub async fn check_allreduce(
    comm: &Communicator,
    config: &RingtreeConfig,
    out: &Output,
) -> Result<CheckSummary> {
    let rank = comm.rank();
    let total = config.total_check_cases();

    if rank == 0 {
        out.line(&format!("1..{total}"))?;
    }

    let mut summary = CheckSummary {
        total,
        failed: Vec::new(),
    };
    let mut number = 1;

    for &count in &config.check_counts {
        let send = check_input(rank, count)?;

        for op in ReduceOp::ALL {
            let expect = comm.reference_allreduce(&send, op).await?;
            let got = tree_allreduce(comm, &send, op).await?;
            let case = TestCase { number, op, count };
            if !verify_case(comm, out, case, &got, &expect).await? {
                summary.failed.push(number);
            }
            number += 1;
        }
    }

    if rank == 0 {
        tracing::info!(
            total,
            failed = summary.failed.len(),
            "correctness suite finished"
        );
    }
    Ok(summary)
}

/// Compare this rank's `got` with `expect`, agree on a group-wide verdict
/// and report it. Collective: every rank must call it for the same case.
///
/// Returns the group-wide verdict.
pub async fn verify_case(
    comm: &Communicator,
    out: &Output,
    case: TestCase,
    got: &[Element],
    expect: &[Element],
) -> Result<bool> {
    let rank = comm.rank();
    let mismatch = first_mismatch(got, expect);
    let all_pass = comm.all_land(mismatch.is_none()).await?;

    let TestCase { number, op, count } = case;
    let label = op.label();

    if all_pass {
        if rank == 0 {
            out.line(&format!("ok {number} - {label} count {count}"))?;
        }
        return Ok(true);
    }

    if rank == 0 {
        out.line(&format!(
            "not ok {number} - {label} count {count}: Not all processes have correct result"
        ))?;
    }

    let detail = match mismatch {
        None => format!("    [rank: {rank}] Has correct result"),
        Some(entry) => {
            tracing::warn!(rank, %op, count, entry, "allreduce result mismatch");
            format!("    [rank: {rank}] Has incorrect result, first mismatch at entry {entry}")
        }
    };
    sync_print(comm, out, &detail).await?;

    Ok(false)
}
