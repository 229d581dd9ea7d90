use crate::collective::helpers::{ceil_log2, collective_recv, collective_send};
use crate::comm::Communicator;
use crate::error::Result;
use crate::reduce::reduce_slice;
use crate::types::{Element, ReduceOp};

/// Tree reduce: fold every rank's accumulator onto rank 0.
///
/// Recursive halving over the active prefix `[0, group)`. Each step splits it
/// into `lower = group / 2` receivers and the upper `upper = group - lower`
/// ranks; rank `r < lower` receives from `r + upper` and combines, ranks in
/// `[upper, group)` send to `r - upper` and drop out. When `group` is odd the
/// middle rank sits the step out and stays active. `group` then becomes
/// `upper`, so the active prefix shrinks by ceiling halves and no rank is ever
/// orphaned, whatever the world size.
///
/// On return rank 0's `acc` holds the reduction; on other ranks `acc` has
/// been handed off and is left empty.
pub(crate) async fn tree_reduce(
    comm: &Communicator,
    acc: &mut Vec<Element>,
    count: usize,
    op: ReduceOp,
) -> Result<()> {
    let world = comm.world_size();
    let rank = comm.rank();

    tracing::debug!(rank, steps = ceil_log2(world), "tree reduce");

    let mut group = world;
    while group > 1 {
        let lower = group / 2;
        let upper = group - lower;

        if rank < lower {
            let src = rank + upper;
            let received = collective_recv(comm, src, count, "tree_allreduce").await?;
            reduce_slice(acc, &received, op)?;
        } else if rank >= upper && rank < group {
            let dest = rank - upper;
            collective_send(comm, dest, std::mem::take(acc), "tree_allreduce").await?;
            break;
        }

        group = upper;
    }

    Ok(())
}
