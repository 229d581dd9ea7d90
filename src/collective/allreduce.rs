use crate::collective::broadcast::tree_broadcast;
use crate::collective::helpers::collective_exchange;
use crate::collective::reduce::tree_reduce;
use crate::comm::Communicator;
use crate::error::{Result, RingtreeError};
use crate::reduce::reduce_slice;
use crate::types::{Element, ReduceOp};

/// Ring allreduce (sum only).
///
/// Algorithm: the accumulator starts as a copy of `send`. For P-1 rounds
/// each rank exchanges its whole accumulator with its ring neighbours
/// (sending to `rank + 1`, receiving from `rank - 1`), replaces the
/// accumulator with what it received and adds its own `send` back in. After
/// round k a rank holds the sum of its own input and the k inputs before it
/// on the ring, so after P-1 rounds every rank holds the full sum.
///
/// O(P) rounds of N elements each: simple and bandwidth-bound.
///
/// Any op other than `Sum` is a protocol violation and aborts the whole
/// group with code 1; the call then returns `Err(Aborted)`.
pub async fn ring_allreduce(
    comm: &Communicator,
    send: &[Element],
    op: ReduceOp,
) -> Result<Vec<Element>> {
    if op != ReduceOp::Sum {
        let violation = RingtreeError::UnsupportedOp {
            op,
            algorithm: "ring_allreduce",
        };
        tracing::error!(rank = comm.rank(), "{violation}");
        return Err(comm.abort(1));
    }

    let world = comm.world_size();
    let rank = comm.rank();
    let mut acc = send.to_vec();

    if world <= 1 {
        return Ok(acc);
    }

    let next = (rank + 1) % world;
    let prev = (rank + world - 1) % world;

    for step in 0..(world - 1) {
        tracing::debug!(rank, step, next, prev, "ring allreduce round");
        acc = collective_exchange(comm, acc, next, prev, "ring_allreduce").await?;
        reduce_slice(&mut acc, send, ReduceOp::Sum)?;
    }

    Ok(acc)
}

/// Tree allreduce: reduce to rank 0 over a binary tree, then broadcast the
/// result back down the same tree.
///
/// 2·⌈log₂ P⌉ steps and 2·(P-1) messages group-wide: latency-optimal next to
/// the ring, for any world size and every [`ReduceOp`].
pub async fn tree_allreduce(
    comm: &Communicator,
    send: &[Element],
    op: ReduceOp,
) -> Result<Vec<Element>> {
    let count = send.len();
    let mut acc = send.to_vec();

    if comm.world_size() <= 1 {
        return Ok(acc);
    }

    tree_reduce(comm, &mut acc, count, op).await?;
    tree_broadcast(comm, &mut acc, count).await?;

    Ok(acc)
}
