use crate::collective::helpers::{collective_recv, collective_send};
use crate::comm::Communicator;
use crate::error::Result;
use crate::types::Element;

/// Tree broadcast: rank 0's `acc` is copied to every rank.
///
/// Binomial doubling: at step `group = 1, 2, 4, …` ranks below `group` send
/// to `rank + group` (when that rank exists) and ranks in `[group, 2·group)`
/// receive from `rank - group`. Every non-root rank receives exactly once.
pub(crate) async fn tree_broadcast(
    comm: &Communicator,
    acc: &mut Vec<Element>,
    count: usize,
) -> Result<()> {
    let world = comm.world_size();
    let rank = comm.rank();

    let mut group: u32 = 1;
    while group < world {
        if rank < group {
            let dest = rank + group;
            if dest < world {
                collective_send(comm, dest, acc.clone(), "tree_allreduce").await?;
            }
        } else if rank < group.saturating_mul(2) {
            let src = rank - group;
            *acc = collective_recv(comm, src, count, "tree_allreduce").await?;
        }
        group = group.saturating_mul(2);
    }

    Ok(())
}
