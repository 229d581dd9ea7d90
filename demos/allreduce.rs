//! Ring and tree allreduce across four in-process ranks.
//!
//! Every rank contributes `[r+5, -(r+5), r+5]`. Both algorithms leave the
//! element-wise sum `[26, -26, 26]` on every rank; the tree also runs the
//! other reduce ops.
//!
//! ```bash
//! cargo run --example allreduce
//! ```

use ringtree::{Communicator, ReduceOp, ring_allreduce, tree_allreduce};
use std::sync::Arc;

#[tokio::main]
async fn main() -> ringtree::Result<()> {
    let comms: Vec<Arc<Communicator>> = Communicator::bootstrap_local(4, 16)?
        .into_iter()
        .map(Arc::new)
        .collect();

    let mut tasks = Vec::new();
    for comm in &comms {
        let comm = Arc::clone(comm);
        tasks.push(tokio::spawn(async move {
            let rank = comm.rank();
            let base = rank as i32 + 5;
            let send = [base, -base, base];

            let ring = ring_allreduce(&comm, &send, ReduceOp::Sum).await?;
            let mut lines = vec![format!("rank {rank} ring sum  => {ring:?}")];
            for op in ReduceOp::ALL {
                let tree = tree_allreduce(&comm, &send, op).await?;
                lines.push(format!("rank {rank} tree {op:<4} => {tree:?}"));
            }
            ringtree::Result::Ok(lines)
        }));
    }

    for task in tasks {
        let lines = task
            .await
            .map_err(|e| ringtree::RingtreeError::runtime_with_source("rank task panicked", e))??;
        for line in lines {
            println!("{line}");
        }
    }
    // Output (rank 0):
    // rank 0 ring sum  => [26, -26, 26]
    // rank 0 tree sum  => [26, -26, 26]
    // rank 0 tree prod => [1680, 1680, 1680]
    // rank 0 tree min  => [5, -8, 5]
    // rank 0 tree max  => [8, -5, 8]

    Ok(())
}
