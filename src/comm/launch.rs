use crate::config::RingtreeConfig;
use crate::error::{Result, RingtreeError};
use std::future::Future;
use std::sync::Arc;

use super::Communicator;

/// Run `f` once per rank of a fresh local group, each rank on its own tokio
/// task, and collect the per-rank results in rank order.
///
/// A rank that fails with anything other than an abort aborts the group
/// with code 1, so peers blocked on it return instead of hanging.
pub async fn run_spmd<F, Fut, T>(config: &RingtreeConfig, f: F) -> Result<Vec<Result<T>>>
where
    F: Fn(Arc<Communicator>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    let comms = Communicator::bootstrap_local(config.world_size, config.lane_capacity)?;

    let f = Arc::new(f);
    let mut handles = Vec::with_capacity(comms.len());
    for comm in comms {
        let comm = Arc::new(comm);
        let f = Arc::clone(&f);
        handles.push(tokio::spawn(async move {
            let rank = comm.rank();
            let result = f(Arc::clone(&comm)).await;
            if let Err(e) = &result
                && e.abort_code().is_none()
            {
                tracing::error!(rank, "rank failed: {e}");
                let _ = comm.abort(1);
            }
            result
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for h in handles {
        results.push(
            h.await
                .map_err(|e| RingtreeError::runtime_with_source("rank task panicked", e))?,
        );
    }
    Ok(results)
}

/// The abort code reported by any rank, if the group aborted.
pub fn abort_code<T>(results: &[Result<T>]) -> Option<i32> {
    results
        .iter()
        .find_map(|r| r.as_ref().err().and_then(RingtreeError::abort_code))
}
