use ringtree::{Communicator, Element, ReduceOp};
use std::sync::Arc;

/// Helper: run a collective operation across N ranks concurrently and
/// collect each rank's output in rank order.
/// Keeps all communicators alive until every task completes.
pub async fn run_collective<F, Fut, T>(world_size: u32, f: F) -> Vec<T>
where
    F: Fn(Arc<Communicator>) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let comms = Communicator::bootstrap_local(world_size, 64).unwrap();
    let comms: Vec<Arc<Communicator>> = comms.into_iter().map(Arc::new).collect();

    let f = Arc::new(f);
    let mut handles = Vec::new();
    for c in &comms {
        let c = Arc::clone(c);
        let f = Arc::clone(&f);
        handles.push(tokio::spawn(async move { f(c).await }));
    }
    let mut results = Vec::new();
    for h in handles {
        results.push(h.await.unwrap());
    }
    results
    // `comms` outlives every task.
}

/// Element-wise fold of `inputs` in rank order, the result every allreduce
/// must agree with.
pub fn fold(inputs: &[Vec<Element>], op: ReduceOp) -> Vec<Element> {
    let mut acc = inputs[0].clone();
    for v in &inputs[1..] {
        for (a, &b) in acc.iter_mut().zip(v) {
            *a = op.combine(*a, b);
        }
    }
    acc
}

/// The `[r+5, -(r+5), r+5, ...]` pattern used throughout the harness.
pub fn pattern(rank: u32, count: usize) -> Vec<Element> {
    let base = rank as Element + 5;
    (0..count)
        .map(|i| if i % 2 == 0 { base } else { -base })
        .collect()
}
