use crate::comm::Communicator;
use crate::error::{Result, RingtreeError};
use crate::types::{Element, Rank};

/// Integer ceiling of log2(n). Returns 0 for n <= 1.
pub(crate) fn ceil_log2(n: u32) -> u32 {
    if n <= 1 {
        return 0;
    }
    // For n > 1: ceil(log2(n)) = 32 - (n-1).leading_zeros()
    u32::BITS - (n - 1).leading_zeros()
}

/// Wrap a point-to-point failure as `CollectiveFailed`. Aborts pass through
/// untouched so callers can still recover the exit code.
fn wrap(operation: &'static str, rank: Rank, e: RingtreeError) -> RingtreeError {
    match e {
        RingtreeError::Aborted { .. } => e,
        other => RingtreeError::CollectiveFailed {
            operation,
            rank,
            reason: other.to_string(),
        },
    }
}

/// Check a received buffer holds exactly `expected` elements.
fn expect_len(received: Vec<Element>, expected: usize) -> Result<Vec<Element>> {
    if received.len() != expected {
        return Err(RingtreeError::BufferSizeMismatch {
            expected,
            actual: received.len(),
        });
    }
    Ok(received)
}

/// Send a vector to a peer, wrapping errors as `CollectiveFailed`.
pub(crate) async fn collective_send(
    comm: &Communicator,
    dest: Rank,
    data: Vec<Element>,
    operation: &'static str,
) -> Result<()> {
    comm.send(dest, data)
        .await
        .map_err(|e| wrap(operation, dest, e))
}

/// Receive a vector of `count` elements from a peer, wrapping errors as
/// `CollectiveFailed`.
pub(crate) async fn collective_recv(
    comm: &Communicator,
    src: Rank,
    count: usize,
    operation: &'static str,
) -> Result<Vec<Element>> {
    let received = comm
        .recv(src)
        .await
        .map_err(|e| wrap(operation, src, e))?;
    expect_len(received, count)
}

/// Paired send-to-`dest` / receive-from-`source`, wrapping errors as
/// `CollectiveFailed`.
pub(crate) async fn collective_exchange(
    comm: &Communicator,
    data: Vec<Element>,
    dest: Rank,
    source: Rank,
    operation: &'static str,
) -> Result<Vec<Element>> {
    let count = data.len();
    let received = comm
        .exchange(data, dest, source)
        .await
        .map_err(|e| wrap(operation, source, e))?;
    expect_len(received, count)
}
