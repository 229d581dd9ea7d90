//! Rank-ordered printing.
//!
//! A single token travels up the ranks on the control lane: rank k prints
//! only after rank k-1 has printed and flushed, then hands the token to
//! k+1. Output from one `sync_print` call therefore appears in strictly
//! ascending rank order even though the ranks run concurrently.

use crate::comm::Communicator;
use crate::error::{Result, RingtreeError};
use crate::output::Output;
use crate::types::ControlMessage;

/// Print `line` on every rank, in rank order. Collective: every rank of
/// the group must call it.
pub async fn sync_print(comm: &Communicator, out: &Output, line: &str) -> Result<()> {
    let rank = comm.rank();

    if rank > 0 {
        let prev = rank - 1;
        match comm.recv_control(prev).await? {
            ControlMessage::PrintToken => {}
            other => {
                return Err(RingtreeError::UnexpectedMessage {
                    rank: prev,
                    expected: "PrintToken",
                    got: format!("{other:?}"),
                });
            }
        }
    }

    out.line(line)?;

    if rank + 1 < comm.world_size() {
        comm.send_control(rank + 1, ControlMessage::PrintToken)
            .await?;
    }

    Ok(())
}
