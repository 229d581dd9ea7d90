use crate::comm::Communicator;
use crate::error::{Result, RingtreeError};
use crate::types::{ControlMessage, Rank};

/// Barrier: blocks until all ranks reach this point.
///
/// Two-phase: every rank except 0 sends `Barrier { epoch }` to rank 0, then
/// rank 0, having heard from everyone, sends `BarrierAck { epoch }` back.
/// O(P) messages at rank 0, which is fine for the group sizes this crate
/// targets.
pub async fn barrier(comm: &Communicator) -> Result<()> {
    let world = comm.world_size();
    if world <= 1 {
        return Ok(());
    }

    let epoch = comm.next_barrier_epoch();
    let rank = comm.rank();

    if rank == 0 {
        for r in 1..world {
            match recv(comm, r).await? {
                ControlMessage::Barrier { epoch: e } if e == epoch => {}
                other => return Err(unexpected(r, "Barrier", epoch, other)),
            }
        }
        for r in 1..world {
            send(comm, r, ControlMessage::BarrierAck { epoch }).await?;
        }
    } else {
        send(comm, 0, ControlMessage::Barrier { epoch }).await?;
        match recv(comm, 0).await? {
            ControlMessage::BarrierAck { epoch: e } if e == epoch => {}
            other => return Err(unexpected(0, "BarrierAck", epoch, other)),
        }
    }

    Ok(())
}

fn unexpected(rank: Rank, expected: &'static str, epoch: u64, got: ControlMessage) -> RingtreeError {
    RingtreeError::UnexpectedMessage {
        rank,
        expected,
        got: format!("{got:?} while waiting for epoch {epoch}"),
    }
}

async fn send(comm: &Communicator, dest: Rank, msg: ControlMessage) -> Result<()> {
    comm.send_control(dest, msg)
        .await
        .map_err(|e| match e {
            RingtreeError::Aborted { .. } => e,
            other => RingtreeError::CollectiveFailed {
                operation: "barrier",
                rank: dest,
                reason: other.to_string(),
            },
        })
}

async fn recv(comm: &Communicator, src: Rank) -> Result<ControlMessage> {
    comm.recv_control(src).await.map_err(|e| match e {
        RingtreeError::Aborted { .. } => e,
        other => RingtreeError::CollectiveFailed {
            operation: "barrier",
            rank: src,
            reason: other.to_string(),
        },
    })
}
