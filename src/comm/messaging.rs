//! Point-to-point messaging: ordered send/recv on the data and control lanes,
//! plus the paired exchange used by the ring.

use crate::error::{Result, RingtreeError};
use crate::types::{ControlMessage, Element, Rank};
use std::sync::atomic::Ordering;
use tokio::sync::{Mutex, mpsc};

use super::Communicator;

impl Communicator {
    /// Send a vector to `dest`. Waits only while the lane to `dest` is full.
    pub async fn send(&self, dest: Rank, data: Vec<Element>) -> Result<()> {
        let link = self.link(dest)?;
        self.send_on(&link.data, dest, data).await
    }

    /// Receive the next vector `src` sent to this rank.
    ///
    /// Blocks until a message arrives, `src` drops its communicator, or the
    /// group aborts. There is no timeout.
    pub async fn recv(&self, src: Rank) -> Result<Vec<Element>> {
        let lanes = self.lanes(src)?;
        self.recv_on(&lanes.data, src).await
    }

    /// Send `data` to `dest` and receive from `source` as a single operation.
    ///
    /// Both halves are driven together, so a ring of ranks that all call
    /// `exchange` at once cannot deadlock on send/receive ordering.
    pub async fn exchange(
        &self,
        data: Vec<Element>,
        dest: Rank,
        source: Rank,
    ) -> Result<Vec<Element>> {
        let (_, received) = tokio::try_join!(self.send(dest, data), self.recv(source))?;
        Ok(received)
    }

    /// Send a control message to `dest`.
    pub async fn send_control(&self, dest: Rank, msg: ControlMessage) -> Result<()> {
        let link = self.link(dest)?;
        self.send_on(&link.control, dest, msg).await
    }

    /// Receive the next control message from `src`.
    pub async fn recv_control(&self, src: Rank) -> Result<ControlMessage> {
        let lanes = self.lanes(src)?;
        self.recv_on(&lanes.control, src).await
    }

    async fn send_on<T>(&self, tx: &mpsc::Sender<T>, dest: Rank, msg: T) -> Result<()> {
        self.check_aborted()?;
        tokio::select! {
            biased;
            code = self.abort.triggered() => return Err(RingtreeError::Aborted { code }),
            res = tx.send(msg) => res.map_err(|_| RingtreeError::PeerDisconnected { rank: dest })?,
        }
        self.messages_sent.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn recv_on<T>(&self, lane: &Mutex<mpsc::Receiver<T>>, src: Rank) -> Result<T> {
        let mut rx = lane.lock().await;
        tokio::select! {
            biased;
            code = self.abort.triggered() => Err(RingtreeError::Aborted { code }),
            msg = rx.recv() => msg.ok_or(RingtreeError::PeerDisconnected { rank: src }),
        }
    }
}
