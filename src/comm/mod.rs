mod bootstrap;
mod launch;
mod messaging;
mod reference;

pub use launch::{abort_code, run_spmd};

use crate::error::{Result, RingtreeError};
use crate::transport::AbortSignal;
use crate::transport::mesh::{PeerLanes, PeerLink};
use crate::types::Rank;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// One rank's handle on a fixed process group.
///
/// Every collective in this crate takes a `&Communicator` explicitly; there
/// is no ambient rank state. The group is immutable for the life of the
/// communicator.
///
/// # Example
///
/// ```
/// use ringtree::Communicator;
///
/// # fn main() -> ringtree::Result<()> {
/// let comms = Communicator::bootstrap_local(4, 64)?;
///
/// // Each communicator has a unique rank in [0, world_size).
/// assert_eq!(comms[0].rank(), 0);
/// assert_eq!(comms[3].world_size(), 4);
/// # Ok(())
/// # }
/// ```
pub struct Communicator {
    rank: Rank,
    world_size: u32,
    /// Sending side: one link per remote rank.
    links: HashMap<Rank, PeerLink>,
    /// Receiving side: one pair of lanes per remote rank.
    lanes: HashMap<Rank, PeerLanes>,
    abort: AbortSignal,
    messages_sent: AtomicU64,
    barrier_epoch: AtomicU64,
}

impl Communicator {
    /// This communicator's rank within the group (0-indexed).
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Total number of ranks in the group.
    pub fn world_size(&self) -> u32 {
        self.world_size
    }

    /// Point-to-point messages (data and control) this rank has sent.
    pub fn messages_sent(&self) -> u64 {
        self.messages_sent.load(Ordering::Relaxed)
    }

    /// Get the next barrier epoch. All ranks advance it in lockstep since
    /// barriers are collective.
    pub(crate) fn next_barrier_epoch(&self) -> u64 {
        self.barrier_epoch.fetch_add(1, Ordering::Relaxed)
    }

    /// Abort the whole group with `code`.
    ///
    /// Every rank blocked in, or later entering, a send or receive observes
    /// the abort. Returns the error the caller should propagate.
    pub fn abort(&self, code: i32) -> RingtreeError {
        if self.abort.trigger(code) {
            tracing::error!(rank = self.rank, code, "aborting process group");
        }
        RingtreeError::Aborted {
            code: self.abort.status().unwrap_or(code),
        }
    }

    /// The abort code, if the group has been aborted.
    pub fn abort_status(&self) -> Option<i32> {
        self.abort.status()
    }

    pub(crate) fn link(&self, rank: Rank) -> Result<&PeerLink> {
        self.check_rank(rank)?;
        self.links
            .get(&rank)
            .ok_or(RingtreeError::UnknownPeer { rank })
    }

    pub(crate) fn lanes(&self, rank: Rank) -> Result<&PeerLanes> {
        self.check_rank(rank)?;
        self.lanes
            .get(&rank)
            .ok_or(RingtreeError::UnknownPeer { rank })
    }

    fn check_rank(&self, rank: Rank) -> Result<()> {
        if rank >= self.world_size {
            return Err(RingtreeError::InvalidRank {
                rank,
                world_size: self.world_size,
            });
        }
        Ok(())
    }

    fn check_aborted(&self) -> Result<()> {
        match self.abort.status() {
            Some(code) => Err(RingtreeError::Aborted { code }),
            None => Ok(()),
        }
    }
}
