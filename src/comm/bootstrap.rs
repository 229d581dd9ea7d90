use crate::error::{Result, RingtreeError};
use crate::transport::AbortSignal;
use crate::transport::mesh::local_mesh;
use std::sync::atomic::AtomicU64;

use super::Communicator;

impl Communicator {
    /// Bootstrap a group of `world_size` ranks living in this process.
    ///
    /// Returns one communicator per rank, indexed by rank, all sharing a
    /// single abort signal. Lanes buffer at most `lane_capacity` messages.
    pub fn bootstrap_local(world_size: u32, lane_capacity: usize) -> Result<Vec<Communicator>> {
        if world_size == 0 {
            return Err(RingtreeError::Config("world size must be at least 1".into()));
        }

        let abort = AbortSignal::new();
        let comms = local_mesh(world_size, lane_capacity)
            .into_iter()
            .map(|ep| Communicator {
                rank: ep.rank,
                world_size,
                links: ep.links,
                lanes: ep.lanes,
                abort: abort.clone(),
                messages_sent: AtomicU64::new(0),
                barrier_epoch: AtomicU64::new(0),
            })
            .collect();

        tracing::debug!(world_size, lane_capacity, "local process group formed");
        Ok(comms)
    }
}
