use crate::types::{ControlMessage, Element, Rank};
use std::collections::HashMap;
use tokio::sync::{Mutex, mpsc};

/// Sending side of the link to one peer.
pub(crate) struct PeerLink {
    pub data: mpsc::Sender<Vec<Element>>,
    pub control: mpsc::Sender<ControlMessage>,
}

/// Receiving side of the lanes from one peer. Each lane is FIFO, which is
/// what keeps successive collectives from confusing each other's messages.
pub(crate) struct PeerLanes {
    pub data: Mutex<mpsc::Receiver<Vec<Element>>>,
    pub control: Mutex<mpsc::Receiver<ControlMessage>>,
}

/// One rank's share of a fully connected local mesh.
pub(crate) struct MeshEndpoint {
    pub rank: Rank,
    pub links: HashMap<Rank, PeerLink>,
    pub lanes: HashMap<Rank, PeerLanes>,
}

/// Build a full mesh of bounded lanes between `world_size` ranks.
///
/// Every ordered pair (src, dst) with `src != dst` gets its own data lane and
/// control lane holding at most `capacity` undelivered messages.
pub(crate) fn local_mesh(world_size: u32, capacity: usize) -> Vec<MeshEndpoint> {
    let capacity = capacity.max(1);
    let mut endpoints: Vec<MeshEndpoint> = (0..world_size)
        .map(|rank| MeshEndpoint {
            rank,
            links: HashMap::new(),
            lanes: HashMap::new(),
        })
        .collect();

    for src in 0..world_size {
        for dst in 0..world_size {
            if src == dst {
                continue;
            }
            let (data_tx, data_rx) = mpsc::channel(capacity);
            let (ctrl_tx, ctrl_rx) = mpsc::channel(capacity);
            endpoints[src as usize].links.insert(
                dst,
                PeerLink {
                    data: data_tx,
                    control: ctrl_tx,
                },
            );
            endpoints[dst as usize].lanes.insert(
                src,
                PeerLanes {
                    data: Mutex::new(data_rx),
                    control: Mutex::new(ctrl_rx),
                },
            );
        }
    }

    endpoints
}
