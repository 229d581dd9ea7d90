mod allreduce;
mod barrier;
mod broadcast;
mod helpers;
mod reduce;

pub use allreduce::{ring_allreduce, tree_allreduce};
pub use barrier::barrier;
