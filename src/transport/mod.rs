//! In-process transport: one ordered lane per (source, destination) pair and
//! a group-wide abort signal.

mod abort;
pub(crate) mod mesh;

pub use abort::AbortSignal;
