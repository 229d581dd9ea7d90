use crate::types::{Rank, ReduceOp};

pub type Result<T> = std::result::Result<T, RingtreeError>;

#[derive(Debug, thiserror::Error)]
pub enum RingtreeError {
    #[error("peer {rank} disconnected unexpectedly")]
    PeerDisconnected { rank: Rank },

    #[error("rank {rank} not found in group")]
    UnknownPeer { rank: Rank },

    #[error("invalid rank {rank}: world size is {world_size}")]
    InvalidRank { rank: Rank, world_size: u32 },

    #[error("{algorithm} does not support reduce op {op}")]
    UnsupportedOp {
        op: ReduceOp,
        algorithm: &'static str,
    },

    #[error("buffer size mismatch: expected {expected} elements, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("unable to allocate a vector of {count} elements")]
    OutOfMemory { count: usize },

    #[error("unexpected message from rank {rank}: expected {expected}, got {got}")]
    UnexpectedMessage {
        rank: Rank,
        expected: &'static str,
        got: String,
    },

    #[error("{operation} failed at rank {rank}: {reason}")]
    CollectiveFailed {
        operation: &'static str,
        rank: Rank,
        reason: String,
    },

    #[error("process group aborted with code {code}")]
    Aborted { code: i32 },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("internal lock poisoned: {0}")]
    LockPoisoned(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("runtime error: {message}")]
    Runtime {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl RingtreeError {
    /// Create a `Runtime` error with a message and a source error.
    pub fn runtime_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Runtime {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The abort code, if this error is a group-wide abort.
    pub fn abort_code(&self) -> Option<i32> {
        match self {
            Self::Aborted { code } => Some(*code),
            _ => None,
        }
    }
}
