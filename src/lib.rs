pub mod collective;
pub mod comm;
pub mod config;
pub mod error;
pub mod harness;
pub mod output;
pub mod reduce;
pub mod sync_print;
pub mod transport;
pub mod types;

pub use collective::{barrier, ring_allreduce, tree_allreduce};
pub use comm::{Communicator, abort_code, run_spmd};
pub use config::RingtreeConfig;
pub use error::{Result, RingtreeError};
pub use harness::{BenchReport, CheckSummary, TestCase, bench_allreduce, check_allreduce};
pub use output::{Captured, Output};
pub use sync_print::sync_print;
pub use transport::AbortSignal;
pub use types::{ControlMessage, Element, Rank, ReduceOp};
