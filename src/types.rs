/// Rank of a participant in a process group (0-indexed).
pub type Rank = u32;

/// Element type carried by every collective in this crate.
pub type Element = i32;

/// Reduction operations for collective communication.
///
/// The set is closed: every algorithm in this crate is written against
/// [`ReduceOp::combine`] and never branches on the variant itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReduceOp {
    /// Element-wise sum across ranks.
    Sum,
    /// Element-wise product across ranks.
    Prod,
    /// Element-wise minimum across ranks.
    Min,
    /// Element-wise maximum across ranks.
    Max,
}

impl ReduceOp {
    /// Every operator, in the order the correctness suite runs them.
    pub const ALL: [ReduceOp; 4] = [ReduceOp::Sum, ReduceOp::Prod, ReduceOp::Min, ReduceOp::Max];

    /// Combine two elements. Sum and product wrap on overflow.
    #[inline]
    pub const fn combine(self, a: Element, b: Element) -> Element {
        match self {
            ReduceOp::Sum => a.wrapping_add(b),
            ReduceOp::Prod => a.wrapping_mul(b),
            ReduceOp::Min => {
                if b < a {
                    b
                } else {
                    a
                }
            }
            ReduceOp::Max => {
                if b > a {
                    b
                } else {
                    a
                }
            }
        }
    }

    /// Name used for the operator in the TAP output stream.
    pub const fn label(self) -> &'static str {
        match self {
            ReduceOp::Sum => "MPI_SUM",
            ReduceOp::Prod => "MPI_PROD",
            ReduceOp::Min => "MPI_MIN",
            ReduceOp::Max => "MPI_MAX",
        }
    }
}

impl std::fmt::Display for ReduceOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            ReduceOp::Sum => "sum",
            ReduceOp::Prod => "prod",
            ReduceOp::Min => "min",
            ReduceOp::Max => "max",
        })
    }
}

/// Messages carried on the control lane, separate from vector payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMessage {
    /// Hand-off token for rank-ordered printing.
    PrintToken,
    /// A rank has reached barrier `epoch` (sent to rank 0).
    Barrier { epoch: u64 },
    /// Rank 0 releases barrier `epoch`.
    BarrierAck { epoch: u64 },
}
