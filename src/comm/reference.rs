//! Trusted reference collectives.
//!
//! Every rank sends its whole vector to every peer and folds all P
//! contributions in rank order. This is O(P²) messages and deliberately
//! shares no code path with the ring or tree algorithms, so it can serve
//! as the correctness oracle and the performance baseline.

use crate::error::{Result, RingtreeError};
use crate::reduce::reduce_slice;
use crate::types::{Element, Rank, ReduceOp};
use futures::future::try_join_all;

use super::Communicator;

impl Communicator {
    /// Allreduce `send` under `op`, returning the result on every rank.
    pub async fn reference_allreduce(
        &self,
        send: &[Element],
        op: ReduceOp,
    ) -> Result<Vec<Element>> {
        if self.world_size <= 1 {
            return Ok(send.to_vec());
        }

        let rank = self.rank;
        let fan_out = try_join_all(
            (0..self.world_size)
                .filter(|&r| r != rank)
                .map(|r| self.send(r, send.to_vec())),
        );
        let (_, folded) = tokio::try_join!(fan_out, self.fold_contributions(send, op))?;
        Ok(folded)
    }

    /// Allreduce a single element.
    pub async fn allreduce_scalar(&self, value: Element, op: ReduceOp) -> Result<Element> {
        let reduced = self.reference_allreduce(&[value], op).await?;
        reduced
            .first()
            .copied()
            .ok_or(RingtreeError::BufferSizeMismatch {
                expected: 1,
                actual: 0,
            })
    }

    /// Group-wide logical AND.
    pub async fn all_land(&self, flag: bool) -> Result<bool> {
        let reduced = self.allreduce_scalar(Element::from(flag), ReduceOp::Min).await?;
        Ok(reduced != 0)
    }

    async fn fold_contributions(&self, own: &[Element], op: ReduceOp) -> Result<Vec<Element>> {
        let mut acc = self.contribution(0, own).await?;
        for r in 1..self.world_size {
            let next = self.contribution(r, own).await?;
            reduce_slice(&mut acc, &next, op)?;
        }
        Ok(acc)
    }

    async fn contribution(&self, from: Rank, own: &[Element]) -> Result<Vec<Element>> {
        if from == self.rank {
            return Ok(own.to_vec());
        }
        let received = self.recv(from).await?;
        if received.len() != own.len() {
            return Err(RingtreeError::BufferSizeMismatch {
                expected: own.len(),
                actual: received.len(),
            });
        }
        Ok(received)
    }
}
