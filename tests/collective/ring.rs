use ringtree::{Element, ReduceOp, RingtreeError, ring_allreduce};

use super::helpers::{fold, pattern, run_collective};

#[tokio::test]
async fn test_ring_4_nodes_sum() {
    let results = run_collective(4, |comm| async move {
        let send = pattern(comm.rank(), 3);
        ring_allreduce(&comm, &send, ReduceOp::Sum).await.unwrap()
    })
    .await;

    for (rank, res) in results.iter().enumerate() {
        assert_eq!(res, &vec![26, -26, 26], "rank {rank} ring allreduce failed");
    }
}

#[tokio::test]
async fn test_ring_uneven_world() {
    for world in [2u32, 3, 5, 7] {
        let results = run_collective(world, |comm| async move {
            let rank = comm.rank() as Element;
            let send: Vec<Element> = (0..7).map(|i| i * (rank + 1)).collect();
            ring_allreduce(&comm, &send, ReduceOp::Sum).await.unwrap()
        })
        .await;

        let total = (world * (world + 1) / 2) as Element;
        let expected: Vec<Element> = (0..7).map(|i| i * total).collect();
        for res in &results {
            assert_eq!(res, &expected, "world {world}");
        }
    }
}

#[tokio::test]
async fn test_ring_single_rank_returns_input() {
    let results = run_collective(1, |comm| async move {
        let out = ring_allreduce(&comm, &[4, -1, 9], ReduceOp::Sum)
            .await
            .unwrap();
        (out, comm.messages_sent())
    })
    .await;

    assert_eq!(results[0], (vec![4, -1, 9], 0));
}

#[tokio::test]
async fn test_ring_message_count() {
    let sent = run_collective(5, |comm| async move {
        ring_allreduce(&comm, &[1, 2], ReduceOp::Sum).await.unwrap();
        comm.messages_sent()
    })
    .await;

    // P-1 rounds, one message per rank per round.
    assert!(sent.iter().all(|&s| s == 4));
}

#[tokio::test]
async fn test_ring_repeated_calls_agree() {
    let results = run_collective(3, |comm| async move {
        let send = pattern(comm.rank(), 12);
        let first = ring_allreduce(&comm, &send, ReduceOp::Sum).await.unwrap();
        let second = ring_allreduce(&comm, &send, ReduceOp::Sum).await.unwrap();
        (first, second, send)
    })
    .await;

    let inputs: Vec<_> = results.iter().map(|(_, _, s)| s.clone()).collect();
    let expected = fold(&inputs, ReduceOp::Sum);
    for (first, second, _) in &results {
        assert_eq!(first, &expected);
        assert_eq!(second, &expected);
    }
}

#[tokio::test]
async fn test_ring_large_vector() {
    let count = 1024 * 1024 + 1;
    let results = run_collective(3, move |comm| async move {
        let send = pattern(comm.rank(), count);
        let out = ring_allreduce(&comm, &send, ReduceOp::Sum).await.unwrap();
        (out[0], out[1], out[count - 1], out.len())
    })
    .await;

    // Count is odd, so the last entry has an even index.
    for res in results {
        assert_eq!(res, (18, -18, 18, count));
    }
}

#[tokio::test]
async fn test_ring_prod_aborts_group() {
    let results = run_collective(4, |comm| async move {
        let send = pattern(comm.rank(), 3);
        ring_allreduce(&comm, &send, ReduceOp::Prod).await
    })
    .await;

    for res in results {
        assert!(
            matches!(res, Err(RingtreeError::Aborted { code: 1 })),
            "expected abort, got {res:?}"
        );
    }
}

#[tokio::test]
async fn test_ring_abort_unblocks_peers() {
    // Only rank 0 passes an unsupported op; the others are left waiting on
    // it inside the ring and must be released by the abort.
    let results = run_collective(4, |comm| async move {
        let op = if comm.rank() == 0 {
            ReduceOp::Min
        } else {
            ReduceOp::Sum
        };
        ring_allreduce(&comm, &pattern(comm.rank(), 3), op).await
    })
    .await;

    for res in results {
        assert!(matches!(res, Err(RingtreeError::Aborted { code: 1 })));
    }
}
