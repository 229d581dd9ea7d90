use ringtree::{Element, ReduceOp, tree_allreduce};

use super::helpers::{fold, pattern, run_collective};

#[tokio::test]
async fn test_tree_4_nodes_all_ops() {
    let cases = [
        (ReduceOp::Sum, vec![26, -26, 26]),
        (ReduceOp::Prod, vec![1680, 1680, 1680]),
        (ReduceOp::Min, vec![5, -8, 5]),
        (ReduceOp::Max, vec![8, -5, 8]),
    ];
    for (op, expected) in cases {
        let results = run_collective(4, move |comm| async move {
            let send = pattern(comm.rank(), 3);
            tree_allreduce(&comm, &send, op).await.unwrap()
        })
        .await;

        for (rank, res) in results.iter().enumerate() {
            assert_eq!(res, &expected, "rank {rank} tree allreduce {op} failed");
        }
    }
}

#[tokio::test]
async fn test_tree_non_power_of_two_worlds() {
    for world in 1..=11u32 {
        for op in ReduceOp::ALL {
            let results = run_collective(world, move |comm| async move {
                let rank = comm.rank() as Element;
                let send: Vec<Element> = (0..5).map(|i| (rank * 7 + i * 3) % 11 - 5).collect();
                let out = tree_allreduce(&comm, &send, op).await.unwrap();
                (send, out)
            })
            .await;

            let inputs: Vec<_> = results.iter().map(|(s, _)| s.clone()).collect();
            let expected = fold(&inputs, op);
            for (rank, (_, out)) in results.iter().enumerate() {
                assert_eq!(out, &expected, "world {world} op {op} rank {rank}");
            }
        }
    }
}

#[tokio::test]
async fn test_tree_message_count() {
    for world in [1u32, 2, 3, 5, 6, 8, 13] {
        let sent = run_collective(world, |comm| async move {
            tree_allreduce(&comm, &[1, 2, 3], ReduceOp::Max)
                .await
                .unwrap();
            comm.messages_sent()
        })
        .await;

        // P-1 messages up the tree and P-1 back down.
        let total: u64 = sent.iter().sum();
        assert_eq!(total, 2 * u64::from(world - 1), "world {world}");
    }
}

#[tokio::test]
async fn test_tree_single_rank_returns_input() {
    for op in ReduceOp::ALL {
        let results = run_collective(1, move |comm| async move {
            let out = tree_allreduce(&comm, &[-3, 8], op).await.unwrap();
            (out, comm.messages_sent())
        })
        .await;
        assert_eq!(results[0], (vec![-3, 8], 0));
    }
}

#[tokio::test]
async fn test_tree_repeated_calls_agree() {
    let results = run_collective(6, |comm| async move {
        let send = pattern(comm.rank(), 12);
        let mut outs = Vec::new();
        for op in [ReduceOp::Min, ReduceOp::Min, ReduceOp::Prod, ReduceOp::Prod] {
            outs.push(tree_allreduce(&comm, &send, op).await.unwrap());
        }
        outs
    })
    .await;

    for outs in &results {
        assert_eq!(outs[0], outs[1]);
        assert_eq!(outs[2], outs[3]);
        assert_eq!(outs, &results[0]);
    }
}

#[tokio::test]
async fn test_tree_product_wraps_like_reference() {
    // 5 * 6 * ... * 16 overflows i32; both sides wrap identically.
    let results = run_collective(12, |comm| async move {
        let send = pattern(comm.rank(), 2);
        let tree = tree_allreduce(&comm, &send, ReduceOp::Prod).await.unwrap();
        let reference = comm
            .reference_allreduce(&send, ReduceOp::Prod)
            .await
            .unwrap();
        (tree, reference)
    })
    .await;

    for (tree, reference) in results {
        assert_eq!(tree, reference);
    }
}

#[tokio::test]
async fn test_tree_large_vector() {
    let count = 1024 * 1024 + 1;
    let results = run_collective(5, move |comm| async move {
        let send = pattern(comm.rank(), count);
        let out = tree_allreduce(&comm, &send, ReduceOp::Max).await.unwrap();
        (out[0], out[1], out[count - 1], out.len())
    })
    .await;

    for res in results {
        assert_eq!(res, (9, -5, 9, count));
    }
}
