use ringtree::harness::{TestCase, check_input, verify_case};
use ringtree::{
    Output, ReduceOp, RingtreeConfig, abort_code, bench_allreduce, check_allreduce,
    ring_allreduce, run_spmd, tree_allreduce,
};
use std::time::Duration;

use super::helpers::run_collective;

fn small_config(world_size: u32) -> RingtreeConfig {
    RingtreeConfig {
        world_size,
        check_counts: vec![1, 3, 12],
        calibration_iters: 5,
        bench_budget: Duration::from_millis(10),
        ..RingtreeConfig::default()
    }
}

#[tokio::test]
async fn test_check_suite_reports_tap() {
    let cfg = small_config(3);
    let (out, captured) = Output::capture();

    let summaries = run_collective(3, move |comm| {
        let cfg = cfg.clone();
        let out = out.clone();
        async move { check_allreduce(&comm, &cfg, &out).await.unwrap() }
    })
    .await;

    let mut expected = vec!["1..12".to_string()];
    let mut number = 1;
    for count in [1, 3, 12] {
        for op in ReduceOp::ALL {
            expected.push(format!("ok {number} - {} count {count}", op.label()));
            number += 1;
        }
    }
    assert_eq!(captured.lines(), expected);
    assert_eq!(expected[1], "ok 1 - MPI_SUM count 1");

    for summary in summaries {
        assert_eq!(summary.total, 12);
        assert!(summary.all_passed());
    }
}

#[tokio::test]
async fn test_check_suite_default_counts() {
    let cfg = RingtreeConfig::default();
    let (out, captured) = Output::capture();

    let results = run_spmd(&cfg.clone(), move |comm| {
        let cfg = cfg.clone();
        let out = out.clone();
        async move { check_allreduce(&comm, &cfg, &out).await }
    })
    .await
    .unwrap();

    for res in results {
        assert!(res.unwrap().all_passed());
    }
    let lines = captured.lines();
    assert_eq!(lines.len(), 17);
    assert_eq!(lines[0], "1..16");
    assert_eq!(lines[16], "ok 16 - MPI_MAX count 1048577");
}

#[tokio::test]
async fn test_verify_case_reports_mismatch_in_rank_order() {
    let (out, captured) = Output::capture();

    let verdicts = run_collective(3, move |comm| {
        let out = out.clone();
        async move {
            let expect = check_input(comm.rank(), 4).unwrap();
            let mut got = expect.clone();
            if comm.rank() == 1 {
                got[2] += 1;
            }
            let case = TestCase {
                number: 7,
                op: ReduceOp::Min,
                count: 4,
            };
            verify_case(&comm, &out, case, &got, &expect).await.unwrap()
        }
    })
    .await;

    assert_eq!(verdicts, vec![false, false, false]);
    assert_eq!(
        captured.lines(),
        vec![
            "not ok 7 - MPI_MIN count 4: Not all processes have correct result",
            "    [rank: 0] Has correct result",
            "    [rank: 1] Has incorrect result, first mismatch at entry 2",
            "    [rank: 2] Has correct result",
        ]
    );
}

#[tokio::test]
async fn test_closed_form_sum() {
    for world in 1..=6u32 {
        let results = run_collective(world, |comm| async move {
            let send = check_input(comm.rank(), 5).unwrap();
            tree_allreduce(&comm, &send, ReduceOp::Sum).await.unwrap()
        })
        .await;

        let s = (world * (world + 9) / 2) as i32;
        for res in results {
            assert_eq!(res, vec![s, -s, s, -s, s], "world {world}");
        }
    }
}

#[tokio::test]
async fn test_bench_reports_one_line() {
    let cfg = small_config(3);
    let (out, captured) = Output::capture();

    let reports = run_collective(3, move |comm| {
        let cfg = cfg.clone();
        let out = out.clone();
        async move { bench_allreduce(&comm, &cfg, 16, &out).await.unwrap() }
    })
    .await;

    // Every rank agreed on the same repeat count.
    let repeats = reports[0].repeats;
    assert!(repeats >= 1);
    assert!(reports.iter().all(|r| r.repeats == repeats && r.count == 16));

    let lines = captured.lines();
    assert_eq!(lines.len(), 1);
    let fields: Vec<&str> = lines[0].split(' ').collect();
    assert_eq!(fields.len(), 5);
    assert_eq!(fields[0], "16");
    assert_eq!(fields[1], repeats.to_string());
    for f in &fields[2..] {
        let secs: f64 = f.parse().unwrap();
        assert!(secs >= 0.0);
    }
}

#[tokio::test]
async fn test_spmd_ring_prod_reports_abort_code() {
    let results = run_spmd(&small_config(4), |comm| async move {
        let send = check_input(comm.rank(), 3)?;
        ring_allreduce(&comm, &send, ReduceOp::Prod).await
    })
    .await
    .unwrap();

    assert_eq!(abort_code(&results), Some(1));
    assert!(results.iter().all(Result::is_err));
}
