mod common;

use pretty_assertions::assert_eq;
use strand::task::{self, JoinSet};
use strand::{RuntimeBuilder, SharedLog, Timeout, WorkFailure};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

#[test]
fn test_join_all_waits_for_every_task() {
    common::init_tracing();
    let rt = RuntimeBuilder::new().worker_threads(4).build();
    let mut set = JoinSet::new();

    for i in 0..8u64 {
        set.insert(rt.launch(move || {
            thread::sleep(Duration::from_millis(8 - i));
            i * 10
        }));
    }
    assert_eq!(set.len(), 8);

    assert_eq!(set.join_all(), Ok(vec![0, 10, 20, 30, 40, 50, 60, 70]));
    assert!(set.is_empty());
}

#[test]
fn test_join_all_waits_past_a_failure() {
    let rt = RuntimeBuilder::new().worker_threads(2).build();
    let log = SharedLog::new();
    let mut set = JoinSet::new();

    set.insert(rt.launch(|| -> u8 { panic!("first member") }));

    let slow_log = log.clone();
    set.insert(rt.launch(move || {
        thread::sleep(Duration::from_millis(30));
        slow_log.append("slow member done");
        2
    }));

    set.insert(rt.try_launch(|| "nine".parse::<u8>()));

    assert_eq!(
        set.join_all(),
        Err(WorkFailure::Panicked {
            message: "first member".into()
        })
    );
    assert_eq!(log.snapshot(), vec!["slow member done"]);
}

#[test]
fn test_join_all_timeout_leaves_set_intact() {
    let rt = RuntimeBuilder::new().worker_threads(2).build();
    let (release, gate) = mpsc::channel::<()>();
    let mut set = JoinSet::new();

    set.insert(rt.launch(|| "quick"));
    set.insert(rt.launch(move || {
        gate.recv().unwrap();
        "gated"
    }));

    assert_eq!(
        set.join_all_timeout(Duration::from_millis(20)),
        Err(Timeout {
            waited: Duration::from_millis(20)
        })
    );
    assert_eq!(set.len(), 2);

    release.send(()).unwrap();

    assert_eq!(
        set.join_all_timeout(Duration::from_secs(5)),
        Ok(Ok(vec!["quick", "gated"]))
    );
    assert!(set.is_empty());
}

#[strand::test(worker_threads = 2)]
async fn test_join_next_yields_each_outcome() {
    let mut set = JoinSet::new();

    for i in 0..5u32 {
        set.launch(move || i + 1);
    }
    set.spawn(async { 100 });
    set.insert(task::try_launch(|| "x".parse::<u32>()));

    let mut values = Vec::new();
    let mut failures = 0;

    while let Some(outcome) = set.join_next().await {
        match outcome {
            Ok(value) => values.push(value),
            Err(failure) => {
                assert!(matches!(failure, WorkFailure::Errored { .. }));
                failures += 1;
            }
        }
    }

    values.sort_unstable();
    assert_eq!(values, vec![1, 2, 3, 4, 5, 100]);
    assert_eq!(failures, 1);
    assert!(set.join_next().await.is_none());
}

#[test]
fn test_dropped_set_does_not_cancel() {
    let rt = RuntimeBuilder::new().worker_threads(2).build();
    let (done_tx, done_rx) = mpsc::channel();

    let mut set = JoinSet::new();
    set.insert(rt.launch(move || done_tx.send("ran anyway").unwrap()));
    drop(set);

    assert_eq!(
        done_rx.recv_timeout(Duration::from_secs(5)),
        Ok("ran anyway")
    );
}
