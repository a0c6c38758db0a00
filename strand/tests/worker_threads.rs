use strand::task::{launch, spawn};
use strand::{RuntimeBuilder, SharedLog, yield_now};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::thread;

#[test]
fn test_single_worker_thread() {
    let rt = RuntimeBuilder::new().worker_threads(1).build();

    let result = rt.block_on(async { 42 });
    assert_eq!(result, 42);
    assert_eq!(rt.worker_threads(), 1);
}

#[test]
fn test_multiple_worker_threads() {
    let rt = RuntimeBuilder::new().worker_threads(4).build();

    let result = rt.block_on(async { 100 });
    assert_eq!(result, 100);
}

#[test]
fn test_work_runs_off_the_caller_thread() {
    let rt = RuntimeBuilder::new()
        .worker_threads(2)
        .thread_name("pool")
        .build();

    let caller = thread::current().id();
    let handle = rt.launch(|| {
        let current = thread::current();
        (current.id(), current.name().map(str::to_owned))
    });

    let (worker, name) = handle.join().unwrap();
    assert_ne!(worker, caller);

    let name = name.unwrap();
    assert!(name == "pool-0" || name == "pool-1", "unexpected name {name}");
}

#[test]
fn test_worker_threads_parallel_execution() {
    let rt = RuntimeBuilder::new().worker_threads(4).build();

    let counter = Arc::new(Mutex::new(0));
    let results = SharedLog::new();

    let counter_clone = counter.clone();
    let results_clone = results.clone();

    rt.block_on(async move {
        let handles: Vec<_> = (0..10)
            .map(|i| {
                let counter = counter_clone.clone();
                let results = results_clone.clone();

                spawn(async move {
                    *counter.lock().unwrap() += 1;
                    results.append(i);
                    i * 2
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.await, Ok(i * 2));
        }
    });

    assert_eq!(*counter.lock().unwrap(), 10);
    assert_eq!(results.len(), 10);
}

#[test]
fn test_worker_threads_stress() {
    let rt = RuntimeBuilder::new().worker_threads(8).build();

    let counter = Arc::new(Mutex::new(0));

    let handles: Vec<_> = (0..100)
        .map(|_| {
            let counter = counter.clone();
            rt.launch(move || {
                *counter.lock().unwrap() += 1;
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(*counter.lock().unwrap(), 100);
}

#[test]
fn test_worker_threads_chain_spawn() {
    let rt = RuntimeBuilder::new().worker_threads(4).build();

    let result = rt.block_on(async {
        let handle1 = spawn(async {
            let handle2 = spawn(async {
                let handle3 = launch(|| 10);
                handle3.await.unwrap() + 20
            });
            handle2.await.unwrap() + 30
        });
        handle1.await.unwrap() + 40
    });

    assert_eq!(result, 100);
}

#[test]
fn test_worker_threads_two_threads() {
    let rt = RuntimeBuilder::new().worker_threads(2).build();

    let completed = Arc::new(Mutex::new(HashSet::new()));
    let completed_clone = completed.clone();

    rt.block_on(async move {
        let handles: Vec<_> = (0..20)
            .map(|i| {
                let completed = completed_clone.clone();
                spawn(async move {
                    completed.lock().unwrap().insert(i);
                    yield_now().await;
                    i
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }
    });

    let set = completed.lock().unwrap();
    assert_eq!(set.len(), 20);
    for i in 0..20 {
        assert!(set.contains(&i), "Task {} should have completed", i);
    }
}

#[test]
#[should_panic(expected = "worker_threads must be > 0")]
fn test_worker_threads_zero_panics() {
    let _ = RuntimeBuilder::new().worker_threads(0).build();
}

#[test]
fn test_worker_threads_sequential_runtimes() {
    for n in 1..=4 {
        let rt = RuntimeBuilder::new().worker_threads(n).build();
        let result = rt.block_on(async move { n * 10 });
        assert_eq!(result, n * 10);
        drop(rt);
    }
}

#[test]
fn test_worker_threads_nested_spawns() {
    let rt = RuntimeBuilder::new().worker_threads(4).build();

    let results = SharedLog::new();
    let results_clone = results.clone();

    rt.block_on(async move {
        let outer_handles: Vec<_> = (0..4)
            .map(|i| {
                let results = results_clone.clone();
                spawn(async move {
                    let inner_handles: Vec<_> = (0..5)
                        .map(|j| {
                            let results = results.clone();
                            launch(move || results.append(i * 10 + j))
                        })
                        .collect();

                    for handle in inner_handles {
                        handle.await.unwrap();
                    }
                })
            })
            .collect();

        for handle in outer_handles {
            handle.await.unwrap();
        }
    });

    assert_eq!(results.len(), 20);
}

#[test]
#[should_panic(expected = "block_on: task panicked: inside block_on")]
fn test_block_on_propagates_panic() {
    let rt = RuntimeBuilder::new().worker_threads(1).build();

    rt.block_on(async {
        let values: Vec<u8> = Vec::new();
        assert!(!values.is_empty(), "inside block_on");
    });
}

#[test]
#[should_panic(expected = "spawn must be called within the context of a runtime")]
fn test_spawn_outside_runtime_panics() {
    let _ = launch(|| 1);
}
