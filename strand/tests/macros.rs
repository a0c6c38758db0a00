use strand::task::{self, TaskState};
use strand::{SharedLog, WorkFailure, yield_now};

#[strand::test]
async fn test_macro_runs_async_body() {
    let handle = task::launch(|| 40 + 2);
    assert_eq!(handle.await, Ok(42));
}

#[strand::test(worker_threads = 1)]
async fn test_macro_single_worker_interleaves_with_yield() {
    let log = SharedLog::new();

    let task_log = log.clone();
    let handle = task::spawn(async move {
        task_log.append("task");
    });

    // The launching task gives up the only worker so the other can run.
    while handle.state() != TaskState::Completed {
        yield_now().await;
    }
    log.append("caller");

    assert_eq!(handle.await, Ok(()));
    assert_eq!(log.snapshot(), vec!["task", "caller"]);
}

#[strand::test(worker_threads = 2)]
async fn test_macro_returns_result() -> Result<(), WorkFailure> {
    let value = task::try_launch(|| "8".parse::<u8>()).await?;
    assert_eq!(value, 8);
    Ok(())
}

#[strand::test]
async fn test_macro_accepts_sendable_boxed_error()
-> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let value: u8 = task::launch(|| "12".parse::<u8>()).await??;
    assert_eq!(value, 12);
    Ok(())
}

#[strand::test(worker_threads = 2)]
async fn test_awaited_failures_surface() {
    let panicked = task::launch(|| -> u8 { panic!("awaited boom") });
    assert_eq!(
        panicked.await,
        Err(WorkFailure::Panicked {
            message: "awaited boom".into()
        })
    );

    let errored = task::try_launch(|| "x1".parse::<u8>()).await;
    assert!(matches!(errored, Err(WorkFailure::Errored { .. })));

    let spawned = task::spawn(async {
        let values: Vec<u8> = Vec::new();
        values[1]
    });
    assert!(spawned.await.unwrap_err().is_panic());
}
