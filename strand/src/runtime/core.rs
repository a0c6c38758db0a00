use super::context::in_context;
use super::executor::core::Executor;
use super::task::JoinHandle;
use crate::error::WorkFailure;

use std::fmt;
use std::io;

/// The task launcher.
///
/// `Runtime` is responsible for:
/// - launching work onto its worker pool,
/// - handing back a [`JoinHandle`] per task,
/// - providing a synchronous entry point via [`block_on`](Self::block_on).
///
/// Its methods can be called from any thread. Dropping the runtime stops
/// the workers; tasks that had not finished by then fail with
/// [`WorkFailure::Abandoned`].
///
/// # Examples
///
/// ```rust
/// use strand::{Runtime, SharedLog};
///
/// let runtime = Runtime::new();
/// let log = SharedLog::new();
///
/// let handle = runtime.launch({
///     let log = log.clone();
///     move || {
///         log.append("Hello,");
///         log.append("word!");
///     }
/// });
///
/// handle.join().unwrap();
/// assert_eq!(log.snapshot(), ["Hello,", "word!"]);
/// ```
pub struct Runtime {
    /// Task executor responsible for scheduling and running work.
    executor: Executor,

    /// Size of the worker pool.
    worker_threads: usize,
}

impl Runtime {
    /// Creates a runtime with the default configuration.
    ///
    /// See [`RuntimeBuilder`](crate::RuntimeBuilder) for the defaults.
    ///
    /// # Panics
    ///
    /// Panics if the worker threads cannot be spawned.
    pub fn new() -> Self {
        super::builder::RuntimeBuilder::new().build()
    }

    /// Starts a runtime with `worker_threads` workers named
    /// `<thread_name>-<id>`.
    pub(crate) fn start(worker_threads: usize, thread_name: &str) -> io::Result<Self> {
        let executor = Executor::new(worker_threads, thread_name)?;

        tracing::debug!(worker_threads, thread_name, "runtime started");

        Ok(Self {
            executor,
            worker_threads,
        })
    }

    /// Launches a closure onto the worker pool.
    ///
    /// The closure starts no earlier than this call and runs on a worker
    /// thread, concurrently with whatever the caller does next. It may
    /// block while it works.
    pub fn launch<W, T>(&self, work: W) -> JoinHandle<T>
    where
        W: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        self.executor.spawn(async move { Ok(work()) })
    }

    /// Launches fallible work onto the worker pool.
    ///
    /// An `Err` returned by `work` surfaces from every join as
    /// [`WorkFailure::Errored`].
    pub fn try_launch<W, T, E>(&self, work: W) -> JoinHandle<T>
    where
        W: FnOnce() -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: fmt::Display,
    {
        self.executor
            .spawn(async move { work().map_err(WorkFailure::errored) })
    }

    /// Spawns a future onto the runtime.
    ///
    /// The future is polled on the worker pool until it completes. It may
    /// launch further tasks with [`task::spawn`](crate::task::spawn) and
    /// await their handles.
    pub fn spawn<F, T>(&self, future: F) -> JoinHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        self.executor.spawn(async move { Ok(future.await) })
    }

    /// Runs a future to completion, blocking the current thread.
    ///
    /// This method is typically used as the synchronous entry point
    /// of the runtime (e.g. in `main` or tests).
    ///
    /// The future runs as a task on a worker thread, which is why both it
    /// and its output must be `Send`.
    ///
    /// # Panics
    ///
    /// Panics if the future panics, re-raising its message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let runtime = strand::RuntimeBuilder::new().worker_threads(2).build();
    ///
    /// let result = runtime.block_on(async { 42 });
    /// assert_eq!(result, 42);
    /// ```
    pub fn block_on<F>(&self, future: F) -> F::Output
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        if in_context() {
            tracing::warn!("block_on called from inside a runtime; a worker is now blocked");
        }

        match self.spawn(future).into_result() {
            Ok(value) => value,
            Err(failure) => panic!("block_on: {failure}"),
        }
    }

    /// Number of worker threads in the pool.
    pub fn worker_threads(&self) -> usize {
        self.worker_threads
    }

    /// Number of launched tasks that have not finished yet.
    pub fn live_tasks(&self) -> usize {
        self.executor.live_tasks()
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("worker_threads", &self.worker_threads)
            .field("live_tasks", &self.live_tasks())
            .finish()
    }
}

impl Drop for Runtime {
    /// Shuts down the runtime.
    ///
    /// This performs the following steps:
    /// 1. Refuses new launches and wakes every parked worker
    /// 2. Joins all worker threads
    /// 3. Fails the tasks that never finished
    fn drop(&mut self) {
        tracing::debug!("runtime shutting down");
        self.executor.shutdown();
    }
}
