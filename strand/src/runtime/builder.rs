use super::Runtime;

use std::io;
use std::thread;

/// Default prefix for worker thread names.
const DEFAULT_THREAD_NAME: &str = "strand-worker";

/// Builder for configuring and creating a runtime.
///
/// `RuntimeBuilder` allows customizing runtime parameters before
/// constructing the runtime: the size of the worker pool and the name
/// given to its threads.
///
/// # Examples
///
/// ```rust
/// let runtime = strand::RuntimeBuilder::new()
///     .worker_threads(4)
///     .thread_name("ingest")
///     .build();
///
/// assert_eq!(runtime.worker_threads(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct RuntimeBuilder {
    /// Number of worker threads in the executor.
    worker_threads: usize,

    /// Prefix of worker thread names.
    thread_name: String,
}

impl RuntimeBuilder {
    /// Creates a new `RuntimeBuilder` with default configuration.
    ///
    /// By default, the number of worker threads is set to the number
    /// of available logical CPUs, falling back to `1` if unavailable,
    /// and workers are named `strand-worker-<id>`.
    pub fn new() -> Self {
        let worker_threads = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self {
            worker_threads,
            thread_name: DEFAULT_THREAD_NAME.to_owned(),
        }
    }

    /// Sets the number of worker threads used by the runtime.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn worker_threads(mut self, n: usize) -> Self {
        assert!(n > 0, "worker_threads must be > 0");

        self.worker_threads = n;
        self
    }

    /// Sets the prefix of worker thread names.
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Builds the runtime, returning an error if a worker thread cannot
    /// be spawned.
    pub fn try_build(self) -> io::Result<Runtime> {
        Runtime::start(self.worker_threads, &self.thread_name)
    }

    /// Builds the runtime with the configured options.
    ///
    /// # Panics
    ///
    /// Panics if a worker thread cannot be spawned, like
    /// [`std::thread::spawn`].
    pub fn build(self) -> Runtime {
        match self.try_build() {
            Ok(runtime) => runtime,
            Err(err) => panic!("failed to spawn runtime worker threads: {err}"),
        }
    }
}

impl Default for RuntimeBuilder {
    /// Creates a default `RuntimeBuilder`.
    fn default() -> Self {
        Self::new()
    }
}
