use crate::runtime::context::enter_context;
use crate::runtime::executor::worker::Worker;
use crate::runtime::task::JoinHandle;
use crate::runtime::task::completion::Outcome;
use crate::runtime::task::core::schedule;
use crate::runtime::work_stealing::injector::Injector;
use crate::runtime::work_stealing::queue::LocalQueue;

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle as ThreadHandle};

/// Multi-threaded task executor.
///
/// The `Executor` is responsible for:
/// - spawning worker threads,
/// - coordinating task execution via work-stealing,
/// - integrating workers with the runtime context,
/// - managing orderly shutdown and thread joining.
///
/// It owns the global task injector and all worker threads.
pub(crate) struct Executor {
    /// Global injector queue shared by all workers.
    injector: Arc<Injector>,

    /// Local queues, one per worker.
    locals: Arc<Vec<Arc<LocalQueue>>>,

    /// Join handles for worker threads.
    handles: Vec<ThreadHandle<()>>,
}

impl Executor {
    /// Creates a new executor with the given number of worker threads.
    ///
    /// This method:
    /// - initializes the global injector,
    /// - creates one local queue per worker,
    /// - spawns named worker threads,
    /// - installs the runtime execution context for each worker.
    ///
    /// If a worker thread cannot be spawned, the workers already started
    /// are shut down and the error is returned.
    pub(crate) fn new(threads: usize, thread_name: &str) -> io::Result<Self> {
        let injector = Arc::new(Injector::new());

        let locals: Arc<Vec<_>> = Arc::new(
            (0..threads)
                .map(|_| Arc::new(LocalQueue::new()))
                .collect(),
        );

        let mut executor = Self {
            injector,
            locals,
            handles: Vec::with_capacity(threads),
        };

        for id in 0..threads {
            let worker = Worker::new(id, executor.locals.clone(), executor.injector.clone());

            let injector = executor.injector.clone();
            let locals = executor.locals.clone();

            executor.injector.enter_worker();

            let spawned = thread::Builder::new()
                .name(format!("{thread_name}-{id}"))
                .spawn(move || {
                    enter_context(injector, Some(locals), || worker.run());
                });

            match spawned {
                Ok(handle) => executor.handles.push(handle),
                Err(err) => {
                    executor.injector.leave_worker();
                    executor.shutdown();
                    return Err(err);
                }
            }
        }

        Ok(executor)
    }

    /// Schedules a task body on the global injector.
    ///
    /// Tasks scheduled after shutdown has begun come back already failed.
    pub(crate) fn spawn<F, T>(&self, body: F) -> JoinHandle<T>
    where
        T: Send + 'static,
        F: Future<Output = Outcome<T>> + Send + 'static,
    {
        schedule(&self.injector, body, |task| self.injector.push(task))
    }

    /// Number of launched tasks that have not finished yet.
    pub(crate) fn live_tasks(&self) -> usize {
        self.injector.live()
    }

    /// Stops the workers, waits for them, and fails every task they
    /// left unfinished.
    ///
    /// Calling it more than once is harmless.
    pub(crate) fn shutdown(&mut self) {
        self.injector.shutdown();

        let current = thread::current().id();
        let mut on_worker = false;

        for handle in self.handles.drain(..) {
            if handle.thread().id() == current {
                on_worker = true;
                continue;
            }
            let _ = handle.join();
        }

        // The calling worker is still inside a task. It abandons the
        // leftovers itself once that task returns and it leaves its loop.
        if on_worker {
            tracing::warn!("runtime dropped from one of its own workers");
            return;
        }

        for local in self.locals.iter() {
            local.clear();
        }

        let abandoned = self.injector.abandon_all();
        if abandoned > 0 {
            tracing::debug!(abandoned, "shutdown left unfinished tasks");
        }
    }
}
