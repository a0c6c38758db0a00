use crate::runtime::context::CURRENT_WORKER_ID;
use crate::runtime::work_stealing::injector::InjectorHandle;
use crate::runtime::work_stealing::queue::LocalQueue;
use crate::task::Runnable;

use std::sync::Arc;

/// A worker thread in the executor.
///
/// A `Worker` is responsible for executing runnable tasks using
/// a work-stealing strategy. Each worker owns a local queue and
/// cooperates with other workers to balance load.
///
/// The execution order is:
/// 1. Pop from the local queue
/// 2. Steal from the global injector
/// 3. Steal from other workers
/// 4. Park if no work is available
pub(crate) struct Worker {
    /// Unique identifier of the worker.
    id: usize,

    /// All local queues (one per worker).
    ///
    /// Used for stealing work from other workers.
    locals: Arc<Vec<Arc<LocalQueue>>>,

    /// Handle to the global injector queue.
    injector: InjectorHandle,
}

impl Worker {
    /// Creates a new worker.
    ///
    /// # Arguments
    ///
    /// * `id` - Worker identifier
    /// * `locals` - Shared vector of all local queues
    /// * `injector` - Handle to the global injector
    pub(crate) fn new(
        id: usize,
        locals: Arc<Vec<Arc<LocalQueue>>>,
        injector: InjectorHandle,
    ) -> Self {
        Self {
            id,
            locals,
            injector,
        }
    }

    /// Runs the worker loop until shutdown is requested.
    ///
    /// Expects the runtime context to be installed on the current
    /// thread already, so tasks can launch more tasks.
    pub(crate) fn run(&self) {
        CURRENT_WORKER_ID.with(|id| *id.borrow_mut() = Some(self.id));
        tracing::debug!(worker = self.id, "worker started");

        while !self.injector.is_shutdown() {
            match self.next_task() {
                Some(task) => task.run(),
                None => self.injector.park(),
            }
        }

        CURRENT_WORKER_ID.with(|id| *id.borrow_mut() = None);
        tracing::debug!(worker = self.id, "worker stopped");

        if self.injector.leave_worker() {
            self.abandon_leftovers();
        }
    }

    /// Fails whatever the pool left behind. Run by the last worker out,
    /// which matters when the runtime was dropped from inside a task and
    /// nobody else is left to do it.
    fn abandon_leftovers(&self) {
        for local in self.locals.iter() {
            local.clear();
        }

        let abandoned = self.injector.abandon_all();
        if abandoned > 0 {
            tracing::debug!(worker = self.id, abandoned, "last worker abandoned unfinished tasks");
        }
    }

    /// Picks the next task: local queue first, then the injector, then
    /// another worker's queue.
    fn next_task(&self) -> Option<Arc<dyn Runnable>> {
        self.locals[self.id]
            .pop()
            .or_else(|| self.injector.steal())
            .or_else(|| self.try_steal())
    }

    /// Attempts to steal a task from another worker's local queue.
    ///
    /// Workers are visited in a round-robin fashion to avoid
    /// starvation and distribute load evenly.
    fn try_steal(&self) -> Option<Arc<dyn Runnable>> {
        let len = self.locals.len();

        if len <= 1 {
            return None;
        }

        (1..len)
            .map(|i| (self.id + i) % len)
            .find_map(|victim| self.locals[victim].steal())
    }
}
