use crate::runtime::task::Runnable;

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// A per-worker local task queue.
///
/// `LocalQueue` stores runnable tasks local to a worker thread.
/// Tasks are normally pushed and popped from the back of the queue
/// (LIFO), which improves cache locality.
///
/// Other workers may steal tasks from the front of the queue (FIFO),
/// enabling work-stealing and load balancing across the executor.
pub(crate) struct LocalQueue {
    inner: Mutex<VecDeque<Arc<dyn Runnable>>>,
}

impl LocalQueue {
    /// Creates an empty local task queue.
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
        }
    }

    /// Pushes a runnable task onto the back of the queue.
    pub(crate) fn push(&self, task: Arc<dyn Runnable>) {
        self.inner.lock().push_back(task);
    }

    /// Pops the most recently pushed task.
    pub(crate) fn pop(&self) -> Option<Arc<dyn Runnable>> {
        self.inner.lock().pop_back()
    }

    /// Steals the oldest task. Intended for other worker threads.
    pub(crate) fn steal(&self) -> Option<Arc<dyn Runnable>> {
        self.inner.lock().pop_front()
    }

    /// Drops every queued task reference.
    pub(crate) fn clear(&self) {
        self.inner.lock().clear();
    }
}
