use crate::runtime::task::Task;

use std::sync::Arc;
use std::task::{Wake, Waker};

impl<T: Send + 'static> Wake for Task<T> {
    /// Reschedules the task, consuming this reference.
    fn wake(self: Arc<Self>) {
        self.reschedule();
    }

    /// Reschedules the task while keeping the waker alive.
    fn wake_by_ref(self: &Arc<Self>) {
        self.clone().reschedule();
    }
}

/// Creates a [`Waker`] associated with a runtime task.
///
/// The returned waker moves the task back onto a run queue when woken.
/// Each clone holds a strong reference to the task, so a task that is
/// waiting for a wake-up stays alive as long as someone can wake it.
pub(crate) fn make_waker<T: Send + 'static>(task: Arc<Task<T>>) -> Waker {
    Waker::from(task)
}
