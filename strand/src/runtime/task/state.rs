/// Task is idle and not scheduled.
///
/// The task has been polled at least once and is waiting for a wake-up.
pub(crate) const IDLE: usize = 0;

/// Task is queued for execution.
///
/// The task has been scheduled and is waiting in a run queue.
pub(crate) const QUEUED: usize = 1;

/// Task is currently being executed by a worker.
///
/// At most one worker may observe this state at a time.
pub(crate) const RUNNING: usize = 2;

/// Task has been notified while running.
///
/// This state indicates that the task was woken while already
/// executing and should be re-queued once execution finishes.
pub(crate) const NOTIFIED: usize = 3;

/// Task has reached a terminal outcome and will not be polled again.
pub(crate) const DONE: usize = 4;

/// Observable lifecycle of a launched task.
///
/// ```text
/// Pending -> Running -> { Completed, Failed }
/// ```
///
/// A task leaves `Pending` the first time a worker picks it up and
/// reaches one of the two terminal states exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    /// Launched, not yet picked up by a worker.
    Pending,
    /// A worker has started the work.
    Running,
    /// The work returned normally.
    Completed,
    /// The work panicked, returned an error, or was abandoned.
    Failed,
}

impl TaskState {
    /// Returns `true` for `Completed` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Failed)
    }
}
