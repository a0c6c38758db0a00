use super::completion::Completion;
use super::state::TaskState;
use crate::error::{Timeout, WorkFailure};

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

/// A handle to a launched task.
///
/// A `JoinHandle` is the caller's synchronization point with the task:
/// [`join`](Self::join) blocks the calling thread until the task is
/// terminal, and awaiting the handle does the same from async code.
///
/// Joining is idempotent. Every join observes the same outcome, so the
/// handle can be joined any number of times.
///
/// Dropping the `JoinHandle` does **not** cancel the task; it only
/// discards the ability to observe its result.
pub struct JoinHandle<T> {
    /// Outcome slot shared with the underlying task.
    completion: Arc<Completion<T>>,
}

impl<T> JoinHandle<T> {
    pub(crate) fn from_completion(completion: Arc<Completion<T>>) -> Self {
        Self { completion }
    }

    /// Creates a handle that is already completed with `value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use strand::task::JoinHandle;
    ///
    /// let handle = JoinHandle::ready(7);
    /// assert_eq!(handle.join(), Ok(7));
    /// ```
    pub fn ready(value: T) -> Self {
        Self::from_completion(Arc::new(Completion::finished(Ok(value))))
    }

    /// Creates a handle that has already failed with `failure`.
    pub fn failed(failure: WorkFailure) -> Self {
        Self::from_completion(Arc::new(Completion::finished(Err(failure))))
    }

    /// Returns the task's current lifecycle state without blocking.
    pub fn state(&self) -> TaskState {
        self.completion.state()
    }

    /// Returns `true` once the task has completed or failed.
    pub fn is_finished(&self) -> bool {
        self.completion.is_finished()
    }

    /// Blocks until the task is terminal and moves its outcome out.
    ///
    /// Use this for values that are not `Clone`.
    pub fn into_result(self) -> Result<T, WorkFailure> {
        self.completion.take()
    }

    /// Waits until the task is terminal or `deadline` passes. Returns
    /// `true` if it is terminal.
    pub(crate) fn finished_by(&self, deadline: Instant) -> bool {
        self.completion.finished_by(deadline)
    }

    /// Polls for termination without requiring `T: Clone`.
    pub(crate) fn poll_finished(&self, cx: &mut Context<'_>) -> Poll<()> {
        self.completion.poll_finished(cx)
    }
}

impl<T: Clone> JoinHandle<T> {
    /// Blocks the calling thread until the task is terminal.
    ///
    /// Returns the task's value, or the [`WorkFailure`] it ended with.
    /// The wait parks the thread on a condition variable; it never
    /// spins.
    ///
    /// Do not call this from inside a task running on a single-worker
    /// runtime: the worker would wait on itself. Await the handle
    /// instead.
    pub fn join(&self) -> Result<T, WorkFailure> {
        self.completion.get()
    }

    /// Like [`join`](Self::join), but waits at most `timeout`.
    ///
    /// The outer error means the wait timed out; the task keeps running
    /// and may be joined again.
    pub fn join_timeout(&self, timeout: Duration) -> Result<Result<T, WorkFailure>, Timeout> {
        let deadline = Instant::now() + timeout;

        self.completion
            .get_until(deadline)
            .ok_or(Timeout { waited: timeout })
    }

    /// Returns the outcome if the task is already terminal.
    pub fn try_join(&self) -> Option<Result<T, WorkFailure>> {
        self.completion.peek()
    }
}

impl<T: Clone> Future for JoinHandle<T> {
    /// The outcome of the task.
    type Output = Result<T, WorkFailure>;

    /// Polls the join handle.
    ///
    /// If the task is terminal, a copy of its outcome is returned.
    /// Otherwise the current waker is registered and the future returns
    /// `Poll::Pending`.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.completion.poll(cx)
    }
}

impl<T> fmt::Debug for JoinHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinHandle")
            .field("state", &self.state())
            .finish()
    }
}
