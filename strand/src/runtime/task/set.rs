use super::JoinHandle;
use crate::error::{Timeout, WorkFailure};
use crate::task;

use std::fmt;
use std::future::poll_fn;
use std::task::Poll;
use std::time::{Duration, Instant};

/// A group of tasks joined as one.
///
/// `JoinSet` collects the handles of a dynamic number of tasks so the
/// caller can wait for all of them at once, or take their outcomes one
/// by one as they finish.
///
/// Dropping the set does **not** cancel its tasks, just like dropping a
/// single [`JoinHandle`].
///
/// # Examples
///
/// ```rust
/// use strand::{Runtime, SharedLog};
/// use strand::task::JoinSet;
///
/// let runtime = Runtime::new();
/// let log = SharedLog::new();
///
/// let mut set: JoinSet<()> = (0..10)
///     .map(|i| {
///         let log = log.clone();
///         runtime.launch(move || log.append(i))
///     })
///     .collect();
///
/// set.join_all().unwrap();
/// assert_eq!(log.len(), 10);
/// ```
pub struct JoinSet<T> {
    /// Handles of the tasks not joined yet, in insertion order.
    handles: Vec<JoinHandle<T>>,
}

impl<T> JoinSet<T> {
    /// Creates a new, empty `JoinSet`.
    pub fn new() -> Self {
        Self {
            handles: Vec::new(),
        }
    }

    /// Adds an already launched task to the set.
    pub fn insert(&mut self, handle: JoinHandle<T>) {
        self.handles.push(handle);
    }

    /// Returns the number of tasks in the set.
    ///
    /// This includes tasks that have finished but have not been joined
    /// through the set yet.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns `true` if the set contains no tasks.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Blocks until every task in the set is terminal, then empties the
    /// set.
    ///
    /// Returns the values in insertion order. If any task failed, every
    /// task is still waited for and the failure of the earliest inserted
    /// failed task is returned.
    pub fn join_all(&mut self) -> Result<Vec<T>, WorkFailure> {
        let mut values = Vec::with_capacity(self.handles.len());
        let mut failure = None;

        for handle in self.handles.drain(..) {
            match handle.into_result() {
                Ok(value) => values.push(value),
                Err(err) => {
                    failure.get_or_insert(err);
                }
            }
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(values),
        }
    }

    /// Like [`join_all`](Self::join_all), but waits at most `timeout`.
    ///
    /// On timeout the set is left untouched; its tasks keep running and
    /// can be joined again.
    pub fn join_all_timeout(
        &mut self,
        timeout: Duration,
    ) -> Result<Result<Vec<T>, WorkFailure>, Timeout> {
        let deadline = Instant::now() + timeout;

        if self.handles.iter().all(|handle| handle.finished_by(deadline)) {
            Ok(self.join_all())
        } else {
            Err(Timeout { waited: timeout })
        }
    }

    /// Waits for the next task in the set to finish.
    ///
    /// The finished task is removed from the set and its outcome
    /// returned. Tasks are yielded in completion order as observed by
    /// the poll, not in insertion order.
    ///
    /// # Returns
    /// - `Some(outcome)` if a task finished.
    /// - `None` if the set was empty.
    pub async fn join_next(&mut self) -> Option<Result<T, WorkFailure>> {
        if self.handles.is_empty() {
            return None;
        }

        let index = poll_fn(|cx| {
            self.handles
                .iter()
                .position(|handle| handle.poll_finished(cx).is_ready())
                .map_or(Poll::Pending, Poll::Ready)
        })
        .await;

        // Already terminal, so this does not block.
        Some(self.handles.swap_remove(index).into_result())
    }
}

impl<T: Send + 'static> JoinSet<T> {
    /// Launches a closure onto the current runtime and adds it to the
    /// set.
    ///
    /// # Panics
    ///
    /// Panics if called outside the context of a running runtime. Use
    /// [`insert`](Self::insert) with [`Runtime::launch`](crate::Runtime::launch)
    /// from plain threads.
    pub fn launch<W>(&mut self, work: W)
    where
        W: FnOnce() -> T + Send + 'static,
    {
        self.insert(task::launch(work));
    }

    /// Spawns a future onto the current runtime and adds it to the set.
    ///
    /// # Panics
    ///
    /// Panics if called outside the context of a running runtime.
    pub fn spawn<F>(&mut self, future: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        self.insert(task::spawn(future));
    }
}

impl<T> Default for JoinSet<T> {
    /// Returns an empty [`JoinSet`].
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<JoinHandle<T>> for JoinSet<T> {
    fn extend<I: IntoIterator<Item = JoinHandle<T>>>(&mut self, iter: I) {
        self.handles.extend(iter);
    }
}

impl<T> FromIterator<JoinHandle<T>> for JoinSet<T> {
    fn from_iter<I: IntoIterator<Item = JoinHandle<T>>>(iter: I) -> Self {
        Self {
            handles: iter.into_iter().collect(),
        }
    }
}

impl<T> fmt::Debug for JoinSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinSet").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_all_keeps_insertion_order() {
        let mut set: JoinSet<u8> = [1, 2, 3].into_iter().map(JoinHandle::ready).collect();

        assert_eq!(set.len(), 3);
        assert_eq!(set.join_all(), Ok(vec![1, 2, 3]));
        assert!(set.is_empty());
    }

    #[test]
    fn join_all_reports_earliest_inserted_failure() {
        let mut set = JoinSet::new();
        set.insert(JoinHandle::ready(1));
        set.insert(JoinHandle::failed(WorkFailure::errored("second")));
        set.insert(JoinHandle::failed(WorkFailure::Abandoned));

        assert_eq!(set.join_all(), Err(WorkFailure::errored("second")));
        assert!(set.is_empty());
    }

    #[test]
    fn empty_set_joins_immediately() {
        let mut set = JoinSet::<u8>::default();

        assert_eq!(set.join_all(), Ok(Vec::new()));
        assert_eq!(set.join_all_timeout(Duration::ZERO), Ok(Ok(Vec::new())));
    }
}
