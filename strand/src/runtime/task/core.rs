use super::JoinHandle;
use super::completion::{Completion, Outcome};
use super::state::{DONE, IDLE, NOTIFIED, QUEUED, RUNNING};
use crate::error::WorkFailure;
use crate::runtime::context::{CURRENT_INJECTOR, CURRENT_LOCALS, CURRENT_WORKER_ID};
use crate::runtime::task::waker::make_waker;
use crate::runtime::work_stealing::injector::{Injector, InjectorHandle};

use std::cell::UnsafeCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};

/// Boxed body of a task, already mapped to its terminal outcome.
type Body<T> = Pin<Box<dyn Future<Output = Outcome<T>> + Send>>;

/// A runnable unit of work that can be executed by the scheduler.
///
/// The `Runnable` trait abstracts the specific return type of a task,
/// allowing the executor to manage a heterogeneous collection of tasks
/// through `Arc<dyn Runnable>`.
pub(crate) trait Runnable: Send + Sync {
    /// Executes the task. This is typically called by a worker thread.
    fn run(self: Arc<Self>);

    /// Fails the task with [`WorkFailure::Abandoned`] unless it has
    /// finished or is being polled. Returns `true` if it was failed.
    fn abandon(&self) -> bool;
}

/// A launched task managed by the runtime.
///
/// A `Task` owns the work body and drives it through the scheduling
/// states in [`state`](super::state). Its terminal outcome lives in a
/// [`Completion`] shared with the task's [`JoinHandle`].
pub(crate) struct Task<T> {
    /// The work body. Dropped as soon as the task is terminal.
    ///
    /// Only touched by the thread that moved the task to `RUNNING`, or
    /// by `abandon` once every worker has exited.
    body: UnsafeCell<Option<Body<T>>>,

    /// Scheduling state (IDLE, QUEUED, RUNNING, ...).
    pub(crate) state: AtomicUsize,

    /// Reference to the global injector queue for rescheduling.
    injector: Arc<Injector>,

    /// Key of this task in the injector's live-task registry.
    key: AtomicUsize,

    /// Outcome slot shared with the join handle.
    pub(crate) completion: Arc<Completion<T>>,
}

unsafe impl<T: Send> Send for Task<T> {}
unsafe impl<T: Send> Sync for Task<T> {}

impl<T: Send + 'static> Task<T> {
    /// Creates a new task in the `QUEUED` state.
    fn new(body: Body<T>, injector: Arc<Injector>) -> Self {
        Self {
            body: UnsafeCell::new(Some(body)),
            state: AtomicUsize::new(QUEUED),
            injector,
            key: AtomicUsize::new(usize::MAX),
            completion: Arc::new(Completion::new()),
        }
    }

    /// Performs one execution slice of the task.
    ///
    /// This method transitions the task to `RUNNING`, polls the body,
    /// and handles the result:
    /// - `Poll::Pending`: back to `IDLE`, or re-queued if notified.
    /// - `Poll::Ready`: the outcome is published to every joiner.
    /// - a panic: published as [`WorkFailure::Panicked`].
    pub(crate) fn run(self: Arc<Self>) {
        let current = self.state.load(Ordering::Acquire);

        if current != QUEUED && current != NOTIFIED {
            return;
        }

        // Transition to RUNNING. This ensures exclusive access to the body.
        if self
            .state
            .compare_exchange(current, RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        self.completion.mark_started();

        let waker = make_waker(self.clone());
        let mut cx = Context::from_waker(&waker);

        // Safety: the RUNNING state guarantees that no other thread touches the body.
        let body = unsafe { &mut *self.body.get() };
        let Some(future) = body.as_mut() else {
            return;
        };

        let poll = panic::catch_unwind(AssertUnwindSafe(|| future.as_mut().poll(&mut cx)));

        match poll {
            Ok(Poll::Pending) => {
                // Return to IDLE state unless a wake-up occurred during execution (NOTIFIED).
                if self
                    .state
                    .compare_exchange(RUNNING, IDLE, Ordering::AcqRel, Ordering::Acquire)
                    .is_err()
                {
                    self.state.store(QUEUED, Ordering::Release);
                    self.injector.push(self.clone());
                }
            }
            Ok(Poll::Ready(outcome)) => {
                *body = None;
                self.finish(outcome);
            }
            Err(payload) => {
                *body = None;
                self.finish(Err(WorkFailure::from_panic(payload)));
            }
        }
    }

    /// Moves the task to `DONE` and publishes its outcome.
    fn finish(&self, outcome: Outcome<T>) {
        self.state.store(DONE, Ordering::Release);
        self.injector.untrack(self.key.load(Ordering::Acquire));

        match &outcome {
            Ok(_) => tracing::trace!(key = self.key.load(Ordering::Relaxed), "task completed"),
            Err(failure) => tracing::warn!(%failure, "task failed"),
        }

        self.completion.complete(outcome);
    }

    /// Signals the task to be rescheduled.
    ///
    /// If the task is `IDLE`, it moves to `QUEUED` and is pushed to the scheduler.
    /// If the task is `RUNNING`, it moves to `NOTIFIED` to ensure it is re-polled
    /// immediately after its current execution slice.
    pub(crate) fn reschedule(self: Arc<Self>) {
        loop {
            let state = self.state.load(Ordering::Acquire);

            match state {
                IDLE => {
                    if self
                        .state
                        .compare_exchange(IDLE, QUEUED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        self.injector.push(self.clone());
                        return;
                    }
                }
                RUNNING => {
                    if self
                        .state
                        .compare_exchange(RUNNING, NOTIFIED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        return;
                    }
                }
                // Already queued, already notified, or finished.
                _ => return,
            }
        }
    }
}

impl<T: Send + 'static> Runnable for Task<T> {
    fn run(self: Arc<Self>) {
        Task::run(self)
    }

    fn abandon(&self) -> bool {
        loop {
            let state = self.state.load(Ordering::Acquire);

            if matches!(state, DONE | RUNNING | NOTIFIED) {
                return false;
            }

            if self
                .state
                .compare_exchange(state, DONE, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                break;
            }
        }

        // Safety: the task was neither running nor done, and DONE now
        // keeps every worker away from the body.
        unsafe {
            *self.body.get() = None;
        }

        if self.completion.complete(Err(WorkFailure::Abandoned)) {
            tracing::warn!("task abandoned at shutdown");
        }

        true
    }
}

impl<T> Drop for Task<T> {
    /// A task dropped before finishing (its waker was lost, or the
    /// runtime went away) still releases its joiners.
    fn drop(&mut self) {
        if *self.state.get_mut() == DONE {
            return;
        }

        self.injector.untrack(*self.key.get_mut());
        self.completion.complete(Err(WorkFailure::Abandoned));
    }
}

impl<T> fmt::Debug for Task<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("state", &self.state.load(Ordering::Relaxed))
            .field("key", &self.key.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Creates a task for `body`, registers it and hands it to `enqueue`.
///
/// If the runtime is already shutting down, the task is not created and
/// the returned handle is failed with [`WorkFailure::Abandoned`].
pub(crate) fn schedule<T, F>(
    injector: &InjectorHandle,
    body: F,
    enqueue: impl FnOnce(Arc<dyn Runnable>),
) -> JoinHandle<T>
where
    T: Send + 'static,
    F: Future<Output = Outcome<T>> + Send + 'static,
{
    if injector.is_shutdown() {
        return JoinHandle::failed(WorkFailure::Abandoned);
    }

    let task = Arc::new(Task::new(Box::pin(body), injector.clone()));
    let runnable: Arc<dyn Runnable> = task.clone();

    let key = injector.track(&runnable);
    task.key.store(key, Ordering::Release);

    tracing::trace!(key, "task spawned");

    let completion = task.completion.clone();
    enqueue(runnable);

    JoinHandle::from_completion(completion)
}

/// Schedules `body` on the runtime that owns the current thread.
///
/// On a worker thread the task goes to that worker's local queue for
/// better cache locality; anywhere else it goes to the global injector.
///
/// # Panics
///
/// Panics if called outside the context of a running runtime.
fn spawn_in_context<T, F>(body: F) -> JoinHandle<T>
where
    T: Send + 'static,
    F: Future<Output = Outcome<T>> + Send + 'static,
{
    let injector = CURRENT_INJECTOR.with(|cell| {
        cell.borrow()
            .as_ref()
            .expect("spawn must be called within the context of a runtime")
            .clone()
    });

    schedule(&injector, body, |task| {
        let local = CURRENT_WORKER_ID.with(|id_cell| {
            let id = (*id_cell.borrow())?;
            CURRENT_LOCALS.with(|locals_cell| locals_cell.borrow().as_ref().map(|l| l[id].clone()))
        });

        match local {
            Some(queue) => {
                queue.push(task);
                injector.notify();
            }
            None => injector.push(task),
        }
    })
}

/// Spawns a future as a task onto the current runtime.
///
/// The returned handle resolves to `Ok(output)`, or to a
/// [`WorkFailure`] if the future panics or the runtime shuts down first.
///
/// # Panics
///
/// Panics if called outside the context of a running runtime. Use
/// [`Runtime::spawn`](crate::Runtime::spawn) from plain threads.
pub fn spawn<F, T>(future: F) -> JoinHandle<T>
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
{
    spawn_in_context(async move { Ok(future.await) })
}

/// Launches a closure as a task onto the current runtime.
///
/// The closure runs on a worker thread; it may block while it works.
///
/// # Panics
///
/// Panics if called outside the context of a running runtime.
pub fn launch<W, T>(work: W) -> JoinHandle<T>
where
    T: Send + 'static,
    W: FnOnce() -> T + Send + 'static,
{
    spawn_in_context(async move { Ok(work()) })
}

/// Launches fallible work onto the current runtime.
///
/// An `Err` returned by `work` becomes [`WorkFailure::Errored`].
///
/// # Panics
///
/// Panics if called outside the context of a running runtime.
pub fn try_launch<W, T, E>(work: W) -> JoinHandle<T>
where
    T: Send + 'static,
    E: fmt::Display,
    W: FnOnce() -> Result<T, E> + Send + 'static,
{
    spawn_in_context(async move { work().map_err(WorkFailure::errored) })
}
