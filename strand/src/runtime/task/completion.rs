use super::state::TaskState;
use crate::error::WorkFailure;

use parking_lot::{Condvar, Mutex, MutexGuard};
use std::task::{Context, Poll, Waker};
use std::time::Instant;

/// Terminal outcome of a task.
pub(crate) type Outcome<T> = Result<T, WorkFailure>;

/// Write-once slot shared between a task and its join handle.
///
/// The task publishes its outcome exactly once through
/// [`complete`](Self::complete). Blocking joiners park on a condition
/// variable and async joiners register a waker; both are released by
/// the same publication.
pub(crate) struct Completion<T> {
    slot: Mutex<Slot<T>>,
    ready: Condvar,
}

struct Slot<T> {
    /// Set once a worker has started the work.
    started: bool,

    /// The published outcome. `None` until the task is terminal.
    outcome: Option<Outcome<T>>,

    /// Wakers of async joiners waiting for the outcome.
    waiters: Vec<Waker>,
}

impl<T> Completion<T> {
    /// Creates an empty completion for a task that has not started.
    pub(crate) fn new() -> Self {
        Self {
            slot: Mutex::new(Slot {
                started: false,
                outcome: None,
                waiters: Vec::new(),
            }),
            ready: Condvar::new(),
        }
    }

    /// Creates a completion that is already terminal.
    pub(crate) fn finished(outcome: Outcome<T>) -> Self {
        Self {
            slot: Mutex::new(Slot {
                started: true,
                outcome: Some(outcome),
                waiters: Vec::new(),
            }),
            ready: Condvar::new(),
        }
    }

    /// Records that a worker picked the task up.
    pub(crate) fn mark_started(&self) {
        self.slot.lock().started = true;
    }

    /// Publishes the terminal outcome and releases every joiner.
    ///
    /// Only the first call has an effect. Returns `false` if an outcome
    /// was already published.
    pub(crate) fn complete(&self, outcome: Outcome<T>) -> bool {
        let waiters = {
            let mut slot = self.slot.lock();

            if slot.outcome.is_some() {
                return false;
            }

            slot.started = true;
            slot.outcome = Some(outcome);
            std::mem::take(&mut slot.waiters)
        };

        self.ready.notify_all();

        for waker in waiters {
            waker.wake();
        }

        true
    }

    /// Returns the current observable state.
    pub(crate) fn state(&self) -> TaskState {
        let slot = self.slot.lock();

        match &slot.outcome {
            Some(Ok(_)) => TaskState::Completed,
            Some(Err(_)) => TaskState::Failed,
            None if slot.started => TaskState::Running,
            None => TaskState::Pending,
        }
    }

    /// Returns `true` once an outcome has been published.
    pub(crate) fn is_finished(&self) -> bool {
        self.slot.lock().outcome.is_some()
    }

    /// Blocks until the outcome is published and returns the locked slot.
    fn wait(&self) -> MutexGuard<'_, Slot<T>> {
        let mut slot = self.slot.lock();

        while slot.outcome.is_none() {
            self.ready.wait(&mut slot);
        }

        slot
    }

    /// Blocks until the outcome is published or `deadline` passes.
    ///
    /// Returns `None` on timeout.
    fn wait_until(&self, deadline: Instant) -> Option<MutexGuard<'_, Slot<T>>> {
        let mut slot = self.slot.lock();

        while slot.outcome.is_none() {
            if self.ready.wait_until(&mut slot, deadline).timed_out() {
                break;
            }
        }

        slot.outcome.is_some().then_some(slot)
    }

    /// Blocks until terminal and moves the outcome out.
    pub(crate) fn take(&self) -> Outcome<T> {
        let mut slot = self.wait();

        slot.outcome.take().unwrap_or(Err(WorkFailure::Abandoned))
    }

    /// Blocks until terminal or until `deadline` passes, without
    /// touching the outcome. Returns `true` if the task is terminal.
    pub(crate) fn finished_by(&self, deadline: Instant) -> bool {
        self.wait_until(deadline).is_some()
    }

    /// Polls for termination, registering the current waker otherwise.
    pub(crate) fn poll_finished(&self, cx: &mut Context<'_>) -> Poll<()> {
        let mut slot = self.slot.lock();

        if slot.outcome.is_some() {
            return Poll::Ready(());
        }

        slot.register(cx.waker());
        Poll::Pending
    }
}

impl<T> Slot<T> {
    /// Adds `waker` to the waiters unless an equivalent one is there.
    ///
    /// Callers hold the slot lock, which `complete` also takes, so a
    /// publication cannot slip between the check and the registration.
    fn register(&mut self, waker: &Waker) {
        if !self.waiters.iter().any(|w| w.will_wake(waker)) {
            self.waiters.push(waker.clone());
        }
    }
}

impl<T: Clone> Completion<T> {
    /// Blocks until terminal and returns a copy of the outcome.
    pub(crate) fn get(&self) -> Outcome<T> {
        let slot = self.wait();

        slot.outcome.clone().unwrap_or(Err(WorkFailure::Abandoned))
    }

    /// Like [`get`](Self::get), but gives up at `deadline`.
    pub(crate) fn get_until(&self, deadline: Instant) -> Option<Outcome<T>> {
        self.wait_until(deadline)
            .and_then(|slot| slot.outcome.clone())
    }

    /// Returns a copy of the outcome without blocking.
    pub(crate) fn peek(&self) -> Option<Outcome<T>> {
        self.slot.lock().outcome.clone()
    }

    /// Polls for the outcome, registering the current waker if it is not
    /// published yet.
    pub(crate) fn poll(&self, cx: &mut Context<'_>) -> Poll<Outcome<T>> {
        let mut slot = self.slot.lock();

        if let Some(outcome) = &slot.outcome {
            return Poll::Ready(outcome.clone());
        }

        slot.register(cx.waker());
        Poll::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn first_publication_wins() {
        let completion = Completion::new();

        assert!(completion.complete(Ok(1)));
        assert!(!completion.complete(Ok(2)));
        assert!(!completion.complete(Err(WorkFailure::Abandoned)));

        assert_eq!(completion.get(), Ok(1));
        assert_eq!(completion.state(), TaskState::Completed);
    }

    #[test]
    fn state_follows_lifecycle() {
        let completion = Completion::<()>::new();
        assert_eq!(completion.state(), TaskState::Pending);

        completion.mark_started();
        assert_eq!(completion.state(), TaskState::Running);

        completion.complete(Err(WorkFailure::errored("nope")));
        assert_eq!(completion.state(), TaskState::Failed);
    }

    #[test]
    fn wait_until_times_out_without_outcome() {
        let completion = Completion::<u8>::new();
        let deadline = Instant::now() + Duration::from_millis(20);

        assert_eq!(completion.get_until(deadline), None);
        assert!(!completion.is_finished());
    }

    #[test]
    fn blocked_getter_is_released_by_completion() {
        let completion = Arc::new(Completion::new());
        let publisher = completion.clone();

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            publisher.complete(Ok("done"));
        });

        assert_eq!(completion.get(), Ok("done"));
        handle.join().unwrap();
    }

    #[test]
    fn finished_by_leaves_outcome_in_place() {
        struct Report(u8);

        let completion = Completion::new();
        let deadline = Instant::now() + Duration::from_millis(10);
        assert!(!completion.finished_by(deadline));

        completion.complete(Ok(Report(9)));

        assert!(completion.finished_by(Instant::now()));
        assert_eq!(completion.take().map(|r| r.0), Ok(9));
    }
}
