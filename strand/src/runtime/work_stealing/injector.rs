use crate::runtime::task::Runnable;
use crate::utils::Slab;

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

/// Shared handle to the global task injector.
pub(crate) type InjectorHandle = Arc<Injector>;

/// Upper bound on how long an idle worker sleeps before re-checking
/// the other workers' queues for something to steal.
const PARK_TIMEOUT: Duration = Duration::from_millis(5);

/// Global task injector for the work-stealing scheduler.
///
/// The injector is used as a centralized queue where newly launched
/// tasks are pushed before being picked up by worker threads.
///
/// It also coordinates worker parking and waking using a condition
/// variable, and keeps a registry of every task that has not reached
/// a terminal state, so shutdown can fail the ones left behind.
pub(crate) struct Injector {
    /// Queue holding globally injected tasks.
    queue: Mutex<VecDeque<Arc<dyn Runnable>>>,

    /// Number of parked worker threads.
    parked: Mutex<usize>,

    /// Condition variable used to wake parked workers.
    condvar: Condvar,

    /// Indicates whether the executor is shutting down.
    shutdown: AtomicBool,

    /// Tasks that have been launched and have not finished.
    live: Mutex<Slab<Weak<dyn Runnable>>>,

    /// Worker threads that have been spawned and have not left their
    /// loop yet.
    workers: AtomicUsize,
}

impl Injector {
    /// Creates a new empty injector.
    pub(crate) fn new() -> Self {
        Injector {
            queue: Mutex::new(VecDeque::new()),
            parked: Mutex::new(0),
            condvar: Condvar::new(),
            shutdown: AtomicBool::new(false),
            live: Mutex::new(Slab::new(64)),
            workers: AtomicUsize::new(0),
        }
    }

    /// Signals shutdown and wakes all parked workers.
    ///
    /// After shutdown is initiated, workers stop parking and exit;
    /// new launches are refused.
    pub(crate) fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
        self.notify_all();
    }

    /// Returns `true` once shutdown has been requested.
    pub(crate) fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Pushes a new task into the global injector.
    ///
    /// This wakes one parked worker thread.
    pub(crate) fn push(&self, task: Arc<dyn Runnable>) {
        self.queue.lock().push_back(task);
        self.notify();
    }

    /// Wakes one parked worker, if any.
    ///
    /// Used when work lands somewhere other workers can steal from.
    pub(crate) fn notify(&self) {
        let parked = self.parked.lock();
        if *parked > 0 {
            self.condvar.notify_one();
        }
    }

    fn notify_all(&self) {
        let _parked = self.parked.lock();
        self.condvar.notify_all();
    }

    /// Parks the current worker thread until work becomes available
    /// or a shutdown signal is received.
    ///
    /// Workers only park if the injector queue is empty.
    /// The park operation uses a timed wait to ensure periodic wakeups.
    pub(crate) fn park(&self) {
        let mut parked = self.parked.lock();

        if self.is_shutdown() || !self.queue.lock().is_empty() {
            return;
        }

        *parked += 1;
        self.condvar.wait_for(&mut parked, PARK_TIMEOUT);
        *parked -= 1;
    }

    /// Steals a task from the global injector.
    ///
    /// Tasks are taken from the front of the queue.
    /// Returns `None` if no tasks are available.
    pub(crate) fn steal(&self) -> Option<Arc<dyn Runnable>> {
        self.queue.lock().pop_front()
    }

    /// Counts a worker thread about to be spawned.
    pub(crate) fn enter_worker(&self) {
        self.workers.fetch_add(1, Ordering::AcqRel);
    }

    /// Uncounts a worker thread. Returns `true` for the last one out.
    pub(crate) fn leave_worker(&self) -> bool {
        self.workers.fetch_sub(1, Ordering::AcqRel) == 1
    }

    /// Registers a launched task and returns its registry key.
    pub(crate) fn track(&self, task: &Arc<dyn Runnable>) -> usize {
        self.live.lock().insert(Arc::downgrade(task))
    }

    /// Removes a finished task from the registry.
    pub(crate) fn untrack(&self, key: usize) {
        self.live.lock().remove(key);
    }

    /// Returns the number of tasks that have not finished.
    pub(crate) fn live(&self) -> usize {
        self.live.lock().len()
    }

    /// Empties the queue and the registry, failing every task that has
    /// not finished.
    ///
    /// Tasks still being polled are left to finish on their own. Only
    /// called once shutdown has been requested and the workers are gone.
    pub(crate) fn abandon_all(&self) -> usize {
        let queued: Vec<_> = self.queue.lock().drain(..).collect();
        let live = self.live.lock().drain();

        let abandoned = live
            .iter()
            .filter_map(Weak::upgrade)
            .filter(|task| task.abandon())
            .count();

        drop(queued);
        abandoned
    }
}
