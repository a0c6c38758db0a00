use crate::runtime::work_stealing::injector::InjectorHandle;
use crate::runtime::work_stealing::queue::LocalQueue;

use std::cell::RefCell;
use std::sync::Arc;

thread_local! {
    /// Thread-local handle to the global injector queue.
    ///
    /// Lets [`task::spawn`](crate::task::spawn) and friends find the
    /// runtime they were called from.
    pub(crate) static CURRENT_INJECTOR: RefCell<Option<InjectorHandle>> =
        const { RefCell::new(None) };

    /// Thread-local identifier of the current worker thread.
    pub(crate) static CURRENT_WORKER_ID: RefCell<Option<usize>> =
        const { RefCell::new(None) };

    /// Thread-local references to all local worker queues.
    ///
    /// Set on worker threads only, so tasks launched from a task land
    /// in the launching worker's own queue.
    pub(crate) static CURRENT_LOCALS: RefCell<Option<Arc<Vec<Arc<LocalQueue>>>>> =
        const { RefCell::new(None) };
}

/// Enters the runtime execution context for the current thread.
///
/// This function temporarily installs thread-local runtime state
/// (injector and, on workers, the local queues) for the duration of the
/// closure `f`. After the closure completes, the previous context is
/// restored.
pub(crate) fn enter_context<R>(
    injector: InjectorHandle,
    locals: Option<Arc<Vec<Arc<LocalQueue>>>>,
    f: impl FnOnce() -> R,
) -> R {
    CURRENT_INJECTOR.with(|i| {
        CURRENT_LOCALS.with(|l| {
            let prev_i = i.replace(Some(injector));
            let prev_l = l.replace(locals);

            let out = f();

            l.replace(prev_l);
            i.replace(prev_i);

            out
        })
    })
}

/// Returns `true` if the current thread is inside a runtime context.
pub(crate) fn in_context() -> bool {
    CURRENT_INJECTOR.with(|i| i.borrow().is_some())
}
