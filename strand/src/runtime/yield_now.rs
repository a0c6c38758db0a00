use std::pin::Pin;
use std::task::{Context, Poll};

/// A future that yields execution back to the executor exactly once.
struct YieldOnce(bool);

impl Future for YieldOnce {
    type Output = ();

    /// On the first poll, the task reschedules itself and returns
    /// `Poll::Pending`; on the second poll, the future completes.
    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.0 {
            return Poll::Ready(());
        }

        self.0 = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

/// Yields execution back to the executor.
///
/// The current task goes back onto a run queue so other tasks can make
/// progress on this worker before it continues.
///
/// # Examples
///
/// ```rust
/// use strand::{Runtime, yield_now};
///
/// let runtime = Runtime::new();
/// let steps = runtime.block_on(async {
///     yield_now().await;
///     1 + 1
/// });
/// assert_eq!(steps, 2);
/// ```
pub async fn yield_now() {
    YieldOnce(false).await
}
