use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// An append-only, ordered record shared between a caller and its tasks.
///
/// Every clone refers to the same log. Appends from any number of
/// threads are serialized by a mutex, so the order of entries is the
/// order in which the appends actually happened. That makes the log a
/// convenient oracle for checking what ran before what.
///
/// # Examples
///
/// ```rust
/// use strand::{Runtime, SharedLog};
///
/// let runtime = Runtime::new();
/// let log = SharedLog::new();
///
/// log.append("Hello,");
/// let task_log = log.clone();
/// runtime.launch(move || task_log.append("word!")).join().unwrap();
///
/// assert_eq!(log.snapshot(), ["Hello,", "word!"]);
/// ```
pub struct SharedLog<T> {
    entries: Arc<Mutex<Vec<T>>>,
}

impl<T> SharedLog<T> {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Appends one entry.
    pub fn append(&self, entry: T) {
        self.entries.lock().push(entry);
    }

    /// Appends several entries with no other append in between.
    pub fn extend<I>(&self, entries: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.entries.lock().extend(entries);
    }

    /// Number of entries appended so far.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` if nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Removes every entry and returns them in order.
    pub fn take(&self) -> Vec<T> {
        std::mem::take(&mut *self.entries.lock())
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Runs `f` over the current entries while holding the lock.
    ///
    /// Appends from other threads wait until `f` returns.
    pub fn with<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.entries.lock())
    }
}

impl<T: Clone> SharedLog<T> {
    /// Returns a copy of all entries, in append order.
    pub fn snapshot(&self) -> Vec<T> {
        self.entries.lock().clone()
    }
}

impl<T> Clone for SharedLog<T> {
    /// Returns another handle to the same log.
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<T> Default for SharedLog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedLog<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.lock().iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::SharedLog;

    use std::thread;

    #[test]
    fn clones_share_entries() {
        let log = SharedLog::new();
        let other = log.clone();

        log.append(1);
        other.append(2);

        assert_eq!(log.snapshot(), vec![1, 2]);
        assert_eq!(other.len(), 2);
    }

    #[test]
    fn extend_is_contiguous() {
        let log = SharedLog::new();

        let writers: Vec<_> = (0..4)
            .map(|w| {
                let log = log.clone();
                thread::spawn(move || {
                    for round in 0..50 {
                        log.extend([(w, round, 'a'), (w, round, 'b')]);
                    }
                })
            })
            .collect();

        for writer in writers {
            writer.join().unwrap();
        }

        log.with(|entries| {
            assert_eq!(entries.len(), 400);
            for pair in entries.chunks(2) {
                assert_eq!(pair[0].0, pair[1].0);
                assert_eq!(pair[0].1, pair[1].1);
                assert_eq!((pair[0].2, pair[1].2), ('a', 'b'));
            }
        });
    }

    #[test]
    fn take_and_clear_empty_the_log() {
        let log = SharedLog::new();
        log.append("x");
        log.append("y");

        assert_eq!(log.take(), vec!["x", "y"]);
        assert!(log.is_empty());

        log.append("z");
        log.clear();
        assert_eq!(log.len(), 0);
        assert_eq!(format!("{log:?}"), "[]");
    }
}
