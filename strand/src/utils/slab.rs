/// A simple slab allocator.
///
/// A `Slab` stores values of type `T` in a contiguous vector and hands
/// out small indices that are reused after removal.
///
/// The runtime uses it to keep a registry of live tasks: a task takes a
/// key when it is launched and gives it back when it finishes.
pub(crate) struct Slab<T> {
    /// Storage for items; `None` marks a free slot.
    items: Vec<Option<T>>,
    /// Stack of free indices that can be reused.
    free: Vec<usize>,
    /// Number of occupied slots.
    len: usize,
}

impl<T> Slab<T> {
    /// Creates a new `Slab` with room for `size` items before growing.
    pub(crate) fn new(size: usize) -> Self {
        let items = (0..size).map(|_| None).collect();
        let free = (0..size).rev().collect();

        Self {
            items,
            free,
            len: 0,
        }
    }

    /// Inserts a value into the slab and returns its index.
    ///
    /// If a free slot is available, it is reused.
    /// Otherwise, the slab grows exponentially.
    pub(crate) fn insert(&mut self, item: T) -> usize {
        let index = if let Some(i) = self.free.pop() {
            i
        } else {
            let len = self.items.len();
            let new_len = if len == 0 { 1 } else { 2 * len };

            self.items.extend((len..new_len).map(|_| None));
            self.free.extend(((len + 1)..new_len).rev());

            len
        };

        self.items[index] = Some(item);
        self.len += 1;

        index
    }

    /// Removes and returns the value stored at `index`.
    ///
    /// Returns `None` if the index is out of range or the slot is free,
    /// so removing twice is harmless.
    pub(crate) fn remove(&mut self, index: usize) -> Option<T> {
        let item = self.items.get_mut(index)?.take()?;

        self.free.push(index);
        self.len -= 1;

        Some(item)
    }

    /// Removes every value, leaving all slots free.
    pub(crate) fn drain(&mut self) -> Vec<T> {
        let items: Vec<T> = self.items.iter_mut().filter_map(Option::take).collect();

        self.free = (0..self.items.len()).rev().collect();
        self.len = 0;

        items
    }

    /// Returns the number of occupied slots.
    pub(crate) fn len(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::Slab;

    #[test]
    fn reuses_freed_slots() {
        let mut slab = Slab::new(2);

        let a = slab.insert("a");
        let b = slab.insert("b");
        assert_ne!(a, b);

        assert_eq!(slab.remove(a), Some("a"));
        assert_eq!(slab.remove(a), None);

        let c = slab.insert("c");
        assert_eq!(c, a);
        assert_eq!(slab.len(), 2);
    }

    #[test]
    fn grows_past_initial_capacity() {
        let mut slab = Slab::new(0);

        let keys: Vec<_> = (0..10).map(|i| slab.insert(i)).collect();
        assert_eq!(slab.len(), 10);

        let mut unique = keys.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), 10);

        for (key, value) in keys.iter().zip(0..10) {
            assert_eq!(slab.remove(*key), Some(value));
        }
        assert_eq!(slab.len(), 0);
    }

    #[test]
    fn drain_empties_the_slab() {
        let mut slab = Slab::new(4);
        slab.insert(1);
        slab.insert(2);

        let mut drained = slab.drain();
        drained.sort_unstable();

        assert_eq!(drained, vec![1, 2]);
        assert_eq!(slab.len(), 0);
        assert_eq!(slab.insert(3), 0);
    }
}
