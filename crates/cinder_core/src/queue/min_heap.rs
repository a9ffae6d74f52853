//! # Generic Binary Min-Heap
//!
//! Array-backed, comparator-driven heap over `(key, data)` pairs.

/// One stored `(key, data)` pair.
struct Entry<K, T> {
    /// Ordering key.
    key: K,
    /// Caller payload, matched by equality on removal.
    data: T,
}

/// A comparator-driven binary min-heap.
///
/// The comparator is strict: `outranks(a, b)` means "a must sit above b".
/// The heap property maintained is that no child outranks its parent, so
/// index 0 always holds an entry that nothing else outranks.
///
/// # Thread Safety
///
/// NOT thread-safe. Use one heap per subsystem and serialize access.
///
/// # Example
///
/// ```rust,ignore
/// let mut heap = MinHeap::new(|a: &f32, b: &f32| a < b);
/// heap.insert("late", 9.0);
/// heap.insert("early", 1.0);
/// assert_eq!(heap.head_data(), Some(&"early"));
/// ```
pub struct MinHeap<K, T, F>
where
    F: Fn(&K, &K) -> bool,
{
    /// Entries laid out as an implicit binary tree.
    entries: Vec<Entry<K, T>>,
    /// Strict ordering predicate: "first key must sit above second".
    outranks: F,
}

impl<K, T, F> MinHeap<K, T, F>
where
    F: Fn(&K, &K) -> bool,
{
    /// Creates an empty heap with the given comparator.
    #[must_use]
    pub const fn new(outranks: F) -> Self {
        Self {
            entries: Vec::new(),
            outranks,
        }
    }

    /// Creates an empty heap with pre-allocated capacity.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of entries to reserve upfront
    /// * `outranks` - Strict ordering predicate
    #[must_use]
    pub fn with_capacity(capacity: usize, outranks: F) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            outranks,
        }
    }

    /// Returns the number of stored entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no entries are stored.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops all entries, keeping the allocation.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Inserts a `(key, data)` pair in O(log n).
    pub fn insert(&mut self, data: T, key: K) {
        self.entries.push(Entry { key, data });
        self.sift_up(self.entries.len() - 1);
    }

    /// Peeks at the top key without removing it. O(1), `None` when empty.
    #[inline]
    #[must_use]
    pub fn head_key(&self) -> Option<&K> {
        self.entries.first().map(|entry| &entry.key)
    }

    /// Peeks at the top payload without removing it. O(1), `None` when empty.
    #[inline]
    #[must_use]
    pub fn head_data(&self) -> Option<&T> {
        self.entries.first().map(|entry| &entry.data)
    }

    /// Removes and returns the top `(key, data)` pair.
    ///
    /// # Returns
    ///
    /// `None` when the heap is empty.
    pub fn pop(&mut self) -> Option<(K, T)> {
        if self.entries.is_empty() {
            return None;
        }
        let entry = self.remove_node(0);
        Some((entry.key, entry.data))
    }

    /// Removes the relocated entry at `index`, restoring heap order around
    /// the element swapped into its place.
    fn remove_node(&mut self, index: usize) -> Entry<K, T> {
        let removed = self.entries.swap_remove(index);
        if index < self.entries.len() {
            // The former tail now sits at `index` and may rank too high
            // or too low for that position.
            let rises = index > 0 && {
                let parent = (index - 1) / 2;
                (self.outranks)(&self.entries[index].key, &self.entries[parent].key)
            };
            if rises {
                self.sift_up(index);
            } else {
                self.sift_down(index);
            }
        }
        removed
    }

    /// Moves the entry at `index` up while it outranks its parent.
    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if (self.outranks)(&self.entries[index].key, &self.entries[parent].key) {
                self.entries.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    /// Moves the entry at `index` down while a child outranks it.
    fn sift_down(&mut self, mut index: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut child = left;
            if right < len && (self.outranks)(&self.entries[right].key, &self.entries[left].key) {
                child = right;
            }
            if (self.outranks)(&self.entries[child].key, &self.entries[index].key) {
                self.entries.swap(index, child);
                index = child;
            } else {
                break;
            }
        }
    }
}

impl<K, T, F> MinHeap<K, T, F>
where
    T: PartialEq,
    F: Fn(&K, &K) -> bool,
{
    /// Removes the first entry whose payload equals `data`.
    ///
    /// Linear scan bounded by the heap size, then an O(log n) re-sift.
    ///
    /// # Returns
    ///
    /// `true` if a matching entry was found and removed. Callers must not
    /// assume the value existed.
    pub fn remove(&mut self, data: &T) -> bool {
        match self.entries.iter().position(|entry| entry.data == *data) {
            Some(index) => {
                let _ = self.remove_node(index);
                true
            }
            None => false,
        }
    }
}
