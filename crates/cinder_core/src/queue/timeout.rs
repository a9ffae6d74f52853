//! # Timeout Queue
//!
//! Virtual-clock timer queue: entries expire when the caller-advanced clock
//! passes their scheduled time. Nothing fires between ticks.

use super::min_heap::MinHeap;

/// Strict "earlier wins" ordering for expiry times.
fn earlier(a: &f32, b: &f32) -> bool {
    a < b
}

/// A timer queue over a monotonic virtual clock.
///
/// `insert` schedules relative to the current clock; `update` advances it;
/// expired entries are pulled with [`next`](Self::next) or drained with
/// [`drain_expired`](Self::drain_expired). The clock starts at 0 and only
/// moves forward.
///
/// # Thread Safety
///
/// NOT thread-safe. One queue per tick-driven subsystem.
pub struct TimeoutQueue<T> {
    /// Entries keyed by absolute expiry time.
    heap: MinHeap<f32, T, fn(&f32, &f32) -> bool>,
    /// Current virtual time.
    time: f32,
}

impl<T> TimeoutQueue<T> {
    /// Creates an empty queue with the clock at 0.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            heap: MinHeap::new(earlier as fn(&f32, &f32) -> bool),
            time: 0.0,
        }
    }

    /// Returns the current virtual time.
    #[inline]
    #[must_use]
    pub const fn time(&self) -> f32 {
        self.time
    }

    /// Returns the number of scheduled entries (expired or not).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns true when nothing is scheduled.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Schedules `data` to expire `timeout` seconds from the current time.
    pub fn insert(&mut self, data: T, timeout: f32) {
        self.heap.insert(data, self.time + timeout);
    }

    /// Advances the virtual clock.
    ///
    /// # Arguments
    ///
    /// * `delta_time` - Seconds to add; expected non-negative
    pub fn update(&mut self, delta_time: f32) {
        self.time += delta_time;
    }

    /// Returns true when the earliest entry has expired.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.heap.head_key().is_some_and(|expiry| *expiry <= self.time)
    }

    /// Pops the earliest-expiring entry, expired or not.
    ///
    /// Use [`has_next`](Self::has_next) first to take only overdue entries.
    pub fn next(&mut self) -> Option<T> {
        self.heap.pop().map(|(_, data)| data)
    }

    /// Pops and invokes `callback` on every currently-expired entry, in
    /// ascending expiry order. Synchronous, single pass; entries the
    /// callback schedules for the current time are drained too.
    pub fn drain_expired<F>(&mut self, mut callback: F)
    where
        F: FnMut(T),
    {
        while self.has_next() {
            if let Some(data) = self.next() {
                callback(data);
            }
        }
    }
}

impl<T> Default for TimeoutQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> TimeoutQueue<T> {
    /// Cancels the first scheduled entry equal to `data`.
    ///
    /// # Returns
    ///
    /// `true` if an entry was found and removed.
    pub fn cancel(&mut self, data: &T) -> bool {
        self.heap.remove(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_follows_virtual_clock() {
        let mut queue = TimeoutQueue::new();
        queue.insert("a", 5.0);

        queue.update(3.0);
        assert!(!queue.has_next());

        queue.update(3.0);
        assert!(queue.has_next());
        assert_eq!(queue.next(), Some("a"));
        assert!(!queue.has_next());
    }

    #[test]
    fn test_drain_expired_in_order() {
        let mut queue = TimeoutQueue::new();
        queue.insert("second", 2.0);
        queue.insert("first", 1.0);
        queue.insert("later", 10.0);

        queue.update(5.0);
        let mut fired = Vec::new();
        queue.drain_expired(|data| fired.push(data));

        assert_eq!(fired, vec!["first", "second"]);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_insert_is_relative_to_current_time() {
        let mut queue = TimeoutQueue::new();
        queue.update(10.0);
        queue.insert("x", 5.0);

        queue.update(4.0);
        assert!(!queue.has_next());
        queue.update(1.0);
        assert!(queue.has_next());
    }

    #[test]
    fn test_cancel() {
        let mut queue = TimeoutQueue::new();
        queue.insert("a", 1.0);
        queue.insert("b", 2.0);

        assert!(queue.cancel(&"a"));
        assert!(!queue.cancel(&"a"));

        queue.update(3.0);
        assert_eq!(queue.next(), Some("b"));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_next_on_empty() {
        let mut queue: TimeoutQueue<u32> = TimeoutQueue::default();
        assert_eq!(queue.next(), None);
        assert!(!queue.has_next());
    }
}
